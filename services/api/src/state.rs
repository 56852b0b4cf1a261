//! Application state shared across handlers

use common::token::AccessTokenVerifier;
use std::sync::Arc;

use crate::repositories::{ActorStore, FilmStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub actors: Arc<dyn ActorStore>,
    pub films: Arc<dyn FilmStore>,
    pub verifier: AccessTokenVerifier,
}
