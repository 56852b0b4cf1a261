//! API models for request and response payloads

use serde::Serialize;

pub mod actor;
pub mod film;

pub use actor::{
    Actor, ActorChanges, ActorWithFilms, CreateActorRequest, NewActor, Sex, UpdateActorRequest,
};
pub use film::{
    CreateFilmRequest, Film, FilmChanges, FilmSearch, FilmSearchQuery, FilmSort, FilmWithActors,
    ListFilmsQuery, NewFilm, SortOrder, UpdateFilmRequest,
};

/// Envelope for list responses
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub response: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(response: Vec<T>) -> Self {
        Self { response }
    }
}
