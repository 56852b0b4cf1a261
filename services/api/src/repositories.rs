//! Repositories for database operations
//!
//! Each store trait is the seam between handlers and PostgreSQL; the
//! `*Repository` structs are the PostgreSQL implementations.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{
    Actor, ActorChanges, ActorWithFilms, Film, FilmChanges, FilmSearch, FilmSort, FilmWithActors,
    NewActor, NewFilm, SortOrder,
};

pub mod actor;
pub mod film;

pub use actor::ActorRepository;
pub use film::FilmRepository;

#[async_trait]
pub trait ActorStore: Send + Sync {
    async fn create(&self, actor: &NewActor) -> DatabaseResult<Actor>;

    /// All actors with their film names, ordered by name
    async fn list(&self) -> DatabaseResult<Vec<ActorWithFilms>>;

    /// Apply a field mask; `false` if no actor has this id
    async fn update(&self, id: Uuid, changes: &ActorChanges) -> DatabaseResult<bool>;

    /// Remove an actor and its film links; `false` if no actor has this id
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

#[async_trait]
pub trait FilmStore: Send + Sync {
    /// Insert a film with its actor links; an unknown actor id is a
    /// constraint error and nothing is stored
    async fn create(&self, film: &NewFilm) -> DatabaseResult<Film>;

    /// All films with their actor names; ties are broken by id
    async fn list(&self, sort: FilmSort, order: SortOrder) -> DatabaseResult<Vec<FilmWithActors>>;

    /// Apply a field mask; `false` if no film has this id
    async fn update(&self, id: Uuid, changes: &FilmChanges) -> DatabaseResult<bool>;

    /// Remove a film and its actor links; `false` if no film has this id
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;

    /// Case-insensitive fragment search, best rated first
    async fn search(&self, search: &FilmSearch) -> DatabaseResult<Vec<FilmWithActors>>;
}

/// Escape `LIKE` wildcards so a search fragment matches literally
pub fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
