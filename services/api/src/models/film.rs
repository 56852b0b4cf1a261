//! Film models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Film as created, with the ids of its actors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub film_id: Uuid,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rate: i16,
    pub actors: Vec<Uuid>,
}

/// Film with the names of its actors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmWithActors {
    pub film_id: Uuid,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rate: i16,
    pub actors: Vec<String>,
}

/// Request for film creation
#[derive(Debug, Deserialize)]
pub struct CreateFilmRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub release_date: NaiveDate,
    pub rate: i16,
    #[serde(default)]
    pub actors: Vec<Uuid>,
}

/// Validated film creation payload; `actors` holds no duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFilm {
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rate: i16,
    pub actors: Vec<Uuid>,
}

/// Request for a partial film update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFilmRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rate: Option<i16>,
    pub actors: Option<Vec<Uuid>>,
}

/// Validated field mask for a film update.
///
/// `actors: Some(list)` replaces the film's actor set with `list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rate: Option<i16>,
    pub actors: Option<Vec<Uuid>>,
}

/// Column a film listing is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmSort {
    #[default]
    Rate,
    Name,
    ReleaseDate,
}

impl FilmSort {
    pub fn column(self) -> &'static str {
        match self {
            FilmSort::Rate => "f.rate",
            FilmSort::Name => "f.name",
            FilmSort::ReleaseDate => "f.release_date",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query parameters for film listing
#[derive(Debug, Default, Deserialize)]
pub struct ListFilmsQuery {
    #[serde(default)]
    pub sort_by: FilmSort,
    #[serde(default)]
    pub order: SortOrder,
}

/// Query parameters for film search
#[derive(Debug, Default, Deserialize)]
pub struct FilmSearchQuery {
    pub name: Option<String>,
    pub actor_name: Option<String>,
}

/// What a film search matches against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilmSearch {
    /// Fragment of the film name
    ByName(String),
    /// Fragment of the name of any actor in the film
    ByActorName(String),
}
