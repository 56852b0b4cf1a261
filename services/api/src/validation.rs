//! Input validation for catalogue requests
//!
//! Lengths are measured in bytes. Each function turns a raw request into its
//! validated counterpart or a message suitable for a 400 response.

use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{
    ActorChanges, CreateActorRequest, CreateFilmRequest, FilmChanges, FilmSearch, FilmSearchQuery,
    NewActor, NewFilm, Sex, UpdateActorRequest, UpdateFilmRequest,
};

pub const ACTOR_NAME_MAX_LEN: usize = 128;
pub const FILM_NAME_MIN_LEN: usize = 1;
pub const FILM_NAME_MAX_LEN: usize = 150;
pub const FILM_DESCRIPTION_MAX_LEN: usize = 1000;
pub const FILM_RATE_MIN: i16 = 0;
pub const FILM_RATE_MAX: i16 = 10;

/// Validate actor name: non-empty, bounded, starting with an ASCII capital
pub fn validate_actor_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Actor name is required".to_string());
    }

    if name.len() > ACTOR_NAME_MAX_LEN {
        return Err(format!(
            "Actor name must be at most {} characters long",
            ACTOR_NAME_MAX_LEN
        ));
    }

    if !name.as_bytes()[0].is_ascii_uppercase() {
        return Err("Actor name must start with a capital letter".to_string());
    }

    Ok(())
}

/// Validate birth date: not in the future
pub fn validate_birth(birth: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if birth > today {
        return Err("Actor birth date cannot be in the future".to_string());
    }
    Ok(())
}

pub fn validate_film_name(name: &str) -> Result<(), String> {
    if name.len() < FILM_NAME_MIN_LEN || name.len() > FILM_NAME_MAX_LEN {
        return Err(format!(
            "Film name must be between {} and {} characters long",
            FILM_NAME_MIN_LEN, FILM_NAME_MAX_LEN
        ));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), String> {
    if description.len() > FILM_DESCRIPTION_MAX_LEN {
        return Err(format!(
            "Film description must be at most {} characters long",
            FILM_DESCRIPTION_MAX_LEN
        ));
    }
    Ok(())
}

pub fn validate_rate(rate: i16) -> Result<(), String> {
    if !(FILM_RATE_MIN..=FILM_RATE_MAX).contains(&rate) {
        return Err(format!(
            "Film rate must be between {} and {}",
            FILM_RATE_MIN, FILM_RATE_MAX
        ));
    }
    Ok(())
}

fn distinct(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub fn new_actor(request: CreateActorRequest, today: NaiveDate) -> Result<NewActor, String> {
    validate_actor_name(&request.name)?;
    let sex = Sex::try_from(request.sex)?;
    validate_birth(request.birth, today)?;

    Ok(NewActor {
        name: request.name,
        sex,
        birth: request.birth,
    })
}

pub fn actor_changes(request: UpdateActorRequest, today: NaiveDate) -> Result<ActorChanges, String> {
    if request.name.is_none() && request.sex.is_none() && request.birth.is_none() {
        return Err("Nothing to update".to_string());
    }

    if let Some(name) = &request.name {
        validate_actor_name(name)?;
    }
    let sex = request.sex.map(Sex::try_from).transpose()?;
    if let Some(birth) = request.birth {
        validate_birth(birth, today)?;
    }

    Ok(ActorChanges {
        name: request.name,
        sex,
        birth: request.birth,
    })
}

pub fn new_film(request: CreateFilmRequest) -> Result<NewFilm, String> {
    validate_film_name(&request.name)?;
    validate_description(&request.description)?;
    validate_rate(request.rate)?;

    Ok(NewFilm {
        name: request.name,
        description: request.description,
        release_date: request.release_date,
        rate: request.rate,
        actors: distinct(request.actors),
    })
}

pub fn film_changes(request: UpdateFilmRequest) -> Result<FilmChanges, String> {
    if request.name.is_none()
        && request.description.is_none()
        && request.release_date.is_none()
        && request.rate.is_none()
        && request.actors.is_none()
    {
        return Err("Nothing to update".to_string());
    }

    if let Some(name) = &request.name {
        validate_film_name(name)?;
    }
    if let Some(description) = &request.description {
        validate_description(description)?;
    }
    if let Some(rate) = request.rate {
        validate_rate(rate)?;
    }

    Ok(FilmChanges {
        name: request.name,
        description: request.description,
        release_date: request.release_date,
        rate: request.rate,
        actors: request.actors.map(distinct),
    })
}

/// A non-empty `name` wins over `actor_name`; both empty is an error
pub fn film_search(query: FilmSearchQuery) -> Result<FilmSearch, String> {
    match (query.name, query.actor_name) {
        (Some(name), _) if !name.is_empty() => Ok(FilmSearch::ByName(name)),
        (_, Some(actor_name)) if !actor_name.is_empty() => Ok(FilmSearch::ByActorName(actor_name)),
        _ => Err("Either name or actor_name is required".to_string()),
    }
}
