//! Actor models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actor sex, stored and sent as `1` (male) or `2` (female)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Sex {
    Male,
    Female,
}

impl TryFrom<i16> for Sex {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Sex::Male),
            2 => Ok(Sex::Female),
            other => Err(format!("invalid actor sex {}, expected 1 or 2", other)),
        }
    }
}

impl From<Sex> for i16 {
    fn from(sex: Sex) -> Self {
        match sex {
            Sex::Male => 1,
            Sex::Female => 2,
        }
    }
}

/// Actor entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub actor_id: Uuid,
    pub name: String,
    pub sex: Sex,
    pub birth: NaiveDate,
}

/// Actor with the names of the films they appear in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorWithFilms {
    pub actor_id: Uuid,
    pub name: String,
    pub sex: Sex,
    pub birth: NaiveDate,
    pub films: Vec<String>,
}

/// Request for actor creation
#[derive(Debug, Deserialize)]
pub struct CreateActorRequest {
    pub name: String,
    pub sex: i16,
    pub birth: NaiveDate,
}

/// Validated actor creation payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub sex: Sex,
    pub birth: NaiveDate,
}

/// Request for a partial actor update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateActorRequest {
    pub name: Option<String>,
    pub sex: Option<i16>,
    pub birth: Option<NaiveDate>,
}

/// Validated field mask for an actor update; `None` leaves a column unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorChanges {
    pub name: Option<String>,
    pub sex: Option<Sex>,
    pub birth: Option<NaiveDate>,
}
