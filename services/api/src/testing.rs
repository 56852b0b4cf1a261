//! In-memory catalogue and token fixtures for unit tests

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    models::{
        Actor, ActorChanges, ActorWithFilms, Film, FilmChanges, FilmSearch, FilmSort,
        FilmWithActors, NewActor, NewFilm, SortOrder,
    },
    repositories::{ActorStore, FilmStore},
    state::AppState,
};
use common::token::{AccessClaims, AccessTokenVerifier};

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";

pub fn token(user_id: &str, is_admin: bool) -> String {
    let exp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
        + 900;
    let claims = AccessClaims {
        user_id: user_id.to_string(),
        is_admin,
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_ACCESS_SECRET.as_bytes()),
    )
    .unwrap()
}

#[derive(Default)]
struct Catalogue {
    actors: HashMap<Uuid, Actor>,
    films: HashMap<Uuid, Film>,
    /// (film, actor)
    links: BTreeSet<(Uuid, Uuid)>,
}

impl Catalogue {
    fn link(&mut self, film_id: Uuid, actors: &[Uuid]) -> DatabaseResult<()> {
        if let Some(unknown) = actors.iter().find(|id| !self.actors.contains_key(*id)) {
            return Err(DatabaseError::Constraint(format!(
                "actor {} does not exist",
                unknown
            )));
        }
        for actor_id in actors {
            self.links.insert((film_id, *actor_id));
        }
        Ok(())
    }

    fn with_actors(&self, film: &Film) -> FilmWithActors {
        let mut actors: Vec<String> = self
            .links
            .iter()
            .filter(|(film_id, _)| *film_id == film.film_id)
            .filter_map(|(_, actor_id)| self.actors.get(actor_id))
            .map(|actor| actor.name.clone())
            .collect();
        actors.sort();

        FilmWithActors {
            film_id: film.film_id,
            name: film.name.clone(),
            description: film.description.clone(),
            release_date: film.release_date,
            rate: film.rate,
            actors,
        }
    }
}

/// Both stores over one shared in-memory catalogue
#[derive(Clone, Default)]
pub struct InMemoryCatalogue {
    inner: Arc<RwLock<Catalogue>>,
}

#[async_trait]
impl ActorStore for InMemoryCatalogue {
    async fn create(&self, actor: &NewActor) -> DatabaseResult<Actor> {
        let actor = Actor {
            actor_id: Uuid::new_v4(),
            name: actor.name.clone(),
            sex: actor.sex,
            birth: actor.birth,
        };
        self.inner
            .write()
            .await
            .actors
            .insert(actor.actor_id, actor.clone());
        Ok(actor)
    }

    async fn list(&self) -> DatabaseResult<Vec<ActorWithFilms>> {
        let catalogue = self.inner.read().await;
        let mut actors: Vec<ActorWithFilms> = catalogue
            .actors
            .values()
            .map(|actor| {
                let mut films: Vec<String> = catalogue
                    .links
                    .iter()
                    .filter(|(_, actor_id)| *actor_id == actor.actor_id)
                    .filter_map(|(film_id, _)| catalogue.films.get(film_id))
                    .map(|film| film.name.clone())
                    .collect();
                films.sort();

                ActorWithFilms {
                    actor_id: actor.actor_id,
                    name: actor.name.clone(),
                    sex: actor.sex,
                    birth: actor.birth,
                    films,
                }
            })
            .collect();
        actors.sort_by(|a, b| a.name.cmp(&b.name).then(a.actor_id.cmp(&b.actor_id)));
        Ok(actors)
    }

    async fn update(&self, id: Uuid, changes: &ActorChanges) -> DatabaseResult<bool> {
        let mut catalogue = self.inner.write().await;
        let Some(actor) = catalogue.actors.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(name) = &changes.name {
            actor.name = name.clone();
        }
        if let Some(sex) = changes.sex {
            actor.sex = sex;
        }
        if let Some(birth) = changes.birth {
            actor.birth = birth;
        }
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut catalogue = self.inner.write().await;
        catalogue.links.retain(|(_, actor_id)| *actor_id != id);
        Ok(catalogue.actors.remove(&id).is_some())
    }
}

#[async_trait]
impl FilmStore for InMemoryCatalogue {
    async fn create(&self, film: &NewFilm) -> DatabaseResult<Film> {
        let mut catalogue = self.inner.write().await;
        let film = Film {
            film_id: Uuid::new_v4(),
            name: film.name.clone(),
            description: film.description.clone(),
            release_date: film.release_date,
            rate: film.rate,
            actors: film.actors.clone(),
        };
        catalogue.link(film.film_id, &film.actors)?;
        catalogue.films.insert(film.film_id, film.clone());
        Ok(film)
    }

    async fn list(&self, sort: FilmSort, order: SortOrder) -> DatabaseResult<Vec<FilmWithActors>> {
        let catalogue = self.inner.read().await;
        let mut films: Vec<FilmWithActors> = catalogue
            .films
            .values()
            .map(|film| catalogue.with_actors(film))
            .collect();

        films.sort_by(|a, b| {
            let by_column = match sort {
                FilmSort::Rate => a.rate.cmp(&b.rate),
                FilmSort::Name => a.name.cmp(&b.name),
                FilmSort::ReleaseDate => a.release_date.cmp(&b.release_date),
            };
            let by_column = match order {
                SortOrder::Asc => by_column,
                SortOrder::Desc => by_column.reverse(),
            };
            by_column.then(a.film_id.cmp(&b.film_id))
        });
        Ok(films)
    }

    async fn update(&self, id: Uuid, changes: &FilmChanges) -> DatabaseResult<bool> {
        let mut catalogue = self.inner.write().await;
        if !catalogue.films.contains_key(&id) {
            return Ok(false);
        }

        if let Some(actors) = &changes.actors {
            if let Some(unknown) = actors.iter().find(|a| !catalogue.actors.contains_key(*a)) {
                return Err(DatabaseError::Constraint(format!(
                    "actor {} does not exist",
                    unknown
                )));
            }
            catalogue.links.retain(|(film_id, _)| *film_id != id);
            catalogue.link(id, actors)?;
        }

        if let Some(film) = catalogue.films.get_mut(&id) {
            if let Some(name) = &changes.name {
                film.name = name.clone();
            }
            if let Some(description) = &changes.description {
                film.description = description.clone();
            }
            if let Some(release_date) = changes.release_date {
                film.release_date = release_date;
            }
            if let Some(rate) = changes.rate {
                film.rate = rate;
            }
        }
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut catalogue = self.inner.write().await;
        catalogue.links.retain(|(film_id, _)| *film_id != id);
        Ok(catalogue.films.remove(&id).is_some())
    }

    async fn search(&self, search: &FilmSearch) -> DatabaseResult<Vec<FilmWithActors>> {
        let films = FilmStore::list(self, FilmSort::Rate, SortOrder::Desc).await?;
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        };

        Ok(films
            .into_iter()
            .filter(|film| match search {
                FilmSearch::ByName(name) => contains(&film.name, name),
                FilmSearch::ByActorName(actor_name) => {
                    film.actors.iter().any(|actor| contains(actor, actor_name))
                }
            })
            .collect())
    }
}

/// State wired to a fresh in-memory catalogue
pub fn test_state() -> AppState {
    let catalogue = InMemoryCatalogue::default();
    AppState {
        actors: Arc::new(catalogue.clone()),
        films: Arc::new(catalogue),
        verifier: AccessTokenVerifier::new(TEST_ACCESS_SECRET),
    }
}
