//! Actor repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::ActorStore;
use crate::models::{Actor, ActorChanges, ActorWithFilms, NewActor, Sex};

/// Actor repository for database operations
#[derive(Clone)]
pub struct ActorRepository {
    pool: PgPool,
}

impl ActorRepository {
    /// Create a new actor repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn decode_sex(value: i16) -> Result<Sex, sqlx::Error> {
    Sex::try_from(value).map_err(|e| sqlx::Error::Decode(e.into()))
}

fn actor_from_row(row: &PgRow) -> Result<ActorWithFilms, sqlx::Error> {
    Ok(ActorWithFilms {
        actor_id: row.try_get("id")?,
        name: row.try_get("name")?,
        sex: decode_sex(row.try_get("sex")?)?,
        birth: row.try_get("birth")?,
        films: row.try_get("films")?,
    })
}

#[async_trait]
impl ActorStore for ActorRepository {
    async fn create(&self, actor: &NewActor) -> DatabaseResult<Actor> {
        let actor_id = Uuid::new_v4();
        info!("Creating actor {} ({})", actor.name, actor_id);

        sqlx::query(
            r#"
            INSERT INTO actor (id, name, sex, birth)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(actor_id)
        .bind(&actor.name)
        .bind(i16::from(actor.sex))
        .bind(actor.birth)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(Actor {
            actor_id,
            name: actor.name.clone(),
            sex: actor.sex,
            birth: actor.birth,
        })
    }

    async fn list(&self) -> DatabaseResult<Vec<ActorWithFilms>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.name, a.sex, a.birth,
                   COALESCE(array_remove(array_agg(f.name::text ORDER BY f.name), NULL), '{}'::text[]) AS films
            FROM actor a
            LEFT JOIN film_actor fa ON fa.actor_id = a.id
            LEFT JOIN film f ON f.id = fa.film_id
            GROUP BY a.id
            ORDER BY a.name, a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        rows.iter()
            .map(actor_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::Query)
    }

    async fn update(&self, id: Uuid, changes: &ActorChanges) -> DatabaseResult<bool> {
        info!("Updating actor {}", id);

        let result = sqlx::query(
            r#"
            UPDATE actor
            SET name = COALESCE($2, name),
                sex = COALESCE($3, sex),
                birth = COALESCE($4, birth)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.sex.map(i16::from))
        .bind(changes.birth)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting actor {}", id);

        let result = sqlx::query("DELETE FROM actor WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}
