//! Film repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::{FilmStore, like_pattern};
use crate::models::{Film, FilmChanges, FilmSearch, FilmSort, FilmWithActors, NewFilm, SortOrder};

const FILM_WITH_ACTORS: &str = r#"
    SELECT f.id, f.name, f.description, f.release_date, f.rate,
           COALESCE(array_remove(array_agg(a.name::text ORDER BY a.name), NULL), '{}'::text[]) AS actors
    FROM film f
    LEFT JOIN film_actor fa ON fa.film_id = f.id
    LEFT JOIN actor a ON a.id = fa.actor_id
"#;

/// Film repository for database operations
#[derive(Clone)]
pub struct FilmRepository {
    pool: PgPool,
}

impl FilmRepository {
    /// Create a new film repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(
        &self,
        mut query: QueryBuilder<'_, Postgres>,
    ) -> DatabaseResult<Vec<FilmWithActors>> {
        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        rows.iter()
            .map(film_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::Query)
    }
}

fn film_from_row(row: &PgRow) -> Result<FilmWithActors, sqlx::Error> {
    Ok(FilmWithActors {
        film_id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        release_date: row.try_get("release_date")?,
        rate: row.try_get("rate")?,
        actors: row.try_get("actors")?,
    })
}

/// Link `actors` to a film. Unknown actor ids violate the foreign key.
async fn link_actors(
    conn: &mut PgConnection,
    film_id: Uuid,
    actors: &[Uuid],
) -> DatabaseResult<()> {
    if actors.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO film_actor (film_id, actor_id)
        SELECT $1, actor_id FROM UNNEST($2::uuid[]) AS actor_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(film_id)
    .bind(actors)
    .execute(conn)
    .await
    .map_err(DatabaseError::from_query)?;

    Ok(())
}

#[async_trait]
impl FilmStore for FilmRepository {
    async fn create(&self, film: &NewFilm) -> DatabaseResult<Film> {
        let film_id = Uuid::new_v4();
        info!("Creating film {} ({})", film.name, film_id);

        let mut tx = self.pool.begin().await.map_err(DatabaseError::Connection)?;

        sqlx::query(
            r#"
            INSERT INTO film (id, name, description, release_date, rate)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(film_id)
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.rate)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from_query)?;

        link_actors(&mut tx, film_id, &film.actors).await?;

        tx.commit().await.map_err(DatabaseError::from_query)?;

        Ok(Film {
            film_id,
            name: film.name.clone(),
            description: film.description.clone(),
            release_date: film.release_date,
            rate: film.rate,
            actors: film.actors.clone(),
        })
    }

    async fn list(&self, sort: FilmSort, order: SortOrder) -> DatabaseResult<Vec<FilmWithActors>> {
        let mut query = QueryBuilder::<Postgres>::new(FILM_WITH_ACTORS);
        query
            .push(" GROUP BY f.id ORDER BY ")
            .push(sort.column())
            .push(" ")
            .push(order.keyword())
            .push(", f.id");

        self.fetch(query).await
    }

    async fn update(&self, id: Uuid, changes: &FilmChanges) -> DatabaseResult<bool> {
        info!("Updating film {}", id);

        let mut tx = self.pool.begin().await.map_err(DatabaseError::Connection)?;

        let result = sqlx::query(
            r#"
            UPDATE film
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                release_date = COALESCE($4, release_date),
                rate = COALESCE($5, rate)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.release_date)
        .bind(changes.rate)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from_query)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(actors) = &changes.actors {
            sqlx::query("DELETE FROM film_actor WHERE film_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(DatabaseError::from_query)?;

            link_actors(&mut tx, id, actors).await?;
        }

        tx.commit().await.map_err(DatabaseError::from_query)?;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting film {}", id);

        let result = sqlx::query("DELETE FROM film WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, search: &FilmSearch) -> DatabaseResult<Vec<FilmWithActors>> {
        let mut query = QueryBuilder::<Postgres>::new(FILM_WITH_ACTORS);

        match search {
            FilmSearch::ByName(name) => {
                query.push(" WHERE f.name ILIKE ").push_bind(like_pattern(name));
            }
            FilmSearch::ByActorName(actor_name) => {
                query
                    .push(
                        " WHERE EXISTS (SELECT 1 FROM film_actor m \
                         JOIN actor ma ON ma.id = m.actor_id \
                         WHERE m.film_id = f.id AND ma.name ILIKE ",
                    )
                    .push_bind(like_pattern(actor_name))
                    .push(")");
            }
        }

        query.push(" GROUP BY f.id ORDER BY f.rate DESC, f.id");
        self.fetch(query).await
    }
}
