use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::escape_like;
use crate::destinations::dto::DestinationFilter;
use crate::destinations::repo_types::{Destination, NewDestination, StateCount};

const DESTINATION_COLUMNS: &str = "id, name, category, state, latitude, longitude, image_url, \
     rating, popularity, best_time, ideal_weather, description";

/// Filtered, sorted listing. Filters combine with AND; no pagination.
pub async fn list(db: &PgPool, filter: &DestinationFilter) -> anyhow::Result<Vec<Destination>> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {DESTINATION_COLUMNS} FROM destinations WHERE TRUE"));

    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(state) = &filter.state {
        qb.push(" AND state = ").push_bind(state.clone());
    }
    if let Some(weather) = &filter.weather {
        qb.push(" AND ideal_weather = ").push_bind(weather.clone());
    }
    if let Some(search) = &filter.search {
        qb.push(" AND name ILIKE ")
            .push_bind(format!("%{}%", escape_like(search)))
            .push(" ESCAPE '\\'");
    }
    qb.push(" ORDER BY ").push(filter.sort.order_by());

    let rows = qb.build_query_as::<Destination>().fetch_all(db).await?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: i64) -> anyhow::Result<Option<Destination>> {
    let row = sqlx::query_as::<_, Destination>(&format!(
        "SELECT {DESTINATION_COLUMNS} FROM destinations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn exists(db: &PgPool, id: i64) -> anyhow::Result<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM destinations WHERE id = $1)")
        .bind(id)
        .fetch_one(db)
        .await?;
    Ok(found)
}

/// Most popular destinations that have coordinates.
pub async fn top_with_coordinates(db: &PgPool, limit: i64) -> anyhow::Result<Vec<Destination>> {
    let rows = sqlx::query_as::<_, Destination>(&format!(
        r#"
        SELECT {DESTINATION_COLUMNS}
          FROM destinations
         WHERE latitude IS NOT NULL AND longitude IS NOT NULL
         ORDER BY popularity DESC, id ASC
         LIMIT $1
        "#
    ))
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_states(db: &PgPool) -> anyhow::Result<Vec<StateCount>> {
    let rows = sqlx::query_as::<_, StateCount>(
        r#"
        SELECT state, COUNT(*) AS count
          FROM destinations
         WHERE state IS NOT NULL AND state <> ''
         GROUP BY state
         ORDER BY state ASC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM destinations")
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn insert(db: &PgPool, d: &NewDestination) -> anyhow::Result<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO destinations
            (name, category, state, latitude, longitude, image_url, rating,
             popularity, best_time, ideal_weather, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(&d.name)
    .bind(&d.category)
    .bind(&d.state)
    .bind(d.latitude)
    .bind(d.longitude)
    .bind(&d.image_url)
    .bind(d.rating)
    .bind(d.popularity)
    .bind(&d.best_time)
    .bind(&d.ideal_weather)
    .bind(&d.description)
    .fetch_one(db)
    .await?;
    Ok(id)
}

/// Destinations whose image URL points at `host`.
pub async fn list_with_image_host(db: &PgPool, host: &str) -> anyhow::Result<Vec<Destination>> {
    let rows = sqlx::query_as::<_, Destination>(&format!(
        "SELECT {DESTINATION_COLUMNS} FROM destinations WHERE image_url ILIKE $1 ORDER BY id"
    ))
    .bind(format!("%://{}/%", escape_like(host)))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn update_image_url(db: &PgPool, id: i64, url: &str) -> anyhow::Result<()> {
    sqlx::query("UPDATE destinations SET image_url = $2 WHERE id = $1")
        .bind(id)
        .bind(url)
        .execute(db)
        .await?;
    Ok(())
}
