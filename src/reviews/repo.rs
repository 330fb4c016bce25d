use anyhow::Context;
use sqlx::PgPool;

use crate::reviews::repo_types::{Review, ReviewView};
use crate::reviews::services::aggregate_rating;

/// Newest first, optionally capped.
pub async fn list_for_destination(
    db: &PgPool,
    destination_id: i64,
    limit: Option<i64>,
) -> anyhow::Result<Vec<ReviewView>> {
    let rows = sqlx::query_as::<_, ReviewView>(
        r#"
        SELECT r.id, u.username AS "user", r.rating, r.comment, r.created_at
          FROM reviews r
          JOIN users u ON u.id = r.user_id
         WHERE r.destination_id = $1
         ORDER BY r.created_at DESC, r.id DESC
         LIMIT $2
        "#,
    )
    .bind(destination_id)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list reviews by destination")?;
    Ok(rows)
}

/// Inserts a review and stores the destination's new mean rating in one
/// transaction. The destination row is locked first, so concurrent reviews of
/// the same destination apply one after another. Returns `None` when the
/// destination does not exist.
pub async fn insert_and_rerate(
    db: &PgPool,
    user_id: i64,
    destination_id: i64,
    rating: i32,
    comment: &str,
) -> anyhow::Result<Option<(Review, f64)>> {
    let mut tx = db.begin().await.context("begin tx")?;

    let locked: Option<i64> =
        sqlx::query_scalar("SELECT id FROM destinations WHERE id = $1 FOR UPDATE")
            .bind(destination_id)
            .fetch_optional(&mut *tx)
            .await
            .context("lock destination")?;
    if locked.is_none() {
        tx.rollback().await.context("rollback tx")?;
        return Ok(None);
    }

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (user_id, destination_id, rating, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, destination_id, rating, comment, created_at
        "#,
    )
    .bind(user_id)
    .bind(destination_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(&mut *tx)
    .await
    .context("insert review")?;

    let ratings: Vec<i32> =
        sqlx::query_scalar("SELECT rating FROM reviews WHERE destination_id = $1")
            .bind(destination_id)
            .fetch_all(&mut *tx)
            .await
            .context("load ratings")?;
    let mean = aggregate_rating(&ratings).unwrap_or(f64::from(rating));

    sqlx::query("UPDATE destinations SET rating = $2 WHERE id = $1")
        .bind(destination_id)
        .bind(mean)
        .execute(&mut *tx)
        .await
        .context("update destination rating")?;

    tx.commit().await.context("commit tx")?;
    Ok(Some((review, mean)))
}
