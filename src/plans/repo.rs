use sqlx::PgPool;
use time::Date;

use crate::plans::repo_types::TravelPlan;

const PLAN_COLUMNS: &str = "id, user_id, destination_ids, start_date, end_date, route_data, created_at";

/// Stores the plan as given; destination ids are not checked.
pub async fn insert(
    db: &PgPool,
    user_id: i64,
    destination_ids: &[i64],
    start_date: Option<Date>,
    end_date: Option<Date>,
    route_data: Option<&serde_json::Value>,
) -> anyhow::Result<TravelPlan> {
    let plan = sqlx::query_as::<_, TravelPlan>(&format!(
        r#"
        INSERT INTO travel_plans (user_id, destination_ids, start_date, end_date, route_data)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {PLAN_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(destination_ids)
    .bind(start_date)
    .bind(end_date)
    .bind(route_data)
    .fetch_one(db)
    .await?;
    Ok(plan)
}

pub async fn list_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<TravelPlan>> {
    let rows = sqlx::query_as::<_, TravelPlan>(&format!(
        "SELECT {PLAN_COLUMNS} FROM travel_plans WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
