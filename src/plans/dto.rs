use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePlanRequest {
    #[serde(default, alias = "destination_ids")]
    pub destinations: Vec<i64>,
    #[serde(default, alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default, alias = "route_data")]
    pub route: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SavePlanResponse {
    pub success: bool,
    pub plan_id: i64,
    pub message: String,
}
