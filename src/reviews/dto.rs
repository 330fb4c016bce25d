use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(alias = "destinationId")]
    pub destination_id: Option<i64>,
    pub rating: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateReviewResponse {
    pub success: bool,
    pub review_id: i64,
    pub message: String,
    pub destination_rating: f64,
}
