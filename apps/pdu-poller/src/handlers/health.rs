use api_contract::HealthDto;
use axum::{Json, response::IntoResponse};

pub async fn health() -> impl IntoResponse {
    Json(HealthDto {
        ok: true,
        time_ms: domain::now_epoch_ms(),
    })
}
