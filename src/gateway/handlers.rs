use axum::{
    Extension, Json,
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::dispatcher::Gateway;
use super::types::WriteResponse;
use crate::node::protocol::{decode_batch, encode_search_result};

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// `POST /` with a JSON object of string keys and values.
pub async fn handle_write(Extension(gateway): Extension<Arc<Gateway>>, body: String) -> Response {
    let batch = match decode_batch(&body) {
        Ok(batch) => batch,
        Err(e) => {
            tracing::error!("Rejected write: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let outcome = gateway.write_batch(batch).await;
    (StatusCode::OK, Json(WriteResponse::from(&outcome))).into_response()
}

/// `GET /{key}`: `{"key": "value"}` on a hit, 404 on a miss, 500 if the owning
/// shard could not be asked.
pub async fn handle_get(
    Extension(gateway): Extension<Arc<Gateway>>,
    Path(key): Path<String>,
) -> Response {
    match gateway.get(&key).await {
        Ok(Some(value)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, JSON_UTF8)],
            encode_search_result(&key, Some(&value)),
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// `DELETE /{key}`: the deleted count as plain text.
pub async fn handle_delete(
    Extension(gateway): Extension<Arc<Gateway>>,
    Path(key): Path<String>,
) -> Response {
    match gateway.delete(&key).await {
        Ok(deleted) => (StatusCode::OK, deleted.to_string()).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
