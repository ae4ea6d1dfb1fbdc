//! String retrieval handler.

use axum::{
    Extension,
    body::Bytes,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use keeper_core::StringRequest;
use tracing::debug;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const RAW_CONTENT_TYPE: &str = "application/octet-stream";

/// Handler for POST /
///
/// Reads a [`StringRequest`] from the JSON body and returns the file,
/// rendered with `envs` unless `raw_data` is set. An empty body is the
/// default (and therefore invalid) request.
pub async fn get_string(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = parse_request(&body)?.normalized()?;

    if state.acl().auth_enabled {
        user.check_bucket_access(&request)?;
    }

    debug!(
        namespace = %request.namespace,
        bucket = %request.bucket,
        file = %request.file,
        revision = request.revision().unwrap_or("-"),
        "Fetching string"
    );

    let content_type = if request.raw_data {
        RAW_CONTENT_TYPE
    } else {
        TEXT_CONTENT_TYPE
    };
    let content = state.backend().fetch(request).await?;

    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
        content,
    )
        .into_response())
}

fn parse_request(body: &[u8]) -> Result<StringRequest, AppError> {
    if body.is_empty() {
        return Ok(StringRequest::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("unmarshal post body to struct failed, err: {e}")))
}
