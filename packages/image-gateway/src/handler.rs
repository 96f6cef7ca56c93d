use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header::{ACCEPT, CACHE_CONTROL, EXPIRES, LAST_MODIFIED};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::AppState;
use image_request::{ImageRequest, ImageRequestEvent, RequestError};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// リクエストを解釈し、変換エンジン向けの記述子を JSON で返す
pub async fn interpret(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let event = to_event(&uri, &headers, params);

    tracing::info!(path = %event.path, "interpreting image request");
    let request = state.interpreter.setup(&event).await?;

    let mut response_headers = HeaderMap::new();
    insert_header(&mut response_headers, CACHE_CONTROL, Some(&request.cache_control));
    insert_header(&mut response_headers, LAST_MODIFIED, request.last_modified.as_deref());
    insert_header(&mut response_headers, EXPIRES, request.expires.as_deref());

    Ok((StatusCode::OK, response_headers, Json::<ImageRequest>(request)).into_response())
}

/// axum のリクエストを HTTP プロキシ形式のイベントへ変換する
fn to_event(uri: &Uri, headers: &HeaderMap, params: HashMap<String, String>) -> ImageRequestEvent {
    let mut event = ImageRequestEvent::new(uri.path());
    if !params.is_empty() {
        event.query_string_parameters = Some(params);
    }
    if let Some(accept) = headers.get(ACCEPT).and_then(|v| v.to_str().ok()) {
        event.headers.insert("Accept".to_string(), accept.to_string());
    }
    event
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: Option<&str>) {
    if let Some(value) = value.and_then(|v| HeaderValue::from_str(v).ok()) {
        headers.insert(name, value);
    }
}

#[derive(Debug)]
pub struct AppError(RequestError);

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        if err.is_client_error() {
            tracing::warn!(code = %err.code(), error = %err, "rejected image request");
        } else {
            tracing::error!(code = %err.code(), error = %err, "image request failed");
        }
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.to_body())).into_response()
    }
}
