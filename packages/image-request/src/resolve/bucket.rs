use crate::config::InterpreterConfig;
use crate::errors::RequestError;
use crate::request::{ImageRequestEvent, RequestType};

/// リクエストパスからソースバケットを決定する
///
/// 先頭セグメントが空ならホワイトリスト先頭の既定バケットを使う。
pub fn resolve_bucket(
    config: &InterpreterConfig,
    event: &ImageRequestEvent,
    request_type: RequestType,
) -> Result<String, RequestError> {
    if request_type != RequestType::Default {
        return Err(RequestError::BucketNotFound {
            request_type: request_type.to_string(),
        });
    }

    let buckets = config.source_buckets()?;
    let path = config.strip_prefix(&event.path);
    let candidate = path
        .strip_prefix('/')
        .unwrap_or(path)
        .split('/')
        .next()
        .unwrap_or_default();

    if candidate.is_empty() {
        tracing::debug!(bucket = %buckets.default_bucket(), "no bucket in path, using default");
        return Ok(buckets.default_bucket().to_string());
    }

    if !buckets.allows(candidate) {
        tracing::debug!(bucket = %candidate, "bucket is not in SOURCE_BUCKETS");
        return Err(RequestError::AccessDenied {
            bucket: candidate.to_string(),
        });
    }

    Ok(candidate.to_string())
}
