use crate::config::InterpreterConfig;
use crate::errors::RequestError;
use crate::request::{ImageRequestEvent, RequestType};

/// リクエストパスからオブジェクトキーを決定する
///
/// フラグメントとクエリの残骸を除去し、先頭セグメント（バケット）を除いた
/// 残りを `/` で連結してURLデコードする。
pub fn resolve_key(
    config: &InterpreterConfig,
    event: &ImageRequestEvent,
    request_type: RequestType,
) -> Result<String, RequestError> {
    if request_type != RequestType::Default {
        return Err(RequestError::ImageNotFound(format!(
            "request type {request_type} does not carry a key"
        )));
    }

    let path = config.strip_prefix(&event.path);
    let path = path.split('#').next().unwrap_or_default();
    let path = path.split('?').next().unwrap_or_default();
    let path = path.strip_prefix('/').unwrap_or(path);

    let key = path.split('/').skip(1).collect::<Vec<_>>().join("/");
    if key.is_empty() {
        return Err(RequestError::ImageNotFound(
            "no object key in request path".to_string(),
        ));
    }

    let decoded = urlencoding::decode(&key)
        .map_err(|_| RequestError::ImageNotFound(format!("invalid URL encoding: {key}")))?;

    Ok(decoded.into_owned())
}
