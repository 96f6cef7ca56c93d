use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::constants::{DEFAULT_CACHE_CONTROL, DEFAULT_CONTENT_TYPE, HTTP_DATE_FORMAT};
use crate::errors::RequestError;
use crate::storage::ObjectStore;

/// 取得済みのオリジナル画像とレスポンス用メタデータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalImage {
    pub body: Bytes,
    pub content_type: String,
    pub cache_control: String,
    pub last_modified: Option<String>,
    pub expires: Option<String>,
}

/// オリジナル画像を取得し、欠けているメタデータを既定値で補う
///
/// 日付は HTTP-date 形式に正規化し、無い場合は未設定のままにする。
pub async fn fetch_original<S>(
    store: &S,
    bucket: &str,
    key: &str,
) -> Result<OriginalImage, RequestError>
where
    S: ObjectStore + ?Sized,
{
    let object = store.get_object(bucket, key).await?;

    tracing::debug!(
        bucket = %bucket,
        key = %key,
        size = object.body.len(),
        "fetched original image"
    );

    Ok(OriginalImage {
        body: object.body,
        content_type: object
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        cache_control: object
            .cache_control
            .unwrap_or_else(|| DEFAULT_CACHE_CONTROL.to_string()),
        last_modified: object.last_modified.map(http_date),
        expires: object.expires.map(http_date),
    })
}

pub fn http_date(date: DateTime<Utc>) -> String {
    date.format(HTTP_DATE_FORMAT).to_string()
}
