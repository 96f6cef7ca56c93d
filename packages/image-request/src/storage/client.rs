use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, HeaderMap, LAST_MODIFIED};

use crate::errors::StorageError;
use crate::storage::{ObjectStore, StoredObject};

/// Storage Proxy クライアント
///
/// `{base_url}/{bucket}/{key}` に GET を送り、レスポンスヘッダから
/// オブジェクトのメタデータを組み立てる。
#[derive(Clone)]
pub struct StorageProxyClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl StorageProxyClient {
    pub fn new(base_url: String, client_id: String, client_secret: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    /// 環境変数から StorageProxyClient を作成する
    ///
    /// 必須の環境変数:
    /// - STORAGE_PROXY_URL
    /// - STORAGE_PROXY_CLIENT_ID
    /// - STORAGE_PROXY_CLIENT_SECRET
    pub fn from_env() -> Result<Self, String> {
        let base_url = std::env::var("STORAGE_PROXY_URL")
            .map_err(|_| "STORAGE_PROXY_URL is not set".to_string())?;
        let client_id = std::env::var("STORAGE_PROXY_CLIENT_ID")
            .map_err(|_| "STORAGE_PROXY_CLIENT_ID is not set".to_string())?;
        let client_secret = std::env::var("STORAGE_PROXY_CLIENT_SECRET")
            .map_err(|_| "STORAGE_PROXY_CLIENT_SECRET is not set".to_string())?;

        Ok(Self::new(base_url, client_id, client_secret))
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        let key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}/{}", self.base_url, urlencoding::encode(bucket), key)
    }
}

#[async_trait]
impl ObjectStore for StorageProxyClient {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        let url = self.object_url(bucket, key);

        let response = self
            .client
            .get(&url)
            .header("CF-Access-Client-Id", &self.client_id)
            .header("CF-Access-Client-Secret", &self.client_secret)
            .send()
            .await
            .map_err(|e| StorageError::Failed {
                code: "RequestFailed".to_string(),
                message: e.to_string(),
            })?;

        match response.status() {
            status if status.is_success() => {}
            reqwest::StatusCode::NOT_FOUND => {
                return Err(StorageError::NoSuchKey {
                    key: key.to_string(),
                });
            }
            reqwest::StatusCode::FORBIDDEN => {
                tracing::error!(bucket = %bucket, key = %key, "access denied by Storage Proxy");
                return Err(StorageError::Failed {
                    code: "AccessDenied".to_string(),
                    message: "access denied by storage proxy".to_string(),
                });
            }
            status => {
                tracing::error!(
                    bucket = %bucket,
                    key = %key,
                    status = %status,
                    "unexpected response from Storage Proxy"
                );
                return Err(StorageError::Failed {
                    code: format!("HTTP{}", status.as_u16()),
                    message: format!("unexpected status: {status}"),
                });
            }
        }

        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| StorageError::Failed {
            code: "BodyReadFailed".to_string(),
            message: e.to_string(),
        })?;

        Ok(StoredObject {
            body,
            content_type: header_str(&headers, CONTENT_TYPE.as_str()),
            cache_control: header_str(&headers, CACHE_CONTROL.as_str()),
            last_modified: header_date(&headers, LAST_MODIFIED.as_str()),
            expires: header_date(&headers, EXPIRES.as_str()),
        })
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn header_date(headers: &HeaderMap, name: &str) -> Option<DateTime<Utc>> {
    header_str(headers, name).and_then(|value| parse_http_date(&value))
}

/// HTTP-date を解析する（解析できない値は None）
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> StorageProxyClient {
        StorageProxyClient::new(
            "https://storage.example.com/".to_string(),
            "client-id".to_string(),
            "client-secret".to_string(),
        )
    }

    #[test]
    fn test_new_client() {
        // 末尾のスラッシュが削除される
        assert_eq!(client().base_url, "https://storage.example.com");
    }

    #[test]
    fn test_object_url_encodes_segments() {
        assert_eq!(
            client().object_url("photos", "2024/my photo.jpg"),
            "https://storage.example.com/photos/2024/my%20photo.jpg"
        );
    }

    #[test]
    fn test_parse_http_date() {
        let expected = Utc.with_ymd_and_hms(1994, 11, 15, 8, 12, 31).unwrap();
        assert_eq!(parse_http_date("Tue, 15 Nov 1994 08:12:31 GMT"), Some(expected));
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn test_header_metadata() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "image/png".parse().unwrap());
        headers.insert(LAST_MODIFIED, "Tue, 15 Nov 1994 08:12:31 GMT".parse().unwrap());
        headers.insert(EXPIRES, "0".parse().unwrap());

        assert_eq!(header_str(&headers, "content-type").as_deref(), Some("image/png"));
        assert!(header_date(&headers, "last-modified").is_some());
        assert_eq!(header_date(&headers, "expires"), None);
        assert_eq!(header_str(&headers, "cache-control"), None);
    }
}
