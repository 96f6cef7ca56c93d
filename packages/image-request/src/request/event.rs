use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// HTTP プロキシ形式の受信リクエスト
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequestEvent {
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headers: HashMap<String, String>,
}

/// `null` を空のマップとして読む
fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ImageRequestEvent {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// クエリパラメータを取得する（マップ自体が無い場合も None）
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    pub fn has_query(&self) -> bool {
        self.query_string_parameters
            .as_ref()
            .is_some_and(|params| !params.is_empty())
    }

    /// Accept ヘッダ（`Accept` を優先し、無ければ小文字の `accept`）
    pub fn accept(&self) -> Option<&str> {
        self.headers
            .get("Accept")
            .or_else(|| self.headers.get("accept"))
            .map(String::as_str)
    }
}
