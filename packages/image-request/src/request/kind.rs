use std::fmt;

use serde::Serialize;

use crate::errors::RequestError;
use crate::request::ImageRequestEvent;

/// リクエストのパス形式の分類
///
/// 現在解釈できるのは `Default` のみ。`Thumbor` と `Custom` は予約値。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestType {
    Default,
    Thumbor,
    Custom,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Thumbor => "Thumbor",
            Self::Custom => "Custom",
        }
    }

    /// 品質キーの付け替えを行う分類か
    pub fn remaps_quality(&self) -> bool {
        matches!(self, Self::Thumbor | Self::Custom)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// リクエストを分類する
///
/// パスのプレフィックスによる振り分けは未実装のため常に `Default` を返す。
pub fn classify(_event: &ImageRequestEvent) -> Result<RequestType, RequestError> {
    Ok(RequestType::Default)
}
