use serde::Serialize;
use thiserror::Error;

/// 画像リクエスト解釈のエラー型
///
/// パイプラインは最初の失敗で停止し、呼び出し側はこの値をそのまま
/// HTTP レスポンスへ変換する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("no source buckets configured; set SOURCE_BUCKETS to a comma-separated list")]
    Configuration,

    #[error("cannot access bucket: {bucket}")]
    AccessDenied { bucket: String },

    #[error("cannot find bucket for request type {request_type}")]
    BucketNotFound { request_type: String },

    #[error("unrecognized request type")]
    UnrecognizedRequestType,

    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("edits could not be decoded: {0}")]
    EditsParse(String),

    #[error("{message}")]
    NotFound { code: String, message: String },

    #[error("{message}")]
    Storage { code: String, message: String },
}

impl RequestError {
    /// 対応する HTTP ステータスコード
    pub fn status(&self) -> u16 {
        match self {
            Self::Configuration | Self::UnrecognizedRequestType | Self::EditsParse(_) => 400,
            Self::AccessDenied { .. } => 403,
            Self::BucketNotFound { .. } | Self::ImageNotFound(_) | Self::NotFound { .. } => 404,
            Self::Storage { .. } => 500,
        }
    }

    /// 機械可読なエラーコード
    ///
    /// ストレージ由来のエラーは元のコードをそのまま返す。
    pub fn code(&self) -> &str {
        match self {
            Self::Configuration => "ConfigurationError",
            Self::AccessDenied { .. } => "AccessDenied",
            Self::BucketNotFound { .. } => "BucketNotFound",
            Self::UnrecognizedRequestType => "UnrecognizedRequestType",
            Self::ImageNotFound(_) => "ImageNotFound",
            Self::EditsParse(_) => "EditsParseError",
            Self::NotFound { code, .. } | Self::Storage { code, .. } => code,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            status: self.status(),
            code: self.code().to_string(),
            message: self.message(),
        }
    }
}

/// 呼び出し側へ返すエラーのワイヤ形式
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub code: String,
    pub message: String,
}

/// ストレージアクセスエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NoSuchKey { key: String },

    #[error("storage error ({code}): {message}")]
    Failed { code: String, message: String },
}

impl From<StorageError> for RequestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NoSuchKey { key } => RequestError::NotFound {
                code: "NoSuchKey".to_string(),
                message: format!("the specified key does not exist: {key}"),
            },
            StorageError::Failed { code, message } => RequestError::Storage { code, message },
        }
    }
}
