use crate::config::InterpreterConfig;
use crate::descriptor::{DescriptorBuilder, ImageRequest};
use crate::errors::RequestError;
use crate::request::{ImageRequestEvent, classify};
use crate::resolve::{resolve_bucket, resolve_edits, resolve_key, resolve_output_format};
use crate::storage::{ObjectStore, fetch_original};

/// 受信リクエストを ImageRequest へ解釈する
///
/// 各リクエストは独立して処理され、インタプリタ自体は状態を持たない。
pub struct ImageRequestInterpreter<S> {
    config: InterpreterConfig,
    store: S,
}

impl<S: ObjectStore> ImageRequestInterpreter<S> {
    pub fn new(config: InterpreterConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// 分類 → バケット → キー → 編集内容 → 取得 → 出力フォーマットの順に処理する
    ///
    /// 最初に失敗した段階のエラーをそのまま返す。
    pub async fn setup(&self, event: &ImageRequestEvent) -> Result<ImageRequest, RequestError> {
        let request_type = classify(event)?;
        let bucket = resolve_bucket(&self.config, event, request_type)?;
        let key = resolve_key(&self.config, event, request_type)?;
        let edits = resolve_edits(event, request_type)?;

        tracing::debug!(
            request_type = %request_type,
            bucket = %bucket,
            key = %key,
            edits = edits.len(),
            "resolved image request"
        );

        let original = fetch_original(&self.store, &bucket, &key).await?;

        let builder = DescriptorBuilder::new(request_type, bucket, key, edits);
        let negotiated = resolve_output_format(&self.config, event, builder.edits(), request_type);
        let request = builder.build(original, negotiated);

        tracing::info!(
            bucket = %request.bucket,
            key = %request.key,
            output_format = ?request.output_format,
            content_type = %request.content_type,
            "image request ready"
        );

        Ok(request)
    }
}
