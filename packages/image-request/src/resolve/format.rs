use serde_json::Value;

use crate::config::InterpreterConfig;
use crate::constants::WEBP_MIME;
use crate::request::{ImageRequestEvent, RequestType};
use crate::resolve::Edits;

/// コンテンツネゴシエーションで出力フォーマットを決定する
///
/// AUTO_WEBP が有効で Accept に `image/webp` を含めば `webp`。
/// それ以外は `Default` のときだけ `edits.outputFormat` を参照する。
/// `edits.toFormat` による上書きは組み立て時に適用される。
pub fn resolve_output_format(
    config: &InterpreterConfig,
    event: &ImageRequestEvent,
    edits: &Edits,
    request_type: RequestType,
) -> Option<String> {
    let accepts_webp = event
        .accept()
        .is_some_and(|accept| accept.contains(WEBP_MIME));

    if config.auto_webp && accepts_webp {
        return Some("webp".to_string());
    }

    if request_type == RequestType::Default {
        return string_edit(edits, "outputFormat");
    }

    None
}

/// 文字列値の編集項目を取り出す（null や空文字は未指定扱い）
pub(crate) fn string_edit(edits: &Edits, name: &str) -> Option<String> {
    match edits.get(name) {
        Some(Value::String(value)) if !value.is_empty() => Some(value.clone()),
        _ => None,
    }
}
