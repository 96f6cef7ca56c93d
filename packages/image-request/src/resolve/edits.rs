use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::{Map, Value};

use crate::constants::EDITS_PARAM;
use crate::errors::RequestError;
use crate::request::{ImageRequestEvent, RequestType};

/// 編集名から編集値へのマッピング（挿入順を保持する）
pub type Edits = Map<String, Value>;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// クエリ文字列の `edits` パラメータから編集内容を取り出す
///
/// パラメータが無ければ空のマッピングを返す。
pub fn resolve_edits(
    event: &ImageRequestEvent,
    request_type: RequestType,
) -> Result<Edits, RequestError> {
    if request_type != RequestType::Default || !event.has_query() {
        return Ok(Edits::new());
    }

    match event.query_param(EDITS_PARAM) {
        Some(encoded) => decode_edits(encoded),
        None => Ok(Edits::new()),
    }
}

/// base64 エンコードされた JSON オブジェクトを復号する
pub fn decode_edits(encoded: &str) -> Result<Edits, RequestError> {
    // フォームデコードで `+` が空白になっている
    let encoded = encoded.replace(' ', "+");

    let bytes = STANDARD
        .decode(&encoded)
        .or_else(|_| URL_SAFE.decode(&encoded))
        .map_err(|e| RequestError::EditsParse(format!("invalid base64: {e}")))?;

    let text = String::from_utf8(bytes)
        .map_err(|e| RequestError::EditsParse(format!("invalid UTF-8: {e}")))?;

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(edits)) => Ok(edits),
        Ok(other) => Err(RequestError::EditsParse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(RequestError::EditsParse(format!("invalid JSON: {e}"))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
