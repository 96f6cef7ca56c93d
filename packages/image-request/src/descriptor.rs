use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::constants::QUALITY_CODECS;
use crate::request::RequestType;
use crate::resolve::Edits;
use crate::resolve::format::string_edit;
use crate::storage::OriginalImage;

/// 検証済みの画像リクエスト
///
/// リクエストごとに生成され、変換エンジンへ渡したら破棄される。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub request_type: RequestType,
    pub bucket: String,
    pub key: String,
    pub edits: Edits,
    #[serde(serialize_with = "serialize_base64")]
    pub original_image: Bytes,
    pub content_type: String,
    pub cache_control: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    pub output_format: Option<String>,
}

fn serialize_base64<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64_STANDARD.encode(body))
}

/// 取得前に確定した値から ImageRequest を組み立てる
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    request_type: RequestType,
    bucket: String,
    key: String,
    edits: Edits,
}

impl DescriptorBuilder {
    pub fn new(request_type: RequestType, bucket: String, key: String, edits: Edits) -> Self {
        Self {
            request_type,
            bucket,
            key,
            edits,
        }
    }

    pub fn edits(&self) -> &Edits {
        &self.edits
    }

    /// 取得結果とネゴシエーション結果から最終的な記述子を作る
    ///
    /// `edits.toFormat` はネゴシエーション結果より優先される。
    pub fn build(self, original: OriginalImage, negotiated: Option<String>) -> ImageRequest {
        let Self {
            request_type,
            bucket,
            key,
            mut edits,
        } = self;

        let output_format = string_edit(&edits, "toFormat").or(negotiated);

        let content_type = match &output_format {
            Some(format) => {
                if request_type.remaps_quality() {
                    normalize_quality_key(&mut edits, format);
                }
                format!("image/{format}")
            }
            None => original.content_type,
        };

        ImageRequest {
            request_type,
            bucket,
            key,
            edits,
            original_image: original.body,
            content_type,
            cache_control: original.cache_control,
            last_modified: original.last_modified,
            expires: original.expires,
            output_format,
        }
    }
}

/// 古いコーデック名の品質キーを出力フォーマット名のキーへ付け替える
///
/// 付け替えは最初に見つかった1件のみ。付け替えた場合は true。
pub fn normalize_quality_key(edits: &mut Edits, format: &str) -> bool {
    if !QUALITY_CODECS.contains(&format) {
        return false;
    }

    let stale = edits
        .keys()
        .find(|key| key.as_str() != format && QUALITY_CODECS.contains(&key.as_str()))
        .cloned();

    match stale.and_then(|key| edits.shift_remove(&key).map(|value| (key, value))) {
        Some((key, value)) => {
            tracing::debug!(from = %key, to = %format, "remapped quality key");
            edits.insert(format.to_string(), value);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn edits(value: Value) -> Edits {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn original() -> OriginalImage {
        OriginalImage {
            body: Bytes::from_static(b"\x89PNG"),
            content_type: "image/png".to_string(),
            cache_control: "max-age=31536000,public".to_string(),
            last_modified: None,
            expires: None,
        }
    }

    fn builder(request_type: RequestType, edits: Edits) -> DescriptorBuilder {
        DescriptorBuilder::new(
            request_type,
            "photos".to_string(),
            "a.png".to_string(),
            edits,
        )
    }

    #[test]
    fn test_to_format_remaps_quality_for_custom() {
        let request = builder(RequestType::Custom, edits(json!({"jpeg": 80, "toFormat": "webp"})))
            .build(original(), None);

        assert_eq!(request.edits.get("webp"), Some(&json!(80)));
        assert!(!request.edits.contains_key("jpeg"));
        assert_eq!(request.content_type, "image/webp");
        assert_eq!(request.output_format.as_deref(), Some("webp"));
    }

    #[test]
    fn test_to_format_overrides_negotiation() {
        let request = builder(RequestType::Default, edits(json!({"toFormat": "png"})))
            .build(original(), Some("webp".to_string()));

        assert_eq!(request.output_format.as_deref(), Some("png"));
        assert_eq!(request.content_type, "image/png");
    }

    #[test]
    fn test_default_request_keeps_quality_keys() {
        let request = builder(RequestType::Default, edits(json!({"jpeg": 80})))
            .build(original(), Some("webp".to_string()));

        assert_eq!(request.edits.get("jpeg"), Some(&json!(80)));
        assert!(!request.edits.contains_key("webp"));
        assert_eq!(request.content_type, "image/webp");
    }

    #[test]
    fn test_no_format_keeps_original_content_type() {
        let request = builder(RequestType::Default, Edits::new()).build(original(), None);

        assert_eq!(request.output_format, None);
        assert_eq!(request.content_type, "image/png");
        assert_eq!(request.original_image, Bytes::from_static(b"\x89PNG"));
    }

    #[test]
    fn test_normalize_only_first_stale_key() {
        let mut edits = edits(json!({"resize": {}, "png": 9, "tiff": 70}));
        assert!(normalize_quality_key(&mut edits, "jpeg"));

        assert_eq!(edits.get("jpeg"), Some(&json!(9)));
        assert_eq!(edits.get("tiff"), Some(&json!(70)));
        assert!(!edits.contains_key("png"));
    }

    #[test]
    fn test_normalize_keeps_edit_order() {
        let mut edits = edits(json!({
            "jpeg": 80,
            "resize": {"width": 100},
            "rotate": 90,
            "toFormat": "webp"
        }));
        assert!(normalize_quality_key(&mut edits, "webp"));

        let keys: Vec<&str> = edits.keys().map(String::as_str).collect();
        assert_eq!(keys, ["resize", "rotate", "toFormat", "webp"]);
    }

    #[test]
    fn test_normalize_unknown_format_or_matching_key() {
        let mut unknown = edits(json!({"jpeg": 80}));
        assert!(!normalize_quality_key(&mut unknown, "avif"));
        assert_eq!(unknown.get("jpeg"), Some(&json!(80)));

        let mut matching = edits(json!({"webp": 80}));
        assert!(!normalize_quality_key(&mut matching, "webp"));
        assert_eq!(matching.len(), 1);
    }

    #[test]
    fn test_serialize_for_engine() {
        let request = builder(RequestType::Default, edits(json!({"toFormat": "webp"})))
            .build(original(), None);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["requestType"], "Default");
        assert_eq!(value["originalImage"], "iVBORw==");
        assert_eq!(value["contentType"], "image/webp");
        assert!(value.get("lastModified").is_none());
    }
}
