/// ストレージ側に Content-Type が無い場合の既定値
pub const DEFAULT_CONTENT_TYPE: &str = "image";

/// ストレージ側に Cache-Control が無い場合の既定値（1年間の public キャッシュ）
pub const DEFAULT_CACHE_CONTROL: &str = "max-age=31536000,public";

/// 編集内容（base64 JSON）を受け取るクエリパラメータ名
pub const EDITS_PARAM: &str = "edits";

/// 自動 WebP 変換で Accept ヘッダから探す MIME タイプ
pub const WEBP_MIME: &str = "image/webp";

/// 品質指定キーとして扱うコーデック名
pub const QUALITY_CODECS: [&str; 5] = ["jpeg", "png", "webp", "tiff", "heif"];

/// HTTP-date (IMF-fixdate) の書式
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
