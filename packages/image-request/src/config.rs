use regex::Regex;

use crate::errors::RequestError;

/// 画像リクエスト解釈の設定
///
/// 起動時に一度だけ読み込み、インタプリタの生成時に渡す。
#[derive(Debug, Clone, Default)]
pub struct InterpreterConfig {
    /// カンマ区切りの許可バケット一覧（SOURCE_BUCKETS）
    pub source_buckets: Option<String>,
    /// パスの先頭から取り除くプレフィックス（PATH_PREFIX）
    pub path_prefix: String,
    /// Accept ヘッダによる WebP 自動選択（AUTO_WEBP）
    pub auto_webp: bool,
}

impl InterpreterConfig {
    /// 環境変数から設定を作成する
    ///
    /// 参照する環境変数:
    /// - SOURCE_BUCKETS
    /// - PATH_PREFIX
    /// - AUTO_WEBP
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            source_buckets: lookup("SOURCE_BUCKETS"),
            path_prefix: lookup("PATH_PREFIX").unwrap_or_default(),
            auto_webp: lookup("AUTO_WEBP").is_some_and(|v| parse_flag(&v)),
        }
    }

    /// 許可バケット一覧を解析する
    ///
    /// SOURCE_BUCKETS が未設定、または空エントリしか無い場合は設定エラー。
    pub fn source_buckets(&self) -> Result<SourceBuckets, RequestError> {
        let raw = self
            .source_buckets
            .as_deref()
            .ok_or(RequestError::Configuration)?;
        SourceBuckets::parse(raw)
    }

    /// パスからプレフィックスを取り除く（空なら何もしない）
    pub fn strip_prefix<'a>(&self, path: &'a str) -> &'a str {
        if self.path_prefix.is_empty() {
            return path;
        }
        path.strip_prefix(self.path_prefix.as_str()).unwrap_or(path)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "true" | "1" | "on"
    )
}

/// 許可されたソースバケット一覧
#[derive(Debug, Clone)]
pub struct SourceBuckets {
    entries: Vec<String>,
    /// 先頭エントリを全体一致の正規表現としてコンパイルしたもの
    pattern: Option<Regex>,
}

impl PartialEq for SourceBuckets {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for SourceBuckets {}

impl SourceBuckets {
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let entries: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();

        if entries.is_empty() {
            return Err(RequestError::Configuration);
        }

        // 正規表現として不正な先頭エントリは完全一致のみで評価する
        let pattern = Regex::new(&format!("^(?:{})$", entries[0])).ok();
        Ok(Self { entries, pattern })
    }

    /// バケット省略時に使う既定バケット（先頭エントリ）
    pub fn default_bucket(&self) -> &str {
        &self.entries[0]
    }

    /// 一覧に完全一致するか、先頭エントリを正規表現として全体一致すれば許可する
    pub fn allows(&self, bucket: &str) -> bool {
        if self.entries.iter().any(|entry| entry == bucket) {
            return true;
        }
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(bucket))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> InterpreterConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        InterpreterConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_from_lookup() {
        let config = config_from(&[
            ("SOURCE_BUCKETS", "photos, archive"),
            ("PATH_PREFIX", "/images"),
            ("AUTO_WEBP", "Yes"),
        ]);

        assert_eq!(config.source_buckets.as_deref(), Some("photos, archive"));
        assert_eq!(config.path_prefix, "/images");
        assert!(config.auto_webp);
    }

    #[test]
    fn test_auto_webp_flag_values() {
        assert!(config_from(&[("AUTO_WEBP", "true")]).auto_webp);
        assert!(config_from(&[("AUTO_WEBP", "ON")]).auto_webp);
        assert!(!config_from(&[("AUTO_WEBP", "No")]).auto_webp);
        assert!(!config_from(&[]).auto_webp);
    }

    #[test]
    fn test_missing_source_buckets() {
        let config = config_from(&[]);
        assert_eq!(config.source_buckets(), Err(RequestError::Configuration));

        let config = config_from(&[("SOURCE_BUCKETS", " , ")]);
        assert_eq!(config.source_buckets(), Err(RequestError::Configuration));
    }

    #[test]
    fn test_source_buckets_trim_whitespace() {
        let buckets = SourceBuckets::parse(" photos ,archive,  thumbs").unwrap();
        assert_eq!(buckets.entries(), ["photos", "archive", "thumbs"]);
        assert_eq!(buckets.default_bucket(), "photos");
    }

    #[test]
    fn test_allows_members_and_first_entry_pattern() {
        let buckets = SourceBuckets::parse("photos-.*,archive").unwrap();
        assert!(buckets.pattern.is_some());
        assert!(buckets.allows("archive"));
        assert!(buckets.allows("photos-2024"));
        assert!(!buckets.allows("other"));
        // パターンは全体一致のみ
        assert!(!buckets.allows("x-photos-2024"));
    }

    #[test]
    fn test_invalid_pattern_only_matches_exactly() {
        let buckets = SourceBuckets::parse("bad[,archive").unwrap();
        assert!(buckets.pattern.is_none());
        assert!(buckets.allows("bad["));
        assert!(!buckets.allows("bad"));
    }

    #[test]
    fn test_strip_prefix() {
        let config = config_from(&[("PATH_PREFIX", "/images")]);
        assert_eq!(config.strip_prefix("/images/photos/a.jpg"), "/photos/a.jpg");
        assert_eq!(config.strip_prefix("/photos/a.jpg"), "/photos/a.jpg");

        let config = config_from(&[]);
        assert_eq!(config.strip_prefix("/photos/a.jpg"), "/photos/a.jpg");
    }
}
