use std::collections::HashMap;

use crate::domain::DomainError;

pub const FALLBACK_LANG: &str = "en";

const EN_YAML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/en.yaml"));
const ZH_YAML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/zh.yaml"));

/// Message catalogs, embedded at build time and parsed once at startup.
pub struct Catalog {
    locales: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn load() -> Result<Self, DomainError> {
        let mut locales = HashMap::new();
        for (lang, raw) in [("en", EN_YAML), ("zh", ZH_YAML)] {
            let messages: HashMap<String, String> = serde_yaml::from_str(raw)
                .map_err(|e| DomainError::internal(format!("locale {lang}: {e}")))?;
            locales.insert(lang.to_string(), messages);
        }
        Ok(Self { locales })
    }

    /// Resolves `key` in `lang`, falling back to English, then to the key itself.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.locales
            .get(lang)
            .and_then(|messages| messages.get(key))
            .or_else(|| {
                self.locales
                    .get(FALLBACK_LANG)
                    .and_then(|messages| messages.get(key))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Picks the language from an `Accept-Language` header: first tag, primary
/// subtag only (`zh-CN,zh;q=0.9` → `zh`).
pub fn negotiate(header: Option<&str>) -> String {
    header
        .and_then(|value| value.split(',').next())
        .and_then(|tag| tag.split(';').next())
        .and_then(|tag| tag.trim().split('-').next())
        .map(|primary| primary.to_ascii_lowercase())
        .filter(|primary| !primary.is_empty())
        .unwrap_or_else(|| FALLBACK_LANG.to_string())
}
