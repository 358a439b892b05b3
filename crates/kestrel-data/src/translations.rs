//! Sector label localization.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Static map from a raw sector label to a localized label.
///
/// Labels without an entry translate to themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorTranslations {
    map: HashMap<String, String>,
}

impl SectorTranslations {
    /// Table with no entries; every label passes through.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build a table from an existing map.
    pub const fn from_map(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    /// Load a JSON object of `"raw label": "localized label"` pairs.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let map: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(Self { map })
    }

    /// Localized label, or `label` itself when unmapped.
    pub fn translate<'a>(&'a self, label: &'a str) -> &'a str {
        self.map.get(label).map_or(label, String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_and_fallback() {
        let table = SectorTranslations::from_map(HashMap::from([(
            "Finance".to_string(),
            "金融".to_string(),
        )]));
        assert_eq!(table.translate("Finance"), "金融");
        assert_eq!(table.translate("Utilities"), "Utilities");
    }

    #[test]
    fn test_identity() {
        let table = SectorTranslations::identity();
        assert!(table.is_empty());
        assert_eq!(table.translate("Energy Minerals"), "Energy Minerals");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "kestrel-sector-translations-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{"Technology Services": "技术服务", "Retail Trade": "零售业"}"#)
            .unwrap();

        let table = SectorTranslations::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.translate("Retail Trade"), "零售业");

        fs::remove_file(path).ok();
    }
}
