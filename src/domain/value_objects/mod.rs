//! Value Objects for the category catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a category in the native (platform-owned) taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeCategoryId(i64);

impl NativeCategoryId {
    pub fn new(value: i64) -> Self { Self(value) }
    pub fn value(&self) -> i64 { self.0 }
}

impl From<NativeCategoryId> for i64 {
    fn from(id: NativeCategoryId) -> Self { id.0 }
}

/// Foreign identifier of a category mirrored from Magento.
///
/// Lives in its own identifier space: a `MagentoCategoryId(5)` and a
/// `NativeCategoryId(5)` name unrelated categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MagentoCategoryId(i64);

impl MagentoCategoryId {
    pub fn new(value: i64) -> Self { Self(value) }
    pub fn value(&self) -> i64 { self.0 }
}

impl From<MagentoCategoryId> for i64 {
    fn from(id: MagentoCategoryId) -> Self { id.0 }
}

/// Which taxonomy a stored category row belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    #[default]
    Native,
    Magento,
}

impl CategorySource {
    /// Stored `source` labels, after trimming spaces and lowercasing. Rows
    /// written by the storefront carry `redington` or `medusa`; both belong to
    /// the native taxonomy. The `categories` CHECK constraint lists the same set.
    pub const LABELS: [(&'static str, CategorySource); 4] = [
        ("native", Self::Native),
        ("redington", Self::Native),
        ("medusa", Self::Native),
        ("magento", Self::Magento),
    ];

    /// Parses the stored `source` label, normalized the way the schema's
    /// `lower(btrim(source))` does.
    pub fn parse(label: &str) -> Result<Self, SourceError> {
        let label = label.trim_matches(' ');
        if label.is_empty() { return Err(SourceError::Empty); }
        let normalized = label.to_ascii_lowercase();
        Self::LABELS
            .iter()
            .find(|(known, _)| *known == normalized)
            .map(|&(_, source)| source)
            .ok_or_else(|| SourceError::Unknown(label.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self { Self::Native => "native", Self::Magento => "magento" }
    }
}

impl fmt::Display for CategorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum SourceError { Empty, Unknown(String) }
impl std::error::Error for SourceError {}
impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Empty => write!(f, "source empty"), Self::Unknown(s) => write!(f, "unknown source '{}'", s) }
    }
}
