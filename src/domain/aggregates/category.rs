//! Category Aggregate

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{CategorySource, MagentoCategoryId, NativeCategoryId, SourceError};

/// A row of the `categories` table as the storage layer returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub source: Option<String>,
    pub magento_category_id: Option<i64>,
}

impl CategoryRecord {
    pub fn native(id: i64, name: impl Into<String>, parent_id: Option<i64>) -> Self {
        Self { id, name: name.into(), parent_id, source: Some("native".into()), magento_category_id: None }
    }

    pub fn magento(id: i64, magento_category_id: i64, name: impl Into<String>, parent_id: Option<i64>) -> Self {
        Self { id, name: name.into(), parent_id, source: Some("magento".into()), magento_category_id: Some(magento_category_id) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeCategory {
    pub id: NativeCategoryId,
    pub name: String,
    pub parent_id: Option<NativeCategoryId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagentoCategory {
    /// Row key in the `categories` table; not used for linkage.
    pub id: i64,
    pub magento_category_id: MagentoCategoryId,
    pub name: String,
    pub parent_id: Option<MagentoCategoryId>,
}

/// A validated category, tagged by the taxonomy whose identifier space its
/// `parent_id` resolves against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Category {
    Native(NativeCategory),
    Magento(MagentoCategory),
}

impl TryFrom<CategoryRecord> for Category {
    type Error = RowError;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        let source = match record.source.as_deref() {
            None => CategorySource::Native,
            Some(label) => CategorySource::parse(label)?,
        };
        match source {
            CategorySource::Native => Ok(Self::Native(NativeCategory {
                id: NativeCategoryId::new(record.id),
                name: record.name,
                parent_id: record.parent_id.map(NativeCategoryId::new),
            })),
            CategorySource::Magento => {
                let magento_category_id = record.magento_category_id.ok_or(RowError::MissingMagentoId { id: record.id })?;
                Ok(Self::Magento(MagentoCategory {
                    id: record.id,
                    magento_category_id: MagentoCategoryId::new(magento_category_id),
                    name: record.name,
                    parent_id: record.parent_id.map(MagentoCategoryId::new),
                }))
            }
        }
    }
}

/// Why a stored row could not be turned into a [`Category`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("magento row {id} has no magento_category_id")]
    MissingMagentoId { id: i64 },

    #[error("duplicate {taxonomy} category id {key}")]
    DuplicateId { taxonomy: CategorySource, key: i64 },
}
