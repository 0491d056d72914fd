//! Generation record and history query models.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tone recorded when the caller does not supply one.
pub const DEFAULT_TONE: &str = "friendly";

/// One persisted generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRecord {
    /// Store-assigned identifier; increases with every insert and is never reused.
    pub id: i64,
    /// Subject of the ad.
    pub product: String,
    /// Requested tone.
    pub tone: String,
    /// Model output, written once at creation.
    pub generated_text: String,
    /// Insert time taken from the store clock.
    pub created_at: DateTime<Utc>,
}

/// Offset-paged history query, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Maximum number of records to return; must be positive.
    pub limit: i64,
    /// Number of records to skip; must not be negative.
    pub offset: i64,
    /// Case-insensitive substring filter on `product`.
    pub product: Option<String>,
}

impl HistoryQuery {
    /// First page of `limit` records with no filter.
    pub fn first(limit: i64) -> Self {
        Self {
            limit,
            offset: 0,
            product: None,
        }
    }

    /// Replace the offset.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Restrict results to products containing `filter`.
    pub fn product(mut self, filter: impl Into<String>) -> Self {
        self.product = Some(filter.into());
        self
    }

    /// The query for the page directly after this one.
    pub fn next_page(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            ..self.clone()
        }
    }

    /// Reject non-positive limits and negative offsets.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.limit <= 0 {
            return Err(StoreError::InvalidArgument(format!(
                "limit must be a positive integer (got {})",
                self.limit
            )));
        }
        if self.offset < 0 {
            return Err(StoreError::InvalidArgument(format!(
                "offset must not be negative (got {})",
                self.offset
            )));
        }
        Ok(())
    }

    /// Lower-cased filter, with blank filters treated as absent.
    pub(crate) fn folded_product(&self) -> Option<String> {
        self.product
            .as_deref()
            .map(str::trim)
            .filter(|filter| !filter.is_empty())
            .map(str::to_lowercase)
    }
}

/// Fold a product name for case-insensitive matching.
pub(crate) fn fold_product(product: &str) -> String {
    product.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::HistoryQuery;
    use crate::StoreError;
    use pretty_assertions::assert_eq;

    #[test]
    fn validate_rejects_non_positive_limit() {
        for limit in [0, -1, i64::MIN] {
            let err = HistoryQuery::first(limit).validate().unwrap_err();
            assert!(matches!(err, StoreError::InvalidArgument(_)), "{err:?}");
        }
    }

    #[test]
    fn validate_rejects_negative_offset() {
        let err = HistoryQuery::first(10).offset(-1).validate().unwrap_err();
        assert!(format!("{err}").contains("offset"));
    }

    #[test]
    fn next_page_advances_by_limit() {
        let query = HistoryQuery::first(5).offset(10).product("acme");
        let next = query.next_page();
        assert_eq!(next.offset, 15);
        assert_eq!(next.limit, 5);
        assert_eq!(next.product.as_deref(), Some("acme"));
    }

    #[test]
    fn blank_filter_is_ignored() {
        assert_eq!(HistoryQuery::first(1).product("   ").folded_product(), None);
        assert_eq!(
            HistoryQuery::first(1).product(" ProconAI ").folded_product(),
            Some("proconai".to_string())
        );
    }
}
