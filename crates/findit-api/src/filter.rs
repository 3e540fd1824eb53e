//! Listing filter state and its query-string projection.

use crate::models::ItemType;

/// Filter inputs for the listing endpoints.
///
/// Lives only as long as the listing view that owns it; the query string
/// is a pure function of this record via [`query_pairs`](Self::query_pairs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Free-text search over title, description, and location.
    pub search: String,
    /// Restrict to lost or found items; `None` means both.
    pub item_type: Option<ItemType>,
    /// Restrict to a single category id.
    pub category_id: Option<String>,
}

impl FilterSpec {
    /// `true` when no filter field is set.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.item_type.is_none() && self.category_id.is_none()
    }

    /// Reset every field (the listing error/empty states offer this).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Overwrite only the search term, leaving type and category untouched.
    ///
    /// This is the sync point for externally-driven search (the search bar
    /// or a search deep-link) onto an already-filtered listing.
    pub fn apply_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// The non-empty filter fields as query parameters, in the order the
    /// listing endpoints document them: `search`, `type`, `category`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(item_type) = self.item_type {
            pairs.push(("type", item_type.to_string()));
        }
        if let Some(ref category_id) = self.category_id {
            pairs.push(("category", category_id.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_produces_no_pairs() {
        let filter = FilterSpec::default();
        assert!(filter.is_empty());
        assert!(filter.query_pairs().is_empty());
    }

    #[test]
    fn full_filter_produces_all_pairs_in_order() {
        let filter = FilterSpec {
            search: "wallet".into(),
            item_type: Some(ItemType::Lost),
            category_id: Some("3".into()),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("search", "wallet".to_owned()),
                ("type", "lost".to_owned()),
                ("category", "3".to_owned()),
            ]
        );
    }

    #[test]
    fn apply_search_leaves_other_fields_alone() {
        let mut filter = FilterSpec {
            search: "old".into(),
            item_type: Some(ItemType::Found),
            category_id: Some("7".into()),
        };
        filter.apply_search("wallet");
        assert_eq!(filter.search, "wallet");
        assert_eq!(filter.item_type, Some(ItemType::Found));
        assert_eq!(filter.category_id.as_deref(), Some("7"));
    }

    #[test]
    fn clear_resets_everything() {
        let mut filter = FilterSpec {
            search: "keys".into(),
            item_type: Some(ItemType::Lost),
            category_id: None,
        };
        filter.clear();
        assert!(filter.is_empty());
    }
}
