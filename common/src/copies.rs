//! Printed copy requirements per document type.
//!
//! Agency policy says how many physical copies each document needs inside a
//! given category packet. One table serves both the standard export and the
//! export with user-chosen copy counts.

use std::collections::BTreeMap;

use crate::model::{CategoryView, DocumentCategory};

pub const MIN_COPIES: u32 = 1;
pub const MAX_COPIES: u32 = 10;

/// Global fallback when a category has no entry and no default.
pub const DEFAULT_COPIES: u32 = 1;

/// (category, category default, [(document title, copies)])
type PolicyRow = (DocumentCategory, Option<u32>, &'static [(&'static str, u32)]);

const AGENCY_POLICY: &[PolicyRow] = &[
    (
        DocumentCategory::Admission,
        Some(1),
        &[
            ("Intake Summary", 1),
            ("Client Rights Acknowledgement", 2),
            ("Authorization to Release Information", 2),
        ],
    ),
    (
        DocumentCategory::Placement,
        Some(2),
        &[
            ("Placement Agreement", 3),
            ("Consent for Medical Treatment", 2),
            ("Client Rights Acknowledgement", 2),
        ],
    ),
    (
        DocumentCategory::Medical,
        Some(1),
        &[
            ("Consent for Medical Treatment", 3),
            ("Authorization to Release Information", 2),
        ],
    ),
    (
        DocumentCategory::Legal,
        Some(2),
        &[
            ("Authorization to Release Information", 3),
            ("Placement Agreement", 4),
        ],
    ),
    (DocumentCategory::Discharge, None, &[("Discharge Summary", 2)]),
];

#[derive(Debug, Clone, Default, PartialEq)]
struct CategoryCopies {
    default: Option<u32>,
    /// Keyed by lower-cased, trimmed title.
    titles: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CopyCountTable {
    categories: BTreeMap<DocumentCategory, CategoryCopies>,
}

impl Default for CopyCountTable {
    fn default() -> Self {
        Self::agency_policy()
    }
}

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

pub fn clamp_copies(count: u32) -> u32 {
    count.clamp(MIN_COPIES, MAX_COPIES)
}

impl CopyCountTable {
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    pub fn agency_policy() -> Self {
        let mut table = Self::empty();
        for (category, default, titles) in AGENCY_POLICY {
            if let Some(default) = default {
                table.set_default(*category, *default);
            }
            for (title, copies) in titles.iter() {
                table.set(*category, title, *copies);
            }
        }
        table
    }

    pub fn set(&mut self, category: DocumentCategory, title: &str, copies: u32) {
        self.categories
            .entry(category)
            .or_default()
            .titles
            .insert(title_key(title), copies.max(MIN_COPIES));
    }

    pub fn set_default(&mut self, category: DocumentCategory, copies: u32) {
        self.categories.entry(category).or_default().default = Some(copies.max(MIN_COPIES));
    }

    /// Configured count for a title: exact title, then category default,
    /// then [`DEFAULT_COPIES`].
    pub fn configured(&self, category: DocumentCategory, title: &str) -> u32 {
        self.categories
            .get(&category)
            .and_then(|c| c.titles.get(&title_key(title)).copied().or(c.default))
            .unwrap_or(DEFAULT_COPIES)
    }

    /// Number of copies to export for one document.
    ///
    /// An explicit override wins and is clamped to `[1, 10]`. Otherwise the
    /// "All Documents" view always yields one copy and a category view uses
    /// the configured count.
    pub fn resolve(&self, view: &CategoryView, title: &str, override_count: Option<u32>) -> u32 {
        if let Some(count) = override_count {
            return clamp_copies(count);
        }
        match view {
            CategoryView::All => DEFAULT_COPIES,
            CategoryView::Category(category) => self.configured(*category, title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement() -> CategoryView {
        CategoryView::Category(DocumentCategory::Placement)
    }

    #[test]
    fn title_match_then_category_default_then_global_default() {
        let table = CopyCountTable::agency_policy();
        assert_eq!(table.resolve(&placement(), "Placement Agreement", None), 3);
        assert_eq!(table.resolve(&placement(), "  placement agreement ", None), 3);
        assert_eq!(table.resolve(&placement(), "School Enrollment", None), 2);
        let discharge = CategoryView::Category(DocumentCategory::Discharge);
        assert_eq!(table.resolve(&discharge, "Exit Interview", None), 1);
    }

    #[test]
    fn all_documents_view_ignores_configuration() {
        let table = CopyCountTable::agency_policy();
        for (category, _, titles) in AGENCY_POLICY {
            for (title, _) in titles.iter() {
                assert!(table.configured(*category, title) >= 1);
                assert_eq!(table.resolve(&CategoryView::All, title, None), 1);
            }
        }
    }

    #[test]
    fn overrides_take_precedence_and_are_clamped() {
        let table = CopyCountTable::agency_policy();
        assert_eq!(table.resolve(&placement(), "Placement Agreement", Some(5)), 5);
        assert_eq!(table.resolve(&placement(), "Placement Agreement", Some(0)), 1);
        assert_eq!(table.resolve(&placement(), "Placement Agreement", Some(40)), 10);
        assert_eq!(table.resolve(&CategoryView::All, "Placement Agreement", Some(4)), 4);
    }

    #[test]
    fn configured_counts_are_always_positive() {
        let mut table = CopyCountTable::empty();
        table.set(DocumentCategory::Legal, "Court Report", 0);
        assert_eq!(table.configured(DocumentCategory::Legal, "Court Report"), 1);
    }
}
