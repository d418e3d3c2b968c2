//! Pure list helpers behind the dashboard tables.
//!
//! Nothing here performs I/O; every function takes a slice and returns a new
//! `Vec`, so they can run on every render.

use chrono::{DateTime, Utc};

use crate::model::{CategoryView, Document, FormStatus, IntakeForm, User};

/// Anything the dashboard lists.
pub trait DashboardItem {
    fn creator_id(&self) -> Option<&str>;
    fn is_archived(&self) -> bool;
    fn created_at(&self) -> Option<DateTime<Utc>>;
    /// Fields the search box matches against.
    fn search_fields(&self) -> Vec<&str>;
    fn status_label(&self) -> Option<&str>;
}

impl DashboardItem for IntakeForm {
    fn creator_id(&self) -> Option<&str> {
        self.created_by.as_ref().map(|c| c.normalized_id())
    }

    fn is_archived(&self) -> bool {
        self.archived
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.client_name.as_str(),
            self.case_number.as_str(),
            self.status.label(),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }
}

impl DashboardItem for Document {
    fn creator_id(&self) -> Option<&str> {
        self.created_by.as_ref().map(|c| c.normalized_id())
    }

    /// Documents have no archive state of their own.
    fn is_archived(&self) -> bool {
        false
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.template_id.as_str()];
        if let Some(created_for) = &self.created_for {
            fields.push(created_for);
        }
        fields
    }

    fn status_label(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    MineActive,
    /// Admin only.
    AllActive,
    Archived,
}

impl DashboardTab {
    /// Tabs in display order for the given role.
    pub fn visible(is_admin: bool) -> &'static [DashboardTab] {
        if is_admin {
            &[DashboardTab::MineActive, DashboardTab::AllActive, DashboardTab::Archived]
        } else {
            &[DashboardTab::MineActive, DashboardTab::Archived]
        }
    }

    /// Maps a tab index to its meaning. Out of range falls back to "My Forms".
    pub fn from_index(index: usize, is_admin: bool) -> Self {
        Self::visible(is_admin)
            .get(index)
            .copied()
            .unwrap_or(DashboardTab::MineActive)
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardTab::MineActive => "My Forms",
            DashboardTab::AllActive => "All Forms",
            DashboardTab::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabCounts {
    pub total: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub needs_review: usize,
}

fn owned_by<T: DashboardItem>(item: &T, user: &User) -> bool {
    item.creator_id()
        .is_some_and(|creator| creator == user.id.trim())
}

fn tab_admits<T: DashboardItem>(item: &T, tab: DashboardTab, user: &User, is_admin: bool) -> bool {
    match tab {
        DashboardTab::MineActive => !item.is_archived() && owned_by(item, user),
        DashboardTab::AllActive if is_admin => !item.is_archived(),
        DashboardTab::AllActive => !item.is_archived() && owned_by(item, user),
        DashboardTab::Archived => item.is_archived() && (is_admin || owned_by(item, user)),
    }
}

pub fn filter_by_ownership_and_archive<T>(
    items: &[T],
    active_tab_index: usize,
    current_user: &User,
    is_admin: bool,
) -> Vec<T>
where
    T: DashboardItem + Clone,
{
    let tab = DashboardTab::from_index(active_tab_index, is_admin);
    items
        .iter()
        .filter(|item| tab_admits(*item, tab, current_user, is_admin))
        .cloned()
        .collect()
}

/// Case-insensitive substring match over each item's search fields. A blank
/// term keeps everything.
pub fn filter_by_search_term<T>(items: &[T], term: &str) -> Vec<T>
where
    T: DashboardItem + Clone,
{
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Exact status match; an empty status keeps everything.
pub fn filter_by_status<T>(items: &[T], status: &str) -> Vec<T>
where
    T: DashboardItem + Clone,
{
    if status.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.status_label() == Some(status))
        .cloned()
        .collect()
}

pub fn filter_by_category(documents: &[Document], view: &CategoryView) -> Vec<Document> {
    documents
        .iter()
        .filter(|doc| doc.in_view(view))
        .cloned()
        .collect()
}

/// Stable sort on creation time. Items without a timestamp sort as oldest.
pub fn sort_by_creation_date<T>(items: &[T], direction: SortDirection) -> Vec<T>
where
    T: DashboardItem + Clone,
{
    let mut sorted = items.to_vec();
    match direction {
        SortDirection::Ascending => sorted.sort_by_key(|item| item.created_at()),
        SortDirection::Descending => {
            sorted.sort_by(|a, b| b.created_at().cmp(&a.created_at()))
        }
    }
    sorted
}

pub fn compute_tab_counts<T>(
    items: &[T],
    active_tab_index: usize,
    current_user: &User,
    is_admin: bool,
) -> TabCounts
where
    T: DashboardItem + Clone,
{
    let visible = filter_by_ownership_and_archive(items, active_tab_index, current_user, is_admin);
    let count = |status: &FormStatus| {
        visible
            .iter()
            .filter(|item| item.status_label() == Some(status.label()))
            .count()
    };
    TabCounts {
        total: visible.len(),
        in_progress: count(&FormStatus::InProgress),
        pending: count(&FormStatus::Pending),
        needs_review: count(&FormStatus::NeedsReview),
    }
}
