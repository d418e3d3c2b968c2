use std::collections::BTreeSet;

use common::api::dto::IntakeFormDraft;
use common::dashboard::{
    filter_by_ownership_and_archive, filter_by_search_term, filter_by_status,
    sort_by_creation_date, SortDirection,
};
use common::model::{IntakeForm, User};

use super::messages::PendingAction;

pub struct DashboardComponent {
    pub forms: Vec<IntakeForm>,
    pub loading: bool,
    pub active_tab: usize,
    pub search: String,
    /// Status label to match; empty shows every status.
    pub status_filter: String,
    pub sort: SortDirection,
    pub selected: BTreeSet<String>,
    pub pending: Option<PendingAction>,
    /// Draft of the intake form dialog while it is open.
    pub draft: Option<IntakeFormDraft>,
    /// Id of the form being edited; `None` while creating.
    pub editing: Option<String>,
    pub draft_error: Option<String>,
    pub signing: Option<IntakeForm>,
    pub busy: bool,
}

impl DashboardComponent {
    pub fn new() -> Self {
        Self {
            forms: Vec::new(),
            loading: true,
            active_tab: 0,
            search: String::new(),
            status_filter: String::new(),
            sort: SortDirection::default(),
            selected: BTreeSet::new(),
            pending: None,
            draft: None,
            editing: None,
            draft_error: None,
            signing: None,
            busy: false,
        }
    }

    /// Forms shown in the table for the current tab, search, status and sort.
    pub fn visible(&self, user: &User) -> Vec<IntakeForm> {
        let tab = filter_by_ownership_and_archive(&self.forms, self.active_tab, user, user.is_admin());
        let searched = filter_by_search_term(&tab, &self.search);
        let filtered = filter_by_status(&searched, &self.status_filter);
        sort_by_creation_date(&filtered, self.sort)
    }
}
