//! Dashboard list behavior as seen by admins and caseworkers.

use serde_json::json;

use common::dashboard::{
    DashboardTab, SortDirection, compute_tab_counts, filter_by_category,
    filter_by_ownership_and_archive, filter_by_search_term, filter_by_status,
    sort_by_creation_date,
};
use common::model::{CategoryView, Document, DocumentCategory, IntakeForm, User};
use common::validation::ensure_user_deletable;

fn user(id: &str, username: &str, role: &str) -> User {
    serde_json::from_value(json!({
        "_id": id,
        "username": username,
        "name": username,
        "role": role,
    }))
    .unwrap()
}

fn form(
    id: &str,
    client: &str,
    case: &str,
    status: &str,
    owner: &str,
    archived: bool,
    day: u32,
) -> IntakeForm {
    serde_json::from_value(json!({
        "_id": id,
        "clientName": client,
        "caseNumber": case,
        "status": status,
        "archived": archived,
        "createdAt": format!("2024-03-{:02}T10:00:00Z", day),
        "createdBy": { "_id": owner, "username": owner },
    }))
    .unwrap()
}

fn forms() -> Vec<IntakeForm> {
    vec![
        form("f1", "Jordan Reyes", "CASE-2024-001", "Pending", "u-cw", false, 3),
        form("f2", "Amelia Park", "CASE-2024-002", "In Progress", "u-cw", false, 7),
        form("f3", "Noah Bennett", "CASE-2024-003", "Pending", "u-other", false, 1),
        form("f4", "Lena Ortiz", "CASE-2023-117", "Completed", "u-cw", true, 5),
        form("f5", "Sam Whitfield", "CASE-2023-090", "Needs Review", "u-other", true, 2),
    ]
}

fn ids(items: &[IntakeForm]) -> Vec<&str> {
    items.iter().map(|f| f.id.as_str()).collect()
}

#[test]
fn caseworker_tabs_are_my_forms_and_archived() {
    assert_eq!(
        DashboardTab::visible(false),
        &[DashboardTab::MineActive, DashboardTab::Archived]
    );
    assert_eq!(DashboardTab::from_index(1, false), DashboardTab::Archived);
    assert_eq!(DashboardTab::from_index(1, true), DashboardTab::AllActive);
    assert_eq!(DashboardTab::from_index(7, true), DashboardTab::MineActive);
}

#[test]
fn caseworker_sees_only_own_forms() {
    let caseworker = user("u-cw", "casey", "caseworker");
    let forms = forms();

    let active = filter_by_ownership_and_archive(&forms, 0, &caseworker, false);
    assert_eq!(ids(&active), vec!["f1", "f2"]);

    let archived = filter_by_ownership_and_archive(&forms, 1, &caseworker, false);
    assert_eq!(ids(&archived), vec!["f4"]);
}

#[test]
fn admin_sees_everything_per_tab() {
    let admin = user("u-admin", "admin", "admin");
    let forms = forms();

    assert!(filter_by_ownership_and_archive(&forms, 0, &admin, true).is_empty());
    assert_eq!(
        ids(&filter_by_ownership_and_archive(&forms, 1, &admin, true)),
        vec!["f1", "f2", "f3"]
    );
    assert_eq!(
        ids(&filter_by_ownership_and_archive(&forms, 2, &admin, true)),
        vec!["f4", "f5"]
    );
}

/// Searching "pending" then filtering on the status yields the pending rows
/// in the caseworker's tab; searching a case number narrows to one row.
#[test]
fn search_and_status_filters_compose() {
    let caseworker = user("u-cw", "casey", "caseworker");
    let forms = forms();
    let mine = filter_by_ownership_and_archive(&forms, 0, &caseworker, false);

    let pending = filter_by_status(&filter_by_search_term(&mine, "PENDING"), "Pending");
    assert_eq!(ids(&pending), vec!["f1"]);

    assert_eq!(ids(&filter_by_search_term(&forms, "2024-002")), vec!["f2"]);
    assert_eq!(filter_by_search_term(&forms, "   ").len(), forms.len());
    assert_eq!(filter_by_status(&forms, "").len(), forms.len());
}

#[test]
fn filters_are_idempotent() {
    let caseworker = user("u-cw", "casey", "caseworker");
    let forms = forms();

    let once = filter_by_search_term(&forms, "case-2024");
    assert_eq!(filter_by_search_term(&once, "case-2024"), once);

    let owned = filter_by_ownership_and_archive(&forms, 0, &caseworker, false);
    assert_eq!(
        filter_by_ownership_and_archive(&owned, 0, &caseworker, false),
        owned
    );
}

#[test]
fn sorting_defaults_to_newest_first() {
    let forms = forms();
    assert_eq!(SortDirection::default(), SortDirection::Descending);

    let newest = sort_by_creation_date(&forms, SortDirection::Descending);
    assert_eq!(ids(&newest), vec!["f2", "f4", "f1", "f5", "f3"]);

    let mut oldest = sort_by_creation_date(&forms, SortDirection::Ascending);
    oldest.reverse();
    assert_eq!(oldest, newest);
}

#[test]
fn tab_counts_follow_the_active_tab() {
    let caseworker = user("u-cw", "casey", "caseworker");
    let admin = user("u-admin", "admin", "admin");
    let forms = forms();

    let mine = compute_tab_counts(&forms, 0, &caseworker, false);
    assert_eq!(mine.total, 2);
    assert_eq!(mine.pending, 1);
    assert_eq!(mine.in_progress, 1);
    assert_eq!(mine.needs_review, 0);

    let archived = compute_tab_counts(&forms, 2, &admin, true);
    assert_eq!(archived.total, 2);
    assert_eq!(archived.needs_review, 1);
}

#[test]
fn category_view_filters_documents() {
    let documents: Vec<Document> = vec![
        serde_json::from_value(json!({
            "_id": "d1",
            "title": "Placement Agreement",
            "category": "Placement",
            "additionalCategories": ["Legal"],
            "templateId": "placement-agreement",
        }))
        .unwrap(),
        serde_json::from_value(json!({
            "_id": "d2",
            "title": "Discharge Summary",
            "category": "Discharge",
            "templateId": "discharge-summary",
        }))
        .unwrap(),
    ];

    let legal = filter_by_category(&documents, &CategoryView::Category(DocumentCategory::Legal));
    assert_eq!(legal.len(), 1);
    assert_eq!(legal[0].id, "d1");
    assert_eq!(filter_by_category(&documents, &CategoryView::All).len(), 2);
}

fn document(id: &str, title: &str, template: &str, client: &str, owner: &str, day: u32) -> Document {
    serde_json::from_value(json!({
        "_id": id,
        "title": title,
        "category": "Medical",
        "templateId": template,
        "createdFor": client,
        "createdAt": format!("2024-04-{:02}T09:00:00Z", day),
        "createdBy": owner,
    }))
    .unwrap()
}

fn documents() -> Vec<Document> {
    vec![
        document("d1", "Consent for Medical Treatment", "medical-consent", "Jordan Reyes", "u-cw", 2),
        document("d2", "Release of Information", "release-of-information", "Amelia Park", "u-other", 9),
        document("d3", "Client Rights Acknowledgment", "client-rights", "Jordan Reyes", "u-cw", 5),
    ]
}

fn doc_ids(items: &[Document]) -> Vec<&str> {
    items.iter().map(|d| d.id.as_str()).collect()
}

#[test]
fn document_search_covers_title_client_and_template() {
    let documents = documents();

    assert_eq!(doc_ids(&filter_by_search_term(&documents, "medical treatment")), vec!["d1"]);
    assert_eq!(doc_ids(&filter_by_search_term(&documents, "jordan")), vec!["d1", "d3"]);
    assert_eq!(
        doc_ids(&filter_by_search_term(&documents, "release-of-information")),
        vec!["d2"]
    );
    assert!(filter_by_search_term(&documents, "guardianship").is_empty());
}

#[test]
fn documents_follow_ownership_tabs() {
    let caseworker = user("u-cw", "casey", "caseworker");
    let admin = user("u-admin", "admin", "admin");
    let documents = documents();

    let mine = filter_by_ownership_and_archive(&documents, 0, &caseworker, false);
    assert_eq!(doc_ids(&mine), vec!["d1", "d3"]);
    assert!(filter_by_ownership_and_archive(&documents, 1, &caseworker, false).is_empty());
    assert_eq!(
        doc_ids(&filter_by_ownership_and_archive(&documents, 1, &admin, true)),
        vec!["d1", "d2", "d3"]
    );

    let newest = sort_by_creation_date(&mine, SortDirection::Descending);
    assert_eq!(doc_ids(&newest), vec!["d3", "d1"]);
}

#[test]
fn admin_account_cannot_be_deleted() {
    let admin = user("u-admin", "Admin", "admin");
    let other_admin = user("u-admin2", "director", "admin");
    let caseworker = user("u-cw", "casey", "caseworker");

    assert!(ensure_user_deletable(&admin, &other_admin).is_err());
    assert!(ensure_user_deletable(&other_admin, &other_admin).is_err());
    assert!(ensure_user_deletable(&caseworker, &admin).is_ok());
}
