use std::collections::{BTreeMap, BTreeSet, HashMap};

use common::copies::CopyCountTable;
use common::dashboard::{filter_by_category, filter_by_search_term, sort_by_creation_date, SortDirection};
use common::export::{ExportFailure, ExportProgress, SelectedDocument};
use common::model::{CategoryView, Document};
use common::templates::{field_text, TemplateRegistry};

use super::messages::{PendingAction, StandaloneDraft};

pub struct DocumentsComponent {
    pub documents: Vec<Document>,
    pub loading: bool,
    pub view: CategoryView,
    pub search: String,
    pub sort: SortDirection,
    pub selected: BTreeSet<String>,
    pub registry: TemplateRegistry,
    pub copies: CopyCountTable,
    pub export: Option<ExportDialog>,
    pub preview: Option<Preview>,
    pub signing: Option<Document>,
    pub standalone_signing: Option<Document>,
    pub draft: Option<StandaloneDraft>,
    pub draft_error: Option<String>,
    pub pending: Option<PendingAction>,
    pub busy: bool,
}

/// State of the export dialog while it is open.
#[derive(Default)]
pub struct ExportDialog {
    /// Explicit copy counts keyed by document id.
    pub overrides: HashMap<String, u32>,
    pub running: bool,
    pub progress: Option<ExportProgress>,
    pub failures: Vec<ExportFailure>,
}

/// Rendered markup of one document plus its editable field values.
pub struct Preview {
    pub document: Document,
    pub markup: String,
    pub fields: BTreeMap<String, String>,
    pub dirty: bool,
}

impl Preview {
    pub fn new(document: Document, markup: String) -> Self {
        let fields = document
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), field_text(value)))
            .collect();
        Self {
            document,
            markup,
            fields,
            dirty: false,
        }
    }
}

impl DocumentsComponent {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            loading: true,
            view: CategoryView::All,
            search: String::new(),
            sort: SortDirection::default(),
            selected: BTreeSet::new(),
            registry: TemplateRegistry::built_in(),
            copies: CopyCountTable::agency_policy(),
            export: None,
            preview: None,
            signing: None,
            standalone_signing: None,
            draft: None,
            draft_error: None,
            pending: None,
            busy: false,
        }
    }

    pub fn visible(&self) -> Vec<Document> {
        let in_view = filter_by_category(&self.documents, &self.view);
        let searched = filter_by_search_term(&in_view, &self.search);
        sort_by_creation_date(&searched, self.sort)
    }

    /// Selected documents in the order they are listed; this is the export order.
    pub fn selection(&self) -> Vec<SelectedDocument> {
        self.visible()
            .into_iter()
            .filter(|doc| self.selected.contains(&doc.id))
            .map(|doc| SelectedDocument {
                id: doc.id,
                title: doc.title,
            })
            .collect()
    }
}
