//! Export batch tests: copy expansion, ordering, metadata and partial
//! failure, using small PDFs built in the test.

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::executor::block_on;
use lopdf::content::{Content, Operation};
use lopdf::{Document as PdfDocument, Object, Stream, dictionary};
use std::cell::RefCell;
use std::collections::HashMap;

use common::ClientError;
use common::copies::CopyCountTable;
use common::export::{
    ExportBackend, ExportProgress, ExportRequest, PdfMerger, PdfMetadata, SelectedDocument,
    export_metadata, export_selection,
};
use common::model::{CategoryView, Document, DocumentCategory};
use common::templates::TemplateRegistry;

/// A PDF whose pages each draw `<label>-page-<n>`.
fn fixture_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), Object::Integer(18)]),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("{}-page-{}", label, n))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Text drawn on each page of a merged file, in page order.
fn page_labels(pdf: &[u8]) -> Vec<String> {
    let doc = PdfDocument::load_mem(pdf).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned();
            let start = content.find('(').unwrap() + 1;
            let end = content[start..].find(')').unwrap() + start;
            content[start..end].to_string()
        })
        .collect()
}

fn metadata() -> PdfMetadata {
    PdfMetadata {
        title: "Jordan Reyes - Case Documents".to_string(),
        author: "Family Services Agency".to_string(),
        creator: "Case Documents Client".to_string(),
    }
}

// ---------------------------------------------------------------------------
// PdfMerger
// ---------------------------------------------------------------------------

/// N copies contain the document's pages N times, each copy in original order.
#[test]
fn merged_copies_repeat_pages_in_rendered_order() {
    let source = fixture_pdf("A", 2);
    for copies in [1u32, 3, 10] {
        let mut merger = PdfMerger::new();
        assert_eq!(merger.append(&source, copies).unwrap(), 2);
        let merged = merger.finish(&metadata()).unwrap();

        let labels = page_labels(&merged);
        assert_eq!(labels.len(), 2 * copies as usize);
        for chunk in labels.chunks(2) {
            assert_eq!(chunk, ["A-page-1", "A-page-2"]);
        }
    }
}

/// Documents keep selection order and inherited resources survive the merge.
#[test]
fn merge_preserves_selection_order_and_resources() {
    let mut merger = PdfMerger::new();
    merger.append(&fixture_pdf("A", 1), 2).unwrap();
    merger.append(&fixture_pdf("B", 2), 1).unwrap();
    let merged = merger.finish(&metadata()).unwrap();

    assert_eq!(
        page_labels(&merged),
        vec!["A-page-1", "A-page-1", "B-page-1", "B-page-2"]
    );

    let doc = PdfDocument::load_mem(&merged).unwrap();
    for page_id in doc.get_pages().into_values() {
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        assert!(page.has(b"Resources"));
        assert!(page.has(b"MediaBox"));
    }
}

#[test]
fn merged_file_carries_metadata() {
    let mut merger = PdfMerger::new();
    merger.append(&fixture_pdf("A", 1), 1).unwrap();
    let merged = merger.finish(&metadata()).unwrap();

    let doc = PdfDocument::load_mem(&merged).unwrap();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_object(info_id).unwrap().as_dict().unwrap();
    assert_eq!(
        info.get(b"Title").unwrap().as_str().unwrap(),
        b"Jordan Reyes - Case Documents"
    );
    assert_eq!(
        info.get(b"Author").unwrap().as_str().unwrap(),
        b"Family Services Agency"
    );
}

/// Accented client names survive into the document properties.
#[test]
fn accented_client_name_reads_back_from_title() {
    let mut merger = PdfMerger::new();
    merger.append(&fixture_pdf("A", 1), 1).unwrap();
    let merged = merger.finish(&export_metadata(Some("José Núñez"))).unwrap();

    let doc = PdfDocument::load_mem(&merged).unwrap();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_object(info_id).unwrap().as_dict().unwrap();
    assert_eq!(
        lopdf::decode_text_string(info.get(b"Title").unwrap()).unwrap(),
        "José Núñez - Case Documents"
    );
    assert_eq!(
        lopdf::decode_text_string(info.get(b"Author").unwrap()).unwrap(),
        "Family Services Agency"
    );
}

/// Garbage bytes are rejected without disturbing what was already merged.
#[test]
fn invalid_pdf_leaves_merger_untouched() {
    let mut merger = PdfMerger::new();
    merger.append(&fixture_pdf("A", 1), 1).unwrap();
    assert!(merger.append(b"not a pdf", 3).is_err());
    assert_eq!(merger.page_count(), 1);
}

#[test]
fn finishing_an_empty_merger_fails() {
    assert!(PdfMerger::new().finish(&metadata()).is_err());
}

// ---------------------------------------------------------------------------
// export_selection
// ---------------------------------------------------------------------------

struct FakeBackend {
    documents: HashMap<String, (Document, Vec<u8>)>,
    last_fetched: RefCell<Option<String>>,
    calls: RefCell<Vec<String>>,
}

impl FakeBackend {
    fn new(entries: Vec<(Document, Vec<u8>)>) -> Self {
        Self {
            documents: entries
                .into_iter()
                .map(|(doc, pdf)| (doc.id.clone(), (doc, pdf)))
                .collect(),
            last_fetched: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl ExportBackend for FakeBackend {
    async fn fetch_document(&self, id: &str) -> Result<Document, ClientError> {
        self.calls.borrow_mut().push(format!("fetch {}", id));
        if id == "expired-session" {
            return Err(ClientError::Unauthorized);
        }
        let (doc, _) = self.documents.get(id).ok_or_else(|| ClientError::Api {
            status: 404,
            message: "Document not found".to_string(),
        })?;
        *self.last_fetched.borrow_mut() = Some(id.to_string());
        Ok(doc.clone())
    }

    async fn render_pdf(&self, markup: &str, _filename: &str) -> Result<Vec<u8>, ClientError> {
        self.calls.borrow_mut().push("render".to_string());
        assert!(markup.starts_with("<!DOCTYPE html>"));
        let id = self.last_fetched.borrow().clone().unwrap();
        Ok(self.documents[&id].1.clone())
    }
}

fn document(id: &str, title: &str, template_id: &str) -> Document {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "title": title,
        "category": "Placement",
        "templateId": template_id,
        "createdFor": "Jordan Reyes",
        "fields": { "caregiverName": "Pat Morgan" }
    }))
    .unwrap()
}

fn selected(id: &str, title: &str) -> SelectedDocument {
    SelectedDocument {
        id: id.to_string(),
        title: title.to_string(),
    }
}

fn request(selection: Vec<SelectedDocument>, view: CategoryView) -> ExportRequest {
    let mut request = ExportRequest::new(selection, view);
    request.requested_at = Utc.with_ymd_and_hms(2024, 11, 5, 16, 45, 12).unwrap();
    request
}

/// Category copy counts drive page duplication and progress counts copies.
#[test]
fn category_export_applies_configured_copies() {
    let backend = FakeBackend::new(vec![
        (
            document("d1", "Placement Agreement", "placement-agreement"),
            fixture_pdf("PA", 1),
        ),
        (
            document("d2", "Consent for Medical Treatment", "medical-consent"),
            fixture_pdf("MC", 2),
        ),
    ]);
    let request = request(
        vec![
            selected("d1", "Placement Agreement"),
            selected("d2", "Consent for Medical Treatment"),
        ],
        CategoryView::Category(DocumentCategory::Placement),
    );

    let mut progress: Vec<ExportProgress> = Vec::new();
    let outcome = block_on(export_selection(
        &backend,
        &TemplateRegistry::built_in(),
        &CopyCountTable::agency_policy(),
        &request,
        |p| progress.push(p),
    ));

    let file = outcome.file.expect("merged file");
    assert!(outcome.failures.is_empty());
    assert_eq!(file.filename, "Jordan_Reyes_20241105_164512.pdf");
    assert_eq!(file.pages, 3 + 2 * 2);
    assert_eq!(
        page_labels(&file.bytes),
        vec![
            "PA-page-1", "PA-page-1", "PA-page-1", "MC-page-1", "MC-page-2", "MC-page-1",
            "MC-page-2",
        ]
    );

    let percents: Vec<u8> = progress.iter().map(ExportProgress::percent).collect();
    assert_eq!(percents, vec![0, 60, 100]);
    assert!(progress.iter().all(|p| p.total == 5));
}

/// "All Documents" exports one copy each; overrides still win.
#[test]
fn all_documents_view_exports_single_copies_unless_overridden() {
    let backend = FakeBackend::new(vec![
        (
            document("d1", "Placement Agreement", "placement-agreement"),
            fixture_pdf("PA", 1),
        ),
        (
            document("d2", "Client Rights Acknowledgement", "client-rights"),
            fixture_pdf("CR", 1),
        ),
    ]);
    let mut request = request(
        vec![
            selected("d1", "Placement Agreement"),
            selected("d2", "Client Rights Acknowledgement"),
        ],
        CategoryView::All,
    );
    request.copy_overrides.insert("d2".to_string(), 25);

    let outcome = block_on(export_selection(
        &backend,
        &TemplateRegistry::built_in(),
        &CopyCountTable::agency_policy(),
        &request,
        |_| {},
    ));

    let file = outcome.file.unwrap();
    assert_eq!(file.pages, 1 + 10);
}

/// One failing document is skipped; the rest of the batch is still merged.
#[test]
fn failures_are_recorded_and_skipped() {
    let backend = FakeBackend::new(vec![
        (
            document("d1", "Placement Agreement", "placement-agreement"),
            fixture_pdf("PA", 1),
        ),
        (
            document("d3", "Foster License Renewal", "foster-license-renewal"),
            fixture_pdf("FL", 1),
        ),
        (
            document("d4", "Discharge Summary", "discharge-summary"),
            b"%PDF-garbage".to_vec(),
        ),
    ]);
    let request = request(
        vec![
            selected("d1", "Placement Agreement"),
            selected("missing", "Court Report"),
            selected("d3", "Foster License Renewal"),
            selected("d4", "Discharge Summary"),
        ],
        CategoryView::All,
    );

    let mut last = None;
    let outcome = block_on(export_selection(
        &backend,
        &TemplateRegistry::built_in(),
        &CopyCountTable::agency_policy(),
        &request,
        |p| last = Some(p),
    ));

    assert_eq!(page_labels(&outcome.file.unwrap().bytes), vec!["PA-page-1"]);
    let failed: Vec<&str> = outcome
        .failures
        .iter()
        .map(|f| f.document_id.as_str())
        .collect();
    assert_eq!(failed, vec!["missing", "d3", "d4"]);
    assert_eq!(outcome.failures[0].error.to_string(), "Document not found");
    assert_matches!(outcome.failures[1].error, ClientError::Render(_));
    assert_eq!(last.unwrap().percent(), 100);
}

/// A lapsed session surfaces as the error variant so callers can sign out.
#[test]
fn unauthorized_failure_keeps_its_variant() {
    let backend = FakeBackend::new(vec![(
        document("d1", "Placement Agreement", "placement-agreement"),
        fixture_pdf("PA", 1),
    )]);
    let request = request(
        vec![
            selected("expired-session", "Court Report"),
            selected("d1", "Placement Agreement"),
        ],
        CategoryView::All,
    );

    let outcome = block_on(export_selection(
        &backend,
        &TemplateRegistry::built_in(),
        &CopyCountTable::agency_policy(),
        &request,
        |_| {},
    ));

    assert!(outcome.file.is_some());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].document_id, "expired-session");
    assert_matches!(outcome.failures[0].error, ClientError::Unauthorized);
}

/// Documents are processed one at a time in selection order.
#[test]
fn backend_calls_are_sequential() {
    let backend = FakeBackend::new(vec![
        (
            document("d1", "Placement Agreement", "placement-agreement"),
            fixture_pdf("PA", 1),
        ),
        (
            document("d2", "Client Rights Acknowledgement", "client-rights"),
            fixture_pdf("CR", 1),
        ),
    ]);
    let request = request(
        vec![
            selected("d2", "Client Rights Acknowledgement"),
            selected("d1", "Placement Agreement"),
        ],
        CategoryView::All,
    );
    block_on(export_selection(
        &backend,
        &TemplateRegistry::built_in(),
        &CopyCountTable::agency_policy(),
        &request,
        |_| {},
    ));

    assert_eq!(
        *backend.calls.borrow(),
        vec!["fetch d2", "render", "fetch d1", "render"]
    );
}

/// An empty selection returns immediately without touching the backend.
#[test]
fn empty_selection_is_a_no_op() {
    let backend = FakeBackend::new(vec![]);
    let mut reported = false;
    let outcome = block_on(export_selection(
        &backend,
        &TemplateRegistry::built_in(),
        &CopyCountTable::agency_policy(),
        &request(vec![], CategoryView::All),
        |_| reported = true,
    ));

    assert!(outcome.file.is_none());
    assert!(outcome.failures.is_empty());
    assert!(!reported);
    assert!(backend.calls.borrow().is_empty());
}
