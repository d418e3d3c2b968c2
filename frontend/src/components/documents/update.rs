//! Update function for the documents screen.
//!
//! The export runs as one spawned task calling `export_selection`; progress
//! callbacks are forwarded as messages so the dialog's bar moves while the
//! batch is still running.

use std::collections::BTreeMap;

use yew::platform::spawn_local;
use yew::prelude::*;

use common::api::dto::{CreateStandaloneDocument, PdfRequest};
use common::copies::clamp_copies;
use common::export::{export_filename, export_selection, ExportRequest};
use common::model::DocumentCategory;
use common::ClientError;

use crate::app::Screen;
use crate::helpers::{download_pdf, show_error, show_toast};

use super::messages::{DraftField, Msg, PendingAction, StandaloneDraft};
use super::props::DocumentSource;
use super::state::{DocumentsComponent, ExportDialog, Preview};

pub fn update(
    component: &mut DocumentsComponent,
    ctx: &Context<DocumentsComponent>,
    msg: Msg,
) -> bool {
    let props = ctx.props();
    match msg {
        Msg::Load => {
            component.loading = true;
            let api = props.api.clone();
            let source = props.source.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = match &source {
                    DocumentSource::Intake(form) => api.documents_for_intake(&form.id).await,
                    DocumentSource::Standalone => api.list_standalone_documents().await,
                };
                link.send_message(Msg::Loaded(result));
            });
            true
        }
        Msg::Loaded(Ok(documents)) => {
            component.loading = false;
            component
                .selected
                .retain(|id| documents.iter().any(|d| &d.id == id));
            component.documents = documents;
            true
        }
        Msg::Loaded(Err(err)) => {
            component.loading = false;
            fail(ctx, err);
            true
        }
        Msg::SetView(view) => {
            component.view = view;
            true
        }
        Msg::SetSearch(term) => {
            component.search = term;
            true
        }
        Msg::ToggleSort => {
            component.sort = component.sort.toggled();
            true
        }
        Msg::ToggleSelected(id) => {
            if !component.selected.remove(&id) {
                component.selected.insert(id);
            }
            true
        }
        Msg::SelectVisible(all) => {
            let visible: Vec<String> = if all {
                component.visible().into_iter().map(|d| d.id).collect()
            } else {
                Vec::new()
            };
            component.selected = visible.into_iter().collect();
            true
        }
        Msg::OpenExport => {
            if component.selection().is_empty() {
                show_error("Select at least one document to export.");
                return false;
            }
            component.export = Some(ExportDialog::default());
            true
        }
        Msg::SetOverride(id, count) => {
            if let Some(export) = component.export.as_mut() {
                match count {
                    Some(count) => {
                        export.overrides.insert(id, clamp_copies(count));
                    }
                    None => {
                        export.overrides.remove(&id);
                    }
                }
            }
            true
        }
        Msg::StartExport => {
            let selection = component.selection();
            let client_name = props.source.client_name().or_else(|| {
                component
                    .documents
                    .iter()
                    .filter(|doc| component.selected.contains(&doc.id))
                    .find_map(|doc| doc.created_for.clone())
            });
            let Some(export) = component.export.as_mut() else {
                return false;
            };
            if export.running {
                return false;
            }
            if selection.is_empty() {
                return false;
            }
            export.running = true;
            export.progress = None;
            export.failures.clear();

            let mut request = ExportRequest::new(selection, component.view);
            request.copy_overrides = export.overrides.clone();
            request.client_name = client_name;

            let api = props.api.clone();
            let registry = component.registry.clone();
            let table = component.copies.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let progress_link = link.clone();
                let outcome = export_selection(&api, &registry, &table, &request, |progress| {
                    progress_link.send_message(Msg::ExportProgress(progress));
                })
                .await;
                link.send_message(Msg::ExportFinished(outcome));
            });
            true
        }
        Msg::ExportProgress(progress) => {
            if let Some(export) = component.export.as_mut() {
                export.progress = Some(progress);
            }
            true
        }
        Msg::ExportFinished(outcome) => {
            let Some(export) = component.export.as_mut() else {
                return false;
            };
            export.running = false;
            if outcome
                .failures
                .iter()
                .any(|f| matches!(f.error, ClientError::Unauthorized))
            {
                props.on_error.emit(ClientError::Unauthorized);
            }
            match outcome.file {
                Some(file) => {
                    download_pdf(&file.bytes, &file.filename);
                    if outcome.failures.is_empty() {
                        show_toast(&format!("Exported {} page(s) to {}.", file.pages, file.filename));
                    } else {
                        show_error(&format!(
                            "Exported {} with {} document(s) skipped.",
                            file.filename,
                            outcome.failures.len()
                        ));
                    }
                }
                None => show_error("Nothing could be exported."),
            }
            export.failures = outcome.failures;
            true
        }
        Msg::CloseExport => {
            if component.export.as_ref().is_some_and(|e| e.running) {
                return false;
            }
            component.export = None;
            true
        }
        Msg::QuickPdf => {
            let selected: Vec<_> = component
                .visible()
                .into_iter()
                .filter(|doc| component.selected.contains(&doc.id))
                .collect();
            if selected.is_empty() {
                show_error("Select at least one document.");
                return false;
            }
            let mut requests = Vec::with_capacity(selected.len());
            for doc in &selected {
                match component.registry.render(doc) {
                    Ok(html) => requests.push(PdfRequest {
                        html,
                        filename: export_filename(Some(&doc.title), chrono::Utc::now()),
                    }),
                    Err(err) => log::warn!("leaving {} out of quick PDF: {}", doc.id, err),
                }
            }
            if requests.is_empty() {
                show_error("None of the selected documents can be rendered.");
                return false;
            }
            component.busy = true;
            let filename = export_filename(
                props.source.client_name().as_deref(),
                chrono::Utc::now(),
            );
            let api = props.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api
                    .generate_multiple_pdf(requests, &filename)
                    .await
                    .map(|bytes| (bytes, filename));
                link.send_message(Msg::QuickPdfFinished(result));
            });
            true
        }
        Msg::QuickPdfFinished(result) => {
            component.busy = false;
            match result {
                Ok((bytes, filename)) => download_pdf(&bytes, &filename),
                Err(err) => fail(ctx, err),
            }
            true
        }
        Msg::Preview(document) => match component.registry.render(&document) {
            Ok(markup) => {
                component.preview = Some(Preview::new(document, markup));
                true
            }
            Err(err) => {
                show_error(&err.to_string());
                false
            }
        },
        Msg::EditField(key, value) => {
            if let Some(preview) = component.preview.as_mut() {
                preview.fields.insert(key, value);
                preview.dirty = true;
            }
            false
        }
        Msg::SaveFields => {
            let Some(preview) = component.preview.as_ref() else {
                return false;
            };
            let fields: BTreeMap<String, serde_json::Value> = preview
                .fields
                .iter()
                .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
                .collect();
            let id = preview.document.id.clone();
            component.busy = true;
            let api = props.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::FieldsSaved(api.update_document_fields(&id, fields).await));
            });
            true
        }
        Msg::FieldsSaved(Ok(document)) => {
            component.busy = false;
            show_toast("Document saved.");
            match component.registry.render(&document) {
                Ok(markup) => component.preview = Some(Preview::new(document, markup)),
                Err(_) => component.preview = None,
            }
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::FieldsSaved(Err(err)) => {
            component.busy = false;
            fail(ctx, err);
            true
        }
        Msg::ClosePreview => {
            component.preview = None;
            true
        }
        Msg::OpenSignatures(document) => {
            component.signing = Some(document);
            true
        }
        Msg::SignaturesClosed => {
            component.signing = None;
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::OpenStandaloneSignatures(document) => {
            component.standalone_signing = Some(document);
            true
        }
        Msg::StandaloneSignaturesClosed(submitted) => {
            component.standalone_signing = None;
            if submitted {
                ctx.link().send_message(Msg::Load);
            }
            true
        }
        Msg::OpenCreate => {
            let template = component.registry.templates().next();
            component.draft = Some(StandaloneDraft {
                title: template.map(|t| t.title.to_string()).unwrap_or_default(),
                template_id: template.map(|t| t.id.to_string()).unwrap_or_default(),
                category: DocumentCategory::Admission,
                created_for: String::new(),
            });
            component.draft_error = None;
            true
        }
        Msg::EditDraft(field, value) => {
            let Some(draft) = component.draft.as_mut() else {
                return false;
            };
            match field {
                DraftField::Title => draft.title = value,
                DraftField::CreatedFor => draft.created_for = value,
                DraftField::Category => {
                    if let Some(category) = DocumentCategory::from_label(&value) {
                        draft.category = category;
                    }
                }
                DraftField::Template => {
                    if let Some(template) = component.registry.get(&value) {
                        draft.title = template.title.to_string();
                    }
                    draft.template_id = value;
                }
            }
            true
        }
        Msg::SubmitCreate => {
            let Some(draft) = component.draft.as_ref() else {
                return false;
            };
            if draft.title.trim().is_empty() {
                component.draft_error = Some("Title is required.".to_string());
                return true;
            }
            if component.registry.get(&draft.template_id).is_none() {
                component.draft_error = Some("Choose a template.".to_string());
                return true;
            }
            let created_for = draft.created_for.trim();
            let request = CreateStandaloneDocument {
                title: draft.title.trim().to_string(),
                category: draft.category,
                template_id: draft.template_id.clone(),
                created_for: (!created_for.is_empty()).then(|| created_for.to_string()),
                fields: BTreeMap::new(),
            };
            component.busy = true;
            let api = props.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::Created(api.create_standalone_document(&request).await));
            });
            true
        }
        Msg::Created(Ok(document)) => {
            component.busy = false;
            component.draft = None;
            show_toast(&format!("'{}' created.", document.title));
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::Created(Err(err)) => {
            component.busy = false;
            match err {
                ClientError::Unauthorized => props.on_error.emit(err),
                other => component.draft_error = Some(other.to_string()),
            }
            true
        }
        Msg::CloseCreate => {
            component.draft = None;
            true
        }
        Msg::Ask(action) => {
            component.pending = Some(action);
            true
        }
        Msg::CancelPending => {
            component.pending = None;
            true
        }
        Msg::ConfirmPending => {
            let Some(action) = component.pending.take() else {
                return false;
            };
            component.busy = true;
            let api = props.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = match action {
                    PendingAction::PermanentDelete(document) => api
                        .permanently_delete_document(&document.id)
                        .await
                        .map(|_| format!("'{}' deleted.", document.title)),
                    PendingAction::BulkDelete(ids) => {
                        let count = ids.len();
                        api.bulk_delete_documents(ids)
                            .await
                            .map(|_| format!("{} document(s) deleted.", count))
                    }
                    PendingAction::Regenerate(form) => api
                        .generate_documents(&form.id)
                        .await
                        .map(|docs| format!("{} document(s) regenerated.", docs.len())),
                };
                link.send_message(Msg::Done(result));
            });
            true
        }
        Msg::Done(result) => {
            component.busy = false;
            match result {
                Ok(message) => {
                    show_toast(&message);
                    component.selected.clear();
                }
                Err(err) => fail(ctx, err),
            }
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::Back => {
            props.on_navigate.emit(Screen::Dashboard);
            false
        }
    }
}

fn fail(ctx: &Context<DocumentsComponent>, err: ClientError) {
    match err {
        ClientError::Unauthorized => ctx.props().on_error.emit(err),
        other => show_error(&other.to_string()),
    }
}
