use yew::html::Scope;
use yew::prelude::*;

use common::dashboard::SortDirection;
use common::model::{CategoryView, Document, DocumentCategory, SignerRole};
use common::signature::SignatureTarget;

use crate::components::signature::{SlotSignatureDialog, StandaloneSignatureDialog};
use crate::helpers::format_date;
use crate::tops_sheet::confirm_dialog::ConfirmDialog;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

use super::export_dialog::build_export_dialog;
use super::messages::{DraftField, Msg, PendingAction};
use super::props::DocumentSource;
use super::state::DocumentsComponent;

pub fn view(component: &DocumentsComponent, ctx: &Context<DocumentsComponent>) -> Html {
    let props = ctx.props();
    let link = ctx.link();
    let rows = component.visible();
    let heading = match &props.source {
        DocumentSource::Intake(form) => format!("Documents for {} ({})", form.client_name, form.case_number),
        DocumentSource::Standalone => "Standalone documents".to_string(),
    };

    html! {
        <div class="documents-root">
            <div class="documents-header">
                {
                    if matches!(props.source, DocumentSource::Intake(_)) {
                        html! { <button class="btn btn-link" onclick={link.callback(|_| Msg::Back)}>{ "← Dashboard" }</button> }
                    } else {
                        html! {}
                    }
                }
                <h2>{ heading }</h2>
            </div>
            { build_toolbar(component, ctx) }
            {
                if component.loading {
                    html! { <div class="loading">{ "Loading documents…" }</div> }
                } else if rows.is_empty() {
                    html! { <div class="empty">{ "No documents in this view." }</div> }
                } else {
                    build_table(component, ctx, &rows)
                }
            }
            { build_export_dialog(component, ctx) }
            { build_preview(component, link) }
            { build_create_dialog(component, link) }
            { build_confirm(component, link) }
            {
                if let Some(document) = &component.signing {
                    html! {
                        <SlotSignatureDialog
                            api={props.api.clone()}
                            target={SignatureTarget::Document(document.id.clone())}
                            title={document.title.clone()}
                            existing={document.signatures.clone()}
                            on_close={link.callback(|_| Msg::SignaturesClosed)}
                            on_error={props.on_error.clone()}
                        />
                    }
                } else {
                    html! {}
                }
            }
            {
                if let Some(document) = &component.standalone_signing {
                    html! {
                        <StandaloneSignatureDialog
                            api={props.api.clone()}
                            document={document.clone()}
                            on_close={link.callback(Msg::StandaloneSignaturesClosed)}
                            on_error={props.on_error.clone()}
                        />
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn build_toolbar(component: &DocumentsComponent, ctx: &Context<DocumentsComponent>) -> Html {
    let link = ctx.link();
    let props = ctx.props();
    let selected: Vec<String> = component.selected.iter().cloned().collect();
    let has_selection = !selected.is_empty();
    let sort_label = match component.sort {
        SortDirection::Descending => "Newest first",
        SortDirection::Ascending => "Oldest first",
    };

    html! {
        <div class="toolbar">
            <select onchange={link.callback(|e: Event| {
                let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
                Msg::SetView(CategoryView::from_label(&select.value()))
            })}>
                { for CategoryView::options().into_iter().map(|view| html! {
                    <option value={view.label()} selected={component.view == view}>{ view.label() }</option>
                }) }
            </select>
            <input
                type="search"
                placeholder="Search by title or category"
                value={component.search.clone()}
                oninput={link.callback(|e: InputEvent| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    Msg::SetSearch(input.value())
                })}
            />
            <button class="btn" onclick={link.callback(|_| Msg::ToggleSort)}>{ sort_label }</button>
            <button class="btn btn-primary" disabled={!has_selection || component.busy}
                onclick={link.callback(|_| Msg::OpenExport)}>
                { "Export PDF" }
            </button>
            <button class="btn" disabled={!has_selection || component.busy} onclick={link.callback(|_| Msg::QuickPdf)}>
                { "Quick PDF" }
            </button>
            {
                match &props.source {
                    DocumentSource::Intake(form) => {
                        let form = form.clone();
                        html! {
                            <button class="btn" disabled={component.busy}
                                onclick={link.callback(move |_| Msg::Ask(PendingAction::Regenerate(form.clone())))}>
                                { "Regenerate" }
                            </button>
                        }
                    }
                    DocumentSource::Standalone => html! {
                        <button class="btn" onclick={link.callback(|_| Msg::OpenCreate)}>{ "New document" }</button>
                    },
                }
            }
            {
                if props.user.is_admin() && has_selection {
                    let count = selected.len();
                    html! {
                        <button class="btn btn-danger" disabled={component.busy}
                            onclick={link.callback(move |_| Msg::Ask(PendingAction::BulkDelete(selected.clone())))}>
                            { format!("Delete selected ({})", count) }
                        </button>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn build_table(component: &DocumentsComponent, ctx: &Context<DocumentsComponent>, rows: &[Document]) -> Html {
    let link = ctx.link();
    let all_selected = rows.iter().all(|d| component.selected.contains(&d.id));
    html! {
        <table class="data-table">
            <thead>
                <tr>
                    <th>
                        <input type="checkbox" checked={all_selected}
                            onclick={link.callback(move |_| Msg::SelectVisible(!all_selected))} />
                    </th>
                    <th>{ "Title" }</th>
                    <th>{ "Category" }</th>
                    <th>{ "Prepared for" }</th>
                    <th>{ "Signatures" }</th>
                    <th>{ "Created" }</th>
                    <th>{ "Actions" }</th>
                </tr>
            </thead>
            <tbody>
                { for rows.iter().map(|doc| build_row(component, ctx, doc)) }
            </tbody>
        </table>
    }
}

fn build_row(component: &DocumentsComponent, ctx: &Context<DocumentsComponent>, doc: &Document) -> Html {
    let link = ctx.link();
    let is_admin = ctx.props().user.is_admin();
    let on_select = {
        let id = doc.id.clone();
        link.callback(move |_| Msg::ToggleSelected(id.clone()))
    };
    let action = |label: &'static str, msg: fn(Document) -> Msg, class: &'static str| {
        let doc = doc.clone();
        html! {
            <button class={classes!("btn", "btn-small", class)} disabled={component.busy}
                onclick={link.callback(move |_| msg(doc.clone()))}>
                { label }
            </button>
        }
    };
    let categories = std::iter::once(doc.category)
        .chain(doc.additional_categories.iter().copied())
        .map(DocumentCategory::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let signatures = if doc.is_standalone {
        standalone_titles(doc)
    } else {
        format!("{}/{}", doc.signatures.len(), SignerRole::ALL.len())
    };

    html! {
        <tr key={doc.id.clone()}>
            <td><input type="checkbox" checked={component.selected.contains(&doc.id)} onclick={on_select} /></td>
            <td>{ &doc.title }</td>
            <td>{ categories }</td>
            <td>{ doc.created_for.clone().unwrap_or_default() }</td>
            <td>{ signatures }</td>
            <td>{ format_date(doc.created_at) }</td>
            <td class="row-actions">
                { action("Preview", Msg::Preview, "") }
                {
                    if doc.is_standalone {
                        action("Sign", Msg::OpenStandaloneSignatures, "")
                    } else {
                        action("Sign", Msg::OpenSignatures, "")
                    }
                }
                {
                    if is_admin {
                        action("Delete permanently", |d| Msg::Ask(PendingAction::PermanentDelete(d)), "btn-danger")
                    } else {
                        html! {}
                    }
                }
            </td>
        </tr>
    }
}

fn standalone_titles(doc: &Document) -> String {
    if doc.standalone_signatures.is_empty() {
        return "None".to_string();
    }
    doc.standalone_signatures
        .iter()
        .map(|s| s.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn build_preview(component: &DocumentsComponent, link: &Scope<DocumentsComponent>) -> Html {
    let Some(preview) = &component.preview else {
        return html! {};
    };
    html! {
        <YwMaterialTopSheet node_ref={NodeRef::default()} open={true}>
            <div class="dialog preview-dialog">
                <h3>{ &preview.document.title }</h3>
                <div class="preview-layout">
                    <iframe class="preview-frame" srcdoc={preview.markup.clone()} title="Document preview"></iframe>
                    <div class="preview-fields">
                        { for preview.fields.iter().map(|(key, value)| {
                            let key = key.clone();
                            html! {
                                <label key={key.clone()}>{ key.replace('_', " ") }
                                    <input
                                        type="text"
                                        value={value.clone()}
                                        oninput={link.callback(move |e: InputEvent| {
                                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                            Msg::EditField(key.clone(), input.value())
                                        })}
                                    />
                                </label>
                            }
                        }) }
                    </div>
                </div>
                <div class="dialog-actions">
                    <button class="btn" onclick={link.callback(|_| Msg::ClosePreview)}>{ "Close" }</button>
                    <button class="btn btn-primary" disabled={component.busy}
                        onclick={link.callback(|_| Msg::SaveFields)}>
                        { "Save" }
                    </button>
                </div>
            </div>
        </YwMaterialTopSheet>
    }
}

fn build_create_dialog(component: &DocumentsComponent, link: &Scope<DocumentsComponent>) -> Html {
    let Some(draft) = &component.draft else {
        return html! {};
    };
    let text = |label: &'static str, field: DraftField, value: String| {
        html! {
            <label>{ label }
                <input
                    type="text"
                    value={value}
                    oninput={link.callback(move |e: InputEvent| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        Msg::EditDraft(field, input.value())
                    })}
                />
            </label>
        }
    };
    let select = |field: DraftField| {
        link.callback(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            Msg::EditDraft(field, select.value())
        })
    };

    html! {
        <YwMaterialTopSheet node_ref={NodeRef::default()} open={true}>
            <div class="dialog">
                <h3>{ "New standalone document" }</h3>
                <label>{ "Template" }
                    <select onchange={select(DraftField::Template)}>
                        { for component.registry.templates().map(|template| html! {
                            <option value={template.id} selected={draft.template_id == template.id}>
                                { template.title }
                            </option>
                        }) }
                    </select>
                </label>
                { text("Title", DraftField::Title, draft.title.clone()) }
                <label>{ "Category" }
                    <select onchange={select(DraftField::Category)}>
                        { for DocumentCategory::ALL.into_iter().map(|category| html! {
                            <option value={category.as_str()} selected={draft.category == category}>
                                { category.as_str() }
                            </option>
                        }) }
                    </select>
                </label>
                { text("Prepared for", DraftField::CreatedFor, draft.created_for.clone()) }
                {
                    if let Some(error) = &component.draft_error {
                        html! { <div class="form-error">{ error }</div> }
                    } else {
                        html! {}
                    }
                }
                <div class="dialog-actions">
                    <button class="btn" onclick={link.callback(|_| Msg::CloseCreate)}>{ "Cancel" }</button>
                    <button class="btn btn-primary" disabled={component.busy} onclick={link.callback(|_| Msg::SubmitCreate)}>
                        { "Create" }
                    </button>
                </div>
            </div>
        </YwMaterialTopSheet>
    }
}

fn build_confirm(component: &DocumentsComponent, link: &Scope<DocumentsComponent>) -> Html {
    let Some(action) = &component.pending else {
        return html! {};
    };
    let (title, message, confirm) = match action {
        PendingAction::PermanentDelete(document) => (
            "Delete permanently",
            format!("Permanently delete '{}'? This cannot be undone.", document.title),
            "Delete permanently",
        ),
        PendingAction::BulkDelete(ids) => (
            "Delete selected documents",
            format!("Delete {} selected document(s)? This cannot be undone.", ids.len()),
            "Delete",
        ),
        PendingAction::Regenerate(form) => (
            "Regenerate documents",
            format!(
                "Regenerate all documents for {}? Field edits and signatures on the current documents will be lost.",
                form.client_name
            ),
            "Regenerate",
        ),
    };
    html! {
        <ConfirmDialog
            title={title}
            message={message}
            confirm_label={confirm}
            on_confirm={link.callback(|_| Msg::ConfirmPending)}
            on_cancel={link.callback(|_| Msg::CancelPending)}
        />
    }
}
