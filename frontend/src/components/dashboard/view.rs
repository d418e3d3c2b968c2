//! View rendering for the intake-form dashboard.

use yew::html::Scope;
use yew::prelude::*;

use common::dashboard::{compute_tab_counts, DashboardTab, SortDirection};
use common::model::{FormStatus, IntakeForm, SignerRole};
use common::signature::SignatureTarget;

use crate::components::signature::SlotSignatureDialog;
use crate::helpers::{format_count, format_date};
use crate::tops_sheet::confirm_dialog::ConfirmDialog;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

use super::messages::{DraftField, Msg, PendingAction};
use super::state::DashboardComponent;

pub fn view(component: &DashboardComponent, ctx: &Context<DashboardComponent>) -> Html {
    let link = ctx.link();
    let props = ctx.props();
    let is_admin = props.user.is_admin();
    let rows = component.visible(&props.user);

    html! {
        <div class="dashboard-root">
            { build_counts(component, ctx) }
            { build_tab_bar(component, link, is_admin) }
            { build_toolbar(component, link, is_admin) }
            {
                if component.loading {
                    html! { <div class="loading">{ "Loading intake forms…" }</div> }
                } else if rows.is_empty() {
                    html! { <div class="empty">{ "No intake forms match." }</div> }
                } else {
                    build_table(component, ctx, &rows)
                }
            }
            { build_create_dialog(component, link) }
            { build_confirm(component, link) }
            {
                if let Some(form) = &component.signing {
                    html! {
                        <SlotSignatureDialog
                            api={props.api.clone()}
                            target={SignatureTarget::IntakeForm(form.id.clone())}
                            title={form.client_name.clone()}
                            existing={form.signatures.clone()}
                            labels={form.signature_labels.clone()}
                            on_close={link.callback(|_| Msg::SignaturesClosed)}
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

fn build_counts(component: &DashboardComponent, ctx: &Context<DashboardComponent>) -> Html {
    let user = &ctx.props().user;
    let counts = compute_tab_counts(&component.forms, component.active_tab, user, user.is_admin());
    let card = |label: &str, value: usize| {
        html! {
            <div class="stat-card">
                <span class="stat-value">{ format_count(value) }</span>
                <span class="stat-label">{ label.to_string() }</span>
            </div>
        }
    };
    html! {
        <div class="stat-row">
            { card("Total", counts.total) }
            { card("In Progress", counts.in_progress) }
            { card("Pending", counts.pending) }
            { card("Needs Review", counts.needs_review) }
        </div>
    }
}

fn build_tab_bar(component: &DashboardComponent, link: &Scope<DashboardComponent>, is_admin: bool) -> Html {
    html! {
        <div class="tab-bar">
            { for DashboardTab::visible(is_admin).iter().enumerate().map(|(index, tab)| html! {
                <button
                    class={classes!("tab-btn", (component.active_tab == index).then_some("active"))}
                    onclick={link.callback(move |_| Msg::SetTab(index))}
                >
                    { tab.label() }
                </button>
            }) }
        </div>
    }
}

fn build_toolbar(component: &DashboardComponent, link: &Scope<DashboardComponent>, is_admin: bool) -> Html {
    let selected: Vec<String> = component.selected.iter().cloned().collect();
    let sort_label = match component.sort {
        SortDirection::Descending => "Newest first",
        SortDirection::Ascending => "Oldest first",
    };
    html! {
        <div class="toolbar">
            <input
                type="search"
                placeholder="Search by client, case number or status"
                value={component.search.clone()}
                oninput={link.callback(|e: InputEvent| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    Msg::SetSearch(input.value())
                })}
            />
            <select onchange={link.callback(|e: Event| {
                let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
                Msg::SetStatusFilter(select.value())
            })}>
                <option value="" selected={component.status_filter.is_empty()}>{ "All statuses" }</option>
                { for FormStatus::KNOWN.iter().map(|status| html! {
                    <option value={status.label().to_string()} selected={component.status_filter == status.label()}>
                        { status.label().to_string() }
                    </option>
                }) }
            </select>
            <button class="btn" onclick={link.callback(|_| Msg::ToggleSort)}>{ sort_label }</button>
            <button class="btn btn-primary" onclick={link.callback(|_| Msg::OpenCreate)}>{ "New intake form" }</button>
            {
                if is_admin && !selected.is_empty() {
                    let count = selected.len();
                    html! {
                        <button
                            class="btn btn-danger"
                            disabled={component.busy}
                            onclick={link.callback(move |_| Msg::Ask(PendingAction::BulkDelete(selected.clone())))}
                        >
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

fn build_table(component: &DashboardComponent, ctx: &Context<DashboardComponent>, rows: &[IntakeForm]) -> Html {
    let link = ctx.link();
    let all_selected = rows.iter().all(|f| component.selected.contains(&f.id));
    html! {
        <table class="data-table">
            <thead>
                <tr>
                    <th>
                        <input
                            type="checkbox"
                            checked={all_selected}
                            onclick={link.callback(move |_| Msg::SelectVisible(!all_selected))}
                        />
                    </th>
                    <th>{ "Client" }</th>
                    <th>{ "Case number" }</th>
                    <th>{ "Status" }</th>
                    <th>{ "Signatures" }</th>
                    <th>{ "Created" }</th>
                    <th>{ "Created by" }</th>
                    <th>{ "Actions" }</th>
                </tr>
            </thead>
            <tbody>
                { for rows.iter().map(|form| build_row(component, ctx, form)) }
            </tbody>
        </table>
    }
}

fn build_row(component: &DashboardComponent, ctx: &Context<DashboardComponent>, form: &IntakeForm) -> Html {
    let link = ctx.link();
    let is_admin = ctx.props().user.is_admin();
    let id = form.id.clone();
    let signed = form.signatures.len();

    let on_status = {
        let id = id.clone();
        link.callback(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            Msg::SetStatus(id.clone(), FormStatus::from(select.value()))
        })
    };
    let on_select = {
        let id = id.clone();
        link.callback(move |_| Msg::ToggleSelected(id.clone()))
    };
    let archive = {
        let id = id.clone();
        let archived = form.archived;
        link.callback(move |_| Msg::SetArchived(id.clone(), !archived))
    };
    let action = |label: &'static str, msg: fn(IntakeForm) -> Msg, class: &'static str| {
        let form = form.clone();
        html! {
            <button class={classes!("btn", "btn-small", class)} disabled={component.busy}
                onclick={link.callback(move |_| msg(form.clone()))}>
                { label }
            </button>
        }
    };

    html! {
        <tr key={form.id.clone()}>
            <td><input type="checkbox" checked={component.selected.contains(&form.id)} onclick={on_select} /></td>
            <td>{ &form.client_name }</td>
            <td>{ &form.case_number }</td>
            <td>
                <select onchange={on_status} disabled={form.archived}>
                    { for FormStatus::KNOWN.iter().map(|status| html! {
                        <option value={status.label().to_string()} selected={&form.status == status}>
                            { status.label().to_string() }
                        </option>
                    }) }
                    {
                        if let FormStatus::Other(label) = &form.status {
                            html! { <option value={label.clone()} selected={true}>{ label }</option> }
                        } else {
                            html! {}
                        }
                    }
                </select>
            </td>
            <td>{ format!("{}/{}", signed, SignerRole::ALL.len()) }</td>
            <td>{ format_date(form.created_at) }</td>
            <td>{ form.created_by.as_ref().map(|c| c.display_name().to_string()).unwrap_or_default() }</td>
            <td class="row-actions">
                {
                    if form.archived {
                        html! {}
                    } else {
                        html! {
                            <>
                                { action("Edit", Msg::OpenEdit, "") }
                                { action("Sign", Msg::OpenSignatures, "") }
                                { action("Documents", Msg::OpenDocuments, "") }
                                { action("Generate", |f| Msg::Ask(PendingAction::GenerateDocuments(f)), "") }
                            </>
                        }
                    }
                }
                <button class="btn btn-small" disabled={component.busy} onclick={archive}>
                    { if form.archived { "Restore" } else { "Archive" } }
                </button>
                {
                    if form.archived && is_admin {
                        action("Delete permanently", |f| Msg::Ask(PendingAction::PermanentDelete(f)), "btn-danger")
                    } else if !form.archived {
                        action("Delete", |f| Msg::Ask(PendingAction::Delete(f)), "btn-danger")
                    } else {
                        html! {}
                    }
                }
            </td>
        </tr>
    }
}

fn build_create_dialog(component: &DashboardComponent, link: &Scope<DashboardComponent>) -> Html {
    let Some(draft) = &component.draft else {
        return html! {};
    };
    let input = |label: &'static str, field: DraftField, value: String| {
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
    let notes = draft
        .details
        .get("notes")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    html! {
        <YwMaterialTopSheet node_ref={NodeRef::default()} open={true}>
            <div class="dialog">
                <h3>{ if component.editing.is_some() { "Edit intake form" } else { "New intake form" } }</h3>
                { input("Client name", DraftField::ClientName, draft.client_name.clone()) }
                { input("Case number", DraftField::CaseNumber, draft.case_number.clone()) }
                { input("Notes", DraftField::Notes, notes) }
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
                        { if component.editing.is_some() { "Save" } else { "Create" } }
                    </button>
                </div>
            </div>
        </YwMaterialTopSheet>
    }
}

fn build_confirm(component: &DashboardComponent, link: &Scope<DashboardComponent>) -> Html {
    let Some(action) = &component.pending else {
        return html! {};
    };
    let (title, message, confirm) = match action {
        PendingAction::Delete(form) => (
            "Delete intake form",
            format!("Delete the intake form for {} ({})?", form.client_name, form.case_number),
            "Delete",
        ),
        PendingAction::PermanentDelete(form) => (
            "Delete permanently",
            format!(
                "Permanently delete the intake form for {}? This cannot be undone.",
                form.client_name
            ),
            "Delete permanently",
        ),
        PendingAction::BulkDelete(ids) => (
            "Delete selected forms",
            format!("Delete {} selected intake form(s)? This cannot be undone.", ids.len()),
            "Delete",
        ),
        PendingAction::GenerateDocuments(form) => (
            "Generate documents",
            format!(
                "Generate all documents for {}? Existing generated documents will be replaced.",
                form.client_name
            ),
            "Generate",
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
