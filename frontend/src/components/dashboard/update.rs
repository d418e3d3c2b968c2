//! Update function for the intake-form dashboard.
//!
//! Mutations go through the API and end in `Msg::Done`, which reloads the
//! list; the table is never patched locally so it always mirrors the backend.

use yew::platform::spawn_local;
use yew::prelude::*;

use common::api::dto::IntakeFormDraft;
use common::dashboard::DashboardTab;
use common::validation::validate_intake_draft;
use common::ClientError;

use crate::app::Screen;
use crate::helpers::{show_error, show_toast};

use super::messages::{Msg, PendingAction};
use super::state::DashboardComponent;

pub fn update(
    component: &mut DashboardComponent,
    ctx: &Context<DashboardComponent>,
    msg: Msg,
) -> bool {
    let props = ctx.props();
    match msg {
        Msg::Load => {
            component.loading = true;
            let api = props.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::Loaded(api.list_intake_forms().await));
            });
            true
        }
        Msg::Loaded(Ok(forms)) => {
            component.loading = false;
            component.selected.retain(|id| forms.iter().any(|f| &f.id == id));
            component.forms = forms;
            true
        }
        Msg::Loaded(Err(err)) => {
            component.loading = false;
            fail(ctx, err);
            true
        }
        Msg::SetTab(index) => {
            let tabs = DashboardTab::visible(props.user.is_admin());
            component.active_tab = index.min(tabs.len().saturating_sub(1));
            component.selected.clear();
            true
        }
        Msg::SetSearch(term) => {
            component.search = term;
            true
        }
        Msg::SetStatusFilter(status) => {
            component.status_filter = status;
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
                component.visible(&props.user).into_iter().map(|f| f.id).collect()
            } else {
                Vec::new()
            };
            component.selected = visible.into_iter().collect();
            true
        }
        Msg::SetStatus(id, status) => {
            let api = props.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let label = status.label().to_string();
                let result = api
                    .update_intake_status(&id, status)
                    .await
                    .map(|_| format!("Status set to {}.", label));
                link.send_message(Msg::Done(result));
            });
            false
        }
        Msg::SetArchived(id, archived) => {
            let api = props.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api.set_intake_archived(&id, archived).await.map(|_| {
                    if archived {
                        "Intake form archived.".to_string()
                    } else {
                        "Intake form restored.".to_string()
                    }
                });
                link.send_message(Msg::Done(result));
            });
            false
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
                match action {
                    PendingAction::Delete(form) => {
                        let result = api
                            .delete_intake_form(&form.id)
                            .await
                            .map(|_| format!("Intake form for {} deleted.", form.client_name));
                        link.send_message(Msg::Done(result));
                    }
                    PendingAction::PermanentDelete(form) => {
                        let result = api
                            .permanently_delete_intake_form(&form.id)
                            .await
                            .map(|_| format!("Intake form for {} permanently deleted.", form.client_name));
                        link.send_message(Msg::Done(result));
                    }
                    PendingAction::BulkDelete(ids) => {
                        let count = ids.len();
                        let result = api
                            .bulk_delete_intake_forms(ids)
                            .await
                            .map(|_| format!("{} intake form(s) deleted.", count));
                        link.send_message(Msg::Done(result));
                    }
                    PendingAction::GenerateDocuments(form) => {
                        let result = api.generate_documents(&form.id).await;
                        link.send_message(Msg::Generated(form, result));
                    }
                }
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
        Msg::Generated(form, result) => {
            component.busy = false;
            match result {
                Ok(documents) => {
                    show_toast(&format!("{} document(s) generated.", documents.len()));
                    props.on_navigate.emit(Screen::IntakeDocuments(form));
                }
                Err(err) => fail(ctx, err),
            }
            true
        }
        Msg::OpenCreate => {
            component.draft = Some(IntakeFormDraft::default());
            component.editing = None;
            component.draft_error = None;
            true
        }
        Msg::OpenEdit(form) => {
            component.draft = Some(IntakeFormDraft {
                client_name: form.client_name,
                case_number: form.case_number,
                details: form.details,
            });
            component.editing = Some(form.id);
            component.draft_error = None;
            true
        }
        Msg::EditDraft(field, value) => {
            if let Some(draft) = component.draft.as_mut() {
                field.apply(draft, value);
            }
            false
        }
        Msg::SubmitCreate => {
            let Some(draft) = component.draft.as_ref() else {
                return false;
            };
            match validate_intake_draft(draft) {
                Ok(draft) => {
                    component.draft_error = None;
                    component.busy = true;
                    let api = props.api.clone();
                    let editing = component.editing.clone();
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        let result = match editing {
                            Some(id) => api.update_intake_form(&id, &draft).await,
                            None => api.create_intake_form(&draft).await,
                        };
                        link.send_message(Msg::Created(result));
                    });
                }
                Err(err) => component.draft_error = Some(err.to_string()),
            }
            true
        }
        Msg::Created(Ok(form)) => {
            component.busy = false;
            component.draft = None;
            let verb = if component.editing.take().is_some() { "updated" } else { "created" };
            show_toast(&format!("Intake form for {} {}.", form.client_name, verb));
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
            component.editing = None;
            true
        }
        Msg::OpenSignatures(form) => {
            let api = props.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::SignaturesReady(api.get_intake_form(&form.id).await));
            });
            false
        }
        Msg::SignaturesReady(Ok(form)) => {
            component.signing = Some(form);
            true
        }
        Msg::SignaturesReady(Err(err)) => {
            fail(ctx, err);
            false
        }
        Msg::SignaturesClosed => {
            component.signing = None;
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::OpenDocuments(form) => {
            props.on_navigate.emit(Screen::IntakeDocuments(form));
            false
        }
    }
}

fn fail(ctx: &Context<DashboardComponent>, err: ClientError) {
    match err {
        ClientError::Unauthorized => ctx.props().on_error.emit(err),
        other => show_error(&other.to_string()),
    }
}
