//! User management, reachable by administrators only.

use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::{User, UserRole};
use common::validation::{ensure_user_deletable, Registration};
use common::ClientError;

use crate::api::ApiClient;
use crate::helpers::{format_date, show_error, show_toast};
use crate::tops_sheet::confirm_dialog::ConfirmDialog;

#[derive(Properties, PartialEq, Clone)]
pub struct UsersProps {
    pub api: ApiClient,
    pub user: User,
    pub on_error: Callback<ClientError>,
}

#[derive(Clone, Copy, PartialEq)]
pub enum Field {
    Username,
    Name,
    Password,
    ConfirmPassword,
    Role,
}

pub enum Msg {
    Load,
    Loaded(Result<Vec<User>, ClientError>),
    Edit(Field, String),
    Register,
    Registered(Result<(), ClientError>),
    AskDelete(User),
    CancelDelete,
    ConfirmDelete,
    Deleted(Result<String, ClientError>),
}

pub struct UsersComponent {
    users: Vec<User>,
    loading: bool,
    form: Registration,
    form_error: Option<String>,
    deleting: Option<User>,
    busy: bool,
}

impl Component for UsersComponent {
    type Message = Msg;
    type Properties = UsersProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Load);
        Self {
            users: Vec::new(),
            loading: true,
            form: Registration::default(),
            form_error: None,
            deleting: None,
            busy: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let props = ctx.props();
        match msg {
            Msg::Load => {
                self.loading = true;
                let api = props.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Loaded(api.list_users().await));
                });
                true
            }
            Msg::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(users) => self.users = users,
                    Err(err) => fail(props, err),
                }
                true
            }
            Msg::Edit(field, value) => {
                match field {
                    Field::Username => self.form.username = value,
                    Field::Name => self.form.name = value,
                    Field::Password => self.form.password = value,
                    Field::ConfirmPassword => self.form.confirm_password = value,
                    Field::Role => self.form.role = UserRole::from_key(&value),
                }
                false
            }
            Msg::Register => {
                match self.form.validate() {
                    Ok(request) => {
                        self.form_error = None;
                        self.busy = true;
                        let api = props.api.clone();
                        let link = ctx.link().clone();
                        spawn_local(async move {
                            link.send_message(Msg::Registered(api.register_user(&request).await));
                        });
                    }
                    Err(err) => self.form_error = Some(err.to_string()),
                }
                true
            }
            Msg::Registered(Ok(())) => {
                self.busy = false;
                show_toast(&format!("User {} created.", self.form.username.trim()));
                self.form = Registration::default();
                ctx.link().send_message(Msg::Load);
                true
            }
            Msg::Registered(Err(err)) => {
                self.busy = false;
                match err {
                    ClientError::Unauthorized => props.on_error.emit(err),
                    other => self.form_error = Some(other.to_string()),
                }
                true
            }
            Msg::AskDelete(user) => match ensure_user_deletable(&user, &props.user) {
                Ok(()) => {
                    self.deleting = Some(user);
                    true
                }
                Err(err) => {
                    show_error(&err.to_string());
                    false
                }
            },
            Msg::CancelDelete => {
                self.deleting = None;
                true
            }
            Msg::ConfirmDelete => {
                let Some(user) = self.deleting.take() else {
                    return false;
                };
                self.busy = true;
                let api = props.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api
                        .delete_user(&user.id)
                        .await
                        .map(|_| format!("User {} deleted.", user.username));
                    link.send_message(Msg::Deleted(result));
                });
                true
            }
            Msg::Deleted(result) => {
                self.busy = false;
                match result {
                    Ok(message) => show_toast(&message),
                    Err(err) => fail(props, err),
                }
                ctx.link().send_message(Msg::Load);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="users-root">
                <h2>{ "Users" }</h2>
                {
                    if self.loading {
                        html! { <div class="loading">{ "Loading users…" }</div> }
                    } else {
                        self.build_table(ctx)
                    }
                }
                { self.build_form(link) }
                {
                    if let Some(user) = &self.deleting {
                        html! {
                            <ConfirmDialog
                                title="Delete user"
                                message={format!("Delete {} ({})? They will no longer be able to sign in.", user.display_name(), user.username)}
                                on_confirm={link.callback(|_| Msg::ConfirmDelete)}
                                on_cancel={link.callback(|_| Msg::CancelDelete)}
                            />
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }
}

impl UsersComponent {
    fn build_table(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let acting = &ctx.props().user;
        html! {
            <table class="data-table">
                <thead>
                    <tr>
                        <th>{ "Username" }</th>
                        <th>{ "Name" }</th>
                        <th>{ "Role" }</th>
                        <th>{ "Created" }</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    { for self.users.iter().map(|user| {
                        let deletable = ensure_user_deletable(user, acting).is_ok();
                        let target = user.clone();
                        html! {
                            <tr key={user.id.clone()}>
                                <td>{ &user.username }</td>
                                <td>{ &user.name }</td>
                                <td>{ user.role.label() }</td>
                                <td>{ format_date(user.created_at) }</td>
                                <td>
                                    {
                                        if deletable {
                                            html! {
                                                <button class="btn btn-small btn-danger" disabled={self.busy}
                                                    onclick={link.callback(move |_| Msg::AskDelete(target.clone()))}>
                                                    { "Delete" }
                                                </button>
                                            }
                                        } else {
                                            html! {}
                                        }
                                    }
                                </td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        }
    }

    fn build_form(&self, link: &Scope<Self>) -> Html {
        let input = |label: &'static str, kind: &'static str, field: Field, value: String| {
            html! {
                <label>{ label }
                    <input
                        type={kind}
                        value={value}
                        oninput={link.callback(move |e: InputEvent| {
                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                            Msg::Edit(field, input.value())
                        })}
                    />
                </label>
            }
        };
        html! {
            <div class="card register-form">
                <h3>{ "Add user" }</h3>
                { input("Username", "text", Field::Username, self.form.username.clone()) }
                { input("Full name", "text", Field::Name, self.form.name.clone()) }
                { input("Password", "password", Field::Password, self.form.password.clone()) }
                { input("Confirm password", "password", Field::ConfirmPassword, self.form.confirm_password.clone()) }
                <label>{ "Role" }
                    <select onchange={link.callback(|e: Event| {
                        let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
                        Msg::Edit(Field::Role, select.value())
                    })}>
                        <option value="" selected={self.form.role.is_none()}>{ "Choose a role" }</option>
                        { for UserRole::ALL.into_iter().map(|role| html! {
                            <option value={role.as_str()} selected={self.form.role == Some(role)}>{ role.label() }</option>
                        }) }
                    </select>
                </label>
                {
                    if let Some(error) = &self.form_error {
                        html! { <div class="form-error">{ error }</div> }
                    } else {
                        html! {}
                    }
                }
                <button class="btn btn-primary" disabled={self.busy} onclick={link.callback(|_| Msg::Register)}>
                    { "Create user" }
                </button>
            </div>
        }
    }
}

fn fail(props: &UsersProps, err: ClientError) {
    match err {
        ClientError::Unauthorized => props.on_error.emit(err),
        other => show_error(&other.to_string()),
    }
}
