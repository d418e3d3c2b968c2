//! Sign-in form.

use yew::platform::spawn_local;
use yew::prelude::*;

use common::api::dto::LoginResponse;
use common::model::User;
use common::ClientError;

use crate::api::ApiClient;

#[derive(Properties, PartialEq, Clone)]
pub struct LoginProps {
    pub api: ApiClient,
    /// Receives the raw token and the user, when the login response carries one.
    pub on_logged_in: Callback<(String, Option<User>)>,
}

pub enum Msg {
    SetUsername(String),
    SetPassword(String),
    Submit,
    Answered(Result<LoginResponse, ClientError>),
}

pub struct LoginComponent {
    username: String,
    password: String,
    submitting: bool,
    error: Option<String>,
}

impl Component for LoginComponent {
    type Message = Msg;
    type Properties = LoginProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            submitting: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetUsername(value) => {
                self.username = value;
                false
            }
            Msg::SetPassword(value) => {
                self.password = value;
                false
            }
            Msg::Submit => {
                if self.submitting {
                    return false;
                }
                if self.username.trim().is_empty() || self.password.is_empty() {
                    self.error = Some("Enter your username and password.".to_string());
                    return true;
                }
                self.submitting = true;
                self.error = None;
                let api = ctx.props().api.clone();
                let (username, password) = (self.username.clone(), self.password.clone());
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Answered(api.login(&username, &password).await));
                });
                true
            }
            Msg::Answered(Ok(response)) => {
                self.submitting = false;
                self.password.clear();
                ctx.props().on_logged_in.emit((response.token, response.user));
                true
            }
            Msg::Answered(Err(err)) => {
                self.submitting = false;
                self.error = Some(match err {
                    ClientError::Unauthorized => "Invalid username or password.".to_string(),
                    other => other.to_string(),
                });
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        html! {
            <div class="login-root">
                <form class="card login-card" onsubmit={onsubmit}>
                    <h2>{ "Case Documents" }</h2>
                    <label>{ "Username" }
                        <input
                            type="text"
                            autocomplete="username"
                            value={self.username.clone()}
                            oninput={link.callback(|e: InputEvent| {
                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                Msg::SetUsername(input.value())
                            })}
                        />
                    </label>
                    <label>{ "Password" }
                        <input
                            type="password"
                            autocomplete="current-password"
                            value={self.password.clone()}
                            oninput={link.callback(|e: InputEvent| {
                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                Msg::SetPassword(input.value())
                            })}
                        />
                    </label>
                    {
                        if let Some(error) = &self.error {
                            html! { <div class="form-error">{ error }</div> }
                        } else {
                            html! {}
                        }
                    }
                    <button class="btn btn-primary" type="submit" disabled={self.submitting}>
                        { if self.submitting { "Signing in…" } else { "Sign in" } }
                    </button>
                </form>
            </div>
        }
    }
}
