//! Application shell: boot configuration, session lifecycle and navigation.
//!
//! The session is created once from local storage and replaced wholesale on
//! login and logout. Screens receive an [`ApiClient`] built from it, so a
//! request never reads the token from storage on its own.

use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::{IntakeForm, User};
use common::session::Session;
use common::ClientError;

use crate::api::ApiClient;
use crate::components::dashboard::DashboardComponent;
use crate::components::documents::{DocumentSource, DocumentsComponent};
use crate::components::login::LoginComponent;
use crate::components::users::UsersComponent;
use crate::config::{self, AppConfig};
use crate::helpers::{show_error, show_toast};
use crate::storage::LocalStorageTokenStore;

#[derive(Clone, PartialEq)]
pub enum Screen {
    Dashboard,
    IntakeDocuments(IntakeForm),
    StandaloneDocuments,
    Users,
}

pub enum Msg {
    ConfigLoaded(AppConfig),
    UserLoaded(Result<User, ClientError>),
    LoggedIn { token: String, user: Option<User> },
    Logout,
    Navigate(Screen),
    Failed(ClientError),
}

pub struct App {
    config: Option<AppConfig>,
    session: Session,
    screen: Screen,
    store: LocalStorageTokenStore,
}

impl App {
    fn api(&self) -> ApiClient {
        let base = self.config.as_ref().map(|c| c.api_url.as_str()).unwrap_or("");
        ApiClient::new(base, &self.session)
    }

    fn load_user(&self, ctx: &Context<Self>) {
        let api = self.api();
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::UserLoaded(api.me().await));
        });
    }

    fn end_session(&mut self) {
        self.session.teardown(&self.store);
        self.screen = Screen::Dashboard;
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let store = LocalStorageTokenStore;
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::ConfigLoaded(config::load().await));
        });
        Self {
            config: None,
            session: Session::init(&store),
            screen: Screen::Dashboard,
            store,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ConfigLoaded(config) => {
                self.config = Some(config);
                if self.session.is_authenticated() {
                    self.load_user(ctx);
                }
                true
            }
            Msg::UserLoaded(Ok(user)) => {
                self.session = std::mem::take(&mut self.session).with_user(user);
                true
            }
            Msg::UserLoaded(Err(err)) => {
                log::warn!("could not restore session: {}", err);
                self.end_session();
                true
            }
            Msg::LoggedIn { token, user } => {
                match Session::login(&self.store, &token, user) {
                    Some(session) => {
                        self.session = session;
                        self.screen = Screen::Dashboard;
                        if self.session.user().is_none() {
                            self.load_user(ctx);
                        }
                    }
                    None => show_error("The server did not return a session token."),
                }
                true
            }
            Msg::Logout => {
                self.end_session();
                show_toast("Signed out.");
                true
            }
            Msg::Navigate(screen) => {
                let admin_only = matches!(screen, Screen::Users);
                if admin_only && !self.session.is_admin() {
                    return false;
                }
                self.screen = screen;
                true
            }
            Msg::Failed(ClientError::Unauthorized) => {
                self.end_session();
                show_error(&ClientError::Unauthorized.to_string());
                true
            }
            Msg::Failed(err) => {
                show_error(&err.to_string());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        if self.config.is_none() {
            return html! { <div class="splash">{ "Loading…" }</div> };
        }
        if !self.session.is_authenticated() {
            return html! {
                <LoginComponent
                    api={self.api()}
                    on_logged_in={link.callback(|(token, user)| Msg::LoggedIn { token, user })}
                />
            };
        }
        let Some(user) = self.session.user().cloned() else {
            return html! { <div class="splash">{ "Loading…" }</div> };
        };

        let on_error = link.callback(Msg::Failed);
        let on_navigate = link.callback(Msg::Navigate);
        let api = self.api();
        let page = match &self.screen {
            Screen::Dashboard => html! {
                <DashboardComponent api={api} user={user.clone()} on_error={on_error} on_navigate={on_navigate} />
            },
            Screen::IntakeDocuments(form) => html! {
                <DocumentsComponent
                    api={api}
                    user={user.clone()}
                    source={DocumentSource::Intake(form.clone())}
                    on_error={on_error}
                    on_navigate={on_navigate}
                />
            },
            Screen::StandaloneDocuments => html! {
                <DocumentsComponent
                    api={api}
                    user={user.clone()}
                    source={DocumentSource::Standalone}
                    on_error={on_error}
                    on_navigate={on_navigate}
                />
            },
            Screen::Users => html! {
                <UsersComponent api={api} user={user.clone()} on_error={on_error} />
            },
        };

        html! {
            <div class="app-root">
                <header class="app-bar">
                    <span class="app-title">{ "Case Documents" }</span>
                    <nav>
                        { nav_button(link, "Intake Forms", Screen::Dashboard, &self.screen) }
                        { nav_button(link, "Standalone Documents", Screen::StandaloneDocuments, &self.screen) }
                        {
                            if user.is_admin() {
                                nav_button(link, "Users", Screen::Users, &self.screen)
                            } else {
                                html! {}
                            }
                        }
                    </nav>
                    <span class="app-user">{ format!("{} ({})", user.display_name(), user.role.label()) }</span>
                    <button class="btn" onclick={link.callback(|_| Msg::Logout)}>{ "Sign out" }</button>
                </header>
                <main>{ page }</main>
            </div>
        }
    }
}

fn nav_button(link: &yew::html::Scope<App>, label: &'static str, target: Screen, current: &Screen) -> Html {
    let active = std::mem::discriminant(&target) == std::mem::discriminant(current);
    html! {
        <button
            class={classes!("tab-btn", active.then_some("active"))}
            onclick={link.callback(move |_| Msg::Navigate(target.clone()))}
        >
            { label }
        </button>
    }
}
