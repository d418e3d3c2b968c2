use yew::prelude::*;

use common::model::User;
use common::ClientError;

use crate::api::ApiClient;
use crate::app::Screen;

#[derive(Properties, PartialEq, Clone)]
pub struct DashboardProps {
    pub api: ApiClient,
    pub user: User,
    /// Errors the dashboard cannot handle itself, such as an expired session.
    pub on_error: Callback<ClientError>,
    pub on_navigate: Callback<Screen>,
}
