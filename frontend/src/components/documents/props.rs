use yew::prelude::*;

use common::model::{IntakeForm, User};
use common::ClientError;

use crate::api::ApiClient;
use crate::app::Screen;

/// Which documents the screen lists.
#[derive(Clone, PartialEq)]
pub enum DocumentSource {
    Intake(IntakeForm),
    Standalone,
}

impl DocumentSource {
    /// Client the exported file is named after, when known up front.
    pub fn client_name(&self) -> Option<String> {
        match self {
            DocumentSource::Intake(form) => Some(form.client_name.clone()),
            DocumentSource::Standalone => None,
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct DocumentsProps {
    pub api: ApiClient,
    pub user: User,
    pub source: DocumentSource,
    pub on_error: Callback<ClientError>,
    pub on_navigate: Callback<Screen>,
}
