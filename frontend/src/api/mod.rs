//! HTTP client for the REST API.
//!
//! Paths and bodies come from `common::api`; this module only owns the
//! transport. The client is built from an explicit [`Session`] so every
//! request carries the token of the session it was created for.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

use common::api::dto::{
    ArchiveUpdate, BulkDeleteRequest, CreateStandaloneDocument, DocumentFieldsUpdate,
    IntakeFormDraft, Listing, LoginRequest, LoginResponse, PdfMultipleRequest, PdfRequest,
    RegisterRequest, SignatureUpdate, StandaloneSignaturesRequest, StatusUpdate,
};
use common::api::{bearer, routes, Endpoint, Method};
use common::export::ExportBackend;
use common::model::{Document, FormStatus, IntakeForm, SignerRole, StandaloneSignature, User};
use common::session::Session;
use common::signature::{SignatureStore, SignatureTarget};
use common::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: &Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: session.token().map(str::to_string),
        }
    }

    fn builder(&self, endpoint: &Endpoint) -> RequestBuilder {
        let url = endpoint.url(&self.base_url);
        let builder = match endpoint.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Delete => Request::delete(&url),
        };
        match &self.token {
            Some(token) => builder.header("Authorization", &bearer(token)),
            None => builder,
        }
    }

    async fn send(&self, endpoint: Endpoint) -> Result<Response, ClientError> {
        let response = self.builder(&endpoint).send().await.map_err(transport)?;
        check(&endpoint, response).await
    }

    async fn send_json<B: Serialize>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<Response, ClientError> {
        let request = self
            .builder(&endpoint)
            .json(body)
            .map_err(|err| ClientError::Decode(err.to_string()))?;
        let response = request.send().await.map_err(transport)?;
        check(&endpoint, response).await
    }

    // Authentication and users

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        decode(self.send_json(routes::login(), &body).await?).await
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        decode(self.send(routes::me()).await?).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        decode_list(self.send(routes::list_users()).await?).await
    }

    pub async fn register_user(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        self.send_json(routes::register_user(), request).await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ClientError> {
        self.send(routes::delete_user(id)).await?;
        Ok(())
    }

    // Intake forms

    pub async fn list_intake_forms(&self) -> Result<Vec<IntakeForm>, ClientError> {
        decode_list(self.send(routes::list_intake_forms()).await?).await
    }

    pub async fn get_intake_form(&self, id: &str) -> Result<IntakeForm, ClientError> {
        decode(self.send(routes::get_intake_form(id)).await?).await
    }

    pub async fn create_intake_form(&self, draft: &IntakeFormDraft) -> Result<IntakeForm, ClientError> {
        decode(self.send_json(routes::create_intake_form(), draft).await?).await
    }

    pub async fn update_intake_form(
        &self,
        id: &str,
        draft: &IntakeFormDraft,
    ) -> Result<IntakeForm, ClientError> {
        decode(self.send_json(routes::update_intake_form(id), draft).await?).await
    }

    pub async fn delete_intake_form(&self, id: &str) -> Result<(), ClientError> {
        self.send(routes::delete_intake_form(id)).await?;
        Ok(())
    }

    pub async fn update_intake_status(&self, id: &str, status: FormStatus) -> Result<(), ClientError> {
        self.send_json(routes::intake_form_status(id), &StatusUpdate { status })
            .await?;
        Ok(())
    }

    pub async fn set_intake_archived(&self, id: &str, archived: bool) -> Result<(), ClientError> {
        self.send_json(routes::intake_form_archive(id), &ArchiveUpdate { archived })
            .await?;
        Ok(())
    }

    pub async fn permanently_delete_intake_form(&self, id: &str) -> Result<(), ClientError> {
        self.send(routes::intake_form_permanent_delete(id)).await?;
        Ok(())
    }

    pub async fn bulk_delete_intake_forms(&self, ids: Vec<String>) -> Result<(), ClientError> {
        self.send_json(routes::intake_forms_bulk_delete(), &BulkDeleteRequest { ids })
            .await?;
        Ok(())
    }

    // Documents

    pub async fn generate_documents(&self, intake_form_id: &str) -> Result<Vec<Document>, ClientError> {
        decode_list(self.send(routes::generate_documents(intake_form_id)).await?).await
    }

    pub async fn documents_for_intake(&self, intake_form_id: &str) -> Result<Vec<Document>, ClientError> {
        decode_list(self.send(routes::documents_for_intake(intake_form_id)).await?).await
    }

    pub async fn get_document(&self, id: &str) -> Result<Document, ClientError> {
        decode(self.send(routes::get_document(id)).await?).await
    }

    pub async fn update_document_fields(
        &self,
        id: &str,
        fields: BTreeMap<String, serde_json::Value>,
    ) -> Result<Document, ClientError> {
        let body = DocumentFieldsUpdate { fields };
        decode(self.send_json(routes::update_document(id), &body).await?).await
    }

    pub async fn create_standalone_document(
        &self,
        request: &CreateStandaloneDocument,
    ) -> Result<Document, ClientError> {
        decode(self.send_json(routes::create_standalone_document(), request).await?).await
    }

    pub async fn list_standalone_documents(&self) -> Result<Vec<Document>, ClientError> {
        decode_list(self.send(routes::list_standalone_documents()).await?).await
    }

    pub async fn permanently_delete_document(&self, id: &str) -> Result<(), ClientError> {
        self.send(routes::document_permanent_delete(id)).await?;
        Ok(())
    }

    pub async fn bulk_delete_documents(&self, ids: Vec<String>) -> Result<(), ClientError> {
        self.send_json(routes::documents_bulk_delete(), &BulkDeleteRequest { ids })
            .await?;
        Ok(())
    }

    // PDF rendering

    pub async fn generate_pdf(&self, html: &str, filename: &str) -> Result<Vec<u8>, ClientError> {
        let body = PdfRequest {
            html: html.to_string(),
            filename: filename.to_string(),
        };
        let response = self.send_json(routes::generate_pdf(), &body).await?;
        response.binary().await.map_err(transport)
    }

    /// Server-side merge of already rendered documents, one copy each.
    pub async fn generate_multiple_pdf(
        &self,
        documents: Vec<PdfRequest>,
        filename: &str,
    ) -> Result<Vec<u8>, ClientError> {
        let body = PdfMultipleRequest {
            documents,
            filename: filename.to_string(),
        };
        let response = self.send_json(routes::generate_multiple_pdf(), &body).await?;
        response.binary().await.map_err(transport)
    }
}

#[async_trait(?Send)]
impl SignatureStore for ApiClient {
    async fn save_signature(
        &self,
        target: &SignatureTarget,
        role: SignerRole,
        image: &str,
    ) -> Result<(), ClientError> {
        let body = SignatureUpdate {
            signature_type: role,
            signature: Some(image.to_string()),
            position: None,
        };
        let endpoint = match target {
            SignatureTarget::IntakeForm(id) => routes::intake_form_signature(id),
            SignatureTarget::Document(id) => routes::document_signature(id),
        };
        self.send_json(endpoint, &body).await?;
        Ok(())
    }

    async fn clear_signature(
        &self,
        target: &SignatureTarget,
        role: SignerRole,
    ) -> Result<(), ClientError> {
        match target {
            SignatureTarget::Document(id) => {
                self.send(routes::delete_document_signature(id, role)).await?;
            }
            // Intake forms have no delete route; a null image clears the slot.
            SignatureTarget::IntakeForm(id) => {
                let body = SignatureUpdate {
                    signature_type: role,
                    signature: None,
                    position: None,
                };
                self.send_json(routes::intake_form_signature(id), &body)
                    .await?;
            }
        }
        Ok(())
    }

    async fn submit_standalone(
        &self,
        document_id: &str,
        signatures: &[StandaloneSignature],
    ) -> Result<(), ClientError> {
        let body = StandaloneSignaturesRequest {
            signatures: signatures.to_vec(),
        };
        self.send_json(routes::standalone_signatures(document_id), &body)
            .await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl ExportBackend for ApiClient {
    async fn fetch_document(&self, id: &str) -> Result<Document, ClientError> {
        self.get_document(id).await
    }

    async fn render_pdf(&self, markup: &str, filename: &str) -> Result<Vec<u8>, ClientError> {
        self.generate_pdf(markup, filename).await
    }
}

fn transport(err: gloo_net::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

async fn check(endpoint: &Endpoint, response: Response) -> Result<Response, ClientError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let err = ClientError::from_response(status, &body);
    log::warn!("{} {} failed: {}", endpoint.method, endpoint.path, err);
    Err(err)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.text().await.map_err(transport)?;
    Ok(serde_json::from_str(&body)?)
}

async fn decode_list<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, ClientError> {
    Ok(decode::<Listing<serde_json::Value>>(response).await?.decode_items())
}
