use async_trait::async_trait;

use crate::error::ClientError;
use crate::model::{SignerRole, StandaloneSignature};

/// Record a slot signature is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureTarget {
    IntakeForm(String),
    Document(String),
}

impl SignatureTarget {
    pub fn id(&self) -> &str {
        match self {
            SignatureTarget::IntakeForm(id) | SignatureTarget::Document(id) => id,
        }
    }
}

/// Backend operations the capture workflows persist through.
///
/// Futures are not `Send`: the browser runs everything on one thread.
#[async_trait(?Send)]
pub trait SignatureStore {
    async fn save_signature(
        &self,
        target: &SignatureTarget,
        role: SignerRole,
        image: &str,
    ) -> Result<(), ClientError>;

    async fn clear_signature(
        &self,
        target: &SignatureTarget,
        role: SignerRole,
    ) -> Result<(), ClientError>;

    async fn submit_standalone(
        &self,
        document_id: &str,
        signatures: &[StandaloneSignature],
    ) -> Result<(), ClientError>;
}
