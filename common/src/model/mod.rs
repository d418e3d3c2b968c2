pub mod creator;
pub mod document;
pub mod intake_form;
pub mod signature;
pub mod user;

pub use creator::CreatorRef;
pub use document::{CategoryView, Document, DocumentCategory, StandaloneSignature};
pub use intake_form::{FormStatus, IntakeForm};
pub use signature::{Placement, SignatureEntry, SignatureSet, SignerRole};
pub use user::{User, UserRole};
