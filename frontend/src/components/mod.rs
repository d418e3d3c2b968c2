pub mod dashboard;
pub mod documents;
pub mod login;
pub mod signature;
pub mod users;
