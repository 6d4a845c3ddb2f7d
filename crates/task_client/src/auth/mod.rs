pub mod auth_handler;
pub mod credential_store;
pub mod validation;
