pub mod api;
pub mod auth;
pub mod client_trait;
pub mod endpoints;
pub mod error;
pub mod feedback;

pub use api::client::TaskApiClient;
pub use api::request::ApiRequest;
pub use auth::auth_handler::AuthHandler;
pub use auth::credential_store::CredentialStore;
pub use client_trait::TaskApiDispatch;
pub use error::ClientError;
pub use feedback::user_facing_message;
pub use task_core::Config;
