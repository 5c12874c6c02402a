pub mod auth;
pub mod error;

pub use auth::{Credential, CredentialStore, ACCESS_TOKEN_KEY};
pub use error::{ErrorKind, RequestError, StoreError};
