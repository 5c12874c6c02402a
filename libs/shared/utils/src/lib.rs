pub mod credential_store;
pub mod test_utils;

pub use credential_store::{FileCredentialStore, MemoryCredentialStore};
