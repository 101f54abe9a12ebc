pub mod config;
pub use config::AppConfig;

pub mod credentials;
pub use credentials::{
    BoxedCredentialStore, CredentialStore, FileCredentialStore, StaticCredentialStore,
};
