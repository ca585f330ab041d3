mod credentials;

pub use credentials::CredentialsError;
pub use credentials::CredentialsManager;
pub use credentials::CredentialsUpdate;
