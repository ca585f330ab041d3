use crate::{management::CredentialsManager, success};

/// Clears the persisted credentials.
pub async fn logout() {
    let mut store = CredentialsManager::open_default();
    store.clear();
    success!("Credentials cleared");
}
