use serde_json::Value;
use tabled::Table;

use crate::{info, management::CredentialsManager, types::CredentialTableRow};

/// Displays the persisted credential state as a table.
pub async fn status() {
    let store = CredentialsManager::open_default();

    if !store.has_credentials() {
        info!("Not authenticated. Run vkmcli auth to log in.");
        return;
    }

    let mut rows = vec![CredentialTableRow {
        field: "authenticated".to_string(),
        value: "yes".to_string(),
    }];

    if let Some(user_id) = store.get_client_user_id() {
        rows.push(CredentialTableRow {
            field: "user_id".to_string(),
            value: user_id,
        });
    }
    rows.push(CredentialTableRow {
        field: "user_agent".to_string(),
        value: store.get_user_agent(None),
    });
    if let Some(profile) = store.get_user_profile() {
        for (key, value) in profile {
            let rendered = match value {
                Value::Null => "null".to_string(),
                Value::String(s) => s,
                other => other.to_string(),
            };
            rows.push(CredentialTableRow {
                field: format!("profile_{}", key),
                value: rendered,
            });
        }
    }

    let table = Table::new(rows);
    println!("{}", table);
}
