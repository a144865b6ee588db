//! Registered customer display model

use serde::Serialize;
use tabled::Tabled;

use crate::output::formatters::{format_amount, format_timestamp_local};
use crate::registry::RegisteredClient;

/// Registered customer display model for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ClientDisplay {
    /// Onboarding ID
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "DOCUMENT")]
    pub document: String,

    #[tabled(rename = "EMAIL")]
    pub email: String,

    /// Initial deposit, thousands-separated
    #[tabled(rename = "AMOUNT")]
    pub amount: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    /// Local registration time
    #[tabled(rename = "REGISTERED")]
    pub registered: String,
}

impl From<&RegisteredClient> for ClientDisplay {
    fn from(client: &RegisteredClient) -> Self {
        Self {
            id: client.id.clone(),
            name: client.name.clone(),
            document: client.document.clone(),
            email: client.email.clone(),
            amount: format_amount(client.initial_amount),
            status: client.status.clone(),
            registered: format_timestamp_local(client.registered_at),
        }
    }
}

impl ClientDisplay {
    /// Field/value pairs for single-record output
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Name", self.name.clone()),
            ("Document", self.document.clone()),
            ("Email", self.email.clone()),
            ("Initial amount", self.amount.clone()),
            ("Status", self.status.clone()),
            ("Registered", self.registered.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn client() -> RegisteredClient {
        RegisteredClient {
            id: "onb-42".to_string(),
            name: "Ana Torres".to_string(),
            document: "12345678".to_string(),
            email: "ana@example.com".to_string(),
            initial_amount: 1500.5,
            status: "REQUESTED".to_string(),
            registered_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_client_display_formats_amount() {
        let display = ClientDisplay::from(&client());

        assert_eq!(display.id, "onb-42");
        assert_eq!(display.amount, "1,500.50");
        assert!(display.registered.contains("2026"));
    }

    #[test]
    fn test_fields_cover_every_column() {
        let fields = ClientDisplay::from(&client()).fields();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], ("ID", "onb-42".to_string()));
    }
}
