use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Contract record as returned by Keynua.
///
/// Only `id` and `status` are required; every other field is kept exactly as
/// Keynua sent it (including explicit nulls and fields added later upstream)
/// so the record can be handed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub status: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Contract {
    pub fn lifecycle(&self) -> Option<ContractStatus> {
        ContractStatus::parse(&self.status)
    }

    pub fn account_id(&self) -> Option<&str> {
        self.str_field("accountId")
    }

    pub fn template_id(&self) -> Option<&str> {
        self.str_field("templateId")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// Lifecycle timestamps (`createdAt`, `finishedAt`, ...) as sent, ISO-8601.
    pub fn timestamp(&self, name: &str) -> Option<&str> {
        self.str_field(name)
    }

    pub fn expired(&self) -> bool {
        self.fields
            .get("expired")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn items_count(&self) -> Option<u64> {
        self.fields.get("itemsCount").and_then(Value::as_u64)
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractStatus {
    PendingInput,
    InProgress,
    Finished,
    Canceled,
    Expired,
    Deleted,
}

impl ContractStatus {
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "pending_input" => Some(ContractStatus::PendingInput),
            "in_progress" => Some(ContractStatus::InProgress),
            "finished" => Some(ContractStatus::Finished),
            "canceled" => Some(ContractStatus::Canceled),
            "expired" => Some(ContractStatus::Expired),
            "deleted" => Some(ContractStatus::Deleted),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ContractStatus::Finished
                | ContractStatus::Canceled
                | ContractStatus::Expired
                | ContractStatus::Deleted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_the_upstream_record_verbatim() {
        let body = json!({
            "id": "ctr_1",
            "accountId": "acc_1",
            "templateId": "keynua-peru-default",
            "createdAt": "2025-11-01T15:00:00.000Z",
            "startedAt": null,
            "title": "Service Contract",
            "timezone": null,
            "metadata": { "internalId": "ABC123" },
            "expired": false,
            "itemsCount": 2,
            "signingUrl": "https://sign.example/abc",
            "status": "pending_input"
        });

        let contract: Contract = serde_json::from_value(body.clone()).unwrap();

        assert_eq!(contract.lifecycle(), Some(ContractStatus::PendingInput));
        assert_eq!(contract.timestamp("createdAt"), Some("2025-11-01T15:00:00.000Z"));
        assert_eq!(contract.timestamp("finishedAt"), None);
        assert_eq!(contract.account_id(), Some("acc_1"));
        assert_eq!(contract.items_count(), Some(2));
        assert!(!contract.expired());
        assert_eq!(serde_json::to_value(&contract).unwrap(), body);
    }

    #[test]
    fn requires_an_id_and_status() {
        assert!(serde_json::from_value::<Contract>(json!({ "ok": true })).is_err());
        assert!(serde_json::from_value::<Contract>(json!({ "id": "ctr_1" })).is_err());
    }

    #[test]
    fn unrecognized_status_is_kept_as_sent() {
        let contract: Contract =
            serde_json::from_value(json!({ "id": "ctr_1", "status": "archived" })).unwrap();
        assert_eq!(contract.status, "archived");
        assert_eq!(contract.lifecycle(), None);
    }

    #[test]
    fn terminal_states() {
        assert!(ContractStatus::Finished.is_terminal());
        assert!(ContractStatus::Canceled.is_terminal());
        assert!(!ContractStatus::PendingInput.is_terminal());
        assert!(!ContractStatus::InProgress.is_terminal());
    }
}
