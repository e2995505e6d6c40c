use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_REFERENCE_LEN: usize = 255;
pub const MAX_DOCUMENTS: usize = 10;
/// Combined size of all base64 document bodies accepted by Keynua (4.5 MB).
pub const MAX_DOCUMENTS_BYTES: usize = 4_500_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

/// Inbound request to create a contract in Keynua.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default)]
    pub language: Language,
    /// Notification channels ("sms", "whatsapp", "email"). Keynua expects
    /// these under `flags`, see [`crate::services::normalizer`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_notification_options: Option<Vec<String>>,
    /// ISO-8601 expiration, forwarded to Keynua exactly as received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_in_hours: Option<u32>,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<String>,
    pub documents: Vec<Document>,
    pub users: Vec<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<Flags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_options: Option<Map<String, Value>>,
}

/// PDF to be signed, sent either inline as base64 or by a Keynua storage id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_id: Option<String>,
}

/// Signer or participant of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations_to_skip: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_notification_options: Option<Vec<String>>,
}

impl ContractRequest {
    /// Checks the structural rules Keynua imposes on a contract request.
    ///
    /// Every violation is collected so the caller can report them together.
    /// The sms/whatsapp exclusion and the base64/storageId exclusivity are
    /// left to Keynua.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();

        if self.title.trim().is_empty() {
            violations.push("title should not be empty".to_string());
        }
        check_max_len(&mut violations, "title", Some(&self.title), MAX_TITLE_LEN);
        check_max_len(
            &mut violations,
            "description",
            self.description.as_deref(),
            MAX_DESCRIPTION_LEN,
        );
        check_max_len(
            &mut violations,
            "reference",
            self.reference.as_deref(),
            MAX_REFERENCE_LEN,
        );

        if self.template_id.trim().is_empty() {
            violations.push("templateId should not be empty".to_string());
        }

        if let Some(expiration) = &self.expiration_datetime {
            if !is_iso8601(expiration) {
                violations.push("expirationDatetime must be in ISO 8601 format".to_string());
            }
        }

        if self.expiration_in_hours == Some(0) {
            violations.push("expirationInHours must not be less than 1".to_string());
        }

        if self.documents.is_empty() || self.documents.len() > MAX_DOCUMENTS {
            violations.push(format!(
                "documents must contain between 1 and {} elements",
                MAX_DOCUMENTS
            ));
        }
        for (i, document) in self.documents.iter().enumerate() {
            if document.name.trim().is_empty() {
                violations.push(format!("documents.{}.name should not be empty", i));
            }
        }
        let encoded_bytes: usize = self
            .documents
            .iter()
            .filter_map(|d| d.base64.as_ref())
            .map(String::len)
            .sum();
        if encoded_bytes > MAX_DOCUMENTS_BYTES {
            violations.push(format!(
                "documents exceed the {} byte limit ({} bytes)",
                MAX_DOCUMENTS_BYTES, encoded_bytes
            ));
        }

        if self.users.is_empty() {
            violations.push("users should not be empty".to_string());
        }
        for (i, user) in self.users.iter().enumerate() {
            if user.name.trim().is_empty() {
                violations.push(format!("users.{}.name should not be empty", i));
            }
            if let Some(email) = &user.email {
                if !looks_like_email(email) {
                    violations.push(format!("users.{}.email must be an email", i));
                }
            }
            if user.groups.is_empty() {
                violations.push(format!("users.{}.groups should not be empty", i));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn check_max_len(violations: &mut Vec<String>, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        if value.chars().count() > max {
            violations.push(format!(
                "{} must be shorter than or equal to {} characters",
                field, max
            ));
        }
    }
}

/// Accepts full timestamps with an offset, local date-times and bare dates.
fn is_iso8601(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
}
