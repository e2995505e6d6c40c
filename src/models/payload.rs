use super::{Document, Flags, Language, User};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of the `PUT` sent to Keynua.
///
/// Mirrors [`super::ContractRequest`] without the top-level notification
/// options, which Keynua only reads from `flags`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub language: Language,
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
    pub flags: Flags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_options: Option<Map<String, Value>>,
}
