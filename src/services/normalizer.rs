//! Reshapes a [`ContractRequest`] into the payload Keynua accepts.
//!
//! Document bodies lose their data-URI prefix, phone numbers are reduced to
//! digits and the notification options move under `flags`.

use crate::models::{ContractRequest, Document, Flags, UpstreamPayload, User};

const BASE64_MARKER: &str = "base64,";

pub fn build_payload(request: &ContractRequest) -> UpstreamPayload {
    UpstreamPayload {
        title: request.title.clone(),
        description: request.description.clone(),
        reference: request.reference.clone(),
        language: request.language,
        expiration_datetime: request.expiration_datetime.clone(),
        expiration_in_hours: request.expiration_in_hours,
        template_id: request.template_id.clone(),
        on_behalf_of: request.on_behalf_of.clone(),
        documents: request.documents.iter().map(clean_document).collect(),
        users: request.users.iter().map(clean_user).collect(),
        metadata: request.metadata.clone(),
        // Any inbound `flags` object is superseded.
        flags: Flags {
            chosen_notification_options: request.chosen_notification_options.clone(),
        },
        template_options: request.template_options.clone(),
    }
}

fn clean_document(document: &Document) -> Document {
    Document {
        name: document.name.clone(),
        base64: document.base64.as_deref().map(clear_base64),
        storage_id: document.storage_id.clone(),
    }
}

fn clean_user(user: &User) -> User {
    User {
        name: user.name.clone(),
        email: user.email.clone(),
        phone: user.phone.as_deref().map(digits_only),
        groups: user.groups.clone(),
        validations_to_skip: user.validations_to_skip.clone(),
    }
}

/// Strips a `data:<mime>;base64,` prefix, keeping what follows the last marker.
pub fn clear_base64(value: &str) -> String {
    match value.rsplit_once(BASE64_MARKER) {
        Some((_, body)) => body.to_string(),
        None => value.to_string(),
    }
}

pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}
