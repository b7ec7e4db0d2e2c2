use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ValidationError, ValidationMessage};
use crate::request::DownloadRequest;
use crate::validate::validate_rules_shape;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Validator for the search-and-download endpoint.
///
/// Intentionally a separate rule set from the validate endpoint: downloads
/// deliver broad result sets by email, so availability status is permitted,
/// identifier whitelisting is not enforced, and rule groups are only checked
/// for shape. Unifying the two validators would silently loosen or tighten
/// one endpoint's contract.
pub fn validate_download_request(req: &DownloadRequest) -> Result<(), ValidationError> {
    let mut messages = Vec::new();

    for field in req.extra.keys() {
        messages.push(ValidationMessage::new(
            "",
            format!("{field} is not an allowed property"),
        ));
    }

    match &req.recipients {
        None => messages.push(ValidationMessage::new(
            "/recipients/to",
            "recipients.to is mandatory",
        )),
        Some(recipients) => {
            match recipients.to.as_deref() {
                None | Some([]) => messages.push(ValidationMessage::new(
                    "/recipients/to",
                    "recipients.to is mandatory",
                )),
                Some(to) => check_emails(to, "/recipients/to", &mut messages),
            }
            if let Some(cc) = recipients.cc.as_deref() {
                check_emails(cc, "/recipients/cc", &mut messages);
            }
        }
    }

    if req.file_name.as_deref().is_none_or(str::is_empty) {
        messages.push(ValidationMessage::new("/fileName", "fileName is mandatory"));
    }

    if let Some(availability) = &req.availability {
        if availability.name.as_deref().is_none_or(str::is_empty) {
            messages.push(ValidationMessage::new(
                "/availability/name",
                "Availability name is mandatory",
            ));
        }
    }

    match req.rules_list.as_deref() {
        None | Some([]) => messages.push(ValidationMessage::new(
            "/rulesList",
            "Invalid or missing rulesList.",
        )),
        Some(groups) => validate_rules_shape(groups, &mut messages),
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(messages))
    }
}

fn check_emails(emails: &[String], path: &str, messages: &mut Vec<ValidationMessage>) {
    for email in emails {
        if !EMAIL_RE.is_match(email) {
            messages.push(ValidationMessage::new(
                path,
                format!("{email} is not a valid email address"),
            ));
        }
    }
}
