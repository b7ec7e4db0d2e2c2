use pcm_catalog::{MAX_IDENTIFIER_VALUES, ProductType, is_identifier_attribute};

use crate::error::{ValidationError, ValidationMessage};
use crate::request::{SearchRequest, ValidateRequest};
use crate::token::{MarkerValue, Relationship, RuleGroup, RuleToken};

/// Strict validator for the synchronous validate endpoint.
///
/// All checks run and every failure is collected into one aggregate error,
/// except that a multi-group rulesList short-circuits the per-group checks.
/// This rule set is deliberately stricter than the download validator:
/// the endpoint answers bounded identifier lookups synchronously, so it
/// caps identifier counts and refuses OR and open-ended operators.
pub fn validate_rules_request(req: &ValidateRequest) -> Result<(), ValidationError> {
    let mut messages = Vec::new();

    for field in req.extra.keys() {
        messages.push(ValidationMessage::new(
            "",
            format!("{field} is not an allowed property"),
        ));
    }

    if let Some(availability) = &req.availability {
        if availability.name.as_deref().is_none_or(str::is_empty) {
            messages.push(ValidationMessage::new(
                "/availability/name",
                "Availability name is mandatory",
            ));
        }
        // Status filtering belongs to search, not validate.
        if availability.status.is_some() {
            messages.push(ValidationMessage::new(
                "/availability/status",
                "Availability status is not allowed for this request",
            ));
        }
    }

    if let Some(has_counts) = &req.has_counts {
        if !has_counts.is_boolean() {
            messages.push(ValidationMessage::new(
                "/hasCounts",
                "hasCounts must be a boolean",
            ));
        }
    }

    match req.rules_list.as_deref() {
        None | Some([]) => messages.push(ValidationMessage::new(
            "/rulesList",
            "Invalid or missing rulesList.",
        )),
        Some([group]) => {
            validate_rules_shape(std::slice::from_ref(group), &mut messages);
            validate_group_content(group, 0, &mut messages);
        }
        Some(_) => messages.push(ValidationMessage::new(
            "/rulesList",
            "We support only one rule inside the rulesList",
        )),
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(messages))
    }
}

/// Validator for the search endpoint. Availability status is permitted here
/// and rule groups are only checked for shape, not identifier policy.
pub fn validate_search_request(req: &SearchRequest) -> Result<(), ValidationError> {
    let mut messages = Vec::new();

    if let Some(availability) = &req.availability {
        if availability.name.as_deref().is_none_or(str::is_empty) {
            messages.push(ValidationMessage::new(
                "/availability/name",
                "Availability name is mandatory",
            ));
        }
    }

    if let Some(has_counts) = &req.has_counts {
        if !has_counts.is_boolean() {
            messages.push(ValidationMessage::new(
                "/hasCounts",
                "hasCounts must be a boolean",
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

/// Shape-only rule group checks shared by every endpoint: type present,
/// attributes an array, rules non-empty, BEGIN/END balanced with every
/// criteria and logical token inside a span.
///
/// The scan is linear and tracks only the innermost open/close — it does
/// not fully parse the nesting. Tokens with a missing payload are skipped,
/// mirroring the builder's tolerance of partial legacy tokens.
pub(crate) fn validate_rules_shape(groups: &[RuleGroup], messages: &mut Vec<ValidationMessage>) {
    for (index, group) in groups.iter().enumerate() {
        let path = format!("/rulesList/{index}");

        if group.product_type.is_empty() {
            messages.push(ValidationMessage::new(
                format!("{path}/type"),
                "rulesList type is required",
            ));
        }
        if group.attributes.is_none() {
            messages.push(ValidationMessage::new(
                format!("{path}/attributes"),
                "rulesList attributes must be an array",
            ));
        }
        if group.rules.is_empty() {
            messages.push(ValidationMessage::new(
                format!("{path}/rules"),
                "rulesList rules must not be empty",
            ));
            continue;
        }

        scan_structure(&group.rules, &path, messages);
    }
}

fn scan_structure(rules: &[RuleToken], path: &str, messages: &mut Vec<ValidationMessage>) {
    let mut depth = 0usize;
    let mut top_spans = 0usize;
    let mut unexpected_end = false;
    let mut outside_span = false;

    for token in rules {
        match token.as_marker() {
            Some(MarkerValue::Begin) => {
                if depth == 0 {
                    top_spans += 1;
                }
                depth += 1;
            }
            Some(MarkerValue::End) => {
                if depth == 0 {
                    unexpected_end = true;
                } else {
                    depth -= 1;
                }
            }
            Some(MarkerValue::And) | Some(MarkerValue::Or) => {
                if depth == 0 {
                    outside_span = true;
                }
            }
            None => {
                if token.as_criteria().is_some() && depth == 0 {
                    outside_span = true;
                }
            }
        }
    }

    if unexpected_end {
        messages.push(ValidationMessage::new(
            format!("{path}/rules"),
            "Unexpected END separator in rules",
        ));
    }
    if depth != 0 {
        messages.push(ValidationMessage::new(
            format!("{path}/rules"),
            "Unbalanced BEGIN and END separators in rules",
        ));
    }
    if outside_span {
        messages.push(ValidationMessage::new(
            format!("{path}/rules"),
            "Criteria and logical rules must be enclosed between BEGIN and END separators",
        ));
    }
    if top_spans != 1 {
        messages.push(ValidationMessage::new(
            format!("{path}/rules"),
            "rules must contain exactly one top-level BEGIN and END span",
        ));
    }
}

/// The strict per-group checks that only the validate endpoint applies.
fn validate_group_content(group: &RuleGroup, index: usize, messages: &mut Vec<ValidationMessage>) {
    let path = format!("/rulesList/{index}");

    if !group.product_type.is_empty() && ProductType::parse(&group.product_type).is_none() {
        messages.push(ValidationMessage::new(
            format!("{path}/type"),
            format!("Invalid type {} in rulesList", group.product_type),
        ));
    }

    let identifier_criteria: Vec<_> = group
        .rules
        .iter()
        .filter_map(RuleToken::as_criteria)
        .filter(|c| is_identifier_attribute(&c.attribute))
        .collect();

    if identifier_criteria.is_empty() {
        messages.push(ValidationMessage::new(
            format!("{path}/rules"),
            "At least one of _id, identifiers.isbn or identifiers.doi is required in rules",
        ));
    }

    for criteria in &identifier_criteria {
        if !matches!(criteria.relationship, Relationship::Eq | Relationship::In) {
            messages.push(ValidationMessage::new(
                format!("{path}/rules"),
                format!("{} supports only EQ and IN relationships", criteria.attribute),
            ));
        }
    }

    let total_values: usize = identifier_criteria.iter().map(|c| c.value_count()).sum();
    if total_values > MAX_IDENTIFIER_VALUES {
        messages.push(ValidationMessage::new(
            format!("{path}/rules"),
            "A maximum of 100 identifiers are supported per request",
        ));
    }

    if group
        .rules
        .iter()
        .any(|t| t.as_marker() == Some(MarkerValue::Or))
    {
        messages.push(ValidationMessage::new(
            format!("{path}/rules"),
            "Only AND is supported between rules",
        ));
    }
}
