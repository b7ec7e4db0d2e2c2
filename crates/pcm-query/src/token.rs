use bson::Bson;
use serde::{Deserialize, Serialize};

/// Token class in the flat rule sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Separator,
    Criteria,
    Logical,
}

/// Marker value carried by separator and logical tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarkerValue {
    Begin,
    End,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub value: MarkerValue,
}

/// Comparison relationship of a criteria token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relationship {
    Eq,
    Ne,
    In,
    Nin,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
}

impl Relationship {
    /// The storage query operator this relationship compiles to.
    pub fn query_operator(&self) -> &'static str {
        match self {
            Relationship::Eq => "$eq",
            Relationship::Ne => "$ne",
            Relationship::In => "$in",
            Relationship::Nin => "$nin",
            Relationship::Gt => "$gt",
            Relationship::Gte => "$gte",
            Relationship::Lt => "$lt",
            Relationship::Lte => "$lte",
            Relationship::Contains => "$regex",
        }
    }

    /// Relationships that take the plural `values` payload.
    pub fn is_plural(&self) -> bool {
        matches!(self, Relationship::In | Relationship::Nin)
    }
}

/// An attribute comparison. Singular relationships carry `value`,
/// IN/NIN carry `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub attribute: String,
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Bson>>,
}

impl Criteria {
    /// Number of values this criteria contributes to the identifier cap.
    pub fn value_count(&self) -> usize {
        match &self.values {
            Some(values) => values.len(),
            None => usize::from(self.value.is_some()),
        }
    }
}

/// Variant payload of a rule token. Criteria is tried first: markers carry
/// only `value`, which a criteria payload never satisfies on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RulePayload {
    Criteria(Criteria),
    Marker(Marker),
}

/// One element of the flat sequence representing a parenthesized boolean
/// expression. A missing `rule` payload is tolerated end to end — legacy
/// callers send partial tokens and the builder skips them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleToken {
    pub position: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RulePayload>,
}

impl RuleToken {
    pub fn separator(position: i64, value: MarkerValue) -> Self {
        Self {
            position,
            kind: TokenKind::Separator,
            rule: Some(RulePayload::Marker(Marker { value })),
        }
    }

    pub fn logical(position: i64, value: MarkerValue) -> Self {
        Self {
            position,
            kind: TokenKind::Logical,
            rule: Some(RulePayload::Marker(Marker { value })),
        }
    }

    pub fn criteria(position: i64, criteria: Criteria) -> Self {
        Self {
            position,
            kind: TokenKind::Criteria,
            rule: Some(RulePayload::Criteria(criteria)),
        }
    }

    pub fn as_criteria(&self) -> Option<&Criteria> {
        match &self.rule {
            Some(RulePayload::Criteria(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_marker(&self) -> Option<MarkerValue> {
        match &self.rule {
            Some(RulePayload::Marker(m)) => Some(m.value),
            _ => None,
        }
    }
}

/// One rule group: a boolean filter over a single product type plus the
/// projection attributes the caller wants back.
///
/// `type` stays a plain string here so the product-type whitelist check is
/// a validation message rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    #[serde(rename = "type", default)]
    pub product_type: String,
    #[serde(default)]
    pub attributes: Option<Vec<String>>,
    #[serde(default)]
    pub rules: Vec<RuleToken>,
}
