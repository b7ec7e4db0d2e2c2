use bson::{Bson, Document};
use pcm_catalog::is_identifier_attribute;

use crate::token::{Criteria, MarkerValue, Relationship, RuleGroup, RulePayload};

/// Result of compiling one rule group: the storage predicate plus the
/// normalized projection attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub product_type: String,
    pub attributes: Vec<String>,
    pub filter: Document,
}

/// The identifier criterion chosen to represent "the" lookup key for
/// downstream existence and uniqueness checks.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedIdentifier {
    pub attribute: String,
    pub values: Vec<Bson>,
}

struct Frame {
    op: &'static str,
    children: Vec<Bson>,
}

impl Frame {
    fn new() -> Self {
        Self {
            op: "$and",
            children: Vec::new(),
        }
    }

    /// Collapse the frame: a single child stands alone without a redundant
    /// logical wrapper — downstream result shapes depend on this.
    fn into_node(mut self) -> Option<Bson> {
        match self.children.len() {
            0 => None,
            1 => self.children.pop(),
            _ => {
                let mut doc = Document::new();
                doc.insert(self.op, Bson::Array(self.children));
                Some(Bson::Document(doc))
            }
        }
    }
}

/// Compile a rule token sequence into a nested predicate tree.
///
/// BEGIN pushes an implicit AND group, END pops it into its parent, and a
/// logical token sets the join operator of the innermost open group.
/// Nesting depth is unbounded here even though the strict validator only
/// exercises a single span. Tokens with a missing payload are skipped, not
/// errors — partial legacy payloads must not crash the builder.
pub fn build_query(group: &RuleGroup) -> ParsedQuery {
    let mut stack: Vec<Frame> = vec![Frame::new()];

    for token in &group.rules {
        let Some(payload) = &token.rule else { continue };
        match payload {
            RulePayload::Marker(marker) => match marker.value {
                MarkerValue::Begin => stack.push(Frame::new()),
                MarkerValue::End => {
                    if stack.len() > 1 {
                        fold_top(&mut stack);
                    }
                }
                MarkerValue::And => set_op(&mut stack, "$and"),
                MarkerValue::Or => set_op(&mut stack, "$or"),
            },
            RulePayload::Criteria(criteria) => {
                if let Some(leaf) = criteria_leaf(criteria) {
                    push_child(&mut stack, leaf);
                }
            }
        }
    }

    // Unclosed spans fold into their parents.
    while stack.len() > 1 {
        fold_top(&mut stack);
    }

    let filter = match stack.pop().map(Frame::into_node) {
        Some(Some(Bson::Document(doc))) => doc,
        _ => Document::new(),
    };

    ParsedQuery {
        product_type: group.product_type.clone(),
        attributes: expand_attributes(group.attributes.as_deref().unwrap_or_default()),
        filter,
    }
}

fn fold_top(stack: &mut Vec<Frame>) {
    if let Some(frame) = stack.pop() {
        if let Some(node) = frame.into_node() {
            push_child(stack, node);
        }
    }
}

fn push_child(stack: &mut [Frame], node: Bson) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    }
}

fn set_op(stack: &mut [Frame], op: &'static str) {
    if let Some(top) = stack.last_mut() {
        top.op = op;
    }
}

/// A criteria token becomes `{ attribute: { $op: value } }`. Returns None
/// when the payload lacks the value shape its relationship needs.
fn criteria_leaf(criteria: &Criteria) -> Option<Bson> {
    let value = if criteria.relationship.is_plural() {
        Bson::Array(criteria.values.clone()?)
    } else {
        criteria.value.clone()?
    };

    let mut op_doc = Document::new();
    op_doc.insert(criteria.relationship.query_operator(), value);

    let mut leaf = Document::new();
    leaf.insert(criteria.attribute.clone(), op_doc);
    Some(Bson::Document(leaf))
}

/// Normalize a projection attribute list: a specific sub-field is redundant
/// when its bare container is also requested (`identifiers` already implies
/// `identifiers.isbn`), and duplicates are dropped. First-seen order is kept.
pub fn expand_attributes(attributes: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for attribute in attributes {
        if out.contains(attribute) {
            continue;
        }
        if let Some((container, _)) = attribute.split_once('.') {
            if attributes.iter().any(|a| a == container) {
                continue;
            }
        }
        out.push(attribute.clone());
    }
    out
}

/// Pick the qualified identifier among a group's identifier criteria.
///
/// Tie-break: IN wins over EQ, and among IN criteria the longest `values`
/// list wins. This is a deliberate, preserved tie-break (the broadest
/// criterion feeds downstream uniqueness checks), not an accident.
pub fn qualified_identifier(group: &RuleGroup) -> Option<QualifiedIdentifier> {
    let mut best: Option<(&Criteria, bool, usize)> = None;

    for token in &group.rules {
        let Some(criteria) = token.as_criteria() else {
            continue;
        };
        if !is_identifier_attribute(&criteria.attribute) {
            continue;
        }
        let is_in = criteria.relationship == Relationship::In;
        let count = criteria.value_count();

        let replace = match &best {
            None => true,
            Some((_, best_is_in, best_count)) => {
                (is_in && !best_is_in) || (is_in == *best_is_in && count > *best_count)
            }
        };
        if replace {
            best = Some((criteria, is_in, count));
        }
    }

    best.map(|(criteria, _, _)| QualifiedIdentifier {
        attribute: criteria.attribute.clone(),
        values: match (&criteria.values, &criteria.value) {
            (Some(values), _) => values.clone(),
            (None, Some(value)) => vec![value.clone()],
            (None, None) => Vec::new(),
        },
    })
}
