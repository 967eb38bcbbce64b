//! The compiled constraint tree: one [`Node`] variant per schema shape the
//! compiler can emit. A native tagged enum rather than the
//! one-trait-object-per-keyword shape used elsewhere in this crate's
//! lineage, so the evaluator's `match` is exhaustiveness-checked at compile
//! time against every constraint kind this crate knows about.
use crate::arena::NodeId;
use regex::Regex;
use serde_json::Value;

use crate::primitive_type::TypeSet;

#[derive(Debug)]
pub(crate) enum Node {
    /// `true`/`false` schema.
    Boolean(bool),
    /// Bare `"type"` keyword, either a single name or an array of names.
    Type(TypeSet),
    Object(ObjectConstraint),
    Array(ArrayConstraint),
    String(StringConstraint),
    Number(NumberConstraint),
    /// Non-empty list of allowed literals.
    Enum(Vec<Value>),
    Const(Value),
    /// Already resolved at compile time — see `compiler::resolve`.
    Ref(NodeId),
    AllOf(Vec<NodeId>),
    AnyOf(Vec<NodeId>),
    OneOf(Vec<NodeId>),
    Not(NodeId),
    IfThenElse {
        if_: NodeId,
        then_: Option<NodeId>,
        else_: Option<NodeId>,
    },
}

#[derive(Debug, Default)]
pub(crate) struct ObjectConstraint {
    /// Declaration-ordered, case-sensitive. A linear scan is used for
    /// lookup rather than a `HashMap`, which both preserves the shape of
    /// the spec's "ordered mapping" and keeps iteration order identical to
    /// the schema's own `properties` order for error reporting.
    pub(crate) properties: Vec<(String, NodeId)>,
    pub(crate) required: Vec<String>,
    pub(crate) min_properties: Option<u64>,
    pub(crate) max_properties: Option<u64>,
}

impl ObjectConstraint {
    pub(crate) fn get(&self, key: &str) -> Option<NodeId> {
        self.properties
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, id)| *id)
    }
}

#[derive(Debug, Default)]
pub(crate) struct ArrayConstraint {
    pub(crate) items: Option<NodeId>,
    pub(crate) min_items: Option<u64>,
    pub(crate) max_items: Option<u64>,
    pub(crate) unique_items: bool,
}

#[derive(Debug, Default)]
pub(crate) struct StringConstraint {
    pub(crate) min_length: Option<u64>,
    pub(crate) max_length: Option<u64>,
    pub(crate) pattern: Option<Regex>,
    pub(crate) format: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct NumberConstraint {
    pub(crate) minimum: Option<f64>,
    pub(crate) exclusive_minimum: bool,
    pub(crate) maximum: Option<f64>,
    pub(crate) exclusive_maximum: bool,
    pub(crate) multiple_of: Option<f64>,
    /// Set when `"type"` named `"integer"` — the number must additionally
    /// have a zero fractional part (§9 Open Question: the original does
    /// not enforce this, this crate does).
    pub(crate) integer: bool,
}
