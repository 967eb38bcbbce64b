//! Schema compilation: walks schema JSON and emits a [`Node`] tree in an
//! [`Arena`]. See `DESIGN.md` for the dispatch-order rationale — it mirrors
//! the legacy library's priority list rather than merging sibling keywords
//! into a conjunction.
pub(crate) mod resolve;

use crate::arena::{Arena, NodeId};
use crate::error::CompileError;
use crate::node::{ArrayConstraint, Node, NumberConstraint, ObjectConstraint, StringConstraint};
use crate::primitive_type::{PrimitiveType, TypeSet};
use crate::reference::ReferenceCache;
use regex::Regex;
use serde_json::{Map, Value};
use std::convert::TryFrom;

use resolve::resolve_ref;

/// Compile a (sub-)schema and allocate it into the arena.
pub(crate) fn compile_schema(
    schema: &Value,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<NodeId, CompileError> {
    let node = compile_node(schema, root, arena, cache)?;
    Ok(arena.push(node))
}

/// Compile a schema into a [`Node`] without allocating it — used by the
/// `$ref` resolver, which needs to fill an already-reserved slot.
pub(crate) fn compile_node(
    schema: &Value,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<Node, CompileError> {
    match schema {
        Value::Bool(value) => Ok(Node::Boolean(*value)),
        Value::Object(object) => compile_object(object, root, arena, cache),
        _ => Err(CompileError::NotASchema),
    }
}

fn compile_object(
    object: &Map<String, Value>,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<Node, CompileError> {
    // 1. `$ref` — all sibling keywords are ignored.
    if let Some(reference) = object.get("$ref") {
        let uri = reference.as_str().ok_or(CompileError::NotASchema)?;
        let target = resolve_ref(uri, root, arena, cache)?;
        return Ok(Node::Ref(target));
    }
    if let Some(all_of) = object.get("allOf") {
        return Ok(Node::AllOf(compile_combinator_children(
            "allOf", all_of, root, arena, cache,
        )?));
    }
    if let Some(any_of) = object.get("anyOf") {
        return Ok(Node::AnyOf(compile_combinator_children(
            "anyOf", any_of, root, arena, cache,
        )?));
    }
    if let Some(one_of) = object.get("oneOf") {
        return Ok(Node::OneOf(compile_combinator_children(
            "oneOf", one_of, root, arena, cache,
        )?));
    }
    if let Some(not_schema) = object.get("not") {
        let child = compile_schema(not_schema, root, arena, cache)?;
        return Ok(Node::Not(child));
    }
    if object.contains_key("if") {
        return compile_if_then_else(object, root, arena, cache);
    }
    if object.contains_key("then") || object.contains_key("else") {
        return Err(CompileError::DanglingBranch);
    }
    if let Some(values) = object.get("enum") {
        return compile_enum(values);
    }
    if let Some(value) = object.get("const") {
        return Ok(Node::Const(value.clone()));
    }
    if let Some(type_value) = object.get("type") {
        return compile_typed(type_value, object, root, arena, cache);
    }
    if has_object_keywords(object) {
        return compile_object_shape(object, root, arena, cache).map(Node::Object);
    }
    if has_array_keywords(object) {
        return compile_array_shape(object, root, arena, cache).map(Node::Array);
    }
    if has_string_keywords(object) {
        return compile_string_shape(object).map(Node::String);
    }
    if has_number_keywords(object) {
        return compile_number_shape(object, false).map(Node::Number);
    }
    Ok(Node::Type(all_primitive_types()))
}

fn compile_combinator_children(
    name: &'static str,
    value: &Value,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<Vec<NodeId>, CompileError> {
    let items = value.as_array().ok_or(CompileError::EmptyCombinator(name))?;
    if items.is_empty() {
        return Err(CompileError::EmptyCombinator(name));
    }
    items
        .iter()
        .map(|item| compile_schema(item, root, arena, cache))
        .collect()
}

fn compile_if_then_else(
    object: &Map<String, Value>,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<Node, CompileError> {
    let if_schema = object.get("if").expect("caller checked 'if' is present");
    let if_ = compile_schema(if_schema, root, arena, cache)?;
    // `then`/`else` are tolerated if they fail to compile (legacy leniency).
    let then_ = object
        .get("then")
        .and_then(|schema| compile_schema(schema, root, arena, cache).ok());
    let else_ = object
        .get("else")
        .and_then(|schema| compile_schema(schema, root, arena, cache).ok());
    Ok(Node::IfThenElse { if_, then_, else_ })
}

fn compile_enum(value: &Value) -> Result<Node, CompileError> {
    let items = value.as_array().ok_or(CompileError::EmptyEnum)?;
    if items.is_empty() {
        return Err(CompileError::EmptyEnum);
    }
    Ok(Node::Enum(items.clone()))
}

fn compile_typed(
    type_value: &Value,
    object: &Map<String, Value>,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<Node, CompileError> {
    match type_value {
        Value::String(name) => compile_single_named_type(name, object, root, arena, cache),
        Value::Array(names) => {
            if let [Value::String(name)] = names.as_slice() {
                return compile_single_named_type(name, object, root, arena, cache);
            }
            let mut set = TypeSet::new();
            for name in names {
                let name = name.as_str().ok_or(CompileError::NotASchema)?;
                let primitive =
                    PrimitiveType::try_from(name).map_err(|()| CompileError::NotASchema)?;
                set = set.add_type(primitive);
            }
            Ok(Node::Type(set))
        }
        _ => Err(CompileError::NotASchema),
    }
}

fn compile_single_named_type(
    name: &str,
    object: &Map<String, Value>,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<Node, CompileError> {
    match PrimitiveType::try_from(name).map_err(|()| CompileError::NotASchema)? {
        PrimitiveType::Object => compile_object_shape(object, root, arena, cache).map(Node::Object),
        PrimitiveType::Array => compile_array_shape(object, root, arena, cache).map(Node::Array),
        PrimitiveType::String => compile_string_shape(object).map(Node::String),
        PrimitiveType::Number => compile_number_shape(object, false).map(Node::Number),
        PrimitiveType::Integer => compile_number_shape(object, true).map(Node::Number),
        PrimitiveType::Boolean => Ok(Node::Type(TypeSet::new().add_type(PrimitiveType::Boolean))),
        PrimitiveType::Null => Ok(Node::Type(TypeSet::new().add_type(PrimitiveType::Null))),
    }
}

fn has_object_keywords(object: &Map<String, Value>) -> bool {
    object.contains_key("properties")
        || object.contains_key("required")
        || object.contains_key("minProperties")
        || object.contains_key("maxProperties")
}

fn has_array_keywords(object: &Map<String, Value>) -> bool {
    object.contains_key("items")
        || object.contains_key("minItems")
        || object.contains_key("maxItems")
        || object.contains_key("uniqueItems")
}

fn has_string_keywords(object: &Map<String, Value>) -> bool {
    object.contains_key("minLength")
        || object.contains_key("maxLength")
        || object.contains_key("pattern")
        || object.contains_key("format")
}

fn has_number_keywords(object: &Map<String, Value>) -> bool {
    object.contains_key("minimum")
        || object.contains_key("maximum")
        || object.contains_key("exclusiveMinimum")
        || object.contains_key("exclusiveMaximum")
        || object.contains_key("multipleOf")
}

fn all_primitive_types() -> TypeSet {
    TypeSet::new()
        .add_type(PrimitiveType::Null)
        .add_type(PrimitiveType::Boolean)
        .add_type(PrimitiveType::Number)
        .add_type(PrimitiveType::String)
        .add_type(PrimitiveType::Array)
        .add_type(PrimitiveType::Object)
}

fn compile_object_shape(
    object: &Map<String, Value>,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<ObjectConstraint, CompileError> {
    let mut properties = Vec::new();
    if let Some(props) = object.get("properties") {
        let map = props.as_object().ok_or(CompileError::InvalidProperties)?;
        for (key, sub_schema) in map {
            let id = compile_schema(sub_schema, root, arena, cache)?;
            properties.push((key.clone(), id));
        }
    }
    let required = match object.get("required") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(CompileError::InvalidRequired)
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(CompileError::InvalidRequired),
        None => Vec::new(),
    };
    Ok(ObjectConstraint {
        properties,
        required,
        min_properties: object.get("minProperties").and_then(Value::as_u64),
        max_properties: object.get("maxProperties").and_then(Value::as_u64),
    })
}

fn compile_array_shape(
    object: &Map<String, Value>,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<ArrayConstraint, CompileError> {
    let items = match object.get("items") {
        Some(schema) => Some(compile_schema(schema, root, arena, cache)?),
        None => None,
    };
    Ok(ArrayConstraint {
        items,
        min_items: object.get("minItems").and_then(Value::as_u64),
        max_items: object.get("maxItems").and_then(Value::as_u64),
        unique_items: object
            .get("uniqueItems")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

fn compile_string_shape(object: &Map<String, Value>) -> Result<StringConstraint, CompileError> {
    let pattern = match object.get("pattern") {
        Some(Value::String(pattern)) => Some(Regex::new(pattern)?),
        Some(_) => return Err(CompileError::NotASchema),
        None => None,
    };
    Ok(StringConstraint {
        min_length: object.get("minLength").and_then(Value::as_u64),
        max_length: object.get("maxLength").and_then(Value::as_u64),
        pattern,
        format: object.get("format").and_then(Value::as_str).map(str::to_string),
    })
}

/// Reads either the Draft 4 boolean-modifier style (`"minimum": 0,
/// "exclusiveMinimum": true`) or the Draft 6+ standalone-number style
/// (`"exclusiveMinimum": 0`) for one bound.
fn numeric_bound(
    object: &Map<String, Value>,
    bound_key: &str,
    exclusive_key: &str,
) -> Result<(Option<f64>, bool), CompileError> {
    let bound = object.get(bound_key).and_then(Value::as_f64);
    match object.get(exclusive_key) {
        None => Ok((bound, false)),
        Some(Value::Bool(flag)) => Ok((bound, *flag)),
        Some(Value::Number(n)) => Ok((n.as_f64(), true)),
        Some(_) => Err(CompileError::NotANumber("exclusiveMinimum/exclusiveMaximum")),
    }
}

fn compile_number_shape(
    object: &Map<String, Value>,
    integer: bool,
) -> Result<NumberConstraint, CompileError> {
    let (minimum, exclusive_minimum) = numeric_bound(object, "minimum", "exclusiveMinimum")?;
    let (maximum, exclusive_maximum) = numeric_bound(object, "maximum", "exclusiveMaximum")?;
    Ok(NumberConstraint {
        minimum,
        exclusive_minimum,
        maximum,
        exclusive_maximum,
        multiple_of: object.get("multipleOf").and_then(Value::as_f64),
        integer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use serde_json::json;

    fn compile(schema: &Value) -> Result<Node, CompileError> {
        let mut arena = Arena::new();
        let mut cache = ReferenceCache::new();
        compile_node(schema, schema, &mut arena, &mut cache)
    }

    #[test]
    fn boolean_schema_compiles_to_boolean_node() {
        assert!(matches!(compile(&json!(true)).unwrap(), Node::Boolean(true)));
        assert!(matches!(compile(&json!(false)).unwrap(), Node::Boolean(false)));
    }

    #[test]
    fn ref_takes_priority_over_siblings() {
        let schema = json!({"$ref": "#/$defs/a", "type": "number", "$defs": {"a": {"type": "string"}}});
        assert!(matches!(compile(&schema).unwrap(), Node::Ref(_)));
    }

    #[test]
    fn empty_enum_is_a_compile_error() {
        let schema = json!({"enum": []});
        assert_eq!(compile(&schema).unwrap_err(), CompileError::EmptyEnum);
    }

    #[test]
    fn empty_all_of_is_a_compile_error() {
        let schema = json!({"allOf": []});
        assert_eq!(
            compile(&schema).unwrap_err(),
            CompileError::EmptyCombinator("allOf")
        );
    }

    #[test]
    fn then_is_dropped_silently_if_it_fails_to_compile() {
        let schema = json!({"if": {"type": "string"}, "then": {"type": "not-a-type"}});
        match compile(&schema).unwrap() {
            Node::IfThenElse { then_, .. } => assert!(then_.is_none()),
            other => panic!("expected IfThenElse, got {:?}", other),
        }
    }

    #[test]
    fn dangling_then_without_if_is_a_compile_error() {
        let schema = json!({"then": {"type": "string"}});
        assert_eq!(compile(&schema).unwrap_err(), CompileError::DanglingBranch);
    }

    #[test]
    fn dangling_else_without_if_is_a_compile_error() {
        let schema = json!({"else": {"type": "string"}});
        assert_eq!(compile(&schema).unwrap_err(), CompileError::DanglingBranch);
    }

    #[test]
    fn draft4_and_draft6_exclusive_minimum_are_both_understood() {
        let draft4 = json!({"type": "number", "minimum": 0, "exclusiveMinimum": true});
        match compile(&draft4).unwrap() {
            Node::Number(n) => {
                assert_eq!(n.minimum, Some(0.0));
                assert!(n.exclusive_minimum);
            }
            other => panic!("expected Number, got {:?}", other),
        }
        let draft6 = json!({"type": "number", "exclusiveMinimum": 0});
        match compile(&draft6).unwrap() {
            Node::Number(n) => {
                assert_eq!(n.minimum, Some(0.0));
                assert!(n.exclusive_minimum);
            }
            other => panic!("expected Number, got {:?}", other),
        }
    }

    #[test]
    fn integer_type_sets_the_integer_flag() {
        match compile(&json!({"type": "integer"})).unwrap() {
            Node::Number(n) => assert!(n.integer),
            other => panic!("expected Number, got {:?}", other),
        }
    }

    #[test]
    fn shape_inference_without_explicit_type() {
        match compile(&json!({"properties": {"a": true}})).unwrap() {
            Node::Object(_) => {}
            other => panic!("expected Object, got {:?}", other),
        }
    }

    #[test]
    fn fallback_admits_every_type() {
        match compile(&json!({})).unwrap() {
            Node::Type(set) => assert_eq!(set.iter().count(), 6),
            other => panic!("expected Type, got {:?}", other),
        }
    }
}
