//! Walks a compiled [`Node`] tree against an instance, producing
//! path-annotated errors. Combinators (`anyOf`/`oneOf`/`not`/`if`) probe
//! their children through a *suppressed* [`Context`] — one whose error cap
//! is zero, so `Context::push_error` never allocates — before deciding
//! which branch's errors, if any, should actually surface. This is the
//! evaluator-level reading of the dual cheap-probe/full-accumulate split
//! this crate's lineage implements per keyword validator.
use crate::arena::{Arena, NodeId};
use crate::checks::FormatChecker;
use crate::equal::{equal, has_duplicates};
use crate::error::{ValidationError, ValidationErrorKind};
use crate::node::{ArrayConstraint, Node, NumberConstraint, ObjectConstraint, StringConstraint};
use crate::paths::{InstancePath, JSONPointer};
use crate::primitive_type::{PrimitiveType, TypeSet};
use serde_json::{Number, Value};

pub(crate) struct Context<'a> {
    path: InstancePath,
    errors: Vec<ValidationError>,
    max_errors: usize,
    format_checker: &'a dyn FormatChecker,
}

impl<'a> Context<'a> {
    pub(crate) fn new(format_checker: &'a dyn FormatChecker, max_errors: usize) -> Self {
        Context {
            path: InstancePath::new(),
            errors: Vec::new(),
            max_errors,
            format_checker,
        }
    }

    fn suppressed(&self) -> Context<'a> {
        Context {
            path: self.path.clone(),
            errors: Vec::new(),
            max_errors: 0,
            format_checker: self.format_checker,
        }
    }

    /// Record a failure at the current path, unless the cap has already
    /// been reached (or is zero, for a suppressed probe). Always returns
    /// `false`, so call sites can write `return ctx.push_error(...)`.
    fn push_error(&mut self, instance: &Value, kind: ValidationErrorKind) -> bool {
        if self.errors.len() < self.max_errors {
            let path: JSONPointer = (&self.path).into();
            self.errors.push(ValidationError::new(instance, &path, kind));
        }
        false
    }

    pub(crate) fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// Cheap boolean-only probe of `node`'s children, with `ctx`'s path but no
/// error accumulation — the suppressed sink for `anyOf`/`oneOf`/`not`/`if`.
fn probe(arena: &Arena, node: NodeId, instance: &Value, ctx: &Context) -> bool {
    let mut sub = ctx.suppressed();
    evaluate(arena, node, instance, &mut sub)
}

/// Evaluate `node` against `instance`, appending to `ctx`'s error list (up
/// to its cap). Returns `true` iff no failure was observed at this node or
/// below.
pub(crate) fn evaluate(arena: &Arena, node: NodeId, instance: &Value, ctx: &mut Context) -> bool {
    match arena.get(node) {
        Node::Boolean(true) => true,
        Node::Boolean(false) => ctx.push_error(instance, ValidationErrorKind::FalseSchema),
        Node::Type(set) => {
            if type_matches(*set, instance) {
                true
            } else {
                ctx.push_error(instance, ValidationErrorKind::Type { expected: *set })
            }
        }
        Node::Object(oc) => eval_object(arena, oc, instance, ctx),
        Node::Array(ac) => eval_array(arena, ac, instance, ctx),
        Node::String(sc) => eval_string(sc, instance, ctx),
        Node::Number(nc) => eval_number(nc, instance, ctx),
        Node::Enum(options) => {
            if options.iter().any(|option| equal(instance, option)) {
                true
            } else {
                ctx.push_error(
                    instance,
                    ValidationErrorKind::Enum {
                        options: Value::Array(options.clone()),
                    },
                )
            }
        }
        Node::Const(expected) => {
            if equal(instance, expected) {
                true
            } else {
                ctx.push_error(
                    instance,
                    ValidationErrorKind::Constant {
                        expected: expected.clone(),
                    },
                )
            }
        }
        Node::Ref(target) => evaluate(arena, *target, instance, ctx),
        Node::AllOf(children) => {
            for &child in children {
                if !evaluate(arena, child, instance, ctx) {
                    return false;
                }
            }
            true
        }
        Node::AnyOf(children) => {
            if children.iter().any(|&child| probe(arena, child, instance, ctx)) {
                true
            } else {
                ctx.push_error(instance, ValidationErrorKind::AnyOf)
            }
        }
        Node::OneOf(children) => {
            let passing = children
                .iter()
                .filter(|&&child| probe(arena, child, instance, ctx))
                .count();
            match passing {
                1 => true,
                0 => ctx.push_error(instance, ValidationErrorKind::OneOfNotValid),
                _ => ctx.push_error(instance, ValidationErrorKind::OneOfMultipleValid),
            }
        }
        Node::Not(child) => {
            if probe(arena, *child, instance, ctx) {
                ctx.push_error(instance, ValidationErrorKind::Not)
            } else {
                true
            }
        }
        Node::IfThenElse { if_, then_, else_ } => {
            let branch = if probe(arena, *if_, instance, ctx) {
                *then_
            } else {
                *else_
            };
            match branch {
                Some(child) => evaluate(arena, child, instance, ctx),
                None => true,
            }
        }
    }
}

fn eval_object(arena: &Arena, oc: &ObjectConstraint, instance: &Value, ctx: &mut Context) -> bool {
    let map = match instance {
        Value::Object(map) => map,
        _ => {
            return ctx.push_error(
                instance,
                ValidationErrorKind::Type {
                    expected: TypeSet::new().add_type(PrimitiveType::Object),
                },
            )
        }
    };
    let mut valid = true;
    if let Some(min) = oc.min_properties {
        if (map.len() as u64) < min {
            valid &= ctx.push_error(instance, ValidationErrorKind::MinProperties { limit: min });
        }
    }
    if let Some(max) = oc.max_properties {
        if (map.len() as u64) > max {
            valid &= ctx.push_error(instance, ValidationErrorKind::MaxProperties { limit: max });
        }
    }
    for name in &oc.required {
        if !map.contains_key(name) {
            valid &= ctx.push_error(
                instance,
                ValidationErrorKind::Required {
                    property: name.clone(),
                },
            );
        }
    }
    // Properties with no matching sub-node pass: effective additionalProperties: true.
    for (key, value) in map {
        if let Some(child) = oc.get(key) {
            ctx.path.push(key.clone());
            let ok = evaluate(arena, child, value, ctx);
            ctx.path.pop();
            valid = valid && ok;
        }
    }
    valid
}

fn eval_array(arena: &Arena, ac: &ArrayConstraint, instance: &Value, ctx: &mut Context) -> bool {
    let items = match instance {
        Value::Array(items) => items,
        _ => {
            return ctx.push_error(
                instance,
                ValidationErrorKind::Type {
                    expected: TypeSet::new().add_type(PrimitiveType::Array),
                },
            )
        }
    };
    let mut valid = true;
    if let Some(min) = ac.min_items {
        if (items.len() as u64) < min {
            valid &= ctx.push_error(instance, ValidationErrorKind::MinItems { limit: min });
        }
    }
    if let Some(max) = ac.max_items {
        if (items.len() as u64) > max {
            valid &= ctx.push_error(instance, ValidationErrorKind::MaxItems { limit: max });
        }
    }
    if ac.unique_items && has_duplicates(items) {
        valid &= ctx.push_error(instance, ValidationErrorKind::UniqueItems);
    }
    if let Some(item_node) = ac.items {
        for (index, item) in items.iter().enumerate() {
            ctx.path.push(index);
            let ok = evaluate(arena, item_node, item, ctx);
            ctx.path.pop();
            valid = valid && ok;
        }
    }
    valid
}

fn eval_string(sc: &StringConstraint, instance: &Value, ctx: &mut Context) -> bool {
    let s = match instance {
        Value::String(s) => s,
        _ => {
            return ctx.push_error(
                instance,
                ValidationErrorKind::Type {
                    expected: TypeSet::new().add_type(PrimitiveType::String),
                },
            )
        }
    };
    let mut valid = true;
    let length = s.chars().count() as u64;
    if let Some(min) = sc.min_length {
        if length < min {
            valid &= ctx.push_error(instance, ValidationErrorKind::MinLength { limit: min });
        }
    }
    if let Some(max) = sc.max_length {
        if length > max {
            valid &= ctx.push_error(instance, ValidationErrorKind::MaxLength { limit: max });
        }
    }
    if let Some(pattern) = &sc.pattern {
        if !pattern.is_match(s) {
            valid &= ctx.push_error(
                instance,
                ValidationErrorKind::Pattern {
                    pattern: pattern.as_str().to_string(),
                },
            );
        }
    }
    if let Some(format) = &sc.format {
        if !ctx.format_checker.check(format, s) {
            valid &= ctx.push_error(
                instance,
                ValidationErrorKind::Format {
                    format: format.clone(),
                },
            );
        }
    }
    valid
}

fn eval_number(nc: &NumberConstraint, instance: &Value, ctx: &mut Context) -> bool {
    let number = match instance {
        Value::Number(n) => n,
        _ => {
            let expected = if nc.integer {
                TypeSet::new().add_type(PrimitiveType::Integer)
            } else {
                TypeSet::new().add_type(PrimitiveType::Number)
            };
            return ctx.push_error(instance, ValidationErrorKind::Type { expected });
        }
    };
    let value = number.as_f64().expect("JSON numbers are always representable as f64");
    if nc.integer && !is_integer(number) {
        return ctx.push_error(
            instance,
            ValidationErrorKind::Type {
                expected: TypeSet::new().add_type(PrimitiveType::Integer),
            },
        );
    }
    let mut valid = true;
    if let Some(min) = nc.minimum {
        let fails = if nc.exclusive_minimum { value <= min } else { value < min };
        if fails {
            let kind = if nc.exclusive_minimum {
                ValidationErrorKind::ExclusiveMinimum { limit: min }
            } else {
                ValidationErrorKind::Minimum { limit: min }
            };
            valid &= ctx.push_error(instance, kind);
        }
    }
    if let Some(max) = nc.maximum {
        let fails = if nc.exclusive_maximum { value >= max } else { value > max };
        if fails {
            let kind = if nc.exclusive_maximum {
                ValidationErrorKind::ExclusiveMaximum { limit: max }
            } else {
                ValidationErrorKind::Maximum { limit: max }
            };
            valid &= ctx.push_error(instance, kind);
        }
    }
    if let Some(multiple_of) = nc.multiple_of {
        if multiple_of != 0.0 {
            let ratio = value / multiple_of;
            if (ratio - ratio.round()).abs() > 1e-10 {
                valid &= ctx.push_error(instance, ValidationErrorKind::MultipleOf { multiple_of });
            }
        }
    }
    valid
}

fn type_matches(set: TypeSet, instance: &Value) -> bool {
    match instance {
        Value::Null => set.contains_type(PrimitiveType::Null),
        Value::Bool(_) => set.contains_type(PrimitiveType::Boolean),
        Value::String(_) => set.contains_type(PrimitiveType::String),
        Value::Array(_) => set.contains_type(PrimitiveType::Array),
        Value::Object(_) => set.contains_type(PrimitiveType::Object),
        Value::Number(n) => {
            set.contains_type(PrimitiveType::Number)
                || (set.contains_type(PrimitiveType::Integer) && is_integer(n))
        }
    }
}

fn is_integer(n: &Number) -> bool {
    n.is_u64() || n.is_i64() || n.as_f64().map_or(false, |f| f.fract() == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::checks::DefaultFormatChecker;
    use crate::compiler::compile_schema;
    use crate::reference::ReferenceCache;
    use serde_json::json;

    fn run(schema: &Value, instance: &Value) -> (bool, Vec<ValidationError>) {
        let mut arena = Arena::new();
        let mut cache = ReferenceCache::new();
        let root = compile_schema(schema, schema, &mut arena, &mut cache).unwrap();
        let checker = DefaultFormatChecker;
        let mut ctx = Context::new(&checker, 10);
        let ok = evaluate(&arena, root, instance, &mut ctx);
        (ok, ctx.into_errors())
    }

    #[test]
    fn missing_required_property_reports_its_name() {
        let schema = json!({"type": "object", "required": ["x"]});
        let (ok, errors) = run(&schema, &json!({}));
        assert!(!ok);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Missing required property 'x'");
        assert_eq!(errors[0].path.to_string(), "");
    }

    #[test]
    fn exclusive_minimum_boolean_style_rejects_boundary() {
        let schema = json!({"minimum": 0, "exclusiveMinimum": true});
        let (ok, _) = run(&schema, &json!(0));
        assert!(!ok);
    }

    #[test]
    fn inclusive_minimum_accepts_boundary() {
        let schema = json!({"minimum": 0});
        let (ok, _) = run(&schema, &json!(0));
        assert!(ok);
    }

    #[test]
    fn unique_items_rejects_duplicates() {
        let schema = json!({"uniqueItems": true});
        let (ok, _) = run(&schema, &json!([1, 1]));
        assert!(!ok);
    }

    #[test]
    fn nested_property_error_has_the_right_path() {
        let schema = json!({
            "type": "object",
            "properties": {"name": {"type": "string"}},
        });
        let (ok, errors) = run(&schema, &json!({"name": 1}));
        assert!(!ok);
        assert_eq!(errors[0].path.to_string(), "/name");
    }

    #[test]
    fn any_of_suppresses_child_errors_on_overall_failure() {
        let schema = json!({"anyOf": [{"type": "string"}, {"type": "number"}]});
        let (ok, errors) = run(&schema, &json!(true));
        assert!(!ok);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "'true' is not valid under any of the given schemas"
        );
    }

    #[test]
    fn if_then_else_picks_the_right_branch() {
        let schema = json!({
            "if": {"type": "string", "minLength": 6},
            "then": {"minLength": 10},
            "else": {"maxLength": 3}
        });
        assert!(!run(&schema, &json!("hello12")).0);
        assert!(run(&schema, &json!("hello world test")).0);
        assert!(run(&schema, &json!("hi")).0);
        assert!(!run(&schema, &json!("hello")).0);
        assert!(!run(&schema, &json!(42)).0);
    }

    #[test]
    fn ref_through_defs_resolves() {
        let schema = json!({
            "$defs": {"stringType": {"type": "string"}},
            "type": "object",
            "properties": {"name": {"$ref": "#/$defs/stringType"}},
            "required": ["name"]
        });
        assert!(run(&schema, &json!({"name": "John"})).0);
        assert!(!run(&schema, &json!({"name": 123})).0);
    }

    #[test]
    fn integer_type_rejects_fractional_numbers() {
        let schema = json!({"type": "integer"});
        assert!(run(&schema, &json!(4)).0);
        assert!(!run(&schema, &json!(4.5)).0);
    }

    #[test]
    fn max_errors_caps_the_error_list() {
        let schema = json!({
            "type": "object",
            "required": ["a", "b", "c"],
            "minProperties": 10
        });
        let mut arena = Arena::new();
        let mut cache = ReferenceCache::new();
        let root = compile_schema(&schema, &schema, &mut arena, &mut cache).unwrap();
        let checker = DefaultFormatChecker;
        let mut ctx = Context::new(&checker, 2);
        let ok = evaluate(&arena, root, &json!({}), &mut ctx);
        assert!(!ok);
        assert_eq!(ctx.into_errors().len(), 2);
    }
}
