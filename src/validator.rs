//! The compiled, immutable validator: owns the arena, the reference cache,
//! a deep copy of the root schema, and the root compiled node (§3.2, §5).
//! Because `$ref` resolution happens eagerly at compile time (see
//! `compiler::resolve`), a `Validator` needs no interior mutability and is
//! `Send + Sync` — concurrent validation of distinct instances on one
//! validator needs no coordination.
use crate::arena::{Arena, NodeId};
use crate::checks::{DefaultFormatChecker, FormatChecker};
use crate::compiler::compile_schema;
use crate::error::{CompileError, ErrorIterator};
use crate::evaluator::{evaluate, Context};
use crate::reference::ReferenceCache;
use serde_json::Value;

/// Number of errors a single `validate` call accumulates before it stops
/// descending into further sibling constraints (§3.4).
const DEFAULT_MAX_ERRORS: usize = 10;

pub struct Validator {
    arena: Arena,
    root: NodeId,
    /// Kept for parity with §3.2's invariant that the validator owns a deep
    /// copy of the schema it was compiled from, even though this crate's
    /// eager `$ref` resolution never needs to re-read it after compilation.
    #[allow(dead_code)]
    schema: Value,
    format_checker: Box<dyn FormatChecker>,
    max_errors: usize,
}

impl Validator {
    /// Compile an already-parsed schema value.
    pub fn compile(schema: &Value) -> Result<Self, CompileError> {
        let mut arena = Arena::new();
        let mut cache = ReferenceCache::new();
        let root = compile_schema(schema, schema, &mut arena, &mut cache)?;
        Ok(Validator {
            arena,
            root,
            schema: schema.clone(),
            format_checker: Box::new(DefaultFormatChecker),
            max_errors: DEFAULT_MAX_ERRORS,
        })
    }

    /// Swap in a different format checker, e.g. one rejecting unknown
    /// format names instead of passing them vacuously.
    pub fn set_format_checker(&mut self, checker: impl FormatChecker + 'static) {
        self.format_checker = Box::new(checker);
    }

    /// Validate `instance`, returning every constraint failure observed
    /// (up to the error cap) in declaration order.
    pub fn validate(&self, instance: &Value) -> Result<(), ErrorIterator> {
        let mut ctx = Context::new(self.format_checker.as_ref(), self.max_errors);
        if evaluate(&self.arena, self.root, instance, &mut ctx) {
            Ok(())
        } else {
            Err(Box::new(ctx.into_errors().into_iter()))
        }
    }

    /// Cheap boolean check: does not construct any `ValidationError`.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        let mut ctx = Context::new(self.format_checker.as_ref(), 0);
        evaluate(&self.arena, self.root, instance, &mut ctx)
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator").field("schema", &self.schema).finish()
    }
}

/// Compile `schema` and check `instance` against it in one call. Panics if
/// `schema` does not compile — see [`Validator::compile`] for the
/// fallible form.
#[must_use]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    Validator::compile(schema)
        .expect("invalid schema")
        .is_valid(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compiles_and_validates_a_simple_schema() {
        let validator = Validator::compile(&json!({"minLength": 5})).unwrap();
        assert!(validator.is_valid(&json!("foobar")));
        assert!(!validator.is_valid(&json!("foo")));
    }

    #[test]
    fn validate_reports_errors_when_is_valid_reports_failure() {
        let validator = Validator::compile(&json!({"type": "string"})).unwrap();
        assert!(validator.validate(&json!(42)).is_err());
        assert!(validator.validate(&json!("ok")).is_ok());
    }

    #[test]
    fn invalid_schema_is_a_compile_error() {
        assert!(Validator::compile(&json!({"enum": []})).is_err());
    }

    #[test]
    fn top_level_is_valid_matches_the_method() {
        assert!(is_valid(&json!({"maxLength": 5}), &json!("foo")));
        assert!(!is_valid(&json!({"maxLength": 2}), &json!("foo")));
    }
}
