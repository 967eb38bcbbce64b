//! # ks_json_schema
//!
//! A compiled JSON Schema validator: a schema document is compiled once
//! into a constraint tree (resolving every `$ref` eagerly, so the result
//! is immutable and `Send + Sync`), then evaluated against any number of
//! instances.
//!
//! ```rust
//! use ks_json_schema::Validator;
//! use serde_json::json;
//!
//! let validator = Validator::compile(&json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string"}},
//!     "required": ["name"]
//! })).unwrap();
//!
//! assert!(validator.is_valid(&json!({"name": "John"})));
//! assert!(!validator.is_valid(&json!({"age": 30})));
//! ```
//!
//! Supports the JSON Schema keyword set named in this crate's compiled
//! [`node`] shapes: `type`, `properties`/`required`/`min`/`maxProperties`,
//! `items`/`min`/`maxItems`/`uniqueItems`, `min`/`maxLength`/`pattern`/
//! `format`, `minimum`/`maximum` (both Draft 4 and Draft 6+ exclusive
//! styles)/`multipleOf`, `enum`, `const`, `$ref`, `allOf`/`anyOf`/`oneOf`,
//! `not`, and `if`/`then`/`else`. Remote (`http://`) references,
//! `$dynamicRef`, custom vocabularies, and output annotations beyond a flat
//! error list are out of scope.
#![warn(
    clippy::doc_markdown,
    clippy::explicit_iter_loop,
    clippy::needless_borrow,
    clippy::redundant_closure,
    clippy::trivially_copy_pass_by_ref,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unreachable_pub
)]
#![allow(clippy::upper_case_acronyms)]

mod arena;
mod checks;
mod compiler;
mod equal;
pub mod error;
mod evaluator;
pub mod facade;
mod node;
mod paths;
pub mod primitive_type;
mod reference;
mod validator;

pub use checks::{DefaultFormatChecker, FormatChecker};
pub use error::{CompileError, ErrorIterator, ValidationError, ValidationErrorKind};
pub use facade::Status;
pub use paths::JSONPointer;
pub use validator::{is_valid, Validator};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_is_valid_shortcut_works() {
        let schema = json!({"minLength": 5});
        assert!(is_valid(&schema, &json!("foobar")));
        assert!(!is_valid(&schema, &json!("foo")));
    }
}
