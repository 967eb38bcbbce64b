//! The public entry points a caller reaches for: create a validator from
//! text or from an already-parsed value, validate an instance, read back a
//! status code. Grounded directly on
//! `libks/ks_json_schema_pure.h`'s `ks_json_schema_pure_*` function table —
//! same operations, same stable status ordinals — translated from
//! pointer-in/out-param C to owned values and `Result`. `destroy` and
//! `free_errors` are kept only for API parity with that table: ordinary
//! `Drop` already reclaims a `Validator` or an error list, so both are
//! one-line functions that just take ownership and let it go.
use crate::checks::FormatChecker;
use crate::error::{CompileError, ValidationError};
use crate::validator::Validator;
use serde_json::Value;
use std::fmt;

/// Stable ordinals, matching `ks_json_schema_pure_status_t` exactly so a
/// caller mapping this crate's status onto the original's enum needs no
/// translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Success = 0,
    InvalidSchema = 1,
    InvalidJson = 2,
    ValidationFailed = 3,
    MemoryError = 4,
    /// Unreachable from safe Rust — there is no null reference for a
    /// required parameter to be — kept only so the ordinal table matches
    /// the original header's.
    InvalidParam = 5,
}

impl Status {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::InvalidSchema => "invalid schema",
            Status::InvalidJson => "invalid JSON",
            Status::ValidationFailed => "validation failed",
            Status::MemoryError => "memory error",
            Status::InvalidParam => "invalid parameter",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `ks_json_schema_pure_status_string`.
#[must_use]
pub fn status_string(status: Status) -> &'static str {
    status.as_str()
}

/// `ks_json_schema_pure_create`: parse `schema_text` and compile it.
pub fn create(schema_text: &str) -> (Status, Result<Validator, Vec<CompileError>>) {
    match serde_json::from_str::<Value>(schema_text) {
        Ok(schema) => create_from_value(&schema),
        Err(err) => (
            Status::InvalidSchema,
            Err(vec![CompileError::MalformedJson(err.to_string())]),
        ),
    }
}

/// `ks_json_schema_pure_create_from_json`: compile an already-parsed schema.
pub fn create_from_value(schema: &Value) -> (Status, Result<Validator, Vec<CompileError>>) {
    match Validator::compile(schema) {
        Ok(validator) => (Status::Success, Ok(validator)),
        Err(err) => (Status::InvalidSchema, Err(vec![err])),
    }
}

/// `ks_json_schema_pure_validate_string`: parse `instance_text`, then
/// validate it.
pub fn validate_text(validator: &Validator, instance_text: &str) -> (Status, Vec<ValidationError>) {
    match serde_json::from_str::<Value>(instance_text) {
        Ok(instance) => validate_value(validator, &instance),
        Err(_) => (Status::InvalidJson, Vec::new()),
    }
}

/// `ks_json_schema_pure_validate_json`: validate an already-parsed instance.
pub fn validate_value(validator: &Validator, instance: &Value) -> (Status, Vec<ValidationError>) {
    match validator.validate(instance) {
        Ok(()) => (Status::Success, Vec::new()),
        Err(errors) => (Status::ValidationFailed, errors.collect()),
    }
}

/// `ks_json_schema_pure_set_format_checker`.
pub fn set_format_checker(validator: &mut Validator, checker: impl FormatChecker + 'static) {
    validator.set_format_checker(checker);
}

/// `ks_json_schema_pure_destroy`. A plain `drop(validator)` does the same
/// thing; this exists so callers migrating from the pointer-based API have
/// a direct equivalent to reach for.
pub fn destroy(validator: Validator) {
    drop(validator);
}

/// `ks_json_schema_pure_error_free`.
pub fn free_errors(errors: Vec<ValidationError>) {
    drop(errors);
}
