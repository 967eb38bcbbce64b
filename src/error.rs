//! Error types: schema compile errors and instance validation errors.
use crate::paths::JSONPointer;
use crate::primitive_type::TypeSet;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The schema itself was malformed. Emitted at compile time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("schema must be a JSON object or boolean")]
    NotASchema,
    #[error("'enum' must be a non-empty array")]
    EmptyEnum,
    #[error("'{0}' must be a non-empty array of schemas")]
    EmptyCombinator(&'static str),
    #[error("'if' must be present when 'then' or 'else' is used")]
    DanglingBranch,
    #[error("could not resolve reference: {0}")]
    UnresolvableReference(String),
    #[error("invalid regular expression in 'pattern': {0}")]
    InvalidPattern(String),
    #[error("'{0}' must be a number")]
    NotANumber(&'static str),
    #[error("'properties' must be an object")]
    InvalidProperties,
    #[error("'required' must be an array of strings")]
    InvalidRequired,
    #[error("schema is not valid JSON: {0}")]
    MalformedJson(String),
}

impl From<regex::Error> for CompileError {
    #[inline]
    fn from(err: regex::Error) -> Self {
        CompileError::InvalidPattern(err.to_string())
    }
}

/// A single validation failure against one sub-instance.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The sub-instance that failed this constraint.
    pub instance: Value,
    /// JSON Pointer from the instance root to `instance`.
    pub path: JSONPointer,
    pub kind: ValidationErrorKind,
}

/// An iterator over the errors produced by one `validate` call.
pub type ErrorIterator = Box<dyn Iterator<Item = ValidationError> + Send + Sync>;

#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum ValidationErrorKind {
    Type { expected: TypeSet },
    Required { property: String },
    MinProperties { limit: u64 },
    MaxProperties { limit: u64 },
    MinItems { limit: u64 },
    MaxItems { limit: u64 },
    UniqueItems,
    MinLength { limit: u64 },
    MaxLength { limit: u64 },
    Pattern { pattern: String },
    Format { format: String },
    Minimum { limit: f64 },
    Maximum { limit: f64 },
    ExclusiveMinimum { limit: f64 },
    ExclusiveMaximum { limit: f64 },
    MultipleOf { multiple_of: f64 },
    Enum { options: Value },
    Constant { expected: Value },
    FalseSchema,
    Not,
    AnyOf,
    OneOfNotValid,
    OneOfMultipleValid,
}

impl ValidationError {
    pub(crate) fn new(instance: &Value, path: &JSONPointer, kind: ValidationErrorKind) -> Self {
        ValidationError {
            instance: instance.clone(),
            path: path.clone(),
            kind,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::Type { expected } if expected.iter().count() == 1 => write!(
                f,
                "'{}' is not of type '{}'",
                self.instance,
                expected.iter().next().expect("non-empty")
            ),
            ValidationErrorKind::Type { expected } => {
                write!(f, "'{}' is not of types {}", self.instance, expected)
            }
            ValidationErrorKind::Required { property } => {
                write!(f, "Missing required property '{}'", property)
            }
            ValidationErrorKind::MinProperties { limit } => write!(
                f,
                "{} has less than {} propert{}",
                self.instance,
                limit,
                if *limit == 1 { "y" } else { "ies" }
            ),
            ValidationErrorKind::MaxProperties { limit } => write!(
                f,
                "{} has more than {} propert{}",
                self.instance,
                limit,
                if *limit == 1 { "y" } else { "ies" }
            ),
            ValidationErrorKind::MinItems { limit } => write!(
                f,
                "{} has less than {} item{}",
                self.instance,
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
            ValidationErrorKind::MaxItems { limit } => write!(
                f,
                "{} has more than {} item{}",
                self.instance,
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
            ValidationErrorKind::UniqueItems => {
                write!(f, "'{}' has non-unique elements", self.instance)
            }
            ValidationErrorKind::MinLength { limit } => write!(
                f,
                "'{}' is shorter than {} character{}",
                self.instance,
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
            ValidationErrorKind::MaxLength { limit } => write!(
                f,
                "'{}' is longer than {} character{}",
                self.instance,
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
            ValidationErrorKind::Pattern { pattern } => {
                write!(f, "'{}' does not match '{}'", self.instance, pattern)
            }
            ValidationErrorKind::Format { format } => {
                write!(f, "'{}' is not a valid '{}'", self.instance, format)
            }
            ValidationErrorKind::Minimum { limit } => {
                write!(f, "{} is less than the minimum of {}", self.instance, limit)
            }
            ValidationErrorKind::Maximum { limit } => write!(
                f,
                "{} is greater than the maximum of {}",
                self.instance, limit
            ),
            ValidationErrorKind::ExclusiveMinimum { limit } => write!(
                f,
                "{} is less than or equal to the minimum of {}",
                self.instance, limit
            ),
            ValidationErrorKind::ExclusiveMaximum { limit } => write!(
                f,
                "{} is greater than or equal to the maximum of {}",
                self.instance, limit
            ),
            ValidationErrorKind::MultipleOf { multiple_of } => {
                write!(f, "{} is not a multiple of {}", self.instance, multiple_of)
            }
            ValidationErrorKind::Enum { options } => {
                write!(f, "'{}' is not one of '{}'", self.instance, options)
            }
            ValidationErrorKind::Constant { expected } => {
                write!(f, "'{}' was expected", expected)
            }
            ValidationErrorKind::FalseSchema => {
                write!(f, "False schema does not allow '{}'", self.instance)
            }
            ValidationErrorKind::Not => write!(f, "'{}' is not allowed here", self.instance),
            ValidationErrorKind::AnyOf => write!(
                f,
                "'{}' is not valid under any of the given schemas",
                self.instance
            ),
            ValidationErrorKind::OneOfNotValid => write!(
                f,
                "'{}' is not valid under any of the given schemas",
                self.instance
            ),
            ValidationErrorKind::OneOfMultipleValid => write!(
                f,
                "'{}' is valid under more than one of the given schemas",
                self.instance
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive_type::PrimitiveType;
    use serde_json::json;

    #[test]
    fn single_type_error_message() {
        let instance = json!(42);
        let err = ValidationError::new(
            &instance,
            &JSONPointer::default(),
            ValidationErrorKind::Type {
                expected: TypeSet::new().add_type(PrimitiveType::String),
            },
        );
        assert_eq!(err.to_string(), "'42' is not of type 'string'");
    }

    #[test]
    fn required_error_message() {
        let instance = json!({});
        let err = ValidationError::new(
            &instance,
            &JSONPointer::default(),
            ValidationErrorKind::Required {
                property: "x".to_string(),
            },
        );
        assert_eq!(err.to_string(), "Missing required property 'x'");
    }
}
