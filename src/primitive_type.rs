//! The six JSON Schema type names plus the `integer` sub-predicate, and a
//! small bitmask over them for the `type: [...]` array form.
use std::{convert::TryFrom, fmt, ops::BitOr};

/// One of the type names a `"type"` keyword can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Array => write!(f, "array"),
            PrimitiveType::Boolean => write!(f, "boolean"),
            PrimitiveType::Integer => write!(f, "integer"),
            PrimitiveType::Null => write!(f, "null"),
            PrimitiveType::Number => write!(f, "number"),
            PrimitiveType::Object => write!(f, "object"),
            PrimitiveType::String => write!(f, "string"),
        }
    }
}

impl TryFrom<&str> for PrimitiveType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "array" => Ok(PrimitiveType::Array),
            "boolean" => Ok(PrimitiveType::Boolean),
            "integer" => Ok(PrimitiveType::Integer),
            "null" => Ok(PrimitiveType::Null),
            "number" => Ok(PrimitiveType::Number),
            "object" => Ok(PrimitiveType::Object),
            "string" => Ok(PrimitiveType::String),
            _ => Err(()),
        }
    }
}

impl PrimitiveType {
    const fn bit(self) -> u8 {
        match self {
            PrimitiveType::Null => 1 << 0,
            PrimitiveType::Boolean => 1 << 1,
            PrimitiveType::Number => 1 << 2,
            PrimitiveType::Integer => 1 << 3,
            PrimitiveType::String => 1 << 4,
            PrimitiveType::Array => 1 << 5,
            PrimitiveType::Object => 1 << 6,
        }
    }
}

/// A bitmask over [`PrimitiveType`], used for the `type: [...]` array form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeSet(u8);

impl TypeSet {
    #[inline]
    pub fn new() -> Self {
        TypeSet(0)
    }

    #[inline]
    #[must_use]
    pub fn add_type(mut self, type_: PrimitiveType) -> Self {
        self.0 |= type_.bit();
        self
    }

    #[inline]
    pub fn contains_type(self, type_: PrimitiveType) -> bool {
        self.0 & type_.bit() != 0
    }

    /// Iterate the set types in a stable, increasing order.
    pub fn iter(self) -> impl Iterator<Item = PrimitiveType> {
        const ALL: [PrimitiveType; 7] = [
            PrimitiveType::Null,
            PrimitiveType::Boolean,
            PrimitiveType::Number,
            PrimitiveType::Integer,
            PrimitiveType::String,
            PrimitiveType::Array,
            PrimitiveType::Object,
        ];
        ALL.into_iter().filter(move |t| self.contains_type(*t))
    }
}

impl BitOr<PrimitiveType> for TypeSet {
    type Output = TypeSet;
    fn bitor(self, rhs: PrimitiveType) -> TypeSet {
        self.add_type(rhs)
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|t| format!("'{}'", t)).collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_set_contains_added_types() {
        let set = TypeSet::new()
            .add_type(PrimitiveType::String)
            .add_type(PrimitiveType::Number);
        assert!(set.contains_type(PrimitiveType::String));
        assert!(set.contains_type(PrimitiveType::Number));
        assert!(!set.contains_type(PrimitiveType::Array));
    }

    #[test]
    fn try_from_rejects_unknown_name() {
        assert!(PrimitiveType::try_from("weird").is_err());
    }
}
