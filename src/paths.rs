//! Facilities for tracking the path from the instance root to the
//! sub-instance currently being evaluated.
use std::{cell::RefCell, fmt, fmt::Write as _};

/// A single JSON Pointer path, built from pushed/popped components.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct JSONPointer(Vec<PathChunk>);

impl fmt::Display for JSONPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.0 {
            f.write_char('/')?;
            match chunk {
                PathChunk::Name(value) => f.write_str(value)?,
                PathChunk::Index(idx) => write!(f, "{}", idx)?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum PathChunk {
    Name(String),
    Index(usize),
}

impl From<String> for PathChunk {
    #[inline]
    fn from(value: String) -> Self {
        PathChunk::Name(value)
    }
}
impl From<&str> for PathChunk {
    #[inline]
    fn from(value: &str) -> Self {
        PathChunk::Name(value.to_owned())
    }
}
impl From<usize> for PathChunk {
    #[inline]
    fn from(value: usize) -> Self {
        PathChunk::Index(value)
    }
}

/// A mutable path buffer threaded through evaluation. Components are pushed
/// on descent into a property/index and popped on return, so a
/// `ValidationError` built mid-evaluation captures the real location instead
/// of always reading the root.
#[derive(Clone, Debug, Default)]
pub(crate) struct InstancePath(RefCell<Vec<PathChunk>>);

impl InstancePath {
    pub(crate) fn new() -> Self {
        InstancePath(RefCell::new(Vec::new()))
    }

    #[inline]
    pub(crate) fn push(&self, value: impl Into<PathChunk>) {
        self.0.borrow_mut().push(value.into());
    }

    #[inline]
    pub(crate) fn pop(&self) {
        self.0.borrow_mut().pop();
    }
}

impl From<&InstancePath> for JSONPointer {
    #[inline]
    fn from(path: &InstancePath) -> Self {
        JSONPointer(path.0.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_round_trip() {
        let path = InstancePath::new();
        path.push("properties".to_string());
        path.push(0usize);
        let pointer: JSONPointer = (&path).into();
        assert_eq!(pointer.to_string(), "/properties/0");
        path.pop();
        path.pop();
        let pointer: JSONPointer = (&path).into();
        assert_eq!(pointer.to_string(), "");
    }
}
