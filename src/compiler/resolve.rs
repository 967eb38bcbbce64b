//! `$ref` resolution: `"#"` and `"#/..."` JSON-Pointer fragments into the
//! stored root schema. No absolute or relative URIs, no remote retrieval —
//! out of scope per the non-goals.
use crate::arena::{Arena, NodeId};
use crate::error::CompileError;
use crate::reference::ReferenceCache;
use serde_json::Value;

use super::compile_node;

/// Look up the schema a `$ref` URI names within `root`.
fn resolve_pointer<'a>(uri: &str, root: &'a Value) -> Result<&'a Value, CompileError> {
    if uri == "#" {
        return Ok(root);
    }
    if let Some(pointer) = uri.strip_prefix('#') {
        return root
            .pointer(pointer)
            .ok_or_else(|| CompileError::UnresolvableReference(uri.to_string()));
    }
    Err(CompileError::UnresolvableReference(uri.to_string()))
}

/// Resolve `uri` to a compiled node, memoizing in `cache`.
///
/// The cache entry is inserted *before* compiling the target schema's body,
/// so a second encounter of the same URI — direct or indirect — during that
/// compilation returns the reserved id immediately instead of recursing.
/// This is what makes cyclic `$ref` graphs compile at all.
pub(crate) fn resolve_ref(
    uri: &str,
    root: &Value,
    arena: &mut Arena,
    cache: &mut ReferenceCache,
) -> Result<NodeId, CompileError> {
    if let Some(id) = cache.get(uri) {
        return Ok(id);
    }
    let target = resolve_pointer(uri, root)?;
    let id = arena.reserve();
    cache.insert(uri, id);
    let node = compile_node(target, root, arena, cache)?;
    arena.fill(id, node);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use serde_json::json;

    #[test]
    fn root_reference_resolves_to_root() {
        let root = json!({"$defs": {"a": {"type": "string"}}});
        let mut arena = Arena::new();
        let mut cache = ReferenceCache::new();
        let id = resolve_ref("#/$defs/a", &root, &mut arena, &mut cache).unwrap();
        assert!(matches!(arena.get(id), Node::String(_)));
    }

    #[test]
    fn unresolvable_pointer_is_a_compile_error() {
        let root = json!({});
        let mut arena = Arena::new();
        let mut cache = ReferenceCache::new();
        let err = resolve_ref("#/nope", &root, &mut arena, &mut cache).unwrap_err();
        assert_eq!(err, CompileError::UnresolvableReference("#/nope".to_string()));
    }

    #[test]
    fn self_referential_schema_compiles_without_overflowing() {
        let root = json!({"$defs": {"a": {"$ref": "#/$defs/a"}}});
        let mut arena = Arena::new();
        let mut cache = ReferenceCache::new();
        let id = resolve_ref("#/$defs/a", &root, &mut arena, &mut cache).unwrap();
        assert!(matches!(arena.get(id), Node::Ref(_)));
    }
}
