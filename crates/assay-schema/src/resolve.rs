//! # Schema Resolution
//!
//! Only document-local references are supported: a `$ref` is a pointer into
//! the root schema document, `#/definitions/Address` style. The leading `#`
//! is dropped, the remainder is split on `/`, and the root document is
//! walked one segment at a time (object keys, or indices into arrays).
//!
//! ## Compile-time guarantees
//!
//! [`ValidationContext::new`] resolves every pointer reachable from the
//! root, from `definitions`, and from the targets of other pointers, and
//! parses each target once. A dangling pointer or a ref-to-ref loop fails
//! there, so the validator never meets a schema-authoring defect. Chains
//! are still followed hop by hop at validation time; nothing is flattened.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;

use crate::error::SchemaError;
use crate::node::SchemaNode;

/// Parsed root schema plus everything needed to follow `$ref` pointers.
///
/// Immutable once built. `Send + Sync`, so one context can back concurrent
/// validations.
#[derive(Debug)]
pub struct ValidationContext {
    root: SchemaNode,
    definitions: BTreeMap<String, SchemaNode>,
    targets: HashMap<String, SchemaNode>,
}

impl ValidationContext {
    /// Parse the document and resolve every `$ref` it contains.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnresolvedReference` for a dangling pointer and
    /// `SchemaError::ReferenceCycle` for a ref-to-ref loop.
    pub fn new(document: Value) -> Result<Self, SchemaError> {
        let root = SchemaNode::parse(&document);

        let definitions: BTreeMap<String, SchemaNode> = document
            .get("definitions")
            .and_then(Value::as_object)
            .map(|defs| {
                defs.iter()
                    .map(|(name, schema)| (name.clone(), SchemaNode::parse(schema)))
                    .collect()
            })
            .unwrap_or_default();

        let mut pending = Vec::new();
        collect_references(&root, &mut pending);
        for node in definitions.values() {
            collect_references(node, &mut pending);
        }

        let mut targets: HashMap<String, SchemaNode> = HashMap::new();
        while let Some(reference) = pending.pop() {
            if targets.contains_key(&reference) {
                continue;
            }
            let target = SchemaNode::parse(walk_pointer(&document, &reference)?);
            collect_references(&target, &mut pending);
            targets.insert(reference, target);
        }

        let context = Self {
            root,
            definitions,
            targets,
        };
        context.detect_cycles()?;

        tracing::debug!(
            definitions = context.definitions.len(),
            references = context.targets.len(),
            "built validation context"
        );

        Ok(context)
    }

    /// The parsed root schema node.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// The parsed `definitions` map (empty when the document has none).
    pub fn definitions(&self) -> &BTreeMap<String, SchemaNode> {
        &self.definitions
    }

    /// Number of distinct `$ref` pointers in the document.
    pub fn reference_count(&self) -> usize {
        self.targets.len()
    }

    /// Follow `$ref` hops until a node without one is reached. Nodes that
    /// carry no `$ref` resolve to themselves.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnresolvedReference` if a pointer was not seen
    /// at build time, which only happens for nodes from another document.
    pub fn resolve<'a>(&'a self, node: &'a SchemaNode) -> Result<&'a SchemaNode, SchemaError> {
        let mut current = node;
        let mut hops = 0usize;
        while let Some(reference) = current.reference() {
            tracing::trace!(reference, "following $ref");
            current = self
                .targets
                .get(reference)
                .ok_or_else(|| SchemaError::UnresolvedReference {
                    reference: reference.to_string(),
                    segment: reference.to_string(),
                })?;
            hops += 1;
            if hops > self.targets.len() {
                return Err(SchemaError::ReferenceCycle {
                    chain: vec![reference.to_string()],
                });
            }
        }
        Ok(current)
    }

    fn detect_cycles(&self) -> Result<(), SchemaError> {
        for start in self.targets.keys() {
            let mut seen = HashSet::new();
            let mut chain = Vec::new();
            let mut current = start.as_str();
            loop {
                chain.push(current.to_string());
                if !seen.insert(current) {
                    return Err(SchemaError::ReferenceCycle { chain });
                }
                match self.targets.get(current).and_then(SchemaNode::reference) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
        Ok(())
    }
}

/// Split a `$ref` into unescaped pointer segments.
pub fn pointer_segments(reference: &str) -> Vec<String> {
    reference
        .strip_prefix('#')
        .unwrap_or(reference)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Walk the root document along a `$ref` pointer.
///
/// # Errors
///
/// Returns `SchemaError::UnresolvedReference` naming the first segment that
/// does not exist.
pub fn walk_pointer<'a>(document: &'a Value, reference: &str) -> Result<&'a Value, SchemaError> {
    let mut current = document;
    for segment in pointer_segments(reference) {
        let next = match current {
            Value::Object(map) => map.get(&segment),
            Value::Array(list) => segment.parse::<usize>().ok().and_then(|i| list.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| SchemaError::UnresolvedReference {
            reference: reference.to_string(),
            segment: segment.clone(),
        })?;
    }
    Ok(current)
}

fn collect_references(node: &SchemaNode, out: &mut Vec<String>) {
    if let Some(reference) = node.reference() {
        out.push(reference.to_string());
    }
    for child in node.children() {
        collect_references(child, out);
    }
}
