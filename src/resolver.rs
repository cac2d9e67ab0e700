//! `$ref` resolution.
//!
//! The pipeline only relies on the [`ReferenceResolver`] contract: given a base
//! directory and a document, hand back the document with every reference
//! replaced by the content it points to. [`FileReferenceResolver`] is the
//! implementation used by default. It handles pointers into the same document
//! (`#/definitions/Pet`) and into files on disk (`models.yaml#/Pet`,
//! `common.json`), but never fetches anything over the network.

use crate::error::{Error, Result};
use crate::loader::load_document;
use crate::options::base_directory;
use log::{debug, warn};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const REF: &str = "$ref";

/// Replaces every `$ref` in a document with the referenced content.
///
/// Implementations must return the document unchanged when it holds no
/// references. Any error aborts the whole preprocessing run.
pub trait ReferenceResolver {
    fn resolve(&self, base_dir: &Path, document: Value) -> Result<Value>;
}

/// Resolves internal pointers and relative file references.
///
/// An object with a string `$ref` is replaced as a whole; keys next to the
/// `$ref` are dropped. Content pulled in from another file is resolved against
/// that file. A reference that is already being expanded further up the chain
/// is left in place, so recursive models terminate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReferenceResolver;

impl FileReferenceResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ReferenceResolver for FileReferenceResolver {
    fn resolve(&self, base_dir: &Path, document: Value) -> Result<Value> {
        debug!("Resolving references relative to {}", base_dir.display());
        let source = Source {
            root: Rc::new(document),
            dir: base_dir.to_path_buf(),
            id: String::new(),
        };
        let mut session = Session::default();
        let resolved = session.expand(&source.root, &source, "")?;
        debug!(
            "Resolved {} reference(s) from {} external file(s)",
            session.resolved,
            session.files.len()
        );
        Ok(resolved)
    }
}

/// The document a reference is resolved in.
#[derive(Debug, Clone)]
struct Source {
    root: Rc<Value>,
    dir: PathBuf,
    id: String,
}

#[derive(Default)]
struct Session {
    files: HashMap<PathBuf, Rc<Value>>,
    /// Locations of the references currently being expanded.
    active: Vec<String>,
    resolved: usize,
}

impl Session {
    /// Expands `node`, found at `pointer` inside `source`.
    fn expand(&mut self, node: &Value, source: &Source, pointer: &str) -> Result<Value> {
        match node {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get(REF) {
                    return self.expand_reference(reference, node, source, pointer);
                }
                let mut expanded = Map::with_capacity(map.len());
                for (key, value) in map {
                    let child = format!("{}/{}", pointer, escape_pointer_segment(key));
                    expanded.insert(key.clone(), self.expand(value, source, &child)?);
                }
                Ok(Value::Object(expanded))
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| self.expand(item, source, &format!("{}/{}", pointer, index)))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn expand_reference(
        &mut self,
        reference: &str,
        node: &Value,
        source: &Source,
        pointer: &str,
    ) -> Result<Value> {
        if reference.contains("://") {
            return Err(Error::UnsupportedReference(reference.to_string()));
        }

        let (file, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        let target_source = if file.is_empty() {
            source.clone()
        } else {
            self.open(reference, &source.dir.join(file))?
        };
        let fragment = normalize_fragment(fragment);
        let target = format!("{}#{}", target_source.id, fragment);

        // Expanding a target that encloses the place it is referenced from, here
        // or further up the chain, would never finish.
        let here = format!("{}#{}", source.id, pointer);
        if std::iter::once(&here)
            .chain(self.active.iter())
            .any(|location| is_within(location, &target))
        {
            warn!("Leaving cyclic reference '{}' unresolved", reference);
            return Ok(node.clone());
        }

        let value = resolve_pointer(&target_source.root, &fragment)
            .ok_or_else(|| Error::UnresolvedReference {
                reference: reference.to_string(),
                message: if target_source.id.is_empty() {
                    format!("no value at '#{}'", fragment)
                } else {
                    format!("no value at '#{}' in {}", fragment, target_source.id)
                },
            })?
            .clone();

        self.active.push(here);
        let expanded = self.expand(&value, &target_source, &fragment);
        self.active.pop();
        self.resolved += 1;
        self.overlay_siblings(expanded?, node, source, pointer)
    }

    /// Writes the keys found next to `$ref` over the resolved object.
    fn overlay_siblings(
        &mut self,
        resolved: Value,
        node: &Value,
        source: &Source,
        pointer: &str,
    ) -> Result<Value> {
        let Some(siblings) = node.as_object().filter(|map| map.len() > 1) else {
            return Ok(resolved);
        };
        let Value::Object(mut merged) = resolved else {
            debug!("Dropping keys next to a reference at '#{}' to a non-object", pointer);
            return Ok(resolved);
        };
        for (key, value) in siblings.iter().filter(|(key, _)| key.as_str() != REF) {
            let child = format!("{}/{}", pointer, escape_pointer_segment(key));
            merged.insert(key.clone(), self.expand(value, source, &child)?);
        }
        Ok(Value::Object(merged))
    }

    fn open(&mut self, reference: &str, path: &Path) -> Result<Source> {
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let root = match self.files.get(&path) {
            Some(root) => Rc::clone(root),
            None => {
                let loaded = load_document(&path).map_err(|err| Error::UnresolvedReference {
                    reference: reference.to_string(),
                    message: err.to_string(),
                })?;
                let root = Rc::new(loaded);
                self.files.insert(path.clone(), Rc::clone(&root));
                root
            }
        };
        Ok(Source {
            root,
            dir: base_directory(&path),
            id: path.display().to_string(),
        })
    }
}

/// Looks up a URI fragment holding a JSON Pointer. An empty fragment is the root.
pub fn resolve_pointer<'a>(root: &'a Value, fragment: &str) -> Option<&'a Value> {
    if fragment.is_empty() {
        return Some(root);
    }
    if !fragment.starts_with('/') {
        return None;
    }
    let mut current = root;
    for segment in fragment[1..].split('/') {
        let segment = decode_pointer_segment(segment);
        current = match current {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    decoded.replace("~1", "/").replace("~0", "~")
}

fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn is_within(location: &str, target: &str) -> bool {
    location == target
        || location
            .strip_prefix(target)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Rewrites a fragment so that equal pointers compare equal as strings.
fn normalize_fragment(fragment: &str) -> String {
    match fragment.strip_prefix('/') {
        Some(rest) => rest
            .split('/')
            .map(|segment| format!("/{}", escape_pointer_segment(&decode_pointer_segment(segment))))
            .collect(),
        None => fragment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn resolve(base_dir: &Path, document: Value) -> Result<Value> {
        FileReferenceResolver::new().resolve(base_dir, document)
    }

    #[test]
    fn test_document_without_refs_is_unchanged() {
        let doc = json!({ "paths": { "/a": { "get": { "responses": {} } } }, "list": [1, 2] });
        let resolved = resolve(Path::new("."), doc.clone()).unwrap();
        assert_eq!(resolved, doc);
    }

    #[test]
    fn test_internal_pointer() {
        let doc = json!({
            "definitions": { "Pet": { "type": "object" } },
            "paths": { "/pets": { "get": { "schema": { "$ref": "#/definitions/Pet" } } } }
        });

        let resolved = resolve(Path::new("."), doc).unwrap();

        assert_eq!(
            resolved["paths"]["/pets"]["get"]["schema"],
            json!({ "type": "object" })
        );
    }

    #[test]
    fn test_nested_internal_pointers() {
        let doc = json!({
            "definitions": {
                "Owner": { "type": "object" },
                "Pet": { "properties": { "owner": { "$ref": "#/definitions/Owner" } } }
            },
            "x": { "$ref": "#/definitions/Pet" }
        });

        let resolved = resolve(Path::new("."), doc).unwrap();

        assert_eq!(resolved["x"]["properties"]["owner"], json!({ "type": "object" }));
    }

    #[test]
    fn test_escaped_pointer_segments() {
        let doc = json!({
            "paths": { "/pets/{id}": { "get": { "summary": "one" } } },
            "x": { "$ref": "#/paths/~1pets~1%7Bid%7D/get" }
        });

        let resolved = resolve(Path::new("."), doc).unwrap();

        assert_eq!(resolved["x"], json!({ "summary": "one" }));
    }

    #[test]
    fn test_missing_internal_target_fails() {
        let doc = json!({ "x": { "$ref": "#/definitions/Nope" } });
        let result = resolve(Path::new("."), doc);
        assert!(matches!(result, Err(Error::UnresolvedReference { .. })));
    }

    #[test]
    fn test_remote_reference_rejected() {
        let doc = json!({ "x": { "$ref": "https://example.com/models.json#/Pet" } });
        let result = resolve(Path::new("."), doc);
        assert!(matches!(result, Err(Error::UnsupportedReference(_))));
    }

    #[test]
    fn test_external_files_resolve_relative_to_their_own_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("models")).unwrap();
        fs::write(
            root.join("models/pet.yaml"),
            "Pet:\n  type: object\n  properties:\n    tag:\n      $ref: 'tag.json'\n",
        )
        .unwrap();
        fs::write(root.join("models/tag.json"), r#"{"type": "string"}"#).unwrap();

        let doc = json!({ "definitions": { "Pet": { "$ref": "models/pet.yaml#/Pet" } } });
        let resolved = resolve(root, doc).unwrap();

        assert_eq!(
            resolved["definitions"]["Pet"],
            json!({ "type": "object", "properties": { "tag": { "type": "string" } } })
        );
    }

    #[test]
    fn test_external_internal_pointer_uses_external_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(
            root.join("common.json"),
            r##"{"Error": {"properties": {"code": {"$ref": "#/Code"}}}, "Code": {"type": "integer"}}"##,
        )
        .unwrap();

        let doc = json!({ "x": { "$ref": "common.json#/Error" } });
        let resolved = resolve(root, doc).unwrap();

        assert_eq!(resolved["x"]["properties"]["code"], json!({ "type": "integer" }));
    }

    #[test]
    fn test_missing_external_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let doc = json!({ "x": { "$ref": "nowhere.json" } });
        let result = resolve(temp_dir.path(), doc);
        assert!(matches!(result, Err(Error::UnresolvedReference { .. })));
    }

    #[test]
    fn test_cyclic_reference_is_left_in_place() {
        let doc = json!({
            "definitions": {
                "Node": { "properties": { "next": { "$ref": "#/definitions/Node" } } }
            }
        });

        let resolved = resolve(Path::new("."), doc).unwrap();

        assert_eq!(
            resolved["definitions"]["Node"],
            json!({ "properties": { "next": { "$ref": "#/definitions/Node" } } })
        );
    }

    #[test]
    fn test_mutually_recursive_models_terminate() {
        let doc = json!({
            "definitions": {
                "Owner": { "properties": { "pets": { "items": { "$ref": "#/definitions/Pet" } } } },
                "Pet": { "properties": { "owner": { "$ref": "#/definitions/Owner" } } }
            }
        });

        let resolved = resolve(Path::new("."), doc).unwrap();

        assert_eq!(
            resolved["definitions"]["Owner"]["properties"]["pets"]["items"],
            json!({ "properties": { "owner": { "$ref": "#/definitions/Owner" } } })
        );
    }

    #[test]
    fn test_keys_next_to_ref_overlay_resolved_object() {
        let doc = json!({
            "x-ops": { "getA": { "tags": ["W"], "summary": "A", "responses": {} } },
            "paths": {
                "/a": {
                    "get": {
                        "$ref": "#/x-ops/getA",
                        "path": "/a",
                        "tags": ["default"],
                        "extra": { "$ref": "#/x-ops/getA/summary" }
                    }
                }
            }
        });

        let resolved = resolve(Path::new("."), doc).unwrap();

        assert_eq!(
            resolved["paths"]["/a"]["get"],
            json!({
                "tags": ["default"],
                "summary": "A",
                "responses": {},
                "path": "/a",
                "extra": "A"
            })
        );
    }

    #[test]
    fn test_keys_next_to_ref_to_scalar_are_dropped() {
        let doc = json!({ "name": "Rex", "x": { "$ref": "#/name", "description": "d" } });
        let resolved = resolve(Path::new("."), doc).unwrap();
        assert_eq!(resolved["x"], "Rex");
    }

    #[test]
    fn test_normalize_fragment() {
        assert_eq!(normalize_fragment("/paths/%7E1pets"), "/paths/~1pets");
        assert_eq!(normalize_fragment("/a~1b/c"), "/a~1b/c");
        assert_eq!(normalize_fragment(""), "");
    }

    #[test]
    fn test_decode_pointer_segment() {
        assert_eq!(decode_pointer_segment("a~1b~0c"), "a/b~c");
        assert_eq!(decode_pointer_segment("User%20Profile"), "User Profile");
    }
}
