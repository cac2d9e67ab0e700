//! Tag to operation graph.
//!
//! Swagger lets every operation name its tags while only some of them are
//! declared in the top-level `tags` list. [`TagGraph`] collects the declared
//! tags first, then grows as operations are linked, creating any tag that was
//! only used implicitly. Operations are held as [`OperationKey`]s into the
//! working document and only turned into values by [`TagGraph::attach`], once
//! every other pass is done with the document.

use crate::document::{OperationKey, TAGS};
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A named group of operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub operations: Vec<OperationKey>,
}

/// Tags in discovery order with a by-name index.
#[derive(Debug, Default)]
pub struct TagGraph {
    tags: Vec<Tag>,
    by_name: HashMap<String, usize>,
    /// Declared entries that no tag is linked through: unnamed ones and
    /// repeated names.
    passthrough: usize,
}

impl TagGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the graph with the document's declared `tags`, keeping their order.
    ///
    /// Entries without a string `name`, and repeats of a name, link nothing
    /// but still count as tags.
    pub fn from_declared(document: &Value) -> Self {
        let mut graph = Self::new();
        let declared = document.get(TAGS).and_then(Value::as_array);
        for entry in declared.into_iter().flatten() {
            match entry.get("name").and_then(Value::as_str) {
                Some(name) if !graph.by_name.contains_key(name) => {
                    graph.get_or_insert(name);
                }
                Some(name) => {
                    debug!("Tag '{}' is declared more than once", name);
                    graph.passthrough += 1;
                }
                None => {
                    debug!("Declared tag without a name: {}", entry);
                    graph.passthrough += 1;
                }
            }
        }
        graph
    }

    /// Appends `operation` to the tag called `name`, creating the tag if needed.
    pub fn link(&mut self, name: &str, operation: OperationKey) {
        let index = self.get_or_insert(name);
        self.tags[index].operations.push(operation);
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.by_name.get(name).map(|&index| &self.tags[index])
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Number of entries the written `tags` array will have.
    pub fn len(&self) -> usize {
        self.tags.len() + self.passthrough
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the template should render the per-tag summary.
    pub fn show_summary(&self) -> bool {
        self.len() > 1
    }

    /// Writes the graph into `document.tags`.
    ///
    /// Declared entries stay where they are and keep their own fields; when a
    /// name is declared more than once, its last entry carries the operations.
    /// Implicit tags follow in discovery order. Every tag gets an `operations`
    /// array with the current content of each linked operation; operations
    /// that no longer exist in `paths` are left out.
    pub fn attach(self, document: &mut Value) {
        let declared = document
            .get(TAGS)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut last_declared: HashMap<&str, usize> = HashMap::new();
        for (position, entry) in declared.iter().enumerate() {
            if let Some(name) = entry.get("name").and_then(Value::as_str) {
                last_declared.insert(name, position);
            }
        }

        let source: &Value = document;
        let mut rendered = Vec::with_capacity(declared.len().max(self.tags.len()));
        let mut placed = vec![false; self.tags.len()];
        for (position, entry) in declared.iter().enumerate() {
            let linked = entry
                .get("name")
                .and_then(Value::as_str)
                .filter(|name| last_declared.get(name) == Some(&position))
                .and_then(|name| self.by_name.get(name).copied());
            let mut entry = entry.clone();
            let operations = match linked {
                Some(index) => {
                    placed[index] = true;
                    self.materialize(&self.tags[index], source)
                }
                None => Vec::new(),
            };
            if let Some(fields) = entry.as_object_mut() {
                fields.insert("operations".to_string(), Value::Array(operations));
            }
            rendered.push(entry);
        }

        for (index, tag) in self.tags.iter().enumerate() {
            if placed[index] {
                continue;
            }
            let mut fields = Map::new();
            fields.insert("name".to_string(), Value::String(tag.name.clone()));
            fields.insert(
                "operations".to_string(),
                Value::Array(self.materialize(tag, source)),
            );
            rendered.push(Value::Object(fields));
        }

        if let Some(root) = document.as_object_mut() {
            root.insert(TAGS.to_string(), Value::Array(rendered));
        }
    }

    fn materialize(&self, tag: &Tag, source: &Value) -> Vec<Value> {
        tag.operations
            .iter()
            .filter_map(|key| match key.lookup(source) {
                Some(operation) => Some(operation.clone()),
                None => {
                    debug!("Tag '{}' drops pruned operation {}", tag.name, key);
                    None
                }
            })
            .collect()
    }

    fn get_or_insert(&mut self, name: &str) -> usize {
        if let Some(&index) = self.by_name.get(name) {
            return index;
        }
        debug!("Registering tag '{}'", name);
        let index = self.tags.len();
        self.tags.push(Tag {
            name: name.to_string(),
            operations: Vec::new(),
        });
        self.by_name.insert(name.to_string(), index);
        index
    }
}
