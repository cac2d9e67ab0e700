//! Removal of internal-only content that must never reach the rendered output.
//!
//! Pruning happens twice. The early pass runs before tags are linked so the
//! health-check path contributes no tag. The late pass runs after reference
//! resolution so content inlined from other files is pruned as well. Every
//! deletion is a no-op when its target is absent.

use crate::document::{object_mut, HttpMethod, DEFINITIONS, PATHS};
use log::debug;
use serde_json::Value;

/// Internal health-check path.
pub const SENTRY_PATH: &str = "/sentry";

/// Model definitions that are not published.
pub const HIDDEN_DEFINITIONS: [&str; 2] = ["Empty", "SNSMessage"];

/// Drops the `/sentry` path item.
pub fn prune_early(document: &mut Value) {
    if let Some(paths) = object_mut(document, PATHS) {
        if paths.shift_remove(SENTRY_PATH).is_some() {
            debug!("Removed internal path {}", SENTRY_PATH);
        }
    }
}

/// Drops every `options` operation and the hidden model definitions.
pub fn prune_late(document: &mut Value) {
    if let Some(paths) = object_mut(document, PATHS) {
        for (path, item) in paths.iter_mut() {
            let removed = item
                .as_object_mut()
                .and_then(|item| item.shift_remove(HttpMethod::Options.as_str()));
            if removed.is_some() {
                debug!("Removed OPTIONS operation on {}", path);
            }
        }
    }

    if let Some(definitions) = object_mut(document, DEFINITIONS) {
        for name in HIDDEN_DEFINITIONS {
            if definitions.shift_remove(name).is_some() {
                debug!("Removed hidden definition {}", name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prune_early_removes_sentry_only() {
        let mut doc = json!({
            "paths": {
                "/sentry": { "get": {} },
                "/pets": { "get": {} }
            }
        });

        prune_early(&mut doc);

        assert!(doc["paths"].get("/sentry").is_none());
        assert!(doc["paths"].get("/pets").is_some());
    }

    #[test]
    fn test_prune_late_removes_options_and_hidden_models() {
        let mut doc = json!({
            "paths": {
                "/pets": { "get": {}, "options": {} },
                "/owners": { "options": {} }
            },
            "definitions": {
                "Pet": { "type": "object" },
                "Empty": { "type": "object" },
                "SNSMessage": { "type": "object" }
            }
        });

        prune_late(&mut doc);

        assert_eq!(doc["paths"]["/pets"], json!({ "get": {} }));
        assert_eq!(doc["paths"]["/owners"], json!({}));
        assert_eq!(doc["definitions"], json!({ "Pet": { "type": "object" } }));
    }

    #[test]
    fn test_pruning_absent_targets_is_noop() {
        let mut doc = json!({ "info": { "title": "Bare" } });
        let before = doc.clone();

        prune_early(&mut doc);
        prune_late(&mut doc);

        assert_eq!(doc, before);
    }
}
