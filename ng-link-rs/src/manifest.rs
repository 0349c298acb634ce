//! `package.json` rewriting.
//!
//! Adds the link condition to every export whose `default` target lives in
//! the bundle directory, and lists the linked artifacts of literal
//! side-effect entries.

use crate::config::LinkConfig;
use crate::error::{LinkError, Result};
use serde_json::{Map, Value};

const WILDCARDS: &[char] = &['*', '?'];

/// One link condition added to an export entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionChange {
    pub subpath: String,
    pub target: String,
}

/// What a manifest update changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestChanges {
    pub conditions: Vec<ConditionChange>,
    pub side_effects: Vec<String>,
}

impl ManifestChanges {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.side_effects.is_empty()
    }
}

/// Reads, updates and rewrites the manifest at [`LinkConfig::manifest_path`].
///
/// Nothing is written if the manifest can't be parsed or has no `exports`.
pub async fn update_manifest(config: &LinkConfig) -> Result<ManifestChanges> {
    let path = config.manifest_path();
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| LinkError::io(&path, e))?;

    let mut manifest: Value = serde_json::from_str(&raw).map_err(|source| LinkError::Json {
        path: path.clone(),
        source,
    })?;

    let changes = update_manifest_value(&mut manifest, config)?;

    let serialized =
        serde_json::to_string_pretty(&manifest).map_err(|source| LinkError::Json {
            path: path.clone(),
            source,
        })?;
    tokio::fs::write(&path, serialized)
        .await
        .map_err(|e| LinkError::io(&path, e))?;

    log::info!(
        "Updated {}: {} condition(s), {} side-effect pattern(s) added",
        path.display(),
        changes.conditions.len(),
        changes.side_effects.len()
    );
    Ok(changes)
}

/// Applies the link rewrite to an already parsed manifest.
pub fn update_manifest_value(
    manifest: &mut Value,
    config: &LinkConfig,
) -> Result<ManifestChanges> {
    let path = config.manifest_path();
    let exports = match manifest.get_mut("exports") {
        None | Some(Value::Null) => return Err(LinkError::MissingExports { path }),
        Some(Value::Object(exports)) => exports,
        Some(_) => return Err(LinkError::UnsupportedExports { path }),
    };

    let conditions = add_link_conditions(exports, config);
    let side_effects = match manifest.get_mut("sideEffects") {
        Some(Value::Array(patterns)) => add_linked_side_effects(patterns, config),
        _ => Vec::new(),
    };

    Ok(ManifestChanges {
        conditions,
        side_effects,
    })
}

fn add_link_conditions(
    exports: &mut Map<String, Value>,
    config: &LinkConfig,
) -> Vec<ConditionChange> {
    let bundle_dir = config.bundle_dir_name();
    let mut changes = Vec::new();

    for (subpath, entry) in exports.iter_mut() {
        let Some(conditions) = entry.as_object_mut() else {
            log::debug!("Skipping export {subpath}: not a conditions object");
            continue;
        };
        let target = match conditions.get("default").and_then(Value::as_str) {
            Some(default) if default.contains(bundle_dir) => config.linked_name(default),
            _ => {
                log::debug!("Skipping export {subpath}: no `default` in {bundle_dir}");
                continue;
            }
        };
        if conditions.contains_key(&config.condition) {
            log::debug!(
                "Export {subpath} already has a `{}` condition",
                config.condition
            );
            continue;
        }

        // First, so resolvers try the linked artifact before `default`.
        let mut updated = Map::with_capacity(conditions.len() + 1);
        updated.insert(config.condition.clone(), Value::String(target.clone()));
        updated.extend(std::mem::take(conditions));
        *conditions = updated;

        log::info!("Export {subpath}: `{}` -> {target}", config.condition);
        changes.push(ConditionChange {
            subpath: subpath.clone(),
            target,
        });
    }
    changes
}

fn add_linked_side_effects(patterns: &mut Vec<Value>, config: &LinkConfig) -> Vec<String> {
    let scope = format!("{}/", config.bundle_dir_name());
    let suffix = config.suffix();
    let mut added: Vec<String> = Vec::new();

    for pattern in patterns.iter().filter_map(Value::as_str) {
        if pattern.contains(WILDCARDS) || pattern.ends_with(&suffix) {
            continue;
        }
        if !pattern.trim_start_matches("./").starts_with(&scope) {
            log::debug!("Side-effect pattern {pattern} is outside {scope}");
            continue;
        }
        let linked = config.linked_name(pattern);
        let present = patterns.iter().any(|p| p.as_str() == Some(linked.as_str()))
            || added.contains(&linked);
        if !present {
            added.push(linked);
        }
    }

    patterns.extend(added.iter().cloned().map(Value::String));
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(mut manifest: Value) -> (Value, ManifestChanges) {
        let changes = update_manifest_value(&mut manifest, &LinkConfig::default()).unwrap();
        (manifest, changes)
    }

    #[test]
    fn test_adds_condition_first() {
        let (manifest, changes) = update(json!({
            "exports": {
                ".": {
                    "types": "./index.d.ts",
                    "default": "./fesm2022/core.mjs"
                }
            }
        }));
        let keys: Vec<_> = manifest["exports"]["."]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["ng-linked", "types", "default"]);
        assert_eq!(
            manifest["exports"]["."]["ng-linked"],
            "./fesm2022/core.mjs.linked.mjs"
        );
        assert_eq!(manifest["exports"]["."]["types"], "./index.d.ts");
        assert_eq!(manifest["exports"]["."]["default"], "./fesm2022/core.mjs");
        assert_eq!(
            changes.conditions,
            vec![ConditionChange {
                subpath: ".".to_string(),
                target: "./fesm2022/core.mjs.linked.mjs".to_string(),
            }]
        );
    }

    #[test]
    fn test_skips_entries_outside_bundle_dir() {
        let (manifest, changes) = update(json!({
            "exports": {
                "./package.json": "./package.json",
                "./styles": { "sass": "./styles/_index.scss" },
                "./esm": { "default": "./esm2022/core.mjs" },
                "./testing": { "default": "./fesm2022/testing.mjs" }
            }
        }));
        assert_eq!(manifest["exports"]["./package.json"], "./package.json");
        assert_eq!(
            manifest["exports"]["./styles"],
            json!({ "sass": "./styles/_index.scss" })
        );
        assert_eq!(
            manifest["exports"]["./esm"],
            json!({ "default": "./esm2022/core.mjs" })
        );
        assert_eq!(changes.conditions.len(), 1);
        assert_eq!(changes.conditions[0].subpath, "./testing");
    }

    #[test]
    fn test_existing_condition_is_kept() {
        let (manifest, changes) = update(json!({
            "exports": {
                ".": { "default": "./fesm2022/core.mjs", "ng-linked": "./custom.mjs" }
            }
        }));
        assert_eq!(
            manifest["exports"]["."],
            json!({ "default": "./fesm2022/core.mjs", "ng-linked": "./custom.mjs" })
        );
        assert!(changes.conditions.is_empty());
    }

    #[test]
    fn test_side_effects_only_literal_in_scope() {
        let (manifest, changes) = update(json!({
            "exports": {},
            "sideEffects": ["./fesm2022/a.mjs", "./fesm2022/*.mjs", "./other/b.mjs"]
        }));
        assert_eq!(
            manifest["sideEffects"],
            json!([
                "./fesm2022/a.mjs",
                "./fesm2022/*.mjs",
                "./other/b.mjs",
                "./fesm2022/a.mjs.linked.mjs"
            ])
        );
        assert_eq!(changes.side_effects, vec!["./fesm2022/a.mjs.linked.mjs"]);
    }

    #[test]
    fn test_side_effects_with_custom_bundle_dir() {
        let config = LinkConfig {
            bundle_dir: "./fesm".to_string(),
            ..Default::default()
        };
        let mut manifest = json!({
            "exports": {},
            "sideEffects": ["./fesm/a.mjs", "./fesm/*.mjs", "./other/b.mjs"]
        });
        update_manifest_value(&mut manifest, &config).unwrap();
        assert_eq!(
            manifest["sideEffects"],
            json!([
                "./fesm/a.mjs",
                "./fesm/*.mjs",
                "./other/b.mjs",
                "./fesm/a.mjs.linked.mjs"
            ])
        );
    }

    #[test]
    fn test_boolean_side_effects_untouched() {
        let (manifest, changes) = update(json!({
            "exports": { ".": { "default": "./fesm2022/core.mjs" } },
            "sideEffects": false
        }));
        assert_eq!(manifest["sideEffects"], json!(false));
        assert!(changes.side_effects.is_empty());
    }

    #[test]
    fn test_missing_exports_fails() {
        let mut manifest = json!({});
        let err = update_manifest_value(&mut manifest, &LinkConfig::default()).unwrap_err();
        assert!(matches!(err, LinkError::MissingExports { .. }));
        assert_eq!(manifest, json!({}));
    }

    #[test]
    fn test_string_exports_unsupported() {
        let mut manifest = json!({ "exports": "./fesm2022/core.mjs" });
        let err = update_manifest_value(&mut manifest, &LinkConfig::default()).unwrap_err();
        assert!(matches!(err, LinkError::UnsupportedExports { .. }));
    }

    #[test]
    fn test_second_update_changes_nothing() {
        let original = json!({
            "exports": { ".": { "default": "./fesm2022/core.mjs" } },
            "sideEffects": ["./fesm2022/core.mjs"]
        });
        let (once, _) = update(original);
        let (twice, changes) = update(once.clone());
        assert_eq!(once, twice);
        assert!(changes.is_empty());
    }
}
