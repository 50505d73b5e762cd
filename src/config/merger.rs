//! Deep merge for layered YAML configuration.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences are replaced entirely (not merged)
//! - Null values in overlay delete the corresponding key from base
//! - Scalars in overlay replace scalars in base

use serde_yaml::Value;

/// Deep merge two YAML values; `overlay` wins at the point of conflict.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }

        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order (later overrides earlier).
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, config| {
            deep_merge(&acc, config)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn nested_keys_merge_recursively() {
        let base = yaml(
            r#"
package:
  name: visidata-mcp
  module: visidata_mcp.server
"#,
        );
        let overlay = yaml(
            r#"
package:
  module: visidata_mcp.cli
"#,
        );

        let result = deep_merge(&base, &overlay);

        assert_eq!(result["package"]["module"], "visidata_mcp.cli");
        assert_eq!(result["package"]["name"], "visidata-mcp");
    }

    #[test]
    fn sequences_are_replaced_not_merged() {
        let base = yaml("runtime:\n  candidates: [python3, python]\n");
        let overlay = yaml("runtime:\n  candidates: [python3.12]\n");

        let result = deep_merge(&base, &overlay);
        let candidates = result["runtime"]["candidates"].as_sequence().unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0], "python3.12");
    }

    #[test]
    fn null_removes_inherited_value() {
        let base = yaml("supervisor:\n  working_dir: /srv/data\n");
        let overlay = yaml("supervisor:\n  working_dir: null\n");

        let result = deep_merge(&base, &overlay);

        assert!(result["supervisor"].get("working_dir").is_none());
    }

    #[test]
    fn merge_configs_applies_layers_in_order() {
        let configs = vec![yaml("a: 1\nb: 2"), yaml("b: 3\nc: 4"), yaml("c: 5")];

        let result = merge_configs(&configs);

        assert_eq!(result["a"], 1);
        assert_eq!(result["b"], 3);
        assert_eq!(result["c"], 5);
    }

    #[test]
    fn no_layers_is_empty_mapping() {
        assert!(merge_configs(&[]).as_mapping().unwrap().is_empty());
    }
}
