use serde::{Deserialize, Serialize};

/// Thresholds the rules are evaluated against. Immutable once an engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Stressed LVR above this raises `lvr_stressed_gt_70` (strictly greater)
    #[serde(default = "default_max_stressed_lvr")]
    pub max_stressed_lvr: f64,
}

fn default_max_stressed_lvr() -> f64 {
    0.70
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_stressed_lvr: default_max_stressed_lvr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(EngineConfig::default().max_stressed_lvr, 0.70);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());

        let config: EngineConfig = serde_json::from_str(r#"{"max_stressed_lvr": 0.65}"#).unwrap();
        assert_eq!(config.max_stressed_lvr, 0.65);
    }
}
