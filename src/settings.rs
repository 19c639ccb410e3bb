use crate::CONFY_APP_NAME;
use crate::filter::RetentionConfig;

use serde::{Deserialize, Serialize};

/// Where to find the external application's batch console, persisted so
/// the user configures it once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterSettings {
    /// Explicit console path; wins over discovery when set.
    pub console_path: String,
    /// Vendor root directories handed to the discovery strategy.
    pub search_roots: Vec<String>,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            console_path: String::new(),
            search_roots: vec!["C:/Program Files/Autodesk".to_string()],
        }
    }
}

impl ConverterSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "converter").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "converter", self);
    }
}

/// Persisted default retention flags, applied when the caller does not
/// supply its own configuration for an import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportDefaults {
    pub retention: RetentionConfig,
}

impl ImportDefaults {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "import").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "import", self);
    }
}

// Aggregate struct for convenience
pub struct Settings {
    pub converter: ConverterSettings,
    pub import: ImportDefaults,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            converter: ConverterSettings::load(),
            import: ImportDefaults::load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_defaults_round_trip_through_serde() {
        let defaults = ImportDefaults::default();
        let json = serde_json::to_string(&defaults).unwrap();
        let back: ImportDefaults = serde_json::from_str(&json).unwrap();
        assert_eq!(back.retention, defaults.retention);
        // shipped defaults: keep everything, shrink by 100x, no rotation
        assert!(back.retention.meshes && back.retention.materials);
        assert!(back.retention.apply_scale);
        assert!(!back.retention.apply_rotation);
    }
}
