#![forbid(unsafe_code)]

//! Plugin configuration, loadable from the host's app config JSON.

use serde::{Deserialize, Serialize};
use vizembed_core::{ConfigError, SizePolicy};

use crate::picker::{SampleView, builtin_samples};

/// Default quick-size height presets.
pub const DEFAULT_HEIGHT_PRESETS: [u32; 3] = [400, 520, 800];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    /// Toolbar button title.
    pub title: String,
    /// Toolbar button icon name.
    pub icon: String,
    pub sizing: SizePolicy,
    pub height_presets: Vec<u32>,
    pub samples: Vec<SampleView>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            title: "Tableau".to_owned(),
            icon: "tableau".to_owned(),
            sizing: SizePolicy::default(),
            height_presets: DEFAULT_HEIGHT_PRESETS.to_vec(),
            samples: builtin_samples(),
        }
    }
}

impl PluginConfig {
    /// Parse and validate a JSON config document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sizing.validate()?;
        if let Some(&height) = self
            .height_presets
            .iter()
            .find(|&&height| height < self.sizing.min_height)
        {
            return Err(ConfigError::InvalidPreset {
                height,
                min_height: self.sizing.min_height,
            });
        }
        Ok(())
    }
}
