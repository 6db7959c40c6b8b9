/// Rendering configuration for the family tree maker
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub graph: GraphSettings,
    pub colors: ColorSettings,
    pub layout: LayoutSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Shape applied to every node statement.
    pub node_shape: String,
    /// Arrowhead mode for edge statements (`none` draws plain family lines).
    pub edge_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub female: String,
    pub male: String,
    pub unknown: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Emit a `rank=same` group per generation in descendants mode.
    pub rank_generations: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            graph: GraphSettings::default(),
            colors: ColorSettings::default(),
            layout: LayoutSettings::default(),
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            node_shape: "box".to_string(),
            edge_dir: "none".to_string(),
        }
    }
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            female: "bisque".to_string(),
            male: "azure2".to_string(),
            unknown: "white".to_string(),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            rank_generations: true,
        }
    }
}

impl RenderConfig {
    /// Load configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RenderConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.graph.node_shape.is_empty() {
            return Err(anyhow::anyhow!("Node shape must not be empty"));
        }

        if !matches!(
            self.graph.edge_dir.as_str(),
            "none" | "forward" | "back" | "both"
        ) {
            return Err(anyhow::anyhow!(
                "Edge dir must be one of none, forward, back, both"
            ));
        }

        for color in [
            &self.colors.female,
            &self.colors.male,
            &self.colors.unknown,
        ] {
            if color.is_empty() {
                return Err(anyhow::anyhow!("Fill colors must not be empty"));
            }
        }

        Ok(())
    }
}
