use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DevtoolsConfig {
    pub agent: AgentConfig,
    pub panel: PanelConfig,
    pub overlay: OverlayConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Extension that receives lifecycle messages from the page.
    pub extension_id: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PanelConfig {
    pub initial_selection: String,
    pub json_preview_depth: usize,
    pub sidebar_open: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub highlight_color: String,
}

/// Default configuration embedded in the binary
pub const DEFAULT_CONFIG: &str = r#"
[agent]
extension_id = "dmbopeepjkdlplkjcjbnfiikajiddhnd"

[panel]
initial_selection = "root"
json_preview_depth = 2
sidebar_open = true

[overlay]
highlight_color = "rgba(166, 195, 228, 0.6)"
"#;

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            extension_id: "dmbopeepjkdlplkjcjbnfiikajiddhnd".to_string(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            initial_selection: "root".to_string(),
            json_preview_depth: crate::shared::json_preview::DEFAULT_PREVIEW_DEPTH,
            sidebar_open: true,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            highlight_color: "rgba(166, 195, 228, 0.6)".to_string(),
        }
    }
}

impl Default for DevtoolsConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            panel: PanelConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl DevtoolsConfig {
    /// Parse an override document. Missing sections and keys keep their
    /// defaults.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: DevtoolsConfig = toml::from_str(contents)?;
        Ok(config)
    }
}

/// Load the embedded configuration.
pub fn load_config() -> anyhow::Result<DevtoolsConfig> {
    log::debug!("Using default embedded configuration");
    DevtoolsConfig::from_toml_str(DEFAULT_CONFIG)
}

static CONFIG: Lazy<DevtoolsConfig> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        log::error!("Failed to parse embedded config: {e}");
        DevtoolsConfig::default()
    })
});

/// Process-wide configuration, parsed once.
pub fn config() -> &'static DevtoolsConfig {
    &CONFIG
}
