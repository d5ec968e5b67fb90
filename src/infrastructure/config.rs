use crate::application::canvas_editor::EditorOptions;
use crate::domain::color::Color;
use crate::domain::grid::GridSize;
use crate::domain::view::{BoxTemplate, FontPolicy};
use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub storage: StorageSettings,
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub import: ImportSettings,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EditorSettings {
    pub default_title: String,
    pub default_bg_color: String,
    pub default_text_color: String,
    pub default_font_size: u32,
    pub font_step: u32,
    pub min_font_size: u32,
    pub max_font_size: u32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        let template = BoxTemplate::default();
        let fonts = FontPolicy::default();
        Self {
            default_title: template.title,
            default_bg_color: template.bg_color.into(),
            default_text_color: template.text_color.into(),
            default_font_size: template.font_size,
            font_step: fonts.step,
            min_font_size: fonts.min,
            max_font_size: fonts.max,
        }
    }
}

impl EditorSettings {
    /// Validate and convert into the options the canvas editor runs with
    pub fn to_options(&self) -> anyhow::Result<EditorOptions> {
        if self.min_font_size == 0 || self.min_font_size > self.max_font_size {
            anyhow::bail!(
                "editor font bounds {}..={} are invalid",
                self.min_font_size,
                self.max_font_size
            );
        }

        let fonts = FontPolicy {
            step: self.font_step.max(1),
            min: self.min_font_size,
            max: self.max_font_size,
        };
        let template = BoxTemplate {
            title: self.default_title.clone(),
            bg_color: self
                .default_bg_color
                .parse::<Color>()
                .context("editor.default_bg_color")?,
            text_color: self
                .default_text_color
                .parse::<Color>()
                .context("editor.default_text_color")?,
            font_size: fonts.clamp(self.default_font_size),
        };

        Ok(EditorOptions {
            grid: GridSize::STANDARD,
            template,
            fonts,
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImportSettings {
    pub max_rows: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self { max_rows: 10_000 }
    }
}

/// Load `config/gridboard.*` (optional) overlaid with `GRIDBOARD__*` env vars
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("storage.backend", "file")?
        .set_default("storage.path", "data/views")?
        .add_source(config::File::with_name("config/gridboard").required(false))
        .add_source(
            config::Environment::with_prefix("GRIDBOARD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_apply_to_missing_sections() {
        let config = from_toml("[storage]\nbackend = \"memory\"\npath = \"/tmp/views\"\n");

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.import.max_rows, 10_000);

        let options = config.editor.to_options().unwrap();
        assert_eq!(options.template, BoxTemplate::default());
        assert_eq!(options.fonts, FontPolicy::default());
        assert_eq!(options.grid, GridSize::STANDARD);
    }

    #[test]
    fn test_editor_overrides() {
        let config = from_toml(
            r##"
[storage]
backend = "file"
path = "views"

[editor]
default_title = "KPI"
default_bg_color = "navy"
"##,
        );
        assert!(config.editor.to_options().is_err());

        let config = from_toml(
            r##"
[storage]
backend = "file"
path = "views"

[editor]
default_title = "KPI"
default_bg_color = "#123456"
default_font_size = 4
"##,
        );
        let options = config.editor.to_options().unwrap();
        assert_eq!(options.template.title, "KPI");
        assert_eq!(options.template.bg_color.as_str(), "#123456");
        assert_eq!(options.template.font_size, 8);
    }

    #[test]
    fn test_invalid_font_bounds_rejected() {
        let settings = EditorSettings {
            min_font_size: 20,
            max_font_size: 10,
            ..EditorSettings::default()
        };
        assert!(settings.to_options().is_err());
    }
}
