use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use uischema_adjudicate::LlmConfig;
use uischema_parser::ScanMode;

pub const CONFIG_FILE: &str = "uischema.toml";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ParserConfig {
    #[serde(default)]
    pub mode: ScanMode,
}

/// File names looked up inside each data point folder.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_components")]
    pub components: String,
    #[serde(default = "default_conversation")]
    pub conversation: String,
}

fn default_components() -> String {
    "components.ts".to_string()
}

fn default_conversation() -> String {
    "conversation.json".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            components: default_components(),
            conversation: default_conversation(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "~/.uischema/reports".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    /// Like [`Config::load_from`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// `report.output_dir` with `~` and env vars expanded.
    pub fn report_dir(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.report.output_dir)
            .with_context(|| format!("expand {}", self.report.output_dir))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }
}
