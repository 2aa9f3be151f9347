use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use uischema_core::{ParsedComponent, ValidationReport};
use uischema_parser::InterfaceParser;
use uischema_validate::{Tier, ValidateInput, Validator};

use crate::config::Config;
use crate::datapoint::{load_data_point, LoadedDataPoint};
use crate::report::{BatchEntry, BatchReport, LoadFailure};

/// Outcome of validating one folder.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FolderOutcome {
    pub id: String,
    pub path: PathBuf,
    pub components: Vec<ParsedComponent>,
    pub report: ValidationReport,
    pub tier: Tier,
}

pub struct Runner {
    pub cfg: Config,
    parser: InterfaceParser,
    validator: Validator,
}

impl Runner {
    pub fn new(cfg: Config) -> Self {
        let parser = InterfaceParser::new(cfg.parser.mode);
        Self {
            cfg,
            parser,
            validator: Validator::default(),
        }
    }

    /// Loads `<root>/uischema.toml` (or defaults) and builds a runner.
    pub fn open(root: &Path) -> Result<Self> {
        let cfg = Config::load_or_default(&Config::config_path(root))?;
        Ok(Self::new(cfg))
    }

    pub fn init(root: &Path) -> Result<PathBuf> {
        let path = Config::config_path(root);
        if !path.exists() {
            Config::default().save_to(&path)?;
        }
        Ok(path)
    }

    pub fn load(&self, dir: &Path) -> Result<LoadedDataPoint> {
        load_data_point(dir, &self.cfg.files)
    }

    pub fn check(&self, loaded: &LoadedDataPoint) -> (Vec<ParsedComponent>, ValidationReport) {
        let components = self.parser.parse(&loaded.components_text);
        let report = self.validator.run(&ValidateInput {
            data_point: &loaded.data_point,
            components: &components,
            raw_text: &loaded.components_text,
        });
        (components, report)
    }

    pub fn validate_folder(&self, dir: &Path) -> Result<FolderOutcome> {
        let loaded = self
            .load(dir)
            .with_context(|| format!("load data point {}", dir.display()))?;
        let (components, report) = self.check(&loaded);
        let tier = self.validator.tier(&report);
        tracing::info!(
            data_point = %loaded.data_point.id,
            mode = ?self.parser.mode(),
            components = components.len(),
            passed = report.all_passed,
            tier = tier.label(),
            "validated"
        );
        Ok(FolderOutcome {
            id: loaded.data_point.id,
            path: dir.to_path_buf(),
            components,
            report,
            tier,
        })
    }

    /// Validates every immediate subfolder of `root`, in name order.
    ///
    /// A folder that cannot be loaded is recorded and skipped.
    pub fn run_batch(&self, root: &Path) -> Result<BatchReport> {
        let mut batch = BatchReport::new(root);
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.with_context(|| format!("walk {}", root.display()))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let dir = entry.path();
            match self.validate_folder(dir) {
                Ok(outcome) => batch.entries.push(BatchEntry::from(outcome)),
                Err(err) => {
                    tracing::warn!(path = %dir.display(), error = %format!("{err:#}"), "skipping data point");
                    batch.load_errors.push(LoadFailure {
                        path: dir.to_path_buf(),
                        error: format!("{err:#}"),
                    });
                }
            }
        }
        Ok(batch)
    }
}
