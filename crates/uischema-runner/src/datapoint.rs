use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uischema_core::{ConversationDocument, DataPoint, LoadError};

use crate::config::FilesConfig;

/// A data point folder read from disk.
#[derive(Clone, Debug)]
pub struct LoadedDataPoint {
    pub data_point: DataPoint,
    pub components_path: PathBuf,
    pub components_text: String,
}

/// Reads the components text and conversation document from `dir`.
///
/// The folder name becomes the data point id. When the configured components
/// file is absent, the first `.ts`/`.tsx` file in the folder (by name) is used.
pub fn load_data_point(dir: &Path, files: &FilesConfig) -> Result<LoadedDataPoint> {
    let id = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    let components_path = resolve_components(dir, &files.components)?;
    let components_text = std::fs::read_to_string(&components_path)
        .with_context(|| format!("read {}", components_path.display()))?;

    let document = ConversationDocument::load_from(&dir.join(&files.conversation))?;

    Ok(LoadedDataPoint {
        data_point: DataPoint { id, document },
        components_path,
        components_text,
    })
}

fn resolve_components(dir: &Path, configured: &str) -> Result<PathBuf> {
    let preferred = dir.join(configured);
    if preferred.is_file() {
        return Ok(preferred);
    }
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_typescript(p))
        .collect();
    candidates.sort();
    match candidates.into_iter().next() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using fallback components file");
            Ok(path)
        }
        None => Err(LoadError::MissingComponents(dir.to_path_buf()).into()),
    }
}

fn is_typescript(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts") | Some("tsx")
    )
}
