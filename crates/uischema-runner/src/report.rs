use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use uischema_validate::Tier;

use crate::runner::FolderOutcome;

/// One validated folder, as it appears in a batch report.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchEntry {
    pub id: String,
    pub path: PathBuf,
    pub tier: Tier,
    pub all_passed: bool,
    pub components: usize,
    pub safe_mismatches: usize,
    pub unsafe_mismatches: usize,
    /// `check: message` for each failed check.
    pub failures: Vec<String>,
}

impl From<FolderOutcome> for BatchEntry {
    fn from(o: FolderOutcome) -> Self {
        let totals = o.report.mismatch_totals();
        Self {
            id: o.id,
            path: o.path,
            tier: o.tier,
            all_passed: o.report.all_passed,
            components: o.components.len(),
            safe_mismatches: totals.total_safe_mismatches,
            unsafe_mismatches: totals.total_unsafe_mismatches,
            failures: o
                .report
                .failures()
                .map(|r| format!("{}: {}", r.check_name, r.message))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchReport {
    pub root: PathBuf,
    pub entries: Vec<BatchEntry>,
    pub load_errors: Vec<LoadFailure>,
}

impl BatchReport {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            entries: Vec::new(),
            load_errors: Vec::new(),
        }
    }

    pub fn tier_counts(&self) -> BTreeMap<Tier, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.entries {
            *counts.entry(e.tier).or_insert(0) += 1;
        }
        counts
    }

    pub fn in_tier(&self, tier: Tier) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(move |e| e.tier == tier)
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Validation report\n");
        let _ = writeln!(out, "Root: `{}`\n", self.root.display());
        let _ = writeln!(out, "| Tier | Count |\n|---|---|");
        for tier in [Tier::High, Tier::Medium, Tier::Low, Tier::Rejected] {
            let n = self.in_tier(tier).count();
            let _ = writeln!(out, "| {} | {} |", tier.label(), n);
        }
        let _ = writeln!(out, "| load error | {} |", self.load_errors.len());

        for tier in [Tier::High, Tier::Medium, Tier::Low, Tier::Rejected] {
            let entries: Vec<&BatchEntry> = self.in_tier(tier).collect();
            if entries.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n## {} ({})\n", tier.label(), entries.len());
            for e in entries {
                let _ = writeln!(
                    out,
                    "- `{}`: {} component(s), {} safe / {} unsafe mismatch(es)",
                    e.id, e.components, e.safe_mismatches, e.unsafe_mismatches
                );
                for f in &e.failures {
                    let _ = writeln!(out, "  - {f}");
                }
            }
        }

        if !self.load_errors.is_empty() {
            let _ = writeln!(out, "\n## Load errors\n");
            for f in &self.load_errors {
                let _ = writeln!(out, "- `{}`: {}", f.path.display(), f.error);
            }
        }
        out
    }

    /// Writes `report.json` and `report.md` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        let json_path = dir.join("report.json");
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(&json_path, bytes).with_context(|| format!("write {}", json_path.display()))?;
        let md_path = dir.join("report.md");
        std::fs::write(&md_path, self.to_markdown())
            .with_context(|| format!("write {}", md_path.display()))?;
        Ok((json_path, md_path))
    }
}
