//! Workspace management: fixed source slots, report directory and job config

use crate::config::JobConfig;
use crate::data::DataProcessor;
use crate::error::{ReconError, Result};
use crate::model::Side;
use std::fs;
use std::path::{Path, PathBuf};

pub const WORKSPACE_DIR: &str = ".recon";

/// Manages the .recon workspace directory
#[derive(Debug, Clone)]
pub struct ReconWorkspace {
    /// Project root directory (where .recon/ lives)
    pub root: PathBuf,
    /// .recon/ directory path
    pub recon_dir: PathBuf,
    /// .recon/sources/ holding the two current source slots
    pub sources_dir: PathBuf,
    /// .recon/reports/ holding the current artifacts
    pub reports_dir: PathBuf,
}

impl ReconWorkspace {
    /// Find existing workspace or create a new one
    pub fn find_or_create(start_dir: Option<&Path>) -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        let start = start_dir.unwrap_or(&current_dir);

        if let Some(workspace) = Self::find_existing(start)? {
            return Ok(workspace);
        }

        Self::create_new(start.to_path_buf())
    }

    /// Find existing workspace by walking up the directory tree
    fn find_existing(start_dir: &Path) -> Result<Option<Self>> {
        let mut current = start_dir;

        loop {
            if current.join(WORKSPACE_DIR).is_dir() {
                return Ok(Some(Self::from_root(current.to_path_buf())));
            }

            // A git root bounds the search
            if current.join(".git").exists() {
                break;
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Ok(None)
    }

    /// Create a new workspace in the specified root directory
    pub fn create_new(root: PathBuf) -> Result<Self> {
        let workspace = Self::from_root(root);
        workspace.create_dirs()?;
        workspace.create_config_with_force(false)?;
        workspace.ensure_gitignore()?;

        log::info!("Created recon workspace at: {}", workspace.root.display());
        Ok(workspace)
    }

    /// Create workspace from root directory path
    pub fn from_root(root: PathBuf) -> Self {
        let recon_dir = root.join(WORKSPACE_DIR);
        let sources_dir = recon_dir.join("sources");
        let reports_dir = recon_dir.join("reports");

        Self {
            root,
            recon_dir,
            sources_dir,
            reports_dir,
        }
    }

    pub fn create_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.sources_dir)?;
        fs::create_dir_all(&self.reports_dir)?;
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.recon_dir.join("config.json")
    }

    /// Write the default job configuration unless one exists (or `force`)
    pub fn create_config_with_force(&self, force: bool) -> Result<()> {
        let config_path = self.config_path();
        if config_path.exists() && !force {
            return Ok(());
        }
        JobConfig::default().save(&config_path)
    }

    pub fn load_config(&self) -> Result<JobConfig> {
        JobConfig::load_or_default(&self.config_path())
    }

    /// Ensure .gitignore excludes the source slots and generated reports
    pub fn ensure_gitignore(&self) -> Result<()> {
        let gitignore_path = self.root.join(".gitignore");
        let recon_ignore = "# Uploaded sources and generated reports\n.recon/sources/\n.recon/reports/\n";

        if gitignore_path.exists() {
            let content = fs::read_to_string(&gitignore_path)?;
            if !content.contains(".recon/sources/") {
                let new_content = if content.ends_with('\n') {
                    format!("{}\n{}", content, recon_ignore)
                } else {
                    format!("{}\n\n{}", content, recon_ignore)
                };
                fs::write(gitignore_path, new_content)?;
                log::info!("Updated .gitignore with recon entries");
            }
        } else {
            fs::write(gitignore_path, recon_ignore)?;
            log::info!("Created .gitignore with recon entries");
        }

        Ok(())
    }

    /// File stem of a source slot
    pub fn slot_name(side: Side) -> &'static str {
        match side {
            Side::File1 => "file1",
            Side::File2 => "file2",
        }
    }

    /// Current file in a source slot, if any
    pub fn source_slot(&self, side: Side) -> Result<Option<PathBuf>> {
        if !self.sources_dir.exists() {
            return Ok(None);
        }

        let stem = Self::slot_name(side);
        let mut matches: Vec<PathBuf> = fs::read_dir(&self.sources_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.file_stem().and_then(|s| s.to_str()) == Some(stem))
            .collect();
        matches.sort();
        Ok(matches.into_iter().next())
    }

    /// Current file in a slot, or an error telling the user to upload first
    pub fn require_source(&self, side: Side) -> Result<PathBuf> {
        self.source_slot(side)?.ok_or_else(|| {
            ReconError::workspace(format!(
                "No source in slot {}; run `recon-report upload <file1> <file2>` first",
                Self::slot_name(side)
            ))
        })
    }

    /// Copy `source` into a slot, replacing whatever the slot held
    pub fn place_source(&self, side: Side, source: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(ReconError::load(source.display().to_string(), "file not found"));
        }
        if !DataProcessor::is_supported_format(source) {
            return Err(ReconError::invalid_input(format!(
                "Unsupported source format: {}",
                source.display()
            )));
        }

        fs::create_dir_all(&self.sources_dir)?;
        while let Some(previous) = self.source_slot(side)? {
            fs::remove_file(previous)?;
        }

        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let target = self
            .sources_dir
            .join(format!("{}.{}", Self::slot_name(side), extension));
        fs::copy(source, &target)?;

        log::info!("Placed {} into slot {}", source.display(), Self::slot_name(side));
        Ok(target)
    }

    pub fn report_path(&self, file_name: &str) -> PathBuf {
        self.reports_dir.join(file_name)
    }

    /// Generated artifacts currently in the report directory, sorted by name
    pub fn list_reports(&self) -> Result<Vec<String>> {
        let mut reports = Vec::new();
        if !self.reports_dir.exists() {
            return Ok(reports);
        }

        for entry in fs::read_dir(&self.reports_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with("report") {
                    reports.push(name.to_string());
                }
            }
        }
        reports.sort();
        Ok(reports)
    }

    /// Remove every previous `report*` artifact
    pub fn clear_reports(&self) -> Result<usize> {
        let reports = self.list_reports()?;
        for name in &reports {
            fs::remove_file(self.report_path(name))?;
        }
        if !reports.is_empty() {
            log::debug!("Removed {} previous reports", reports.len());
        }
        Ok(reports.len())
    }
}
