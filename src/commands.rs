//! Command implementations for recon-report CLI

use crate::category::Category;
use crate::cli::{Commands, OutputFormat};
use crate::data::DataProcessor;
use crate::error::{ReconError, Result};
use crate::job::ReconciliationJob;
use crate::model::Side;
use crate::output::{JsonFormatter, PrettyPrinter, SourceColumns};
use crate::positional::{compare_columns, write_positional_report, POSITIONAL_REPORT_NAME};
use crate::progress::ProgressReporter;
use crate::report::{AGGREGATE_REPORT_KEY, AGGREGATE_REPORT_NAME};
use crate::workspace::ReconWorkspace;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Report type selecting the positional comparison artifact
pub const POSITIONAL_REPORT_KEY: &str = "positional";

/// Execute a command
pub fn execute_command(command: Commands, workspace_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Init { force } => init_command(workspace_path, force),
        Commands::Upload { file1, file2 } => upload_command(workspace_path, &file1, &file2),
        Commands::Columns { format } => columns_command(workspace_path, &format),
        Commands::Process { as_of, format, quiet } => {
            process_command(workspace_path, as_of, &format, quiet)
        }
        Commands::Compare { columns1, columns2 } => {
            compare_command(workspace_path, &columns1, &columns2)
        }
        Commands::Report { report_type, output } => {
            report_command(workspace_path, &report_type, output.as_deref())
        }
    }
}

/// Initialize recon workspace
fn init_command(workspace_path: Option<&Path>, force: bool) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let root = workspace_path.unwrap_or(&current_dir);

    let workspace = if force {
        let workspace = ReconWorkspace::from_root(root.to_path_buf());
        workspace.create_dirs()?;
        workspace.create_config_with_force(true)?;
        workspace.ensure_gitignore()?;
        workspace
    } else {
        // Always create in the given directory, never in a parent workspace
        ReconWorkspace::create_new(root.to_path_buf())?
    };

    println!("✅ Initialized recon workspace at: {}", workspace.root.display());
    println!("📁 Job configuration: {}", workspace.config_path().display());

    Ok(())
}

/// Place both sources into the workspace slots
fn upload_command(workspace_path: Option<&Path>, file1: &Path, file2: &Path) -> Result<()> {
    let workspace = ReconWorkspace::find_or_create(workspace_path)?;

    let first = workspace.place_source(Side::File1, &resolve_input(&workspace, file1))?;
    let second = workspace.place_source(Side::File2, &resolve_input(&workspace, file2))?;

    println!("✅ Uploaded sources");
    println!("├─ file1: {}", first.display());
    println!("└─ file2: {}", second.display());

    Ok(())
}

/// List the columns of both current sources
fn columns_command(workspace_path: Option<&Path>, format: &str) -> Result<()> {
    let workspace = ReconWorkspace::find_or_create(workspace_path)?;
    let output_format = OutputFormat::parse(format).map_err(ReconError::invalid_input)?;
    let config = workspace.load_config()?;
    let processor = DataProcessor::new_with_config(config.header_skip_rows)?;

    let mut listing = Vec::new();
    for side in [Side::File1, Side::File2] {
        let path = workspace.require_source(side)?;
        let set = processor.load_file(&path)?;
        listing.push(SourceColumns {
            slot: ReconWorkspace::slot_name(side).to_string(),
            source: file_name(&path),
            rows: set.len(),
            columns: set.column_names().into_iter().map(String::from).collect(),
        });
    }

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_columns(&listing),
        OutputFormat::Json => println!("{}", JsonFormatter::format(&listing)?),
    }

    Ok(())
}

/// Run the reconciliation job over the current sources
fn process_command(
    workspace_path: Option<&Path>,
    as_of: Option<NaiveDate>,
    format: &str,
    quiet: bool,
) -> Result<()> {
    let workspace = ReconWorkspace::find_or_create(workspace_path)?;
    let output_format = OutputFormat::parse(format).map_err(ReconError::invalid_input)?;
    let config = workspace.load_config()?;

    let left = workspace.require_source(Side::File1)?;
    let right = workspace.require_source(Side::File2)?;
    let today = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());

    workspace.clear_reports()?;
    fs::create_dir_all(&workspace.reports_dir)?;

    let mut progress = match output_format {
        OutputFormat::Pretty if !quiet => ProgressReporter::new_for_job(),
        _ => ProgressReporter::new_minimal(),
    };

    log::info!("Processing {} against {} as of {}", left.display(), right.display(), today);
    let outcome = ReconciliationJob::new(&config, today).run_files(
        &left,
        &right,
        &workspace.reports_dir,
        &mut progress,
    )?;
    drop(progress);

    match output_format {
        OutputFormat::Pretty => {
            PrettyPrinter::print_job_outcome(&outcome, &workspace.reports_dir, quiet)
        }
        OutputFormat::Json => println!("{}", JsonFormatter::format(&outcome)?),
    }

    Ok(())
}

/// Compare two column selections of the current sources row by row
fn compare_command(workspace_path: Option<&Path>, columns1: &[String], columns2: &[String]) -> Result<()> {
    let workspace = ReconWorkspace::find_or_create(workspace_path)?;
    let config = workspace.load_config()?;
    let processor = DataProcessor::new_with_config(config.header_skip_rows)?;

    let left = processor.load_file(&workspace.require_source(Side::File1)?)?;
    let right = processor.load_file(&workspace.require_source(Side::File2)?)?;

    let previous = workspace.report_path(POSITIONAL_REPORT_NAME);
    if previous.exists() {
        fs::remove_file(&previous)?;
    }

    let columns1 = normalize_selection("--columns1", columns1)?;
    let columns2 = normalize_selection("--columns2", columns2)?;

    match compare_columns(&left, &right, &columns1, &columns2)? {
        Some(lines) => {
            let path = write_positional_report(&workspace.reports_dir, &lines)?;
            PrettyPrinter::print_positional_result(Some(&path), lines.len());
        }
        None => PrettyPrinter::print_positional_result(None, 0),
    }

    Ok(())
}

/// Resolve a report type to its artifact and copy or print it
fn report_command(workspace_path: Option<&Path>, report_type: &str, output: Option<&Path>) -> Result<()> {
    let workspace = ReconWorkspace::find_or_create(workspace_path)?;
    let path = resolve_report(&workspace, report_type)?;

    match output {
        Some(destination) => {
            if let Some(parent) = destination.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::copy(&path, destination)?;
            println!("✅ Saved {} report to: {}", report_type, destination.display());
        }
        None => println!("{}", path.display()),
    }

    Ok(())
}

/// Artifact path for `all`, a category name, or `positional`
pub fn resolve_report(workspace: &ReconWorkspace, report_type: &str) -> Result<PathBuf> {
    let file_name = match report_type {
        AGGREGATE_REPORT_KEY => AGGREGATE_REPORT_NAME.to_string(),
        POSITIONAL_REPORT_KEY => POSITIONAL_REPORT_NAME.to_string(),
        other => match Category::from_slug(other) {
            Some(category) => category.artifact_name(),
            None => {
                return Err(ReconError::invalid_input(format!(
                    "Unknown report type: {}. Use 'all', 'positional' or one of: {}",
                    other,
                    Category::ALL
                        .iter()
                        .map(|c| c.slug())
                        .collect::<Vec<_>>()
                        .join(", ")
                )))
            }
        },
    };

    let path = workspace.report_path(&file_name);
    if !path.is_file() {
        return Err(ReconError::report_not_found(report_type));
    }
    Ok(path)
}

/// Trimmed column names; a blank entry would shift the positional pairing
fn normalize_selection(flag: &str, columns: &[String]) -> Result<Vec<String>> {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let name = c.trim();
            if name.is_empty() {
                Err(ReconError::invalid_input(format!(
                    "{}: column name {} is blank",
                    flag,
                    i + 1
                )))
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}

fn resolve_input(workspace: &ReconWorkspace, input: &Path) -> PathBuf {
    if input.is_absolute() || input.exists() {
        input.to_path_buf()
    } else {
        workspace.root.join(input)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
