use super::{find_story_map_files, OutputFormat};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use storymap_schema::codec::read_value;
use storymap_validator::{validate_or_report, Violation};
use tracing::debug;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Story map files or directories (defaults to the configured srcDir)
    pub paths: Vec<PathBuf>,

    /// List files without violations too
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Result of checking one file
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: PathBuf,

    /// Set when the file could not be read or parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub violations: Vec<Violation>,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.violations.is_empty()
    }
}

pub fn validate(args: ValidateArgs, cwd: &str, config: &Config) -> Result<()> {
    let inputs = if args.paths.is_empty() {
        vec![config.get_src_dir(cwd)]
    } else {
        args.paths.clone()
    };

    let mut files = Vec::new();
    for input in &inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            files.extend(find_story_map_files(input));
        } else {
            return Err(anyhow::anyhow!("Input path does not exist: {}", input.display()));
        }
    }

    let text = args.format == OutputFormat::Text;
    if text {
        println!("🔍 {} story map validation", "Starting".green().bold());
        println!("   Found {} story map files", files.len());
        println!();
    }

    let reports: Vec<FileReport> = files.iter().map(|file| check_file(file)).collect();

    if text {
        for report in &reports {
            print_report(report, args.verbose);
        }
        print_summary(&reports);
    } else {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    // Exit with error code if any file failed
    if reports.iter().any(|r| !r.is_clean()) {
        std::process::exit(1);
    }

    Ok(())
}

pub fn check_file(file: &Path) -> FileReport {
    debug!(file = %file.display(), "Validating");
    match read_value(file) {
        Ok(value) => FileReport {
            file: file.to_path_buf(),
            error: None,
            violations: validate_or_report(&value),
        },
        Err(err) => FileReport {
            file: file.to_path_buf(),
            error: Some(err.to_string()),
            violations: Vec::new(),
        },
    }
}

fn print_report(report: &FileReport, verbose: bool) {
    if let Some(error) = &report.error {
        eprintln!("{} Failed to parse {}: {}", "✗".red(), report.file.display(), error);
        return;
    }
    if report.violations.is_empty() {
        if verbose {
            println!("{} {}", "✓".green(), report.file.display());
        }
        return;
    }

    println!("{}", report.file.display());
    for violation in &report.violations {
        println!(
            "  {} [{}] {}: {}",
            violation.kind.as_str().red().bold(),
            violation.check,
            violation.path.dimmed(),
            violation.message
        );
    }
    println!();
}

fn print_summary(reports: &[FileReport]) {
    let failed = reports.iter().filter(|r| !r.is_clean()).count();
    let violations: usize = reports.iter().map(|r| r.violations.len()).sum();

    println!(
        "✨ {} Validation complete!",
        if failed > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Files checked: {}", reports.len());
    if failed > 0 {
        println!("   {} {}", "Files with problems:".red(), failed);
        println!("   {} {}", "Violations:".red(), violations);
    } else {
        println!("   {} No issues found!", "✓".green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_file_reports_violations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "integrated_story_map:\n  personas_stories: {}\n").unwrap();

        let report = check_file(&path);
        assert!(report.error.is_none());
        assert_eq!(report.violations.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_check_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let report = check_file(&path);
        assert!(report.error.is_some());
        assert!(report.violations.is_empty());
    }
}
