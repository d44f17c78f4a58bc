use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use storymap_editor::normalize_sort_keys;
use storymap_schema::codec::decode_value;
use storymap_schema::DocumentFormat;
use tracing::info;

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Story map file to normalize
    pub file: PathBuf,

    /// Rewrite the file itself, keeping a .bak copy
    #[arg(short, long)]
    pub in_place: bool,
}

pub fn normalize(args: NormalizeArgs, _cwd: &str, config: &Config) -> Result<()> {
    let format = DocumentFormat::from_path(&args.file)
        .ok_or_else(|| anyhow::anyhow!("Unsupported file type: {}", args.file.display()))?;
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let document = decode_value(format.parse_value(&source)?)?;

    let normalized = normalize_sort_keys(&document, &config.default_version);
    let output = format.serializer().serialize(&normalized)?;

    let target = if args.in_place {
        let backup = backup_path(&args.file);
        fs::copy(&args.file, &backup)?;
        println!("  {} Backed up to {}", "✓".green(), backup.display());
        args.file.clone()
    } else {
        sorted_path(&args.file)
    };

    fs::write(&target, output)?;
    info!(target = %target.display(), "Wrote normalized story map");
    println!("  {} Wrote {}", "✓".green(), target.display());

    Ok(())
}

/// `map.yaml` → `map.sorted.yaml`
pub fn sorted_path(file: &Path) -> PathBuf {
    let stem = file.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    match file.extension() {
        Some(ext) => file.with_file_name(format!("{}.sorted.{}", stem, ext.to_string_lossy())),
        None => file.with_file_name(format!("{}.sorted", stem)),
    }
}

/// `map.yaml` → `map.yaml.bak`
pub fn backup_path(file: &Path) -> PathBuf {
    let mut name = file.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    file.with_file_name(name)
}
