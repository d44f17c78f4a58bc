use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

pub const EXAMPLE_MAP_NAME: &str = "example.yaml";

const EXAMPLE_MAP: &str = r#"integrated_story_map:
  story_map_structure:
    activities:
      - id: ACT-001
        name: Shop
    backbones:
      - id: BB-001
        activity_id: ACT-001
        name: Browse products
        sequence: 1
      - id: BB-002
        activity_id: ACT-001
        name: Check out
        sequence: 2
  version_definitions:
    order: [MVP, Release1]
  display_order:
    backbones: [BB-001, BB-002]
  story_mapping:
    ST-001: { backbone_id: BB-001, sequence: 1 }
    ST-002: { backbone_id: BB-002, sequence: 1 }
    ST-003: { backbone_id: BB-001, sequence: 2 }
  personas_stories:
    P001:
      name: Shopper
      role: Customer
      stories:
        - id: ST-001
          story: I want to search the catalog, So that I find what I need
          backbone_id: BB-001
          version: MVP
          priority: 1
          status: TODO
          backbone_x_version_sort: 1
        - id: ST-002
          story: I want to pay by card, So that I can finish my order
          backbone_id: BB-002
          version: MVP
          priority: 1
          status: TODO
          backbone_x_version_sort: 1
  cross_persona_stories:
    - id: ST-003
      story: I want saved filters, So that I can repeat searches
      backbone_id: BB-001
      version: Release1
      priority: 3
      status: TODO
      backbone_x_version_sort: 1
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory holding story map files
    #[arg(short, long, default_value = "examples")]
    pub src_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing story map project...".bright_blue().bold());

    let src_dir = PathBuf::from(cwd).join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let example_file = src_dir.join(EXAMPLE_MAP_NAME);
    if !example_file.exists() {
        fs::write(&example_file, EXAMPLE_MAP)?;
        println!("  {} Created {}", "✓".green(), EXAMPLE_MAP_NAME);
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/{}", args.src_dir, EXAMPLE_MAP_NAME);
    println!("  2. Run: storymap validate");
    println!("  3. Run: storymap grid {}/{}", args.src_dir, EXAMPLE_MAP_NAME);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::validate::check_file;

    #[test]
    fn test_init_writes_valid_example() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_string_lossy().to_string();

        init(
            InitArgs {
                src_dir: "maps".to_string(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.src_dir, "maps");

        let report = check_file(&dir.path().join("maps").join(EXAMPLE_MAP_NAME));
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_string_lossy().to_string();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "srcDir": "mine" }"#).unwrap();

        init(
            InitArgs {
                src_dir: "maps".to_string(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        assert_eq!(Config::load(&cwd).unwrap().src_dir, "mine");
        assert!(!dir.path().join("maps").exists());
    }
}
