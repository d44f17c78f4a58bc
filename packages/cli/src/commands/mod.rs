pub mod grid;
pub mod init;
pub mod normalize;
pub mod validate;

pub use grid::{grid, GridArgs};
pub use init::{init, InitArgs};
pub use normalize::{normalize, NormalizeArgs};
pub use validate::{validate, ValidateArgs};

use clap::ValueEnum;
use std::path::{Path, PathBuf};
use storymap_schema::DocumentFormat;
use walkdir::WalkDir;

/// Report format shared by the commands that print results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Every `.yaml`, `.yml` or `.json` file under `dir`, sorted by path
pub(crate) fn find_story_map_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && DocumentFormat::from_path(path).is_some())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_story_map_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.yaml"), "").unwrap();
        std::fs::write(dir.path().join("nested/a.json"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();

        let files = find_story_map_files(dir.path());
        assert_eq!(
            files,
            vec![dir.path().join("b.yaml"), dir.path().join("nested/a.json")]
        );
    }
}
