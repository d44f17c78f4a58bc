use super::OutputFormat;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use storymap_layout::{GridComposer, RenderGrid};
use storymap_schema::codec::read_document;

const EMPTY_CELL: &str = "·";
const DIVIDER: &str = "----";

#[derive(Args, Debug)]
pub struct GridArgs {
    /// Story map file to compose
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn grid(args: GridArgs, _cwd: &str, config: &Config) -> Result<()> {
    let document = read_document(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let grid = GridComposer::new(config.compose_options()).compose(&document);

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&grid)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&grid)?),
    }

    Ok(())
}

/// Plain-text rendering: a header of column ids, one line per row, and a
/// divider naming the version above each band after the first
pub fn render_text(grid: &RenderGrid) -> String {
    let widths: Vec<usize> = (0..grid.column_count())
        .map(|column| {
            (0..grid.row_count())
                .filter_map(|row| grid.cell(row, column))
                .map(|placed| placed.story.id.chars().count())
                .chain(std::iter::once(grid.columns[column].id.chars().count()))
                .max()
                .unwrap_or(1)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<&str> = grid.columns.iter().map(|b| b.id.as_str()).collect();
    push_line(&mut out, &header, &widths);

    for row in 0..grid.row_count() {
        if grid.slice_boundaries.contains(&row) {
            match grid.bands.iter().find(|band| band.start_row == row) {
                Some(band) => out.push_str(&format!("{} {}\n", DIVIDER, band.version)),
                None => out.push_str(&format!("{}\n", DIVIDER)),
            }
        }
        let cells: Vec<&str> = grid
            .row_ids(row)
            .into_iter()
            .map(|id| id.unwrap_or(EMPTY_CELL))
            .collect();
        push_line(&mut out, &cells, &widths);
    }

    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use storymap_layout::compose;
    use storymap_schema::{Activity, Backbone, Document, Story};

    #[test]
    fn test_render_text() {
        let mut doc = Document::default();
        doc.story_map_structure.activities.push(Activity::new("ACT-1", "Shop"));
        doc.story_map_structure.backbones = vec![
            Backbone::new("BB-1", "ACT-1", "Browse", 1),
            Backbone::new("BB-2", "ACT-1", "Pay", 2),
        ];
        doc.cross_persona_stories = vec![
            Story::new("ST-1", "a", "BB-1").with_version("MVP"),
            Story::new("ST-22", "b", "BB-2").with_version("MVP"),
            Story::new("ST-3", "c", "BB-1").with_version("Release1"),
        ];

        let text = render_text(&compose(&doc));

        assert_eq!(
            text,
            "BB-1  BB-2\nST-1  ST-22\n---- Release1\nST-3  ·\n"
        );
    }
}
