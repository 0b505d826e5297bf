//! The Databricks notebook source dialect: block splitting and the marker
//! rewrites that carry a script to and from the Jupyter percent format.
//!
//! A Databricks export is a plain Python script headed by the literal line
//! `# Databricks notebook source`. Cells are separated by
//! `# COMMAND ----------` lines, and non-code cell content travels on
//! `# MAGIC`-prefixed comment lines:
//!
//! ```text
//! # MAGIC %md
//! # MAGIC # A heading
//! ```

use regex::Regex;

use crate::error::ConvertError;
use crate::percent::{CODE_MARKER, MARKDOWN_MARKER};

/// First line of every Databricks notebook export.
pub const SOURCE_HEADER: &str = "# Databricks notebook source";

/// Separator line between two Databricks cells.
pub const COMMAND_SEPARATOR: &str = "# COMMAND ----------";

/// Prefix carried by non-code lines inside a Databricks cell.
const MAGIC: &str = "# MAGIC";

/// Directive line that opens a markdown cell.
const MAGIC_MD: &str = "# MAGIC %md";

/// Splits Databricks script text into its cell blocks.
///
/// Separator lines are matched with surrounding whitespace tolerated and are
/// discarded; consecutive separators yield no empty blocks.
pub fn split_blocks(source: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in source.lines() {
        if line.trim() == COMMAND_SEPARATOR {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

/// Rewrites Databricks script text into a Jupyter percent script.
///
/// Each block becomes one percent cell. A block containing `# MAGIC` is
/// emitted as a markdown cell: the `%md` directive line is dropped, every
/// `# MAGIC ` prefix becomes a plain `# ` comment prefix, a bare `# MAGIC`
/// becomes `#`, and a blank padding line is inserted after any line still
/// carrying a `%word` directive. All other blocks are emitted verbatim under
/// the code marker. Blocks with no content produce no cell.
pub fn to_percent(source: &str) -> Result<String, ConvertError> {
    if !source.contains(SOURCE_HEADER) {
        return Err(ConvertError::MissingSourceHeader);
    }

    let directive = Regex::new(r"%[A-Za-z]+").expect("static pattern");
    let mut cells: Vec<String> = Vec::new();

    for (index, block) in split_blocks(source).iter().enumerate() {
        let mut lines: Vec<&str> = block.lines().collect();
        if index == 0 && !lines.is_empty() {
            // The first line of the first block is the source header.
            lines.remove(0);
        }
        trim_blank_edges(&mut lines);
        if lines.is_empty() {
            continue;
        }

        let mut cell = String::new();
        if lines.iter().any(|line| line.contains(MAGIC)) {
            cell.push_str(MARKDOWN_MARKER);
            cell.push('\n');
            for line in lines {
                if line.trim() == MAGIC_MD {
                    continue;
                }
                let rewritten = uncomment_magic(line);
                cell.push_str(&rewritten);
                cell.push('\n');
                if directive.is_match(&rewritten) {
                    cell.push('\n');
                }
            }
        } else {
            cell.push_str(CODE_MARKER);
            cell.push('\n');
            for line in lines {
                cell.push_str(line);
                cell.push('\n');
            }
        }
        cells.push(cell);
    }

    Ok(cells.join("\n"))
}

/// Rewrites Jupyter percent script text into Databricks script text.
///
/// The output opens with the source header. Markdown markers become a
/// command separator plus the `%md` directive, code markers a bare
/// separator, and every comment line inside a markdown cell regains its
/// `# MAGIC` prefix. Bare `#` lines are dropped, runs of three newlines
/// collapse to two, and the separator that would directly follow the header
/// is removed.
pub fn from_percent(script: &str) -> String {
    let mut lines: Vec<String> = vec![SOURCE_HEADER.to_string()];
    let mut in_markdown = false;

    for line in script.lines() {
        let trimmed = line.trim_end();
        if trimmed == MARKDOWN_MARKER || trimmed == CODE_MARKER {
            lines.push(COMMAND_SEPARATOR.to_string());
            lines.push(String::new());
            in_markdown = trimmed == MARKDOWN_MARKER;
            if in_markdown {
                lines.push(MAGIC_MD.to_string());
            }
        } else if line == "#" {
            // A bare `#` is the percent form of a blank markdown line.
            continue;
        } else if in_markdown && line.starts_with('#') {
            lines.push(format!("{}{}", MAGIC, &line[1..]));
        } else {
            lines.push(line.to_string());
        }
    }

    // The header already opens the first cell; drop the separator the first
    // marker placed right after it.
    if lines.len() >= 3 && lines[1] == COMMAND_SEPARATOR && lines[2].is_empty() {
        lines.drain(1..3);
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text.replace("\n\n\n", "\n\n")
}

/// Rewrites one `# MAGIC` line into its plain-comment form. Lines without
/// the prefix pass through unchanged.
fn uncomment_magic(line: &str) -> String {
    match line.strip_prefix(MAGIC) {
        Some(rest) if rest.starts_with(' ') => format!("#{rest}"),
        Some(rest) if rest.is_empty() => "#".to_string(),
        _ => line.to_string(),
    }
}

fn trim_blank_edges(lines: &mut Vec<&str>) {
    while lines.first().is_some_and(|line| line.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_blocks_discards_separator_lines() {
        let source = "first\n# COMMAND ----------\nsecond\n# COMMAND ----------\n# COMMAND ----------\nthird\n";

        let blocks = split_blocks(source);

        assert_eq!(blocks, vec!["first", "second", "third"]);
    }

    #[test]
    fn split_blocks_tolerates_whitespace_around_separators() {
        let source = "a\n   # COMMAND ----------   \nb\n";

        assert_eq!(split_blocks(source), vec!["a", "b"]);
    }

    #[test]
    fn to_percent_tags_magic_blocks_as_markdown() {
        // --- Setup ---
        let source = "# Databricks notebook source\n\
                      # MAGIC %md\n\
                      # MAGIC # Title\n\
                      # MAGIC Some text\n\
                      \n\
                      # COMMAND ----------\n\
                      \n\
                      print(\"hi\")\n";

        // --- Action ---
        let script = to_percent(source).unwrap();

        // --- Verification ---
        assert_eq!(
            script,
            "# %% [markdown]\n# # Title\n# Some text\n\n# %%\nprint(\"hi\")\n"
        );
        assert!(!script.contains(SOURCE_HEADER));
    }

    #[test]
    fn to_percent_pads_directive_lines() {
        let source = "# Databricks notebook source\n# MAGIC %sql\n# MAGIC SELECT 1\n";

        let script = to_percent(source).unwrap();

        assert_eq!(script, "# %% [markdown]\n# %sql\n\n# SELECT 1\n");
    }

    #[test]
    fn to_percent_pads_inline_directives() {
        let source = "# Databricks notebook source\n# MAGIC %sql SELECT 1\n";

        let script = to_percent(source).unwrap();

        assert!(script.contains("# %sql SELECT 1\n\n"));
    }

    #[test]
    fn to_percent_rewrites_bare_magic_to_blank_comment() {
        let source =
            "# Databricks notebook source\n# MAGIC %md\n# MAGIC # A\n# MAGIC\n# MAGIC B\n";

        let script = to_percent(source).unwrap();

        assert_eq!(script, "# %% [markdown]\n# # A\n#\n# B\n");
    }

    #[test]
    fn to_percent_requires_the_source_header() {
        let result = to_percent("print(1)\n");

        assert!(matches!(result, Err(ConvertError::MissingSourceHeader)));
    }

    #[test]
    fn to_percent_skips_blank_blocks() {
        let source = "# Databricks notebook source\n\n# COMMAND ----------\n\nx = 1\n";

        let script = to_percent(source).unwrap();

        assert_eq!(script, "# %%\nx = 1\n");
    }

    #[test]
    fn to_percent_keeps_noncomment_magic_block_lines() {
        let source = "# Databricks notebook source\n# MAGIC %md\n# MAGIC # A\nplain text\n";

        let script = to_percent(source).unwrap();

        assert_eq!(script, "# %% [markdown]\n# # A\nplain text\n");
    }

    #[test]
    fn from_percent_restores_markdown_markers() {
        // --- Setup ---
        let script = "# %% [markdown]\n# # Title\n# Body\n\n# %%\nprint(\"hi\")\n";

        // --- Action ---
        let source = from_percent(script);

        // --- Verification ---
        assert_eq!(
            source,
            "# Databricks notebook source\n\
             # MAGIC %md\n\
             # MAGIC # Title\n\
             # MAGIC Body\n\
             \n\
             # COMMAND ----------\n\
             \n\
             print(\"hi\")\n"
        );
    }

    #[test]
    fn from_percent_drops_bare_comment_lines() {
        let script = "# %% [markdown]\n# A\n#\n# B\n";

        let source = from_percent(script);

        assert_eq!(
            source,
            "# Databricks notebook source\n# MAGIC %md\n# MAGIC A\n# MAGIC B\n"
        );
    }

    #[test]
    fn from_percent_collapses_triple_newlines() {
        let script = "# %%\nx = 1\n\n\ny = 2\n";

        let source = from_percent(script);

        assert_eq!(source, "# Databricks notebook source\nx = 1\n\ny = 2\n");
    }

    #[test]
    fn from_percent_keeps_noncomment_markdown_lines() {
        let script = "# %% [markdown]\nplain text\n";

        let source = from_percent(script);

        assert_eq!(
            source,
            "# Databricks notebook source\n# MAGIC %md\nplain text\n"
        );
    }

    #[test]
    fn round_trip_preserves_canonically_spaced_source() {
        // --- Setup ---
        let source = "# Databricks notebook source\n\
                      # MAGIC %md\n\
                      # MAGIC # Demo\n\
                      # MAGIC Some text\n\
                      \n\
                      # COMMAND ----------\n\
                      \n\
                      print(\"hello\")\n\
                      \n\
                      # COMMAND ----------\n\
                      \n\
                      x = 1\n\
                      y = 2\n";

        // --- Action ---
        let script = to_percent(source).unwrap();
        let restored = from_percent(&script);

        // --- Verification ---
        assert_eq!(restored, source);
    }
}
