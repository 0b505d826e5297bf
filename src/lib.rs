//! Core library for nb-bridge, converting notebooks between the Databricks
//! source format and the Jupyter `.ipynb` format.
//!
//! Conversion pivots through the percent script representation: a Databricks
//! `.py` export is rewritten into percent markers, then parsed into notebook
//! cells; the reverse direction renders cells as a percent script and rewrites
//! the markers back into `# COMMAND ----------` separators and `# MAGIC`
//! prefixes.
//!
//! ```
//! use nb_bridge::databricks_to_notebook;
//!
//! let source = "# Databricks notebook source\nprint(\"hi\")\n";
//! let notebook = databricks_to_notebook(source)?;
//! assert_eq!(notebook.cells.len(), 1);
//! # Ok::<(), nb_bridge::error::ConvertError>(())
//! ```

pub mod cli;
pub mod databricks;
pub mod error;
pub mod notebook;
pub mod percent;

use crate::cli::Cli;
use crate::error::ConvertError;
use crate::notebook::Notebook;
use anyhow::Context;
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

enum Direction {
    ToJupyter,
    ToDatabricks,
}

fn detect_direction(path: &Path) -> Result<Direction, ConvertError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("py") => Ok(Direction::ToJupyter),
        Some("ipynb") => Ok(Direction::ToDatabricks),
        _ => Err(ConvertError::UnsupportedExtension(
            path.display().to_string(),
        )),
    }
}

/// Converts Databricks notebook source into a Jupyter notebook.
pub fn databricks_to_notebook(source: &str) -> Result<Notebook, ConvertError> {
    Ok(percent::parse(&databricks::to_percent(source)?))
}

/// Renders a Jupyter notebook as Databricks notebook source.
pub fn notebook_to_databricks(notebook: &Notebook) -> String {
    databricks::from_percent(&percent::render(notebook))
}

/// The main entry point for the application logic.
pub fn run() -> anyhow::Result<()> {
    // Initialize the logger. This will be configured by the RUST_LOG environment variable.
    env_logger::init();

    // 1. Parse CLI args
    let Cli { file, output } = Cli::parse();

    // 2. Read the input file; read failures report before the extension check
    let input_content = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read input file: {}", file.display()))?;

    // 3. Pick the conversion direction from the extension
    let direction = detect_direction(&file)?;

    // 4. Convert and write the counterpart format next to the input
    match direction {
        Direction::ToJupyter => {
            log::info!(
                "Converting Databricks notebook {} to a Jupyter notebook",
                file.display()
            );
            let notebook = databricks_to_notebook(&input_content)?;
            log::debug!("Parsed {} cells", notebook.cells.len());

            let output_path = output.unwrap_or_else(|| file.with_extension("ipynb"));
            write_output(&output_path, &notebook.to_json_string()?)?;
        }
        Direction::ToDatabricks => {
            log::info!(
                "Converting Jupyter notebook {} to a Databricks notebook",
                file.display()
            );
            let notebook = Notebook::from_json_str(&input_content)?;
            log::debug!("Parsed {} cells", notebook.cells.len());

            let output_path = output.unwrap_or_else(|| file.with_extension("py"));
            write_output(&output_path, &notebook_to_databricks(&notebook))?;
        }
    }

    Ok(())
}

fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    // 1. Create a named temporary file in the same directory as the destination.
    // This is crucial for ensuring an atomic rename operation later.
    // An empty parent means the path is relative to the current directory.
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut temp_file = tempfile::Builder::new()
        .prefix(".nb-bridge-")
        .suffix(".tmp")
        .tempfile_in(&parent_dir)
        .with_context(|| {
            format!(
                "Failed to create temporary file in {}",
                parent_dir.display()
            )
        })?;

    // 2. Write the converted content to the temporary file.
    temp_file
        .write_all(content.as_bytes())
        .with_context(|| "Failed to write to temporary file")?;

    // 3. Atomically move the temporary file to the destination.
    // `persist` handles the atomic rename/move operation.
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(())
}
