//! An in-memory model of the Jupyter notebook file format (nbformat 4.x).
//!
//! The model keeps only the fields the converter works with; unknown fields
//! such as cell ids or kernel metadata are ignored on input. Cell sources
//! are accepted in both shapes the format allows, a list of lines or a
//! single string.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The notebook format major version this crate reads and writes.
pub const NBFORMAT: u32 = 4;

/// The minor version written on output. 4.4 is the last revision where
/// cell ids are optional, so freshly written notebooks need none.
pub const NBFORMAT_MINOR: u32 = 4;

/// A Jupyter notebook document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub nbformat: u32,
    #[serde(default)]
    pub nbformat_minor: u32,
}

impl Notebook {
    /// Builds a notebook around the given cells with empty metadata.
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Notebook {
            cells,
            metadata: Map::new(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }

    /// Deserializes a notebook from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        let notebook: Notebook = serde_json::from_str(json)?;
        if notebook.nbformat != NBFORMAT {
            return Err(ConvertError::UnsupportedNbformat(notebook.nbformat));
        }
        Ok(notebook)
    }

    /// Serializes the notebook as pretty-printed JSON with a trailing newline.
    pub fn to_json_string(&self) -> Result<String, ConvertError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// A single notebook cell, tagged by its `cell_type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        #[serde(default)]
        metadata: Map<String, Value>,
        source: Source,
    },
    Code {
        #[serde(default)]
        execution_count: Option<i64>,
        #[serde(default)]
        metadata: Map<String, Value>,
        #[serde(default)]
        outputs: Vec<Value>,
        source: Source,
    },
    Raw {
        #[serde(default)]
        metadata: Map<String, Value>,
        source: Source,
    },
}

impl Cell {
    /// Builds a markdown cell from source text.
    pub fn markdown(text: &str) -> Self {
        Cell::Markdown {
            metadata: Map::new(),
            source: Source::from_text(text),
        }
    }

    /// Builds a never-executed code cell from source text.
    pub fn code(text: &str) -> Self {
        Cell::Code {
            execution_count: None,
            metadata: Map::new(),
            outputs: Vec::new(),
            source: Source::from_text(text),
        }
    }

    /// The cell's source as one string.
    pub fn source_text(&self) -> String {
        match self {
            Cell::Markdown { source, .. }
            | Cell::Code { source, .. }
            | Cell::Raw { source, .. } => source.to_text(),
        }
    }
}

/// Cell source, either the list-of-lines shape or a plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Lines(Vec<String>),
    Text(String),
}

impl Source {
    /// Splits text into the list-of-lines shape, keeping line terminators.
    pub fn from_text(text: &str) -> Self {
        Source::Lines(text.split_inclusive('\n').map(str::to_owned).collect())
    }

    /// Joins the source back into one string.
    pub fn to_text(&self) -> String {
        match self {
            Source::Lines(lines) => lines.concat(),
            Source::Text(text) => text.clone(),
        }
    }
}
