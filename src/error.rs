//! Error types for the conversion pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("This script does not appear to be a Databricks notebook: the '# Databricks notebook source' header is missing.")]
    MissingSourceHeader,

    #[error("File must be a Python script (.py) or a Jupyter notebook (.ipynb): '{0}'")]
    UnsupportedExtension(String),

    #[error("Failed to parse notebook JSON: {0}")]
    NotebookJson(#[from] serde_json::Error),

    #[error("Unsupported notebook format version {0}: only nbformat 4 notebooks are supported.")]
    UnsupportedNbformat(u32),
}
