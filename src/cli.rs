//! Command-line interface for the converter.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "nb-bridge",
    version,
    about = "Convert notebooks between the Databricks source format and Jupyter .ipynb."
)]
pub struct Cli {
    /// The notebook to convert: a Databricks `.py` script or a Jupyter `.ipynb` file.
    /// The direction of the conversion is chosen from the file extension.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the converted notebook to this path instead of deriving it
    /// from the input file name.
    #[arg(short, long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,
}
