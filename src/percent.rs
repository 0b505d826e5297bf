//! The Jupyter "percent" script format: parsing marker-delimited cells into
//! a notebook and rendering a notebook back to script text.

use crate::notebook::{Cell, Notebook};

/// Marker line opening a code cell.
pub const CODE_MARKER: &str = "# %%";

/// Marker line opening a markdown cell.
pub const MARKDOWN_MARKER: &str = "# %% [markdown]";

#[derive(Clone, Copy)]
enum CellKind {
    Code,
    Markdown,
}

/// Parses percent script text into a notebook.
///
/// Markers open cells; content before the first marker is treated as an
/// implicit code cell. Markdown cell lines lose their `# ` comment prefix
/// and a bare `#` becomes a blank line. Leading and trailing blank lines
/// are trimmed from every cell, and cells left with no content are dropped.
pub fn parse(script: &str) -> Notebook {
    let mut cells: Vec<Cell> = Vec::new();
    let mut kind = CellKind::Code;
    let mut pending: Vec<&str> = Vec::new();

    for line in script.lines() {
        match line.trim_end() {
            MARKDOWN_MARKER => {
                flush(&mut cells, kind, &mut pending);
                kind = CellKind::Markdown;
            }
            CODE_MARKER => {
                flush(&mut cells, kind, &mut pending);
                kind = CellKind::Code;
            }
            _ => pending.push(line),
        }
    }
    flush(&mut cells, kind, &mut pending);

    Notebook::from_cells(cells)
}

/// Renders a notebook as percent script text.
///
/// Markdown cell lines are comment-prefixed (`# `, a blank line becomes a
/// bare `#`); raw cells are rendered under the code marker. Cells with no
/// content are skipped, and cells are separated by one blank line.
pub fn render(notebook: &Notebook) -> String {
    let mut chunks: Vec<String> = Vec::new();

    for cell in &notebook.cells {
        let source = cell.source_text();
        if source.trim().is_empty() {
            continue;
        }

        let mut chunk = String::new();
        match cell {
            Cell::Markdown { .. } => {
                chunk.push_str(MARKDOWN_MARKER);
                chunk.push('\n');
                for line in source.lines() {
                    if line.is_empty() {
                        chunk.push('#');
                    } else {
                        chunk.push_str("# ");
                        chunk.push_str(line);
                    }
                    chunk.push('\n');
                }
            }
            Cell::Code { .. } | Cell::Raw { .. } => {
                chunk.push_str(CODE_MARKER);
                chunk.push('\n');
                for line in source.lines() {
                    chunk.push_str(line);
                    chunk.push('\n');
                }
            }
        }
        chunks.push(chunk);
    }

    chunks.join("\n")
}

fn flush(cells: &mut Vec<Cell>, kind: CellKind, pending: &mut Vec<&str>) {
    let mut lines: Vec<String> = match kind {
        CellKind::Markdown => pending.iter().map(|line| uncomment(line)).collect(),
        CellKind::Code => pending.iter().map(|line| line.to_string()).collect(),
    };
    pending.clear();

    while lines.first().is_some_and(|line| line.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return;
    }

    let source = lines.join("\n");
    cells.push(match kind {
        CellKind::Markdown => Cell::markdown(&source),
        CellKind::Code => Cell::code(&source),
    });
}

fn uncomment(line: &str) -> String {
    if let Some(rest) = line.strip_prefix("# ") {
        rest.to_string()
    } else if line.trim_end() == "#" {
        String::new()
    } else {
        line.to_string()
    }
}
