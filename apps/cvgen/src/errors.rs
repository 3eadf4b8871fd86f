use std::path::PathBuf;

use thiserror::Error;

/// Application-level error type.
/// `main` matches on `InputNotFound` for the controlled exit; everything else is fatal.
#[derive(Debug, Error)]
pub enum CvError {
    #[error("File '{}' not found.", .0.display())]
    InputNotFound(PathBuf),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Failures inside the flow engine or the PDF writer.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("two-column tables cannot be nested inside a table cell")]
    NestedTable,

    #[error("column width {0:.1}pt leaves no room for content")]
    ColumnTooNarrow(f32),
}
