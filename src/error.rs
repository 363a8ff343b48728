use std::path::PathBuf;

/// Reasons a single dataset line fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected} fields, got {found}")]
    FieldCount { expected: usize, found: usize },

    /// Empty field, non-digit byte, or more than three digits.
    #[error("field {index}: '{text}' is not a 1-3 digit unsigned integer")]
    InvalidField { index: usize, text: String },

    #[error("field {index}: value {value} does not fit in a byte")]
    OutOfRange { index: usize, value: u32 },

    #[error("label {0} is not a digit class (0-9)")]
    InvalidLabel(u8),

    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Reasons a model file is rejected by `Network::read_model`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("missing header for matrix {matrix}")]
    MissingHeader { matrix: usize },

    #[error("matrix {matrix}: malformed header '{text}', expected ROWS,COLS")]
    BadHeader { matrix: usize, text: String },

    #[error("matrix {matrix}: expected shape {expected_rows}x{expected_cols}, file has {rows}x{cols}")]
    DimensionMismatch {
        matrix: usize,
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("matrix {matrix}, row {row}: expected {expected} values, got {found}")]
    RowLength {
        matrix: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("matrix {matrix}, row {row}: '{text}' is not a float")]
    BadValue { matrix: usize, row: usize, text: String },

    #[error("matrix {matrix}: file ended after {rows_read} of {rows} rows")]
    Truncated {
        matrix: usize,
        rows_read: usize,
        rows: usize,
    },

    #[error("unexpected data after the second matrix at line {line}")]
    TrailingData { line: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("model format error: {0}")]
    Format(#[from] FormatError),

    #[error("shape mismatch in {what}: expected {expected}, got {found}")]
    Shape {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
