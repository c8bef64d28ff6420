use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid JSON record at {path}:{line}: {source}")]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
    #[error("{path}: column '{column}' row '{row}' is not a number: '{value}'")]
    InvalidNumber {
        path: PathBuf,
        column: String,
        row: String,
        value: String,
    },
    #[error("{path}: header '{header}' is not a numeric size")]
    NonNumericHeader { path: PathBuf, header: String },
    #[error("{0}: table has no data rows")]
    EmptyTable(PathBuf),
    #[error("{path}: existing header [{found}] does not match [{expected}]")]
    HeaderMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error("input and output are the same file: {0}")]
    SameFile(PathBuf),
    #[error("unknown figure: {0}")]
    UnknownFigure(String),
    #[error("wrong query number: {0}")]
    UnknownQuery(u8),
    #[error("invalid JSON pointer '{0}' (must be empty or start with '/')")]
    InvalidPointer(String),
    #[error("failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
    #[error("{parser} failed to parse input: {message}")]
    Parse {
        parser: &'static str,
        message: String,
    },
    #[error("iterations must be at least 1")]
    NoIterations,
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("scan queries need a top-level array or JSON Lines input")]
    ExpectedArray,
}

/// Failure while copying one stream into another, tagged with the side that failed.
#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),
}

impl StreamError {
    /// Attributes the failure to `input` or `output`.
    pub fn at(self, input: &Path, output: &Path) -> HarnessError {
        match self {
            StreamError::Read(e) => HarnessError::io(input, e),
            StreamError::Write(e) => HarnessError::io(output, e),
        }
    }
}

impl HarnessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
