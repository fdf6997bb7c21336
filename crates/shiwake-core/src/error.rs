//! Error types for shiwake

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Could not decode {file} as {encoding}")]
    Decode { file: String, encoding: &'static str },

    #[error("Statement header row (ご利用日, ご利用先など) not found in {file}")]
    HeaderNotFound { file: String },

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported source: {0} (expected amazon, amazon_digital, jcb or orico)")]
    UnsupportedSource(String),

    #[error("{file}: {source}")]
    File {
        file: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the name of the file being parsed
    pub fn in_file(self, file: &str) -> Self {
        match self {
            // Already carries the file name
            Self::Decode { .. } | Self::HeaderNotFound { .. } | Self::File { .. } => self,
            other => Self::File {
                file: file.to_string(),
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
