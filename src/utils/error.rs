use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Cannot read input file {path}: {source}")]
    InputUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column(s): {}", columns.join(", "))]
    MissingColumnsError { columns: Vec<String> },

    #[error("Duplicate column: {column}")]
    DuplicateColumnError { column: String },

    #[error("Row at line {line} has {found} fields, header has {expected}")]
    MalformedRowError {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    Output,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::InputNotFound { .. } | EtlError::InputUnreadable { .. } => {
                ErrorCategory::Input
            }
            EtlError::CsvError(_)
            | EtlError::MissingColumnsError { .. }
            | EtlError::DuplicateColumnError { .. }
            | EtlError::MalformedRowError { .. } => ErrorCategory::Data,
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    /// Process exit status for this error. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Data => 1,
            ErrorCategory::Configuration => 2,
            ErrorCategory::Output => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InputNotFound { path } => {
                format!("Cannot find the trainer export '{}'", path)
            }
            EtlError::InputUnreadable { path, source } => {
                format!("Cannot read the trainer export '{}': {}", path, source)
            }
            EtlError::MissingColumnsError { columns } => format!(
                "The CSV header is missing required column(s): {}",
                columns.join(", ")
            ),
            EtlError::DuplicateColumnError { column } => {
                format!("The CSV header contains '{}' more than once", column)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the --input path, or run from the directory holding trainers_export.csv",
            ErrorCategory::Data => "Re-export the CSV with the columns Id, Full name, Domain, Specialization and email",
            ErrorCategory::Configuration => "Check the command-line flags and the --config file",
            ErrorCategory::Output => "Check that the output location exists and is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
