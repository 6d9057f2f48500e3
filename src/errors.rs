use std::path::PathBuf;
use thiserror::Error;

/// The central error type for the politicos console.
///
/// Each layer surfaces its own enum; the CLI maps them to exit codes with
/// [`get_exit_code`].
#[derive(Error, Debug)]
pub enum PoliticosError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures of the remote data gateway.
///
/// Only success/failure matters to callers; the status is kept for logs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("{message} (status {status})")]
    Request {
        operation: Operation,
        status: u16,
        message: String,
    },

    #[error("Network error during {operation}: {message}")]
    Network { operation: Operation, message: String },

    #[error("Failed to parse {operation} response: {message}")]
    Parse { operation: Operation, message: String },
}

impl ApiError {
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::Request { operation, .. }
            | ApiError::Network { operation, .. }
            | ApiError::Parse { operation, .. } => *operation,
        }
    }

    /// Human-readable text shown in error boxes and dialogs.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Request { message, .. } => message.clone(),
            _ => self.operation().failure_message().to_string(),
        }
    }
}

/// Gateway operations, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Health,
    List,
    Get,
    Update,
    Delete,
    BulkImport,
    Statistics,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Health => "Failed to reach the API",
            Operation::List => "Failed to fetch politicians",
            Operation::Get => "Politician not found",
            Operation::Update => "Failed to update politician",
            Operation::Delete => "Failed to delete politician",
            Operation::BulkImport => "Failed to perform bulk upload",
            Operation::Statistics => "Failed to retrieve statistics",
        }
    }

    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            Operation::Update | Operation::Delete | Operation::BulkImport
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Health => "health",
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::BulkImport => "bulk import",
            Operation::Statistics => "statistics",
        };
        f.write_str(name)
    }
}

/// Client-side validation of a bulk import file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Only CSV files are supported: {path}")]
    NotCsv { path: PathBuf },

    #[error("Import file is empty: {path}")]
    Empty { path: PathBuf },

    #[error("Cannot read import file {path}: {message}")]
    Unreadable { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, PoliticosError>;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_API_ERROR: u8 = 4;

/// Determine the appropriate process exit code for an error.
pub fn get_exit_code(e: &anyhow::Error) -> u8 {
    if let Some(err) = e.downcast_ref::<PoliticosError>() {
        return match err {
            PoliticosError::Config(_) => EXIT_CONFIG_ERROR,
            PoliticosError::InvalidInput(_) | PoliticosError::Import(_) => EXIT_INVALID_INPUT,
            PoliticosError::Api(_) => EXIT_API_ERROR,
            PoliticosError::Other(_) => EXIT_ERROR,
        };
    }

    if e.downcast_ref::<ApiError>().is_some() {
        return EXIT_API_ERROR;
    }
    if e.downcast_ref::<ImportError>().is_some() {
        return EXIT_INVALID_INPUT;
    }

    // anyhow chains built with .context() still carry the source
    for cause in e.chain() {
        if cause.downcast_ref::<ApiError>().is_some() {
            return EXIT_API_ERROR;
        }
        if cause.downcast_ref::<toml::de::Error>().is_some() {
            return EXIT_CONFIG_ERROR;
        }
    }

    EXIT_ERROR
}
