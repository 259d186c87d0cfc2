use thiserror::Error;

/// Errors raised by dataset I/O, the linear inner solve and the smart fitter.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("I/O error reading dataset {path}: {source}")]
    IOError { path: String, #[source] source: std::io::Error },
    #[error("malformed dataset line {line_no} in {path}: {details}")]
    ParseError { path: String, line_no: usize, details: String },
    #[error("dimension mismatch: {details}")]
    DimensionMismatch { details: String },
    #[error("non-finite value produced while evaluating the model: {details}")]
    NumericError { details: String },
    #[error("invalid state: {details}")]
    BadState { details: String },
}

impl From<saxs_hist::HistError> for FitError {
    fn from(e: saxs_hist::HistError) -> Self {
        match e {
            saxs_hist::HistError::BadState { details } => FitError::BadState { details },
            other => FitError::NumericError { details: other.to_string() },
        }
    }
}
