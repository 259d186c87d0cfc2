use thiserror::Error;

/// Errors raised by the histogram, Debye-transform and form-factor machinery.
#[derive(Debug, Error)]
pub enum HistError {
    #[error("index {index} out of range for a histogram of {n_bins} bins")]
    OutOfRange { index: usize, n_bins: usize },
    #[error("dimension mismatch: {details}")]
    DimensionMismatch { details: String },
    #[error("invalid state: {details}")]
    BadState { details: String },
    #[error("non-finite value produced while evaluating the Debye transform at q={q}")]
    NumericError { q: f64 },
}
