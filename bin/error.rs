use thiserror::Error;

/// Top-level CLI error, composing every crate's own error enum via `#[from]`
/// (spec.md §9/SPEC_FULL.md "Ambient stack": "composing into a top-level
/// `SaxsError` at the CLI boundary"). `main` prints this error's `Display` and
/// exits non-zero, per spec.md §7's "all other errors bubble to the CLI, which
/// prints a single-line class summary and a detailed message".
#[derive(Debug, Error)]
pub enum SaxsError {
    #[error("PDB error: {0}")]
    Pdb(#[from] saxs_pdb::PDBError),
    #[error("histogram error: {0}")]
    Hist(#[from] saxs_hist::HistError),
    #[error("fit error: {0}")]
    Fit(#[from] saxs_fitter::FitError),
    #[error("settings error: {0}")]
    Settings(#[from] saxs_settings::SettingsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
