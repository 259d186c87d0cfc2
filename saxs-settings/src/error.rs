use thiserror::Error;

/// Errors raised while reading or validating a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error reading settings file {path}: {source}")]
    IOError { path: String, #[source] source: std::io::Error },
    #[error("malformed settings line {line_no} in {path}: {details}")]
    ParseError { path: String, line_no: usize, details: String },
    #[error("no settings file found in {folder} (looked for settings.txt, setting.txt, setup.txt, config.txt)")]
    NotFound { folder: String },
}
