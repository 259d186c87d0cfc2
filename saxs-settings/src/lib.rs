//! The `Configuration` struct and the settings-file reader/writer.
//!
//! Spec.md §9 ("Design Notes") asks for global mutable state to be expressed as
//! "an explicit `Configuration` struct threaded through constructors" instead of
//! free functions; this crate owns that struct ([`Configuration`]) plus the
//! key/value settings-file format of spec.md §6 that populates it.
//!
//! # Reading a settings file
//! ```
//! use saxs_settings::read_settings;
//! use std::io::Cursor;
//! let text = "General n_threads 4\nGrid width 1.2\n";
//! let cfg = read_settings(Cursor::new(text), "<memory>").unwrap();
//! assert_eq!(cfg.general.n_threads, 4);
//! assert_eq!(cfg.grid.width, 1.2);
//! ```

mod configuration;
mod error;
mod settings_file;
mod cache_dir;

pub use configuration::{
    AxesSettings, Configuration, FitSettings, GeneralSettings, GridSettings,
    HistogramSettings, MoleculeSettings, PassthroughSettings,
};
pub use error::SettingsError;
pub use settings_file::{find_settings_file, read_settings, read_settings_file, SETTINGS_FILE_NAMES};
pub use cache_dir::cache_dir;
