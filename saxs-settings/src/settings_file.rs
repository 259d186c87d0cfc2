use std::io::BufRead;
use std::path::Path;

use saxs_io::{open_file, split_into_strings};

use crate::configuration::Configuration;
use crate::error::SettingsError;

/// File names [`find_settings_file`] looks for, in this order, inside a folder.
pub const SETTINGS_FILE_NAMES: [&str; 4] = ["settings.txt", "setting.txt", "setup.txt", "config.txt"];

/// Strips a `#`/`;`/`//` trailing comment from a settings line, respecting
/// neither quoting nor escaping (a comment marker inside a quoted token is not
/// expected to occur in practice for this file format).
fn strip_comment(line: &str) -> &str {
    let mut end = line.len();
    for marker in ["//", "#", ";"] {
        if let Some(idx) = line.find(marker) {
            end = end.min(idx);
        }
    }
    &line[..end]
}

/// Parses a settings file already opened as a `BufRead` into a [`Configuration`],
/// starting from [`Configuration::default`]. Each non-comment, non-blank line is
/// tokenised with [`split_into_strings`] (quote-aware) as `section key value...`.
pub fn read_settings<R: BufRead>(reader: R, path_for_errors: &str) -> Result<Configuration, SettingsError> {
    let mut cfg = Configuration::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| SettingsError::IOError { path: path_for_errors.to_string(), source: e })?;
        let content = strip_comment(&line);
        if content.trim().is_empty() { continue; }

        let tokens = split_into_strings(content, true);
        if tokens.len() < 2 {
            return Err(SettingsError::ParseError {
                path: path_for_errors.to_string(),
                line_no: line_no + 1,
                details: format!("expected 'section key [value...]', got '{}'", content.trim()),
            });
        }
        cfg.apply_line(&tokens[0], &tokens[1], &tokens[2..]);
    }
    Ok(cfg)
}

/// Reads a settings file from disk (transparently gzip-decompressing), applying
/// its options onto [`Configuration::default`].
pub fn read_settings_file(path: &str) -> Result<Configuration, SettingsError> {
    let reader = open_file(path).map_err(|e| SettingsError::IOError { path: path.to_string(), source: e })?;
    read_settings(reader, path)
}

/// Looks for [`SETTINGS_FILE_NAMES`] inside `folder`, in order, and returns the
/// first one found (spec.md §6 "Settings" discovery rule).
pub fn find_settings_file(folder: &str) -> Result<String, SettingsError> {
    for name in SETTINGS_FILE_NAMES {
        let candidate = Path::new(folder).join(name);
        if candidate.exists() {
            return Ok(candidate.to_string_lossy().into_owned());
        }
    }
    Err(SettingsError::NotFound { folder: folder.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_strip_comment_variants() {
        assert_eq!(strip_comment("Grid width 1.0 # a comment").trim(), "Grid width 1.0");
        assert_eq!(strip_comment("Grid width 1.0 ; trailing").trim(), "Grid width 1.0");
        assert_eq!(strip_comment("Grid width 1.0 // trailing").trim(), "Grid width 1.0");
    }

    #[test]
    fn test_read_settings_applies_sections() {
        let text = "\
            # a leading comment\n\
            General n_threads 8\n\
            Axes q_min 0.01 ; inline comment\n\
            Molecule water_residues 'HOH' 'WAT'\n\
        ";
        let cfg = read_settings(Cursor::new(text), "<memory>").unwrap();
        assert_eq!(cfg.general.n_threads, 8);
        assert_eq!(cfg.axes.q_min, 0.01);
        assert_eq!(cfg.molecule.water_residue_names, vec!["HOH", "WAT"]);
    }

    #[test]
    fn test_read_settings_rejects_single_token_line() {
        let err = read_settings(Cursor::new("General\n"), "<memory>");
        assert!(err.is_err());
    }

    #[test]
    fn test_find_settings_file_in_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("setup.txt"), "General n_threads 1\n").unwrap();
        let found = find_settings_file(dir.path().to_str().unwrap()).unwrap();
        assert!(found.ends_with("setup.txt"));
    }

    #[test]
    fn test_find_settings_file_missing_is_err() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_settings_file(dir.path().to_str().unwrap());
        assert!(err.is_err());
    }
}
