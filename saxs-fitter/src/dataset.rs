use std::io::BufRead;

use saxs_io::open_file;

use crate::error::FitError;

/// A measured SAXS curve: `q`, `I(q)`, `sigma_I`, and an optional `sigma_q`
/// (spec.md §6 "Measured SAXS data": three- or four-column plain text).
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub q: Vec<f64>,
    pub intensity: Vec<f64>,
    pub sigma: Vec<f64>,
    pub sigma_q: Option<Vec<f64>>,
}

impl Dataset {
    pub fn len(&self) -> usize { self.q.len() }
    pub fn is_empty(&self) -> bool { self.q.is_empty() }

    /// Converts an nm^-1 q-axis to the crate-internal Å^-1 convention in place.
    fn convert_nm_to_angstrom(&mut self) {
        for q in self.q.iter_mut() { *q /= 10.0; }
        if let Some(sq) = self.sigma_q.as_mut() {
            for s in sq.iter_mut() { *s /= 10.0; }
        }
    }
}

/// Parses whitespace-separated `(q, I, sigma_I[, sigma_q])` rows from an already
/// opened reader. Blank lines and `#`-prefixed comment lines are skipped.
pub fn read_dataset_reader<R: BufRead>(reader: R, q_unit_is_nm: bool, path_for_errors: &str) -> Result<Dataset, FitError> {
    let mut q = Vec::new();
    let mut intensity = Vec::new();
    let mut sigma = Vec::new();
    let mut sigma_q: Option<Vec<f64>> = None;
    let mut n_columns: Option<usize> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| FitError::IOError { path: path_for_errors.to_string(), source: e })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') { continue; }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.len() != 3 && tokens.len() != 4 {
            return Err(FitError::ParseError {
                path: path_for_errors.to_string(),
                line_no: line_no + 1,
                details: format!("expected 3 or 4 columns, got {}", tokens.len()),
            });
        }
        match n_columns {
            None => n_columns = Some(tokens.len()),
            Some(n) if n != tokens.len() => {
                return Err(FitError::ParseError {
                    path: path_for_errors.to_string(),
                    line_no: line_no + 1,
                    details: "column count changed partway through the file".to_string(),
                });
            }
            _ => {}
        }

        let parse = |tok: &str| -> Result<f64, FitError> {
            tok.parse::<f64>().map_err(|_| FitError::ParseError {
                path: path_for_errors.to_string(),
                line_no: line_no + 1,
                details: format!("'{}' is not a number", tok),
            })
        };

        q.push(parse(tokens[0])?);
        intensity.push(parse(tokens[1])?);
        sigma.push(parse(tokens[2])?);
        if tokens.len() == 4 {
            sigma_q.get_or_insert_with(Vec::new).push(parse(tokens[3])?);
        }
    }

    let mut dataset = Dataset { q, intensity, sigma, sigma_q };
    if q_unit_is_nm { dataset.convert_nm_to_angstrom(); }
    Ok(dataset)
}

/// Reads a dataset file from disk, transparently gzip-decompressing.
pub fn read_dataset(path: &str, q_unit_is_nm: bool) -> Result<Dataset, FitError> {
    let reader = open_file(path).map_err(|e| FitError::IOError { path: path.to_string(), source: e })?;
    read_dataset_reader(reader, q_unit_is_nm, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_three_column_dataset() {
        let text = "0.01 100.0 1.0\n0.02 95.0 1.1\n# a comment\n0.03 90.0 1.2\n";
        let ds = read_dataset_reader(Cursor::new(text), false, "<memory>").unwrap();
        assert_eq!(ds.len(), 3);
        assert!(ds.sigma_q.is_none());
    }

    #[test]
    fn test_read_four_column_dataset() {
        let text = "0.01 100.0 1.0 0.001\n0.02 95.0 1.1 0.001\n";
        let ds = read_dataset_reader(Cursor::new(text), false, "<memory>").unwrap();
        assert_eq!(ds.sigma_q.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_nm_unit_is_converted_to_angstrom() {
        let text = "0.1 100.0 1.0\n";
        let ds = read_dataset_reader(Cursor::new(text), true, "<memory>").unwrap();
        assert!((ds.q[0] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let text = "0.1 100.0\n";
        let err = read_dataset_reader(Cursor::new(text), false, "<memory>");
        assert!(err.is_err());
    }

    #[test]
    fn test_non_numeric_token_is_an_error() {
        let text = "0.1 banana 1.0\n";
        let err = read_dataset_reader(Cursor::new(text), false, "<memory>");
        assert!(err.is_err());
    }
}
