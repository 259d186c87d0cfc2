//! Utility functions to facilitate I/O operations for the `saxs` crates.
//!
//! A few code fragments that would otherwise be duplicated across `saxs-pdb`, `saxs-fitter`
//! and `saxs-settings` were factored into this crate. It currently provides:
//!
//! # Opening an input stream, which might be gzip'ed
//!
//! The [open_file()] function opens a file of a given name. If that file name
//! has ``.gz`` suffix, the returned ``BufRead`` is automatically uncompressed:
//!
//! ```
//! use saxs_io::open_file;
//! # use std::io;
//! # fn main() -> Result<(), io::Error> {
//! let reader = open_file("tests/test_files/f64.csv")?;
//! let reader_gzipped = open_file("tests/test_files/f64.csv.gz")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Unified opening an output stream.
//!
//! [out_writer()] opens a file for writing. If the given file name is ``"stdout"`` or ``"stderr"``, writes to the appropriate
//! stream rather than to a file:
//!
//! ```
//! use std::fs;
//! use saxs_io::out_writer;
//! // This will print on stdout
//! let mut to_stream = out_writer("", true);
//! // This will also print on stdout
//! to_stream = out_writer("stdout", true);
//! // "stdout" file should not exist
//! assert!(fs::metadata("stdout").is_err());
//! // now let's open a regular file for writing
//! let mut to_file = out_writer("file.out", false);
//! assert!(fs::metadata("file.out").is_ok());
//! # fs::remove_file("file.out").expect("Can't remove a test file: file.out");
//! ```
//!
//! # Reading ``.csv`` and ``.tsv`` files
//!
//! A measured SAXS curve is often distributed as plain whitespace- or comma-separated text;
//! [read_tsv()] and [read_csv()] parse such files into a statically-typed `Vec<Vec<T>>`:
//!
//! ```
//! # use std::io;
//! # fn main() -> Result<(), io::Error> {
//! use saxs_io::{open_file, read_csv};
//! let reader = open_file("tests/test_files/f64.csv")?;
//! let data_f64: Vec<Vec<f64>> = read_csv(reader)?;
//! # assert_eq!(data_f64.len(), 2);
//! # assert_eq!(data_f64[1].len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Splitting a string into tokens by whitespace
//!
//! Settings files allow quoted tokens that may contain whitespace themselves, e.g.
//! ``"first second 'third token'"``. [split_into_strings()] tokenises such lines
//! correctly, taking single and double quotes into account:
//! ```
//! use saxs_io::split_into_strings;
//! let tokens = split_into_strings("water_residues 'HOH' 'WAT' 'DOD'", false);
//! assert_eq!(tokens.len(), 4);
//! assert_eq!(tokens[1], "'HOH'".to_string());
//! ```
//!
#![allow(clippy::needless_return)]
mod utils;
mod split_into_strings;
pub use utils::*;
pub use split_into_strings::split_into_strings;
