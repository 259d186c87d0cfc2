use thiserror::Error;
use crate::residue_id::ResidueId;

/// Errors raised while loading or navigating a [`crate::Deposit`].
#[derive(Debug, Error)]
pub enum PDBError {
    #[error("malformed PDB record: {details}")]
    ParseError { details: String },
    #[error("I/O error while reading a structure file: {0}")]
    Io(#[from] std::io::Error),
    #[error("'{file_name}' is not a recognised PDB file")]
    InvalidFileFormat { file_name: String },
    #[error("no residue {res_id} found in this structure")]
    NoSuchResidue { res_id: ResidueId },
    #[error("residue type '{res_type}' is not recognised")]
    UnknownResidueType { res_type: String },
    #[error("could not parse a residue identifier from '{residue_id}'")]
    ResidueIdParsingError { residue_id: String },
}
