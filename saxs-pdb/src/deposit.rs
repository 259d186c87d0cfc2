use crate::{ExperimentalMethod, is_pdb_file, PDBError, Structure, UnitCell};

/// Holds all the data describing a macromolecular deposit, parsed from a PDB-formatted file.
pub struct Deposit {
    /// classifies the molecule(s)
    ///
    /// This field should contain one of classifications from a curated list available at the [wwPDB website](http://www.wwpdb.org/)
    pub classification: Option<String>,
    /// deposition date
    pub dep_date: Option<String>,
    /// placeholder for keywords, which may be empty
    pub keywords: Vec<String>,
    /// four-character PDB code of this deposit, such as `2GB1` or `4HHB`
    pub id_code: String,
    /// title for a PDB entry
    ///
    /// This value is extracted from a `TITLE` record of a PDB-formatted file.
    ///
    /// See  the [official documentation of the `TITLE` entry](https://www.wwpdb.org/documentation/file-format-content/format33/sect2.html#TITLE) for details
    pub title: Option<String>,
    /// describes how this structure was determined experimentally
    pub methods: Vec<ExperimentalMethod>,
    /// experimental resolution, when available
    pub resolution: Option<f64>,
    /// R-factor value, when available
    pub r_factor: Option<f64>,
    /// R-free value, when available
    pub r_free: Option<f64>,
    /// unit cell parameters, when available
    pub unit_cell: Option<UnitCell>,
    pub(crate) structure: Structure,
}

impl Deposit {

    /// Creates a new, empty deposit for a given ``id_code``
    pub fn new(id_code: &str) -> Self {
        Deposit{
            classification: None,
            dep_date: None,
            keywords: vec![],
            id_code: id_code.to_string(),
            title: None,
            methods: vec![],
            resolution: None,
            r_factor: None,
            r_free: None,
            unit_cell: None,
            structure: Structure::new(),
        }
    }

    /// Parses a PDB-formatted file into a [`Deposit`](Deposit) struct.
    pub fn from_file(file_name: &str) -> Result<Deposit, PDBError> {
        if is_pdb_file(file_name)? { return Deposit::from_pdb_file(file_name); }
        return Err(PDBError::InvalidFileFormat { file_name: file_name.to_string() });
    }

    /// returns a clone of the [`Structure`] held by this deposit
    pub fn structure(&self) -> Structure { self.structure.clone() }
}
