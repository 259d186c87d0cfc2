//! Data model and PDB I/O shared by the `saxs` crates.
//!
//! This crate owns the data model that sits below the grid/histogram
//! layer: [`Atom`]/[`AtomFF`]/[`Water`], [`Body`]/[`Symmetry`], [`Molecule`] and its
//! [`StateManager`], plus the PDB reader/writer and a small `calc` module of
//! geometry helpers.
//!
//! # Loading a PDB deposit
//! ```no_run
//! use saxs_pdb::Deposit;
//! let deposit = Deposit::from_file("1ubq.pdb").unwrap();
//! let strctr = deposit.structure();
//! println!("{} atoms", strctr.count_atoms());
//! ```
//!
//! # Building a [`Molecule`] for the histogram/fitting pipeline
//! ```
//! use saxs_pdb::{Deposit, Molecule, STANDARD_WATER_RESIDUE_NAMES};
//! # use std::io::BufReader;
//! # let pdb_txt = "ATOM      1  CA  ALA A   1      -13.296   0.028   3.924  1.00  0.43           C\n";
//! # let deposit = Deposit::from_pdb_reader(BufReader::new(pdb_txt.as_bytes())).unwrap();
//! let names: Vec<String> = STANDARD_WATER_RESIDUE_NAMES.iter().map(|s| s.to_string()).collect();
//! let (atoms, _waters) = deposit.structure().partition_waters(&names);
//! let molecule = Molecule::from_bodies(vec![atoms]);
//! assert_eq!(molecule.n_bodies(), 1);
//! ```
#![allow(clippy::needless_return)]

mod atom;
mod body;
mod molecule;
mod state_manager;

mod structure;
mod pdb_header;
mod pdb_title;
mod pdb_parsing_error;
mod pdb_atom;
mod assertions;

pub mod pdb_atom_filters;
pub mod calc;

mod residue_id;
mod load_pdb;
mod exp_data;
mod remarks;
mod unit_cell;
pub(crate) mod crate_utils;
mod deposit;
mod pdb_writer;

pub use atom::{Atom, AtomFF, Water, FormFactorType, form_factor_from_element};
pub use body::{Body, BodyId, Symmetry};
pub use molecule::Molecule;
pub use state_manager::{StateManager, Signaller};

pub use structure::Structure;
pub use deposit::*;
pub use load_pdb::{is_pdb_file, find_pdb_file_name};
pub use pdb_parsing_error::PDBError;
pub use pdb_atom::{PdbAtom, same_residue_atoms};
pub use residue_id::{ResidueId, residue_id_from_ter_record};
pub use pdb_header::PdbHeader;
pub use pdb_title::PdbTitle;
pub use exp_data::ExperimentalMethod;
pub use unit_cell::UnitCell;
pub use pdb_atom_filters::STANDARD_WATER_RESIDUE_NAMES;
