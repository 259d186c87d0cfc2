use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use itertools::Itertools;

use crate::atom::{AtomFF, Water};
use crate::pdb_atom::PdbAtom;
use crate::pdb_atom_filters::{PdbAtomPredicate2, SameChain, SameResidue};
use crate::ResidueId;

/// A biomacromolecular structure composed of [`PdbAtom`] objects, as loaded from a PDB file.
///
/// A [`Structure`] holds all atoms in a `Vec<PdbAtom>` container; its implementation
/// provides methods to look at them in various ways.
///
/// # Creating a [`Structure`]
/// A [`Structure`] can be created from an [`Iterator`] over [`PdbAtom`]s:
/// ```
/// use saxs_pdb::{PdbAtom, Structure};
/// let pdb_lines = vec!["ATOM    514  N   ALA A  68      26.532  28.200  28.365  1.00 17.85           N",
///                      "ATOM    515  CA  ALA A  68      25.790  28.757  29.513  1.00 16.12           C",
///                      "ATOM    514  N   ALA A  69      26.532  28.200  28.365  1.00 17.85           N",
///                      "ATOM    515  CA  ALA A  69      25.790  28.757  29.513  1.00 16.12           C"];
/// let atoms: Vec<PdbAtom> = pdb_lines.iter().map(|l| PdbAtom::from_atom_line(l)).collect();
/// let strctr = Structure::from_iterator(atoms.iter());
/// # assert_eq!(strctr.count_atoms(), 4);
/// ```
///
/// # Accessing its atoms
/// A [`Structure`] implements two methods that provide mutable and immutable borrow
/// of the vector of its atoms: [`atoms()`](Structure::atoms) and [`atoms_mut()`](Structure::atoms_mut) respectively.
/// These can be filtered by [`PdbAtomPredicate`](crate::pdb_atom_filters::PdbAtomPredicate) predicates provided
/// by the [`pdb_atom_filters`](crate::pdb_atom_filters) module.
#[derive(Clone)]
pub struct Structure {
    pub(crate) ter_atoms: HashMap<String, ResidueId>,
    pub(crate) atoms: Vec<PdbAtom>,
}

impl Structure {
    /// Creates a new empty [`Structure`] that contains no atoms.
    pub fn new() -> Self {
        Self { ter_atoms: Default::default(), atoms: vec![] }
    }

    /// Creates a new [`Structure`] by filling it with atoms from an iterator; atoms are cloned.
    pub fn from_iterator<'a, T: Iterator + Clone>(iter: T) -> Structure
        where T: Iterator<Item = &'a PdbAtom> {
        let mut strctr = Structure::new();
        for a in iter { strctr.atoms.push(a.clone()) }
        strctr
    }

    /// Pushes a given [`PdbAtom`] at the end of this [`Structure`].
    pub fn push_atom(&mut self, a: PdbAtom) { self.atoms.push(a); }

    /// Records the `TER`-terminated residue of a chain, as parsed from a `TER` line.
    pub fn set_ter_atom(&mut self, chain_id: String, res_id: ResidueId) {
        self.ter_atoms.insert(chain_id, res_id);
    }

    pub fn count_atoms(&self) -> usize { self.atoms.len() }

    pub fn count_residues(&self) -> usize {
        let same_res = SameResidue {};
        self.atoms().windows(2).filter(|a| !same_res.check(&a[0], &a[1])).count() + 1
    }

    pub fn count_chains(&self) -> usize {
        let same_chain = SameChain {};
        self.atoms().windows(2).filter(|a| !same_chain.check(&a[0], &a[1])).count() + 1
    }

    /// Provides immutable access to an atom of a given name at a given residue.
    pub fn atom(&self, res_id: &ResidueId, name: &str) -> Option<&PdbAtom> {
        self.atoms.iter().find(|&a| res_id.check(a) && a.name == name)
    }

    pub fn atom_mut(&mut self, res_id: &ResidueId, name: &str) -> Option<&mut PdbAtom> {
        self.atoms.iter_mut().find(|a| res_id.check(a) && a.name == name)
    }

    pub fn atoms(&self) -> &Vec<PdbAtom> { &self.atoms }
    pub fn atoms_mut(&mut self) -> &mut Vec<PdbAtom> { &mut self.atoms }

    pub fn chain_ids(&self) -> Vec<String> {
        let uniq: HashSet<&String> = self.atoms.iter().map(|a| &a.chain_id).collect();
        uniq.into_iter().cloned().collect()
    }

    pub fn chain_atoms(&self, chain_id: &str) -> Vec<&PdbAtom> {
        self.atoms.iter().filter(|&a| a.chain_id == chain_id).collect()
    }

    /// Creates a vector of [`ResidueId`] for each residue found in a given vector of atoms.
    pub fn residue_ids_from_atoms<'a>(atoms: impl Iterator<Item = &'a PdbAtom>) -> Vec<ResidueId> {
        let same_res = SameResidue {};
        let mut peek_iter = atoms.peekable();
        let maybe_first = peek_iter.peek();

        if let Some(&first) = maybe_first {
            let first_idx = ResidueId::try_from(first).unwrap();
            let mut ret: Vec<ResidueId> = peek_iter.tuple_windows()
                .filter(|(a, b)| !same_res.check(a, b))
                .map(|(_, b)| ResidueId::try_from(b).unwrap()).collect();
            ret.insert(0, first_idx);
            return ret;
        }
        Vec::new()
    }

    pub fn residue_ids(&self) -> Vec<ResidueId> { Structure::residue_ids_from_atoms(self.atoms.iter()) }

    pub fn chain_residue_ids(&self, chain_id: &str) -> Vec<ResidueId> {
        Structure::residue_ids_from_atoms(self.atoms.iter().filter(|&a| a.chain_id == chain_id))
    }

    pub fn residue_atoms(&self, residue_id: &ResidueId) -> Vec<&PdbAtom> {
        self.atoms.iter().filter(|&a| residue_id.check(a)).collect()
    }

    /// Provides the [`ResidueId`] of the last residue in a given chain.
    ///
    /// Any chain may contain residues and atoms listed after its `TER` record; these
    /// are not covalently connected to the chain and are considered ligands.
    pub fn ter_residue(&self, chain_id: &str) -> ResidueId {
        if let Some(res_id) = self.ter_atoms.get(chain_id) {
            res_id.clone()
        } else {
            let last_at = self.atoms.iter().rfind(|&a| a.chain_id == chain_id).unwrap();
            ResidueId::try_from(last_at).unwrap()
        }
    }

    /// Drops every atom listed after its chain's `TER` record.
    pub fn drop_ligands(&mut self) {
        for chain_id in self.chain_ids() {
            if let Some(res_id) = self.ter_atoms.get(&chain_id) {
                if let Some(last_ter_atom) = self.atoms.iter().rfind(|&a| res_id.check(a)) {
                    let start_idx = self.atoms.iter().position(|a| a == last_ter_atom).unwrap() + 1;
                    let last_chain_atom = self.atoms.iter().rfind(|&a| a.chain_id == chain_id).unwrap();
                    let stop_idx = self.atoms.iter().position(|a| a == last_chain_atom).unwrap() + 1;
                    if start_idx < stop_idx { self.atoms.drain(start_idx..stop_idx); }
                }
            }
        }
    }

    /// Splits this structure's atoms into chemistry [`AtomFF`]s and [`Water`] molecules,
    /// based on a caller-supplied water-residue-name set, e.g.
    /// [`crate::pdb_atom_filters::STANDARD_WATER_RESIDUE_NAMES`].
    pub fn partition_waters(&self, water_residue_names: &[String]) -> (Vec<AtomFF>, Vec<Water>) {
        let mut atoms = Vec::new();
        let mut waters = Vec::new();
        for a in &self.atoms {
            if a.is_water(water_residue_names) {
                waters.push(Water::new(crate::atom::Atom::new(a.pos.x, a.pos.y, a.pos.z, a.occupancy)));
            } else {
                atoms.push(a.to_atom_ff(a.occupancy));
            }
        }
        (atoms, waters)
    }
}

impl Default for Structure {
    fn default() -> Self { Structure::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines() -> Vec<&'static str> {
        vec![
            "ATOM    515  CA  ALA A  68      25.790  28.757  29.513  1.00 16.12           C",
            "ATOM    518  CB  ALA A  68      25.155  27.554  29.987  1.00 21.91           C",
            "ATOM    515  CA  ALA A  69      25.790  28.757  29.513  1.00 16.12           C",
        ]
    }

    #[test]
    fn test_count_atoms_and_residues() {
        let atoms: Vec<PdbAtom> = sample_lines().iter().map(|l| PdbAtom::from_atom_line(l)).collect();
        let strctr = Structure::from_iterator(atoms.iter());
        assert_eq!(strctr.count_atoms(), 3);
        assert_eq!(strctr.count_residues(), 2);
        assert_eq!(strctr.count_chains(), 1);
    }

    #[test]
    fn test_partition_waters() {
        let mut strctr = Structure::new();
        strctr.push_atom(PdbAtom::from_atom_line("ATOM    515  CA  ALA A  69      25.790  28.757  29.513  1.00 16.12           C"));
        strctr.push_atom(PdbAtom::from_atom_line("HETATM  518  O   HOH A  70      25.155  27.554  29.987  1.00 21.91           O"));
        let names = vec!["HOH".to_string()];
        let (atoms, waters) = strctr.partition_waters(&names);
        assert_eq!(atoms.len(), 1);
        assert_eq!(waters.len(), 1);
    }
}
