use crate::atom::AtomFF;
use crate::body::{Body, BodyId};
use crate::state_manager::StateManager;

/// An ordered sequence of [`Body`] objects sharing one [`StateManager`].
///
/// Grid and histogram caching (spec'd as lazily-owned by the molecule) live one
/// layer up, in `saxs-grid`/`saxs-hist`: those crates depend on `saxs-pdb`, so a
/// `Molecule`-owned cache of their types would create a dependency cycle. Callers
/// that want caching pair a `Molecule` with a `saxs_hist::HistogramManager` and key
/// invalidation off `Molecule::state()`.
pub struct Molecule {
    bodies: Vec<Body>,
    state: StateManager,
}

impl Molecule {
    /// Builds a molecule from one atom vector per body.
    pub fn from_bodies(atoms_per_body: Vec<Vec<AtomFF>>) -> Self {
        let state = StateManager::new(atoms_per_body.len());
        let bodies = atoms_per_body
            .into_iter()
            .enumerate()
            .map(|(i, atoms)| Body::new(BodyId(i as u32), atoms, state.signaller(i)))
            .collect();
        Molecule { bodies, state }
    }

    pub fn state(&self) -> &StateManager { &self.state }
    pub fn bodies(&self) -> &[Body] { &self.bodies }
    pub fn bodies_mut(&mut self) -> &mut [Body] { &mut self.bodies }
    pub fn n_bodies(&self) -> usize { self.bodies.len() }

    pub fn total_atoms(&self) -> usize { self.bodies.iter().map(|b| b.n_atoms()).sum() }
    pub fn total_waters(&self) -> usize { self.bodies.iter().map(|b| b.n_waters()).sum() }

    /// Iterates over every chemistry atom of every body, in body order.
    pub fn all_atoms(&self) -> impl Iterator<Item = &AtomFF> {
        self.bodies.iter().flat_map(|b| b.atoms().iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, FormFactorType};

    #[test]
    fn test_molecule_totals() {
        let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 6.0), FormFactorType::C);
        let mol = Molecule::from_bodies(vec![vec![a.clone(), a.clone()], vec![a.clone()]]);
        assert_eq!(mol.n_bodies(), 2);
        assert_eq!(mol.total_atoms(), 3);
        assert_eq!(mol.all_atoms().count(), 3);
    }

    #[test]
    fn test_fresh_molecule_state_is_dirty() {
        let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 6.0), FormFactorType::C);
        let mol = Molecule::from_bodies(vec![vec![a]]);
        assert!(mol.state().is_modified());
    }
}
