use std::fmt;
use crate::atom::{AtomFF, Water};
use crate::state_manager::Signaller;

/// A stable, index-free identifier for a [`Body`] within a [`crate::Molecule`].
///
/// Newtype over `u32`, in the same spirit as [`crate::ResidueId`]: wrapping the
/// integer keeps a body index from being silently passed where an atom index
/// (or vice versa) was expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "body#{}", self.0) }
}

/// A rigid transformation relating a [`Body`] to one of its symmetry-generated copies.
///
/// The generated transform takes the body's centre of mass as the pivot for the
/// internal rotation, then applies the external rotation, then the translation.
#[derive(Clone, Debug, PartialEq)]
pub struct Symmetry {
    pub translation: Option<(f64, f64, f64)>,
    /// axis (unit vector) and angle in radians
    pub external_rotation: Option<([f64; 3], f64)>,
    /// Euler angles (radians), applied about the body's own centre of mass
    pub internal_rotation: Option<(f64, f64, f64)>,
    pub repeats: u32,
}

impl Symmetry {
    pub fn identity() -> Self {
        Symmetry { translation: None, external_rotation: None, internal_rotation: None, repeats: 1 }
    }
}

/// A contiguous collection of chemistry atoms and (optionally) hydration waters.
///
/// Invariant: a body's atoms never mutate without its [`Signaller`] emitting the
/// corresponding internal or external change — every `&mut` accessor below routes
/// through one of [`Signaller::internal_change`], [`Signaller::external_change`] or
/// [`Signaller::modified_hydration`].
pub struct Body {
    id: BodyId,
    atoms: Vec<AtomFF>,
    waters: Vec<Water>,
    symmetries: Vec<Symmetry>,
    signaller: Signaller,
}

impl Body {
    pub(crate) fn new(id: BodyId, atoms: Vec<AtomFF>, signaller: Signaller) -> Self {
        Body { id, atoms, waters: Vec::new(), symmetries: Vec::new(), signaller }
    }

    pub fn id(&self) -> BodyId { self.id }
    pub fn atoms(&self) -> &[AtomFF] { &self.atoms }
    pub fn waters(&self) -> &[Water] { &self.waters }
    pub fn symmetries(&self) -> &[Symmetry] { &self.symmetries }
    pub fn n_atoms(&self) -> usize { self.atoms.len() }
    pub fn n_waters(&self) -> usize { self.waters.len() }

    /// Replaces this body's hydration shell, signalling `modified_hydration`.
    pub fn set_waters(&mut self, waters: Vec<Water>) {
        self.waters = waters;
        self.signaller.modified_hydration();
    }

    /// Mutable access to this body's chemistry atoms, e.g. for a rigid-body move.
    ///
    /// The closure receives the atom vector; any coordinate change is assumed to be
    /// an internal change (the body moved as a whole, its own centre of mass pivot
    /// still applies) — call [`Body::mark_externally_modified`] instead when a
    /// *different* body's move should invalidate this one's cross terms.
    pub fn atoms_mut<F: FnOnce(&mut Vec<AtomFF>)>(&mut self, f: F) {
        f(&mut self.atoms);
        self.signaller.internal_change();
    }

    pub fn push_symmetry(&mut self, sym: Symmetry) {
        let j = self.symmetries.len();
        self.symmetries.push(sym);
        self.signaller.modified_symmetry(j);
    }

    pub fn mark_externally_modified(&self) { self.signaller.external_change(); }

    /// Centre of mass of this body's chemistry atoms (weight-less average), used as
    /// the pivot for internal-rotation symmetries.
    pub fn centre_of_mass(&self) -> (f64, f64, f64) {
        if self.atoms.is_empty() { return (0.0, 0.0, 0.0); }
        let n = self.atoms.len() as f64;
        let (mut sx, mut sy, mut sz) = (0.0, 0.0, 0.0);
        for a in &self.atoms {
            sx += a.atom.x;
            sy += a.atom.y;
            sz += a.atom.z;
        }
        (sx / n, sy / n, sz / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, FormFactorType};
    use crate::state_manager::StateManager;

    fn sample_body() -> Body {
        let mgr = StateManager::new(1);
        let atoms = vec![
            AtomFF::new(Atom::new(0.0, 0.0, 0.0, 6.0), FormFactorType::C),
            AtomFF::new(Atom::new(2.0, 0.0, 0.0, 6.0), FormFactorType::C),
        ];
        Body::new(BodyId(0), atoms, mgr.signaller(0))
    }

    #[test]
    fn test_centre_of_mass() {
        let body = sample_body();
        assert_eq!(body.centre_of_mass(), (1.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_waters_signals_hydration() {
        let mgr = StateManager::new(1);
        let mut body = Body::new(BodyId(0), vec![], mgr.signaller(0));
        mgr.reset_to_false();
        body.set_waters(vec![Water::new(Atom::new(0.0, 0.0, 0.0, 10.0))]);
        assert!(mgr.is_modified_hydration());
        assert_eq!(body.n_waters(), 1);
    }
}
