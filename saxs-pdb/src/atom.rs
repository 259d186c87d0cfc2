use std::fmt;

/// A point in space carrying an effective scattering weight.
///
/// This is the minimal shape consumed by the distance kernels: fuller atom
/// records (element, residue, chain, occupancy, ...) exist only at the I/O
/// boundary, in [`crate::pdb_atom::PdbAtom`].
#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// effective scattering weight (electron count, excluded-volume charge, ...)
    pub weight: f64,
}

impl Atom {
    pub fn new(x: f64, y: f64, z: f64, weight: f64) -> Self { Atom { x, y, z, weight } }

    pub fn distance_squared_to(&self, other: &Atom) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance_to(&self, other: &Atom) -> f64 { self.distance_squared_to(other).sqrt() }
}

/// Closed set of form-factor tags an [`AtomFF`] may carry.
///
/// `Exv` marks the excluded-volume pseudo-atom rather than a chemical species;
/// `Unknown` marks an atom whose element could not be resolved to a tag below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormFactorType {
    H, C, CH, CH2, CH3, N, NH, NH2, NH3, O, OH, S, SH, Other, Unknown, Exv,
}

impl fmt::Display for FormFactorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{:?}", self) }
}

/// An [`Atom`] tagged with the form factor used to evaluate its scattering amplitude.
#[derive(Clone, Debug, PartialEq)]
pub struct AtomFF {
    pub atom: Atom,
    pub form_factor: FormFactorType,
}

impl AtomFF {
    pub fn new(atom: Atom, form_factor: FormFactorType) -> Self { AtomFF { atom, form_factor } }
}

/// A water molecule placed by a hydration strategy.
///
/// Shares [`Atom`]'s shape; waters are kept in a separate vector on [`crate::Body`]
/// rather than tagged inline, so they are never iterated together with chemistry atoms.
#[derive(Clone, Debug, PartialEq)]
pub struct Water {
    pub atom: Atom,
}

impl Water {
    pub fn new(atom: Atom) -> Self { Water { atom } }
}

/// Maps a PDB element symbol and residue context to a [`FormFactorType`].
///
/// Only the backbone/side-chain-agnostic heavy-atom cases named in the closed set
/// are resolved; anything else falls back to [`FormFactorType::Other`] (or
/// [`FormFactorType::Unknown`] for an empty/unparsable element).
pub fn form_factor_from_element(element: &str, n_attached_hydrogens: u8) -> FormFactorType {
    let element = element.trim();
    if element.is_empty() { return FormFactorType::Unknown; }
    match (element, n_attached_hydrogens) {
        ("H", _) => FormFactorType::H,
        ("C", 0) => FormFactorType::C,
        ("C", 1) => FormFactorType::CH,
        ("C", 2) => FormFactorType::CH2,
        ("C", 3) | ("C", _) => FormFactorType::CH3,
        ("N", 0) => FormFactorType::N,
        ("N", 1) => FormFactorType::NH,
        ("N", 2) => FormFactorType::NH2,
        ("N", 3) | ("N", _) => FormFactorType::NH3,
        ("O", 0) => FormFactorType::O,
        ("O", 1) | ("O", _) => FormFactorType::OH,
        ("S", 0) => FormFactorType::S,
        ("S", 1) | ("S", _) => FormFactorType::SH,
        _ => FormFactorType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Atom::new(0.0, 0.0, 0.0, 1.0);
        let b = Atom::new(3.0, 4.0, 0.0, 1.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_form_factor_lookup() {
        assert_eq!(form_factor_from_element("C", 2), FormFactorType::CH2);
        assert_eq!(form_factor_from_element("Xx", 0), FormFactorType::Other);
        assert_eq!(form_factor_from_element("", 0), FormFactorType::Unknown);
    }
}
