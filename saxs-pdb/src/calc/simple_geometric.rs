use crate::PdbAtom;

/// Calculate the squared distance between two atoms
pub fn distance_squared(ai: &PdbAtom, aj: &PdbAtom) -> f64 { ai.pos.distance_square_to(&aj.pos) }

/// Calculate the distance between two atoms
pub fn distance(ai: &PdbAtom, aj: &PdbAtom) -> f64 { ai.pos.distance_to(&aj.pos) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = PdbAtom::from_atom_line("ATOM    515  CA  ALA A  68      0.000   0.000   0.000  1.00 16.12           C");
        let b = PdbAtom::from_atom_line("ATOM    516  CA  ALA A  69      3.000   4.000   0.000  1.00 16.12           C");
        assert_eq!(distance(&a, &b), 5.0);
        assert_eq!(distance_squared(&a, &b), 25.0);
    }
}