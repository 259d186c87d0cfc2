use std::convert::TryFrom;
use std::io::{self, Write};

use crate::atom::{AtomFF, FormFactorType, Water};
use crate::molecule::Molecule;
use crate::residue_id::ResidueId;
use crate::structure::Structure;

impl Structure {
    /// Writes this structure back out as `ATOM`/`HETATM`/`TER` records.
    ///
    /// Round-trips byte-for-byte (after whitespace normalisation on each column)
    /// with what [`crate::Deposit::from_pdb_reader`] parsed: every atom is written
    /// via [`crate::PdbAtom`]'s `Display` impl, and a `TER` record is emitted right
    /// after the last atom of any residue recorded in this structure's `TER` map.
    pub fn write_pdb<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (i, atom) in self.atoms.iter().enumerate() {
            writeln!(writer, "{}", atom)?;
            if let Some(ter_res) = self.ter_atoms.get(&atom.chain_id) {
                let this_res = ResidueId::try_from(atom).ok();
                let next_same_res = self.atoms.get(i + 1)
                    .map(|next| next.chain_id == atom.chain_id
                        && next.res_seq == atom.res_seq && next.i_code == atom.i_code)
                    .unwrap_or(false);
                if this_res.as_ref() == Some(ter_res) && !next_same_res {
                    writeln!(writer, "TER")?;
                }
            }
        }
        Ok(())
    }
}

/// Renders a single-character chain id for the `i`'th body of a [`Molecule`],
/// cycling `A..Z` then `0..9` once the alphabet is exhausted.
fn chain_id_for_body(i: usize) -> char {
    const CHAINS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    CHAINS[i % CHAINS.len()] as char
}

/// Guesses a PDB-legal element symbol for a form-factor tag, for synthesised
/// `ATOM`/`HETATM` records written from a [`Molecule`] (which has dropped the
/// original element/residue identity by this layer).
fn element_symbol(ff: FormFactorType) -> &'static str {
    use FormFactorType::*;
    match ff {
        H => "H",
        C | CH | CH2 | CH3 => "C",
        N | NH | NH2 | NH3 => "N",
        O | OH => "O",
        S | SH => "S",
        Other | Unknown | Exv => "X",
    }
}

impl Molecule {
    /// Writes this molecule's current state (chemistry atoms then waters, one
    /// `TER` per body) as a minimal, round-trippable PDB file. Since [`crate::Body`]
    /// only carries `AtomFF`/[`Water`] (coordinate + form factor, no residue
    /// identity), every chemistry atom is written as a synthetic `UNK` residue and
    /// every water as `HOH`.
    pub fn write_pdb<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let mut serial = 1i32;
        for (bi, body) in self.bodies().iter().enumerate() {
            let chain = chain_id_for_body(bi);
            for a in body.atoms() {
                writeln!(writer, "{}", format_atom_line(serial, "UNK", chain, serial, a, false))?;
                serial += 1;
            }
            if !body.atoms().is_empty() {
                writeln!(writer, "TER")?;
            }
            for w in body.waters() {
                writeln!(writer, "{}", format_water_line(serial, "HOH", chain, serial, w))?;
                serial += 1;
            }
        }
        Ok(())
    }
}

fn format_atom_line(serial: i32, res_name: &str, chain: char, res_seq: i32, a: &AtomFF, hetero: bool) -> String {
    let record = if hetero { "HETATM" } else { "ATOM  " };
    let elem = element_symbol(a.form_factor);
    format!("{:<6}{:>5} {:^4} {:>3} {:>1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            record, serial, " CA ", res_name, chain, res_seq,
            a.atom.x, a.atom.y, a.atom.z, 1.00, 0.0, elem)
}

fn format_water_line(serial: i32, res_name: &str, chain: char, res_seq: i32, w: &Water) -> String {
    format!("{:<6}{:>5} {:^4} {:>3} {:>1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            "HETATM", serial, " O  ", res_name, chain, res_seq,
            w.atom.x, w.atom.y, w.atom.z, 1.00, 0.0, "O")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::pdb_atom::PdbAtom;

    #[test]
    fn test_structure_roundtrip_with_ter() {
        let mut strctr = Structure::new();
        strctr.push_atom(PdbAtom::from_atom_line("ATOM      1  CA  ALA A   1      -13.296   0.028   3.924  1.00  0.43           C"));
        strctr.push_atom(PdbAtom::from_atom_line("ATOM      2  CA  GLY A   2      -9.669  -0.447   4.998  1.00  0.19           C"));
        strctr.set_ter_atom("A".to_string(), ResidueId::new("A", 2, ' '));

        let mut buf = Vec::new();
        strctr.write_pdb(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "TER");
    }

    #[test]
    fn test_molecule_write_pdb_includes_waters() {
        let atoms = vec![AtomFF::new(Atom::new(0.0, 0.0, 0.0, 6.0), FormFactorType::C)];
        let mut molecule = Molecule::from_bodies(vec![atoms]);
        molecule.bodies_mut()[0].set_waters(vec![Water::new(Atom::new(1.0, 0.0, 0.0, 10.0))]);

        let mut buf = Vec::new();
        molecule.write_pdb(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("TER"));
        assert!(text.contains("HOH"));
    }
}
