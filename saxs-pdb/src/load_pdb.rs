use std::io;
use std::io::BufRead;
use std::time::Instant;
use log::{debug, info};
use saxs_io::open_file;

use crate::pdb_header::PdbHeader;
use crate::pdb_title::PdbTitle;
use crate::remarks::PDBRemarks;
use crate::residue_id::residue_id_from_ter_record;
use crate::{Deposit, ExperimentalMethod, PdbAtom, ResidueId, Structure, UnitCell};
use crate::crate_utils::find_deposit_file_name;
use crate::pdb_parsing_error::PDBError;

impl Deposit {
    /// Reads PDB-formatted content from a buffer.
    ///
    /// Parses `ATOM`/`HETATM` coordinate records, `TER` terminators and the
    /// `HEADER`/`TITLE`/`EXPDTA`/`REMARK`/`CRYST1` header records.
    /// `HELIX`/`SHEET`/`SEQRES` and any other unrecognised record types are passed
    /// through silently (this crate has no secondary-structure or sequence model).
    ///
    /// # Example
    /// ```
    /// use saxs_pdb::Deposit;
    /// use std::io::BufReader;
    /// let pdb_txt: &str =
    /// "ATOM      2  CA  MET A   1     -13.296   0.028   3.924  1.00  0.43           C\n\
    ///  ATOM     21  CA  THR A   2      -9.669  -0.447   4.998  1.00  0.19           C\n\
    ///  TER      22      THR A   2\n";
    /// let deposit = Deposit::from_pdb_reader(BufReader::new(pdb_txt.as_bytes())).unwrap();
    /// assert_eq!(deposit.structure().count_atoms(), 2);
    /// ```
    pub fn from_pdb_reader<R: BufRead>(reader: R) -> Result<Deposit, PDBError> {
        let start = Instant::now();

        let mut deposit = Deposit::new("");
        let mut remarks = PDBRemarks::new();
        let mut title: Option<PdbTitle> = None;
        let mut header: Option<PdbHeader> = None;
        let mut structure = Structure::new();

        for line in reader.lines() {
            let line = line?;
            if line.len() < 3 { continue; }
            let record = if line.len() >= 6 { line[0..6].trim() } else { line.trim() };

            match record {
                "TER" => {
                    let ter_res = match residue_id_from_ter_record(&line) {
                        Ok(res) => Some(res),
                        Err(_) => structure.atoms().last()
                            .and_then(|a| ResidueId::try_from(a).ok()),
                    };
                    if let Some(res) = ter_res {
                        structure.set_ter_atom(res.chain_id.clone(), res);
                    }
                }
                "HEADER" => { header = PdbHeader::new(&line); }
                "EXPDTA" => { deposit.methods = ExperimentalMethod::from_expdata_line(&line); }
                "TITLE" => {
                    match &mut title {
                        None => title = Some(PdbTitle::new(&line)),
                        Some(t) => t.append(&line),
                    }
                }
                "ATOM" | "HETATM" => {
                    structure.push_atom(PdbAtom::from_atom_line(&line));
                }
                "REMARK" => { remarks.add_remark(&line); }
                "CRYST1" => { deposit.unit_cell = Some(UnitCell::from_cryst1_line(&line)); }
                _ => {}
            }
        }
        debug!("{} atoms loaded", structure.count_atoms());

        deposit.resolution = remarks.resolution();
        deposit.title = title.map(|t| t.to_string());
        if let Some(header) = header {
            deposit.classification = Some(header.classification);
            deposit.id_code = header.id_code;
            deposit.dep_date = Some(header.dep_date);
        }
        deposit.structure = structure;

        debug!("structure loaded in {:?}", start.elapsed());

        Ok(deposit)
    }

    /// Reads a PDB deposit from a file, transparently decompressing `.gz` inputs.
    ///
    /// If `file_name` is followed by sibling files named by appending `_part2`,
    /// `_part3`, ... before the extension, their atom records are
    /// concatenated onto this one, in order.
    pub fn from_pdb_file(file_name: &str) -> Result<Deposit, PDBError> {
        info!("loading a PDB deposit: {}", file_name);
        let reader = open_file(file_name)?;
        let mut deposit = Self::from_pdb_reader(reader)?;

        for sibling in find_part_siblings(file_name) {
            info!("concatenating sibling deposit: {}", sibling);
            let reader = open_file(&sibling)?;
            let more = Self::from_pdb_reader(reader)?;
            for atom in more.structure.atoms {
                deposit.structure.push_atom(atom);
            }
        }

        Ok(deposit)
    }
}

/// Finds `_part2`, `_part3`, ... sibling files of `file_name`, in order, stopping
/// at the first missing index. `file_name` itself is assumed to be `_part1` (or to
/// carry no `_partN` suffix at all, in which case there are no siblings).
fn find_part_siblings(file_name: &str) -> Vec<String> {
    let mut siblings = Vec::new();
    let (stem, rest) = match file_name.rfind("_part1") {
        Some(idx) => (file_name[..idx].to_string(), file_name[idx + "_part1".len()..].to_string()),
        None => return siblings,
    };
    let mut n = 2;
    loop {
        let candidate = format!("{}_part{}{}", stem, n, rest);
        if std::path::Path::new(&candidate).exists() {
            siblings.push(candidate);
            n += 1;
        } else {
            break;
        }
    }
    siblings
}

/// Returns true if a given file is in PDB format.
///
/// Tests whether the first non-empty data line starts with `HEADER`, `ATOM`,
/// `HETATM` or `REMARK`. Returns an I/O error if the file can't be opened.
pub fn is_pdb_file(file_path: &str) -> io::Result<bool> {
    let reader = open_file(file_path)?;
    let pdb_starts_with = ["HEADER", "ATOM", "HETATM", "REMARK"];
    for line in reader.lines() {
        let line = line?;
        if !line.is_empty() {
            return Ok(pdb_starts_with.iter().any(|s| line.starts_with(s)));
        }
    }
    Ok(false)
}

static PDB_PREFIXES: [&str; 4] = ["pdb", "PDB", "pdb", ""];
static PDB_SUFFIXES: [&str; 7] = [".ent", ".ent.gz", ".gz", ".pdb", ".PDB", ".pdb.gz", ""];

/// Attempts to find a PDB file in a given directory, trying the conventional
/// `pdb<code>.ent[.gz]` / `<code>.pdb` naming variants. See `crate_utils` for the
/// full search order.
///
/// # Example
/// ```
/// use saxs_pdb::find_pdb_file_name;
/// let result = find_pdb_file_name("2gb1", "./tests/test_files/");
/// assert!(result.is_ok());
/// ```
pub fn find_pdb_file_name(pdb_code: &str, pdb_path: &str) -> Result<String, io::Error> {
    find_deposit_file_name(pdb_code, pdb_path, &PDB_PREFIXES, &PDB_SUFFIXES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_from_pdb_reader_header_and_title() {
        let txt = "HEADER    OXYGEN STORAGE/TRANSPORT                03-JUL-97   1A00\n\
                   TITLE     SOME PROTEIN\n\
                   ATOM      1  CA  ALA A   1      -13.296   0.028   3.924  1.00  0.43           C\n";
        let deposit = Deposit::from_pdb_reader(BufReader::new(txt.as_bytes())).unwrap();
        assert_eq!(deposit.id_code, "1A00");
        assert_eq!(deposit.title.as_deref(), Some("SOME PROTEIN"));
        assert_eq!(deposit.structure().count_atoms(), 1);
    }

    #[test]
    fn test_from_pdb_reader_ter_and_water() {
        let txt = "ATOM      1  CA  ALA A   1      -13.296   0.028   3.924  1.00  0.43           C\n\
                   TER       2      ALA A   1\n\
                   HETATM    3  O   HOH A   2       1.000   2.000   3.000  1.00  0.00           O\n";
        let deposit = Deposit::from_pdb_reader(BufReader::new(txt.as_bytes())).unwrap();
        let strctr = deposit.structure();
        assert_eq!(strctr.count_atoms(), 2);
        let names = vec!["HOH".to_string()];
        let (atoms, waters) = strctr.partition_waters(&names);
        assert_eq!(atoms.len(), 1);
        assert_eq!(waters.len(), 1);
    }
}
