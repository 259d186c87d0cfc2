/// The `HEADER` record of a PDB file: classification, deposition date and ID code.
pub struct PdbHeader {
    pub classification: String,
    pub dep_date: String,
    pub id_code: String,
}

impl PdbHeader {
    /// Parses a `HEADER` line, returning `None` if it is too short to hold the
    /// fixed-width classification/date/id-code columns.
    pub fn new(header_line: &str) -> Option<Self> {
        if header_line.len() < 66 { return None; }
        Some(Self {
            classification: header_line[10..50].trim().to_string(),
            dep_date: header_line[50..59].trim().to_string(),
            id_code: header_line[62..66].trim().to_string(),
        })
    }

    pub fn to_pdb_line(&self) -> String {
        format!("HEADER    {:<40}{:<9}   {:<4}", self.classification, self.dep_date, self.id_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let line = "HEADER    OXYGEN STORAGE/TRANSPORT                03-JUL-97   1A00";
        let header = PdbHeader::new(line).unwrap();
        assert_eq!(header.id_code, "1A00");
        assert_eq!(header.dep_date, "03-JUL-97");
    }
}
