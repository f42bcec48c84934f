use phf::{Map, phf_map};

static AMINO_ACIDS: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "UNK" => 'X',
};

static NUCLEOTIDES: Map<&'static str, char> = phf_map! {
    "A" => 'A', "C" => 'C', "G" => 'G', "U" => 'U', "T" => 'T', "I" => 'I', "N" => 'N',
    "DA" => 'A', "DC" => 'C', "DG" => 'G', "DT" => 'T', "DU" => 'U', "DI" => 'I', "DN" => 'N',
};

// Chemically modified residues that appear inside polymers as HETATM records.
static MODIFIED_RESIDUES: Map<&'static str, char> = phf_map! {
    "MSE" => 'M', "SEC" => 'U', "PYL" => 'O', "CSO" => 'C', "SEP" => 'S',
    "TPO" => 'T', "PTR" => 'Y', "HYP" => 'P', "MLY" => 'K', "KCX" => 'K',
    "PSU" => 'U', "5MC" => 'C', "OMG" => 'G', "H2U" => 'U',
};

pub fn is_amino_acid(name: &str) -> bool {
    AMINO_ACIDS.contains_key(name.trim())
}

pub fn is_nucleotide(name: &str) -> bool {
    NUCLEOTIDES.contains_key(name.trim())
}

pub fn is_water(name: &str) -> bool {
    matches!(name.trim(), "HOH" | "WAT" | "DOD" | "H2O")
}

/// Returns the one-letter code of a residue, or `'X'` when the code is unknown.
pub fn one_letter_code(name: &str) -> char {
    let name = name.trim();
    AMINO_ACIDS
        .get(name)
        .or_else(|| NUCLEOTIDES.get(name))
        .or_else(|| MODIFIED_RESIDUES.get(name))
        .copied()
        .unwrap_or('X')
}
