use super::atom::Atom;
use crate::core::utils::residues;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupType {
    AminoAcid,
    Nucleotide,
    Hetatm,
}

impl GroupType {
    /// Classifies a residue by its 3-letter chemical component code.
    pub fn classify(name: &str) -> Self {
        if residues::is_amino_acid(name) {
            GroupType::AminoAcid
        } else if residues::is_nucleotide(name) {
            GroupType::Nucleotide
        } else {
            GroupType::Hetatm
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GroupType::AminoAcid => "amino",
                GroupType::Nucleotide => "nucleotide",
                GroupType::Hetatm => "hetatm",
            }
        )
    }
}

/// An author residue number: sequence number plus optional insertion code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueNumber {
    pub seq_num: i32,
    pub ins_code: Option<char>,
}

impl ResidueNumber {
    pub fn new(seq_num: i32, ins_code: Option<char>) -> Self {
        Self { seq_num, ins_code }
    }
}

impl From<i32> for ResidueNumber {
    fn from(seq_num: i32) -> Self {
        Self::new(seq_num, None)
    }
}

impl fmt::Display for ResidueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seq_num)?;
        if let Some(ins) = self.ins_code {
            write!(f, "{}", ins)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid residue number string")]
pub struct ParseResidueNumberError;

impl FromStr for ResidueNumber {
    type Err = ParseResidueNumberError;

    /// Parses `"42"`, `"42A"` or `"-3"` into a residue number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, ins_code) = match s.chars().last() {
            Some(c) if c.is_ascii_alphabetic() => (&s[..s.len() - 1], Some(c)),
            Some(_) => (s, None),
            None => return Err(ParseResidueNumberError),
        };
        let seq_num = digits.parse().map_err(|_| ParseResidueNumberError)?;
        Ok(Self { seq_num, ins_code })
    }
}

/// A residue or ligand: an ordered collection of atoms with a residue identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,                    // 3-letter chemical component code
    pub residue_number: ResidueNumber,   // Author numbering from the source file
    pub group_type: GroupType,           // Amino acid, nucleotide or hetero group
    atoms: Vec<Atom>,                    // Atoms in file order
}

impl Group {
    /// Creates an empty group, classifying it from its residue name.
    pub fn new(name: &str, residue_number: ResidueNumber) -> Self {
        Self::with_type(name, residue_number, GroupType::classify(name))
    }

    pub fn with_type(name: &str, residue_number: ResidueNumber, group_type: GroupType) -> Self {
        Self {
            name: name.to_string(),
            residue_number,
            group_type,
            atoms: Vec::new(),
        }
    }

    pub fn add_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    pub fn get_atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|atom| atom.name == name)
    }

    pub fn has_atoms(&self) -> bool {
        !self.atoms.is_empty()
    }

    pub fn is_water(&self) -> bool {
        residues::is_water(&self.name)
    }
}
