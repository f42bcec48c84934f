use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bonded-atom slots on one CONECT line (columns 12-31).
pub const CONECT_BONDED_PER_LINE: usize = 4;
/// Hydrogen-bonded-atom slots on one CONECT line (columns 32-41 and 47-56).
pub const CONECT_HYDROGEN_PER_LINE: usize = 4;
/// Salt-bridged-atom slots on one CONECT line (columns 42-46 and 57-61).
pub const CONECT_SALT_BRIDGE_PER_LINE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl Default for BondOrder {
    fn default() -> Self {
        BondOrder::Single
    }
}

impl BondOrder {
    /// The `_struct_conn.pdbx_value_order` code.
    pub fn value_order(&self) -> &'static str {
        match self {
            Self::Single => "sing",
            Self::Double => "doub",
            Self::Triple => "trip",
            Self::Aromatic => "arom",
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" | "sing" => Ok(Self::Single),
            "2" | "d" | "double" | "doub" => Ok(Self::Double),
            "3" | "t" | "triple" | "trip" => Ok(Self::Triple),
            "ar" | "aromatic" | "arom" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

/// The kind of connection, deciding the CONECT field and `_struct_conn` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondKind {
    Covalent,
    Disulfide,
    Metal,
    HydrogenBond,
    SaltBridge,
}

impl BondKind {
    /// The `_struct_conn.conn_type_id` code.
    pub fn conn_type_id(&self) -> &'static str {
        match self {
            Self::Covalent => "covale",
            Self::Disulfide => "disulf",
            Self::Metal => "metalc",
            Self::HydrogenBond => "hydrog",
            Self::SaltBridge => "saltbr",
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond kind string")]
pub struct ParseBondKindError;

impl FromStr for BondKind {
    type Err = ParseBondKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "covale" | "covalent" => Ok(Self::Covalent),
            "disulf" | "disulfide" => Ok(Self::Disulfide),
            "metalc" | "metal" => Ok(Self::Metal),
            "hydrog" | "hydrogen" => Ok(Self::HydrogenBond),
            "saltbr" | "salt" => Ok(Self::SaltBridge),
            _ => Err(ParseBondKindError),
        }
    }
}

/// A connection between two atoms, named by their serial numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,     // Serial of the first atom
    pub atom2: usize,     // Serial of the second atom
    pub order: BondOrder, // Bond order (e.g., single, double, etc.)
    pub kind: BondKind,   // Connection kind
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self::with_kind(atom1, atom2, order, BondKind::Covalent)
    }

    pub fn with_kind(atom1: usize, atom2: usize, order: BondOrder, kind: BondKind) -> Self {
        Self {
            atom1,
            atom2,
            order,
            kind,
        }
    }

    pub fn disulfide(atom1: usize, atom2: usize) -> Self {
        Self::with_kind(atom1, atom2, BondOrder::Single, BondKind::Disulfide)
    }

    pub fn contains(&self, serial: usize) -> bool {
        self.atom1 == serial || self.atom2 == serial
    }

    /// The unordered atom pair, smaller serial first.
    pub fn key(&self) -> (usize, usize) {
        (self.atom1.min(self.atom2), self.atom1.max(self.atom2))
    }
}

/// One CONECT line: a primary atom and the partners that fit its fixed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConectRecord {
    pub atom_serial: usize,
    pub bonded: Vec<usize>,
    pub hydrogen: Vec<usize>,
    pub salt_bridge: Vec<usize>,
}

impl ConectRecord {
    /// The legacy map view: `atomserial`, `bond1..4`, `hydrogen1..4`, `salt1..2`.
    pub fn to_map(&self) -> BTreeMap<String, usize> {
        let mut map = BTreeMap::new();
        map.insert("atomserial".to_string(), self.atom_serial);
        let fields = [
            ("bond", &self.bonded),
            ("hydrogen", &self.hydrogen),
            ("salt", &self.salt_bridge),
        ];
        for (prefix, serials) in fields {
            for (i, &serial) in serials.iter().enumerate() {
                map.insert(format!("{}{}", prefix, i + 1), serial);
            }
        }
        map
    }
}

/// Derives CONECT lines from a bond list.
///
/// Every bond is listed under both of its atoms. Duplicate partners collapse, and
/// a primary atom with more partners than one line holds continues on further
/// lines. Records are ordered by primary serial.
pub fn conect_records<'a>(bonds: impl IntoIterator<Item = &'a Bond>) -> Vec<ConectRecord> {
    let mut partners: BTreeMap<usize, [Vec<usize>; 3]> = BTreeMap::new();
    let mut seen = HashSet::new();

    for bond in bonds {
        let slot = match bond.kind {
            BondKind::Covalent | BondKind::Disulfide | BondKind::Metal => 0,
            BondKind::HydrogenBond => 1,
            BondKind::SaltBridge => 2,
        };
        if !seen.insert((bond.key(), slot)) {
            continue;
        }
        partners.entry(bond.atom1).or_default()[slot].push(bond.atom2);
        partners.entry(bond.atom2).or_default()[slot].push(bond.atom1);
    }

    let mut records = Vec::new();
    for (atom_serial, mut lists) in partners {
        for list in lists.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
        let [bonded, hydrogen, salt_bridge] = lists;
        let lines = [
            bonded.len().div_ceil(CONECT_BONDED_PER_LINE),
            hydrogen.len().div_ceil(CONECT_HYDROGEN_PER_LINE),
            salt_bridge.len().div_ceil(CONECT_SALT_BRIDGE_PER_LINE),
        ]
        .into_iter()
        .max()
        .unwrap_or(0);

        for line in 0..lines {
            records.push(ConectRecord {
                atom_serial,
                bonded: chunk(&bonded, line, CONECT_BONDED_PER_LINE),
                hydrogen: chunk(&hydrogen, line, CONECT_HYDROGEN_PER_LINE),
                salt_bridge: chunk(&salt_bridge, line, CONECT_SALT_BRIDGE_PER_LINE),
            });
        }
    }
    records
}

fn chunk(serials: &[usize], line: usize, per_line: usize) -> Vec<usize> {
    serials
        .chunks(per_line)
        .nth(line)
        .map(<[usize]>::to_vec)
        .unwrap_or_default()
}
