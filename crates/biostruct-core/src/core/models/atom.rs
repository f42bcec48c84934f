use nalgebra::Point3;

/// Represents a single atom of a group.
///
/// An atom is owned by exactly one [`Group`](super::group::Group). Bonds never
/// hold references to atoms; they name them by `serial`, which is unique within
/// a [`Structure`](super::structure::Structure) and keys its atom-serial table.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file (PDB columns 7-11).
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// The element symbol (e.g., "C", "FE").
    pub element: String,
    /// The alternate location indicator, if any.
    pub alt_loc: Option<char>,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The fractional occupancy.
    pub occupancy: f64,
    /// The isotropic temperature factor.
    pub b_factor: f64,
    /// The formal charge.
    pub formal_charge: i8,
}

impl Atom {
    /// Creates a new `Atom` with full occupancy, a zero B-factor and no charge.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number, unique within the owning structure.
    /// * `name` - The name of the atom.
    /// * `element` - The element symbol.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(serial: usize, name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: element.to_string(),
            alt_loc: None,
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            formal_charge: 0,
        }
    }

    /// Returns the formal charge in PDB notation ("2+", "1-"), or `None` when neutral.
    pub fn charge_label(&self) -> Option<String> {
        match self.formal_charge {
            0 => None,
            c if c > 0 => Some(format!("{}+", c)),
            c => Some(format!("{}-", c.unsigned_abs())),
        }
    }
}
