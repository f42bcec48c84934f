use super::group::ResidueNumber;
use phf::{Map, phf_map};

/// Cells with all three edges below this length (in Angstroms) are placeholders.
const MIN_VALID_CELL_SIZE: f64 = 10.0;

// (crystallographic, nmr) per experimental technique.
static EXPERIMENTAL_TECHNIQUES: Map<&'static str, (bool, bool)> = phf_map! {
    "X-RAY DIFFRACTION" => (true, false),
    "NEUTRON DIFFRACTION" => (true, false),
    "ELECTRON CRYSTALLOGRAPHY" => (true, false),
    "POWDER DIFFRACTION" => (true, false),
    "FIBER DIFFRACTION" => (false, false),
    "SOLUTION NMR" => (false, true),
    "SOLID-STATE NMR" => (false, true),
    "ELECTRON MICROSCOPY" => (false, false),
    "SOLUTION SCATTERING" => (false, false),
    "FLUORESCENCE TRANSFER" => (false, false),
    "INFRARED SPECTROSCOPY" => (false, false),
    "THEORETICAL MODEL" => (false, false),
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrystalCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl CrystalCell {
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    /// False for the 1x1x1 style placeholder cells some programs write.
    pub fn is_cell_reasonable(&self) -> bool {
        !(self.a < MIN_VALID_CELL_SIZE && self.b < MIN_VALID_CELL_SIZE && self.c < MIN_VALID_CELL_SIZE)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrystallographicInfo {
    pub cell: Option<CrystalCell>,
    pub space_group: Option<String>,
    pub z: Option<u32>,
}

/// Header and provenance metadata of an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbHeader {
    pub classification: Option<String>,
    /// Deposition date in ISO `YYYY-MM-DD` form.
    pub deposition_date: Option<String>,
    pub title: Option<String>,
    pub experimental_techniques: Vec<String>,
    pub resolution: Option<f64>,
    pub crystallographic_info: CrystallographicInfo,
}

impl PdbHeader {
    /// Looks the recorded techniques up in the technique table.
    ///
    /// Returns `None` when no recognized technique is recorded, otherwise
    /// `(any crystallographic, any nmr)`.
    pub fn technique_flags(&self) -> Option<(bool, bool)> {
        self.experimental_techniques
            .iter()
            .filter_map(|t| EXPERIMENTAL_TECHNIQUES.get(t.trim().to_uppercase().as_str()))
            .fold(None, |acc, &(xtal, nmr)| {
                let (a, b) = acc.unwrap_or((false, false));
                Some((a || xtal, b || nmr))
            })
    }
}

/// A cross-reference from a chain segment to a sequence database (DBREF).
#[derive(Debug, Clone, PartialEq)]
pub struct DbRef {
    pub id_code: String,
    pub chain_auth_id: String,
    pub seq_begin: ResidueNumber,
    pub seq_end: ResidueNumber,
    pub database: String,
    pub db_accession: String,
    pub db_id_code: String,
    pub db_seq_begin: ResidueNumber,
    pub db_seq_end: ResidueNumber,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalArticle {
    pub authors: Vec<String>,
    pub title: Option<String>,
    pub journal_name: Option<String>,
    pub volume: Option<String>,
    pub start_page: Option<String>,
    pub publication_year: Option<u16>,
    pub pmid: Option<String>,
    pub doi: Option<String>,
}

/// A residue named by a SITE record.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteResidue {
    pub name: String,
    pub chain_auth_id: String,
    pub residue_number: ResidueNumber,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub site_id: String,
    pub description: Option<String>,
    pub residues: Vec<SiteResidue>,
}
