use super::config::WriterConfig;
use super::error::WriteError;
use super::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::chain::Chain;
use crate::core::models::group::{Group, GroupType, ResidueNumber};
use crate::core::models::header::{DbRef, JournalArticle, Site};
use crate::core::models::structure::Structure;
use crate::core::models::topology::ConectRecord;
use tracing::{instrument, warn};

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Text columns available after the continuation field of TITLE and EXPDTA.
const TITLE_TEXT_WIDTH: usize = 69;
/// Text columns available after the continuation field of JRNL AUTH and TITL.
const JRNL_TEXT_WIDTH: usize = 59;
const SITE_RESIDUES_PER_LINE: usize = 4;
const IDENTITY_SYMMETRY: &str = "1555";

/// Legacy fixed-column PDB format writer.
///
/// Chains are labelled by their auth id. Every field is checked against its
/// column width: coordinate-section values that do not fit fail the call with
/// [`WriteError::FormatOverflow`], while free-text header values are truncated
/// with a warning.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = WriteError;

    #[instrument(skip_all, name = "pdb_writer")]
    fn write_to_string(structure: &Structure, config: &WriterConfig) -> Result<String, WriteError> {
        let mut writer = PdbWriter::default();
        if config.write_header {
            writer.write_header_section(structure)?;
        }
        writer.write_coordinates(structure)?;
        if config.write_connections {
            writer.write_conect(structure)?;
        }
        writer.push("END".to_string());
        Ok(writer.finish())
    }
}

impl Structure {
    /// Renders the structure as a PDB file with the default writer options.
    pub fn to_pdb(&self) -> Result<String, WriteError> {
        PdbFile::write_to_string(self, &WriterConfig::default())
    }

    pub fn to_pdb_with(&self, config: &WriterConfig) -> Result<String, WriteError> {
        PdbFile::write_to_string(self, config)
    }
}

#[derive(Default)]
struct PdbWriter {
    lines: Vec<String>,
}

impl PdbWriter {
    fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Emits `text` over as many continuation lines as it needs. The first line
    /// pads `first_pad` columns after `lead`; later lines carry their number in
    /// the two columns after `lead`.
    fn push_continued(&mut self, lead: &str, first_pad: usize, text: &str, width: usize) {
        for (i, chunk) in wrap(text, width).into_iter().enumerate() {
            let line = if i == 0 {
                format!("{}{}{}", lead, " ".repeat(first_pad), chunk)
            } else {
                format!("{}{:>2} {}", lead, i + 1, chunk)
            };
            self.push(line);
        }
    }

    // ---- Title section ----

    fn write_header_section(&mut self, structure: &Structure) -> Result<(), WriteError> {
        self.write_header_record(structure);

        let header = structure.header();
        if let Some(title) = header.title.as_deref() {
            self.push_continued("TITLE   ", 2, title, TITLE_TEXT_WIDTH);
        }
        if !header.experimental_techniques.is_empty() {
            let techniques = header.experimental_techniques.join("; ");
            self.push_continued("EXPDTA  ", 2, &techniques, TITLE_TEXT_WIDTH);
        }
        if let Some(journal) = structure.journal_article() {
            self.write_jrnl(journal);
        }
        if let Some(resolution) = header.resolution {
            let value = fit("REMARK", "resolution", &format!("{:.2}", resolution), 8)?;
            self.push("REMARK   2".to_string());
            self.push(format!("REMARK   2 RESOLUTION.{:>8} ANGSTROMS.", value));
        }

        for dbref in structure.dbrefs() {
            self.write_dbref(dbref)?;
        }
        self.write_ssbonds(structure)?;
        for site in structure.sites() {
            self.write_site(site)?;
        }
        self.write_cryst1(structure)
    }

    fn write_header_record(&mut self, structure: &Structure) {
        let header = structure.header();
        let code = structure.pdb_code().unwrap_or_default();
        if header.classification.is_none() && header.deposition_date.is_none() && code.is_empty() {
            return;
        }
        let classification = truncated(
            "HEADER",
            "classification",
            header.classification.as_deref().unwrap_or_default(),
            40,
        );
        let date = header
            .deposition_date
            .as_deref()
            .map(pdb_date)
            .unwrap_or_default();
        let code = truncated("HEADER", "idCode", code, 4);
        let line = format!("HEADER    {:<40}{:<9}   {:<4}", classification, date, code);
        self.push(line.trim_end().to_string());
    }

    fn write_jrnl(&mut self, journal: &JournalArticle) {
        if !journal.authors.is_empty() {
            self.push_continued("JRNL        AUTH", 3, &journal.authors.join(","), JRNL_TEXT_WIDTH);
        }
        if let Some(title) = journal.title.as_deref() {
            self.push_continued("JRNL        TITL", 3, title, JRNL_TEXT_WIDTH);
        }
        if let Some(name) = journal.journal_name.as_deref() {
            let line = format!(
                "JRNL        REF    {:<28}  V.{:>4} {:>5} {:>4}",
                truncated("JRNL", "pubName", name, 28),
                truncated("JRNL", "volume", journal.volume.as_deref().unwrap_or_default(), 4),
                truncated("JRNL", "page", journal.start_page.as_deref().unwrap_or_default(), 5),
                journal
                    .publication_year
                    .map(|y| y.to_string())
                    .unwrap_or_default()
            );
            self.push(line.trim_end().to_string());
        }
        if let Some(pmid) = journal.pmid.as_deref() {
            self.push(format!("JRNL        PMID   {}", pmid));
        }
        if let Some(doi) = journal.doi.as_deref() {
            self.push(format!("JRNL        DOI    {}", doi));
        }
    }

    // ---- Primary structure, heterogen and connectivity annotation ----

    /// Writes a DBREF record, or the DBREF1/DBREF2 pair when the database
    /// accession or id code is wider than the DBREF columns.
    fn write_dbref(&mut self, dbref: &DbRef) -> Result<(), WriteError> {
        let id_code = fit("DBREF", "idCode", &dbref.id_code, 4)?;
        let chain = fit("DBREF", "chainID", &dbref.chain_auth_id, 1)?;
        let seq_begin = fit("DBREF", "seqBegin", &dbref.seq_begin.seq_num.to_string(), 4)?;
        let seq_end = fit("DBREF", "seqEnd", &dbref.seq_end.seq_num.to_string(), 4)?;
        let database = fit("DBREF", "database", &dbref.database, 6)?;

        if dbref.db_accession.chars().count() <= 8 && dbref.db_id_code.chars().count() <= 12 {
            let line = format!(
                "DBREF  {:<4} {:1} {:>4}{:1} {:>4}{:1} {:<6} {:<8} {:<12} {:>5}{:1} {:>5}{:1}",
                id_code,
                chain,
                seq_begin,
                ins(&dbref.seq_begin),
                seq_end,
                ins(&dbref.seq_end),
                database,
                dbref.db_accession,
                dbref.db_id_code,
                fit("DBREF", "dbseqBegin", &dbref.db_seq_begin.seq_num.to_string(), 5)?,
                ins(&dbref.db_seq_begin),
                fit("DBREF", "dbseqEnd", &dbref.db_seq_end.seq_num.to_string(), 5)?,
                ins(&dbref.db_seq_end),
            );
            self.push(line.trim_end().to_string());
            return Ok(());
        }

        let first = format!(
            "DBREF1 {:<4} {:1} {:>4}{:1} {:>4}{:1} {:<6}               {:<20}",
            id_code,
            chain,
            seq_begin,
            ins(&dbref.seq_begin),
            seq_end,
            ins(&dbref.seq_end),
            database,
            fit("DBREF1", "dbIdCode", &dbref.db_id_code, 20)?,
        );
        let second = format!(
            "DBREF2 {:<4} {:1}     {:<22}     {:>10}  {:>10}",
            id_code,
            chain,
            fit("DBREF2", "dbAccession", &dbref.db_accession, 22)?,
            fit("DBREF2", "seqBegin", &dbref.db_seq_begin.seq_num.to_string(), 10)?,
            fit("DBREF2", "seqEnd", &dbref.db_seq_end.seq_num.to_string(), 10)?,
        );
        self.push(first.trim_end().to_string());
        self.push(second.trim_end().to_string());
        Ok(())
    }

    fn write_ssbonds(&mut self, structure: &Structure) -> Result<(), WriteError> {
        for (i, bond) in structure.ssbonds().iter().enumerate() {
            let (chain1, group1, _) = locate(structure, "SSBOND", bond.atom1)?;
            let (chain2, group2, _) = locate(structure, "SSBOND", bond.atom2)?;
            let line = format!(
                "SSBOND {:>3} {:>3} {:1} {:>4}{}   {:>3} {:1} {:>4}{}{:23}{:>6} {:>6}",
                fit("SSBOND", "serNum", &(i + 1).to_string(), 3)?,
                fit("SSBOND", "resName", &group1.name, 3)?,
                fit("SSBOND", "chainID", &chain1.auth_id, 1)?,
                fit("SSBOND", "seqNum", &group1.residue_number.seq_num.to_string(), 4)?,
                ins(&group1.residue_number),
                fit("SSBOND", "resName", &group2.name, 3)?,
                fit("SSBOND", "chainID", &chain2.auth_id, 1)?,
                fit("SSBOND", "seqNum", &group2.residue_number.seq_num.to_string(), 4)?,
                ins(&group2.residue_number),
                "",
                IDENTITY_SYMMETRY,
                IDENTITY_SYMMETRY,
            );
            self.push(line);
        }
        Ok(())
    }

    fn write_site(&mut self, site: &Site) -> Result<(), WriteError> {
        let site_id = fit("SITE", "siteID", &site.site_id, 3)?;
        let count = fit("SITE", "numRes", &site.residues.len().to_string(), 2)?;
        for (i, residues) in site.residues.chunks(SITE_RESIDUES_PER_LINE).enumerate() {
            let mut line = format!("SITE   {:>3} {:>3} {:>2}", i + 1, site_id, count);
            for residue in residues {
                line.push_str(&format!(
                    " {:>3} {:1}{:>4}{}",
                    fit("SITE", "resName", &residue.name, 3)?,
                    fit("SITE", "chainID", &residue.chain_auth_id, 1)?,
                    fit("SITE", "seq", &residue.residue_number.seq_num.to_string(), 4)?,
                    ins(&residue.residue_number),
                ));
            }
            self.push(line);
        }
        Ok(())
    }

    fn write_cryst1(&mut self, structure: &Structure) -> Result<(), WriteError> {
        let info = structure.crystallographic_info();
        let Some(cell) = info.cell else {
            return Ok(());
        };
        let line = format!(
            "CRYST1{:>9}{:>9}{:>9}{:>7}{:>7}{:>7} {:<11}{:>4}",
            fit("CRYST1", "a", &format!("{:.3}", cell.a), 9)?,
            fit("CRYST1", "b", &format!("{:.3}", cell.b), 9)?,
            fit("CRYST1", "c", &format!("{:.3}", cell.c), 9)?,
            fit("CRYST1", "alpha", &format!("{:.2}", cell.alpha), 7)?,
            fit("CRYST1", "beta", &format!("{:.2}", cell.beta), 7)?,
            fit("CRYST1", "gamma", &format!("{:.2}", cell.gamma), 7)?,
            fit("CRYST1", "sGroup", info.space_group.as_deref().unwrap_or_default(), 11)?,
            fit(
                "CRYST1",
                "z",
                &info.z.map(|z| z.to_string()).unwrap_or_default(),
                4
            )?,
        );
        self.push(line.trim_end().to_string());
        Ok(())
    }

    // ---- Coordinate section ----

    fn write_coordinates(&mut self, structure: &Structure) -> Result<(), WriteError> {
        let multi_model = structure.is_nmr();
        for (i, model) in structure.models().iter().enumerate() {
            if multi_model {
                let number = fit("MODEL", "serial", &(i + 1).to_string(), 4)?;
                self.push(format!("MODEL     {:>4}", number));
            }
            for chain in model.chains().iter().filter(|c| c.is_polymer()) {
                self.write_chain(chain)?;
                self.write_ter(structure, chain)?;
            }
            for chain in model.chains().iter().filter(|c| !c.is_polymer()) {
                self.write_chain(chain)?;
            }
            if multi_model {
                self.push("ENDMDL".to_string());
            }
        }
        Ok(())
    }

    fn write_chain(&mut self, chain: &Chain) -> Result<(), WriteError> {
        for group in chain.groups() {
            let record = if chain.is_polymer() && group.group_type != GroupType::Hetatm {
                "ATOM"
            } else {
                "HETATM"
            };
            for atom in group.atoms() {
                self.write_atom(record, chain, group, atom)?;
            }
        }
        Ok(())
    }

    fn write_atom(
        &mut self,
        record: &'static str,
        chain: &Chain,
        group: &Group,
        atom: &Atom,
    ) -> Result<(), WriteError> {
        let name = fit(record, "name", &atom.name, 4)?;
        // Names of single-letter elements start in column 14.
        let name = if name.len() < 4 && atom.element.chars().count() <= 1 {
            format!(" {:<3}", name)
        } else {
            format!("{:<4}", name)
        };

        let line = format!(
            "{:<6}{:>5} {}{}{:>3} {:1}{:>4}{}   {:>8}{:>8}{:>8}{:>6}{:>6}          {:>2}{:>2}",
            record,
            fit(record, "serial", &atom.serial.to_string(), 5)?,
            name,
            atom.alt_loc.unwrap_or(' '),
            fit(record, "resName", &group.name, 3)?,
            fit(record, "chainID", &chain.auth_id, 1)?,
            fit(record, "resSeq", &group.residue_number.seq_num.to_string(), 4)?,
            ins(&group.residue_number),
            fit(record, "x", &format!("{:.3}", atom.position.x), 8)?,
            fit(record, "y", &format!("{:.3}", atom.position.y), 8)?,
            fit(record, "z", &format!("{:.3}", atom.position.z), 8)?,
            fit(record, "occupancy", &format!("{:.2}", atom.occupancy), 6)?,
            fit(record, "tempFactor", &format!("{:.2}", atom.b_factor), 6)?,
            fit(record, "element", &atom.element.to_uppercase(), 2)?,
            fit(record, "charge", &atom.charge_label().unwrap_or_default(), 2)?,
        );
        self.push(line);
        Ok(())
    }

    fn write_ter(&mut self, structure: &Structure, chain: &Chain) -> Result<(), WriteError> {
        let Some((group, atom)) = chain
            .groups()
            .iter()
            .rev()
            .find_map(|g| g.atoms().last().map(|a| (g, a)))
        else {
            return Ok(());
        };
        let line = format!(
            "TER   {:>5}      {:>3} {:1}{:>4}{}",
            ter_serial(structure, atom.serial),
            fit("TER", "resName", &group.name, 3)?,
            fit("TER", "chainID", &chain.auth_id, 1)?,
            fit("TER", "resSeq", &group.residue_number.seq_num.to_string(), 4)?,
            ins(&group.residue_number),
        );
        self.push(line.trim_end().to_string());
        Ok(())
    }

    // ---- Connectivity section ----

    fn write_conect(&mut self, structure: &Structure) -> Result<(), WriteError> {
        for record in structure.conect_records() {
            let mut line = format!("CONECT{:>5}", conect_serial(structure, record.atom_serial)?);
            for slot in conect_slots(&record) {
                match slot {
                    Some(serial) => line.push_str(&format!("{:>5}", conect_serial(structure, serial)?)),
                    None => line.push_str("     "),
                }
            }
            self.push(line.trim_end().to_string());
        }
        Ok(())
    }
}

/// Columns 12-61 of a CONECT line: four bonded atoms, then hydrogen-bonded and
/// salt-bridged atoms interleaved as the format lays them out.
fn conect_slots(record: &ConectRecord) -> [Option<usize>; 10] {
    let bonded = |i: usize| record.bonded.get(i).copied();
    let hydrogen = |i: usize| record.hydrogen.get(i).copied();
    let salt = |i: usize| record.salt_bridge.get(i).copied();
    [
        bonded(0),
        bonded(1),
        bonded(2),
        bonded(3),
        hydrogen(0),
        hydrogen(1),
        salt(0),
        hydrogen(2),
        hydrogen(3),
        salt(1),
    ]
}

/// The serial after the chain's last atom, or blank when that number would not
/// fit or already belongs to an atom.
fn ter_serial(structure: &Structure, last_serial: usize) -> String {
    let serial = last_serial + 1;
    let text = serial.to_string();
    if text.len() > 5 || structure.atom_location(serial).is_some() {
        return String::new();
    }
    text
}

fn conect_serial(structure: &Structure, serial: usize) -> Result<String, WriteError> {
    if structure.atom_location(serial).is_none() {
        return Err(missing_atom("CONECT", serial));
    }
    fit("CONECT", "serial", &serial.to_string(), 5)
}

fn locate<'a>(
    structure: &'a Structure,
    record: &str,
    serial: usize,
) -> Result<(&'a Chain, &'a Group, &'a Atom), WriteError> {
    structure
        .locate_atom(serial)
        .ok_or_else(|| missing_atom(record, serial))
}

fn missing_atom(record: &str, serial: usize) -> WriteError {
    WriteError::Inconsistency(format!(
        "{} references atom serial {} which is not in the structure",
        record, serial
    ))
}

fn ins(number: &ResidueNumber) -> char {
    number.ins_code.unwrap_or(' ')
}

/// Returns `value` if it fits `width` columns.
fn fit(
    record: &'static str,
    field: &'static str,
    value: &str,
    width: usize,
) -> Result<String, WriteError> {
    if value.chars().count() > width {
        return Err(WriteError::overflow(record, field, value, width));
    }
    Ok(value.to_string())
}

fn truncated(record: &str, field: &str, value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    warn!(record, field, value, width, "Truncating value to its fixed columns.");
    value.chars().take(width).collect()
}

/// `YYYY-MM-DD` to the `DD-MMM-YY` form of the HEADER record.
fn pdb_date(iso: &str) -> String {
    let parts: Vec<&str> = iso.trim().split('-').collect();
    if let [year, month, day] = parts[..] {
        let digits = |s: &str, n: usize| s.len() == n && s.chars().all(|c| c.is_ascii_digit());
        if digits(year, 4) && digits(day, 2) {
            if let Ok(m @ 1..=12) = month.parse::<usize>() {
                return format!("{}-{}-{}", day, MONTHS[m - 1], &year[2..]);
            }
        }
    }
    warn!(date = iso, "Deposition date is not in YYYY-MM-DD form; leaving it out.");
    String::new()
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: String = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.chars().take(width).collect());
            word = word.chars().skip(width).collect();
        }
        if word.is_empty() {
            continue;
        }
        if current.is_empty() {
            current = word;
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
