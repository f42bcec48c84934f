use super::config::WriterConfig;
use super::error::WriteError;
use super::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::chain::Chain;
use crate::core::models::group::{Group, GroupType};
use crate::core::models::structure::Structure;
use crate::core::models::topology::Bond;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

const IDENTITY_SYMMETRY: &str = "1_555";
const CITATION_ID: &str = "primary";

/// mmCIF tag-value writer.
///
/// Chains are labelled by their asym id (`label_asym_id`) with the auth id kept
/// alongside (`auth_asym_id`), and every chain references its entity by id, so a
/// parser can rebuild both identifier maps from the output.
pub struct MmcifFile;

impl StructureFile for MmcifFile {
    type Error = WriteError;

    #[instrument(skip_all, name = "mmcif_writer")]
    fn write_to_string(structure: &Structure, config: &WriterConfig) -> Result<String, WriteError> {
        let mut writer = CifWriter::default();
        writer.push(format!("data_{}", block_name(structure, config)));
        writer.push("#".to_string());
        if config.write_header {
            writer.write_header_categories(structure);
        }
        writer.write_entities(structure);
        writer.write_struct_asym(structure);
        if config.write_header {
            writer.write_struct_ref(structure);
            writer.write_citation(structure);
        }
        writer.write_atom_site(structure)?;
        if config.write_connections {
            writer.write_struct_conn(structure)?;
        }
        Ok(writer.finish())
    }
}

impl Structure {
    /// Renders the structure as an mmCIF data block with the default writer options.
    pub fn to_mmcif(&self) -> Result<String, WriteError> {
        MmcifFile::write_to_string(self, &WriterConfig::default())
    }

    pub fn to_mmcif_with(&self, config: &WriterConfig) -> Result<String, WriteError> {
        MmcifFile::write_to_string(self, config)
    }
}

fn block_name(structure: &Structure, config: &WriterConfig) -> String {
    if let Some(name) = config.data_block_name.as_deref() {
        return name.to_string();
    }
    match structure.pdb_code() {
        Some(code) if !code.is_empty() => code.to_uppercase(),
        _ => "unknown".to_string(),
    }
}

#[derive(Default)]
struct CifWriter {
    lines: Vec<String>,
}

impl CifWriter {
    fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Writes a single-row category as aligned `_category.tag value` pairs.
    fn pairs(&mut self, category: &str, items: &[(&str, String)]) {
        let width = items
            .iter()
            .map(|(tag, _)| category.len() + 2 + tag.len())
            .max()
            .unwrap_or(0);
        for (tag, value) in items {
            let key = format!("_{}.{}", category, tag);
            if value.starts_with(';') {
                self.push(key);
                self.push(value.clone());
            } else {
                self.push(format!("{:<width$} {}", key, value, width = width));
            }
        }
        self.push("#".to_string());
    }

    /// Writes a category as a `loop_`, or as pairs when it holds a single row.
    fn table(&mut self, category: &str, columns: &[&str], rows: Vec<Vec<String>>) {
        match rows.len() {
            0 => {}
            1 => {
                let items: Vec<(&str, String)> =
                    columns.iter().copied().zip(rows.into_iter().flatten()).collect();
                self.pairs(category, &items);
            }
            _ => {
                self.push("loop_".to_string());
                for column in columns {
                    self.push(format!("_{}.{}", category, column));
                }
                for row in rows {
                    self.push_row(row);
                }
                self.push("#".to_string());
            }
        }
    }

    /// Text fields must start their own line, so a row holding one is split around it.
    fn push_row(&mut self, row: Vec<String>) {
        let mut current: Vec<String> = Vec::new();
        for cell in row {
            if cell.starts_with(';') {
                if !current.is_empty() {
                    self.push(current.join(" "));
                    current.clear();
                }
                self.push(cell);
            } else {
                current.push(cell);
            }
        }
        if !current.is_empty() {
            self.push(current.join(" "));
        }
    }

    // ---- Entry metadata ----

    fn write_header_categories(&mut self, structure: &Structure) {
        let entry_id = opt_text(structure.pdb_code());
        let header = structure.header();

        self.pairs("entry", &[("id", entry_id.clone())]);
        if let Some(title) = header.title.as_deref() {
            self.pairs(
                "struct",
                &[("entry_id", entry_id.clone()), ("title", text(title))],
            );
        }
        if let Some(classification) = header.classification.as_deref() {
            self.pairs(
                "struct_keywords",
                &[
                    ("entry_id", entry_id.clone()),
                    ("pdbx_keywords", text(classification)),
                ],
            );
        }
        if let Some(date) = header.deposition_date.as_deref() {
            self.pairs(
                "pdbx_database_status",
                &[
                    ("entry_id", entry_id.clone()),
                    ("recvd_initial_deposition_date", text(date)),
                ],
            );
        }
        let techniques = header
            .experimental_techniques
            .iter()
            .map(|t| vec![entry_id.clone(), text(t)])
            .collect();
        self.table("exptl", &["entry_id", "method"], techniques);
        if let Some(resolution) = header.resolution {
            self.pairs(
                "refine",
                &[
                    ("entry_id", entry_id.clone()),
                    ("ls_d_res_high", format!("{:.2}", resolution)),
                ],
            );
        }

        let info = structure.crystallographic_info();
        if let Some(cell) = info.cell {
            self.pairs(
                "cell",
                &[
                    ("entry_id", entry_id.clone()),
                    ("length_a", format!("{:.3}", cell.a)),
                    ("length_b", format!("{:.3}", cell.b)),
                    ("length_c", format!("{:.3}", cell.c)),
                    ("angle_alpha", format!("{:.2}", cell.alpha)),
                    ("angle_beta", format!("{:.2}", cell.beta)),
                    ("angle_gamma", format!("{:.2}", cell.gamma)),
                    ("Z_PDB", number(info.z)),
                ],
            );
        }
        if let Some(space_group) = info.space_group.as_deref() {
            self.pairs(
                "symmetry",
                &[
                    ("entry_id", entry_id),
                    ("space_group_name_H-M", text(space_group)),
                ],
            );
        }
    }

    fn write_entities(&mut self, structure: &Structure) {
        let rows = structure
            .entity_infos()
            .iter()
            .map(|entity| {
                vec![
                    entity.id.to_string(),
                    entity.entity_type.cif_name().to_string(),
                    opt_text(entity.description.as_deref()),
                ]
            })
            .collect();
        self.table("entity", &["id", "type", "pdbx_description"], rows);
    }

    /// One row per distinct asym id across all models, in order of first appearance.
    fn write_struct_asym(&mut self, structure: &Structure) {
        let mut seen = HashSet::new();
        let rows = structure
            .models()
            .iter()
            .flat_map(|model| model.chains())
            .filter(|chain| seen.insert(chain.asym_id.as_str()))
            .map(|chain| vec![text(&chain.asym_id), number(chain.entity_id)])
            .collect();
        self.table("struct_asym", &["id", "entity_id"], rows);
    }

    fn write_struct_ref(&mut self, structure: &Structure) {
        let dbrefs = structure.dbrefs();
        let refs = dbrefs
            .iter()
            .enumerate()
            .map(|(i, dbref)| {
                vec![
                    (i + 1).to_string(),
                    text(&dbref.database),
                    text(&dbref.db_id_code),
                    text(&dbref.db_accession),
                ]
            })
            .collect();
        self.table(
            "struct_ref",
            &["id", "db_name", "db_code", "pdbx_db_accession"],
            refs,
        );

        let alignments = dbrefs
            .iter()
            .enumerate()
            .map(|(i, dbref)| {
                vec![
                    (i + 1).to_string(),
                    (i + 1).to_string(),
                    text(&dbref.id_code),
                    text(&dbref.chain_auth_id),
                    dbref.seq_begin.seq_num.to_string(),
                    ins_code(dbref.seq_begin.ins_code),
                    dbref.seq_end.seq_num.to_string(),
                    ins_code(dbref.seq_end.ins_code),
                    text(&dbref.db_accession),
                    dbref.db_seq_begin.seq_num.to_string(),
                    dbref.db_seq_end.seq_num.to_string(),
                ]
            })
            .collect();
        self.table(
            "struct_ref_seq",
            &[
                "align_id",
                "ref_id",
                "pdbx_PDB_id_code",
                "pdbx_strand_id",
                "pdbx_auth_seq_align_beg",
                "pdbx_seq_align_beg_ins_code",
                "pdbx_auth_seq_align_end",
                "pdbx_seq_align_end_ins_code",
                "pdbx_db_accession",
                "db_align_beg",
                "db_align_end",
            ],
            alignments,
        );
    }

    fn write_citation(&mut self, structure: &Structure) {
        let Some(journal) = structure.journal_article() else {
            return;
        };
        self.pairs(
            "citation",
            &[
                ("id", CITATION_ID.to_string()),
                ("title", opt_text(journal.title.as_deref())),
                ("journal_abbrev", opt_text(journal.journal_name.as_deref())),
                ("journal_volume", opt_text(journal.volume.as_deref())),
                ("page_first", opt_text(journal.start_page.as_deref())),
                ("year", number(journal.publication_year)),
                ("pdbx_database_id_PubMed", opt_text(journal.pmid.as_deref())),
                ("pdbx_database_id_DOI", opt_text(journal.doi.as_deref())),
            ],
        );
        let authors = journal
            .authors
            .iter()
            .enumerate()
            .map(|(i, name)| vec![CITATION_ID.to_string(), text(name), (i + 1).to_string()])
            .collect();
        self.table(
            "citation_author",
            &["citation_id", "name", "pdbx_ordinal"],
            authors,
        );
    }

    // ---- Coordinates ----

    fn write_atom_site(&mut self, structure: &Structure) -> Result<(), WriteError> {
        let mut rows = Vec::new();
        for (model_idx, model) in structure.models().iter().enumerate() {
            for chain in model.chains() {
                let entity_id = match (chain.entity_id, chain.is_polymer()) {
                    (Some(id), _) => id.to_string(),
                    (None, false) => "?".to_string(),
                    (None, true) => {
                        return Err(WriteError::Inconsistency(format!(
                            "polymeric chain '{}' has no entity",
                            chain.asym_id
                        )));
                    }
                };
                for (group_idx, group) in chain.groups().iter().enumerate() {
                    for atom in group.atoms() {
                        rows.push(atom_site_row(
                            model_idx, chain, &entity_id, group_idx, group, atom,
                        ));
                    }
                }
            }
        }
        self.table("atom_site", &ATOM_SITE_COLUMNS, rows);
        Ok(())
    }

    // ---- Connectivity ----

    fn write_struct_conn(&mut self, structure: &Structure) -> Result<(), WriteError> {
        let mut seen = HashSet::new();
        let mut counters: HashMap<&'static str, usize> = HashMap::new();
        let mut rows = Vec::new();

        for bond in structure.ssbonds().iter().chain(structure.bonds()) {
            if !seen.insert((bond.key(), bond.kind)) {
                debug!(
                    atom1 = bond.atom1,
                    atom2 = bond.atom2,
                    "Skipping bond already written to _struct_conn."
                );
                continue;
            }
            let conn_type = bond.kind.conn_type_id();
            let counter = counters.entry(conn_type).or_insert(0);
            *counter += 1;
            rows.push(struct_conn_row(
                structure,
                bond,
                format!("{}{}", conn_type, counter),
            )?);
        }

        self.table("struct_conn", &STRUCT_CONN_COLUMNS, rows);
        Ok(())
    }
}

const ATOM_SITE_COLUMNS: [&str; 21] = [
    "group_PDB",
    "id",
    "type_symbol",
    "label_atom_id",
    "label_alt_id",
    "label_comp_id",
    "label_asym_id",
    "label_entity_id",
    "label_seq_id",
    "pdbx_PDB_ins_code",
    "Cartn_x",
    "Cartn_y",
    "Cartn_z",
    "occupancy",
    "B_iso_or_equiv",
    "pdbx_formal_charge",
    "auth_seq_id",
    "auth_comp_id",
    "auth_asym_id",
    "auth_atom_id",
    "pdbx_PDB_model_num",
];

const STRUCT_CONN_COLUMNS: [&str; 20] = [
    "id",
    "conn_type_id",
    "ptnr1_label_asym_id",
    "ptnr1_label_comp_id",
    "ptnr1_label_seq_id",
    "ptnr1_label_atom_id",
    "pdbx_ptnr1_PDB_ins_code",
    "ptnr1_auth_asym_id",
    "ptnr1_auth_seq_id",
    "ptnr1_symmetry",
    "ptnr2_label_asym_id",
    "ptnr2_label_comp_id",
    "ptnr2_label_seq_id",
    "ptnr2_label_atom_id",
    "pdbx_ptnr2_PDB_ins_code",
    "ptnr2_auth_asym_id",
    "ptnr2_auth_seq_id",
    "ptnr2_symmetry",
    "pdbx_value_order",
    "pdbx_role",
];

fn atom_site_row(
    model_idx: usize,
    chain: &Chain,
    entity_id: &str,
    group_idx: usize,
    group: &Group,
    atom: &Atom,
) -> Vec<String> {
    let record = if chain.is_polymer() && group.group_type != GroupType::Hetatm {
        "ATOM"
    } else {
        "HETATM"
    };
    vec![
        record.to_string(),
        atom.serial.to_string(),
        text(&atom.element.to_uppercase()),
        text(&atom.name),
        atom.alt_loc.map_or_else(|| ".".to_string(), char_text),
        text(&group.name),
        text(&chain.asym_id),
        entity_id.to_string(),
        label_seq_id(chain, group_idx),
        ins_code(group.residue_number.ins_code),
        format!("{:.3}", atom.position.x),
        format!("{:.3}", atom.position.y),
        format!("{:.3}", atom.position.z),
        format!("{:.2}", atom.occupancy),
        format!("{:.2}", atom.b_factor),
        atom.formal_charge.to_string(),
        group.residue_number.seq_num.to_string(),
        text(&group.name),
        text(&chain.auth_id),
        text(&atom.name),
        (model_idx + 1).to_string(),
    ]
}

/// Sequence position within a polymeric chain; non-polymers carry none.
fn label_seq_id(chain: &Chain, group_idx: usize) -> String {
    if chain.is_polymer() {
        (group_idx + 1).to_string()
    } else {
        ".".to_string()
    }
}

fn struct_conn_row(structure: &Structure, bond: &Bond, id: String) -> Result<Vec<String>, WriteError> {
    let mut row = vec![id, bond.kind.conn_type_id().to_string()];
    for serial in [bond.atom1, bond.atom2] {
        let (chain, group_idx, group, atom) = resolve(structure, serial)?;
        row.extend([
            text(&chain.asym_id),
            text(&group.name),
            label_seq_id(chain, group_idx),
            text(&atom.name),
            ins_code(group.residue_number.ins_code),
            text(&chain.auth_id),
            group.residue_number.seq_num.to_string(),
            IDENTITY_SYMMETRY.to_string(),
        ]);
    }
    row.push(bond.order.value_order().to_string());
    row.push("?".to_string());
    Ok(row)
}

fn resolve(
    structure: &Structure,
    serial: usize,
) -> Result<(&Chain, usize, &Group, &Atom), WriteError> {
    let location = structure.atom_location(serial);
    let found = structure.locate_atom(serial);
    match (location, found) {
        (Some(location), Some((chain, group, atom))) => Ok((chain, location.group, group, atom)),
        _ => Err(WriteError::Inconsistency(format!(
            "_struct_conn references atom serial {} which is not in the structure",
            serial
        ))),
    }
}

fn ins_code(code: Option<char>) -> String {
    code.map_or_else(|| "?".to_string(), char_text)
}

fn char_text(c: char) -> String {
    text(c.encode_utf8(&mut [0; 4]))
}

fn number<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

fn opt_text(value: Option<&str>) -> String {
    value.map_or_else(|| "?".to_string(), text)
}

/// Renders a CIF value, quoting it when the bare token would be misread.
fn text(value: &str) -> String {
    if value.is_empty() {
        return "?".to_string();
    }
    if value.contains('\n') {
        return format!(";{}\n;", value);
    }
    let reserved = {
        let lower = value.to_ascii_lowercase();
        ["data_", "loop_", "save_", "global_", "stop_"]
            .iter()
            .any(|word| lower.starts_with(word))
    };
    let needs_quotes = reserved
        || value == "?"
        || value == "."
        || value.starts_with(['_', '#', '$', ';', '[', ']'])
        || value.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"');
    if !needs_quotes {
        return value.to_string();
    }
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        format!(";{}\n;", value)
    }
}
