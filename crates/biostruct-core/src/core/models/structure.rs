use super::atom::Atom;
use super::chain::Chain;
use super::entity::EntityInfo;
use super::error::StructureError;
use super::group::{Group, GroupType};
use super::header::{CrystallographicInfo, DbRef, JournalArticle, PdbHeader, Site};
use super::identifier::{ResidueRange, StructureIdentifier, SubstructureIdentifier};
use super::model::Model;
use super::topology::{Bond, ConectRecord, conect_records};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// Position of an atom inside the model hierarchy, by index at each level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomLocation {
    pub model: usize,
    pub chain: usize,
    pub group: usize,
    pub atom: usize,
}

/// The root aggregate of a macromolecular entry.
///
/// A structure owns its models (index 0 is the default model), the entity list,
/// header metadata, bonds and sites. Atoms are addressed by serial number through
/// an atom-serial table that is kept in step with every model mutation, which is
/// what bonds and CONECT records resolve against.
///
/// Mutations validate before they modify: a failing call leaves the structure
/// exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    pdb_code: Option<String>,
    name: Option<String>,
    identifier: Option<StructureIdentifier>,
    models: Vec<Model>,
    entity_infos: Vec<EntityInfo>,
    header: PdbHeader,
    dbrefs: Vec<DbRef>,
    journal: Option<JournalArticle>,
    sites: Vec<Site>,
    ssbonds: Vec<Bond>,
    bonds: Vec<Bond>,
    /// Cached adjacency list over `bonds` and `ssbonds`, keyed by atom serial.
    bond_adjacency: HashMap<usize, Vec<usize>>,
    /// Atom serial to its location in `models`.
    atom_index: HashMap<usize, AtomLocation>,
    id: Option<i64>,
    biological_assembly: bool,
}

impl Structure {
    /// Creates a new, empty, model-less structure.
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Models ----

    /// Appends a new model built from `chains`.
    ///
    /// # Errors
    ///
    /// Returns a duplicate-id error if the chains violate the per-model identifier
    /// invariants, or [`StructureError::DuplicateAtomSerial`] if an atom serial is
    /// already used elsewhere in the structure.
    pub fn add_model(&mut self, chains: Vec<Chain>) -> Result<(), StructureError> {
        let model = Model::new(chains)?;
        let position = self.models.len();
        let mut atom_index = self.atom_index.clone();
        index_model(&mut atom_index, position, &model)?;

        debug!(model = position, chains = model.len(), "Adding model.");
        self.models.push(model);
        self.atom_index = atom_index;
        Ok(())
    }

    /// Replaces the model at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::Index`] if `position` is out of range, plus the
    /// validation errors of [`Structure::add_model`].
    pub fn set_model(&mut self, position: usize, chains: Vec<Chain>) -> Result<(), StructureError> {
        if position >= self.models.len() {
            return Err(StructureError::index("model", position, self.models.len()));
        }
        self.replace_model(position, Model::new(chains)?)
    }

    pub fn get_model(&self, position: usize) -> Result<&Model, StructureError> {
        self.models
            .get(position)
            .ok_or_else(|| StructureError::index("model", position, self.models.len()))
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn nr_models(&self) -> usize {
        self.models.len()
    }

    /// True iff the structure holds more than one model.
    pub fn is_nmr(&self) -> bool {
        self.models.len() > 1
    }

    /// Whether the structure was determined by a crystallographic method.
    ///
    /// Recorded experimental techniques decide when present. Otherwise a
    /// structure counts as crystallographic when it carries a space group and a
    /// reasonable unit cell.
    pub fn is_crystallographic(&self) -> bool {
        if let Some((crystallographic, _)) = self.header.technique_flags() {
            return crystallographic;
        }
        let info = &self.header.crystallographic_info;
        info.space_group.is_some() && info.cell.is_some_and(|cell| cell.is_cell_reasonable())
    }

    /// Discards every model. Entities, header metadata and bonds are kept.
    pub fn reset_models(&mut self) {
        debug!(models = self.models.len(), "Resetting models.");
        self.models.clear();
        self.atom_index.clear();
    }

    // ---- Chains ----

    /// Number of chains in model 0, or 0 for a model-less structure.
    pub fn size(&self) -> usize {
        self.models.first().map_or(0, Model::len)
    }

    pub fn model_size(&self, model: usize) -> Result<usize, StructureError> {
        self.get_model(model).map(Model::len)
    }

    /// Chains of model 0; empty for a model-less structure.
    pub fn chains(&self) -> &[Chain] {
        self.models.first().map(Model::chains).unwrap_or_default()
    }

    pub fn chains_in_model(&self, model: usize) -> Result<&[Chain], StructureError> {
        self.get_model(model).map(Model::chains)
    }

    /// Replaces the chains of model 0 only, even when the structure holds several
    /// models. Creates model 0 on a model-less structure.
    pub fn set_chains(&mut self, chains: Vec<Chain>) -> Result<(), StructureError> {
        self.set_chains_in_model(0, chains)
    }

    /// Replaces the chains of `model`, or appends a new model when `model` equals
    /// [`Structure::nr_models`].
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::Index`] when `model` is past the end, plus the
    /// validation errors of [`Structure::add_model`].
    pub fn set_chains_in_model(
        &mut self,
        model: usize,
        chains: Vec<Chain>,
    ) -> Result<(), StructureError> {
        match model.cmp(&self.models.len()) {
            std::cmp::Ordering::Less => self.replace_model(model, Model::new(chains)?),
            std::cmp::Ordering::Equal => self.add_model(chains),
            std::cmp::Ordering::Greater => {
                Err(StructureError::index("model", model, self.models.len()))
            }
        }
    }

    /// Appends a chain to model 0, creating it if necessary.
    pub fn add_chain(&mut self, chain: Chain) -> Result<(), StructureError> {
        self.add_chain_in_model(chain, 0)
    }

    /// Appends a chain to `model`; a new model is created when `model` equals
    /// [`Structure::nr_models`].
    pub fn add_chain_in_model(&mut self, chain: Chain, model: usize) -> Result<(), StructureError> {
        if model > self.models.len() {
            return Err(StructureError::index("model", model, self.models.len()));
        }
        if model == self.models.len() {
            return self.add_model(vec![chain]);
        }

        let position = self.models[model].len();
        let mut new_entries = HashMap::new();
        for (group_idx, group) in chain.groups().iter().enumerate() {
            for (atom_idx, atom) in group.atoms().iter().enumerate() {
                let location = AtomLocation {
                    model,
                    chain: position,
                    group: group_idx,
                    atom: atom_idx,
                };
                if self.atom_index.contains_key(&atom.serial)
                    || new_entries.insert(atom.serial, location).is_some()
                {
                    return Err(StructureError::DuplicateAtomSerial(atom.serial));
                }
            }
        }

        debug!(model, asym_id = %chain.asym_id, auth_id = %chain.auth_id, "Adding chain.");
        self.models[model].push_chain(chain)?;
        self.atom_index.extend(new_entries);
        Ok(())
    }

    /// Polymeric chains of model 0.
    pub fn poly_chains(&self) -> Vec<&Chain> {
        self.chains().iter().filter(|c| c.is_polymer()).collect()
    }

    /// Non-polymeric chains of model 0.
    pub fn non_poly_chains(&self) -> Vec<&Chain> {
        self.chains().iter().filter(|c| !c.is_polymer()).collect()
    }

    /// Every hetero group across all models.
    pub fn het_groups(&self) -> Vec<&Group> {
        self.models
            .iter()
            .flat_map(Model::chains)
            .flat_map(Chain::groups)
            .filter(|g| g.group_type == GroupType::Hetatm)
            .collect()
    }

    pub fn atom_count(&self) -> usize {
        self.atom_index.len()
    }

    /// Resolves an atom serial through the atom-serial table.
    pub fn locate_atom(&self, serial: usize) -> Option<(&Chain, &Group, &Atom)> {
        let location = self.atom_index.get(&serial)?;
        let chain = self.models.get(location.model)?.get_chain(location.chain)?;
        let group = chain.get_group(location.group)?;
        let atom = group.atoms().get(location.atom)?;
        Some((chain, group, atom))
    }

    pub fn atom_location(&self, serial: usize) -> Option<AtomLocation> {
        self.atom_index.get(&serial).copied()
    }

    fn replace_model(&mut self, position: usize, model: Model) -> Result<(), StructureError> {
        let mut atom_index = HashMap::new();
        for (i, existing) in self.models.iter().enumerate() {
            let current = if i == position { &model } else { existing };
            index_model(&mut atom_index, i, current)?;
        }

        debug!(model = position, chains = model.len(), "Replacing model.");
        self.models[position] = model;
        self.atom_index = atom_index;
        Ok(())
    }

    // ---- Entities ----

    pub fn entity_infos(&self) -> &[EntityInfo] {
        &self.entity_infos
    }

    pub fn set_entity_infos(&mut self, entity_infos: Vec<EntityInfo>) {
        self.entity_infos = entity_infos;
    }

    pub fn add_entity_info(&mut self, entity_info: EntityInfo) {
        self.entity_infos.push(entity_info);
    }

    // ---- Bonds ----

    /// Adds a bond between two atoms of the structure.
    ///
    /// Adding a bond of a kind that already exists between the same pair is a
    /// no-op. A pair may carry bonds of different kinds, such as a covalent bond
    /// and a hydrogen bond.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::UnknownAtomSerial`] if either serial is missing
    /// from the atom-serial table.
    pub fn add_bond(&mut self, bond: Bond) -> Result<(), StructureError> {
        self.check_serials(&bond)?;
        if self.bonds.iter().any(|b| same_bond(b, &bond)) {
            return Ok(());
        }
        self.link(&bond);
        self.bonds.push(bond);
        Ok(())
    }

    /// Adds a disulfide bond; idempotent like [`Structure::add_bond`].
    pub fn add_ssbond(&mut self, bond: Bond) -> Result<(), StructureError> {
        self.check_serials(&bond)?;
        if self.ssbonds.iter().any(|b| same_bond(b, &bond)) {
            return Ok(());
        }
        self.link(&bond);
        self.ssbonds.push(bond);
        Ok(())
    }

    /// Replaces the disulfide bond list.
    pub fn set_ssbonds(&mut self, ssbonds: Vec<Bond>) -> Result<(), StructureError> {
        for bond in &ssbonds {
            self.check_serials(bond)?;
        }
        self.ssbonds = ssbonds;
        self.rebuild_adjacency();
        Ok(())
    }

    pub fn ssbonds(&self) -> &[Bond] {
        &self.ssbonds
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Serials bonded to `serial` through any bond or disulfide bond.
    pub fn bonded_serials(&self, serial: usize) -> &[usize] {
        self.bond_adjacency
            .get(&serial)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// CONECT lines derived from the disulfide and general bond lists.
    pub fn conect_records(&self) -> Vec<ConectRecord> {
        conect_records(self.ssbonds.iter().chain(&self.bonds))
    }

    /// Legacy CONECT map view, derived from [`Structure::conect_records`].
    #[deprecated(note = "use `conect_records` or `bonds` instead")]
    pub fn connections(&self) -> Vec<BTreeMap<String, usize>> {
        self.conect_records()
            .iter()
            .map(ConectRecord::to_map)
            .collect()
    }

    fn check_serials(&self, bond: &Bond) -> Result<(), StructureError> {
        for serial in [bond.atom1, bond.atom2] {
            if !self.atom_index.contains_key(&serial) {
                return Err(StructureError::UnknownAtomSerial(serial));
            }
        }
        Ok(())
    }

    fn link(&mut self, bond: &Bond) {
        for (a, b) in [(bond.atom1, bond.atom2), (bond.atom2, bond.atom1)] {
            let neighbors = self.bond_adjacency.entry(a).or_default();
            if !neighbors.contains(&b) {
                neighbors.push(b);
            }
        }
    }

    fn rebuild_adjacency(&mut self) {
        self.bond_adjacency.clear();
        let bonds: Vec<Bond> = self.ssbonds.iter().chain(&self.bonds).copied().collect();
        for bond in &bonds {
            self.link(bond);
        }
    }

    // ---- Metadata ----

    pub fn pdb_code(&self) -> Option<&str> {
        self.pdb_code.as_deref()
    }

    pub fn set_pdb_code(&mut self, pdb_code: &str) {
        self.pdb_code = Some(pdb_code.to_string());
    }

    #[deprecated(note = "use `pdb_code` instead")]
    pub fn pdb_id(&self) -> Option<&str> {
        self.pdb_code()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    pub fn structure_identifier(&self) -> Option<&StructureIdentifier> {
        self.identifier.as_ref()
    }

    pub fn set_structure_identifier(&mut self, identifier: Option<StructureIdentifier>) {
        self.identifier = identifier;
    }

    pub fn header(&self) -> &PdbHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut PdbHeader {
        &mut self.header
    }

    pub fn set_header(&mut self, header: PdbHeader) {
        self.header = header;
    }

    pub fn crystallographic_info(&self) -> &CrystallographicInfo {
        &self.header.crystallographic_info
    }

    pub fn set_crystallographic_info(&mut self, info: CrystallographicInfo) {
        self.header.crystallographic_info = info;
    }

    pub fn dbrefs(&self) -> &[DbRef] {
        &self.dbrefs
    }

    pub fn set_dbrefs(&mut self, dbrefs: Vec<DbRef>) {
        self.dbrefs = dbrefs;
    }

    pub fn journal_article(&self) -> Option<&JournalArticle> {
        self.journal.as_ref()
    }

    pub fn has_journal_article(&self) -> bool {
        self.journal.is_some()
    }

    pub fn set_journal_article(&mut self, journal: Option<JournalArticle>) {
        self.journal = journal;
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn set_sites(&mut self, sites: Vec<Site>) {
        self.sites = sites;
    }

    pub fn is_biological_assembly(&self) -> bool {
        self.biological_assembly
    }

    pub fn set_biological_assembly(&mut self, biological_assembly: bool) {
        self.biological_assembly = biological_assembly;
    }

    /// Persistence-layer identifier; never interpreted here.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    // ---- Identifier ----

    /// A label for this structure.
    ///
    /// Uses, in order: the original text of the structure identifier, the name,
    /// and finally a canonical identifier synthesized from the PDB code and the
    /// residue span of every non-empty chain of model 0.
    pub fn get_identifier(&self) -> String {
        if let Some(identifier) = &self.identifier {
            return identifier.identifier().to_string();
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.synthesized_identifier().to_string()
    }

    /// The canonical description of which part of the source entry this holds.
    pub fn to_canonical(&self) -> SubstructureIdentifier {
        match &self.identifier {
            Some(identifier) => identifier.to_canonical().clone(),
            None => self.synthesized_identifier(),
        }
    }

    pub fn residue_ranges(&self) -> Vec<ResidueRange> {
        self.to_canonical().ranges
    }

    pub fn ranges(&self) -> Vec<String> {
        self.residue_ranges()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn synthesized_identifier(&self) -> SubstructureIdentifier {
        let ranges = self
            .chains()
            .iter()
            .filter_map(|chain| {
                let first = chain.groups().first()?;
                let last = chain.groups().last()?;
                Some(ResidueRange::new(
                    &chain.auth_id,
                    first.residue_number,
                    last.residue_number,
                ))
            })
            .collect();
        SubstructureIdentifier::new(self.pdb_code.as_deref().unwrap_or_default(), ranges)
    }
}

fn same_bond(a: &Bond, b: &Bond) -> bool {
    a.key() == b.key() && a.kind == b.kind
}

fn index_model(
    atom_index: &mut HashMap<usize, AtomLocation>,
    model_idx: usize,
    model: &Model,
) -> Result<(), StructureError> {
    for (chain_idx, chain) in model.chains().iter().enumerate() {
        for (group_idx, group) in chain.groups().iter().enumerate() {
            for (atom_idx, atom) in group.atoms().iter().enumerate() {
                let location = AtomLocation {
                    model: model_idx,
                    chain: chain_idx,
                    group: group_idx,
                    atom: atom_idx,
                };
                if atom_index.insert(atom.serial, location).is_some() {
                    return Err(StructureError::DuplicateAtomSerial(atom.serial));
                }
            }
        }
    }
    Ok(())
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Structure {}", self.pdb_code.as_deref().unwrap_or("????"))?;
        if let Some(name) = &self.name {
            write!(f, " ({})", name)?;
        }
        writeln!(
            f,
            " models: {} entities: {}{}",
            self.models.len(),
            self.entity_infos.len(),
            if self.biological_assembly {
                " biological assembly"
            } else {
                ""
            }
        )?;
        for (i, model) in self.models.iter().enumerate() {
            writeln!(f, "  Model {}: {} chain(s)", i, model.len())?;
            for chain in model.chains() {
                writeln!(
                    f,
                    "    Chain asym {} auth {} ({}): {} group(s), {} atom(s)",
                    chain.asym_id,
                    chain.auth_id,
                    chain.chain_type(),
                    chain.groups().len(),
                    chain.atom_count()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::ChainType;
    use crate::core::models::entity::EntityType;
    use crate::core::models::fixtures::{chain_with_atoms, two_chain_structure};
    use crate::core::models::header::CrystalCell;
    use crate::core::models::topology::{BondKind, BondOrder};

    mod models {
        use super::*;

        #[test]
        fn nmr_flag_follows_model_count() {
            let mut structure = Structure::new();
            assert_eq!(structure.nr_models(), 0);
            assert!(!structure.is_nmr());

            structure
                .add_model(vec![chain_with_atoms("A", "A", ChainType::Polymer, 1, 2)])
                .unwrap();
            assert_eq!(structure.nr_models(), 1);
            assert!(!structure.is_nmr());

            structure
                .add_model(vec![chain_with_atoms("A", "A", ChainType::Polymer, 101, 2)])
                .unwrap();
            assert_eq!(structure.nr_models(), 2);
            assert!(structure.is_nmr());
        }

        #[test]
        fn set_model_out_of_range_fails_without_changes() {
            let mut structure = two_chain_structure();
            let err = structure.set_model(3, Vec::new()).unwrap_err();
            assert_eq!(err, StructureError::index("model", 3, 1));
            assert_eq!(structure.size(), 2);
        }

        #[test]
        fn set_model_replaces_existing_model() {
            let mut structure = two_chain_structure();
            structure
                .set_model(0, vec![chain_with_atoms("Z", "Z", ChainType::Polymer, 500, 1)])
                .unwrap();
            assert_eq!(structure.size(), 1);
            assert_eq!(structure.chains()[0].asym_id, "Z");
            assert!(structure.locate_atom(1).is_none());
            assert!(structure.locate_atom(500).is_some());
        }

        #[test]
        fn reset_models_keeps_entities_and_header() {
            let mut structure = two_chain_structure();
            structure.header_mut().title = Some("KEEP ME".into());
            let entities = structure.entity_infos().to_vec();

            structure.reset_models();

            assert_eq!(structure.nr_models(), 0);
            assert_eq!(structure.size(), 0);
            assert!(structure.chains().is_empty());
            assert_eq!(structure.entity_infos(), entities.as_slice());
            assert_eq!(structure.header().title.as_deref(), Some("KEEP ME"));
            assert_eq!(structure.atom_count(), 0);
        }

        #[test]
        fn crystallographic_flag_uses_techniques_then_cell() {
            let mut structure = Structure::new();
            assert!(!structure.is_crystallographic());

            structure.set_crystallographic_info(CrystallographicInfo {
                cell: Some(CrystalCell::new(50.0, 60.0, 70.0, 90.0, 90.0, 90.0)),
                space_group: Some("P 21 21 21".into()),
                z: Some(4),
            });
            assert!(structure.is_crystallographic());

            structure.header_mut().experimental_techniques = vec!["SOLUTION NMR".into()];
            assert!(!structure.is_crystallographic());
        }

        #[test]
        fn placeholder_cell_is_not_crystallographic() {
            let mut structure = Structure::new();
            structure.set_crystallographic_info(CrystallographicInfo {
                cell: Some(CrystalCell::new(1.0, 1.0, 1.0, 90.0, 90.0, 90.0)),
                space_group: Some("P 1".into()),
                z: Some(1),
            });
            assert!(!structure.is_crystallographic());
        }
    }

    mod chains {
        use super::*;

        #[test]
        fn set_chains_on_nmr_structure_touches_model_zero_only() {
            let mut structure = Structure::new();
            structure
                .add_model(vec![chain_with_atoms("A", "A", ChainType::Polymer, 1, 3)])
                .unwrap();
            structure
                .add_model(vec![chain_with_atoms("A", "A", ChainType::Polymer, 101, 3)])
                .unwrap();
            let original_second = structure.chains_in_model(1).unwrap().to_vec();

            let replacement = vec![
                chain_with_atoms("B", "B", ChainType::Polymer, 201, 2),
                chain_with_atoms("C", "C", ChainType::NonPolymer, 301, 1),
            ];
            structure.set_chains(replacement.clone()).unwrap();

            assert_eq!(structure.chains_in_model(0).unwrap(), replacement.as_slice());
            assert_eq!(structure.chains_in_model(1).unwrap(), original_second.as_slice());
        }

        #[test]
        fn set_chains_on_empty_structure_creates_model_zero() {
            let mut structure = Structure::new();
            structure
                .set_chains(vec![chain_with_atoms("A", "A", ChainType::Polymer, 1, 1)])
                .unwrap();
            assert_eq!(structure.nr_models(), 1);
            assert!(structure.set_chains_in_model(3, Vec::new()).is_err());
        }

        #[test]
        fn add_chain_in_model_appends_new_model_at_end() {
            let mut structure = two_chain_structure();
            structure
                .add_chain_in_model(chain_with_atoms("A", "A", ChainType::Polymer, 900, 1), 1)
                .unwrap();
            assert_eq!(structure.nr_models(), 2);
            assert_eq!(structure.model_size(1).unwrap(), 1);

            let err = structure
                .add_chain_in_model(Chain::new("Q", "Q", ChainType::Polymer), 5)
                .unwrap_err();
            assert!(matches!(err, StructureError::Index { index: 5, .. }));
        }

        #[test]
        fn add_chain_rejects_duplicate_serials_atomically() {
            let mut structure = two_chain_structure();
            let before = structure.size();
            let err = structure
                .add_chain(chain_with_atoms("Z", "Z", ChainType::Polymer, 1, 1))
                .unwrap_err();
            assert_eq!(err, StructureError::DuplicateAtomSerial(1));
            assert_eq!(structure.size(), before);
        }

        #[test]
        fn add_chain_rejects_duplicate_asym_id() {
            let mut structure = two_chain_structure();
            let err = structure
                .add_chain(chain_with_atoms("A", "Q", ChainType::Polymer, 700, 1))
                .unwrap_err();
            assert_eq!(err, StructureError::DuplicateAsymId("A".into()));
            assert!(structure.locate_atom(700).is_none());
        }

        #[test]
        fn poly_and_non_poly_partition_model_zero() {
            let structure = two_chain_structure();
            let poly: Vec<_> = structure.poly_chains().iter().map(|c| c.asym_id.clone()).collect();
            let non_poly: Vec<_> = structure
                .non_poly_chains()
                .iter()
                .map(|c| c.asym_id.clone())
                .collect();
            assert_eq!(poly, vec!["A"]);
            assert_eq!(non_poly, vec!["B"]);
            assert_eq!(structure.het_groups().len(), 1);
        }

        #[test]
        fn locate_atom_walks_the_hierarchy() {
            let structure = two_chain_structure();
            let (chain, group, atom) = structure.locate_atom(4).unwrap();
            assert_eq!(chain.asym_id, "B");
            assert_eq!(group.name, "HEM");
            assert_eq!(atom.serial, 4);
            assert_eq!(
                structure.atom_location(4),
                Some(AtomLocation {
                    model: 0,
                    chain: 1,
                    group: 0,
                    atom: 0
                })
            );
        }
    }

    mod bonds {
        use super::*;

        #[test]
        fn add_bond_is_idempotent_and_updates_adjacency() {
            let mut structure = two_chain_structure();
            structure.add_bond(Bond::new(1, 2, BondOrder::Single)).unwrap();
            structure.add_bond(Bond::new(2, 1, BondOrder::Single)).unwrap();

            assert_eq!(structure.bonds().len(), 1);
            assert_eq!(structure.bonded_serials(1), &[2]);
            assert_eq!(structure.bonded_serials(2), &[1]);
            assert!(structure.bonded_serials(3).is_empty());
        }

        #[test]
        fn add_bond_keeps_bonds_of_different_kinds_between_one_pair() {
            let mut structure = two_chain_structure();
            structure.add_bond(Bond::new(1, 2, BondOrder::Single)).unwrap();
            structure
                .add_bond(Bond::with_kind(2, 1, BondOrder::Single, BondKind::HydrogenBond))
                .unwrap();
            structure
                .add_bond(Bond::with_kind(1, 2, BondOrder::Single, BondKind::HydrogenBond))
                .unwrap();

            assert_eq!(structure.bonds().len(), 2);
            assert_eq!(structure.bonded_serials(1), &[2]);
            let records = structure.conect_records();
            assert_eq!(records[0].bonded, vec![2]);
            assert_eq!(records[0].hydrogen, vec![2]);
        }

        #[test]
        fn add_bond_rejects_unknown_serial() {
            let mut structure = two_chain_structure();
            let err = structure.add_bond(Bond::new(1, 99, BondOrder::Single)).unwrap_err();
            assert_eq!(err, StructureError::UnknownAtomSerial(99));
            assert!(structure.bonds().is_empty());
        }

        #[test]
        fn set_ssbonds_rebuilds_adjacency() {
            let mut structure = two_chain_structure();
            structure.add_bond(Bond::new(1, 2, BondOrder::Single)).unwrap();
            structure.set_ssbonds(vec![Bond::disulfide(2, 3)]).unwrap();
            assert_eq!(structure.bonded_serials(2), &[3, 1]);

            structure.set_ssbonds(Vec::new()).unwrap();
            assert_eq!(structure.bonded_serials(2), &[1]);
        }

        #[test]
        #[allow(deprecated)]
        fn connections_view_is_derived_from_bonds() {
            let mut structure = two_chain_structure();
            structure.add_ssbond(Bond::disulfide(1, 3)).unwrap();
            structure.add_bond(Bond::new(1, 2, BondOrder::Single)).unwrap();

            let connections = structure.connections();
            assert_eq!(connections.len(), 3);
            assert_eq!(connections[0]["atomserial"], 1);
            assert_eq!(connections[0]["bond1"], 2);
            assert_eq!(connections[0]["bond2"], 3);
        }
    }

    mod identifier {
        use super::*;

        #[test]
        fn identifier_prefers_structure_identifier() {
            let mut structure = two_chain_structure();
            structure.set_name("hemoglobin");
            structure.set_structure_identifier(Some("4hhb.A".parse().unwrap()));
            assert_eq!(structure.get_identifier(), "4hhb.A");
            assert_eq!(structure.ranges(), vec!["A".to_string()]);
        }

        #[test]
        fn identifier_falls_back_to_name() {
            let mut structure = two_chain_structure();
            structure.set_name("hemoglobin");
            assert_eq!(structure.get_identifier(), "hemoglobin");
        }

        #[test]
        fn identifier_is_synthesized_from_model_zero() {
            let mut structure = two_chain_structure();
            structure.add_chain(Chain::new("C", "C", ChainType::Polymer)).unwrap();
            assert_eq!(structure.get_identifier(), "1ABC.A_1-3,A_500-500");
            assert_eq!(structure.residue_ranges().len(), 2);
        }

        #[test]
        fn display_summarizes_models_and_chains() {
            let mut structure = two_chain_structure();
            structure.add_entity_info(EntityInfo::new(3, EntityType::Water));
            let text = structure.to_string();
            assert!(text.starts_with("Structure 1ABC models: 1 entities: 3"));
            assert!(text.contains("Chain asym B auth A (non-polymer): 1 group(s), 1 atom(s)"));
        }
    }
}
