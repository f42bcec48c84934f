//! Chain, group and entity resolution by either identifier scheme.
//!
//! Lookups by asym id scan every chain of the model. Lookups by auth id go
//! through [`Model::chains_by_auth_id`], which is the only place the
//! prefer-polymeric tie-break is applied.

use super::chain::Chain;
use super::entity::EntityInfo;
use super::error::{IdScheme, StructureError};
use super::group::{Group, ResidueNumber};
use super::model::Model;
use super::structure::Structure;

impl Structure {
    fn default_model(&self, scheme: IdScheme, id: &str) -> Result<&Model, StructureError> {
        self.models()
            .first()
            .ok_or_else(|| StructureError::chain_not_found(scheme, id, 0))
    }

    // ---- Positional ----

    /// The chain at `position` in model 0.
    pub fn get_chain(&self, position: usize) -> Result<&Chain, StructureError> {
        self.get_chain_in_model(0, position)
    }

    /// # Errors
    ///
    /// Returns [`StructureError::Index`] if either `model` or `position` is out of range.
    pub fn get_chain_in_model(&self, model: usize, position: usize) -> Result<&Chain, StructureError> {
        let m = self.get_model(model)?;
        m.get_chain(position)
            .ok_or_else(|| StructureError::index("chain", position, m.len()))
    }

    // ---- By asym id ----

    pub fn get_chain_by_asym_id(&self, asym_id: &str) -> Result<&Chain, StructureError> {
        self.default_model(IdScheme::Asym, asym_id)?
            .chain_by_asym_id(asym_id)
            .ok_or_else(|| StructureError::chain_not_found(IdScheme::Asym, asym_id, 0))
    }

    pub fn get_chain_by_asym_id_in_model(
        &self,
        asym_id: &str,
        model: usize,
    ) -> Result<&Chain, StructureError> {
        self.get_model(model)?
            .chain_by_asym_id(asym_id)
            .ok_or_else(|| StructureError::chain_not_found(IdScheme::Asym, asym_id, model))
    }

    // ---- By auth id ----

    /// Resolves a public chain id in model 0, preferring the polymeric chain when
    /// a ligand chain carries the same label.
    pub fn find_chain(&self, auth_id: &str) -> Result<&Chain, StructureError> {
        self.default_model(IdScheme::Auth, auth_id)?
            .chain_by_auth_id(auth_id)
            .ok_or_else(|| StructureError::chain_not_found(IdScheme::Auth, auth_id, 0))
    }

    pub fn find_chain_in_model(&self, auth_id: &str, model: usize) -> Result<&Chain, StructureError> {
        self.get_model(model)?
            .chain_by_auth_id(auth_id)
            .ok_or_else(|| StructureError::chain_not_found(IdScheme::Auth, auth_id, model))
    }

    #[deprecated(note = "use `find_chain` instead")]
    pub fn get_chain_by_pdb(&self, auth_id: &str) -> Result<&Chain, StructureError> {
        self.find_chain(auth_id)
    }

    #[deprecated(note = "use `find_chain_in_model` instead")]
    pub fn get_chain_by_pdb_in_model(
        &self,
        auth_id: &str,
        model: usize,
    ) -> Result<&Chain, StructureError> {
        self.find_chain_in_model(auth_id, model)
    }

    /// Whether model 0 holds a chain with this public id.
    pub fn has_chain(&self, auth_id: &str) -> bool {
        self.find_chain(auth_id).is_ok()
    }

    // ---- Groups ----

    /// Finds a group by public chain id and author residue number (`"42"`, `"42A"`).
    pub fn find_group(&self, auth_id: &str, residue_number: &str) -> Result<&Group, StructureError> {
        let model = self.default_model(IdScheme::Auth, auth_id)?;
        group_in(model, auth_id, residue_number, 0)
    }

    /// # Errors
    ///
    /// Returns [`StructureError::Index`] for a missing model,
    /// [`StructureError::ChainNotFound`] when no chain carries `auth_id`,
    /// [`StructureError::InvalidResidueNumber`] for an unparseable residue number
    /// and [`StructureError::GroupNotFound`] when the chain holds no such residue.
    pub fn find_group_in_model(
        &self,
        auth_id: &str,
        residue_number: &str,
        model: usize,
    ) -> Result<&Group, StructureError> {
        group_in(self.get_model(model)?, auth_id, residue_number, model)
    }

    // ---- Classification-narrowed lookups ----

    pub fn get_poly_chain(&self, asym_id: &str) -> Result<&Chain, StructureError> {
        narrow(self.get_chain_by_asym_id(asym_id), true, IdScheme::Asym, asym_id, 0)
    }

    pub fn get_poly_chain_in_model(&self, asym_id: &str, model: usize) -> Result<&Chain, StructureError> {
        narrow(
            self.get_chain_by_asym_id_in_model(asym_id, model),
            true,
            IdScheme::Asym,
            asym_id,
            model,
        )
    }

    pub fn get_non_poly_chain(&self, asym_id: &str) -> Result<&Chain, StructureError> {
        narrow(self.get_chain_by_asym_id(asym_id), false, IdScheme::Asym, asym_id, 0)
    }

    pub fn get_non_poly_chain_in_model(
        &self,
        asym_id: &str,
        model: usize,
    ) -> Result<&Chain, StructureError> {
        narrow(
            self.get_chain_by_asym_id_in_model(asym_id, model),
            false,
            IdScheme::Asym,
            asym_id,
            model,
        )
    }

    /// The polymeric chain with this public id in model 0.
    pub fn get_poly_chain_by_pdb(&self, auth_id: &str) -> Result<&Chain, StructureError> {
        let model = self.default_model(IdScheme::Auth, auth_id)?;
        auth_of_class(model, auth_id, true, 0)
    }

    pub fn get_poly_chain_by_pdb_in_model(
        &self,
        auth_id: &str,
        model: usize,
    ) -> Result<&Chain, StructureError> {
        auth_of_class(self.get_model(model)?, auth_id, true, model)
    }

    /// The non-polymeric chain with this public id in model 0. Unlike
    /// [`Structure::find_chain`] this reaches a ligand chain that shares its
    /// label with a polymer.
    pub fn get_non_poly_chain_by_pdb(&self, auth_id: &str) -> Result<&Chain, StructureError> {
        let model = self.default_model(IdScheme::Auth, auth_id)?;
        auth_of_class(model, auth_id, false, 0)
    }

    pub fn get_non_poly_chain_by_pdb_in_model(
        &self,
        auth_id: &str,
        model: usize,
    ) -> Result<&Chain, StructureError> {
        auth_of_class(self.get_model(model)?, auth_id, false, model)
    }

    // ---- Entities ----

    pub fn get_entity_by_id(&self, entity_id: u32) -> Result<&EntityInfo, StructureError> {
        self.entity_infos()
            .iter()
            .find(|e| e.id == entity_id)
            .ok_or(StructureError::EntityNotFound(entity_id))
    }

    #[deprecated(note = "use `get_entity_by_id` instead")]
    pub fn get_compound_by_id(&self, entity_id: u32) -> Result<&EntityInfo, StructureError> {
        self.get_entity_by_id(entity_id)
    }

    /// Chains of model 0 implementing the given entity.
    pub fn chains_of_entity(&self, entity_id: u32) -> Vec<&Chain> {
        self.chains()
            .iter()
            .filter(|c| c.entity_id == Some(entity_id))
            .collect()
    }
}

fn parse_residue_number(text: &str) -> Result<ResidueNumber, StructureError> {
    text.parse()
        .map_err(|_| StructureError::InvalidResidueNumber(text.to_string()))
}

// The chain is resolved before the residue number is parsed. Candidates are
// tried in tie-break order, so a residue present in the chain `find_chain`
// resolves to always wins.
fn group_in<'a>(
    model: &'a Model,
    auth_id: &str,
    residue_number: &str,
    model_idx: usize,
) -> Result<&'a Group, StructureError> {
    let candidates = model.chains_by_auth_id(auth_id);
    if candidates.is_empty() {
        return Err(StructureError::chain_not_found(IdScheme::Auth, auth_id, model_idx));
    }
    let number = parse_residue_number(residue_number)?;
    candidates
        .into_iter()
        .find_map(|chain| chain.find_group(&number))
        .ok_or_else(|| StructureError::GroupNotFound {
            chain: auth_id.to_string(),
            residue_number: number.to_string(),
            model: model_idx,
        })
}

fn narrow<'a>(
    found: Result<&'a Chain, StructureError>,
    polymer: bool,
    scheme: IdScheme,
    id: &str,
    model: usize,
) -> Result<&'a Chain, StructureError> {
    match found {
        Ok(chain) if chain.is_polymer() == polymer => Ok(chain),
        Ok(_) => Err(StructureError::chain_not_found(scheme, id, model)),
        Err(err) => Err(err),
    }
}

fn auth_of_class<'a>(
    model: &'a Model,
    auth_id: &str,
    polymer: bool,
    model_idx: usize,
) -> Result<&'a Chain, StructureError> {
    model
        .chains_by_auth_id(auth_id)
        .into_iter()
        .find(|c| c.is_polymer() == polymer)
        .ok_or_else(|| StructureError::chain_not_found(IdScheme::Auth, auth_id, model_idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::ChainType;
    use crate::core::models::fixtures::{chain_with_atoms, two_chain_structure};

    fn structure_with_insertion_codes() -> Structure {
        let mut chain = Chain::new("A", "A", ChainType::Polymer).with_entity(1);
        for (seq, ins) in [(41, None), (42, None), (42, Some('A')), (43, None)] {
            chain
                .add_group(Group::new("GLY", ResidueNumber::new(seq, ins)))
                .unwrap();
        }
        let mut structure = Structure::new();
        structure.add_model(vec![chain]).unwrap();
        structure
    }

    mod chains {
        use super::*;

        #[test]
        fn find_chain_prefers_polymer_when_auth_ids_collide() {
            let structure = two_chain_structure();
            let chain = structure.find_chain("A").unwrap();
            assert_eq!(chain.asym_id, "A");
            assert!(chain.is_polymer());
            assert!(structure.has_chain("A"));
            assert!(!structure.has_chain("B"));
        }

        #[test]
        fn get_chain_by_asym_id_reaches_ligand_chain() {
            let structure = two_chain_structure();
            let ligand = structure.get_chain_by_asym_id_in_model("B", 0).unwrap();
            assert_eq!(ligand.asym_id, "B");
            assert!(!ligand.is_polymer());
            assert_eq!(structure.get_chain_by_asym_id("B").unwrap(), ligand);
        }

        #[test]
        fn asym_and_auth_namespaces_are_independent() {
            let structure = two_chain_structure();
            let err = structure.find_chain("B").unwrap_err();
            assert_eq!(err, StructureError::chain_not_found(IdScheme::Auth, "B", 0));
            let err = structure.get_chain_by_asym_id("C").unwrap_err();
            assert_eq!(err, StructureError::chain_not_found(IdScheme::Asym, "C", 0));
        }

        #[test]
        fn positional_lookup_reports_index_errors() {
            let structure = two_chain_structure();
            assert_eq!(structure.get_chain(1).unwrap().asym_id, "B");
            assert_eq!(
                structure.get_chain(2).unwrap_err(),
                StructureError::index("chain", 2, 2)
            );
            assert_eq!(
                structure.get_chain_in_model(1, 0).unwrap_err(),
                StructureError::index("model", 1, 1)
            );
        }

        #[test]
        fn in_model_lookups_report_missing_model_as_index_error() {
            let structure = two_chain_structure();
            assert!(matches!(
                structure.find_chain_in_model("A", 4),
                Err(StructureError::Index { index: 4, .. })
            ));
            assert!(matches!(
                structure.get_chain_by_asym_id_in_model("A", 4),
                Err(StructureError::Index { .. })
            ));
        }

        #[test]
        fn model_less_structure_reports_chain_not_found() {
            let mut structure = two_chain_structure();
            structure.reset_models();
            assert!(matches!(
                structure.find_chain("A"),
                Err(StructureError::ChainNotFound { .. })
            ));
            assert!(!structure.has_chain("A"));
        }

        #[test]
        fn lookups_resolve_in_later_models() {
            let mut structure = two_chain_structure();
            structure
                .add_model(vec![chain_with_atoms("X", "Y", ChainType::Polymer, 100, 2)])
                .unwrap();
            assert_eq!(structure.find_chain_in_model("Y", 1).unwrap().asym_id, "X");
            assert!(structure.find_chain_in_model("A", 1).is_err());
        }

        #[test]
        #[allow(deprecated)]
        fn deprecated_aliases_match_find_chain() {
            let structure = two_chain_structure();
            assert_eq!(
                structure.get_chain_by_pdb("A").unwrap(),
                structure.find_chain("A").unwrap()
            );
            assert_eq!(
                structure.get_chain_by_pdb_in_model("A", 0).unwrap(),
                structure.find_chain("A").unwrap()
            );
        }
    }

    mod narrowed {
        use super::*;

        #[test]
        fn wrong_classification_is_reported_as_not_found() {
            let structure = two_chain_structure();
            assert!(structure.get_poly_chain("A").is_ok());
            assert!(matches!(
                structure.get_poly_chain("B"),
                Err(StructureError::ChainNotFound { .. })
            ));
            assert!(structure.get_non_poly_chain("B").is_ok());
            assert!(structure.get_non_poly_chain("A").is_err());
            assert!(structure.get_non_poly_chain_in_model("B", 0).is_ok());
            assert!(structure.get_poly_chain_in_model("B", 0).is_err());
        }

        #[test]
        fn by_pdb_variants_reach_either_chain_sharing_a_label() {
            let structure = two_chain_structure();
            assert_eq!(structure.get_poly_chain_by_pdb("A").unwrap().asym_id, "A");
            assert_eq!(structure.get_non_poly_chain_by_pdb("A").unwrap().asym_id, "B");
            assert!(structure.get_poly_chain_by_pdb("Z").is_err());
            assert!(structure.get_non_poly_chain_by_pdb_in_model("A", 0).is_ok());
            assert!(structure.get_poly_chain_by_pdb_in_model("A", 2).is_err());
        }
    }

    mod groups {
        use super::*;

        #[test]
        fn find_group_matches_insertion_code() {
            let structure = structure_with_insertion_codes();
            let group = structure.find_group("A", "42A").unwrap();
            assert_eq!(group.residue_number, ResidueNumber::new(42, Some('A')));
            let plain = structure.find_group("A", "42").unwrap();
            assert_eq!(plain.residue_number.ins_code, None);
        }

        #[test]
        fn find_group_reports_missing_residue() {
            let structure = structure_with_insertion_codes();
            let err = structure.find_group("A", "999").unwrap_err();
            assert_eq!(
                err,
                StructureError::GroupNotFound {
                    chain: "A".into(),
                    residue_number: "999".into(),
                    model: 0,
                }
            );
        }

        #[test]
        fn find_group_propagates_missing_chain() {
            let structure = structure_with_insertion_codes();
            assert!(matches!(
                structure.find_group("Q", "42"),
                Err(StructureError::ChainNotFound { .. })
            ));
        }

        #[test]
        fn find_group_rejects_malformed_residue_number() {
            let structure = structure_with_insertion_codes();
            assert_eq!(
                structure.find_group("A", "4x2").unwrap_err(),
                StructureError::InvalidResidueNumber("4x2".into())
            );
        }

        #[test]
        fn find_group_resolves_chain_before_residue_number() {
            let structure = structure_with_insertion_codes();
            assert!(matches!(
                structure.find_group("Q", "x"),
                Err(StructureError::ChainNotFound { .. })
            ));
            assert!(matches!(
                structure.find_group_in_model("Q", "x", 0),
                Err(StructureError::ChainNotFound { .. })
            ));
        }

        #[test]
        fn find_group_reaches_ligand_sharing_the_auth_id() {
            let structure = two_chain_structure();
            assert_eq!(structure.find_group("A", "2").unwrap().name, "ALA");
            assert_eq!(structure.find_group("A", "500").unwrap().name, "HEM");
            assert_eq!(structure.find_group_in_model("A", "500", 0).unwrap().name, "HEM");
        }
    }

    mod entities {
        use super::*;

        #[test]
        fn entity_lookup_by_id() {
            let structure = two_chain_structure();
            assert_eq!(
                structure.get_entity_by_id(2).unwrap().description.as_deref(),
                Some("HEME")
            );
            assert_eq!(
                structure.get_entity_by_id(9).unwrap_err(),
                StructureError::EntityNotFound(9)
            );
            let chains = structure.chains_of_entity(1);
            assert_eq!(chains.len(), 1);
            assert_eq!(chains[0].asym_id, "A");
        }

        #[test]
        #[allow(deprecated)]
        fn compound_alias_matches_entity_lookup() {
            let structure = two_chain_structure();
            assert_eq!(
                structure.get_compound_by_id(1).unwrap(),
                structure.get_entity_by_id(1).unwrap()
            );
        }
    }
}
