use super::error::StructureError;
use super::group::{Group, GroupType, ResidueNumber};
use crate::core::utils::residues;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    Polymer,
    NonPolymer,
}

#[derive(Debug, Error)]
#[error("Invalid chain type string")]
pub struct ParseChainTypeError;

impl FromStr for ChainType {
    type Err = ParseChainTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polymer" | "poly" => Ok(ChainType::Polymer),
            "non-polymer" | "nonpolymer" | "non_polymer" | "nonpoly" => Ok(ChainType::NonPolymer),
            _ => Err(ParseChainTypeError),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChainType::Polymer => "polymer",
                ChainType::NonPolymer => "non-polymer",
            }
        )
    }
}

/// An ordered collection of groups carrying both chain identifiers.
///
/// The polymer classification is fixed at construction: the serializers route
/// every group of a non-polymeric chain to HETATM records, so it must not change
/// once the chain is part of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub asym_id: String,                            // Internal mmCIF label_asym_id
    pub auth_id: String,                            // Public PDB chain identifier
    pub entity_id: Option<u32>,                     // Entity implemented by this chain
    chain_type: ChainType,                          // Immutable polymer classification
    groups: Vec<Group>,                             // Groups in file order
    residue_map: HashMap<ResidueNumber, usize>,     // Residue number to index in `groups`
}

impl Chain {
    pub fn new(asym_id: &str, auth_id: &str, chain_type: ChainType) -> Self {
        Self {
            asym_id: asym_id.to_string(),
            auth_id: auth_id.to_string(),
            entity_id: None,
            chain_type,
            groups: Vec::new(),
            residue_map: HashMap::new(),
        }
    }

    /// Builder-style setter for the entity this chain implements.
    pub fn with_entity(mut self, entity_id: u32) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    pub fn is_polymer(&self) -> bool {
        self.chain_type == ChainType::Polymer
    }

    /// Appends a group to the chain.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::DuplicateResidue`] if the chain is polymeric and a
    /// group with the same residue number and insertion code is already present.
    pub fn add_group(&mut self, group: Group) -> Result<(), StructureError> {
        if self.residue_map.contains_key(&group.residue_number) {
            if self.is_polymer() {
                return Err(StructureError::DuplicateResidue {
                    chain: self.asym_id.clone(),
                    residue_number: group.residue_number.to_string(),
                });
            }
        } else {
            self.residue_map
                .insert(group.residue_number, self.groups.len());
        }
        self.groups.push(group);
        Ok(())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn get_group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Finds the first group carrying the given residue number.
    pub fn find_group(&self, residue_number: &ResidueNumber) -> Option<&Group> {
        self.residue_map
            .get(residue_number)
            .and_then(|&index| self.groups.get(index))
    }

    pub fn atom_count(&self) -> usize {
        self.groups.iter().map(|g| g.atoms().len()).sum()
    }

    pub fn count_groups(&self, group_type: GroupType) -> usize {
        self.groups
            .iter()
            .filter(|g| g.group_type == group_type)
            .count()
    }

    /// Returns the one-letter sequence of the observed groups, skipping waters.
    pub fn atom_sequence(&self) -> String {
        self.groups
            .iter()
            .filter(|g| !g.is_water())
            .map(|g| residues::one_letter_code(&g.name))
            .collect()
    }
}
