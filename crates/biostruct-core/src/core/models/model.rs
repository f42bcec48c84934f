use super::chain::Chain;
use super::error::StructureError;
use std::collections::HashMap;

/// One conformer of a structure: an ordered list of chains plus the two
/// identifier indices used to resolve them.
///
/// The asym and auth indices are built independently from the chains as they
/// are added and are never derived from one another; the tie-break between
/// chains sharing an auth id is applied when the auth index is read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    chains: Vec<Chain>,
    asym_index: HashMap<String, usize>,
    auth_index: HashMap<String, Vec<usize>>,
}

impl Model {
    /// Builds a model from chains in order.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::DuplicateAsymId`] if two chains share an asym id,
    /// or [`StructureError::DuplicateAuthId`] if two chains of the same polymer
    /// class share an auth id.
    pub fn new(chains: Vec<Chain>) -> Result<Self, StructureError> {
        let mut model = Self::default();
        for chain in chains {
            model.push_chain(chain)?;
        }
        Ok(model)
    }

    pub(crate) fn push_chain(&mut self, chain: Chain) -> Result<(), StructureError> {
        if self.asym_index.contains_key(&chain.asym_id) {
            return Err(StructureError::DuplicateAsymId(chain.asym_id));
        }
        let clashes = self.auth_index.get(&chain.auth_id).is_some_and(|indices| {
            indices
                .iter()
                .any(|&i| self.chains[i].chain_type() == chain.chain_type())
        });
        if clashes {
            return Err(StructureError::DuplicateAuthId(chain.auth_id));
        }

        let index = self.chains.len();
        self.asym_index.insert(chain.asym_id.clone(), index);
        self.auth_index
            .entry(chain.auth_id.clone())
            .or_default()
            .push(index);
        self.chains.push(chain);
        Ok(())
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn into_chains(self) -> Vec<Chain> {
        self.chains
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn get_chain(&self, index: usize) -> Option<&Chain> {
        self.chains.get(index)
    }

    pub fn chain_by_asym_id(&self, asym_id: &str) -> Option<&Chain> {
        self.asym_index
            .get(asym_id)
            .and_then(|&index| self.chains.get(index))
    }

    /// All chains carrying `auth_id`, polymeric chains first, then in model order.
    pub fn chains_by_auth_id(&self, auth_id: &str) -> Vec<&Chain> {
        let mut matches: Vec<&Chain> = self
            .auth_index
            .get(auth_id)
            .map(|indices| indices.iter().map(|&i| &self.chains[i]).collect())
            .unwrap_or_default();
        matches.sort_by_key(|chain| !chain.is_polymer());
        matches
    }

    /// The chain `auth_id` resolves to: the polymeric one when a ligand chain
    /// shares its author label.
    pub fn chain_by_auth_id(&self, auth_id: &str) -> Option<&Chain> {
        self.chains_by_auth_id(auth_id).into_iter().next()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(Chain::atom_count).sum()
    }
}
