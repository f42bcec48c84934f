use std::fmt;
use thiserror::Error;

/// The two independent chain-naming schemes carried by PDB-family data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdScheme {
    /// Internal mmCIF `label_asym_id`.
    Asym,
    /// Public, legacy-PDB `auth_asym_id`.
    Auth,
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                IdScheme::Asym => "asym",
                IdScheme::Auth => "auth",
            }
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("{what} index {index} is out of range (size {len})")]
    Index {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("No chain with {scheme} id '{id}' in model {model}")]
    ChainNotFound {
        scheme: IdScheme,
        id: String,
        model: usize,
    },

    #[error("No group with residue number '{residue_number}' in chain '{chain}' (model {model})")]
    GroupNotFound {
        chain: String,
        residue_number: String,
        model: usize,
    },

    #[error("No entity with id {0}")]
    EntityNotFound(u32),

    #[error("Duplicate asym id '{0}' within a model")]
    DuplicateAsymId(String),

    #[error("Duplicate auth id '{0}' among chains of the same class within a model")]
    DuplicateAuthId(String),

    #[error("Duplicate residue '{residue_number}' in polymeric chain '{chain}'")]
    DuplicateResidue {
        chain: String,
        residue_number: String,
    },

    #[error("Duplicate atom serial {0}")]
    DuplicateAtomSerial(usize),

    #[error("Atom serial {0} is not present in the structure")]
    UnknownAtomSerial(usize),

    #[error("Invalid residue number '{0}'")]
    InvalidResidueNumber(String),
}

impl StructureError {
    pub(crate) fn index(what: &'static str, index: usize, len: usize) -> Self {
        Self::Index { what, index, len }
    }

    pub(crate) fn chain_not_found(scheme: IdScheme, id: &str, model: usize) -> Self {
        Self::ChainNotFound {
            scheme,
            id: id.to_string(),
            model,
        }
    }
}
