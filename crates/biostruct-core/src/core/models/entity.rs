use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Polymer,
    NonPolymer,
    Water,
    Branched,
    Macrolide,
}

impl EntityType {
    /// The `_entity.type` vocabulary term.
    pub fn cif_name(&self) -> &'static str {
        match self {
            EntityType::Polymer => "polymer",
            EntityType::NonPolymer => "non-polymer",
            EntityType::Water => "water",
            EntityType::Branched => "branched",
            EntityType::Macrolide => "macrolide",
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid entity type string")]
pub struct ParseEntityTypeError;

impl FromStr for EntityType {
    type Err = ParseEntityTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polymer" => Ok(EntityType::Polymer),
            "non-polymer" | "nonpolymer" => Ok(EntityType::NonPolymer),
            "water" => Ok(EntityType::Water),
            "branched" => Ok(EntityType::Branched),
            "macrolide" => Ok(EntityType::Macrolide),
            _ => Err(ParseEntityTypeError),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cif_name())
    }
}

/// A distinct molecule implemented by one or more chains.
///
/// Chains refer to their entity by `id` (see [`Chain::entity_id`](super::chain::Chain)),
/// so the entity list stays the single owner and lives as long as the structure.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: u32,
    pub entity_type: EntityType,
    pub description: Option<String>,
}

impl EntityInfo {
    pub fn new(id: u32, entity_type: EntityType) -> Self {
        Self {
            id,
            entity_type,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}
