//! # Structure Models Module
//!
//! This module contains the in-memory representation of a macromolecular entry,
//! the hierarchy every serializer and query in this crate works against.
//!
//! ## Overview
//!
//! A [`structure::Structure`] owns an ordered list of [`model::Model`]s, each an
//! ordered list of [`chain::Chain`]s, each an ordered list of [`group::Group`]s
//! holding [`atom::Atom`]s. Chains carry two independent identifiers:
//!
//! - **asym id** - the internal mmCIF label, unique within a model
//! - **auth id** - the public PDB label, unique within a model per polymer class
//!
//! Both are indexed separately on every model so either scheme resolves directly.
//!
//! ## Key Components
//!
//! - [`atom`] - Coordinates, element, occupancy and serial of a single atom
//! - [`group`] - Residues and ligands with author residue numbering
//! - [`chain`] - Polymeric or non-polymeric chains with both identifiers
//! - [`model`] - One conformer plus its asym and auth indices
//! - [`structure`] - The root aggregate, atom-serial table, bonds and metadata
//! - [`lookup`] - Chain, group and entity resolution by either identifier
//! - [`entity`] - Molecular entities shared by the chains implementing them
//! - [`header`] - Header, cross-reference, citation and crystal metadata
//! - [`identifier`] - Textual provenance identifiers (`4HHB.A,B_5-100`)
//! - [`topology`] - Bonds and CONECT record derivation
//! - [`error`] - The error type shared by all of the above
//!
//! ## Usage
//!
//! ```ignore
//! use biostruct::core::models::{chain::{Chain, ChainType}, structure::Structure};
//!
//! let mut structure = Structure::new();
//! structure.add_chain(Chain::new("A", "A", ChainType::Polymer).with_entity(1))?;
//! let chain = structure.find_chain("A")?;
//! ```

pub mod atom;
pub mod chain;
pub mod entity;
pub mod error;
pub mod group;
pub mod header;
pub mod identifier;
pub mod lookup;
pub mod model;
pub mod structure;
pub mod topology;

#[cfg(test)]
pub(crate) mod fixtures;
