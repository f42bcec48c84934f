//! # Core Module
//!
//! This module holds the structure model and its serializers.
//!
//! ## Overview
//!
//! Structures are built by an external parser, queried through either of the two
//! chain identifier schemes, and written back out as PDB or mmCIF text. Nothing in
//! this module reads files; the only file access is the optional path-based
//! writing of [`io::traits::StructureFile`] and loading a writer configuration.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Models, chains, groups, atoms, entities and metadata
//! - **Serialization** ([`io`]) - Fixed-column PDB and tag-value mmCIF writers
//! - **Chemical Tables** ([`utils`]) - Static residue classification tables

pub mod io;
pub mod models;
pub mod utils;
