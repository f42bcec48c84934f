//! # Biostruct Library
//!
//! An in-memory model of macromolecular structures with faithful PDB and mmCIF
//! serialization.
//!
//! ## Architectural Philosophy
//!
//! - **Two identifier schemes, both live.** Every chain carries an internal asym id
//!   and a public auth id. Neither is derived from the other, and lookups accept
//!   either, so a structure read from one format can be written to the other without
//!   losing the pairing.
//!
//! - **Serialization never guesses.** Values that do not fit a fixed-width PDB
//!   column fail the call instead of being truncated, and bonds naming atoms the
//!   structure does not hold are reported rather than dropped.
//!
//! Everything lives under [`core`]: the data model in [`core::models`] and the
//! writers in [`core::io`].

pub mod core;
