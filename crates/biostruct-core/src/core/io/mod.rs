//! Provides serialization of structures into the PDB and mmCIF text formats.
//!
//! Both writers implement the [`traits::StructureFile`] interface, share the
//! [`config::WriterConfig`] options and fail with [`error::WriteError`]. The PDB
//! writer labels chains by their auth id in fixed columns; the mmCIF writer
//! keys everything by asym id and keeps the auth id alongside.

pub mod config;
pub mod error;
pub mod mmcif;
pub mod pdb;
pub mod traits;
