use super::config::WriterConfig;
use crate::core::models::structure::Structure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Defines the interface for serializing a structure into a text format.
///
/// Implementors render the whole document in memory; the provided methods only
/// touch their sink once rendering has succeeded, so a failed call never leaves
/// partial output behind.
pub trait StructureFile {
    /// The error type for serialization and I/O failures.
    type Error: Error + From<io::Error>;

    /// Renders a structure into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented in the target format
    /// or the structure references atoms it does not contain.
    fn write_to_string(structure: &Structure, config: &WriterConfig)
    -> Result<String, Self::Error>;

    /// Writes a structure to a writer.
    ///
    /// # Arguments
    ///
    /// * `structure` - The structure to write.
    /// * `config` - Serializer options.
    /// * `writer` - The writer to output to.
    fn write_to(
        structure: &Structure,
        config: &WriterConfig,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let text = Self::write_to_string(structure, config)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Writes a structure to a writer with the default options.
    fn write_structure_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::write_to(structure, &WriterConfig::default(), writer)
    }

    /// Writes a structure to a file path.
    ///
    /// The file is only created once the document has been rendered.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails, or the file cannot be created or written.
    fn write_to_path<P: AsRef<Path>>(
        structure: &Structure,
        config: &WriterConfig,
        path: P,
    ) -> Result<(), Self::Error> {
        let text = Self::write_to_string(structure, config)?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
