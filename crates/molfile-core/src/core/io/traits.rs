use crate::core::models::atoms::AtomCollection;
use crate::core::models::bond_orders::BondOrderCollection;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing molecular file formats.
///
/// A structure is exchanged as an [`AtomCollection`] plus a
/// [`BondOrderCollection`] sized to it. Implementors handle format-specific
/// parsing and serialization and may carry extra per-file information in
/// [`Metadata`](Self::Metadata).
pub trait MolecularFile {
    /// The type of metadata associated with the file format.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Return
    ///
    /// Returns the atoms, the bond table and the file's metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(AtomCollection, BondOrderCollection, Self::Metadata), Self::Error>;

    /// Writes a structure and metadata to a writer.
    ///
    /// `bonds` may be omitted to write an atom-only record.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or I/O operations encounter issues.
    fn write_to(
        atoms: &AtomCollection,
        bonds: Option<&BondOrderCollection>,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a structure to a writer with default metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or I/O operations encounter issues.
    fn write_system_to(
        atoms: &AtomCollection,
        bonds: Option<&BondOrderCollection>,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(AtomCollection, BondOrderCollection, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a structure and metadata to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        atoms: &AtomCollection,
        bonds: Option<&BondOrderCollection>,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(atoms, bonds, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes a structure to a file path with default metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_system_to_path<P: AsRef<Path>>(
        atoms: &AtomCollection,
        bonds: Option<&BondOrderCollection>,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_system_to(atoms, bonds, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
