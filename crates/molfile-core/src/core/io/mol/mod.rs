//! MDL Molfile (V2000) reader and writer.
//!
//! A record is three header lines, a counts line, one line per atom, one line
//! per bond and the terminator line. Positions travel in angstrom on the wire
//! and are stored in bohr in memory. Continuous bond orders are collapsed onto
//! the format's bond types by [`discretize`].

pub mod atom_block;
pub mod bond_block;
pub mod discretize;
mod error;
pub(crate) mod fields;
pub mod header;

pub use error::{MolError, MolParseErrorKind};
pub use header::{FormatVersion, HeaderTimestamp, MolHeader};

use super::traits::MolecularFile;
use crate::core::models::atoms::AtomCollection;
use crate::core::models::bond_orders::BondOrderCollection;
use fields::NumberedLines;
use std::io::{BufRead, Write};
use tracing::{debug, instrument, warn};

/// The only format name this codec answers to.
pub const FORMAT: &str = "mol";
/// Last line of every written record.
pub const TERMINATOR: &str = "M END";
/// Largest atom or bond count the 3-character counts fields can hold.
pub const MAX_COUNT: usize = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportType {
    Read,
    Write,
    ReadWrite,
}

impl SupportType {
    /// Whether a codec with this support level can perform `wanted`.
    pub fn covers(self, wanted: SupportType) -> bool {
        self == SupportType::ReadWrite || self == wanted
    }
}

/// Options for [`MolFile::read_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Treat an unrecognized version token as an empty structure instead of
    /// failing.
    pub legacy_version_fallback: bool,
}

impl ReadOptions {
    pub fn builder() -> ReadOptionsBuilder {
        ReadOptionsBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct ReadOptionsBuilder {
    legacy_version_fallback: Option<bool>,
}

impl ReadOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn legacy_version_fallback(mut self, enabled: bool) -> Self {
        self.legacy_version_fallback = Some(enabled);
        self
    }

    pub fn build(self) -> ReadOptions {
        ReadOptions {
            legacy_version_fallback: self.legacy_version_fallback.unwrap_or(false),
        }
    }
}

/// Options for writing: currently the header lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub header: MolHeader,
}

impl WriteOptions {
    pub fn builder() -> WriteOptionsBuilder {
        WriteOptionsBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct WriteOptionsBuilder {
    name: Option<String>,
    initials: Option<String>,
    program: Option<String>,
    comment: Option<String>,
    timestamp: Option<Option<HeaderTimestamp>>,
}

impl WriteOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn molecule_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn initials(mut self, initials: impl Into<String>) -> Self {
        self.initials = Some(initials.into());
        self
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn timestamp(mut self, timestamp: Option<HeaderTimestamp>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Stamps the header with the current UTC time.
    pub fn stamped_now(self) -> Self {
        self.timestamp(Some(HeaderTimestamp::now_utc()))
    }

    pub fn build(self) -> WriteOptions {
        let defaults = MolHeader::default();
        WriteOptions {
            header: MolHeader {
                name: self.name.unwrap_or(defaults.name),
                initials: self.initials.unwrap_or(defaults.initials),
                program: self.program.unwrap_or(defaults.program),
                timestamp: self.timestamp.unwrap_or(defaults.timestamp),
                comment: self.comment.unwrap_or(defaults.comment),
            },
        }
    }
}

/// The Molfile codec.
pub struct MolFile;

impl MolFile {
    pub const NAME: &'static str = "MDL Molfile (V2000)";

    /// Format names handled by this codec and what it can do with each.
    pub fn formats() -> &'static [(&'static str, SupportType)] {
        &[(FORMAT, SupportType::ReadWrite)]
    }

    pub fn supports(format: &str, wanted: SupportType) -> bool {
        Self::formats()
            .iter()
            .any(|&(name, support)| name == format && support.covers(wanted))
    }

    /// Reads one record, keeping its header lines.
    ///
    /// # Errors
    ///
    /// - [`MolError::FormatMismatch`] if no counts line is found, a declared
    ///   atom or bond line is missing or malformed, an element symbol is
    ///   unknown, or the version token is unrecognized (unless
    ///   [`ReadOptions::legacy_version_fallback`] is set).
    /// - [`MolError::NotImplemented`] for V3000 records.
    /// - [`MolError::Io`] if the reader fails.
    #[instrument(skip_all, name = "mol_read")]
    pub fn read_with(
        reader: &mut impl BufRead,
        options: &ReadOptions,
    ) -> Result<(AtomCollection, BondOrderCollection, MolHeader), MolError> {
        let mut lines = NumberedLines::new(reader);
        let header = header::read_header(&mut lines)?;
        let counts = header::scan_counts_line(&mut lines)?;

        match counts.version {
            FormatVersion::V2000 => {}
            FormatVersion::V3000 => {
                return Err(MolError::NotImplemented(FormatVersion::V3000.to_string()));
            }
            FormatVersion::Other(token) => {
                if options.legacy_version_fallback {
                    warn!(
                        line_no = counts.line_no,
                        version = %token,
                        "Unrecognized version, returning an empty structure"
                    );
                    return Ok((AtomCollection::new(), BondOrderCollection::new(), header));
                }
                return Err(MolError::mismatch(
                    counts.line_no,
                    MolParseErrorKind::UnrecognizedVersion(token),
                ));
            }
        }

        let atoms = atom_block::read_atom_block(&mut lines, counts.atom_count)?;
        let bonds = bond_block::read_bond_block(&mut lines, counts.atom_count, counts.bond_count)?;
        debug!(atoms = atoms.len(), bonds = bonds.len(), "Read molfile");

        Ok((atoms, bonds, header))
    }

    /// Writes one record with the given header lines.
    ///
    /// # Errors
    ///
    /// - [`MolError::Inconsistency`] if `bonds` is sized for a different number
    ///   of atoms, or a header line contains a line break.
    /// - [`MolError::FieldOverflow`] if a count, coordinate, the initials or
    ///   the program name does not fit its fixed-width field.
    /// - [`MolError::Io`] if the writer fails.
    #[instrument(skip_all, name = "mol_write")]
    pub fn write_with_header(
        writer: &mut impl Write,
        atoms: &AtomCollection,
        bonds: Option<&BondOrderCollection>,
        header: &MolHeader,
    ) -> Result<(), MolError> {
        if let Some(bonds) = bonds {
            if bonds.system_size() != atoms.len() {
                return Err(MolError::Inconsistency(format!(
                    "bond table is sized for {} atoms but the structure has {}",
                    bonds.system_size(),
                    atoms.len()
                )));
            }
        }

        let valences = discretize::valences(atoms.len(), bonds);
        let emitted = discretize::emitted_bonds(bonds);

        for (count, what) in [(atoms.len(), "atom count"), (emitted.len(), "bond count")] {
            if count > MAX_COUNT {
                return Err(MolError::FieldOverflow(format!(
                    "{} {} exceeds {}",
                    what, count, MAX_COUNT
                )));
            }
        }

        debug_assert_eq!(
            valences.iter().map(|&v| v as usize).sum::<usize>(),
            2 * emitted.len(),
            "valence window and bond-line rounding must select the same pairs"
        );

        header::write_header(writer, header)?;
        header::write_counts_line(writer, atoms.len(), emitted.len())?;
        atom_block::write_atom_block(writer, atoms, &valences)?;
        bond_block::write_bond_block(writer, &emitted)?;
        writeln!(writer, "{}", TERMINATOR)?;

        debug!(atoms = atoms.len(), bonds = emitted.len(), "Wrote molfile");
        Ok(())
    }
}

impl MolecularFile for MolFile {
    type Metadata = MolHeader;
    type Error = MolError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(AtomCollection, BondOrderCollection, Self::Metadata), Self::Error> {
        Self::read_with(reader, &ReadOptions::default())
    }

    fn write_to(
        atoms: &AtomCollection,
        bonds: Option<&BondOrderCollection>,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        Self::write_with_header(writer, atoms, bonds, metadata)
    }

    fn write_system_to(
        atoms: &AtomCollection,
        bonds: Option<&BondOrderCollection>,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        Self::write_with_header(writer, atoms, bonds, &MolHeader::default())
    }
}

fn ensure_format(format: &str) -> Result<(), MolError> {
    if format != FORMAT {
        return Err(MolError::FormatUnsupported {
            format: format.to_string(),
        });
    }
    Ok(())
}

/// Reads a V2000 record. `format` must be `"mol"`; anything else fails before
/// the reader is touched.
pub fn read(
    reader: &mut impl BufRead,
    format: &str,
) -> Result<(AtomCollection, BondOrderCollection), MolError> {
    ensure_format(format)?;
    let (atoms, bonds, _) = MolFile::read_with(reader, &ReadOptions::default())?;
    Ok((atoms, bonds))
}

/// Writes a V2000 record with a default header. `format` must be `"mol"`;
/// anything else fails before the writer is touched. Without `bonds` the
/// record has no bond lines and every valence is zero.
pub fn write(
    writer: &mut impl Write,
    format: &str,
    atoms: &AtomCollection,
    bonds: Option<&BondOrderCollection>,
) -> Result<(), MolError> {
    ensure_format(format)?;
    MolFile::write_with_header(writer, atoms, bonds, &MolHeader::default())
}
