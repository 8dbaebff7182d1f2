//! # Workflows Module
//!
//! High-level procedures built on the Molfile codec. These are the entry
//! points used by the command-line interface.
//!
//! - **Conversion** ([`convert`]) - Read a Molfile and write it back in normalised form,
//!   optionally renamed or without bonds.
//! - **Inspection** ([`inspect`]) - Summarise a structure: formula, bond types, bounding box.
//! - **Validation** ([`validate`]) - Check many files in parallel with progress reporting.

pub mod convert;
pub mod error;
pub mod inspect;
pub mod progress;
pub mod validate;
