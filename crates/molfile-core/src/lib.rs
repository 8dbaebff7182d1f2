//! # Molfile Core Library
//!
//! Reading and writing of MDL Molfiles (V2000 connection tables) against a
//! small, strongly typed structure model.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomCollection`,
//!   `BondOrderCollection`, `ElementType`), unit conversion and the Molfile codec
//!   itself. Positions are kept in bohr internally and written in angstrom.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the codec:
//!   converting a file into normalised form, summarising a structure and
//!   validating batches of files in parallel.
//!
//! ## Example
//!
//! ```
//! use molfile::core::io::mol;
//! use std::io::Cursor;
//!
//! let text = "\
//! H2
//!   MOLFILE
//!
//!   2  1  0  0  0  0  0  0  0  0999 V2000
//!     0.0000    0.0000    0.0000   H 0  0  0  0  0  1  0  0  0  0  0  0
//!     0.7400    0.0000    0.0000   H 0  0  0  0  0  1  0  0  0  0  0  0
//!   1  2  1  0  0  0  0  0
//! M END
//! ";
//! let (atoms, bonds) = mol::read(&mut Cursor::new(text), "mol").unwrap();
//! assert_eq!(atoms.len(), 2);
//! assert_eq!(bonds.order(0, 1), 1.0);
//!
//! let mut out = Vec::new();
//! mol::write(&mut out, "mol", &atoms, Some(&bonds)).unwrap();
//! assert!(String::from_utf8(out).unwrap().ends_with("M END\n"));
//! ```

pub mod core;
pub mod workflows;
