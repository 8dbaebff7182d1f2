//! # Core Module
//!
//! Stateless building blocks: the in-memory structure model, the Molfile
//! codec and unit helpers.
//!
//! - **Molecular Representation** ([`models`]) - Element identities, atom collections and bond-order tables
//! - **File I/O** ([`io`]) - Reading and writing MDL Molfiles
//! - **Utilities** ([`utils`]) - Length unit conversion between bohr and angstrom

pub mod io;
pub mod models;
pub mod utils;
