//! Provides input/output functionality for molecular file formats.
//!
//! The [`mol`] module reads and writes MDL Molfiles (V2000 connection tables).
//! Format implementations share the [`traits::MolecularFile`] interface, which
//! also supplies path-based convenience methods.

pub mod mol;
pub mod traits;
