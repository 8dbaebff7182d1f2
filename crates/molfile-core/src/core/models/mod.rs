//! # Core Models Module
//!
//! In-memory molecular representation consumed and produced by the file codecs.
//!
//! ## Key Components
//!
//! - [`element`] - Element identities and the symbol translator
//! - [`atoms`] - [`AtomCollection`](atoms::AtomCollection): elements plus positions in bohr
//! - [`bond_orders`] - [`BondOrderCollection`](bond_orders::BondOrderCollection): sparse,
//!   symmetric pairwise bond orders
//!
//! ## Usage
//!
//! ```
//! use molfile::core::models::{atoms::AtomCollection, bond_orders::BondOrderCollection};
//! use molfile::core::models::element::Element;
//! use nalgebra::Point3;
//!
//! let mut atoms = AtomCollection::new();
//! atoms.push(Element::H.into(), Point3::new(0.0, 0.0, 0.0));
//! atoms.push(Element::H.into(), Point3::new(1.4, 0.0, 0.0));
//!
//! let mut bonds = BondOrderCollection::with_size(atoms.len());
//! bonds.set_order(0, 1, 1.0).unwrap();
//! assert_eq!(bonds.order(1, 0), 1.0);
//! ```

pub mod atoms;
pub mod bond_orders;
pub mod element;
