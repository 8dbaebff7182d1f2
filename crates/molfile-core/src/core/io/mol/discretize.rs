//! Collapses continuous bond orders onto the V2000 bond-type encoding.
//!
//! The format knows only bond types 1, 2 and 3, so two separate decisions are
//! made when writing: whether a pair counts towards the valence column of the
//! atom block, and whether it is written as a bond line at all. The first is a
//! half-open window, the second rounds to the nearest bond type.

use crate::core::models::bond_orders::BondOrderCollection;

/// Inclusive lower bound of the window in which a pair counts as bonded.
pub const BONDED_MIN_ORDER: f64 = 0.5;
/// Exclusive upper bound of the window in which a pair counts as bonded.
pub const BONDED_MAX_ORDER: f64 = 3.5;

/// Valence-counting policy: `true` iff `order` lies in `[0.5, 3.5)`.
#[inline]
pub fn counts_as_bonded(order: f64) -> bool {
    (BONDED_MIN_ORDER..BONDED_MAX_ORDER).contains(&order)
}

/// Bond-line emission policy.
///
/// Rounds `order` half away from zero and returns the result if it is a bond
/// type the format can express (1, 2 or 3). Anything rounding to 0 or to 4 and
/// above is not written.
#[inline]
pub fn emitted_bond_type(order: f64) -> Option<u8> {
    let rounded = order.round();
    if rounded > 0.0 && rounded < 4.0 {
        Some(rounded as u8)
    } else {
        None
    }
}

/// Per-atom count of partners that satisfy [`counts_as_bonded`].
pub fn valences(atom_count: usize, bonds: Option<&BondOrderCollection>) -> Vec<u32> {
    let mut valences = vec![0u32; atom_count];
    if let Some(bonds) = bonds {
        for (i, j, order) in bonds.iter() {
            if i < atom_count && j < atom_count && counts_as_bonded(order) {
                valences[i] += 1;
                valences[j] += 1;
            }
        }
    }
    valences
}

/// Pairs (0-based, `i < j`) that will be written as bond lines, with their type.
pub fn emitted_bonds(bonds: Option<&BondOrderCollection>) -> Vec<(usize, usize, u8)> {
    bonds
        .map(|bonds| {
            bonds
                .iter()
                .filter_map(|(i, j, order)| emitted_bond_type(order).map(|t| (i, j, t)))
                .collect()
        })
        .unwrap_or_default()
}
