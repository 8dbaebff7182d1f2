use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BondError {
    #[error("Atom pair ({i}, {j}) is out of range for a system of {size} atoms")]
    IndexOutOfRange { i: usize, j: usize, size: usize },
    #[error("An atom cannot be bonded to itself (index {0})")]
    SelfBond(usize),
    #[error("Bond order must be finite and non-negative (got {0})")]
    InvalidOrder(f64),
}

/// A sparse, symmetric table of bond orders between atom pairs.
///
/// Pairs are stored once as `(min, max)`, so `order(i, j)` and `order(j, i)`
/// always agree. Unset pairs have order `0.0`. The table is sized to an atom
/// count and rejects pairs outside `[0, size)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BondOrderCollection {
    size: usize,
    orders: BTreeMap<(usize, usize), f64>,
}

impl BondOrderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table for a system of `size` atoms.
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            orders: BTreeMap::new(),
        }
    }

    /// Number of atoms the table is sized for.
    pub fn system_size(&self) -> usize {
        self.size
    }

    /// Returns the bond order between `i` and `j`, or `0.0` if unset or out of range.
    pub fn order(&self, i: usize, j: usize) -> f64 {
        self.orders.get(&Self::key(i, j)).copied().unwrap_or(0.0)
    }

    /// Sets the bond order between `i` and `j`. An order of zero removes the entry.
    ///
    /// # Errors
    ///
    /// Fails if either index is outside the table, if `i == j`, or if `order`
    /// is negative or not finite.
    pub fn set_order(&mut self, i: usize, j: usize, order: f64) -> Result<(), BondError> {
        if i >= self.size || j >= self.size {
            return Err(BondError::IndexOutOfRange {
                i,
                j,
                size: self.size,
            });
        }
        if i == j {
            return Err(BondError::SelfBond(i));
        }
        if !order.is_finite() || order < 0.0 {
            return Err(BondError::InvalidOrder(order));
        }

        let key = Self::key(i, j);
        if order == 0.0 {
            self.orders.remove(&key);
        } else {
            self.orders.insert(key, order);
        }
        Ok(())
    }

    /// Number of pairs with a non-zero order.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterates over stored pairs as `(i, j, order)` with `i < j`, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.orders.iter().map(|(&(i, j), &order)| (i, j, order))
    }

    fn key(i: usize, j: usize) -> (usize, usize) {
        (i.min(j), i.max(j))
    }
}
