use super::element::{Element, ElementType};
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtomsError {
    #[error("Atom index {index} is out of range for a collection of {len} atoms")]
    IndexOutOfRange { index: usize, len: usize },
}

/// An ordered collection of atoms, each an element identity plus a position.
///
/// Positions are stored in bohr (atomic units). The 0-based index of an atom is
/// its only identity, so the collection offers no removal: indices stay stable
/// for its whole lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomCollection {
    elements: Vec<ElementType>,
    positions: Vec<Point3<f64>>,
}

impl AtomCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection of `size` placeholder atoms (hydrogen at the origin).
    ///
    /// Meant to be filled in afterwards with [`set_element`](Self::set_element)
    /// and [`set_position`](Self::set_position).
    pub fn with_size(size: usize) -> Self {
        Self {
            elements: vec![ElementType::new(Element::H); size],
            positions: vec![Point3::origin(); size],
        }
    }

    pub fn push(&mut self, element: ElementType, position: Point3<f64>) -> usize {
        self.elements.push(element);
        self.positions.push(position);
        self.elements.len() - 1
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, index: usize) -> Option<ElementType> {
        self.elements.get(index).copied()
    }

    /// Position of atom `index` in bohr.
    pub fn position(&self, index: usize) -> Option<&Point3<f64>> {
        self.positions.get(index)
    }

    pub fn set_element(&mut self, index: usize, element: ElementType) -> Result<(), AtomsError> {
        let len = self.len();
        let slot = self
            .elements
            .get_mut(index)
            .ok_or(AtomsError::IndexOutOfRange { index, len })?;
        *slot = element;
        Ok(())
    }

    pub fn set_position(&mut self, index: usize, position: Point3<f64>) -> Result<(), AtomsError> {
        let len = self.len();
        let slot = self
            .positions
            .get_mut(index)
            .ok_or(AtomsError::IndexOutOfRange { index, len })?;
        *slot = position;
        Ok(())
    }

    pub fn elements(&self) -> &[ElementType] {
        &self.elements
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Iterates over `(index, element, position)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, ElementType, &Point3<f64>)> {
        self.elements
            .iter()
            .zip(self.positions.iter())
            .enumerate()
            .map(|(i, (e, p))| (i, *e, p))
    }
}
