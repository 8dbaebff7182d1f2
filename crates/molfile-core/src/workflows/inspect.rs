use super::error::WorkflowError;
use crate::core::io::mol::{MolError, MolFile, ReadOptions, discretize};
use crate::core::models::atoms::AtomCollection;
use crate::core::models::bond_orders::BondOrderCollection;
use crate::core::models::element::Element;
use crate::core::utils::units::bohr_to_angstrom;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::instrument;

/// Bond counts grouped by the bond type they would be written as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BondOrderCounts {
    pub single: usize,
    pub double: usize,
    pub triple: usize,
    /// Pairs with an order that no bond type represents.
    pub unwritten: usize,
}

/// Axis-aligned bounding box in angstrom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StructureSummary {
    pub atom_count: usize,
    pub bond_count: usize,
    pub formula: String,
    pub bond_orders: BondOrderCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// One row of the per-atom table, positions in angstrom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomRow {
    pub index: usize,
    pub symbol: &'static str,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub valence: u32,
}

/// Molecular formula in Hill order: carbon, then hydrogen, then the rest
/// alphabetically. Without carbon every element is alphabetical.
pub fn hill_formula(atoms: &AtomCollection) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for element_type in atoms.elements() {
        *counts.entry(element_type.element.symbol()).or_default() += 1;
    }

    let mut formula = String::new();
    let mut push = |symbol: &str, count: usize| {
        formula.push_str(symbol);
        if count > 1 {
            formula.push_str(&count.to_string());
        }
    };

    let carbon = Element::C.symbol();
    let hydrogen = Element::H.symbol();
    if let Some(c) = counts.remove(carbon) {
        push(carbon, c);
        if let Some(h) = counts.remove(hydrogen) {
            push(hydrogen, h);
        }
    }
    for (symbol, count) in counts {
        push(symbol, count);
    }
    formula
}

fn bounding_box(atoms: &AtomCollection) -> Option<BoundingBox> {
    let mut positions = atoms.positions().iter().map(bohr_to_angstrom);
    let first = positions.next()?;
    let init = BoundingBox {
        min: [first.x, first.y, first.z],
        max: [first.x, first.y, first.z],
    };
    Some(positions.fold(init, |mut bbox, p| {
        for axis in 0..3 {
            bbox.min[axis] = bbox.min[axis].min(p[axis]);
            bbox.max[axis] = bbox.max[axis].max(p[axis]);
        }
        bbox
    }))
}

pub fn summarize(atoms: &AtomCollection, bonds: &BondOrderCollection) -> StructureSummary {
    let mut bond_orders = BondOrderCounts::default();
    for (_, _, order) in bonds.iter() {
        match discretize::emitted_bond_type(order) {
            Some(1) => bond_orders.single += 1,
            Some(2) => bond_orders.double += 1,
            Some(3) => bond_orders.triple += 1,
            _ => bond_orders.unwritten += 1,
        }
    }

    StructureSummary {
        atom_count: atoms.len(),
        bond_count: bonds.len(),
        formula: hill_formula(atoms),
        bond_orders,
        bounding_box: bounding_box(atoms),
    }
}

pub fn atom_rows(atoms: &AtomCollection, bonds: &BondOrderCollection) -> Vec<AtomRow> {
    let valences = discretize::valences(atoms.len(), Some(bonds));
    atoms
        .iter()
        .map(|(index, element, position)| {
            let p = bohr_to_angstrom(position);
            AtomRow {
                index: index + 1,
                symbol: element.symbol(),
                x: p.x,
                y: p.y,
                z: p.z,
                valence: valences[index],
            }
        })
        .collect()
}

/// Reads `path` and summarises it. The structure is returned as well for
/// callers that want per-atom output.
#[instrument(skip_all, name = "inspect_workflow", fields(path = %path.display()))]
pub fn run(
    path: &Path,
    options: &ReadOptions,
) -> Result<(StructureSummary, AtomCollection, BondOrderCollection), WorkflowError> {
    let read_err = |source: MolError| WorkflowError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|e| read_err(e.into()))?;
    let (atoms, bonds, _) =
        MolFile::read_with(&mut BufReader::new(file), options).map_err(read_err)?;
    Ok((summarize(&atoms, &bonds), atoms, bonds))
}
