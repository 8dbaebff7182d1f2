use super::error::{MolError, MolParseErrorKind};
use super::fields::{self, NumberedLines};
use crate::core::models::bond_orders::BondOrderCollection;
use std::io::{BufRead, Write};
use tracing::{trace, warn};

/// A bond line must hold at least the two atom indices and the bond type.
pub const BOND_LINE_MIN_LEN: usize = 9;
const FIELD_WIDTH: usize = 3;

/// One decoded bond line, with 0-based atom indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondRecord {
    pub first: usize,
    pub second: usize,
    pub bond_type: usize,
}

impl BondRecord {
    /// Bond types the order table can hold. Query and stereo-only types are
    /// outside this range.
    pub fn order(&self) -> Option<f64> {
        (1..=3).contains(&self.bond_type).then(|| self.bond_type as f64)
    }
}

fn atom_index(
    line: &[u8],
    line_no: usize,
    start: usize,
    atom_count: usize,
) -> Result<usize, MolError> {
    let index = fields::uint_field(line, line_no, start, FIELD_WIDTH)?;
    if index == 0 || index > atom_count {
        return Err(MolError::mismatch(
            line_no,
            MolParseErrorKind::AtomIndexOutOfRange { index, atom_count },
        ));
    }
    Ok(index - 1)
}

pub fn parse_bond_line(line: &[u8], line_no: usize, atom_count: usize) -> Result<BondRecord, MolError> {
    fields::require_len(line, line_no, BOND_LINE_MIN_LEN)?;

    let first = atom_index(line, line_no, 0, atom_count)?;
    let second = atom_index(line, line_no, FIELD_WIDTH, atom_count)?;
    let bond_type = fields::uint_field(line, line_no, 2 * FIELD_WIDTH, FIELD_WIDTH)?;

    if first == second {
        return Err(MolError::mismatch(
            line_no,
            MolParseErrorKind::SelfBond(first + 1),
        ));
    }

    Ok(BondRecord {
        first,
        second,
        bond_type,
    })
}

/// Reads `bond_count` bond lines into a table sized for `atom_count` atoms.
pub(crate) fn read_bond_block<R: BufRead>(
    lines: &mut NumberedLines<'_, R>,
    atom_count: usize,
    bond_count: usize,
) -> Result<BondOrderCollection, MolError> {
    let mut bonds = BondOrderCollection::with_size(atom_count);
    for _ in 0..bond_count {
        let (line_no, line) = lines.expect_line("bond")?;
        let record = parse_bond_line(line, line_no, atom_count)?;

        match record.order() {
            Some(order) => {
                trace!(line_no, i = record.first, j = record.second, order, "Parsed bond");
                bonds
                    .set_order(record.first, record.second, order)
                    .map_err(|e| MolError::Inconsistency(e.to_string()))?;
            }
            None => warn!(
                line_no,
                bond_type = record.bond_type,
                "Ignoring bond with unsupported bond type"
            ),
        }
    }
    Ok(bonds)
}

/// Formats one bond line from 0-based indices.
pub fn format_bond_line(first: usize, second: usize, bond_type: u8) -> String {
    // 111 222 ttt sss xxx xxx rrr xxx
    format!(
        "{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}",
        first + 1,
        second + 1,
        bond_type,
        0,
        0,
        0,
        0,
        0
    )
}

pub(crate) fn write_bond_block(
    writer: &mut impl Write,
    bonds: &[(usize, usize, u8)],
) -> Result<(), MolError> {
    for &(first, second, bond_type) in bonds {
        writeln!(writer, "{}", format_bond_line(first, second, bond_type))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(input: &str, atom_count: usize, bond_count: usize) -> Result<BondOrderCollection, MolError> {
        let mut cursor = Cursor::new(input.to_string());
        let mut lines = NumberedLines::new(&mut cursor);
        read_bond_block(&mut lines, atom_count, bond_count)
    }

    #[test]
    fn formats_one_based_indices_and_zero_tail() {
        assert_eq!(format_bond_line(0, 1, 1), "  1  2  1  0  0  0  0  0");
        assert_eq!(format_bond_line(9, 122, 3), " 10123  3  0  0  0  0  0");
    }

    #[test]
    fn minimal_bond_line_is_accepted() {
        let bonds = read("  1  2  1\n", 2, 1).unwrap();
        assert_eq!(bonds.order(0, 1), 1.0);
        assert_eq!(bonds.order(1, 0), 1.0);
        assert_eq!(bonds.system_size(), 2);
    }

    #[test]
    fn unsupported_bond_types_are_skipped() {
        let input = "  1  2  4  0  0  0  0\n  2  3  0  0  0  0  0\n  1  3  2  0  0  0  0\n";
        let bonds = read(input, 3, 3).unwrap();
        assert_eq!(bonds.order(0, 1), 0.0);
        assert_eq!(bonds.order(1, 2), 0.0);
        assert_eq!(bonds.order(0, 2), 2.0);
        assert_eq!(bonds.len(), 1);
    }

    #[test]
    fn indices_outside_the_atom_block_are_rejected() {
        let err = read("  0  1  1\n", 2, 1).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                line: 1,
                kind: MolParseErrorKind::AtomIndexOutOfRange {
                    index: 0,
                    atom_count: 2
                }
            }
        ));

        let err = read("  1  3  1\n", 2, 1).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                kind: MolParseErrorKind::AtomIndexOutOfRange { index: 3, .. },
                ..
            }
        ));
    }

    #[test]
    fn self_bonds_are_rejected() {
        let err = parse_bond_line(b"  2  2  1", 4, 3).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                line: 4,
                kind: MolParseErrorKind::SelfBond(2)
            }
        ));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        let short = parse_bond_line(b"  1  2", 1, 2).unwrap_err();
        assert!(matches!(
            short,
            MolError::FormatMismatch {
                kind: MolParseErrorKind::LineTooShort { required: 9, actual: 6 },
                ..
            }
        ));

        let garbage = parse_bond_line(b"  1  2  x", 1, 2).unwrap_err();
        assert!(matches!(
            garbage,
            MolError::FormatMismatch {
                kind: MolParseErrorKind::InvalidInt { .. },
                ..
            }
        ));
    }

    #[test]
    fn trailing_bytes_after_the_bond_type_are_ignored() {
        let record = parse_bond_line(b"  1  2  2\xe9\xff  0", 3, 2).unwrap();
        assert_eq!(
            record,
            BondRecord {
                first: 0,
                second: 1,
                bond_type: 2
            }
        );
    }

    #[test]
    fn missing_bond_lines_are_reported() {
        let err = read("  1  2  1\n", 3, 2).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                line: 2,
                kind: MolParseErrorKind::UnexpectedEof { block: "bond" }
            }
        ));
    }

    #[test]
    fn block_writer_emits_one_line_per_bond() {
        let mut out = Vec::new();
        write_bond_block(&mut out, &[(0, 1, 1), (1, 2, 2)]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  1  2  1  0  0  0  0  0\n  2  3  2  0  0  0  0  0\n"
        );
    }
}
