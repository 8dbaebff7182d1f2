use super::error::{MolError, MolParseErrorKind};
use super::fields::{self, NumberedLines, ensure_fits};
use crate::core::models::atoms::AtomCollection;
use crate::core::models::element::ElementType;
use crate::core::utils::units::{angstrom_to_bohr, bohr_to_angstrom};
use nalgebra::Point3;
use std::io::{BufRead, Write};
use tracing::trace;

/// An atom line must reach at least the end of the symbol field.
pub const ATOM_LINE_MIN_LEN: usize = 34;
const COORD_WIDTH: usize = 10;
const SYMBOL_OFFSET: usize = 31;
const SYMBOL_WIDTH: usize = 3;

/// Brings a raw symbol field into canonical capitalisation.
///
/// Spaces are removed, the first letter is upper-cased and all following
/// letters lower-cased. Digits (isotope mass numbers) are left alone.
pub fn normalize_symbol(raw: &str) -> String {
    let mut seen_letter = false;
    raw.chars()
        .filter(|&c| c != ' ')
        .map(|c| {
            if !c.is_ascii_alphabetic() {
                c
            } else if seen_letter {
                c.to_ascii_lowercase()
            } else {
                seen_letter = true;
                c.to_ascii_uppercase()
            }
        })
        .collect()
}

/// Parses one atom line into an element and a position in angstrom.
///
/// Only the coordinate and symbol columns are decoded; the rest of the line
/// may hold arbitrary bytes.
pub fn parse_atom_line(line: &[u8], line_no: usize) -> Result<(ElementType, Point3<f64>), MolError> {
    fields::require_len(line, line_no, ATOM_LINE_MIN_LEN)?;

    let x = fields::float_field(line, line_no, 0, COORD_WIDTH)?;
    let y = fields::float_field(line, line_no, COORD_WIDTH, COORD_WIDTH)?;
    let z = fields::float_field(line, line_no, 2 * COORD_WIDTH, COORD_WIDTH)?;

    let symbol = normalize_symbol(&fields::lossy(fields::raw_field(
        line,
        SYMBOL_OFFSET,
        SYMBOL_WIDTH,
    )));
    let element = ElementType::from_symbol(&symbol)
        .map_err(|_| MolError::mismatch(line_no, MolParseErrorKind::UnknownElement(symbol)))?;

    Ok((element, Point3::new(x, y, z)))
}

/// Reads exactly `atom_count` atom lines. Positions are stored in bohr.
pub(crate) fn read_atom_block<R: BufRead>(
    lines: &mut NumberedLines<'_, R>,
    atom_count: usize,
) -> Result<AtomCollection, MolError> {
    let mut atoms = AtomCollection::with_size(atom_count);
    for index in 0..atom_count {
        let (line_no, line) = lines.expect_line("atom")?;
        let (element, position) = parse_atom_line(line, line_no)?;
        trace!(line_no, index, %element, "Parsed atom");

        atoms
            .set_element(index, element)
            .and_then(|_| atoms.set_position(index, angstrom_to_bohr(&position)))
            .map_err(|e| MolError::Inconsistency(e.to_string()))?;
    }
    Ok(atoms)
}

/// Formats one atom line. `valence` lands in the sixth integer field.
pub fn format_atom_line(
    element: ElementType,
    position_angstrom: &Point3<f64>,
    valence: u32,
) -> Result<String, MolError> {
    let mut coords = String::with_capacity(3 * COORD_WIDTH);
    for value in position_angstrom.iter() {
        let rendered = format!("{:>10.4}", value);
        ensure_fits(&rendered, COORD_WIDTH, "coordinate")?;
        coords.push_str(&rendered);
    }

    // aaa dd ccc sss hhh bbb vvv HHH rrr iii mmm nnn eee
    Ok(format!(
        "{} {:>3}{:>2}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}",
        coords,
        element.symbol(),
        0,
        0,
        0,
        0,
        0,
        valence,
        0,
        0,
        0,
        0,
        0,
        0
    ))
}

pub(crate) fn write_atom_block(
    writer: &mut impl Write,
    atoms: &AtomCollection,
    valences: &[u32],
) -> Result<(), MolError> {
    for (index, element, position) in atoms.iter() {
        let valence = valences.get(index).copied().unwrap_or(0);
        let line = format_atom_line(element, &bohr_to_angstrom(position), valence)?;
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;
    use std::io::Cursor;

    const HYDROGEN_LINE: &str =
        "    0.7400    0.0000    0.0000   H 0  0  0  0  0  1  0  0  0  0  0  0";

    #[test]
    fn formats_fixed_columns() {
        let line = format_atom_line(Element::H.into(), &Point3::new(0.74, 0.0, 0.0), 1).unwrap();
        assert_eq!(line, HYDROGEN_LINE);
        assert_eq!(&line[31..34], "  H");
        assert_eq!(&line[48..51], "  1");
    }

    #[test]
    fn formats_negative_and_two_letter_symbols() {
        let line =
            format_atom_line(Element::Cl.into(), &Point3::new(-1.23456, 10.0, -0.25), 0)
                .unwrap();
        assert!(line.starts_with("   -1.2346   10.0000   -0.2500  Cl 0"));
    }

    #[test]
    fn coordinates_wider_than_the_field_overflow() {
        let err = format_atom_line(Element::C.into(), &Point3::new(123456.0, 0.0, 0.0), 0)
            .unwrap_err();
        assert!(matches!(err, MolError::FieldOverflow(_)));
    }

    #[test]
    fn parses_a_written_line() {
        let (element, position) = parse_atom_line(HYDROGEN_LINE.as_bytes(), 5).unwrap();
        assert_eq!(element, ElementType::new(Element::H));
        assert_eq!(position, Point3::new(0.74, 0.0, 0.0));
    }

    #[test]
    fn symbol_case_is_normalized() {
        assert_eq!(normalize_symbol(" CL"), "Cl");
        assert_eq!(normalize_symbol("br "), "Br");
        assert_eq!(normalize_symbol("13c"), "13C");
        assert_eq!(normalize_symbol("  d"), "D");

        let line = "    0.0000    0.0000    0.0000 CL   0  0  0  0  0  0  0  0  0  0  0  0";
        let (element, _) = parse_atom_line(line.as_bytes(), 1).unwrap();
        assert_eq!(element.element, Element::Cl);
    }

    #[test]
    fn bytes_outside_the_decoded_columns_are_ignored() {
        let mut line = HYDROGEN_LINE.as_bytes().to_vec();
        line[30] = 0xe9;
        line[40] = 0xff;
        line.extend_from_slice(b" \xa7 comment");
        let (element, position) = parse_atom_line(&line, 5).unwrap();
        assert_eq!(element, ElementType::new(Element::H));
        assert_eq!(position, Point3::new(0.74, 0.0, 0.0));
    }

    #[test]
    fn invalid_bytes_in_the_symbol_are_an_unknown_element() {
        let mut line = HYDROGEN_LINE.as_bytes().to_vec();
        line[32] = 0xc3;
        let err = parse_atom_line(&line, 6).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                line: 6,
                kind: MolParseErrorKind::UnknownElement(_)
            }
        ));
    }

    #[test]
    fn unknown_symbol_is_a_format_mismatch() {
        let line = "    0.0000    0.0000    0.0000  Xx  0  0  0  0  0  0  0  0  0  0  0  0";
        let err = parse_atom_line(line.as_bytes(), 9).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                line: 9,
                kind: MolParseErrorKind::UnknownElement(ref s)
            } if s == "Xx"
        ));
    }

    #[test]
    fn short_lines_are_rejected() {
        let err = parse_atom_line(b"    0.0000    0.0000    0.0000  H", 4).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                line: 4,
                kind: MolParseErrorKind::LineTooShort {
                    required: 34,
                    actual: 33
                }
            }
        ));
    }

    #[test]
    fn non_numeric_coordinates_are_rejected() {
        let line = "    0.0000       abc    0.0000  H   0  0  0  0  0  0  0  0  0  0  0  0";
        let err = parse_atom_line(line.as_bytes(), 2).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                kind: MolParseErrorKind::InvalidFloat { .. },
                ..
            }
        ));

        let comma = "    0,7400    0.0000    0.0000  H   0  0  0  0  0  0  0  0  0  0  0  0";
        assert!(parse_atom_line(comma.as_bytes(), 2).is_err());
    }

    #[test]
    fn block_reader_converts_to_bohr_and_requires_every_line() {
        let input = format!("{}\n", HYDROGEN_LINE);
        let mut cursor = Cursor::new(input.clone());
        let mut lines = NumberedLines::new(&mut cursor);
        let atoms = read_atom_block(&mut lines, 1).unwrap();
        assert_eq!(atoms.len(), 1);
        let x = atoms.position(0).unwrap().x;
        assert!((x - 0.74 / 0.529177210903).abs() < 1e-9);

        let mut cursor = Cursor::new(input);
        let mut lines = NumberedLines::new(&mut cursor);
        let err = read_atom_block(&mut lines, 2).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                line: 2,
                kind: MolParseErrorKind::UnexpectedEof { block: "atom" }
            }
        ));
    }
}
