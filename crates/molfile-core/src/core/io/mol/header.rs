use super::error::{MolError, MolParseErrorKind};
use super::fields::{self, NumberedLines, ensure_fits};
use std::fmt;
use std::io::{BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

/// Minimum length of a counts line: eleven 3-character fields plus a version token.
pub const COUNTS_LINE_MIN_LEN: usize = 38;
const VERSION_OFFSET: usize = 33;
const COUNT_FIELD_WIDTH: usize = 3;
const INITIALS_WIDTH: usize = 2;
const PROGRAM_FIELD_WIDTH: usize = 8;
const TIMESTAMP_WIDTH: usize = 10;

pub const DEFAULT_MOLECULE_NAME: &str = "Unnamed Molecule";
pub const DEFAULT_INITIALS: &str = "##";
pub const DEFAULT_PROGRAM_NAME: &str = "MOLFILE";

/// The version token at the end of a counts line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatVersion {
    V2000,
    V3000,
    Other(String),
}

impl FormatVersion {
    /// Interprets a version token; all space characters are ignored.
    pub fn from_token(token: &str) -> Self {
        let stripped: String = token.chars().filter(|&c| c != ' ').collect();
        match stripped.as_str() {
            "V2000" => Self::V2000,
            "V3000" => Self::V3000,
            _ => Self::Other(stripped),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::V2000 => "V2000",
            Self::V3000 => "V3000",
            Self::Other(token) => token,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Date and time stamp of the program line, `MMDDYYHHmm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderTimestamp {
    pub month: u8,
    pub day: u8,
    /// Two-digit year.
    pub year: u8,
    pub hour: u8,
    pub minute: u8,
}

impl HeaderTimestamp {
    pub fn now_utc() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix_seconds(secs)
    }

    pub fn from_unix_seconds(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let seconds_of_day = secs % 86_400;
        let (year, month, day) = civil_from_days(days);
        Self {
            month,
            day,
            year: year.rem_euclid(100) as u8,
            hour: (seconds_of_day / 3_600) as u8,
            minute: (seconds_of_day % 3_600 / 60) as u8,
        }
    }

    /// Parses a 10-digit `MMDDYYHHmm` field. Returns `None` for anything else.
    pub fn parse(field: &str) -> Option<Self> {
        if field.len() != TIMESTAMP_WIDTH || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let part = |i: usize| field[i..i + 2].parse::<u8>().ok();
        let stamp = Self {
            month: part(0)?,
            day: part(2)?,
            year: part(4)?,
            hour: part(6)?,
            minute: part(8)?,
        };
        let valid = (1..=12).contains(&stamp.month)
            && (1..=31).contains(&stamp.day)
            && stamp.hour < 24
            && stamp.minute < 60;
        valid.then_some(stamp)
    }
}

impl fmt::Display for HeaderTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}{:02}{:02}{:02}{:02}",
            self.month, self.day, self.year, self.hour, self.minute
        )
    }
}

// Days since 1970-01-01 to (year, month, day) in the proleptic Gregorian calendar.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month as u8, day as u8)
}

/// The three free-text lines that open every molfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MolHeader {
    pub name: String,
    /// User initials, at most 2 characters.
    pub initials: String,
    /// Program name, at most 8 characters.
    pub program: String,
    pub timestamp: Option<HeaderTimestamp>,
    pub comment: String,
}

impl Default for MolHeader {
    fn default() -> Self {
        Self {
            name: DEFAULT_MOLECULE_NAME.to_string(),
            initials: DEFAULT_INITIALS.to_string(),
            program: DEFAULT_PROGRAM_NAME.to_string(),
            timestamp: None,
            comment: String::new(),
        }
    }
}

impl MolHeader {
    /// Default header stamped with the current UTC time.
    pub fn stamped_now() -> Self {
        Self {
            timestamp: Some(HeaderTimestamp::now_utc()),
            ..Self::default()
        }
    }
}

/// The parsed counts line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountsLine {
    pub atom_count: usize,
    pub bond_count: usize,
    pub version: FormatVersion,
    pub line_no: usize,
}

/// Consumes the three header lines. Their content is kept, never validated;
/// bytes that are not UTF-8 are replaced.
pub(crate) fn read_header<R: BufRead>(
    lines: &mut NumberedLines<'_, R>,
) -> Result<MolHeader, MolError> {
    let mut raw: [Vec<u8>; 3] = Default::default();
    for slot in raw.iter_mut() {
        match lines.next_line()? {
            Some((_, line)) => *slot = line.to_vec(),
            None => break,
        }
    }
    let [name, program_line, comment] = raw;
    let text_field = |start: usize, width: usize| {
        fields::lossy(fields::raw_field(&program_line, start, width))
            .trim()
            .to_string()
    };
    let stamp_field = fields::raw_field(
        &program_line,
        INITIALS_WIDTH + PROGRAM_FIELD_WIDTH,
        TIMESTAMP_WIDTH,
    );

    Ok(MolHeader {
        name: fields::lossy(&name).into_owned(),
        initials: text_field(0, INITIALS_WIDTH),
        program: text_field(INITIALS_WIDTH, PROGRAM_FIELD_WIDTH),
        timestamp: std::str::from_utf8(stamp_field)
            .ok()
            .and_then(HeaderTimestamp::parse),
        comment: fields::lossy(&comment).into_owned(),
    })
}

/// Returns `(atom_count, bond_count)` if `line` qualifies as a counts line.
pub fn parse_counts_fields(line: &[u8]) -> Option<(usize, usize)> {
    if line.len() < COUNTS_LINE_MIN_LEN {
        return None;
    }
    let atoms = fields::parse_exact_uint(
        fields::raw_field(line, 0, COUNT_FIELD_WIDTH),
        COUNT_FIELD_WIDTH,
    )?;
    let bonds = fields::parse_exact_uint(
        fields::raw_field(line, COUNT_FIELD_WIDTH, COUNT_FIELD_WIDTH),
        COUNT_FIELD_WIDTH,
    )?;
    Some((atoms, bonds))
}

/// Reads lines until the first valid counts line.
///
/// Lines that are too short or whose first two fields are not exact
/// 3-character integers are skipped.
pub(crate) fn scan_counts_line<R: BufRead>(
    lines: &mut NumberedLines<'_, R>,
) -> Result<CountsLine, MolError> {
    while let Some((line_no, line)) = lines.next_line()? {
        let Some((atom_count, bond_count)) = parse_counts_fields(line) else {
            trace!(line_no, "Skipping line, not a counts line");
            continue;
        };
        let version = FormatVersion::from_token(&fields::lossy(fields::tail(line, VERSION_OFFSET)));
        debug!(line_no, atom_count, bond_count, %version, "Found counts line");
        return Ok(CountsLine {
            atom_count,
            bond_count,
            version,
            line_no,
        });
    }
    Err(MolError::mismatch(
        lines.line_no(),
        MolParseErrorKind::CountsLineNotFound,
    ))
}

fn ensure_single_line(text: &str, what: &str) -> Result<(), MolError> {
    if text.contains(['\n', '\r']) {
        return Err(MolError::Inconsistency(format!(
            "{} must not contain line breaks",
            what
        )));
    }
    Ok(())
}

pub(crate) fn write_header(writer: &mut impl Write, header: &MolHeader) -> Result<(), MolError> {
    ensure_single_line(&header.name, "molecule name")?;
    ensure_single_line(&header.comment, "comment")?;
    ensure_single_line(&header.initials, "initials")?;
    ensure_single_line(&header.program, "program name")?;
    ensure_fits(&header.initials, INITIALS_WIDTH, "initials")?;
    ensure_fits(&header.program, PROGRAM_FIELD_WIDTH, "program name")?;

    let stamp = header
        .timestamp
        .map(|t| t.to_string())
        .unwrap_or_else(|| " ".repeat(TIMESTAMP_WIDTH));

    writeln!(writer, "{}", header.name)?;
    writeln!(writer, "{:>2}{:>8}{}3D", header.initials, header.program, stamp)?;
    writeln!(writer, "{}", header.comment)?;
    Ok(())
}

pub(crate) fn write_counts_line(
    writer: &mut impl Write,
    atom_count: usize,
    bond_count: usize,
) -> Result<(), MolError> {
    let atoms = atom_count.to_string();
    let bonds = bond_count.to_string();
    ensure_fits(&atoms, COUNT_FIELD_WIDTH, "atom count")?;
    ensure_fits(&bonds, COUNT_FIELD_WIDTH, "bond count")?;

    // aaa bbb lll fff ccc sss xxx rrr ppp iii mmm vvvvvv
    writeln!(
        writer,
        "{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>6}",
        atoms,
        bonds,
        0,
        0,
        0,
        0,
        0,
        0,
        0,
        0,
        999,
        FormatVersion::V2000
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scan(input: &str) -> Result<CountsLine, MolError> {
        let mut cursor = Cursor::new(input.to_string());
        let mut lines = NumberedLines::new(&mut cursor);
        scan_counts_line(&mut lines)
    }

    #[test]
    fn version_token_ignores_spaces() {
        assert_eq!(FormatVersion::from_token(" V2000"), FormatVersion::V2000);
        assert_eq!(FormatVersion::from_token("V 3000 "), FormatVersion::V3000);
        assert_eq!(
            FormatVersion::from_token(" V9999"),
            FormatVersion::Other("V9999".into())
        );
        assert_eq!(FormatVersion::from_token("   "), FormatVersion::Other(String::new()));
    }

    #[test]
    fn counts_fields_require_minimum_length() {
        let valid = "  2  1  0  0  0  0  0  0  0  0999 V2000";
        assert_eq!(parse_counts_fields(valid.as_bytes()), Some((2, 1)));
        assert_eq!(parse_counts_fields(b"  2  1  0  0  0  0  0  0  0  0999"), None);
    }

    #[test]
    fn counts_fields_must_be_exact_three_character_integers() {
        assert_eq!(
            parse_counts_fields(b"2    1  0  0  0  0  0  0  0  0999 V2000"),
            None
        );
        assert_eq!(
            parse_counts_fields(b"abc  1  0  0  0  0  0  0  0  0999 V2000"),
            None
        );
    }

    #[test]
    fn scanner_skips_non_counts_lines() {
        let input = "\
xyz  1  0  0  0  0  0  0  0  0999 V2000
short
  3  2  0  0  0  0  0  0  0  0999 V2000
";
        let counts = scan(input).unwrap();
        assert_eq!(counts.atom_count, 3);
        assert_eq!(counts.bond_count, 2);
        assert_eq!(counts.version, FormatVersion::V2000);
        assert_eq!(counts.line_no, 3);
    }

    #[test]
    fn scanner_fails_at_end_of_input() {
        let input = "too short\n".repeat(40);
        let err = scan(&input).unwrap_err();
        assert!(matches!(
            err,
            MolError::FormatMismatch {
                line: 40,
                kind: MolParseErrorKind::CountsLineNotFound
            }
        ));
    }

    #[test]
    fn header_lines_are_captured() {
        let input = "water\nTK MOLFILE12312423593D\nfrom a test\n";
        let mut cursor = Cursor::new(input);
        let mut lines = NumberedLines::new(&mut cursor);
        let header = read_header(&mut lines).unwrap();
        assert_eq!(header.name, "water");
        assert_eq!(header.initials, "TK");
        assert_eq!(header.program, "MOLFILE");
        assert_eq!(
            header.timestamp,
            Some(HeaderTimestamp {
                month: 12,
                day: 31,
                year: 24,
                hour: 23,
                minute: 59
            })
        );
        assert_eq!(header.comment, "from a test");
    }

    #[test]
    fn header_tolerates_missing_lines() {
        let mut cursor = Cursor::new("only a name\n");
        let mut lines = NumberedLines::new(&mut cursor);
        let header = read_header(&mut lines).unwrap();
        assert_eq!(header.name, "only a name");
        assert_eq!(header.initials, "");
        assert_eq!(header.program, "");
        assert_eq!(header.timestamp, None);
    }

    #[test]
    fn timestamp_from_unix_seconds() {
        assert_eq!(HeaderTimestamp::from_unix_seconds(0).to_string(), "0101700000");
        assert_eq!(
            HeaderTimestamp::from_unix_seconds(951_782_400).to_string(),
            "0229000000"
        );
        assert_eq!(
            HeaderTimestamp::from_unix_seconds(1_735_689_540).to_string(),
            "1231242359"
        );
    }

    #[test]
    fn timestamp_parse_rejects_garbage() {
        assert_eq!(HeaderTimestamp::parse("          "), None);
        assert_eq!(HeaderTimestamp::parse("1331242359"), None);
        assert_eq!(HeaderTimestamp::parse("12312423"), None);
    }

    #[test]
    fn written_header_and_counts_line_have_fixed_layout() {
        let header = MolHeader {
            timestamp: HeaderTimestamp::parse("0102031405"),
            ..MolHeader::default()
        };
        let mut out = Vec::new();
        write_header(&mut out, &header).unwrap();
        write_counts_line(&mut out, 2, 1).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Unnamed Molecule");
        assert_eq!(lines[1], "## MOLFILE01020314053D");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "  2  1  0  0  0  0  0  0  0  0999 V2000");
        assert_eq!(lines[3].len(), 39);
        assert_eq!(parse_counts_fields(lines[3].as_bytes()), Some((2, 1)));
    }

    #[test]
    fn counts_over_999_do_not_fit() {
        let mut out = Vec::new();
        assert!(matches!(
            write_counts_line(&mut out, 1000, 0),
            Err(MolError::FieldOverflow(_))
        ));
    }

    #[test]
    fn header_rejects_line_breaks_and_long_program_names() {
        let mut out = Vec::new();
        let header = MolHeader {
            name: "two\nlines".into(),
            ..MolHeader::default()
        };
        assert!(matches!(
            write_header(&mut out, &header),
            Err(MolError::Inconsistency(_))
        ));

        let header = MolHeader {
            program: "TOOLONGNAME".into(),
            ..MolHeader::default()
        };
        assert!(matches!(
            write_header(&mut out, &header),
            Err(MolError::FieldOverflow(_))
        ));

        let header = MolHeader {
            initials: "ABC".into(),
            ..MolHeader::default()
        };
        assert!(matches!(
            write_header(&mut out, &header),
            Err(MolError::FieldOverflow(_))
        ));
    }

    #[test]
    fn header_text_that_is_not_utf8_is_decoded_lossily() {
        let input: &[u8] = b"Caf\xe9ine\n\xa7\xa7 MOLFILE\xff         3D\nr\xe9f\n";
        let mut cursor = Cursor::new(input);
        let mut lines = NumberedLines::new(&mut cursor);
        let header = read_header(&mut lines).unwrap();
        assert_eq!(header.name, "Caf\u{fffd}ine");
        assert_eq!(header.initials, "\u{fffd}\u{fffd}");
        assert_eq!(header.program, "MOLFILE");
        assert_eq!(header.timestamp, None);
        assert_eq!(header.comment, "r\u{fffd}f");
    }

    #[test]
    fn scanner_skips_lines_that_are_not_utf8() {
        let input: &[u8] = b"\xff\xfe not a counts line at all, just noise\n  1  0  0  0  0  0  0  0  0  0999 V2000\xe9\n";
        let mut cursor = Cursor::new(input);
        let mut lines = NumberedLines::new(&mut cursor);
        let counts = scan_counts_line(&mut lines).unwrap();
        assert_eq!(counts.atom_count, 1);
        assert_eq!(counts.line_no, 2);
        assert_eq!(counts.version, FormatVersion::Other("V2000\u{fffd}".into()));
    }
}
