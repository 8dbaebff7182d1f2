use super::error::{MolError, MolParseErrorKind};
use std::borrow::Cow;
use std::io::BufRead;

/// Line source that remembers the 1-based number of the last line handed out.
///
/// Lines are handed out as raw bytes. Only the fixed-width fields a block
/// actually consumes are decoded, so stray non-UTF-8 bytes elsewhere on a line
/// are never an error.
pub(crate) struct NumberedLines<'a, R: BufRead> {
    reader: &'a mut R,
    line_no: usize,
    buf: Vec<u8>,
}

impl<'a, R: BufRead> NumberedLines<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: Vec::new(),
        }
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Reads the next line without its terminator, paired with its line number.
    /// Returns `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<(usize, &[u8])>, MolError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some((self.line_no, &self.buf)))
    }

    /// Like [`next_line`](Self::next_line), but running out of input is a
    /// format mismatch attributed to `block`.
    pub fn expect_line(&mut self, block: &'static str) -> Result<(usize, &[u8]), MolError> {
        let line_no = self.line_no + 1;
        self.next_line()?
            .ok_or_else(|| MolError::mismatch(line_no, MolParseErrorKind::UnexpectedEof { block }))
    }
}

fn columns(start: usize, width: usize) -> String {
    format!("{}-{}", start + 1, start + width)
}

/// Raw (untrimmed) field bytes, or an empty slice if the line is too short.
pub(crate) fn raw_field(line: &[u8], start: usize, width: usize) -> &[u8] {
    line.get(start..start + width).unwrap_or(&[])
}

/// Everything from `start` to the end of the line.
pub(crate) fn tail(line: &[u8], start: usize) -> &[u8] {
    line.get(start..).unwrap_or(&[])
}

/// Decodes free text, replacing invalid UTF-8 sequences.
pub(crate) fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Parses an unsigned integer that must occupy the whole `width`-byte field.
///
/// Leading blanks and a single `+` are allowed, then only digits. Anything
/// else inside the field (trailing blanks, signs, letters) rejects it.
pub(crate) fn parse_exact_uint(field: &[u8], width: usize) -> Option<usize> {
    if field.len() != width {
        return None;
    }
    let start = field
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(field.len());
    let unpadded = &field[start..];
    let digits = unpadded.strip_prefix(b"+").unwrap_or(unpadded);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Parses a finite float from a trimmed field. Always uses `.` as decimal point.
pub(crate) fn parse_float(field: &[u8]) -> Option<f64> {
    std::str::from_utf8(field)
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

pub(crate) fn require_len(line: &[u8], line_no: usize, required: usize) -> Result<(), MolError> {
    if line.len() < required {
        return Err(MolError::mismatch(
            line_no,
            MolParseErrorKind::LineTooShort {
                required,
                actual: line.len(),
            },
        ));
    }
    Ok(())
}

pub(crate) fn uint_field(
    line: &[u8],
    line_no: usize,
    start: usize,
    width: usize,
) -> Result<usize, MolError> {
    let field = raw_field(line, start, width);
    parse_exact_uint(field, width).ok_or_else(|| {
        MolError::mismatch(
            line_no,
            MolParseErrorKind::InvalidInt {
                columns: columns(start, width),
                value: lossy(field).into_owned(),
            },
        )
    })
}

pub(crate) fn float_field(
    line: &[u8],
    line_no: usize,
    start: usize,
    width: usize,
) -> Result<f64, MolError> {
    let field = raw_field(line, start, width);
    parse_float(field).ok_or_else(|| {
        MolError::mismatch(
            line_no,
            MolParseErrorKind::InvalidFloat {
                columns: columns(start, width),
                value: lossy(field).into_owned(),
            },
        )
    })
}

/// Fails if `rendered` is wider than the fixed-width field it is meant for.
pub(crate) fn ensure_fits(rendered: &str, width: usize, what: &str) -> Result<(), MolError> {
    if rendered.len() > width {
        return Err(MolError::FieldOverflow(format!(
            "{} '{}' needs more than {} characters",
            what, rendered, width
        )));
    }
    Ok(())
}
