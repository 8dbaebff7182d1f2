use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Format '{format}' is not handled by the MOL codec")]
    FormatUnsupported { format: String },
    #[error("Format mismatch on line {line}: {kind}")]
    FormatMismatch { line: usize, kind: MolParseErrorKind },
    #[error("MOL {0} format is not implemented")]
    NotImplemented(String),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Value does not fit its fixed-width field: {0}")]
    FieldOverflow(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MolParseErrorKind {
    #[error("No valid counts line found before end of input")]
    CountsLineNotFound,
    #[error("Unrecognized version token '{0}'")]
    UnrecognizedVersion(String),
    #[error("Line is too short (must be at least {required} chars, got {actual})")]
    LineTooShort { required: usize, actual: usize },
    #[error("Input ended before the declared {block} block was complete")]
    UnexpectedEof { block: &'static str },
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Bond references atom {index}, outside 1..={atom_count}")]
    AtomIndexOutOfRange { index: usize, atom_count: usize },
    #[error("Bond connects atom {0} to itself")]
    SelfBond(usize),
}

impl MolError {
    pub(crate) fn mismatch(line: usize, kind: MolParseErrorKind) -> Self {
        Self::FormatMismatch { line, kind }
    }

    /// Returns `true` for structural or content violations of the input.
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::FormatMismatch { .. })
    }
}
