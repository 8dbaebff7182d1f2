use super::error::WorkflowError;
use crate::core::io::mol::{MolError, MolFile, MolHeader, ReadOptions, WriteOptions, discretize};
use crate::core::io::traits::MolecularFile;
use crate::core::models::atoms::AtomCollection;
use crate::core::models::bond_orders::BondOrderCollection;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub read: ReadOptions,
    /// Header of the written file. Its name is only a fallback, see
    /// [`rename`](Self::rename).
    pub write: WriteOptions,
    /// Molecule name for the output. When unset, the input's name is kept if
    /// it is not blank.
    pub rename: Option<String>,
    /// Write an atom-only record.
    pub drop_bonds: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub name: String,
    pub atom_count: usize,
    pub bond_count: usize,
}

fn output_header(input: &MolHeader, options: &ConvertOptions) -> MolHeader {
    let name = match &options.rename {
        Some(name) => name.clone(),
        None if !input.name.trim().is_empty() => input.name.clone(),
        None => options.write.header.name.clone(),
    };
    MolHeader {
        name,
        ..options.write.header.clone()
    }
}

fn emit(
    writer: &mut impl Write,
    atoms: &AtomCollection,
    bonds: &BondOrderCollection,
    header: &MolHeader,
    drop_bonds: bool,
) -> Result<usize, WorkflowError> {
    let bonds = (!drop_bonds).then_some(bonds);
    MolFile::write_to(atoms, bonds, header, writer)?;
    Ok(discretize::emitted_bonds(bonds).len())
}

/// Reads one Molfile from `reader` and writes it in normalised form.
pub fn convert(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    options: &ConvertOptions,
) -> Result<ConvertReport, WorkflowError> {
    let (atoms, bonds, input_header) = MolFile::read_with(reader, &options.read)?;
    let header = output_header(&input_header, options);
    let bond_count = emit(writer, &atoms, &bonds, &header, options.drop_bonds)?;
    Ok(ConvertReport {
        name: header.name,
        atom_count: atoms.len(),
        bond_count,
    })
}

#[instrument(skip_all, name = "convert_workflow", fields(input = %input.display()))]
pub fn run(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConvertReport, WorkflowError> {
    let (atoms, bonds, input_header) = File::open(input)
        .map_err(MolError::from)
        .and_then(|file| MolFile::read_with(&mut BufReader::new(file), &options.read))
        .map_err(|source| WorkflowError::Read {
            path: input.to_path_buf(),
            source,
        })?;
    info!(atoms = atoms.len(), bonds = bonds.len(), "Read input structure");

    let header = output_header(&input_header, options);
    let bonds = (!options.drop_bonds).then_some(&bonds);
    MolFile::write_to_path(&atoms, bonds, &header, output).map_err(|source| {
        WorkflowError::Write {
            path: output.to_path_buf(),
            source,
        }
    })?;
    let bond_count = discretize::emitted_bonds(bonds).len();

    info!(output = %output.display(), bond_count, "Wrote output structure");
    Ok(ConvertReport {
        name: header.name,
        atom_count: atoms.len(),
        bond_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::mol::HeaderTimestamp;
    use std::io::Cursor;

    const WATER: &str = "\
water
  OTHERPRG0101240000

  3  2  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.1173 o   0  0  0  0  0  0  0  0  0  0  0  0
    0.0000    0.7572   -0.4692 h   0  0  0  0  0  0  0  0  0  0  0  0
    0.0000   -0.7572   -0.4692 h   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0  0  0  0
  1  3  1  0  0  0  0
M  END
";

    fn convert_str(options: &ConvertOptions) -> (ConvertReport, String) {
        let mut out = Vec::new();
        let report = convert(&mut Cursor::new(WATER), &mut out, options).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn normalises_header_and_valences() {
        let (report, text) = convert_str(&ConvertOptions::default());
        assert_eq!(
            report,
            ConvertReport {
                name: "water".into(),
                atom_count: 3,
                bond_count: 2
            }
        );

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "water");
        assert_eq!(lines[1], "## MOLFILE          3D");
        assert_eq!(
            lines[4],
            "    0.0000    0.0000    0.1173   O 0  0  0  0  0  2  0  0  0  0  0  0"
        );
        assert_eq!(lines[7], "  1  2  1  0  0  0  0  0");
        assert_eq!(lines[9], "M END");
    }

    #[test]
    fn rename_and_drop_bonds() {
        let options = ConvertOptions {
            rename: Some("dihydrogen monoxide".into()),
            drop_bonds: true,
            write: WriteOptions::builder()
                .timestamp(HeaderTimestamp::parse("0102030405"))
                .build(),
            ..Default::default()
        };
        let (report, text) = convert_str(&options);
        assert_eq!(report.bond_count, 0);
        assert!(text.starts_with("dihydrogen monoxide\n## MOLFILE01020304053D\n"));
        assert!(text.contains("\n  3  0  0"));
    }

    #[test]
    fn blank_input_name_falls_back_to_the_configured_one() {
        let input = WATER.replacen("water", "   ", 1);
        let options = ConvertOptions {
            write: WriteOptions::builder().molecule_name("fallback").build(),
            ..Default::default()
        };
        let mut out = Vec::new();
        let report = convert(&mut Cursor::new(input), &mut out, &options).unwrap();
        assert_eq!(report.name, "fallback");
    }

    #[test]
    fn file_based_run_reports_paths_in_errors() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("water.mol");
        let output = dir.path().join("out.mol");
        std::fs::write(&input, WATER).unwrap();

        let report = run(&input, &output, &ConvertOptions::default()).unwrap();
        assert_eq!(report.atom_count, 3);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.ends_with("M END\n"));

        let missing = dir.path().join("missing.mol");
        let err = run(&missing, &output, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, WorkflowError::Read { ref path, .. } if path == &missing));

        let err = run(&input, dir.path(), &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, WorkflowError::Write { ref path, .. } if path == dir.path()));
    }

    #[test]
    fn file_based_run_can_drop_bonds() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("water.mol");
        let output = dir.path().join("atoms-only.mol");
        std::fs::write(&input, WATER).unwrap();

        let options = ConvertOptions {
            drop_bonds: true,
            ..Default::default()
        };
        let report = run(&input, &output, &options).unwrap();
        assert_eq!(report.bond_count, 0);

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert!(lines[3].starts_with("  3  0"));
        assert_eq!(lines.len(), 8);
    }
}
