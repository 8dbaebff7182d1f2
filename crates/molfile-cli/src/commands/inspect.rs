use crate::cli::InspectArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use molfile::core::models::atoms::AtomCollection;
use molfile::core::models::bond_orders::BondOrderCollection;
use molfile::workflows::inspect::{self, StructureSummary};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

pub fn run(args: &InspectArgs, config: &AppConfig) -> Result<()> {
    let (summary, atoms, bonds) = inspect::run(&args.input, &config.read)?;

    if args.toml {
        let text = toml::to_string(&summary).map_err(|e| CliError::Other(e.into()))?;
        print!("{}", text);
    } else {
        print!("{}", render_summary(&args.input, &summary));
    }

    if let Some(csv_path) = &args.csv {
        write_atom_table(csv_path, &atoms, &bonds)?;
        info!("Wrote atom table to {:?}", csv_path);
    }
    Ok(())
}

pub fn render_summary(path: &Path, summary: &StructureSummary) -> String {
    let mut out = String::new();
    let orders = &summary.bond_orders;
    let _ = writeln!(out, "File:     {}", path.display());
    let _ = writeln!(out, "Formula:  {}", summary.formula);
    let _ = writeln!(out, "Atoms:    {}", summary.atom_count);
    let _ = writeln!(
        out,
        "Bonds:    {} (single {}, double {}, triple {}, unwritten {})",
        summary.bond_count, orders.single, orders.double, orders.triple, orders.unwritten
    );
    if let Some(bbox) = &summary.bounding_box {
        let _ = writeln!(
            out,
            "Extent:   ({:.4}, {:.4}, {:.4}) .. ({:.4}, {:.4}, {:.4}) Å",
            bbox.min[0], bbox.min[1], bbox.min[2], bbox.max[0], bbox.max[1], bbox.max[2]
        );
    }
    out
}

fn write_atom_table(
    path: &Path,
    atoms: &AtomCollection,
    bonds: &BondOrderCollection,
) -> Result<()> {
    let to_cli_error = |e: csv::Error| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(to_cli_error)?;
    for row in inspect::atom_rows(atoms, bonds) {
        writer.serialize(row).map_err(to_cli_error)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use molfile::core::models::element::Element;
    use nalgebra::Point3;

    fn two_atoms() -> (AtomCollection, BondOrderCollection) {
        let mut atoms = AtomCollection::new();
        atoms.push(Element::C.into(), Point3::new(0.0, 0.0, 0.0));
        atoms.push(Element::O.into(), Point3::new(2.0, 0.0, 0.0));
        let mut bonds = BondOrderCollection::with_size(2);
        bonds.set_order(0, 1, 2.0).unwrap();
        (atoms, bonds)
    }

    #[test]
    fn text_summary_lists_counts_and_extent() {
        let (atoms, bonds) = two_atoms();
        let text = render_summary(Path::new("co.mol"), &inspect::summarize(&atoms, &bonds));
        assert!(text.contains("File:     co.mol"));
        assert!(text.contains("Formula:  CO"));
        assert!(text.contains("Bonds:    1 (single 0, double 1, triple 0, unwritten 0)"));
        assert!(text.contains("Extent:   (0.0000, 0.0000, 0.0000) .. (1.0584, 0.0000, 0.0000) Å"));
    }

    #[test]
    fn atom_table_is_written_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atoms.csv");
        let (atoms, bonds) = two_atoms();

        write_atom_table(&path, &atoms, &bonds).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("index,symbol,x,y,z,valence"));
        assert_eq!(lines.next(), Some("1,C,0.0,0.0,0.0,1"));
        assert!(lines.next().unwrap().starts_with("2,O,1.058354"));
        assert_eq!(lines.next(), None);
    }
}
