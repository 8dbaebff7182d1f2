use nalgebra::Point3;

/// Bohr radius in angstrom (CODATA 2018).
pub const ANGSTROM_PER_BOHR: f64 = 0.529177210903;
pub const BOHR_PER_ANGSTROM: f64 = 1.0 / ANGSTROM_PER_BOHR;

#[inline]
pub fn bohr_to_angstrom(point: &Point3<f64>) -> Point3<f64> {
    Point3::from(point.coords * ANGSTROM_PER_BOHR)
}

#[inline]
pub fn angstrom_to_bohr(point: &Point3<f64>) -> Point3<f64> {
    Point3::from(point.coords * BOHR_PER_ANGSTROM)
}
