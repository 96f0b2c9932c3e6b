use std::io::Write;
use std::path::{Path, PathBuf};

use crate::io::error::Error;
use crate::model::grid::GridDims;
use crate::model::snapshot::Snapshot;

/// Basename used when none is given.
pub const DEFAULT_BASENAME: &str = "out/md";

/// File names derived from one output basename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    base: String,
}

impl OutputPaths {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `<base>.vtp`
    pub fn result(&self) -> PathBuf {
        PathBuf::from(format!("{}.vtp", self.base))
    }

    /// `<base>-<iteration>.vtp`
    pub fn checkpoint(&self, iteration: usize) -> PathBuf {
        PathBuf::from(format!("{}-{}.vtp", self.base, iteration))
    }

    /// `<base>-mesh.vti`
    pub fn mesh(&self) -> PathBuf {
        PathBuf::from(format!("{}-mesh.vti", self.base))
    }

    /// Directory the output files land in, if the basename has one.
    pub fn parent(&self) -> Option<&Path> {
        Path::new(&self.base)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::new(DEFAULT_BASENAME)
    }
}

/// Writes a particle snapshot as ASCII VTK PolyData.
///
/// Simulation time and step are stored as `TIME` and `CYCLE` field data.
/// Points are written as `x y 0`.
pub fn write_particles<W: Write>(mut writer: W, snapshot: &Snapshot) -> Result<(), Error> {
    writeln!(writer, "<?xml version=\"1.0\"?>")?;
    writeln!(
        writer,
        "<VTKFile type=\"PolyData\" version=\"0.1\" byte_order=\"LittleEndian\">"
    )?;
    writeln!(writer, "<PolyData>")?;
    writeln!(writer, "<FieldData>")?;
    writeln!(
        writer,
        "<DataArray type=\"Float64\" Name=\"TIME\" NumberOfTuples=\"1\" format=\"ascii\">"
    )?;
    writeln!(writer, "{}", scientific(snapshot.time, 12))?;
    writeln!(writer, "</DataArray>")?;
    writeln!(
        writer,
        "<DataArray type=\"Int32\" Name=\"CYCLE\" NumberOfTuples=\"1\" format=\"ascii\">"
    )?;
    writeln!(writer, "{}", snapshot.iteration)?;
    writeln!(writer, "</DataArray>")?;
    writeln!(writer, "</FieldData>")?;
    writeln!(
        writer,
        "<Piece NumberOfPoints=\"{}\" NumberOfVerts=\"0\" NumberOfLines=\"0\" NumberOfStrips=\"0\" NumberOfCells=\"0\">",
        snapshot.particle_count()
    )?;
    writeln!(writer, "<Points>")?;
    writeln!(
        writer,
        "<DataArray type=\"Float64\" Name=\"particles\" NumberOfComponents=\"3\" format=\"ascii\">"
    )?;
    for p in &snapshot.positions {
        writeln!(
            writer,
            "{} {} 0 ",
            scientific(p[0], 12),
            scientific(p[1], 12)
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "</DataArray>")?;
    writeln!(writer, "</Points>")?;
    writeln!(writer, "</Piece>")?;
    writeln!(writer, "</PolyData>")?;
    writeln!(writer, "</VTKFile>")?;
    writer.flush()?;
    Ok(())
}

/// Writes the cell grid as an empty ASCII VTK ImageData overlay.
pub fn write_mesh<W: Write>(mut writer: W, dims: GridDims, cell_size: f64) -> Result<(), Error> {
    writeln!(writer, "<?xml version=\"1.0\"?>")?;
    writeln!(
        writer,
        "<VTKFile type=\"ImageData\" version=\"0.1\" byte_order=\"LittleEndian\">"
    )?;
    writeln!(
        writer,
        "<ImageData WholeExtent=\"0 {nx} 0 {ny} 0 0\" Origin=\"0 0 0\" Spacing=\"{cs:.6} {cs:.6} 0\">",
        nx = dims.nx,
        ny = dims.ny,
        cs = cell_size
    )?;
    writeln!(writer, "<Piece Extent=\"0 {} 0 {} 0 0\">", dims.nx, dims.ny)?;
    writeln!(writer, "<CellData></CellData>")?;
    writeln!(writer, "<PointData></PointData>")?;
    writeln!(writer, "<Points></Points>")?;
    writeln!(writer, "</Piece>")?;
    writeln!(writer, "</ImageData>")?;
    writeln!(writer, "</VTKFile>")?;
    writer.flush()?;
    Ok(())
}

/// Formats `value` in scientific notation with `precision` fractional
/// digits and a signed exponent of at least two digits, the way C's `%e`
/// does (`1.250000000000e+00`).
pub fn scientific(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let raw = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}
