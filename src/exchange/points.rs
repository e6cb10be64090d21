//! Evaluated point writers
//!
//! | Format | Layout |
//! |--------|--------|
//! | screen | `x, y[, z]` per line, `---` between shapes |
//! | csv | header row, then `x,y[,z]` rows |
//! | txt | `x,y[,z]` rows |
//! | vtk | legacy VTK `POLYDATA`, one polyline or vertex set per shape |

use std::fmt::Write as _;
use std::io;

use crate::domain::{Resolved, Shape, ShapeKind};

/// Separator printed between the point blocks of a collection
pub const SHAPE_SEPARATOR: &str = "---";

const AXES: [&str; 4] = ["x", "y", "z", "w"];

fn join_point(point: &[f64], sep: &str) -> String {
    point.iter().map(|c| format!("{c:?}")).collect::<Vec<_>>().join(sep)
}

/// Prints the evaluated points of every shape
pub fn write_screen(resolved: &Resolved, out: &mut impl io::Write) -> io::Result<()> {
    let shapes = resolved.shapes();
    for (i, shape) in shapes.iter().enumerate() {
        for point in shape.evalpts() {
            writeln!(out, "{}", join_point(&point, ", "))?;
        }
        if i + 1 < shapes.len() {
            writeln!(out, "{SHAPE_SEPARATOR}")?;
        }
    }
    Ok(())
}

/// Comma-separated points with an `x,y[,z]` header row
pub fn csv(resolved: &Resolved) -> Result<Vec<u8>, csv::Error> {
    let dimension = resolved.shapes().first().map_or(0, Shape::dimension);
    let header: Vec<&str> = AXES.iter().copied().take(dimension).collect();
    delimited(resolved, Some(&header))
}

/// Comma-separated points, no header
pub fn txt(resolved: &Resolved) -> Result<Vec<u8>, csv::Error> {
    delimited(resolved, None)
}

fn delimited(resolved: &Resolved, header: Option<&[&str]>) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b',')
        .flexible(true)
        .from_writer(Vec::new());

    if let Some(header) = header {
        wtr.write_record(header)?;
    }
    for shape in resolved.shapes() {
        for point in shape.evalpts() {
            wtr.write_record(point.iter().map(|c| format!("{c:?}")))?;
        }
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

/// Legacy VTK polydata. Curves become polylines, surfaces vertex sets.
pub fn vtk(resolved: &Resolved) -> String {
    let blocks: Vec<Vec<Vec<f64>>> = resolved.shapes().iter().map(Shape::evalpts).collect();
    let total: usize = blocks.iter().map(Vec::len).sum();

    let mut out = String::new();
    out.push_str("# vtk DataFile Version 3.0\n");
    out.push_str("nurbs-cli evaluated points\n");
    out.push_str("ASCII\n");
    out.push_str("DATASET POLYDATA\n");
    let _ = writeln!(out, "POINTS {total} double");
    for point in blocks.iter().flatten() {
        let padded: Vec<f64> = (0..3).map(|i| point.get(i).copied().unwrap_or(0.0)).collect();
        out.push_str(&join_point(&padded, " "));
        out.push('\n');
    }

    let mut offset = 0;
    match resolved.kind() {
        ShapeKind::Curve => {
            let size: usize = blocks.iter().map(|b| b.len() + 1).sum();
            let _ = writeln!(out, "LINES {} {size}", blocks.len());
            for block in &blocks {
                let ids: Vec<String> = (offset..offset + block.len()).map(|i| i.to_string()).collect();
                let _ = writeln!(out, "{} {}", block.len(), ids.join(" "));
                offset += block.len();
            }
        }
        ShapeKind::Surface => {
            let _ = writeln!(out, "VERTICES {total} {}", 2 * total);
            for i in 0..total {
                let _ = writeln!(out, "1 {i}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Collection, Curve};

    fn line(from: [f64; 2], to: [f64; 2]) -> Shape {
        let mut curve = Curve::new(
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![from.to_vec(), to.to_vec()],
            None,
        )
        .unwrap();
        curve.set_delta(0.5);
        Shape::Curve(curve)
    }

    fn pair() -> Resolved {
        let shapes = vec![line([0.0, 0.0], [1.0, 0.0]), line([0.0, 1.0], [2.0, 1.0])];
        Resolved::Collection(Collection::new(ShapeKind::Curve, shapes).unwrap())
    }

    #[test]
    fn screen_single_shape_has_no_separator() {
        let mut buf = Vec::new();
        write_screen(&Resolved::Single(line([0.0, 0.0], [1.0, 0.0])), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "0.0, 0.0\n0.5, 0.0\n1.0, 0.0\n");
    }

    #[test]
    fn screen_separator_only_between_shapes() {
        let mut buf = Vec::new();
        write_screen(&pair(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.iter().filter(|l| **l == SHAPE_SEPARATOR).count(), 1);
        assert_eq!(lines[3], SHAPE_SEPARATOR);
        assert_ne!(lines.last(), Some(&SHAPE_SEPARATOR));
    }

    #[test]
    fn csv_has_header() {
        let text = String::from_utf8(csv(&pair()).unwrap()).unwrap();
        assert!(text.starts_with("x,y\n0.0,0.0\n"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn txt_rows_without_header() {
        let text = String::from_utf8(txt(&pair()).unwrap()).unwrap();
        assert_eq!(text, "0.0,0.0\n0.5,0.0\n1.0,0.0\n0.0,1.0\n1.0,1.0\n2.0,1.0\n");
    }

    #[test]
    fn vtk_polylines_per_curve() {
        let text = vtk(&pair());
        assert!(text.contains("POINTS 6 double"));
        assert!(text.contains("LINES 2 8"));
        assert!(text.contains("3 3 4 5"));
        assert!(text.contains("\n0.5 0.0 0.0\n"));
    }
}
