//! Surface mesh writers
//!
//! `obj`, `stl` and `off` triangulate the evaluated point grid of every
//! surface; `smesh` writes the control net itself. Curves have no mesh
//! representation and are rejected.

use std::fmt::Write as _;

use crate::domain::{Resolved, Shape, Surface};
use crate::error::{CliError, Result};

/// Triangulated surfaces with shared, 3D vertices
struct Mesh {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[usize; 3]>,
}

fn surfaces<'a>(resolved: &'a Resolved, format: &str) -> Result<Vec<&'a Surface>> {
    resolved
        .shapes()
        .iter()
        .map(|shape| match shape {
            Shape::Surface(surface) => Ok(surface),
            Shape::Curve(_) => Err(CliError::Unsupported(format!(
                "The '{format}' format can only export surfaces"
            ))),
        })
        .collect()
}

fn to_3d(point: &[f64]) -> [f64; 3] {
    [0, 1, 2].map(|i| point.get(i).copied().unwrap_or(0.0))
}

fn triangulate(resolved: &Resolved, format: &str) -> Result<Mesh> {
    let mut mesh = Mesh {
        vertices: Vec::new(),
        faces: Vec::new(),
    };

    for surface in surfaces(resolved, format)? {
        let grid = surface.eval_grid();
        let offset = mesh.vertices.len();
        mesh.vertices.extend(grid.points.iter().map(|p| to_3d(p)));
        mesh.faces
            .extend(grid.triangles().into_iter().map(|t| t.map(|i| i + offset)));
    }
    Ok(mesh)
}

fn normal(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [f64; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len == 0.0 {
        [0.0; 3]
    } else {
        n.map(|x| x / len)
    }
}

/// Wavefront OBJ, 1-based face indices
pub fn obj(resolved: &Resolved) -> Result<Vec<u8>> {
    let mesh = triangulate(resolved, "obj")?;

    let mut out = String::from("# nurbs-cli\n");
    for v in &mesh.vertices {
        let _ = writeln!(out, "v {} {} {}", v[0], v[1], v[2]);
    }
    for f in &mesh.faces {
        let _ = writeln!(out, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1);
    }
    Ok(out.into_bytes())
}

/// Binary STL
pub fn stl(resolved: &Resolved) -> Result<Vec<u8>> {
    let mesh = triangulate(resolved, "stl")?;

    let mut header = [0u8; 80];
    let label = b"nurbs-cli binary stl";
    header[..label.len()].copy_from_slice(label);

    let mut out = Vec::with_capacity(84 + mesh.faces.len() * 50);
    out.extend_from_slice(&header);
    out.extend_from_slice(&(mesh.faces.len() as u32).to_le_bytes());
    for face in &mesh.faces {
        let [a, b, c] = face.map(|i| mesh.vertices[i]);
        for vector in [normal(a, b, c), a, b, c] {
            for val in vector {
                out.extend_from_slice(&(val as f32).to_le_bytes());
            }
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    Ok(out)
}

/// Object File Format
pub fn off(resolved: &Resolved) -> Result<Vec<u8>> {
    let mesh = triangulate(resolved, "off")?;

    let mut out = String::from("OFF\n");
    let _ = writeln!(out, "{} {} 0", mesh.vertices.len(), mesh.faces.len());
    for v in &mesh.vertices {
        let _ = writeln!(out, "{} {} {}", v[0], v[1], v[2]);
    }
    for f in &mesh.faces {
        let _ = writeln!(out, "3 {} {} {}", f[0], f[1], f[2]);
    }
    Ok(out.into_bytes())
}

/// Control net description, one block per surface separated by a blank line:
/// dimension, degrees, sizes, both knot vectors, then `x y z w` per control
/// point in storage order.
pub fn smesh(resolved: &Resolved) -> Result<Vec<u8>> {
    let mut blocks = Vec::new();
    for surface in surfaces(resolved, "smesh")? {
        let (degree_u, degree_v) = surface.degrees();
        let (size_u, size_v) = surface.sizes();
        let (knots_u, knots_v) = surface.knotvectors();
        let join = |values: &[f64]| values.iter().map(f64::to_string).collect::<Vec<_>>().join(" ");

        let mut block = String::from("3\n");
        let _ = writeln!(block, "{degree_u} {degree_v}");
        let _ = writeln!(block, "{size_u} {size_v}");
        let _ = writeln!(block, "{}", join(knots_u));
        let _ = writeln!(block, "{}", join(knots_v));
        for (i, point) in surface.ctrlpts().iter().enumerate() {
            let w = surface.weights().map_or(1.0, |w| w[i]);
            let [x, y, z] = to_3d(point);
            let _ = writeln!(block, "{x} {y} {z} {w}");
        }
        blocks.push(block);
    }
    Ok(blocks.join("\n").into_bytes())
}
