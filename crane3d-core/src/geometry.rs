/// Geometry primitives and unit meshes for the crane parts
use nalgebra::{Point3, Vector3};

use crate::scene::ShapeKind;

/// Segments around the cylinder axis.
const CYLINDER_SEGMENTS: usize = 16;
/// Latitude bands of the sphere.
const SPHERE_STACKS: usize = 8;
/// Longitude bands of the sphere.
const SPHERE_SLICES: usize = 16;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// The unit mesh a draw command's shape refers to.
    pub fn unit(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Cube => unit_cube(),
            ShapeKind::Cylinder => unit_cylinder(),
            ShapeKind::Sphere => unit_sphere(),
            ShapeKind::Pyramid => unit_pyramid(),
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

fn vert(p: Point3<f32>, n: Vector3<f32>) -> Vertex {
    Vertex::new(p.x, p.y, p.z, n.x, n.y, n.z)
}

/// Two triangles fanned from the first corner, sharing one flat normal.
fn add_quad(mesh: &mut Mesh, normal: Vector3<f32>, corners: [Point3<f32>; 4]) {
    mesh.add_triangle(Triangle::new(
        vert(corners[0], normal),
        vert(corners[1], normal),
        vert(corners[2], normal),
    ));
    mesh.add_triangle(Triangle::new(
        vert(corners[0], normal),
        vert(corners[2], normal),
        vert(corners[3], normal),
    ));
}

/// A triangle whose flat normal is derived from its winding.
fn flat_triangle(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Triangle {
    let normal = (p1 - p0).cross(&(p2 - p0)).normalize();
    Triangle::new(vert(p0, normal), vert(p1, normal), vert(p2, normal))
}

/// Axis-aligned cube with side 1, centered on the origin.
pub fn unit_cube() -> Mesh {
    let h = 0.5;
    let p = Point3::new;
    let mut mesh = Mesh::with_capacity(12);

    // Corners wound counter-clockwise as seen from outside each face.
    add_quad(
        &mut mesh,
        Vector3::new(0.0, 0.0, 1.0),
        [p(-h, -h, h), p(h, -h, h), p(h, h, h), p(-h, h, h)],
    );
    add_quad(
        &mut mesh,
        Vector3::new(0.0, 0.0, -1.0),
        [p(-h, -h, -h), p(-h, h, -h), p(h, h, -h), p(h, -h, -h)],
    );
    add_quad(
        &mut mesh,
        Vector3::new(0.0, 1.0, 0.0),
        [p(-h, h, -h), p(-h, h, h), p(h, h, h), p(h, h, -h)],
    );
    add_quad(
        &mut mesh,
        Vector3::new(0.0, -1.0, 0.0),
        [p(-h, -h, -h), p(h, -h, -h), p(h, -h, h), p(-h, -h, h)],
    );
    add_quad(
        &mut mesh,
        Vector3::new(1.0, 0.0, 0.0),
        [p(h, -h, -h), p(h, h, -h), p(h, h, h), p(h, -h, h)],
    );
    add_quad(
        &mut mesh,
        Vector3::new(-1.0, 0.0, 0.0),
        [p(-h, -h, -h), p(-h, -h, h), p(-h, h, h), p(-h, h, -h)],
    );

    mesh
}

/// Capped cylinder with radius 0.5 and height 1 along the Y axis.
pub fn unit_cylinder() -> Mesh {
    let r = 0.5;
    let h = 0.5;
    let mut mesh = Mesh::with_capacity(CYLINDER_SEGMENTS * 4);

    let top_center = Point3::new(0.0, h, 0.0);
    let bottom_center = Point3::new(0.0, -h, 0.0);
    let up = Vector3::new(0.0, 1.0, 0.0);
    let down = Vector3::new(0.0, -1.0, 0.0);

    for i in 0..CYLINDER_SEGMENTS {
        let a0 = i as f32 / CYLINDER_SEGMENTS as f32 * std::f32::consts::TAU;
        let a1 = (i + 1) as f32 / CYLINDER_SEGMENTS as f32 * std::f32::consts::TAU;

        let n0 = Vector3::new(a0.cos(), 0.0, a0.sin());
        let n1 = Vector3::new(a1.cos(), 0.0, a1.sin());
        let b0 = Point3::new(r * a0.cos(), -h, r * a0.sin());
        let b1 = Point3::new(r * a1.cos(), -h, r * a1.sin());
        let t0 = Point3::new(r * a0.cos(), h, r * a0.sin());
        let t1 = Point3::new(r * a1.cos(), h, r * a1.sin());

        // Side wall with smooth radial normals.
        mesh.add_triangle(Triangle::new(vert(b0, n0), vert(t0, n0), vert(t1, n1)));
        mesh.add_triangle(Triangle::new(vert(b0, n0), vert(t1, n1), vert(b1, n1)));

        // Cap fans.
        mesh.add_triangle(Triangle::new(
            vert(top_center, up),
            vert(t1, up),
            vert(t0, up),
        ));
        mesh.add_triangle(Triangle::new(
            vert(bottom_center, down),
            vert(b0, down),
            vert(b1, down),
        ));
    }

    mesh
}

/// Latitude/longitude sphere with radius 0.5, centered on the origin.
pub fn unit_sphere() -> Mesh {
    let r = 0.5;
    let mut mesh = Mesh::with_capacity(SPHERE_STACKS * SPHERE_SLICES * 2);

    let point_at = |stack: usize, slice: usize| {
        let phi = stack as f32 / SPHERE_STACKS as f32 * std::f32::consts::PI;
        let theta = slice as f32 / SPHERE_SLICES as f32 * std::f32::consts::TAU;
        Point3::new(
            r * phi.sin() * theta.cos(),
            r * phi.cos(),
            r * phi.sin() * theta.sin(),
        )
    };
    let sphere_vert = |p: Point3<f32>| vert(p, (p - Point3::origin()).normalize());

    for i in 0..SPHERE_STACKS {
        for j in 0..SPHERE_SLICES {
            let p00 = point_at(i, j);
            let p01 = point_at(i, j + 1);
            let p10 = point_at(i + 1, j);
            let p11 = point_at(i + 1, j + 1);

            // The band touching a pole degenerates to a single fan.
            if i != 0 {
                mesh.add_triangle(Triangle::new(
                    sphere_vert(p00),
                    sphere_vert(p01),
                    sphere_vert(p11),
                ));
            }
            if i != SPHERE_STACKS - 1 {
                mesh.add_triangle(Triangle::new(
                    sphere_vert(p00),
                    sphere_vert(p11),
                    sphere_vert(p10),
                ));
            }
        }
    }

    mesh
}

/// Square pyramid with base side 1 at y = -0.5 and apex at y = 0.5.
pub fn unit_pyramid() -> Mesh {
    let h = 0.5;
    let apex = Point3::new(0.0, h, 0.0);
    let b0 = Point3::new(-h, -h, -h);
    let b1 = Point3::new(h, -h, -h);
    let b2 = Point3::new(h, -h, h);
    let b3 = Point3::new(-h, -h, h);

    let mut mesh = Mesh::with_capacity(6);
    mesh.add_triangle(flat_triangle(b3, b2, apex));
    mesh.add_triangle(flat_triangle(b2, b1, apex));
    mesh.add_triangle(flat_triangle(b1, b0, apex));
    mesh.add_triangle(flat_triangle(b0, b3, apex));
    add_quad(&mut mesh, Vector3::new(0.0, -1.0, 0.0), [b0, b1, b2, b3]);

    mesh
}
