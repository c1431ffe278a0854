/// ASCII rasterizer for the crane's draw-command stream
use crane3d_core::{projection_matrix, DrawCommand, DrawStyle, Mesh, ShapeKind};
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;

/// Character luminosity ramp for solid shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
/// Character used for wireframe edges
const WIRE_CHAR: char = '#';
/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 0.5;

/// The four unit meshes draw commands refer to, built once at startup.
pub struct ShapeLibrary {
    cube: Mesh,
    cylinder: Mesh,
    sphere: Mesh,
    pyramid: Mesh,
}

impl ShapeLibrary {
    pub fn new() -> Self {
        Self {
            cube: Mesh::unit(ShapeKind::Cube),
            cylinder: Mesh::unit(ShapeKind::Cylinder),
            sphere: Mesh::unit(ShapeKind::Sphere),
            pyramid: Mesh::unit(ShapeKind::Pyramid),
        }
    }

    pub fn mesh(&self, kind: ShapeKind) -> &Mesh {
        match kind {
            ShapeKind::Cube => &self.cube,
            ShapeKind::Cylinder => &self.cylinder,
            ShapeKind::Sphere => &self.sphere,
            ShapeKind::Pyramid => &self.pyramid,
        }
    }
}

impl Default for ShapeLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-buffered character renderer consuming draw commands.
///
/// Commands carry view-space transforms; the renderer owns the orthographic
/// projection so the same command stream works at any terminal size.
pub struct CraneRenderer {
    width: usize,
    height: usize,
    zoom: f32,
    projection: Matrix4<f32>,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl CraneRenderer {
    pub fn new(width: usize, height: usize, zoom: f32) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            zoom,
            projection: cell_corrected_projection(width, height, zoom),
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let size = width * height;
        self.width = width;
        self.height = height;
        self.projection = cell_corrected_projection(width, height, self.zoom);
        self.depth_buffer = vec![f32::INFINITY; size];
        self.char_buffer = vec![' '; size];
        self.color_buffer = vec![Color::Reset; size];
    }

    pub fn clear(&mut self) {
        for i in 0..self.depth_buffer.len() {
            self.depth_buffer[i] = f32::INFINITY;
            self.char_buffer[i] = ' ';
            self.color_buffer[i] = Color::Reset;
        }
    }

    /// Rasterize one command into the buffers.
    pub fn draw_command(&mut self, command: &DrawCommand, shapes: &ShapeLibrary) {
        let color = part_color(command.color);
        for triangle in &shapes.mesh(command.shape).triangles {
            // Into view space first; normals are recomputed there because
            // the rig's transforms scale non-uniformly.
            let p0 = command.transform.transform_point(&triangle.vertices[0].position);
            let p1 = command.transform.transform_point(&triangle.vertices[1].position);
            let p2 = command.transform.transform_point(&triangle.vertices[2].position);

            let mut screen = [(0.0f32, 0.0f32, 0.0f32); 3];
            let mut clipped = false;
            for (i, p) in [p0, p1, p2].iter().enumerate() {
                match self.project(p) {
                    Some(coords) => screen[i] = coords,
                    None => {
                        clipped = true;
                        break;
                    }
                }
            }
            if clipped {
                continue;
            }

            match command.style {
                DrawStyle::Solid => {
                    let normal = (p1 - p0).cross(&(p2 - p0));
                    let norm = normal.norm();
                    if norm < 1e-12 {
                        continue; // degenerate in view space
                    }
                    // Two-sided flat shading against the view axis.
                    let brightness = (normal.z / norm).abs();
                    let index = 1 + (brightness * (LUMINOSITY_RAMP.len() - 2) as f32) as usize;
                    let character = LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)];
                    self.fill_triangle(&screen, character, color);
                }
                DrawStyle::Wireframe => {
                    self.draw_line(screen[0], screen[1], color);
                    self.draw_line(screen[1], screen[2], color);
                    self.draw_line(screen[2], screen[0], color);
                }
            }
        }
    }

    fn project(&self, view_point: &Point3<f32>) -> Option<(f32, f32, f32)> {
        let ndc = self.projection.transform_point(view_point);

        // Clip test
        if ndc.x < -1.0 || ndc.x > 1.0 || ndc.y < -1.0 || ndc.y > 1.0 {
            return None;
        }

        // Convert to screen space; NDC depth is kept for the depth test
        let screen_x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * self.height as f32;
        Some((screen_x, screen_y, ndc.z))
    }

    fn fill_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, character, color);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, a: (f32, f32, f32), b: (f32, f32, f32), color: Color) {
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        for i in 0..=steps as usize {
            let t = i as f32 / steps;
            let depth = a.2 + (b.2 - a.2) * t;
            self.plot(
                (a.0 + dx * t).floor() as i32,
                (a.1 + dy * t).floor() as i32,
                depth,
                WIRE_CHAR,
                color,
            );
        }
    }

    /// Depth-tested single-cell write.
    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    /// Queue the whole frame. Rows are addressed absolutely so raw mode
    /// never sees a bare newline.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Orthographic projection widened for non-square terminal cells.
fn cell_corrected_projection(width: usize, height: usize, zoom: f32) -> Matrix4<f32> {
    let aspect = (width.max(1) as f32 * CELL_ASPECT) / height.max(1) as f32;
    projection_matrix(aspect, zoom)
}

fn part_color(rgb: [f32; 3]) -> Color {
    Color::Rgb {
        r: (rgb[0].clamp(0.0, 1.0) * 255.0) as u8,
        g: (rgb[1].clamp(0.0, 1.0) * 255.0) as u8,
        b: (rgb[2].clamp(0.0, 1.0) * 255.0) as u8,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crane3d_core::Transform;

    fn cube_command(style: DrawStyle, color: [f32; 3], z: f32, side: f32) -> DrawCommand {
        DrawCommand {
            shape: ShapeKind::Cube,
            style,
            color,
            transform: Transform::translation(0.0, 0.0, z) * Transform::uniform_scaling(side),
        }
    }

    fn written_cells(renderer: &CraneRenderer) -> usize {
        renderer.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    #[test]
    fn test_solid_command_fills_cells() {
        let shapes = ShapeLibrary::new();
        let mut renderer = CraneRenderer::new(40, 20, 30.0);
        renderer.draw_command(&cube_command(DrawStyle::Solid, [1.0, 0.0, 0.0], -50.0, 20.0), &shapes);
        assert!(written_cells(&renderer) > 0);
        // Solid faces shade with ramp characters, never blank ones.
        assert!(renderer.char_buffer.iter().all(|&c| c == ' ' || LUMINOSITY_RAMP[1..].contains(&c)));
    }

    #[test]
    fn test_wireframe_command_draws_edges() {
        let shapes = ShapeLibrary::new();
        let mut renderer = CraneRenderer::new(40, 20, 30.0);
        renderer.draw_command(
            &cube_command(DrawStyle::Wireframe, [0.0, 1.0, 0.0], -50.0, 20.0),
            &shapes,
        );
        let wires = renderer.char_buffer.iter().filter(|&&c| c == WIRE_CHAR).count();
        assert!(wires > 0);
        // Edges only: strictly fewer cells than the filled version writes.
        let mut filled = CraneRenderer::new(40, 20, 30.0);
        filled.draw_command(&cube_command(DrawStyle::Solid, [0.0, 1.0, 0.0], -50.0, 20.0), &shapes);
        assert!(written_cells(&renderer) < written_cells(&filled));
    }

    #[test]
    fn test_projection_centers_the_origin() {
        let shapes = ShapeLibrary::new();
        let mut renderer = CraneRenderer::new(40, 20, 30.0);
        renderer.draw_command(&cube_command(DrawStyle::Solid, [1.0, 1.0, 1.0], -50.0, 4.0), &shapes);
        let center = renderer.char_buffer[10 * 40 + 20];
        assert_ne!(center, ' ');
        // A small cube at the origin stays away from the screen border.
        assert!(renderer.char_buffer[..40].iter().all(|&c| c == ' '));
    }

    #[test]
    fn test_depth_keeps_the_nearer_write() {
        let near = part_color([0.0, 0.0, 1.0]);
        let shapes = ShapeLibrary::new();
        let mut renderer = CraneRenderer::new(40, 20, 30.0);
        renderer.draw_command(&cube_command(DrawStyle::Solid, [1.0, 0.0, 0.0], -100.0, 20.0), &shapes);
        renderer.draw_command(&cube_command(DrawStyle::Solid, [0.0, 0.0, 1.0], -50.0, 20.0), &shapes);
        assert_eq!(renderer.color_buffer[10 * 40 + 20], near);

        // Same result when the nearer cube is drawn first.
        renderer.clear();
        renderer.draw_command(&cube_command(DrawStyle::Solid, [0.0, 0.0, 1.0], -50.0, 20.0), &shapes);
        renderer.draw_command(&cube_command(DrawStyle::Solid, [1.0, 0.0, 0.0], -100.0, 20.0), &shapes);
        assert_eq!(renderer.color_buffer[10 * 40 + 20], near);
    }

    #[test]
    fn test_resize_rebuilds_buffers() {
        let mut renderer = CraneRenderer::new(40, 20, 30.0);
        renderer.resize(10, 5);
        assert_eq!(renderer.char_buffer.len(), 50);
        assert_eq!(renderer.depth_buffer.len(), 50);
        assert!(renderer.char_buffer.iter().all(|&c| c == ' '));
    }

    #[test]
    fn test_offscreen_command_writes_nothing() {
        let shapes = ShapeLibrary::new();
        let mut renderer = CraneRenderer::new(40, 20, 30.0);
        let far_left = DrawCommand {
            shape: ShapeKind::Cube,
            style: DrawStyle::Solid,
            color: [1.0, 1.0, 1.0],
            transform: Transform::translation(-500.0, 0.0, -50.0) * Transform::uniform_scaling(4.0),
        };
        renderer.draw_command(&far_left, &shapes);
        assert_eq!(written_cells(&renderer), 0);
    }
}
