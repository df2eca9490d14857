/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use meshview_core::{OrbitalCamera, Projection, Triangle, Vec3, VertexBuffer};
use nalgebra::Matrix4;
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f32 = 2.0;

/// ASCII renderer that converts interleaved vertex buffers to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    projection: Projection,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let mut renderer = Self {
            width: 0,
            height: 0,
            depth_buffer: Vec::new(),
            char_buffer: Vec::new(),
            projection: Projection::default(),
        };
        renderer.resize(width, height);
        renderer
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let size = width * height;
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.char_buffer = vec![' '; size];
        // Cells are taller than wide, so the raster is treated as stretched vertically
        self.projection
            .resize(width as u32, (height as f32 * CELL_ASPECT) as u32);
    }

    /// Projection whose aspect ratio accounts for non-square cells.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn render_mesh(
        &mut self,
        vertices: &VertexBuffer,
        model: &Matrix4<f32>,
        camera: &OrbitalCamera,
    ) {
        let mvp = self.projection().mvp(camera, model);
        // Headlight: light travels from the eye toward the origin
        let eye = camera.position().coords.normalize();

        for triangle in vertices.triangles() {
            self.render_triangle(&triangle, &mvp, model, &eye);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        mvp: &Matrix4<f32>,
        model: &Matrix4<f32>,
        eye: &Vec3,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coords, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match Projection::project_to_screen(
                mvp,
                &vertex.position,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *coords = projected,
                None => return, // Triangle is clipped
            }
        }

        // Two-sided shading from the facet normal
        let normal = model
            .transform_vector(&triangle.shading_normal())
            .try_normalize(1e-12)
            .unwrap_or_else(Vec3::zeros);
        let brightness = normal.dot(eye).abs();

        // Map brightness to character, never blank for a visible facet
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (row, line) in self.char_buffer.chunks(self.width.max(1)).enumerate() {
            if row > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for &c in line {
                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
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
