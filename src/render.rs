use std::sync::Arc;

use tiny_skia as sk;

use crate::dna::Quad;

/// rasterizer collaborator. paints quads in list order onto a
/// size x size canvas with the origin at the canvas center, and returns
/// the frame as premultiplied RGBA8 (tiny-skia's native format),
/// row-major.
pub trait Rasterizer {
    fn render(&mut self, quads: &[Arc<Quad>], size: u32) -> Vec<u8>;
}

/// CPU reference rasterizer. reuses one scratch pixmap across calls to
/// avoid per-tick allocations.
pub struct CpuRenderer {
    background: sk::Color,
    scratch: Option<sk::Pixmap>,
}

impl CpuRenderer {
    pub fn new(background: [u8; 3]) -> Self {
        CpuRenderer {
            background: sk::Color::from_rgba8(background[0], background[1], background[2], 255),
            scratch: None,
        }
    }

    /// render with an extra uniform world scale. the search itself
    /// always uses scale 1; the exporter re-renders at the output
    /// resolution with `output_size / canvas_size`.
    pub fn render_scaled(&mut self, quads: &[Arc<Quad>], size: u32, world_scale: f32) -> Vec<u8> {
        profiling::scope!("render_scaled");
        let needs_new = match &self.scratch {
            Some(pix) => pix.width() != size,
            None => true,
        };
        if needs_new {
            self.scratch = Some(sk::Pixmap::new(size, size).expect("pixmap"));
        }

        let background = self.background;
        let pix = self.scratch.as_mut().expect("scratch pixmap present");
        pix.fill(background);

        let half = size as f32 / 2.0;
        for quad in quads {
            draw_quad(pix, quad, half, world_scale);
        }

        pix.data().to_vec()
    }
}

impl Rasterizer for CpuRenderer {
    fn render(&mut self, quads: &[Arc<Quad>], size: u32) -> Vec<u8> {
        self.render_scaled(quads, size, 1.0)
    }
}

fn draw_quad(pix: &mut sk::Pixmap, quad: &Quad, half: f32, world_scale: f32) {
    profiling::scope!("draw_quad");

    let alpha = quad.opacity.abs().min(1.0);
    if alpha == 0.0 {
        return; // degenerate no-op fill
    }

    let mut pb = sk::PathBuilder::new();
    pb.move_to(quad.corners[0].0, quad.corners[0].1);
    for &(x, y) in &quad.corners[1..] {
        pb.line_to(x, y);
    }
    pb.close();
    let path = match pb.finish() {
        Some(path) => path,
        None => return, // collapsed to a point, nothing to fill
    };

    // positive opacity fills light (or the quad's own color), negative
    // fills dark
    let color = if quad.opacity > 0.0 {
        match quad.color {
            Some([r, g, b]) => sk::Color::from_rgba(
                r as f32 / 255.0,
                g as f32 / 255.0,
                b as f32 / 255.0,
                alpha,
            )
            .unwrap(),
            None => sk::Color::from_rgba(1.0, 1.0, 1.0, alpha).unwrap(),
        }
    } else {
        sk::Color::from_rgba(0.0, 0.0, 0.0, alpha).unwrap()
    };

    let mut paint = sk::Paint::default();
    paint.anti_alias = true;
    paint.shader = sk::Shader::SolidColor(color);

    // unit-square corners -> scale -> place relative to canvas center
    let s = quad.scale * world_scale;
    let transform = sk::Transform::from_scale(s, s).post_translate(
        half + quad.origin.0 * world_scale,
        half + quad.origin.1 * world_scale,
    );

    pix.fill_path(&path, &paint, sk::FillRule::Winding, transform, None);
}

/// undo alpha premultiplication for export to straight-RGBA formats.
pub fn unpremultiply(p: &[u8]) -> Vec<u8> {
    profiling::scope!("unpremultiply");
    let mut out = vec![0u8; p.len()];
    let mut i = 0usize;

    while i < p.len() {
        let a = p[i + 3] as u16;
        if a > 0 {
            out[i] = ((p[i] as u16 * 255 + a / 2) / a).min(255) as u8;
            out[i + 1] = ((p[i + 1] as u16 * 255 + a / 2) / a).min(255) as u8;
            out[i + 2] = ((p[i + 2] as u16 * 255 + a / 2) / a).min(255) as u8;
            out[i + 3] = a as u8;
        }
        i += 4;
    }

    out
}
