use std::sync::Arc;

use rand::Rng;

use crate::fitness::Detection;
use crate::geom::Bounds;
use crate::noise;

/// fitness of a candidate that has never produced a single-face
/// detection. below any confidence the oracle can report.
pub const SENTINEL_FITNESS: f32 = -999.0;

// warm per-channel palette for colored quads (mean, spread)
const COLOR_CHANNELS: [(f32, f32); 3] = [(186.0, 40.0), (108.0, 20.0), (73.0, 20.0)];

/// a randomly-perturbed quadrilateral. immutable once constructed;
/// candidates share quads by `Arc` since they are never mutated.
#[derive(Debug)]
pub struct Quad {
    /// 4 corners near the unit square, wound TL → TR → BR → BL
    pub corners: [(f32, f32); 4],
    /// placement in the center-origin working space
    pub origin: (f32, f32),
    /// uniform size multiplier
    pub scale: f32,
    /// signed fill: positive draws light at |opacity| alpha, negative
    /// draws dark. zero is a no-op fill.
    pub opacity: f32,
    /// sampled once at construction; used only when opacity is positive
    pub color: Option<[u8; 3]>,
}

impl Quad {
    /// build a quad whose corners are the unit square's corners, each
    /// perturbed independently by `corner_spread`.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        origin: (f32, f32),
        scale: f32,
        opacity: f32,
        corner_spread: f32,
        with_color: bool,
    ) -> Self {
        let corners = [
            (noise::sample(rng, -0.5, corner_spread), noise::sample(rng, -0.5, corner_spread)),
            (noise::sample(rng, 0.5, corner_spread), noise::sample(rng, -0.5, corner_spread)),
            (noise::sample(rng, 0.5, corner_spread), noise::sample(rng, 0.5, corner_spread)),
            (noise::sample(rng, -0.5, corner_spread), noise::sample(rng, 0.5, corner_spread)),
        ];

        let color = with_color.then(|| {
            let mut rgb = [0u8; 3];
            for (slot, (mean, spread)) in rgb.iter_mut().zip(COLOR_CHANNELS) {
                *slot = noise::sample(rng, mean, spread).round().clamp(0.0, 255.0) as u8;
            }
            rgb
        });

        Quad {
            corners,
            origin,
            scale,
            opacity: opacity.clamp(-1.0, 1.0),
            color,
        }
    }
}

/// one candidate configuration: an ordered quad stack (paint order =
/// list order) plus its last-measured fitness and face bounds.
///
/// cloning is cheap: the quad list is shared structurally and only
/// touched at the single mutation point.
#[derive(Clone, Debug)]
pub struct Face {
    pub quads: Vec<Arc<Quad>>,
    pub fitness: f32,
    pub bounds: Bounds,
}

impl Face {
    /// empty, unmeasured candidate covering the full canvas extent.
    pub fn empty(canvas_size: u32) -> Self {
        Face::with_quads(Vec::new(), canvas_size)
    }

    /// unmeasured candidate holding the given stack.
    pub fn with_quads(quads: Vec<Arc<Quad>>, canvas_size: u32) -> Self {
        Face {
            quads,
            fitness: SENTINEL_FITNESS,
            bounds: Bounds::full_canvas(canvas_size),
        }
    }

    /// record a single-face detection: bounds move into the
    /// center-origin space, fitness takes the raw confidence.
    pub fn apply_detection(&mut self, det: &Detection, canvas_size: u32) {
        self.bounds = Bounds::from_buffer(det.x, det.y, det.width, det.height, canvas_size);
        self.fitness = det.confidence;
    }
}
