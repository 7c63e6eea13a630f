// candidate construction: random seeds and single-step mutations.

use std::sync::Arc;

use rand::Rng;

use crate::dna::{Face, Quad};
use crate::noise;
use crate::settings::SearchSettings;

/// a fresh random seed candidate: a dense, mostly-light cluster of
/// quads around the canvas center, sized to trip the oracle's first
/// positive detection.
pub fn seed_face<R: Rng + ?Sized>(rng: &mut R, cfg: &SearchSettings) -> Face {
    profiling::scope!("seed_face");
    let size = cfg.canvas_size as f32;

    let quads = (0..cfg.initial_quads)
        .map(|_| {
            let origin = (
                noise::sample(rng, 0.0, size / 10.0),
                noise::sample(rng, -size / 8.0, size / 6.0),
            );
            let scale = noise::sample(rng, size / 3.0, size / 7.5);
            let opacity = noise::sample(rng, 0.02, 0.2);
            Arc::new(Quad::new(
                rng,
                origin,
                scale,
                opacity,
                cfg.seed_corner_spread,
                cfg.per_quad_color,
            ))
        })
        .collect();

    Face::with_quads(quads, cfg.canvas_size)
}

/// derive a child candidate from `parent`: share the quad list, then
/// either remove one quad or add one.
///
/// removal probability is `len / max_quads`, so it is 0 for an empty
/// stack and reaches 1 at the population cap. the child starts
/// unmeasured.
pub fn produce_child<R: Rng + ?Sized>(parent: &Face, rng: &mut R, cfg: &SearchSettings) -> Face {
    profiling::scope!("produce_child");
    let mut quads = parent.quads.clone();

    if rng.random::<f32>() * (cfg.max_quads as f32) < quads.len() as f32 {
        let victim = rng.random_range(0..quads.len());
        quads.remove(victim);
    } else {
        // center new quads on the last detected face
        let (cx, cy) = parent.bounds.center();
        let origin = (
            noise::sample(rng, cx, parent.bounds.width / 4.0),
            noise::sample(rng, cy, parent.bounds.height / 4.0),
        );

        // big strokes while the score is far from the target, detail
        // work once it is close
        let mut scale = if parent.fitness < cfg.target_confidence {
            (cfg.target_confidence - parent.fitness).abs().sqrt()
        } else {
            1.0
        };
        if cfg.scale_to_detected {
            scale *= parent.bounds.width / cfg.reference_size;
        }

        let opacity = noise::sample(rng, 0.0, 0.45).clamp(-1.0, 1.0);

        quads.push(Arc::new(Quad::new(
            rng,
            origin,
            scale,
            opacity,
            cfg.add_corner_spread,
            cfg.per_quad_color,
        )));
    }

    Face::with_quads(quads, cfg.canvas_size)
}
