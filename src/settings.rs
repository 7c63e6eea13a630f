/// search configuration. defaults reproduce the classic face-evolution
/// parameters; hosts can override any subset and persist to JSON.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::accept::AcceptanceStrategy;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchSettings {
    /// working canvas edge, in pixels (square)
    pub canvas_size: u32,
    /// exported image edge, in pixels
    pub output_size: u32,
    /// quads in a fresh seed candidate
    pub initial_quads: usize,
    /// population cap; removal probability reaches 1 here
    pub max_quads: usize,
    pub max_generations: u64,
    pub max_gens_without_improvement: u64,
    /// a run ends once the incumbent scores above this
    pub confidence_threshold: f32,
    /// corner jitter for seed quads
    pub seed_corner_spread: f32,
    /// corner jitter for quads added by mutation (larger than seeding)
    pub add_corner_spread: f32,
    /// canvas background, RGB
    pub background: [u8; 3],
    pub strategy: AcceptanceStrategy,
    /// sample a warm color per quad instead of the plain light fill
    pub per_quad_color: bool,
    /// grow added quads with the detected face width
    pub scale_to_detected: bool,
    /// confidence the annealing temperature and the scale growth aim at.
    /// empirically tuned, not structural
    pub target_confidence: f32,
    /// single detections below this fraction of the canvas are rejected.
    /// empirically tuned, not structural
    pub min_face_fraction: f32,
    /// detected-width divisor for scale_to_detected
    pub reference_size: f32,
    /// minimum pause between ticks in the run harness, for host
    /// responsiveness only
    pub tick_delay_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            canvas_size: 50,
            output_size: 100,
            initial_quads: 60,
            max_quads: 1000,
            max_generations: 6000,
            max_gens_without_improvement: 1000,
            confidence_threshold: 30.0,
            seed_corner_spread: 0.2,
            add_corner_spread: 0.5,
            background: [0x1E, 0x1E, 0x1E],
            strategy: AcceptanceStrategy::Annealing,
            per_quad_color: true,
            scale_to_detected: true,
            target_confidence: 35.0,
            min_face_fraction: 0.5,
            reference_size: 25.0,
            tick_delay_ms: 1,
        }
    }
}

impl SearchSettings {
    /// save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// load settings from a JSON file, falling back to defaults if the
    /// file is missing or unparseable
    pub fn load(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("failed to parse settings: {e}. using defaults.");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
