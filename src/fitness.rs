// oracle interface and the classification gate.
//
// the oracle is opaque and untrusted beyond its returned numbers: any
// result other than "exactly one adequately-sized detection" scores as
// the sentinel and can never replace the incumbent.

use std::fmt;

use crate::dna::SENTINEL_FITNESS;

/// one detected region in buffer pixel coordinates (origin top-left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
}

/// external face classifier. `rgba` is the rendered frame as
/// premultiplied RGBA8, row-major.
pub trait FaceOracle {
    fn detect(&mut self, rgba: &[u8], width: u32, height: u32) -> Vec<Detection>;
}

/// gate outcome for one tick's oracle result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    /// nothing detected
    NoDetection,
    /// more than one region detected; only single faces are wanted
    Multiple(usize),
    /// a single region, but below half the canvas. guards against tiny
    /// spurious features dominating the search.
    TooSmall,
    /// a single adequately-sized face; carries the oracle confidence
    Face(f32),
}

impl Verdict {
    /// effective fitness for acceptance and termination purposes.
    pub fn score(&self) -> f32 {
        match self {
            Verdict::Face(confidence) => *confidence,
            _ => SENTINEL_FITNESS,
        }
    }

    pub fn is_face(&self) -> bool {
        matches!(self, Verdict::Face(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::NoDetection => write!(f, "no faces detected"),
            Verdict::Multiple(n) => write!(f, "multiple faces ({n})"),
            Verdict::TooSmall => write!(f, "face too small"),
            Verdict::Face(confidence) => write!(f, "fitness: {confidence:.4}"),
        }
    }
}

/// classify a raw oracle result for a `canvas_size` frame. a single
/// detection must span at least `min_face_fraction` of the canvas in
/// both dimensions to be trusted.
pub fn classify(detections: &[Detection], canvas_size: u32, min_face_fraction: f32) -> Verdict {
    match detections {
        [] => Verdict::NoDetection,
        [single] => {
            let min_extent = canvas_size as f32 * min_face_fraction;
            if single.width < min_extent || single.height < min_extent {
                Verdict::TooSmall
            } else {
                Verdict::Face(single.confidence)
            }
        }
        many => Verdict::Multiple(many.len()),
    }
}
