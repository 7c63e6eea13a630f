//! faceforge - stochastic search for face-like quad compositions.
//!
//! Layers of randomly-perturbed translucent quadrilaterals are mutated
//! one step per tick and rendered; an external classifier scores each
//! frame, and an acceptance strategy (greedy hill climbing or simulated
//! annealing) decides whether the candidate replaces the incumbent.
//! When a run terminates (score threshold, generation cap, or
//! stagnation) the best face is handed to an export sink and the search
//! reseeds.
//!
//! The rasterizer, classifier and exporter are collaborators behind the
//! [`Rasterizer`], [`FaceOracle`] and [`export::ExportSink`] traits. A
//! tiny-skia CPU rasterizer and a PNG exporter are included; the
//! classifier is supplied by the host.
//!
//! # Example
//!
//! ```rust,no_run
//! use faceforge::{CpuRenderer, Detection, Engine, FaceOracle, SearchSettings};
//!
//! // a toy oracle; real hosts wrap an actual face detector
//! struct AlwaysFace;
//!
//! impl FaceOracle for AlwaysFace {
//!     fn detect(&mut self, _rgba: &[u8], width: u32, _height: u32) -> Vec<Detection> {
//!         vec![Detection {
//!             x: 5.0,
//!             y: 5.0,
//!             width: width as f32 - 10.0,
//!             height: width as f32 - 10.0,
//!             confidence: 12.0,
//!         }]
//!     }
//! }
//!
//! let cfg = SearchSettings::default();
//! let renderer = CpuRenderer::new(cfg.background);
//! let mut engine = Engine::new(cfg, renderer, AlwaysFace);
//!
//! loop {
//!     let report = engine.step();
//!     if let Some(face) = report.finished {
//!         println!("finished with {} quads", face.quads.len());
//!         break;
//!     }
//! }
//! ```

pub mod accept;
pub mod dna;
pub mod engine;
pub mod engine_thread;
pub mod export;
pub mod fitness;
pub mod geom;
pub mod mutate;
pub mod noise;
pub mod render;
pub mod settings;

pub use accept::AcceptanceStrategy;
pub use dna::{Face, Quad, SENTINEL_FITNESS};
pub use engine::{Engine, Mode, TickReport};
pub use engine_thread::{spawn_search, RunCommand, RunHandle, RunUpdate};
pub use fitness::{classify, Detection, FaceOracle, Verdict};
pub use geom::Bounds;
pub use render::{CpuRenderer, Rasterizer};
pub use settings::SearchSettings;
