use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::dna::Face;
use crate::fitness::{classify, FaceOracle, Verdict};
use crate::mutate;
use crate::render::Rasterizer;
use crate::settings::SearchSettings;

/// search phase. SEEDING spams fresh random candidates until one trips
/// the gate; EVOLVING mutates the incumbent one step per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Seeding,
    Evolving,
}

/// what one tick did, for host status display and the run lifecycle.
#[derive(Debug)]
pub struct TickReport {
    /// generation counter after the tick (0 while seeding)
    pub generation: u64,
    /// mode after the tick
    pub mode: Mode,
    /// gate classification of this tick's candidate
    pub verdict: Verdict,
    /// did the candidate replace the incumbent?
    pub accepted: bool,
    pub incumbent_fitness: f32,
    /// present when the tick ended a run: the finished incumbent,
    /// ready for the export collaborator. the engine has already reset
    /// into a new seeding phase.
    pub finished: Option<Face>,
}

/// the evolution controller: one mutable run state, driven one tick at
/// a time. collaborators (rasterizer, oracle) are called strictly
/// sequentially, never overlapping.
pub struct Engine<Rz, O> {
    rng: Pcg32,
    cfg: SearchSettings,
    rasterizer: Rz,
    oracle: O,
    mode: Mode,
    incumbent: Face,
    generation: u64,
    last_improved_gen: u64,
}

impl<Rz: Rasterizer, O: FaceOracle> Engine<Rz, O> {
    pub fn new(cfg: SearchSettings, rasterizer: Rz, oracle: O) -> Self {
        let seed = rand::rng().random::<u64>();
        Self::with_seed(cfg, rasterizer, oracle, seed)
    }

    /// deterministic construction for reproducible runs and tests.
    pub fn with_seed(cfg: SearchSettings, rasterizer: Rz, oracle: O, seed: u64) -> Self {
        let incumbent = Face::empty(cfg.canvas_size);
        Engine {
            rng: Pcg32::seed_from_u64(seed),
            cfg,
            rasterizer,
            oracle,
            mode: Mode::Seeding,
            incumbent,
            generation: 0,
            last_improved_gen: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn incumbent(&self) -> &Face {
        &self.incumbent
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.cfg
    }

    /// drop all run state and start a new seeding phase.
    pub fn reset(&mut self) {
        self.incumbent = Face::empty(self.cfg.canvas_size);
        self.generation = 0;
        self.last_improved_gen = 0;
        self.mode = Mode::Seeding;
    }

    /// one tick: produce a candidate (fresh seed or mutation), render
    /// it, score it through the gate, let the acceptance strategy
    /// decide, then check termination.
    pub fn step(&mut self) -> TickReport {
        profiling::scope!("step");
        let evolving = self.mode == Mode::Evolving;

        let mut candidate = if evolving {
            self.generation += 1;
            mutate::produce_child(&self.incumbent, &mut self.rng, &self.cfg)
        } else {
            mutate::seed_face(&mut self.rng, &self.cfg)
        };

        let size = self.cfg.canvas_size;
        let frame = self.rasterizer.render(&candidate.quads, size);
        let detections = self.oracle.detect(&frame, size, size);

        // exactly one region refreshes the candidate's bounds and raw
        // fitness; anything else leaves them untouched
        if let [single] = detections.as_slice() {
            candidate.apply_detection(single, size);
        }

        let verdict = classify(&detections, size, self.cfg.min_face_fraction);
        let score = verdict.score();

        let accepted = self.cfg.strategy.accept(
            &mut self.rng,
            score,
            self.incumbent.fitness,
            self.cfg.target_confidence,
        );
        if accepted {
            self.mode = Mode::Evolving;
            self.last_improved_gen = self.generation;
            self.incumbent = candidate;
        }

        log::debug!(
            "gen {}: {}{}",
            self.generation,
            verdict,
            if accepted { " (accepted)" } else { "" }
        );

        let generation = self.generation;
        let incumbent_fitness = self.incumbent.fitness;

        // termination only ends an evolving run; the tick that promotes
        // a seed never exports it
        let finished = if evolving && self.should_finish() {
            log::info!(
                "run finished at gen {generation}: fitness {incumbent_fitness:.4}, {} quads",
                self.incumbent.quads.len()
            );
            let face = std::mem::replace(&mut self.incumbent, Face::empty(size));
            self.generation = 0;
            self.last_improved_gen = 0;
            self.mode = Mode::Seeding;
            Some(face)
        } else {
            None
        };

        TickReport {
            generation,
            mode: self.mode,
            verdict,
            accepted,
            incumbent_fitness,
            finished,
        }
    }

    fn should_finish(&self) -> bool {
        self.generation > self.cfg.max_generations
            || self.generation - self.last_improved_gen > self.cfg.max_gens_without_improvement
            || self.incumbent.fitness > self.cfg.confidence_threshold
    }
}
