// background run harness: owns one engine on its own thread, paced by
// a minimum inter-tick delay, controlled over channels. cancellation
// lands only between ticks, so incumbent state is never torn.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::engine::{Engine, Mode};
use crate::export::ExportSink;
use crate::fitness::FaceOracle;
use crate::render::Rasterizer;
use crate::settings::SearchSettings;

/// messages from the host to the search thread
pub enum RunCommand {
    Start,
    Pause,
    Stop,
}

/// per-tick message from the search thread to the host
pub struct RunUpdate {
    pub generation: u64,
    pub mode: Mode,
    pub fitness: f32,
    pub quads: usize,
    /// human-readable tick outcome, e.g. "gen 42: face too small"
    pub note: String,
    /// where the finished face landed, when this tick ended a run
    pub exported: Option<PathBuf>,
}

pub struct RunHandle {
    pub commands: mpsc::Sender<RunCommand>,
    pub updates: mpsc::Receiver<RunUpdate>,
    pub thread: thread::JoinHandle<()>,
}

impl RunHandle {
    /// ask the thread to stop and wait for it to wind down.
    pub fn shutdown(self) {
        let _ = self.commands.send(RunCommand::Stop);
        let _ = self.thread.join();
    }
}

/// spawn a search over the given collaborators. the search starts
/// paused; send `RunCommand::Start` to begin ticking.
pub fn spawn_search<Rz, O, E>(
    cfg: SearchSettings,
    rasterizer: Rz,
    oracle: O,
    mut sink: E,
) -> RunHandle
where
    Rz: Rasterizer + Send + 'static,
    O: FaceOracle + Send + 'static,
    E: ExportSink + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (update_tx, update_rx) = mpsc::channel();
    let tick_delay = Duration::from_millis(cfg.tick_delay_ms);

    let handle = thread::Builder::new()
        .name("search".to_owned())
        .spawn(move || {
            let mut engine = Engine::new(cfg, rasterizer, oracle);
            let mut running = false;

            loop {
                profiling::scope!("search_thread_loop");

                match cmd_rx.try_recv() {
                    Ok(RunCommand::Start) => running = true,
                    Ok(RunCommand::Pause) => running = false,
                    Ok(RunCommand::Stop) | Err(mpsc::TryRecvError::Disconnected) => break,
                    Err(mpsc::TryRecvError::Empty) => {}
                }

                if !running {
                    // parked; don't busy-wait
                    thread::sleep(Duration::from_millis(10));
                    continue;
                }

                let report = engine.step();

                // hand a finished face to the export collaborator; a
                // failed export never stops the search
                let exported = report.finished.and_then(|face| match sink.export(&face) {
                    Ok(path) => Some(path),
                    Err(err) => {
                        log::error!("export failed: {err}");
                        None
                    }
                });

                let note = format!("gen {}: {}", report.generation, report.verdict);
                let update = RunUpdate {
                    generation: report.generation,
                    mode: report.mode,
                    fitness: report.incumbent_fitness,
                    quads: engine.incumbent().quads.len(),
                    note,
                    exported,
                };
                if update_tx.send(update).is_err() {
                    // host went away
                    break;
                }

                if !tick_delay.is_zero() {
                    thread::sleep(tick_delay);
                }
            }
        })
        .expect("spawn search thread");

    RunHandle {
        commands: cmd_tx,
        updates: update_rx,
        thread: handle,
    }
}
