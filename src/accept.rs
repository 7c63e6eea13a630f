use rand::Rng;
use serde::{Deserialize, Serialize};

/// decision function comparing a candidate's gated fitness to the
/// incumbent's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptanceStrategy {
    /// strictly monotonic improvement only
    Greedy,
    /// tolerate regressions early, get greedier as the incumbent nears
    /// the target confidence
    Annealing,
}

impl AcceptanceStrategy {
    /// should `candidate` replace `incumbent`? `target` is the
    /// confidence toward which the annealing temperature cools.
    pub fn accept<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        candidate: f32,
        incumbent: f32,
        target: f32,
    ) -> bool {
        match self {
            AcceptanceStrategy::Greedy => candidate > incumbent,
            AcceptanceStrategy::Annealing => {
                // a better state is always taken
                if candidate > incumbent {
                    return true;
                }

                // never move to something that is not a face
                if candidate <= 0.0 {
                    return false;
                }

                // same score: coin flip
                if candidate == incumbent {
                    return rng.random::<f32>() < 0.5;
                }

                // worse but positive: move with a probability set by the
                // score drop and the current temperature. temperature
                // falls toward 0.01 as the incumbent approaches target.
                let temperature = (1.0 - incumbent / target).max(0.01);
                let probability = ((candidate - incumbent) / temperature * 5.0).exp();
                rng.random::<f32>() < probability
            }
        }
    }
}
