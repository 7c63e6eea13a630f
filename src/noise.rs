// single source of randomness shape for the whole search.
//
// every stochastic choice (corner jitter, origins, scales, opacities)
// routes through sample() so the distribution can be swapped in one place.

use rand::Rng;

/// approximate bell-curve sample: sum of three uniforms in [-1, 1],
/// scaled by `spread` and shifted by `mean`.
///
/// cheap, bounded to mean ± 3·spread, and close enough to normal for
/// mutation purposes.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, mean: f32, spread: f32) -> f32 {
    let sum = (rng.random::<f32>() * 2.0 - 1.0)
        + (rng.random::<f32>() * 2.0 - 1.0)
        + (rng.random::<f32>() * 2.0 - 1.0);
    sum * spread + mean
}
