//! Resampling schemes for the non-parametric bootstrap
//!
//! Each scheme owns its generator, so a seeded scheme yields the same
//! sequence of resamples on every run.

use super::make_rng;
use rand::rngs::StdRng;
use rand::Rng;

/// Draws resamples of a series
pub trait Resampler {
    /// Overwrite `out` with one resample of `data` of length `n`
    fn resample_into(&mut self, data: &[f64], n: usize, out: &mut Vec<f64>);

    /// `n_samples` resamples of length `n`
    fn samples(&mut self, data: &[f64], n: usize, n_samples: usize) -> Vec<Vec<f64>> {
        (0..n_samples)
            .map(|_| {
                let mut out = Vec::with_capacity(n);
                self.resample_into(data, n, &mut out);
                out
            })
            .collect()
    }
}

/// Observations drawn independently with replacement
#[derive(Debug, Clone)]
pub struct IidBootstrap {
    rng: StdRng,
}

impl IidBootstrap {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: make_rng(seed),
        }
    }
}

impl Resampler for IidBootstrap {
    fn resample_into(&mut self, data: &[f64], n: usize, out: &mut Vec<f64>) {
        out.clear();
        if data.is_empty() {
            return;
        }
        let len = data.len();
        out.extend((0..n).map(|_| data[self.rng.gen_range(0..len)]));
    }
}

/// Fixed-length blocks of consecutive observations, wrapping past the end
#[derive(Debug, Clone)]
pub struct CircularBlockBootstrap {
    block_length: usize,
    rng: StdRng,
}

impl CircularBlockBootstrap {
    /// A `block_length` of 0 is treated as 1
    pub fn new(block_length: usize, seed: Option<u64>) -> Self {
        Self {
            block_length: block_length.max(1),
            rng: make_rng(seed),
        }
    }
}

impl Resampler for CircularBlockBootstrap {
    fn resample_into(&mut self, data: &[f64], n: usize, out: &mut Vec<f64>) {
        out.clear();
        if data.is_empty() {
            return;
        }
        let len = data.len();
        while out.len() < n {
            let start = self.rng.gen_range(0..len);
            let take = self.block_length.min(n - out.len());
            out.extend((start..start + take).map(|i| data[i % len]));
        }
    }
}

/// Politis-Romano stationary bootstrap
///
/// Blocks wrap circularly and have geometrically distributed lengths with
/// the given mean. After each observation a new block starts with
/// probability `1 / expected_block_length`.
#[derive(Debug, Clone)]
pub struct StationaryBootstrap {
    restart_probability: f64,
    rng: StdRng,
}

impl StationaryBootstrap {
    /// Expected block lengths below 1 are treated as 1
    pub fn new(expected_block_length: f64, seed: Option<u64>) -> Self {
        let mean_length = if expected_block_length.is_finite() {
            expected_block_length.max(1.0)
        } else {
            1.0
        };
        Self {
            restart_probability: 1.0 / mean_length,
            rng: make_rng(seed),
        }
    }
}

impl Resampler for StationaryBootstrap {
    fn resample_into(&mut self, data: &[f64], n: usize, out: &mut Vec<f64>) {
        out.clear();
        if data.is_empty() || n == 0 {
            return;
        }
        let len = data.len();
        let mut index = self.rng.gen_range(0..len);
        out.push(data[index]);
        while out.len() < n {
            index = if self.rng.gen_bool(self.restart_probability) {
                self.rng.gen_range(0..len)
            } else {
                (index + 1) % len
            };
            out.push(data[index]);
        }
    }
}
