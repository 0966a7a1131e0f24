//! Synthetic sorted sources for the comparison binary, benches and tests.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{MergeError, Result};

/// Values of the random and clustered patterns are drawn from `[0, VALUE_RANGE)`.
pub const VALUE_RANGE: u32 = 1_000_000;

/// How the `n` elements are split across the `k` sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Distribution {
    /// `n / k` each, the remainder going to the first sources.
    Uniform,
    /// First source gets 80%, the rest share 20%.
    Skewed,
    /// Source `i` gets `n / ((i + 1) * H_k)`; the last takes the remainder.
    PowerLaw,
    /// First source gets 99%, the second the rest, all others are empty.
    SingleDominant,
}

/// How values inside each source are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Uniform random values, sorted per source.
    Random,
    /// Source `i` yields `i, i + k, i + 2k, ...`; the merge alternates sources.
    Sequential,
    /// Source `i` draws from the `i`-th of `k` equal value ranges.
    Clustered,
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Distribution::Uniform => "uniform",
            Distribution::Skewed => "skewed",
            Distribution::PowerLaw => "power-law",
            Distribution::SingleDominant => "single-dominant",
        })
    }
}

impl FromStr for Distribution {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "uniform" => Ok(Distribution::Uniform),
            "skewed" => Ok(Distribution::Skewed),
            "power-law" => Ok(Distribution::PowerLaw),
            "single-dominant" => Ok(Distribution::SingleDominant),
            other => Err(MergeError::InvalidArgument(format!(
                "unknown distribution: {other}"
            ))),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pattern::Random => "random",
            Pattern::Sequential => "sequential",
            Pattern::Clustered => "clustered",
        })
    }
}

impl FromStr for Pattern {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Pattern::Random),
            "sequential" | "alternating" => Ok(Pattern::Sequential),
            "clustered" => Ok(Pattern::Clustered),
            other => Err(MergeError::InvalidArgument(format!(
                "unknown pattern: {other}"
            ))),
        }
    }
}

/// Seeded generator of sorted sources. The same seed yields the same data.
pub struct Workload {
    rng: StdRng,
}

impl Default for Workload {
    fn default() -> Self {
        Self::new(42)
    }
}

impl Workload {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `k` non-decreasing sources holding `n` values in total.
    pub fn generate(
        &mut self,
        k: usize,
        n: usize,
        distribution: Distribution,
        pattern: Pattern,
    ) -> Result<Vec<Vec<u32>>> {
        let counts = split_counts(k, n, distribution)?;
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| self.fill(i, k, count, pattern))
            .collect()
    }

    fn fill(&mut self, i: usize, k: usize, count: usize, pattern: Pattern) -> Result<Vec<u32>> {
        Ok(match pattern {
            Pattern::Random => {
                let mut values: Vec<u32> = (0..count)
                    .map(|_| self.rng.random_range(0..VALUE_RANGE))
                    .collect();
                values.sort_unstable();
                values
            }
            Pattern::Sequential => (0..count)
                .map(|j| sequential_value(i, j, k))
                .collect::<Result<Vec<u32>>>()?,
            Pattern::Clustered => {
                let width = (VALUE_RANGE as usize / k).max(1);
                let start = (i * width).min(VALUE_RANGE as usize - 1) as u32;
                let end = if i == k - 1 {
                    VALUE_RANGE
                } else {
                    (((i + 1) * width) as u32).clamp(start + 1, VALUE_RANGE)
                };
                let mut values: Vec<u32> = (0..count)
                    .map(|_| self.rng.random_range(start..end))
                    .collect();
                values.sort_unstable();
                values
            }
        })
    }
}

/// `i + j·k`, or an error once it no longer fits the value type.
fn sequential_value(i: usize, j: usize, k: usize) -> Result<u32> {
    j.checked_mul(k)
        .and_then(|offset| offset.checked_add(i))
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| {
            MergeError::InvalidArgument(format!(
                "sequential value {i} + {j}*{k} exceeds u32::MAX"
            ))
        })
}

/// Per-source element counts; always sums to `n`. Fails when `k` is zero.
pub fn split_counts(k: usize, n: usize, distribution: Distribution) -> Result<Vec<usize>> {
    if k == 0 {
        return Err(MergeError::InvalidArgument(
            "source count must be positive".to_string(),
        ));
    }
    let mut counts = vec![0usize; k];
    if k == 1 {
        counts[0] = n;
        return Ok(counts);
    }

    match distribution {
        Distribution::Uniform => {
            let (base, remainder) = (n / k, n % k);
            for (i, count) in counts.iter_mut().enumerate() {
                *count = base + usize::from(i < remainder);
            }
        }
        Distribution::Skewed => {
            counts[0] = n * 4 / 5;
            let rest = n - counts[0];
            let (base, remainder) = (rest / (k - 1), rest % (k - 1));
            for (i, count) in counts.iter_mut().enumerate().skip(1) {
                *count = base + usize::from(i - 1 < remainder);
            }
        }
        Distribution::PowerLaw => {
            let harmonic: f64 = (1..=k).map(|i| 1.0 / i as f64).sum();
            let mut assigned = 0;
            for (i, count) in counts.iter_mut().enumerate().take(k - 1) {
                *count = (n as f64 / ((i + 1) as f64 * harmonic)) as usize;
                assigned += *count;
            }
            counts[k - 1] = n - assigned;
        }
        Distribution::SingleDominant => {
            counts[0] = n * 99 / 100;
            counts[1] = n - counts[0];
        }
    }
    Ok(counts)
}
