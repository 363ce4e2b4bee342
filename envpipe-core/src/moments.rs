//! Streaming estimates of mean and variance.
//!
//! The estimate is updated by merging the moments of a new batch into the
//! current ones (the parallel-moments combination of two Gaussian summaries):
//!
//! ```text
//! delta      = batch_mean - mean
//! total      = count + batch_count
//! new_mean   = mean + delta * batch_count / total
//! M2         = var * count + batch_var * batch_count + delta^2 * count * batch_count / total
//! new_var    = M2 / total
//! new_count  = total
//! ```
//!
//! The same merge is used for per-dimension observation statistics
//! ([`NormObs`](crate::NormObs)) and for the scalar discounted-return statistic
//! ([`NormRet`](crate::NormRet)).
use crate::error::EnvPipeError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Merges batch moments into the current moments of a single dimension.
///
/// Returns `(new_mean, new_var, new_count)`.
pub fn merge_moments(
    mean: f64,
    var: f64,
    count: f64,
    batch_mean: f64,
    batch_var: f64,
    batch_count: f64,
) -> (f64, f64, f64) {
    let delta = batch_mean - mean;
    let total = count + batch_count;
    let new_mean = mean + delta * batch_count / total;
    let m2 = var * count + batch_var * batch_count + delta * delta * count * batch_count / total;

    (new_mean, m2 / total, total)
}

/// Running mean and variance of a vector-valued stream.
///
/// The sample count starts at a positive floor, so the estimate never divides
/// by zero. The initial estimate is mean `0` and variance `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningMoments {
    mean: Vec<f64>,
    var: Vec<f64>,
    count: f64,
}

impl RunningMoments {
    /// Creates an estimate for `dim`-dimensional samples.
    ///
    /// `count_floor` is the initial sample count and must be positive.
    pub fn new(dim: usize, count_floor: f64) -> Result<Self> {
        if !(count_floor > 0.0) {
            return Err(EnvPipeError::InvalidConfig(format!(
                "count floor must be positive, got {}",
                count_floor
            ))
            .into());
        }

        Ok(Self {
            mean: vec![0.0; dim],
            var: vec![1.0; dim],
            count: count_floor,
        })
    }

    /// Creates an estimate for a scalar stream.
    pub fn scalar(count_floor: f64) -> Result<Self> {
        Self::new(1, count_floor)
    }

    /// Creates an estimate from given moments.
    pub fn from_moments(mean: Vec<f64>, var: Vec<f64>, count: f64) -> Result<Self> {
        if mean.len() != var.len() {
            return Err(EnvPipeError::ShapeMismatch {
                expected: vec![mean.len()],
                found: vec![var.len()],
            }
            .into());
        }
        if !(count > 0.0) {
            return Err(EnvPipeError::InvalidConfig(format!(
                "count must be positive, got {}",
                count
            ))
            .into());
        }

        Ok(Self { mean, var, count })
    }

    /// Merges the moments of a batch.
    pub fn update_from_moments(
        &mut self,
        batch_mean: &[f64],
        batch_var: &[f64],
        batch_count: f64,
    ) -> Result<()> {
        if !(batch_count > 0.0) {
            return Err(EnvPipeError::InvalidConfig(format!(
                "batch count must be positive, got {}",
                batch_count
            ))
            .into());
        }
        self.check_dim(batch_mean.len())?;
        self.check_dim(batch_var.len())?;

        let mut total = self.count;
        for i in 0..self.mean.len() {
            let (m, v, c) = merge_moments(
                self.mean[i],
                self.var[i],
                self.count,
                batch_mean[i],
                batch_var[i],
                batch_count,
            );
            self.mean[i] = m;
            self.var[i] = v;
            total = c;
        }
        self.count = if self.mean.is_empty() {
            self.count + batch_count
        } else {
            total
        };

        Ok(())
    }

    /// Merges a single sample, i.e., a batch of size 1 with zero variance.
    pub fn update(&mut self, sample: &[f64]) -> Result<()> {
        let zeros = vec![0.0; sample.len()];
        self.update_from_moments(sample, &zeros, 1.0)
    }

    /// Computes the moments of the samples and merges them at once.
    pub fn update_batch(&mut self, samples: &[Vec<f64>]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        for s in samples.iter() {
            self.check_dim(s.len())?;
        }

        let n = samples.len() as f64;
        let dim = self.mean.len();
        let mut batch_mean = vec![0.0; dim];
        for s in samples.iter() {
            for (m, x) in batch_mean.iter_mut().zip(s.iter()) {
                *m += x / n;
            }
        }
        let mut batch_var = vec![0.0; dim];
        for s in samples.iter() {
            for i in 0..dim {
                let d = s[i] - batch_mean[i];
                batch_var[i] += d * d / n;
            }
        }

        self.update_from_moments(&batch_mean, &batch_var, n)
    }

    /// Returns `(x - mean) / (sqrt(var) + eps)` for every dimension.
    pub fn normalize(&self, x: &[f64], eps: f64) -> Result<Vec<f64>> {
        self.check_dim(x.len())?;

        Ok(x.iter()
            .zip(self.mean.iter().zip(self.var.iter()))
            .map(|(x, (m, v))| (x - m) / (v.sqrt() + eps))
            .collect())
    }

    /// Returns `sqrt(var + eps)` for every dimension.
    pub fn std(&self, eps: f64) -> Vec<f64> {
        self.var.iter().map(|v| (v + eps).sqrt()).collect()
    }

    /// Mean.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Variance.
    pub fn var(&self) -> &[f64] {
        &self.var
    }

    /// The (floored) number of merged samples.
    pub fn count(&self) -> f64 {
        self.count
    }

    /// Dimensionality of the samples.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Constructs [`RunningMoments`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let moments: Self = serde_yaml::from_reader(rdr)?;
        Self::from_moments(moments.mean, moments.var, moments.count)
    }

    /// Saves [`RunningMoments`] as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    fn check_dim(&self, dim: usize) -> Result<()> {
        if dim != self.mean.len() {
            Err(EnvPipeError::ShapeMismatch {
                expected: vec![self.mean.len()],
                found: vec![dim],
            }
            .into())
        } else {
            Ok(())
        }
    }
}
