use serde::{Deserialize, Serialize};

use crate::{MembraneError, Result};

/// Evenly spaced samples over `[start, end]` with both endpoints included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Ordered instants at which frames are captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    times: Vec<f64>,
}

impl Timeline {
    /// `frames` instants spread uniformly over `periods` full oscillations.
    pub fn spanning(period: f64, periods: u32, frames: usize) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(MembraneError::domain(format!(
                "oscillation period must be positive and finite, got {period}"
            )));
        }
        if frames == 0 {
            return Err(MembraneError::domain("animation has no frames"));
        }

        Ok(Self {
            times: linspace(0.0, period * periods as f64, frames),
        })
    }

    /// Quarter-period instant at which a mode starting from rest reaches its
    /// peak displacement.
    pub fn peak(period: f64) -> f64 {
        period / 4.0
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time span covered by the samples.
    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter()
    }
}
