use num_traits::Float;
use serde::{Deserialize, Serialize};

/// How a set of fluxes is summarised into a central value and a spread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AverageMethod {
    /// Median, with half the 16th–84th percentile range as scatter.
    #[default]
    Median,
    /// Arithmetic mean, with the population standard deviation as scatter.
    Mean,
}

impl std::fmt::Display for AverageMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Median => write!(f, "Median"),
            Self::Mean => write!(f, "Mean"),
        }
    }
}

fn sorted<T: Float>(values: &[T]) -> Vec<T> {
    let mut v = values.to_vec();
    v.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    v
}

/// Quantile with linear interpolation between order statistics.
///
/// `q` is clamped to `[0, 1]`. Returns `None` for an empty slice.
pub fn quantile<T: Float>(values: &[T], q: f64) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let v = sorted(values);
    quantile_sorted(&v, q)
}

fn quantile_sorted<T: Float>(v: &[T], q: f64) -> Option<T> {
    let pos = q.clamp(0.0, 1.0) * (v.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = T::from(pos - lo as f64)?;
    Some(v[lo] + (v[hi] - v[lo]) * frac)
}

pub fn median<T: Float>(values: &[T]) -> Option<T> {
    quantile(values, 0.5)
}

pub fn mean<T: Float>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let sum = values.iter().fold(T::zero(), |acc, &v| acc + v);
    Some(sum / T::from(values.len())?)
}

/// Population standard deviation.
pub fn std_dev<T: Float>(values: &[T]) -> Option<T> {
    let m = mean(values)?;
    let var = values
        .iter()
        .fold(T::zero(), |acc, &v| acc + (v - m) * (v - m))
        / T::from(values.len())?;
    Some(var.sqrt())
}

/// Median absolute deviation from the median.
pub fn median_absolute_deviation<T: Float>(values: &[T]) -> Option<T> {
    let m = median(values)?;
    let deviations: Vec<T> = values.iter().map(|&v| (v - m).abs()).collect();
    median(&deviations)
}

pub fn average<T: Float>(values: &[T], method: AverageMethod) -> Option<T> {
    match method {
        AverageMethod::Median => median(values),
        AverageMethod::Mean => mean(values),
    }
}

pub fn scatter<T: Float>(values: &[T], method: AverageMethod) -> Option<T> {
    match method {
        AverageMethod::Median => {
            if values.is_empty() {
                return None;
            }
            let v = sorted(values);
            let lo = quantile_sorted(&v, 0.16)?;
            let hi = quantile_sorted(&v, 0.84)?;
            Some((hi - lo) / T::from(2.0)?)
        }
        AverageMethod::Mean => std_dev(values),
    }
}
