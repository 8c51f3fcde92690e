//! Distribution statistics over net-receipt amounts.
//!
//! All functions guard their divisions: an empty or zero-sum input is
//! reported as [`StatsError::InsufficientData`] instead of propagating NaN.

use crate::records::StatsError;

/// Gini coefficient of a distribution of non-negative amounts.
///
/// 0 means perfect equality, values approaching 1 mean that the total is
/// concentrated on few entries. Computed with the rank identity
/// `G = 2 * sum(rank_i * x_i) / (n * sum(x)) - (n + 1) / n`
/// over the ascending-sorted amounts.
pub fn gini(amounts: &[f64]) -> Result<f64, StatsError> {
    let n = amounts.len();
    let total: f64 = amounts.iter().sum();
    if n == 0 || total <= 0.0 {
        return Err(StatsError::InsufficientData);
    }
    let mut sorted = amounts.to_vec();
    sorted.sort_by(f64::total_cmp);
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(idx, x)| (idx + 1) as f64 * x)
        .sum();
    let nf = n as f64;
    Ok((2.0 * weighted) / (nf * total) - (nf + 1.0) / nf)
}

/// Share of the total held by the `k` largest amounts, in percent.
/// `k >= amounts.len()` yields 100.
pub fn concentration_top_k(amounts: &[f64], k: usize) -> Result<f64, StatsError> {
    let total: f64 = amounts.iter().sum();
    if amounts.is_empty() || total <= 0.0 {
        return Err(StatsError::InsufficientData);
    }
    Ok(top_amount(amounts, k) / total * 100.0)
}

/// Share of the total held by the top `fraction` of entries by count.
///
/// The count is `max(1, floor(fraction * n))`: at least one entry is always
/// included, even for very small groups. Returns the count together with the
/// percent share.
pub fn concentration_top_fraction(
    amounts: &[f64],
    fraction: f64,
) -> Result<(usize, f64), StatsError> {
    if amounts.is_empty() {
        return Err(StatsError::InsufficientData);
    }
    let k = ((amounts.len() as f64 * fraction).floor() as usize).max(1);
    let share = concentration_top_k(amounts, k)?;
    Ok((k, share))
}

/// Sum of the `k` largest amounts.
pub fn top_amount(amounts: &[f64], k: usize) -> f64 {
    let mut sorted = amounts.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted.iter().take(k).sum()
}

/// Quantile by linear interpolation between closest ranks, over an
/// ascending-sorted slice. `q` is expected in `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> Result<f64, StatsError> {
    if sorted.is_empty() {
        return Err(StatsError::InsufficientData);
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Full distributional picture of a party's net receipts.
#[derive(PartialEq, Debug, Clone)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (ddof = 1). 0 when fewer than two values.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
    pub gini: f64,
    pub top5_amount: f64,
    pub top5_share: f64,
    pub top10_amount: f64,
    pub top10_share: f64,
    /// Number of entries making up the top 5% by count (at least 1).
    pub top_5pct_count: usize,
    pub top_5pct_share: f64,
    pub top_10pct_count: usize,
    pub top_10pct_share: f64,
    pub top1_amount: f64,
    pub top1_share: f64,
}

impl DistributionSummary {
    pub fn compute(amounts: &[f64]) -> Result<DistributionSummary, StatsError> {
        let n = amounts.len();
        let total: f64 = amounts.iter().sum();
        if n == 0 || total <= 0.0 {
            return Err(StatsError::InsufficientData);
        }
        let mut sorted = amounts.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = total / n as f64;
        let std_dev = if n < 2 {
            0.0
        } else {
            let ssq: f64 = sorted.iter().map(|x| (x - mean) * (x - mean)).sum();
            (ssq / (n - 1) as f64).sqrt()
        };

        let top5_amount = top_amount(&sorted, 5);
        let top10_amount = top_amount(&sorted, 10);
        let (top_5pct_count, top_5pct_share) = concentration_top_fraction(&sorted, 0.05)?;
        let (top_10pct_count, top_10pct_share) = concentration_top_fraction(&sorted, 0.10)?;
        let top1_amount = sorted[n - 1];

        Ok(DistributionSummary {
            count: n,
            mean,
            median: quantile(&sorted, 0.5)?,
            std_dev,
            min: sorted[0],
            max: sorted[n - 1],
            q25: quantile(&sorted, 0.25)?,
            q75: quantile(&sorted, 0.75)?,
            gini: gini(&sorted)?,
            top5_amount,
            top5_share: top5_amount / total * 100.0,
            top10_amount,
            top10_share: top10_amount / total * 100.0,
            top_5pct_count,
            top_5pct_share,
            top_10pct_count,
            top_10pct_share,
            top1_amount,
            top1_share: top1_amount / total * 100.0,
        })
    }
}
