//! k-means clustering of weighted RGB samples.
//!
//! Centroids are seeded with k-means++ and refined with batch (Lloyd) iterations
//! in plain RGB space using integer means. Clusters that lose all of their
//! samples keep their previous centroid rather than being re-seeded, which
//! keeps the iteration from oscillating on small inputs.

use std::cmp::Reverse;
use std::collections::HashMap;

use palette::Srgb;
use rand::Rng;

use crate::error::{Error, Result};

/// Iteration cap used by the palette pipeline.
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

#[inline]
fn squared_distance(a: Srgb<u8>, b: Srgb<u8>) -> u32 {
    let dr = i32::from(a.red) - i32::from(b.red);
    let dg = i32::from(a.green) - i32::from(b.green);
    let db = i32::from(a.blue) - i32::from(b.blue);
    (dr * dr + dg * dg + db * db) as u32
}

/// Index of the centroid closest to `color`. Ties go to the earliest centroid.
#[inline]
fn nearest(color: Srgb<u8>, centroids: &[Srgb<u8>]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;
    for (idx, &c) in centroids.iter().enumerate() {
        let dist = squared_distance(color, c);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}

/// Pick `k` initial centroids with k-means++.
fn seed_centroids<R: Rng + ?Sized>(samples: &[Srgb<u8>], k: usize, rng: &mut R) -> Vec<Srgb<u8>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(samples[rng.random_range(0..samples.len())]);

    // Squared distance from each sample to its nearest chosen centroid.
    let mut weights: Vec<f64> = samples
        .iter()
        .map(|&s| f64::from(squared_distance(s, centroids[0])))
        .collect();

    while centroids.len() < k {
        let total: f64 = weights.iter().sum();

        // Roulette over the cumulative weights. Rounding can leave a sliver of
        // `target` after the last sample, so fall back to the last sample with
        // any weight at all.
        let mut target = rng.random::<f64>() * total;
        let mut chosen = None;
        for (j, &w) in weights.iter().enumerate() {
            target -= w;
            if w > 0.0 && target <= 0.0 {
                chosen = Some(j);
                break;
            }
        }
        let j = chosen
            .or_else(|| weights.iter().rposition(|&w| w > 0.0))
            .unwrap_or(0);

        let picked = samples[j];
        centroids.push(picked);
        for (w, &s) in weights.iter_mut().zip(samples) {
            *w = w.min(f64::from(squared_distance(s, picked)));
        }
    }

    centroids
}

/// Recompute every centroid as the rounded mean of its assigned samples.
/// Returns the new centroids alongside the per-cluster sample counts.
fn update_centroids(samples: &[Srgb<u8>], centroids: &[Srgb<u8>]) -> (Vec<Srgb<u8>>, Vec<usize>) {
    let k = centroids.len();
    let mut sums = vec![[0_u64; 3]; k];
    let mut counts = vec![0_usize; k];

    for &s in samples {
        let i = nearest(s, centroids);
        sums[i][0] += u64::from(s.red);
        sums[i][1] += u64::from(s.green);
        sums[i][2] += u64::from(s.blue);
        counts[i] += 1;
    }

    let mean = |sum: u64, n: usize| (sum as f64 / n as f64).round().clamp(0.0, 255.0) as u8;
    let updated = centroids
        .iter()
        .zip(sums.iter().zip(&counts))
        .map(|(&old, (sum, &n))| {
            if n == 0 {
                old
            } else {
                Srgb::new(mean(sum[0], n), mean(sum[1], n), mean(sum[2], n))
            }
        })
        .collect();

    (updated, counts)
}

/// Distinct colors of `samples` with their multiplicity, in first-appearance order.
fn distinct_counts(samples: &[Srgb<u8>]) -> Vec<(Srgb<u8>, usize)> {
    let mut index: HashMap<[u8; 3], usize> = HashMap::new();
    let mut out: Vec<(Srgb<u8>, usize)> = Vec::new();
    for &s in samples {
        let key = [s.red, s.green, s.blue];
        match index.get(&key) {
            Some(&i) => out[i].1 += 1,
            None => {
                index.insert(key, out.len());
                out.push((s, 1));
            }
        }
    }
    out
}

/// Distinct colors of `samples`, most frequent first.
pub(crate) fn by_frequency(samples: &[Srgb<u8>]) -> Vec<Srgb<u8>> {
    let mut distinct = distinct_counts(samples);
    distinct.sort_by_key(|&(_, n)| Reverse(n));
    distinct.into_iter().map(|(c, _)| c).collect()
}

/// Cluster `samples` into at most `k` colors, most populated cluster first.
///
/// Uses the thread-local RNG for seeding. See [`cluster_with_rng`] for a
/// reproducible variant.
pub fn cluster(samples: &[Srgb<u8>], k: usize, max_iterations: usize) -> Result<Vec<Srgb<u8>>> {
    cluster_with_rng(samples, k, max_iterations, &mut rand::rng())
}

/// Cluster `samples` into at most `k` colors using the provided RNG for seeding.
///
/// - `k == 0` is rejected with [`Error::InvalidArgument`].
/// - If there are no more samples than `k`, they are returned as is.
/// - If the samples hold `k` or fewer distinct colors, those colors are
///   returned ordered by multiplicity, so the result may be shorter than `k`.
///
/// Otherwise the centroids are seeded with k-means++, refined for up to
/// `max_iterations` rounds (stopping early once no centroid moves), and
/// sorted by the number of samples nearest to them.
pub fn cluster_with_rng<R: Rng + ?Sized>(
    samples: &[Srgb<u8>],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Vec<Srgb<u8>>> {
    if k < 1 {
        return Err(Error::InvalidArgument(format!(
            "cluster count must be at least 1, got {k}"
        )));
    }

    if samples.len() <= k {
        return Ok(samples.to_vec());
    }

    let distinct = by_frequency(samples);
    if distinct.len() <= k {
        return Ok(distinct);
    }

    let mut centroids = seed_centroids(samples, k, rng);

    let mut iterations = 0;
    let mut converged = false;
    while iterations < max_iterations && !converged {
        let (updated, _) = update_centroids(samples, &centroids);
        converged = updated == centroids;
        centroids = updated;
        iterations += 1;
    }
    log::debug!(
        "k-means on {} samples, k = {k}: {} after {iterations} iterations",
        samples.len(),
        if converged { "converged" } else { "stopped" }
    );

    let mut sizes = vec![0_usize; k];
    for &s in samples {
        sizes[nearest(s, &centroids)] += 1;
    }

    let mut sized: Vec<(Srgb<u8>, usize)> = centroids.into_iter().zip(sizes).collect();
    sized.sort_by_key(|&(_, n)| Reverse(n));
    Ok(sized.into_iter().map(|(c, _)| c).collect())
}
