use rayon::prelude::*;
use saxs_pdb::{Atom, AtomFF, Water};

/// A SIMD-friendly, cache-dense packing of `(x, y, z, weight)` quadruples.
///
/// Distance kernels iterate this directly rather than `&[AtomFF]`/`&[Water]`:
/// every coordinate and its weight sit in one cache line, and there is no
/// form-factor tag to branch on (weights are pre-resolved, see
/// [`crate::form_factor::assign_effective_weights`]).
#[derive(Clone, Debug, Default)]
pub struct CompactCoordinates {
    points: Vec<[f32; 4]>,
}

impl CompactCoordinates {
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn as_slice(&self) -> &[[f32; 4]] { &self.points }

    pub fn from_atom(a: &Atom) -> [f32; 4] { [a.x as f32, a.y as f32, a.z as f32, a.weight as f32] }

    /// Packs a body's chemistry atoms, each already carrying its effective weight.
    pub fn from_atoms(atoms: &[AtomFF]) -> Self {
        CompactCoordinates { points: atoms.iter().map(|a| Self::from_atom(&a.atom)).collect() }
    }

    /// Packs a body's hydration waters.
    pub fn from_waters(waters: &[Water]) -> Self {
        CompactCoordinates { points: waters.iter().map(|w| Self::from_atom(&w.atom)).collect() }
    }

    /// Packs chemistry atoms after subtracting a shared excluded-volume weight
    /// from every atom — the "Simple" excluded-volume model folds the exv
    /// correction directly into the weight seen by the distance kernels rather
    /// than carrying a separate exv pseudo-atom population.
    pub fn from_atoms_with_exv(atoms: &[AtomFF], exv_weight_per_atom: f64) -> Self {
        CompactCoordinates {
            points: atoms.iter().map(|a| {
                let mut p = Self::from_atom(&a.atom);
                p[3] -= exv_weight_per_atom as f32;
                p
            }).collect(),
        }
    }
}

const PARALLEL_THRESHOLD: usize = 512;

/// Accumulates `w_i * w_j` into `bins[floor(d_ij / bin_width)]` for every pair
/// within `points`, `i < j` only (the `i == j` self term is added separately by
/// callers that need it, since it has no meaningful "distance").
///
/// Runs sequentially below [`PARALLEL_THRESHOLD`] points; above it, splits the
/// outer loop across a rayon thread pool with a fold/reduce merge of one
/// histogram per task, the only point where worker results are combined.
pub fn self_distance_histogram(points: &[[f32; 4]], bin_width: f64, n_bins: usize) -> Vec<f64> {
    let accumulate = |range: std::ops::Range<usize>| -> Vec<f64> {
        let mut bins = vec![0.0f64; n_bins];
        for i in range {
            let pi = points[i];
            for pj in &points[i + 1..] {
                add_pair(&mut bins, pi, *pj, bin_width, n_bins);
            }
        }
        bins
    };

    if points.len() < PARALLEL_THRESHOLD {
        accumulate(0..points.len())
    } else {
        (0..points.len())
            .into_par_iter()
            .fold(|| vec![0.0f64; n_bins], |mut bins, i| {
                let pi = points[i];
                for pj in &points[i + 1..] {
                    add_pair(&mut bins, pi, *pj, bin_width, n_bins);
                }
                bins
            })
            .reduce(|| vec![0.0f64; n_bins], |a, b| merge_bins(a, b))
    }
}

/// Same accumulation as [`self_distance_histogram`] but between two disjoint
/// point sets (every pair counted once, there is no `i < j` restriction to
/// respect since the sets never overlap).
pub fn cross_distance_histogram(a: &[[f32; 4]], b: &[[f32; 4]], bin_width: f64, n_bins: usize) -> Vec<f64> {
    let accumulate = |range: std::ops::Range<usize>| -> Vec<f64> {
        let mut bins = vec![0.0f64; n_bins];
        for i in range {
            let pi = a[i];
            for pj in b {
                add_pair(&mut bins, pi, *pj, bin_width, n_bins);
            }
        }
        bins
    };

    if a.len() < PARALLEL_THRESHOLD {
        accumulate(0..a.len())
    } else {
        (0..a.len())
            .into_par_iter()
            .fold(|| vec![0.0f64; n_bins], |mut bins, i| {
                let pi = a[i];
                for pj in b {
                    add_pair(&mut bins, pi, *pj, bin_width, n_bins);
                }
                bins
            })
            .reduce(|| vec![0.0f64; n_bins], |x, y| merge_bins(x, y))
    }
}

#[inline]
fn add_pair(bins: &mut [f64], pi: [f32; 4], pj: [f32; 4], bin_width: f64, n_bins: usize) {
    let dx = (pi[0] - pj[0]) as f32;
    let dy = (pi[1] - pj[1]) as f32;
    let dz = (pi[2] - pj[2]) as f32;
    let d = (dx * dx + dy * dy + dz * dz).sqrt() as f64;
    let inv_bin_width = 1.0 / bin_width;
    let idx = (d * inv_bin_width).round() as usize;
    if idx < n_bins {
        bins[idx] += (pi[3] as f64) * (pj[3] as f64);
    }
}

fn merge_bins(mut a: Vec<f64>, b: Vec<f64>) -> Vec<f64> {
    for (x, y) in a.iter_mut().zip(b.iter()) { *x += y; }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_histogram_two_points() {
        let points = vec![[0.0, 0.0, 0.0, 2.0], [3.0, 4.0, 0.0, 2.0]];
        let bins = self_distance_histogram(&points, 1.0, 10);
        // distance is 5.0, weight product is 4.0
        assert_eq!(bins[5], 4.0);
        assert_eq!(bins.iter().sum::<f64>(), 4.0);
    }

    #[test]
    fn test_cross_histogram_disjoint_sets() {
        let a = vec![[0.0, 0.0, 0.0, 1.0]];
        let b = vec![[1.0, 0.0, 0.0, 3.0], [2.0, 0.0, 0.0, 3.0]];
        let bins = cross_distance_histogram(&a, &b, 1.0, 10);
        assert_eq!(bins[1], 3.0);
        assert_eq!(bins[2], 3.0);
    }

    #[test]
    fn test_self_histogram_above_parallel_threshold_matches_sequential() {
        let points: Vec<[f32; 4]> = (0..600).map(|i| [i as f32, 0.0, 0.0, 1.0]).collect();
        let parallel = self_distance_histogram(&points, 1.0, 700);
        let mut sequential = vec![0.0f64; 700];
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let d = (points[i][0] - points[j][0]).abs() as f64;
                sequential[d as usize] += 1.0;
            }
        }
        assert_eq!(parallel, sequential);
    }
}
