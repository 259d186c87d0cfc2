use std::sync::OnceLock;

/// `sin(x) / x`, with the removable singularity at `x == 0` handled by a
/// three-term Taylor expansion below `1e-3` rather than a division.
pub fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-3 {
        let x2 = x * x;
        1.0 - x2 / 6.0 + x2 * x2 / 120.0
    } else {
        x.sin() / x
    }
}

/// A memoised `sinc(q_k * d_i)` lookup table over a fixed `q` axis and a
/// fixed distance-bin axis, so the Debye transform never calls [`sinc`] more
/// than once per `(q, bin)` pair across repeated fits against the same dataset.
pub struct SincTable {
    q_axis: Vec<f64>,
    bin_width: f64,
    n_bins: usize,
    table: Vec<f64>,
}

impl SincTable {
    /// Builds a table for `q_axis.len() * n_bins` entries; bin `i` is evaluated
    /// at its representative distance `i as f64 * bin_width` — the distance a
    /// pair rounds to land in bin `i` (`round(d / bin_width) == i`), matching
    /// the binning convention in `compact::add_pair`.
    pub fn build(q_axis: &[f64], bin_width: f64, n_bins: usize) -> Self {
        let mut table = Vec::with_capacity(q_axis.len() * n_bins);
        for &q in q_axis {
            for i in 0..n_bins {
                let d = i as f64 * bin_width;
                table.push(sinc(q * d));
            }
        }
        SincTable { q_axis: q_axis.to_vec(), bin_width, n_bins, table }
    }

    pub fn q_axis(&self) -> &[f64] { &self.q_axis }
    pub fn n_bins(&self) -> usize { self.n_bins }
    pub fn bin_width(&self) -> f64 { self.bin_width }

    /// Looks up the table entry for the `q_index`'th axis point and bin `bin_index`.
    pub fn get(&self, q_index: usize, bin_index: usize) -> f64 {
        self.table[q_index * self.n_bins + bin_index]
    }

    /// True if this table was built for exactly this `q` axis, bin width and bin count.
    pub fn matches(&self, q_axis: &[f64], bin_width: f64, n_bins: usize) -> bool {
        self.bin_width == bin_width && self.n_bins == n_bins && self.q_axis == q_axis
    }
}

const DEFAULT_Q_MAX: f64 = 1.0;
const DEFAULT_Q_STEP: f64 = 0.01;
const DEFAULT_BIN_WIDTH: f64 = 0.5;
const DEFAULT_N_BINS: usize = 400;

fn default_q_axis() -> Vec<f64> {
    let n = (DEFAULT_Q_MAX / DEFAULT_Q_STEP) as usize + 1;
    (0..n).map(|i| i as f64 * DEFAULT_Q_STEP).collect()
}

static DEFAULT_TABLE: OnceLock<SincTable> = OnceLock::new();

/// The process-wide table for the default `q` axis (`0..=1.0` in steps of
/// `0.01`) and the default histogram geometry (`400` bins of width `0.5` Å).
/// Callers using a custom axis or geometry build their own [`SincTable`] instead.
pub fn default_sinc_table() -> &'static SincTable {
    DEFAULT_TABLE.get_or_init(|| SincTable::build(&default_q_axis(), DEFAULT_BIN_WIDTH, DEFAULT_N_BINS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sinc_at_zero_is_one() {
        assert_eq!(sinc(0.0), 1.0);
    }

    #[test]
    fn test_sinc_taylor_matches_direct_formula_near_zero() {
        let x = 5e-4;
        let direct = x.sin() / x;
        assert!((sinc(x) - direct).abs() < 1e-12);
    }

    #[test]
    fn test_table_lookup_matches_direct_sinc() {
        let q_axis = vec![0.0, 0.1, 0.2];
        let table = SincTable::build(&q_axis, 1.0, 5);
        let d = 2.0; // bin 2's representative distance at bin_width 1.0
        assert!((table.get(1, 2) - sinc(0.1 * d)).abs() < 1e-12);
    }

    #[test]
    fn test_default_table_is_singleton_and_matches_its_own_axis() {
        let t1 = default_sinc_table();
        let t2 = default_sinc_table();
        assert!(std::ptr::eq(t1, t2));
        assert!(t1.matches(&default_q_axis(), DEFAULT_BIN_WIDTH, DEFAULT_N_BINS));
    }
}
