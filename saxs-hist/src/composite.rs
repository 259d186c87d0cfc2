/// The three partial distance distributions a Debye transform is built from:
/// atom-atom (`aa`), atom-water (`aw`) and water-water (`ww`), each a dense
/// histogram of `w_i * w_j` summed per distance bin.
///
/// `aa`/`aw`/`ww` already include their "self" contribution at bin 0 (`i == j`
/// pairs, distance zero, contributing `w_i^2`) where applicable — `aa` and `ww`
/// do, `aw` never can since an atom and a water are never the same point.
#[derive(Clone, Debug)]
pub struct CompositeDistanceHistogram {
    pub aa: Vec<f64>,
    pub aw: Vec<f64>,
    pub ww: Vec<f64>,
    pub bin_width: f64,
}

impl CompositeDistanceHistogram {
    pub fn new(n_bins: usize, bin_width: f64) -> Self {
        CompositeDistanceHistogram {
            aa: vec![0.0; n_bins],
            aw: vec![0.0; n_bins],
            ww: vec![0.0; n_bins],
            bin_width,
        }
    }

    pub fn n_bins(&self) -> usize { self.aa.len() }

    /// `p_total[i] = aa[i] + 2 * c_water * aw[i] + c_water^2 * ww[i]`, the
    /// water-scaled total distance distribution fed to the Debye transform.
    pub fn total_counts(&self, c_water: f64) -> Vec<f64> {
        (0..self.n_bins())
            .map(|i| self.aa[i] + 2.0 * c_water * self.aw[i] + c_water * c_water * self.ww[i])
            .collect()
    }

    /// Index of the last non-empty bin across all three partials, or `None` if
    /// every bin is empty. Used to drop trailing all-zero bins before writing a
    /// histogram out or sizing a Debye-transform sinc table.
    pub fn highest_occupied_bin(&self) -> Option<usize> {
        (0..self.n_bins()).rev().find(|&i| self.aa[i] != 0.0 || self.aw[i] != 0.0 || self.ww[i] != 0.0)
    }

    /// Adds another histogram's bins in place; both must share `n_bins`/`bin_width`.
    pub fn add_assign(&mut self, other: &CompositeDistanceHistogram) {
        debug_assert_eq!(self.n_bins(), other.n_bins());
        for i in 0..self.n_bins() {
            self.aa[i] += other.aa[i];
            self.aw[i] += other.aw[i];
            self.ww[i] += other.ww[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_counts_water_scaling() {
        let mut h = CompositeDistanceHistogram::new(3, 1.0);
        h.aa[0] = 4.0;
        h.aw[0] = 2.0;
        h.ww[0] = 1.0;
        let total = h.total_counts(0.5);
        // 4.0 + 2*0.5*2.0 + 0.25*1.0
        assert!((total[0] - 6.25).abs() < 1e-12);
    }

    #[test]
    fn test_highest_occupied_bin() {
        let mut h = CompositeDistanceHistogram::new(5, 1.0);
        h.aa[2] = 1.0;
        assert_eq!(h.highest_occupied_bin(), Some(2));
        let empty = CompositeDistanceHistogram::new(5, 1.0);
        assert_eq!(empty.highest_occupied_bin(), None);
    }
}
