use saxs_pdb::Molecule;

use crate::composite::CompositeDistanceHistogram;
use crate::error::HistError;
use crate::form_factor::{validate_form_factors, ExcludedVolumeModel};
use crate::sinc::sinc;

/// Evaluates `I(q) = exp(-q^2) * sum_i p_total[i] * sinc(q * d_i)` over `q_axis`,
/// where `d_i` is the centre distance of histogram bin `i`.
///
/// The `exp(-q^2)` factor stands in for the combined form-factor envelope of
/// every species (atoms, excluded volume, water) — this crate does not model a
/// per-element, q-dependent scattering amplitude; see [`crate::form_factor`].
pub fn debye_transform(
    histogram: &CompositeDistanceHistogram,
    q_axis: &[f64],
    c_water: f64,
) -> Result<Vec<f64>, HistError> {
    debye_transform_with_envelope(histogram, q_axis, c_water, |_| 1.0)
}

/// As [`debye_transform`], but first checks `molecule` against `model`'s
/// form-factor requirement (spec.md §8 "Simple-model UNKNOWN atoms": the
/// Simple excluded-volume model tolerates atoms with an unresolved form
/// factor, every other model rejects them with [`HistError::BadState`]). The
/// entry point a caller should reach for when the excluded-volume model in
/// force is known, rather than calling [`debye_transform`] directly and
/// skipping the check.
pub fn debye_transform_for_model(
    molecule: &Molecule,
    model: &ExcludedVolumeModel,
    histogram: &CompositeDistanceHistogram,
    q_axis: &[f64],
    c_water: f64,
) -> Result<Vec<f64>, HistError> {
    validate_form_factors(molecule, model)?;
    debye_transform(histogram, q_axis, c_water)
}

/// As [`debye_transform`], but multiplies an extra per-`q` `envelope(q)` factor
/// onto the `exp(-q^2)` term before summing — the hook spec.md §4.5 describes as
/// "model-specific terms fold in c_exv and Debye-Waller factors as multiplicative
/// envelopes". `saxs-fitter::SmartFitter` composes [`crate::ExvEnvelope::evaluate`]
/// and [`crate::debye_waller_envelope`] into this closure per candidate parameter
/// vector.
pub fn debye_transform_with_envelope(
    histogram: &CompositeDistanceHistogram,
    q_axis: &[f64],
    c_water: f64,
    envelope: impl Fn(f64) -> f64,
) -> Result<Vec<f64>, HistError> {
    let p_total = histogram.total_counts(c_water);
    let bin_width = histogram.bin_width;

    let mut intensities = Vec::with_capacity(q_axis.len());
    for &q in q_axis {
        let mut sum = 0.0;
        for (i, &p) in p_total.iter().enumerate() {
            if p == 0.0 { continue; }
            // bin i holds distances that rounded to i (`add_pair`, compact.rs),
            // so its representative distance is i * bin_width, not (i+0.5).
            let d = i as f64 * bin_width;
            sum += p * sinc(q * d);
        }
        let intensity = (-q * q).exp() * envelope(q) * sum;
        if !intensity.is_finite() {
            return Err(HistError::NumericError { q });
        }
        intensities.push(intensity);
    }
    Ok(intensities)
}

/// Naive O(N^2) reference transform, summing `w_i * w_j * sinc(q * d_ij) *
/// exp(-q^2)` directly over every pair of points (`i == j` included, contributing
/// `w_i^2` at `d_ij == 0`). `points` are `(x, y, z, w)` quadruples; used only to
/// check [`debye_transform`] against a histogram built from the same points.
pub fn exact_debye(points: &[(f64, f64, f64, f64)], q_axis: &[f64]) -> Vec<f64> {
    q_axis.iter().map(|&q| {
        let mut sum = 0.0;
        for i in 0..points.len() {
            for j in 0..points.len() {
                let (xi, yi, zi, wi) = points[i];
                let (xj, yj, zj, wj) = points[j];
                let d = ((xi - xj).powi(2) + (yi - yj).powi(2) + (zi - zj).powi(2)).sqrt();
                sum += wi * wj * sinc(q * d);
            }
        }
        (-q * q).exp() * sum
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact::{cross_distance_histogram, self_distance_histogram, CompactCoordinates};

    #[test]
    fn test_debye_matches_exact_debye_for_two_point_system() {
        let points = vec![(0.0, 0.0, 0.0, 1.0), (2.0, 0.0, 0.0, 1.0)];
        let bin_width = 0.1;
        let n_bins = 200;
        let packed: Vec<[f32; 4]> = points.iter().map(|&(x, y, z, w)| [x as f32, y as f32, z as f32, w as f32]).collect();

        let mut histogram = crate::composite::CompositeDistanceHistogram::new(n_bins, bin_width);
        // double the i<j sum: exact_debye sums ordered pairs (i,j) and (j,i)
        // alike, while self_distance_histogram only visits each pair once.
        histogram.aa = self_distance_histogram(&packed, bin_width, n_bins).iter().map(|c| 2.0 * c).collect();
        // add the two i==j self terms (distance 0, weight^2 each) at bin 0
        histogram.aa[0] += points.iter().map(|&(_, _, _, w)| w * w).sum::<f64>();

        let q_axis = vec![0.0, 0.1, 0.2, 0.5, 1.0];
        let transformed = debye_transform(&histogram, &q_axis, 0.0).unwrap();
        let exact = exact_debye(&points, &q_axis);

        for (a, b) in transformed.iter().zip(exact.iter()) {
            assert!((a - b).abs() / b.abs().max(1.0) < 1e-6, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_debye_at_q_zero_equals_sum_of_weight_products() {
        let packed = vec![[0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [2.0, 0.0, 0.0, 1.0]];
        let bin_width = 0.5;
        let n_bins = 50;
        let mut histogram = crate::composite::CompositeDistanceHistogram::new(n_bins, bin_width);
        histogram.aa = self_distance_histogram(&packed, bin_width, n_bins).iter().map(|c| 2.0 * c).collect();
        histogram.aa[0] += 3.0; // three self terms, weight 1 each

        let result = debye_transform(&histogram, &[0.0], 0.0).unwrap();
        // at q=0, sinc=1 everywhere and exp(-0)=1, so I(0) = sum of all pairwise (incl self) weight products = 3*3 = 9
        assert!((result[0] - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_debye_transform_rejects_nan_input_gracefully() {
        let mut histogram = crate::composite::CompositeDistanceHistogram::new(4, 1.0);
        histogram.aa[0] = f64::NAN;
        let err = debye_transform(&histogram, &[0.1], 0.0);
        assert!(err.is_err());
    }

    #[test]
    fn test_envelope_of_one_matches_debye_transform() {
        let mut histogram = crate::composite::CompositeDistanceHistogram::new(4, 0.5);
        histogram.aa[0] = 4.0;
        histogram.aa[1] = 1.0;
        let q_axis = vec![0.0, 0.2, 0.4];
        let plain = debye_transform(&histogram, &q_axis, 0.0).unwrap();
        let enveloped = debye_transform_with_envelope(&histogram, &q_axis, 0.0, |_| 1.0).unwrap();
        assert_eq!(plain, enveloped);
    }

    #[test]
    fn test_debye_transform_for_model_rejects_unknown_atoms_under_fraser() {
        use saxs_pdb::{Atom, AtomFF, FormFactorType};
        let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 1.0), FormFactorType::Unknown);
        let molecule = Molecule::from_bodies(vec![vec![a]]);
        let histogram = crate::composite::CompositeDistanceHistogram::new(4, 0.5);
        let model = ExcludedVolumeModel::Fraser { c_exv: 1.0, atomic_volume: 10.0 };
        let err = debye_transform_for_model(&molecule, &model, &histogram, &[0.1], 0.0).unwrap_err();
        assert!(matches!(err, HistError::BadState { .. }));
        assert!(err.to_string().contains("UNKNOWN form factor"));
    }

    #[test]
    fn test_debye_transform_for_model_accepts_unknown_atoms_under_simple() {
        use saxs_pdb::{Atom, AtomFF, FormFactorType};
        let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 1.0), FormFactorType::Unknown);
        let molecule = Molecule::from_bodies(vec![vec![a]]);
        let histogram = crate::composite::CompositeDistanceHistogram::new(4, 0.5);
        let model = ExcludedVolumeModel::Simple { c_exv: 1.0, volume: 10.0 };
        assert!(debye_transform_for_model(&molecule, &model, &histogram, &[0.1], 0.0).is_ok());
    }

    #[test]
    fn test_cross_histogram_feeds_into_aw_partial() {
        let atoms = vec![[0.0, 0.0, 0.0, 2.0]];
        let waters = vec![[1.0, 0.0, 0.0, 5.0]];
        let aw = cross_distance_histogram(&atoms, &waters, 0.5, 20);
        assert_eq!(aw.iter().sum::<f64>(), 10.0);
        let _ = CompactCoordinates::default();
    }
}
