use log::{debug, info};

use saxs_hist::{
    debye_transform_with_envelope, debye_waller_envelope, validate_form_factors,
    CompositeDistanceHistogram, ExcludedVolumeModel, ExvEnvelope,
};
use saxs_pdb::Molecule;

use crate::dataset::Dataset;
use crate::error::FitError;
use crate::interpolate::cubic_spline_interpolate;
use crate::linear::fit_linear;
use crate::minimizer::Minimizer;
use crate::parameters::{EnabledParameters, ModelParameters, Parameter};

/// One row of a [`FitResult`]'s output curve (spec.md §6 "five-column named dataset").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitCurvePoint {
    pub q: f64,
    pub i_data: f64,
    pub i_err: f64,
    pub i_model: f64,
    pub residual: f64,
}

/// A fitted parameter's value and its asymmetric uncertainty
/// (spec.md §3 FitResult: "fitted parameters with asymmetric errors").
///
/// The minimisers this crate ships only ever produce a symmetric variance from
/// the linear inner solve or a coordinate search, so `minus`/`plus` are equal
/// here; the field stays two-sided so a caller (e.g. `saxs-capi`) can consume a
/// richer minimiser's asymmetric output without a breaking change.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedParameter {
    pub name: String,
    pub value: f64,
    pub error_minus: f64,
    pub error_plus: f64,
}

/// The outcome of one [`SmartFitter::fit`] call: spec.md §3's `FitResult`.
#[derive(Clone, Debug, PartialEq)]
pub struct FitResult {
    pub converged: bool,
    pub n_evaluations: usize,
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
    pub parameters: Vec<FittedParameter>,
    pub curve: Vec<FitCurvePoint>,
}

impl FitResult {
    pub fn reduced_chi_square(&self) -> f64 {
        if self.degrees_of_freedom == 0 { f64::INFINITY } else { self.chi_square / self.degrees_of_freedom as f64 }
    }
}

/// Renders a [`FitResult`] as the UTF-8 fit-report block of spec.md §6:
/// a `+--+ FIT REPORT +--+` header, convergence status, function evals, chi^2,
/// dof, and one `name | value | uncertainty` row per fitted parameter.
pub fn format_fit_report(result: &FitResult) -> String {
    let mut out = String::new();
    out.push_str("+--+ FIT REPORT +--+\n");
    out.push_str(&format!("converged: {}\n", result.converged));
    out.push_str(&format!("function evaluations: {}\n", result.n_evaluations));
    out.push_str(&format!("chi^2: {:.6}\n", result.chi_square));
    out.push_str(&format!("degrees of freedom: {}\n", result.degrees_of_freedom));
    out.push_str(&format!("chi^2/dof: {:.6}\n", result.reduced_chi_square()));
    for p in &result.parameters {
        out.push_str(&format!("{} | {:.6} | +{:.6}/-{:.6}\n", p.name, p.value, p.error_plus, p.error_minus));
    }
    out
}

/// Fits a [`CompositeDistanceHistogram`] to a measured [`Dataset`] by varying
/// hydration scale, excluded-volume scale, solvent density and Debye-Waller
/// factors, coupling each candidate to the closed-form linear inner solve for
/// slope and background (spec.md §4.6).
pub struct SmartFitter {
    enabled: EnabledParameters,
    base: ModelParameters,
    exv_volume: f64,
    exv_model: ExcludedVolumeModel,
    minimizer: Minimizer,
}

impl SmartFitter {
    /// `exv_model` is checked against the molecule passed to [`SmartFitter::fit`]
    /// before anything else runs (spec.md §8 "Simple-model UNKNOWN atoms"):
    /// every variant but `Simple` requires every chemistry atom to carry a
    /// resolved form factor.
    pub fn new(enabled: EnabledParameters, base: ModelParameters, exv_volume: f64, exv_model: ExcludedVolumeModel, minimizer: Minimizer) -> Self {
        SmartFitter { enabled, base, exv_volume, exv_model, minimizer }
    }

    /// Builds `I_model(q)` at `dataset.q` for one candidate parameter vector.
    ///
    /// Debye-transforms `histogram` on its own, evenly spaced model axis
    /// (the envelope and water scale folded in as a multiplicative closure),
    /// then splices the result onto the dataset's own q-grid by piecewise-cubic
    /// interpolation — spec.md §4.6's "splice onto the dataset's q-grid"
    /// contract, evaluating the (more expensive) Debye sum only on a grid sized
    /// to the histogram's own bin resolution rather than once per data point.
    fn model_curve(&self, histogram: &CompositeDistanceHistogram, params: ModelParameters, dataset: &Dataset) -> Result<Vec<f64>, FitError> {
        let envelope = |q: f64| {
            let exv = ExvEnvelope::Crysol { c_exv: params.c_exv, volume: self.exv_volume }.evaluate(q)
                * debye_waller_envelope(params.b_exv, q);
            exv * debye_waller_envelope(params.b_atom, q)
        };

        let q_min = dataset.q.iter().cloned().fold(f64::INFINITY, f64::min).max(0.0);
        let q_max = dataset.q.iter().cloned().fold(0.0, f64::max);
        let n_model_points = (dataset.len() * 2).max(32);
        let model_q: Vec<f64> = (0..n_model_points)
            .map(|i| q_min + (q_max - q_min) * i as f64 / (n_model_points - 1) as f64)
            .collect();

        let model_i = debye_transform_with_envelope(histogram, &model_q, params.c_water, envelope)?;
        Ok(splice_onto(&model_q, &model_i, &dataset.q))
    }

    /// Evaluates chi^2 for one candidate vector: builds the model curve, solves
    /// for slope/background, and returns `+inf` if the Debye transform produced
    /// any non-finite value (spec.md §4.6 "Failure semantics").
    fn evaluate(&self, histogram: &CompositeDistanceHistogram, candidate: &[f64], dataset: &Dataset) -> f64 {
        let params = ModelParameters::with_candidate(self.base, &self.enabled, candidate);
        match self.model_curve(histogram, params, dataset) {
            Ok(model) => {
                let fit = fit_linear(&model, &dataset.intensity, &dataset.sigma);
                if fit.chi2.is_finite() { fit.chi2 } else { f64::INFINITY }
            }
            Err(_) => f64::INFINITY,
        }
    }

    /// Runs the outer minimiser over the enabled parameters, then does one
    /// final linear solve at the best point to populate the reported curve.
    ///
    /// Checks `molecule` against `self.exv_model`'s form-factor requirement
    /// before running anything else, so an excluded-volume model that needs
    /// resolved form factors fails fast with [`FitError::BadState`] rather
    /// than silently producing a model curve from ill-defined weights.
    pub fn fit(&self, molecule: &Molecule, histogram: &CompositeDistanceHistogram, dataset: &Dataset) -> Result<FitResult, FitError> {
        validate_form_factors(molecule, &self.exv_model)?;
        if dataset.is_empty() {
            return Err(FitError::DimensionMismatch { details: "cannot fit an empty dataset".to_string() });
        }

        let initial: Vec<Parameter> = self.enabled.initial_parameters();
        info!("starting smart fit with {} free parameter(s) against {} data points", initial.len(), dataset.len());

        let outcome = self.minimizer.minimize(|p| self.evaluate(histogram, p, dataset), &initial);
        debug!("minimiser finished after {} evaluations, best chi^2 = {}", outcome.n_evaluations, outcome.best_value);

        let final_params = ModelParameters::with_candidate(self.base, &self.enabled, &outcome.best);
        let model = self.model_curve(histogram, final_params, dataset)?;
        let linear = fit_linear(&model, &dataset.intensity, &dataset.sigma);

        let curve = dataset.q.iter().enumerate().map(|(i, &q)| {
            let i_model = linear.slope * model[i] + linear.intercept;
            FitCurvePoint {
                q,
                i_data: dataset.intensity[i],
                i_err: dataset.sigma[i],
                i_model,
                residual: (dataset.intensity[i] - i_model) / dataset.sigma[i],
            }
        }).collect();

        let dof = dataset.len().saturating_sub(initial.len() + 2).max(1);
        let mut parameters = Vec::new();
        for (i, p) in initial.iter().enumerate() {
            let value = outcome.best[i];
            let sigma = 0.0; // golden-section/scan minimisers don't expose a covariance estimate
            parameters.push(FittedParameter { name: p.name.clone(), value, error_minus: sigma, error_plus: sigma });
        }
        parameters.push(FittedParameter { name: "slope".to_string(), value: linear.slope, error_minus: linear.slope_variance.sqrt(), error_plus: linear.slope_variance.sqrt() });
        parameters.push(FittedParameter { name: "background".to_string(), value: linear.intercept, error_minus: linear.intercept_variance.sqrt(), error_plus: linear.intercept_variance.sqrt() });

        Ok(FitResult {
            converged: outcome.best_value.is_finite(),
            n_evaluations: outcome.n_evaluations,
            chi_square: linear.chi2,
            degrees_of_freedom: dof,
            parameters,
            curve,
        })
    }
}

/// Natural-spline-interpolates `ys(xs)` onto `targets`, re-exported at crate
/// root for callers (e.g. `saxs-capi`) that need raw splicing without a full
/// [`SmartFitter`] run.
pub fn splice_onto(xs: &[f64], ys: &[f64], targets: &[f64]) -> Vec<f64> {
    cubic_spline_interpolate(xs, ys, targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use saxs_hist::{assign_effective_weights, FullHistogramManager};
    use saxs_pdb::{Atom, AtomFF, FormFactorType, Molecule};

    fn cube_molecule() -> Molecule {
        let mut atoms = Vec::new();
        for &x in &[0.0, 2.0] {
            for &y in &[0.0, 2.0] {
                for &z in &[0.0, 2.0] {
                    atoms.push(AtomFF::new(Atom::new(x, y, z, 0.0), FormFactorType::C));
                }
            }
        }
        let mut molecule = Molecule::from_bodies(vec![atoms]);
        assign_effective_weights(&mut molecule);
        molecule
    }

    fn cube_histogram(molecule: &Molecule) -> CompositeDistanceHistogram {
        FullHistogramManager::new(0.2, 200).calculate_all(molecule)
    }

    fn synthetic_dataset(histogram: &CompositeDistanceHistogram) -> Dataset {
        let q: Vec<f64> = (1..20).map(|i| i as f64 * 0.05).collect();
        let intensity = debye_transform_with_envelope(histogram, &q, 1.0, |_| 1.0).unwrap();
        let sigma = vec![0.01; q.len()];
        Dataset { q, intensity, sigma, sigma_q: None }
    }

    #[test]
    fn test_fit_on_noiseless_data_recovers_low_chi_square() {
        let molecule = cube_molecule();
        let histogram = cube_histogram(&molecule);
        let dataset = synthetic_dataset(&histogram);

        let enabled = EnabledParameters { hydration: true, excluded_volume: false, solvent_density: false, atomic_debye_waller: false, exv_debye_waller: false };
        let exv_model = ExcludedVolumeModel::Simple { c_exv: 1.0, volume: 100.0 };
        let fitter = SmartFitter::new(enabled, ModelParameters::default(), 100.0, exv_model, Minimizer::GoldenSection { tol: 1e-7, max_sweeps: 60 });
        let result = fitter.fit(&molecule, &histogram, &dataset).unwrap();

        assert!(result.converged);
        assert!(result.reduced_chi_square() < 1.0, "chi2/dof = {}", result.reduced_chi_square());
    }

    #[test]
    fn test_fit_rejects_empty_dataset() {
        let molecule = cube_molecule();
        let histogram = cube_histogram(&molecule);
        let dataset = Dataset { q: vec![], intensity: vec![], sigma: vec![], sigma_q: None };
        let enabled = EnabledParameters::default();
        let exv_model = ExcludedVolumeModel::Simple { c_exv: 1.0, volume: 100.0 };
        let fitter = SmartFitter::new(enabled, ModelParameters::default(), 100.0, exv_model, Minimizer::GoldenSection { tol: 1e-6, max_sweeps: 10 });
        assert!(fitter.fit(&molecule, &histogram, &dataset).is_err());
    }

    #[test]
    fn test_fit_rejects_unknown_atoms_under_form_factor_requiring_model() {
        let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 1.0), FormFactorType::Unknown);
        let mut molecule = Molecule::from_bodies(vec![vec![a]]);
        assign_effective_weights(&mut molecule);
        let histogram = cube_histogram(&molecule);
        let dataset = synthetic_dataset(&histogram);
        let enabled = EnabledParameters::default();
        let exv_model = ExcludedVolumeModel::Fraser { c_exv: 1.0, atomic_volume: 10.0 };
        let fitter = SmartFitter::new(enabled, ModelParameters::default(), 100.0, exv_model, Minimizer::GoldenSection { tol: 1e-6, max_sweeps: 10 });
        let err = fitter.fit(&molecule, &histogram, &dataset).unwrap_err();
        assert!(matches!(err, FitError::BadState { .. }));
    }

    #[test]
    fn test_format_fit_report_contains_header_and_parameters() {
        let result = FitResult {
            converged: true,
            n_evaluations: 12,
            chi_square: 3.4,
            degrees_of_freedom: 5,
            parameters: vec![FittedParameter { name: "c_water".to_string(), value: 1.2, error_minus: 0.1, error_plus: 0.1 }],
            curve: vec![],
        };
        let report = format_fit_report(&result);
        assert!(report.starts_with("+--+ FIT REPORT +--+\n"));
        assert!(report.contains("c_water"));
        assert!(report.contains("chi^2/dof"));
    }
}
