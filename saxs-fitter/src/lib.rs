//! Dataset I/O and the smart fitter: parameter model, linear inner solve,
//! minimiser strategies and `FitResult` reporting.
//!
//! [`dataset`] reads measured SAXS curves; [`parameters`] encodes which of the
//! five physical parameters of spec.md §4.6 are free; [`minimizer`] drives the
//! outer search over [`smart::SmartFitter::fit`], which couples every candidate
//! to [`linear::fit_linear`]'s closed-form slope/background solve.
//!
//! # Fitting a histogram against a measured curve
//! ```
//! use saxs_fitter::{Dataset, EnabledParameters, Minimizer, ModelParameters, SmartFitter};
//! use saxs_hist::{assign_effective_weights, ExcludedVolumeModel, FullHistogramManager};
//! use saxs_pdb::{Atom, AtomFF, FormFactorType, Molecule};
//!
//! let atoms = vec![
//!     AtomFF::new(Atom::new(0.0, 0.0, 0.0, 0.0), FormFactorType::C),
//!     AtomFF::new(Atom::new(2.0, 0.0, 0.0, 0.0), FormFactorType::C),
//! ];
//! let mut molecule = Molecule::from_bodies(vec![atoms]);
//! assign_effective_weights(&mut molecule);
//! let histogram = FullHistogramManager::new(0.2, 100).calculate_all(&molecule);
//!
//! let dataset = Dataset {
//!     q: vec![0.05, 0.1, 0.15, 0.2],
//!     intensity: vec![4.0, 3.8, 3.5, 3.1],
//!     sigma: vec![0.1, 0.1, 0.1, 0.1],
//!     sigma_q: None,
//! };
//!
//! let fitter = SmartFitter::new(
//!     EnabledParameters::default(),
//!     ModelParameters::default(),
//!     100.0,
//!     ExcludedVolumeModel::Simple { c_exv: 1.0, volume: 100.0 },
//!     Minimizer::GoldenSection { tol: 1e-5, max_sweeps: 20 },
//! );
//! let result = fitter.fit(&molecule, &histogram, &dataset).unwrap();
//! assert_eq!(result.curve.len(), dataset.len());
//! ```

mod dataset;
mod error;
mod interpolate;
mod linear;
mod minimizer;
mod parameters;
mod smart;

pub use dataset::{read_dataset, read_dataset_reader, Dataset};
pub use error::FitError;
pub use interpolate::cubic_spline_interpolate;
pub use linear::{fit_linear, LinearFit};
pub use minimizer::{MinimizeOutcome, Minimizer};
pub use parameters::{EnabledParameters, ModelParameters, Parameter};
pub use smart::{format_fit_report, splice_onto, FitCurvePoint, FitResult, FittedParameter, SmartFitter};
