//! Distance histograms, the Debye transform and form factors.
//!
//! Layered bottom-up: [`compact`] packs a body's atoms/waters for the distance
//! kernels, [`sinc`] memoises the lookup the Debye transform leans on,
//! [`composite`] holds the resulting aa/aw/ww partials, [`manager`] decides which
//! body pairs need recomputing, and [`debye`] turns a composite histogram into
//! an intensity profile. [`form_factor`] sits underneath all of it, assigning
//! every atom its effective scattering weight before any kernel runs.
//!
//! # Computing I(q) for a two-body molecule
//! ```
//! use saxs_pdb::{Atom, AtomFF, FormFactorType, Molecule};
//! use saxs_hist::{assign_effective_weights, FullHistogramManager, debye_transform};
//!
//! let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 0.0), FormFactorType::C);
//! let b = AtomFF::new(Atom::new(2.0, 0.0, 0.0, 0.0), FormFactorType::C);
//! let mut molecule = Molecule::from_bodies(vec![vec![a, b]]);
//! assign_effective_weights(&mut molecule);
//!
//! let histogram = FullHistogramManager::new(0.5, 40).calculate_all(&molecule);
//! let q_axis = vec![0.0, 0.1, 0.2];
//! let intensities = debye_transform(&histogram, &q_axis, 0.0).unwrap();
//! assert_eq!(intensities.len(), 3);
//! ```

mod error;
mod form_factor;
mod sinc;
mod compact;
mod composite;
mod manager;
mod debye;

pub use error::HistError;
pub use form_factor::{
    assign_effective_weights, atomic_weight, debye_waller_envelope, validate_form_factors,
    ExcludedVolumeModel, ExvEnvelope, WATER_WEIGHT,
};
pub use sinc::{default_sinc_table, sinc, SincTable};
pub use compact::{cross_distance_histogram, self_distance_histogram, CompactCoordinates};
pub use composite::CompositeDistanceHistogram;
pub use manager::{ChangeKind, FullHistogramManager, HistogramManager, PartialHistogramManager};
pub use debye::{debye_transform, debye_transform_for_model, debye_transform_with_envelope, exact_debye};
