use saxs_pdb::{FormFactorType, Molecule};

use crate::error::HistError;

/// Effective scattering weight (roughly: electron count) carried by a chemistry
/// atom of a given form-factor tag, at `q = 0`.
///
/// This is the q-independent weight baked into [`crate::compact::CompactCoordinates`]
/// before any distance kernel runs; the q-dependence of a real atomic form factor
/// is folded instead into the single Gaussian envelope applied in
/// [`crate::debye::debye_transform`].
pub fn atomic_weight(ff: FormFactorType) -> f64 {
    use FormFactorType::*;
    match ff {
        H => 1.0,
        C => 6.0,
        CH => 7.0,
        CH2 => 8.0,
        CH3 => 9.0,
        N => 7.0,
        NH => 8.0,
        NH2 => 9.0,
        NH3 => 10.0,
        O => 8.0,
        OH => 9.0,
        S => 16.0,
        SH => 17.0,
        Other => 6.0,
        Unknown => 6.0,
        Exv => 0.0,
    }
}

/// The effective scattering weight of a water oxygen, used by hydration and by
/// the water-term of a composite histogram.
pub const WATER_WEIGHT: f64 = 10.0;

/// Assigns each chemistry atom of every body its [`atomic_weight`], overwriting
/// whatever weight it carried on entry (e.g. an occupancy value copied in by the
/// PDB reader). Called once, right after a molecule is built from a deposit and
/// before any hydration or histogram step runs.
pub fn assign_effective_weights(molecule: &mut Molecule) {
    for body in molecule.bodies_mut() {
        body.atoms_mut(|atoms| {
            for a in atoms.iter_mut() {
                a.atom.weight = atomic_weight(a.form_factor);
            }
        });
    }
}

/// Excluded-volume correction applied to an atom's scattering weight.
///
/// Each variant trades accuracy for simplicity differently; all of them reduce,
/// in the end, to subtracting some multiple of `c_exv` from the atom's bare
/// [`atomic_weight`] before the distance kernels ever see it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExcludedVolumeModel {
    /// No per-atom shape information: subtract `c_exv` times a single
    /// per-atom volume scaled by `volume.powf(2.0/3.0)`, shared by every atom.
    Simple { c_exv: f64, volume: f64 },
    /// CRYSOL-style: same envelope shape as `Simple`, but `c_exv` is allowed to
    /// vary per form-factor type through an extra scale factor.
    Crysol { c_exv: f64, volume: f64, scale: f64 },
    /// Fraser: subtracts a displaced-solvent term proportional to atomic volume
    /// rather than a shared envelope.
    Fraser { c_exv: f64, atomic_volume: f64 },
    /// FoXS: additive Gaussian dummy-atom correction (same formula as `Simple`
    /// but keyed off the total excluded volume rather than a per-atom fraction).
    FoXS { c_exv: f64, volume: f64 },
    /// Pepsi-SAXS: a two-parameter correction (volume fraction and a contrast
    /// term); only the volume-fraction term is modelled here.
    Pepsi { c_exv: f64, volume: f64, contrast: f64 },
    /// Grid-based: the excluded volume is computed per atom from a voxel count
    /// supplied by `saxs-grid` rather than from a closed-form envelope.
    Grid { voxel_volume: f64 },
}

impl ExcludedVolumeModel {
    /// The q=0 excluded-volume weight subtracted from a bare atomic weight.
    ///
    /// `volume.powf(2.0/3.0)/(4.0*PI)` is the canonical per-atom exponent shared
    /// by every closed-form variant; `Grid` instead reports a weight proportional
    /// to the voxel count actually classified as this atom's area in the grid.
    pub fn per_atom_weight(&self, classified_voxels: Option<usize>) -> f64 {
        use std::f64::consts::PI;
        match *self {
            ExcludedVolumeModel::Simple { c_exv, volume } => c_exv * volume.powf(2.0 / 3.0) / (4.0 * PI),
            ExcludedVolumeModel::Crysol { c_exv, volume, scale } => {
                scale * c_exv * volume.powf(2.0 / 3.0) / (4.0 * PI)
            }
            ExcludedVolumeModel::Fraser { c_exv, atomic_volume } => c_exv * atomic_volume,
            ExcludedVolumeModel::FoXS { c_exv, volume } => c_exv * volume.powf(2.0 / 3.0) / (4.0 * PI),
            ExcludedVolumeModel::Pepsi { c_exv, volume, contrast } => {
                c_exv * contrast * volume.powf(2.0 / 3.0) / (4.0 * PI)
            }
            ExcludedVolumeModel::Grid { voxel_volume } => classified_voxels.unwrap_or(0) as f64 * voxel_volume,
        }
    }

    /// Whether this variant needs every atom to carry a resolved (non-`Unknown`)
    /// form factor. `Simple` folds its correction into one shared per-atom
    /// weight and never inspects an atom's tag, so it tolerates `Unknown`;
    /// every other variant is keyed off form-factor-specific volumes and
    /// rejects it (spec.md §8's "Simple-model UNKNOWN atoms" scenario).
    pub fn requires_known_form_factors(&self) -> bool {
        !matches!(self, ExcludedVolumeModel::Simple { .. })
    }
}

/// Checks `molecule` against `model`'s form-factor requirement, returning
/// [`HistError::BadState`] if `model` needs resolved form factors but some
/// chemistry atom is tagged [`FormFactorType::Unknown`].
///
/// Called before a Debye transform under a form-factor-disambiguated
/// excluded-volume model; the `Simple` model never calls this since it has no
/// requirement to check.
pub fn validate_form_factors(molecule: &Molecule, model: &ExcludedVolumeModel) -> Result<(), HistError> {
    if !model.requires_known_form_factors() {
        return Ok(());
    }
    if molecule.all_atoms().any(|a| a.form_factor == FormFactorType::Unknown) {
        return Err(HistError::BadState {
            details: "molecule contains an UNKNOWN form factor atom, incompatible with this excluded-volume model".to_string(),
        });
    }
    Ok(())
}

/// Multiplicative excluded-volume envelope `G(q)` applied in the Debye transform
/// (spec.md §4.5), distinct from [`ExcludedVolumeModel::per_atom_weight`]'s q=0
/// weight subtraction used by the `Simple` variant.
///
/// Fraser/FoXS/Pepsi/grid-based variants share the CRYSOL-style Gaussian shape
/// per spec.md's "structurally similar Gaussian envelopes with method-specific
/// parameters" — they differ only in the `volume`/`c_exv` a caller feeds in, not
/// in the closed-form shape evaluated here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExvEnvelope {
    None,
    Crysol { c_exv: f64, volume: f64 },
    Fraser { c_exv: f64, volume: f64 },
    FoXS { c_exv: f64, volume: f64 },
    Pepsi { c_exv: f64, volume: f64 },
    Grid { c_exv: f64, volume: f64 },
}

impl ExvEnvelope {
    /// `G(q) = c_exv^3 * exp(-c*(c_exv^2-1)*q^2)`, `c = volume^(2/3)/(4*pi)`,
    /// `c_exv` clamped to `[0.8, 1.265]` (spec.md §4.5). Uses the canonical
    /// `std::f64::consts::PI` exponent form per spec.md's Open Question: the
    /// legacy `s_to_q_factor`-corrected variant is not replicated.
    pub fn evaluate(&self, q: f64) -> f64 {
        use std::f64::consts::PI;
        let (c_exv, volume) = match *self {
            ExvEnvelope::None => return 1.0,
            ExvEnvelope::Crysol { c_exv, volume }
            | ExvEnvelope::Fraser { c_exv, volume }
            | ExvEnvelope::FoXS { c_exv, volume }
            | ExvEnvelope::Pepsi { c_exv, volume }
            | ExvEnvelope::Grid { c_exv, volume } => (c_exv, volume),
        };
        let c_exv = c_exv.clamp(0.8, 1.265);
        let c = volume.powf(2.0 / 3.0) / (4.0 * PI);
        c_exv.powi(3) * (-c * (c_exv * c_exv - 1.0) * q * q).exp()
    }
}

/// Gaussian Debye-Waller envelope `exp(-B*q^2)` modelling atomic (or
/// excluded-volume pseudo-atom) thermal fluctuations (spec.md glossary).
pub fn debye_waller_envelope(b_factor: f64, q: f64) -> f64 {
    (-b_factor * q * q).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use saxs_pdb::{Atom, AtomFF};

    #[test]
    fn test_atomic_weight_table_is_nonnegative_and_monotone_in_hydrogens() {
        assert!(atomic_weight(FormFactorType::C) < atomic_weight(FormFactorType::CH3));
        assert_eq!(atomic_weight(FormFactorType::Exv), 0.0);
    }

    #[test]
    fn test_assign_effective_weights_overwrites_occupancy() {
        let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 0.5), FormFactorType::S);
        let mut molecule = Molecule::from_bodies(vec![vec![a]]);
        assign_effective_weights(&mut molecule);
        assert_eq!(molecule.all_atoms().next().unwrap().atom.weight, 16.0);
    }

    #[test]
    fn test_simple_exv_weight_grows_with_volume() {
        let small = ExcludedVolumeModel::Simple { c_exv: 1.0, volume: 10.0 };
        let big = ExcludedVolumeModel::Simple { c_exv: 1.0, volume: 100.0 };
        assert!(small.per_atom_weight(None) < big.per_atom_weight(None));
    }

    #[test]
    fn test_simple_model_tolerates_unknown_atoms() {
        let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 1.0), FormFactorType::Unknown);
        let molecule = Molecule::from_bodies(vec![vec![a]]);
        let model = ExcludedVolumeModel::Simple { c_exv: 1.0, volume: 10.0 };
        assert!(validate_form_factors(&molecule, &model).is_ok());
    }

    #[test]
    fn test_fraser_model_rejects_unknown_atoms_with_bad_state() {
        let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 1.0), FormFactorType::Unknown);
        let molecule = Molecule::from_bodies(vec![vec![a]]);
        let model = ExcludedVolumeModel::Fraser { c_exv: 1.0, atomic_volume: 10.0 };
        let err = validate_form_factors(&molecule, &model).unwrap_err();
        assert!(matches!(err, HistError::BadState { .. }));
        assert!(err.to_string().contains("UNKNOWN form factor"));
    }

    #[test]
    fn test_fraser_model_accepts_resolved_atoms() {
        let a = AtomFF::new(Atom::new(0.0, 0.0, 0.0, 1.0), FormFactorType::C);
        let molecule = Molecule::from_bodies(vec![vec![a]]);
        let model = ExcludedVolumeModel::Fraser { c_exv: 1.0, atomic_volume: 10.0 };
        assert!(validate_form_factors(&molecule, &model).is_ok());
    }
}

#[cfg(test)]
mod exv_envelope_tests {
    use super::*;

    #[test]
    fn test_exv_envelope_is_one_at_q_zero() {
        let env = ExvEnvelope::Crysol { c_exv: 1.0, volume: 100.0 };
        assert!((env.evaluate(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_exv_envelope_clamps_c_exv() {
        let too_big = ExvEnvelope::Crysol { c_exv: 5.0, volume: 100.0 };
        let clamped = ExvEnvelope::Crysol { c_exv: 1.265, volume: 100.0 };
        assert!((too_big.evaluate(0.3) - clamped.evaluate(0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_none_envelope_is_identity() {
        assert_eq!(ExvEnvelope::None.evaluate(0.5), 1.0);
    }

    #[test]
    fn test_debye_waller_envelope_decays_with_q() {
        assert!(debye_waller_envelope(1.0, 1.0) < debye_waller_envelope(1.0, 0.1));
    }
}
