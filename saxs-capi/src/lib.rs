//! C-language interface to the `saxs` scattering and fitting engine.
//!
//! Follows the opaque-handle pattern of `saxs-pdb`'s own `rlib`+`cdylib` split
//! and the out-param/status-code shape of spec.md §6's C ABI contract: every
//! function that can fail returns a `u32` status code (`SAXS_OK` on success, a
//! positive error class otherwise) and writes its result through a
//! caller-provided `*mut *mut T` out-parameter. [`saxs_last_error_message`]
//! fetches the detailed message of the most recent failure on the calling
//! thread.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::fs::File;
use std::os::raw::c_char;
use std::slice;

use saxs_fitter::{Dataset, EnabledParameters, FitError, Minimizer, ModelParameters, SmartFitter};
use saxs_grid::{CullingStrategy, Grid, HydrationStrategy, DEFAULT_SEED};
use saxs_hist::{
    assign_effective_weights, debye_transform_for_model, default_sinc_table, CompositeDistanceHistogram,
    ExcludedVolumeModel, FullHistogramManager, HistError,
};
use saxs_pdb::{Atom, AtomFF, Deposit, FormFactorType, Molecule, STANDARD_WATER_RESIDUE_NAMES};

/// Status codes returned by every fallible `saxs_*` function.
pub const SAXS_OK: u32 = 0;
pub const SAXS_ERR_PARSE: u32 = 1;
pub const SAXS_ERR_IO: u32 = 2;
pub const SAXS_ERR_NULL_POINTER: u32 = 3;
pub const SAXS_ERR_OUT_OF_RANGE: u32 = 4;
pub const SAXS_ERR_DIMENSION_MISMATCH: u32 = 5;
pub const SAXS_ERR_BAD_STATE: u32 = 6;
pub const SAXS_ERR_NUMERIC: u32 = 7;

/// Excluded-volume model kind codes accepted by [`saxs_debye_transform_default_axis`],
/// [`saxs_debye_transform_user_axis`] and [`saxs_fit`], mirroring `saxs_hist::ExcludedVolumeModel`.
pub const SAXS_EXV_SIMPLE: u32 = 0;
pub const SAXS_EXV_CRYSOL: u32 = 1;
pub const SAXS_EXV_FRASER: u32 = 2;
pub const SAXS_EXV_FOXS: u32 = 3;
pub const SAXS_EXV_PEPSI: u32 = 4;
pub const SAXS_EXV_GRID: u32 = 5;

/// Builds the excluded-volume model named by `kind`, folding `c_exv`/`volume`
/// into whichever fields that variant needs. Unrecognised kind codes fall back
/// to `Simple`, the only variant that tolerates `FormFactorType::Unknown` atoms.
fn excluded_volume_model(kind: u32, c_exv: f64, volume: f64) -> ExcludedVolumeModel {
    match kind {
        SAXS_EXV_CRYSOL => ExcludedVolumeModel::Crysol { c_exv, volume, scale: 1.0 },
        SAXS_EXV_FRASER => ExcludedVolumeModel::Fraser { c_exv, atomic_volume: volume },
        SAXS_EXV_FOXS => ExcludedVolumeModel::FoXS { c_exv, volume },
        SAXS_EXV_PEPSI => ExcludedVolumeModel::Pepsi { c_exv, volume, contrast: 1.0 },
        SAXS_EXV_GRID => ExcludedVolumeModel::Grid { voxel_volume: volume },
        _ => ExcludedVolumeModel::Simple { c_exv, volume },
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
}

fn set_last_error(message: String) {
    LAST_ERROR.with(|cell| {
        *cell.borrow_mut() = CString::new(message).ok();
    });
}

/// Returns the detailed message of the most recent failure on this thread, or
/// an empty string if no `saxs_*` call has failed yet. The returned pointer is
/// owned by the library and is valid until the next failing call on this thread.
#[no_mangle]
pub extern "C" fn saxs_last_error_message() -> *const c_char {
    thread_local! {
        static EMPTY: CString = CString::new("").unwrap();
    }
    LAST_ERROR.with(|cell| match &*cell.borrow() {
        Some(msg) => msg.as_ptr(),
        None => EMPTY.with(|e| e.as_ptr()),
    })
}

unsafe fn cstr_to_string(s: *const c_char) -> Result<String, u32> {
    if s.is_null() {
        set_last_error("null pointer passed for a string argument".to_string());
        return Err(SAXS_ERR_NULL_POINTER);
    }
    match CStr::from_ptr(s).to_str() {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            set_last_error(format!("argument is not valid UTF-8: {e}"));
            Err(SAXS_ERR_PARSE)
        }
    }
}

/// An opaque handle wrapping an owned [`Molecule`].
pub struct SaxsMolecule(Molecule);
/// An opaque handle wrapping an owned [`Dataset`].
pub struct SaxsDataset(Dataset);
/// An opaque handle wrapping an owned [`CompositeDistanceHistogram`].
pub struct SaxsHistogram(CompositeDistanceHistogram);
/// An opaque handle wrapping an owned [`saxs_fitter::FitResult`].
pub struct SaxsFitResult(saxs_fitter::FitResult);

/// Parses a PDB file into a [`SaxsMolecule`], splitting off waters named in
/// `saxs_pdb`'s standard water-residue set and tagging every chemistry atom's
/// form factor from its element symbol.
///
/// # Safety
/// `path` must be a valid, NUL-terminated C string. `out_molecule` must be a
/// valid, non-null pointer to a `*mut SaxsMolecule`.
#[no_mangle]
pub unsafe extern "C" fn saxs_molecule_from_pdb(path: *const c_char, out_molecule: *mut *mut SaxsMolecule) -> u32 {
    if out_molecule.is_null() {
        set_last_error("null pointer passed for out_molecule".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    let path = match cstr_to_string(path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let deposit = match Deposit::from_file(&path) {
        Ok(d) => d,
        Err(e) => {
            set_last_error(format!("failed to parse PDB file '{path}': {e}"));
            return SAXS_ERR_PARSE;
        }
    };

    let names: Vec<String> = STANDARD_WATER_RESIDUE_NAMES.iter().map(|s| s.to_string()).collect();
    let (atoms, waters) = deposit.structure().partition_waters(&names);
    let mut molecule = Molecule::from_bodies(vec![atoms]);
    molecule.bodies_mut()[0].set_waters(waters);
    assign_effective_weights(&mut molecule);

    *out_molecule = Box::into_raw(Box::new(SaxsMolecule(molecule)));
    SAXS_OK
}

/// Builds a [`SaxsMolecule`] with a single body from raw `(x, y, z)` arrays,
/// every atom tagged [`FormFactorType::Unknown`] (spec.md §8.6's "Simple-model
/// UNKNOWN atoms" scenario: the Simple excluded-volume model tolerates this,
/// the form-factor-disambiguated ones reject it with `BadState`).
///
/// # Safety
/// `xs`/`ys`/`zs` must each point to `n_atoms` valid `f64` values.
#[no_mangle]
pub unsafe extern "C" fn saxs_molecule_from_arrays(
    xs: *const f64,
    ys: *const f64,
    zs: *const f64,
    n_atoms: usize,
    out_molecule: *mut *mut SaxsMolecule,
) -> u32 {
    if xs.is_null() || ys.is_null() || zs.is_null() || out_molecule.is_null() {
        set_last_error("null pointer passed to saxs_molecule_from_arrays".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    let xs = slice::from_raw_parts(xs, n_atoms);
    let ys = slice::from_raw_parts(ys, n_atoms);
    let zs = slice::from_raw_parts(zs, n_atoms);

    let atoms: Vec<AtomFF> = (0..n_atoms)
        .map(|i| AtomFF::new(Atom::new(xs[i], ys[i], zs[i], 6.0), FormFactorType::Unknown))
        .collect();
    let molecule = Molecule::from_bodies(vec![atoms]);
    *out_molecule = Box::into_raw(Box::new(SaxsMolecule(molecule)));
    SAXS_OK
}

/// Number of chemistry atoms in `molecule`.
///
/// # Safety
/// `molecule` must point to a live [`SaxsMolecule`].
#[no_mangle]
pub unsafe extern "C" fn saxs_molecule_n_atoms(molecule: *const SaxsMolecule) -> usize {
    if molecule.is_null() { return 0; }
    (*molecule).0.total_atoms()
}

/// Number of hydration waters currently attached to `molecule`.
///
/// # Safety
/// `molecule` must point to a live [`SaxsMolecule`].
#[no_mangle]
pub unsafe extern "C" fn saxs_molecule_n_waters(molecule: *const SaxsMolecule) -> usize {
    if molecule.is_null() { return 0; }
    (*molecule).0.total_waters()
}

/// Generates a hydration shell for `molecule` using the Axes strategy (the
/// cheapest of the four; `saxs-grid::hydration::HydrationStrategy` exposes the
/// others to Rust callers directly) and attaches it to the molecule's first body.
///
/// `atom_radius`/`grid_width` follow spec.md §4.1/§4.2's grid and hydration
/// contract; `seed` controls the deterministic placement order.
///
/// # Safety
/// `molecule` must point to a live, non-null [`SaxsMolecule`].
#[no_mangle]
pub unsafe extern "C" fn saxs_molecule_hydrate(
    molecule: *mut SaxsMolecule,
    grid_width: f64,
    atom_radius: f64,
    seed: u64,
) -> u32 {
    if molecule.is_null() {
        set_last_error("null molecule pointer".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    let molecule = &mut (*molecule).0;
    if molecule.n_bodies() == 0 {
        set_last_error("molecule has no bodies to hydrate".to_string());
        return SAXS_ERR_BAD_STATE;
    }

    let centers: Vec<(f64, f64, f64)> = molecule.bodies()[0].atoms().iter().map(|a| (a.atom.x, a.atom.y, a.atom.z)).collect();
    let mut grid = Grid::new(&centers, grid_width, 8, 4);
    for &c in &centers { grid.add_atom(c); }
    grid.expand_volume();

    let strategy = HydrationStrategy::Axes { min_separation: grid_width };
    let seed = if seed == 0 { DEFAULT_SEED } else { seed };
    let waters = strategy.generate(&grid, &centers, atom_radius, seed);
    let target = saxs_grid::target_water_count(grid.get_volume(), 1.0);
    let culled = CullingStrategy::Counter.cull(waters, target, seed);

    molecule.bodies_mut()[0].set_waters(culled);
    SAXS_OK
}

/// Computes the composite distance histogram of `molecule` with the given
/// `bin_width`/`n_bins` geometry, via the full (from-scratch) manager.
///
/// # Safety
/// `molecule`/`out_histogram` must be valid, non-null pointers.
#[no_mangle]
pub unsafe extern "C" fn saxs_histogram_compute(
    molecule: *const SaxsMolecule,
    bin_width: f64,
    n_bins: usize,
    out_histogram: *mut *mut SaxsHistogram,
) -> u32 {
    if molecule.is_null() || out_histogram.is_null() {
        set_last_error("null pointer passed to saxs_histogram_compute".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    if n_bins == 0 {
        set_last_error("n_bins must be positive".to_string());
        return SAXS_ERR_OUT_OF_RANGE;
    }
    let histogram = FullHistogramManager::new(bin_width, n_bins).calculate_all(&(*molecule).0);
    *out_histogram = Box::into_raw(Box::new(SaxsHistogram(histogram)));
    SAXS_OK
}

/// Debye-transforms `histogram` at the default q-axis (spec.md §9: the
/// process-wide sinc table's axis), writing `I(q)` into caller-owned `out_i`
/// (must have room for at least `saxs_default_q_axis_len()` entries) and the
/// matching q values into `out_q` (same length). Either out-pointer may be
/// null to skip writing it.
///
/// `molecule` and the excluded-volume parameters (`exv_model_kind`, one of the
/// `SAXS_EXV_*` constants, plus `c_exv`/`volume`) are checked first: a model
/// other than `SAXS_EXV_SIMPLE` requires every atom to carry a resolved form
/// factor, and rejects the call with `SAXS_ERR_BAD_STATE` otherwise (spec.md
/// §8's "Simple-model UNKNOWN atoms" scenario).
///
/// # Safety
/// `molecule`/`histogram` must be valid. `out_q`/`out_i`, when non-null, must
/// each point to at least `saxs_default_q_axis_len()` writable `f64` slots.
#[no_mangle]
pub unsafe extern "C" fn saxs_debye_transform_default_axis(
    molecule: *const SaxsMolecule,
    exv_model_kind: u32,
    c_exv: f64,
    volume: f64,
    histogram: *const SaxsHistogram,
    out_q: *mut f64,
    out_i: *mut f64,
) -> u32 {
    if molecule.is_null() || histogram.is_null() {
        set_last_error("null pointer passed to saxs_debye_transform_default_axis".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    let model = excluded_volume_model(exv_model_kind, c_exv, volume);
    let q_axis = default_sinc_table().q_axis().to_vec();
    let intensities = match debye_transform_for_model(&(*molecule).0, &model, &(*histogram).0, &q_axis, 1.0) {
        Ok(v) => v,
        Err(e) => {
            let code = if matches!(e, HistError::BadState { .. }) { SAXS_ERR_BAD_STATE } else { SAXS_ERR_NUMERIC };
            set_last_error(format!("Debye transform failed: {e}"));
            return code;
        }
    };
    if !out_q.is_null() {
        slice::from_raw_parts_mut(out_q, q_axis.len()).copy_from_slice(&q_axis);
    }
    if !out_i.is_null() {
        slice::from_raw_parts_mut(out_i, intensities.len()).copy_from_slice(&intensities);
    }
    SAXS_OK
}

/// Number of samples in the process-wide default q-axis, for sizing the
/// `out_q`/`out_i` buffers passed to [`saxs_debye_transform_default_axis`].
#[no_mangle]
pub extern "C" fn saxs_default_q_axis_len() -> usize {
    default_sinc_table().q_axis().len()
}

/// Debye-transforms `histogram` at a caller-supplied q-axis of `n_q` points,
/// checking `molecule` against the `exv_model_kind`/`c_exv`/`volume` excluded-volume
/// model as [`saxs_debye_transform_default_axis`] does.
///
/// # Safety
/// `molecule`/`histogram`/`q`/`out_i` must be valid, non-null pointers; `q`/`out_i`
/// must each point to at least `n_q` `f64` slots.
#[no_mangle]
pub unsafe extern "C" fn saxs_debye_transform_user_axis(
    molecule: *const SaxsMolecule,
    exv_model_kind: u32,
    c_exv: f64,
    volume: f64,
    histogram: *const SaxsHistogram,
    q: *const f64,
    n_q: usize,
    out_i: *mut f64,
) -> u32 {
    if molecule.is_null() || histogram.is_null() || q.is_null() || out_i.is_null() {
        set_last_error("null pointer passed to saxs_debye_transform_user_axis".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    let model = excluded_volume_model(exv_model_kind, c_exv, volume);
    let q_axis = slice::from_raw_parts(q, n_q);
    match debye_transform_for_model(&(*molecule).0, &model, &(*histogram).0, q_axis, 1.0) {
        Ok(intensities) => {
            slice::from_raw_parts_mut(out_i, n_q).copy_from_slice(&intensities);
            SAXS_OK
        }
        Err(e) => {
            let code = if matches!(e, HistError::BadState { .. }) { SAXS_ERR_BAD_STATE } else { SAXS_ERR_NUMERIC };
            set_last_error(format!("Debye transform failed: {e}"));
            code
        }
    }
}

/// Parses a three/four-column measured SAXS dataset from a plain-text file.
///
/// # Safety
/// `path` must be a valid, NUL-terminated C string; `out_dataset` non-null.
#[no_mangle]
pub unsafe extern "C" fn saxs_dataset_from_file(path: *const c_char, q_unit_is_nm: bool, out_dataset: *mut *mut SaxsDataset) -> u32 {
    if out_dataset.is_null() {
        set_last_error("null pointer passed for out_dataset".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    let path = match cstr_to_string(path) {
        Ok(p) => p,
        Err(code) => return code,
    };
    match saxs_fitter::read_dataset(&path, q_unit_is_nm) {
        Ok(dataset) => {
            *out_dataset = Box::into_raw(Box::new(SaxsDataset(dataset)));
            SAXS_OK
        }
        Err(e) => {
            set_last_error(format!("failed to read dataset '{path}': {e}"));
            SAXS_ERR_PARSE
        }
    }
}

/// Runs [`SmartFitter`] with the default enabled parameters (hydration +
/// excluded volume) and a golden-section outer minimiser, under the excluded-volume
/// model named by `exv_model_kind` (one of the `SAXS_EXV_*` constants).
///
/// `molecule` is checked against that model before any fitting work starts: a
/// model other than `SAXS_EXV_SIMPLE` requires every atom to carry a resolved
/// form factor, and rejects the call with `SAXS_ERR_BAD_STATE` otherwise
/// (spec.md §8's "Simple-model UNKNOWN atoms" scenario).
///
/// # Safety
/// `molecule`/`histogram`/`dataset`/`out_result` must be valid, non-null pointers.
#[no_mangle]
pub unsafe extern "C" fn saxs_fit(
    molecule: *const SaxsMolecule,
    exv_model_kind: u32,
    c_exv: f64,
    volume: f64,
    histogram: *const SaxsHistogram,
    dataset: *const SaxsDataset,
    out_result: *mut *mut SaxsFitResult,
) -> u32 {
    if molecule.is_null() || histogram.is_null() || dataset.is_null() || out_result.is_null() {
        set_last_error("null pointer passed to saxs_fit".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    let model = excluded_volume_model(exv_model_kind, c_exv, volume);
    let fitter = SmartFitter::new(
        EnabledParameters::default(),
        ModelParameters::default(),
        volume,
        model,
        Minimizer::GoldenSection { tol: 1e-6, max_sweeps: 40 },
    );
    match fitter.fit(&(*molecule).0, &(*histogram).0, &(*dataset).0) {
        Ok(result) => {
            *out_result = Box::into_raw(Box::new(SaxsFitResult(result)));
            SAXS_OK
        }
        Err(e) => {
            let code = if matches!(e, FitError::BadState { .. }) { SAXS_ERR_BAD_STATE } else { SAXS_ERR_NUMERIC };
            set_last_error(format!("fit failed: {e}"));
            code
        }
    }
}

/// Number of points in a completed fit's curve, for sizing the output buffers
/// passed to [`saxs_fit_curve`].
///
/// # Safety
/// `result` must be a valid, non-null pointer.
#[no_mangle]
pub unsafe extern "C" fn saxs_fit_curve_len(result: *const SaxsFitResult) -> usize {
    if result.is_null() { return 0; }
    (*result).0.curve.len()
}

/// Writes the five columns of a fit's output curve (spec.md §6: q, I_data,
/// I_err, I_fit, residuals) into caller-owned buffers, each sized to at least
/// [`saxs_fit_curve_len`] entries. Any individual out-pointer may be null to
/// skip that column.
///
/// # Safety
/// `result` must be valid; every non-null `out_*` pointer must have room for
/// `saxs_fit_curve_len(result)` `f64` values.
#[no_mangle]
pub unsafe extern "C" fn saxs_fit_curve(
    result: *const SaxsFitResult,
    out_q: *mut f64,
    out_i_data: *mut f64,
    out_i_err: *mut f64,
    out_i_fit: *mut f64,
    out_residuals: *mut f64,
) -> u32 {
    if result.is_null() {
        set_last_error("null fit-result pointer".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    let curve = &(*result).0.curve;
    let write = |dst: *mut f64, f: fn(&saxs_fitter::FitCurvePoint) -> f64| {
        if !dst.is_null() {
            let out = slice::from_raw_parts_mut(dst, curve.len());
            for (i, point) in curve.iter().enumerate() { out[i] = f(point); }
        }
    };
    write(out_q, |p| p.q);
    write(out_i_data, |p| p.i_data);
    write(out_i_err, |p| p.i_err);
    write(out_i_fit, |p| p.i_model);
    write(out_residuals, |p| p.residual);
    SAXS_OK
}

/// `chi^2 / degrees_of_freedom` of a completed fit.
///
/// # Safety
/// `result` must be a valid, non-null pointer.
#[no_mangle]
pub unsafe extern "C" fn saxs_fit_reduced_chi_square(result: *const SaxsFitResult) -> f64 {
    if result.is_null() { return f64::NAN; }
    (*result).0.reduced_chi_square()
}

/// Writes `molecule`'s current state (chemistry atoms and waters) out as a
/// minimal, round-trippable PDB file.
///
/// # Safety
/// `molecule`/`path` must be valid, non-null pointers.
#[no_mangle]
pub unsafe extern "C" fn saxs_molecule_write_pdb(molecule: *const SaxsMolecule, path: *const c_char) -> u32 {
    if molecule.is_null() {
        set_last_error("null molecule pointer".to_string());
        return SAXS_ERR_NULL_POINTER;
    }
    let path = match cstr_to_string(path) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            set_last_error(format!("failed to create '{path}': {e}"));
            return SAXS_ERR_IO;
        }
    };
    match (*molecule).0.write_pdb(std::io::BufWriter::new(file)) {
        Ok(()) => SAXS_OK,
        Err(e) => {
            set_last_error(format!("failed to write '{path}': {e}"));
            SAXS_ERR_IO
        }
    }
}

macro_rules! free_fn {
    ($name:ident, $ty:ty) => {
        /// Frees a handle previously returned by this crate. A null pointer is a no-op.
        ///
        /// # Safety
        /// `handle`, if non-null, must have been returned by this crate and not
        /// already freed.
        #[no_mangle]
        pub unsafe extern "C" fn $name(handle: *mut $ty) {
            if !handle.is_null() {
                drop(Box::from_raw(handle));
            }
        }
    };
}

free_fn!(saxs_molecule_free, SaxsMolecule);
free_fn!(saxs_dataset_free, SaxsDataset);
free_fn!(saxs_histogram_free, SaxsHistogram);
free_fn!(saxs_fit_result_free, SaxsFitResult);

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn test_molecule_from_arrays_and_free() {
        let xs = vec![0.0, 1.0];
        let ys = vec![0.0, 0.0];
        let zs = vec![0.0, 0.0];
        let mut handle: *mut SaxsMolecule = ptr::null_mut();
        let status = unsafe { saxs_molecule_from_arrays(xs.as_ptr(), ys.as_ptr(), zs.as_ptr(), 2, &mut handle) };
        assert_eq!(status, SAXS_OK);
        assert!(!handle.is_null());
        assert_eq!(unsafe { saxs_molecule_n_atoms(handle) }, 2);
        unsafe { saxs_molecule_free(handle) };
    }

    #[test]
    fn test_null_pointer_reports_error_status() {
        let mut handle: *mut SaxsMolecule = ptr::null_mut();
        let status = unsafe { saxs_molecule_from_arrays(ptr::null(), ptr::null(), ptr::null(), 0, &mut handle) };
        assert_eq!(status, SAXS_ERR_NULL_POINTER);
        assert!(handle.is_null());
    }

    #[test]
    fn test_histogram_and_debye_transform_roundtrip() {
        let xs = vec![0.0, 2.0];
        let ys = vec![0.0, 0.0];
        let zs = vec![0.0, 0.0];
        let mut molecule: *mut SaxsMolecule = ptr::null_mut();
        unsafe { saxs_molecule_from_arrays(xs.as_ptr(), ys.as_ptr(), zs.as_ptr(), 2, &mut molecule) };

        let mut histogram: *mut SaxsHistogram = ptr::null_mut();
        let status = unsafe { saxs_histogram_compute(molecule, 0.2, 100, &mut histogram) };
        assert_eq!(status, SAXS_OK);

        let q = vec![0.0, 0.1, 0.2];
        let mut i_out = vec![0.0; 3];
        let status = unsafe {
            saxs_debye_transform_user_axis(molecule, SAXS_EXV_SIMPLE, 1.0, 100.0, histogram, q.as_ptr(), 3, i_out.as_mut_ptr())
        };
        assert_eq!(status, SAXS_OK);
        assert!(i_out.iter().all(|v| v.is_finite()));

        unsafe {
            saxs_histogram_free(histogram);
            saxs_molecule_free(molecule);
        }
    }

    #[test]
    fn test_debye_transform_rejects_unknown_atoms_under_non_simple_model() {
        let xs = vec![0.0, 2.0];
        let ys = vec![0.0, 0.0];
        let zs = vec![0.0, 0.0];
        let mut molecule: *mut SaxsMolecule = ptr::null_mut();
        unsafe { saxs_molecule_from_arrays(xs.as_ptr(), ys.as_ptr(), zs.as_ptr(), 2, &mut molecule) };

        let mut histogram: *mut SaxsHistogram = ptr::null_mut();
        unsafe { saxs_histogram_compute(molecule, 0.2, 100, &mut histogram) };

        let q = vec![0.0, 0.1, 0.2];
        let mut i_out = vec![0.0; 3];
        let status = unsafe {
            saxs_debye_transform_user_axis(molecule, SAXS_EXV_FRASER, 1.0, 10.0, histogram, q.as_ptr(), 3, i_out.as_mut_ptr())
        };
        assert_eq!(status, SAXS_ERR_BAD_STATE);
        let msg = unsafe { CStr::from_ptr(saxs_last_error_message()) };
        assert!(msg.to_str().unwrap().contains("UNKNOWN form factor"));

        unsafe {
            saxs_histogram_free(histogram);
            saxs_molecule_free(molecule);
        }
    }

    #[test]
    fn test_last_error_message_is_populated_on_failure() {
        let path = CString::new("/nonexistent/path/does-not-exist.pdb").unwrap();
        let mut handle: *mut SaxsMolecule = ptr::null_mut();
        let status = unsafe { saxs_molecule_from_pdb(path.as_ptr(), &mut handle) };
        assert_ne!(status, SAXS_OK);
        let msg = unsafe { CStr::from_ptr(saxs_last_error_message()) };
        assert!(!msg.to_bytes().is_empty());
    }
}
