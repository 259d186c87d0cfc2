use saxs_pdb::Molecule;

use crate::compact::{cross_distance_histogram, self_distance_histogram, CompactCoordinates};
use crate::composite::CompositeDistanceHistogram;

/// What changed since a [`HistogramManager`] last computed a body-pair block.
///
/// Mirrors the three independent things a [`saxs_pdb::StateManager`] tracks:
/// a body can move on its own (`Internal`), move because something else pulled
/// it along (`External`), or its hydration shell can be regenerated
/// (`Hydration`, which invalidates every `aw`/`ww` block but no `aa` block).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Internal,
    External,
    Hydration,
    None,
}

/// Computes the full composite distance histogram of a [`Molecule`] in one pass,
/// with no caching between calls. Always correct; used as the first calculation
/// and as the reference implementation the partial manager is checked against.
pub struct FullHistogramManager {
    pub bin_width: f64,
    pub n_bins: usize,
}

impl FullHistogramManager {
    pub fn new(bin_width: f64, n_bins: usize) -> Self {
        FullHistogramManager { bin_width, n_bins }
    }

    pub fn calculate_all(&self, molecule: &Molecule) -> CompositeDistanceHistogram {
        let mut histogram = CompositeDistanceHistogram::new(self.n_bins, self.bin_width);

        let bodies: Vec<(CompactCoordinates, CompactCoordinates)> = molecule.bodies().iter()
            .map(|b| (CompactCoordinates::from_atoms(b.atoms()), CompactCoordinates::from_waters(b.waters())))
            .collect();

        for (atoms, waters) in &bodies {
            add_self(&mut histogram.aa, atoms.as_slice(), self.bin_width, self.n_bins);
            add_self(&mut histogram.ww, waters.as_slice(), self.bin_width, self.n_bins);
            add_cross(&mut histogram.aw, atoms.as_slice(), waters.as_slice(), self.bin_width, self.n_bins);
        }
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                add_cross_same_species(&mut histogram.aa, bodies[i].0.as_slice(), bodies[j].0.as_slice(), self.bin_width, self.n_bins);
                add_cross_same_species(&mut histogram.ww, bodies[i].1.as_slice(), bodies[j].1.as_slice(), self.bin_width, self.n_bins);
                add_cross(&mut histogram.aw, bodies[i].0.as_slice(), bodies[j].1.as_slice(), self.bin_width, self.n_bins);
                add_cross(&mut histogram.aw, bodies[j].0.as_slice(), bodies[i].1.as_slice(), self.bin_width, self.n_bins);
            }
        }
        histogram
    }
}

/// Accumulates a same-species self-correlation (`aa` within one body, or `ww`
/// within one body) into `bins`.
///
/// `self_distance_histogram` only visits each `i < j` pair once, but the
/// composite total (and `exact_debye`) sum over *ordered* pairs `(i,j)` and
/// `(j,i)` alike — so every off-diagonal bin is doubled here before the
/// single-counted `i == j` diagonal term (`sum w_i^2`) is added on top.
fn add_self(bins: &mut [f64], points: &[[f32; 4]], bin_width: f64, n_bins: usize) {
    let contrib = self_distance_histogram(points, bin_width, n_bins);
    for (b, c) in bins.iter_mut().zip(contrib.iter()) { *b += 2.0 * c; }
    if n_bins > 0 {
        bins[0] += points.iter().map(|p| (p[3] as f64) * (p[3] as f64)).sum::<f64>();
    }
}

/// Accumulates a cross term between two disjoint point sets of *different*
/// species (atoms against waters) into `bins`. Each `(atom, water)` pair is
/// inherently unordered — there is no swapped duplicate to account for — so
/// this is added single-counted, matching `CompositeDistanceHistogram::
/// total_counts`'s explicit `2 * c_water` factor on the `aw` partial.
fn add_cross(bins: &mut [f64], a: &[[f32; 4]], b: &[[f32; 4]], bin_width: f64, n_bins: usize) {
    let contrib = cross_distance_histogram(a, b, bin_width, n_bins);
    for (x, c) in bins.iter_mut().zip(contrib.iter()) { *x += c; }
}

/// Accumulates a cross term between two disjoint point sets of the *same*
/// species (atoms of body i against atoms of body j, or waters against
/// waters) into `bins`. Unlike `add_cross`, every such pair is doubled: the
/// full same-species sum ranges over ordered pairs from both bodies combined,
/// so `(atom in i, atom in j)` and `(atom in j, atom in i)` both contribute.
fn add_cross_same_species(bins: &mut [f64], a: &[[f32; 4]], b: &[[f32; 4]], bin_width: f64, n_bins: usize) {
    let contrib = cross_distance_histogram(a, b, bin_width, n_bins);
    for (x, c) in bins.iter_mut().zip(contrib.iter()) { *x += 2.0 * c; }
}

/// A single cached body-pair block: the `aa`, `aw`/`wa` and `ww` contribution of
/// one ordered pair of bodies (or of one body against itself).
#[derive(Clone)]
struct PairBlock {
    aa: Vec<f64>,
    ww: Vec<f64>,
    aw_fwd: Vec<f64>, // atoms of i against waters of j
    aw_bwd: Vec<f64>, // atoms of j against waters of i (unused on the diagonal)
}

/// Recomputes only the body-pair blocks a [`saxs_pdb::StateManager`] marks dirty,
/// reusing every other block from the previous call.
///
/// A block `(i, j)` is recomputed when body `i` or `j` moved (internally or
/// externally), when their symmetry descriptor changed, or when either body's
/// hydration shell was regenerated (which only invalidates `aw`/`ww`, not `aa`,
/// but this manager recomputes the whole block rather than tracking that finer
/// split — `aa` is cheap to redo compared to the savings already won by skipping
/// untouched body pairs entirely).
pub struct PartialHistogramManager {
    bin_width: f64,
    n_bins: usize,
    blocks: Vec<Vec<Option<PairBlock>>>,
}

impl PartialHistogramManager {
    pub fn new(bin_width: f64, n_bins: usize, n_bodies: usize) -> Self {
        PartialHistogramManager { bin_width, n_bins, blocks: vec![vec![None; n_bodies]; n_bodies] }
    }

    /// Recomputes dirty blocks against `molecule`'s current coordinates and state,
    /// then clears the molecule's dirty bits. Returns the fully assembled
    /// composite histogram.
    pub fn calculate_all(&mut self, molecule: &Molecule) -> CompositeDistanceHistogram {
        let n = molecule.n_bodies();
        if self.blocks.len() != n {
            self.blocks = vec![vec![None; n]; n];
        }

        let bodies: Vec<(CompactCoordinates, CompactCoordinates)> = molecule.bodies().iter()
            .map(|b| (CompactCoordinates::from_atoms(b.atoms()), CompactCoordinates::from_waters(b.waters())))
            .collect();

        let state = molecule.state();
        let hydration_dirty = state.is_modified_hydration();

        for i in 0..n {
            for j in i..n {
                let dirty = hydration_dirty
                    || state.is_internally_modified(i) || state.is_internally_modified(j)
                    || state.is_externally_modified(i) || state.is_externally_modified(j)
                    || state.is_modified_symmetry(i, j);

                if dirty || self.blocks[i][j].is_none() {
                    let block = if i == j {
                        compute_diagonal_block(&bodies[i].0, &bodies[i].1, self.bin_width, self.n_bins)
                    } else {
                        compute_offdiagonal_block(&bodies[i], &bodies[j], self.bin_width, self.n_bins)
                    };
                    self.blocks[i][j] = Some(block);
                }
            }
        }

        state.reset_to_false();

        let mut histogram = CompositeDistanceHistogram::new(self.n_bins, self.bin_width);
        for i in 0..n {
            for j in i..n {
                let block = self.blocks[i][j].as_ref().expect("block computed above");
                for k in 0..self.n_bins {
                    histogram.aa[k] += block.aa[k];
                    histogram.ww[k] += block.ww[k];
                    histogram.aw[k] += block.aw_fwd[k];
                    if i != j { histogram.aw[k] += block.aw_bwd[k]; }
                }
            }
        }
        histogram
    }
}

fn compute_diagonal_block(atoms: &CompactCoordinates, waters: &CompactCoordinates, bin_width: f64, n_bins: usize) -> PairBlock {
    // aa/ww within one body: double the i<j sum to match the ordered-pair
    // convention, then add the single-counted i==j diagonal (see `add_self`).
    let mut aa: Vec<f64> = self_distance_histogram(atoms.as_slice(), bin_width, n_bins).iter().map(|c| 2.0 * c).collect();
    if n_bins > 0 {
        aa[0] += atoms.as_slice().iter().map(|p| (p[3] as f64) * (p[3] as f64)).sum::<f64>();
    }
    let mut ww: Vec<f64> = self_distance_histogram(waters.as_slice(), bin_width, n_bins).iter().map(|c| 2.0 * c).collect();
    if n_bins > 0 {
        ww[0] += waters.as_slice().iter().map(|p| (p[3] as f64) * (p[3] as f64)).sum::<f64>();
    }
    let aw_fwd = cross_distance_histogram(atoms.as_slice(), waters.as_slice(), bin_width, n_bins);
    PairBlock { aa, ww, aw_fwd, aw_bwd: vec![0.0; n_bins] }
}

fn compute_offdiagonal_block(
    body_i: &(CompactCoordinates, CompactCoordinates),
    body_j: &(CompactCoordinates, CompactCoordinates),
    bin_width: f64,
    n_bins: usize,
) -> PairBlock {
    // aa/ww between two distinct bodies: same ordered-pair doubling as the
    // diagonal block's off-diagonal term (see `add_cross_same_species`).
    let aa: Vec<f64> = cross_distance_histogram(body_i.0.as_slice(), body_j.0.as_slice(), bin_width, n_bins).iter().map(|c| 2.0 * c).collect();
    let ww: Vec<f64> = cross_distance_histogram(body_i.1.as_slice(), body_j.1.as_slice(), bin_width, n_bins).iter().map(|c| 2.0 * c).collect();
    let aw_fwd = cross_distance_histogram(body_i.0.as_slice(), body_j.1.as_slice(), bin_width, n_bins);
    let aw_bwd = cross_distance_histogram(body_j.0.as_slice(), body_i.1.as_slice(), bin_width, n_bins);
    PairBlock { aa, ww, aw_fwd, aw_bwd }
}

/// Dispatches to either the full or the partial strategy; most callers hold one
/// of these for the lifetime of a fit rather than constructing a manager per call.
pub enum HistogramManager {
    Full(FullHistogramManager),
    Partial(PartialHistogramManager),
}

impl HistogramManager {
    pub fn calculate_all(&mut self, molecule: &Molecule) -> CompositeDistanceHistogram {
        match self {
            HistogramManager::Full(m) => m.calculate_all(molecule),
            HistogramManager::Partial(m) => m.calculate_all(molecule),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saxs_pdb::{Atom, AtomFF, FormFactorType, Water};

    fn sample_molecule() -> Molecule {
        let atoms = vec![
            AtomFF::new(Atom::new(0.0, 0.0, 0.0, 1.0), FormFactorType::H),
            AtomFF::new(Atom::new(1.0, 0.0, 0.0, 1.0), FormFactorType::H),
        ];
        let mut m = Molecule::from_bodies(vec![atoms]);
        m.bodies_mut()[0].set_waters(vec![Water::new(Atom::new(2.0, 0.0, 0.0, 1.0))]);
        m
    }

    #[test]
    fn test_full_and_partial_managers_agree() {
        let molecule = sample_molecule();
        let full = FullHistogramManager::new(0.5, 20).calculate_all(&molecule);
        let mut partial_mgr = PartialHistogramManager::new(0.5, 20, molecule.n_bodies());
        let partial = partial_mgr.calculate_all(&molecule);
        assert_eq!(full.aa, partial.aa);
        assert_eq!(full.ww, partial.ww);
        assert_eq!(full.aw, partial.aw);
    }

    #[test]
    fn test_partial_manager_reuses_clean_blocks() {
        let molecule = sample_molecule();
        let mut mgr = PartialHistogramManager::new(0.5, 20, molecule.n_bodies());
        let first = mgr.calculate_all(&molecule);
        // nothing changed: state is now clean, recompute must return the same histogram
        let second = mgr.calculate_all(&molecule);
        assert_eq!(first.aa, second.aa);
        assert_eq!(first.ww, second.ww);
    }

    #[test]
    fn test_hydration_change_is_picked_up_by_partial_manager() {
        let mut molecule = sample_molecule();
        let mut mgr = PartialHistogramManager::new(0.5, 20, molecule.n_bodies());
        let _ = mgr.calculate_all(&molecule);
        molecule.bodies_mut()[0].set_waters(vec![
            Water::new(Atom::new(2.0, 0.0, 0.0, 1.0)),
            Water::new(Atom::new(3.0, 0.0, 0.0, 1.0)),
        ]);
        let updated = mgr.calculate_all(&molecule);
        assert!(updated.ww.iter().sum::<f64>() > 0.0);
    }
}
