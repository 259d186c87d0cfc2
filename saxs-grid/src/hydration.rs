use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use saxs_pdb::{Atom, Water};

use crate::grid::{is_only_empty_or_volume, is_surface, Grid};

/// Default seed used whenever a caller doesn't supply one, keeping hydration
/// runs reproducible by default.
pub const DEFAULT_SEED: u64 = 0x5AX5_5EED;

/// The four ways to place a hydration shell around a set of atom centres.
///
/// Each variant shares the contract "produce water positions given the current
/// grid and atom centres"; encoded as a tagged enum rather than a trait object
/// since the set of strategies is closed.
#[derive(Clone, Copy, Debug)]
pub enum HydrationStrategy {
    /// Casts `n_directions` rays per atom; the first empty surface cell along
    /// each ray (respecting `min_separation` from earlier waters) gets a water.
    Radial { n_directions: usize, min_separation: f64 },
    /// `Radial` restricted to the six axis-aligned directions.
    Axes { min_separation: f64 },
    /// Scans `±r_eff` bins along each cardinal axis from every atom centre.
    Jan { r_eff: f64 },
    /// Places a water at every empty cell within `[r, r + shell_width(rg)]` of
    /// an atom centre, where `shell_width` interpolates linearly between 3 Å
    /// and 5 Å as `rg` ranges over `[15, 20]`.
    Pepsi { r: f64, rg: f64 },
}

fn shell_width_for_rg(rg: f64) -> f64 {
    let t = ((rg - 15.0) / (20.0 - 15.0)).clamp(0.0, 1.0);
    3.0 + t * (5.0 - 3.0)
}

fn dist(a: (f64, f64, f64), b: (f64, f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2) + (a.2 - b.2).powi(2)).sqrt()
}

impl HydrationStrategy {
    /// Generates a hydration shell for `atom_centers`, using `grid` for
    /// occupancy queries. `atom_radius` is the van-der-Waals radius shared by
    /// every atom (see [`crate::grid::Grid`]'s single-radius simplification).
    pub fn generate(&self, grid: &Grid, atom_centers: &[(f64, f64, f64)], atom_radius: f64, seed: u64) -> Vec<Water> {
        let mut rng = StdRng::seed_from_u64(seed);
        match *self {
            HydrationStrategy::Radial { n_directions, min_separation } => {
                let directions = random_directions(n_directions, &mut rng);
                cast_rays(grid, atom_centers, &directions, atom_radius, min_separation)
            }
            HydrationStrategy::Axes { min_separation } => {
                let directions = [
                    (1.0, 0.0, 0.0), (-1.0, 0.0, 0.0),
                    (0.0, 1.0, 0.0), (0.0, -1.0, 0.0),
                    (0.0, 0.0, 1.0), (0.0, 0.0, -1.0),
                ];
                cast_rays(grid, atom_centers, &directions, atom_radius, min_separation)
            }
            HydrationStrategy::Jan { r_eff } => jan_scan(grid, atom_centers, r_eff),
            HydrationStrategy::Pepsi { r, rg } => pepsi_shell(grid, atom_centers, r, shell_width_for_rg(rg)),
        }
    }
}

fn random_directions(n: usize, rng: &mut StdRng) -> Vec<(f64, f64, f64)> {
    (0..n).map(|_| {
        let z: f64 = rng.gen_range(-1.0..1.0);
        let theta: f64 = rng.gen_range(0.0..2.0 * PI);
        let r = (1.0 - z * z).max(0.0).sqrt();
        (r * theta.cos(), r * theta.sin(), z)
    }).collect()
}

fn cast_rays(
    grid: &Grid,
    atom_centers: &[(f64, f64, f64)],
    directions: &[(f64, f64, f64)],
    atom_radius: f64,
    min_separation: f64,
) -> Vec<Water> {
    let step = grid.indexer.width.max(0.1);
    let mut placed: Vec<(f64, f64, f64)> = Vec::new();

    for &centre in atom_centers {
        for &dir in directions {
            let mut t = atom_radius;
            let max_t = atom_radius * 4.0;
            while t < max_t {
                let p = (centre.0 + dir.0 * t, centre.1 + dir.1 * t, centre.2 + dir.2 * t);
                let bin = grid.to_bins(p);
                let cell = grid.cell_at(bin);
                if is_surface(cell) || super::grid::is_empty(cell) {
                    if placed.iter().all(|&q| dist(p, q) >= min_separation) {
                        placed.push(p);
                        break;
                    }
                }
                t += step;
            }
        }
    }
    placed.into_iter().map(|(x, y, z)| Water::new(Atom::new(x, y, z, 0.0))).collect()
}

fn jan_scan(grid: &Grid, atom_centers: &[(f64, f64, f64)], r_eff: f64) -> Vec<Water> {
    let width = grid.indexer.width.max(0.1);
    let n_steps = (r_eff / width).round() as i32;
    let mut placed = Vec::new();

    for &centre in atom_centers {
        let bin0 = grid.to_bins(centre);
        for axis in 0..3 {
            for sign in [-1, 1] {
                for k in 1..=n_steps.max(1) {
                    let mut bin = bin0;
                    match axis {
                        0 => bin.0 += sign * k,
                        1 => bin.1 += sign * k,
                        _ => bin.2 += sign * k,
                    }
                    let cell = grid.cell_at(bin);
                    if is_only_empty_or_volume(cell) {
                        let neighbours_ok = [
                            (bin.0 + 1, bin.1, bin.2), (bin.0 - 1, bin.1, bin.2),
                            (bin.0, bin.1 + 1, bin.2), (bin.0, bin.1 - 1, bin.2),
                            (bin.0, bin.1, bin.2 + 1), (bin.0, bin.1, bin.2 - 1),
                        ].iter().all(|&nb| is_only_empty_or_volume(grid.cell_at(nb)));
                        if neighbours_ok {
                            placed.push(grid.to_xyz(bin));
                        }
                    }
                }
            }
        }
    }
    placed.into_iter().map(|(x, y, z)| Water::new(Atom::new(x, y, z, 0.0))).collect()
}

fn pepsi_shell(grid: &Grid, atom_centers: &[(f64, f64, f64)], r: f64, shell_width: f64) -> Vec<Water> {
    let width = grid.indexer.width.max(0.1);
    let r_outer = r + shell_width;
    let n = (r_outer / width).ceil() as i32 + 1;
    let mut placed = Vec::new();

    for &centre in atom_centers {
        let bin0 = grid.to_bins(centre);
        for dx in -n..=n {
            for dy in -n..=n {
                for dz in -n..=n {
                    let bin = (bin0.0 + dx, bin0.1 + dy, bin0.2 + dz);
                    let p = grid.to_xyz(bin);
                    let d = dist(p, centre);
                    if d >= r && d <= r_outer && super::grid::is_empty(grid.cell_at(bin)) {
                        placed.push(p);
                    }
                }
            }
        }
    }
    placed.into_iter().map(|(x, y, z)| Water::new(Atom::new(x, y, z, 0.0))).collect()
}

/// Reduces a generated hydration shell to roughly `n_target` waters.
#[derive(Clone, Copy, Debug)]
pub enum CullingStrategy {
    /// Keeps every Nth water, `N = ceil(len / n_target)`.
    Counter,
    /// Like `Counter`, but the starting offset is randomised.
    RandomCounter,
    /// Drops the waters whose local density most exceeds the target, smoothing
    /// the spatial distribution rather than subsampling uniformly.
    Outlier,
    /// Like `Outlier`, with randomised tie-breaking among equally dense waters.
    RandomOutlier,
    /// No reduction.
    None,
}

impl CullingStrategy {
    pub fn cull(&self, waters: Vec<Water>, n_target: usize, seed: u64) -> Vec<Water> {
        if n_target == 0 || waters.len() <= n_target { return waters; }
        let mut rng = StdRng::seed_from_u64(seed);
        match self {
            CullingStrategy::None => waters,
            CullingStrategy::Counter => counter_cull(waters, n_target, 0),
            CullingStrategy::RandomCounter => {
                let step = (waters.len() as f64 / n_target as f64).ceil() as usize;
                let offset = rng.gen_range(0..step.max(1));
                counter_cull(waters, n_target, offset)
            }
            CullingStrategy::Outlier => outlier_cull(waters, n_target, &mut rng, false),
            CullingStrategy::RandomOutlier => outlier_cull(waters, n_target, &mut rng, true),
        }
    }
}

fn counter_cull(waters: Vec<Water>, n_target: usize, offset: usize) -> Vec<Water> {
    let step = (waters.len() as f64 / n_target as f64).ceil() as usize;
    waters.into_iter().skip(offset).step_by(step.max(1)).collect()
}

fn outlier_cull(waters: Vec<Water>, n_target: usize, rng: &mut StdRng, randomize_ties: bool) -> Vec<Water> {
    let mut with_density: Vec<(f64, Water)> = waters.iter().map(|w| {
        let density: f64 = waters.iter()
            .map(|o| dist((w.atom.x, w.atom.y, w.atom.z), (o.atom.x, o.atom.y, o.atom.z)))
            .filter(|&d| d > 0.0 && d < 5.0)
            .count() as f64;
        (density, w.clone())
    }).collect();

    with_density.sort_by(|a, b| {
        let ord = b.0.partial_cmp(&a.0).unwrap();
        if randomize_ties && ord == std::cmp::Ordering::Equal {
            if rng.gen_bool(0.5) { std::cmp::Ordering::Greater } else { std::cmp::Ordering::Less }
        } else {
            ord
        }
    });

    let n_drop = with_density.len() - n_target;
    with_density.into_iter().skip(n_drop).map(|(_, w)| w).collect()
}

/// The culling strategy a caller should apply after `strategy` runs.
///
/// Every strategy but [`HydrationStrategy::Pepsi`] defers to whatever culling
/// the caller configured; Pepsi's declared post-condition is "no culling step
/// follows", so this always returns [`CullingStrategy::None`] for it,
/// overriding any caller-requested strategy (spec.md §9's open question on
/// Pepsi's culling, resolved in favour of the strategy's own post-condition).
pub fn default_culling_for(strategy: &HydrationStrategy, requested: CullingStrategy) -> CullingStrategy {
    match strategy {
        HydrationStrategy::Pepsi { .. } => CullingStrategy::None,
        _ => requested,
    }
}

/// `N_target = water_scaling * 4*pi*r^2*sqrt(r)`, where `r` is the
/// sphere-equivalent radius of the grid's enclosed (VOLUME-cell) volume.
pub fn target_water_count(enclosed_volume: f64, water_scaling: f64) -> usize {
    let r = (enclosed_volume * 3.0 / (4.0 * PI)).max(0.0).powf(1.0 / 3.0);
    (water_scaling * 4.0 * PI * r * r * r.sqrt()).round().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_axes_strategy_is_deterministic() {
        let centers = vec![(0.0, 0.0, 0.0)];
        let mut grid = Grid::new(&centers, 0.5, 20, 6);
        grid.add_atom(centers[0]);
        let strategy = HydrationStrategy::Axes { min_separation: 0.1 };
        let a = strategy.generate(&grid, &centers, 1.5, DEFAULT_SEED);
        let b = strategy.generate(&grid, &centers, 1.5, DEFAULT_SEED);
        assert_eq!(a.len(), b.len());
        assert!(!a.is_empty());
    }

    #[test]
    fn test_radial_strategy_is_seed_deterministic() {
        let centers = vec![(0.0, 0.0, 0.0)];
        let mut grid = Grid::new(&centers, 0.5, 20, 6);
        grid.add_atom(centers[0]);
        let strategy = HydrationStrategy::Radial { n_directions: 8, min_separation: 0.2 };
        let a = strategy.generate(&grid, &centers, 1.5, 7);
        let b = strategy.generate(&grid, &centers, 1.5, 7);
        assert_eq!(a.len(), b.len());
        for (wa, wb) in a.iter().zip(b.iter()) {
            assert_eq!(wa.atom.x, wb.atom.x);
        }
    }

    #[test]
    fn test_counter_cull_reduces_to_target() {
        let waters: Vec<Water> = (0..100).map(|i| Water::new(Atom::new(i as f64, 0.0, 0.0, 0.0))).collect();
        let culled = CullingStrategy::Counter.cull(waters, 10, DEFAULT_SEED);
        assert!(culled.len() <= 10);
        assert!(culled.len() >= 8);
    }

    #[test]
    fn test_none_culling_is_identity() {
        let waters: Vec<Water> = (0..5).map(|i| Water::new(Atom::new(i as f64, 0.0, 0.0, 0.0))).collect();
        let culled = CullingStrategy::None.cull(waters.clone(), 2, DEFAULT_SEED);
        assert_eq!(culled.len(), waters.len());
    }

    #[test]
    fn test_target_water_count_grows_with_volume() {
        let small = target_water_count(100.0, 1.0);
        let big = target_water_count(10000.0, 1.0);
        assert!(big > small);
    }

    #[test]
    fn test_pepsi_strategy_always_forces_no_culling() {
        let pepsi = HydrationStrategy::Pepsi { r: 1.4, rg: 18.0 };
        assert!(matches!(default_culling_for(&pepsi, CullingStrategy::Counter), CullingStrategy::None));
        assert!(matches!(default_culling_for(&pepsi, CullingStrategy::Outlier), CullingStrategy::None));
    }

    #[test]
    fn test_non_pepsi_strategy_keeps_requested_culling() {
        let axes = HydrationStrategy::Axes { min_separation: 0.1 };
        assert!(matches!(default_culling_for(&axes, CullingStrategy::Counter), CullingStrategy::Counter));
    }
}
