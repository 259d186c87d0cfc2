use std::collections::HashMap;
use std::sync::Mutex;

use bitflags::bitflags;

bitflags! {
    /// What a grid cell currently holds. `A_AREA`/`W_AREA` mark the shell of
    /// cells within an atom's/water's radius; `VOLUME` marks the smaller,
    /// interior subset actually inside the van-der-Waals sphere. A "surface"
    /// cell is `A_AREA` but not `VOLUME`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct CellState: u8 {
        const EMPTY = 0;
        const VOLUME = 1 << 0;
        const A_CENTER = 1 << 1;
        const A_AREA = 1 << 2;
        const W_CENTER = 1 << 3;
        const W_AREA = 1 << 4;
    }
}

pub fn is_empty(c: CellState) -> bool { c == CellState::EMPTY }
pub fn is_volume(c: CellState) -> bool { c.contains(CellState::VOLUME) }
pub fn is_only_empty_or_volume(c: CellState) -> bool {
    c == CellState::EMPTY || c == CellState::VOLUME
}
pub fn is_atom_area_or_volume(c: CellState) -> bool {
    c.contains(CellState::A_AREA) || c.contains(CellState::VOLUME)
}
pub fn is_water_center(c: CellState) -> bool { c.contains(CellState::W_CENTER) }
pub fn is_surface(c: CellState) -> bool { c.contains(CellState::A_AREA) && !c.contains(CellState::VOLUME) }

/// Affine map between Cartesian coordinates and integer grid-bin indices.
///
/// Re-expressed from the original `Indexer3D`/`to_bins`/`to_xyz` template as a
/// small, non-generic struct: this crate only ever indexes a fixed-width cubic grid.
#[derive(Clone, Copy, Debug)]
pub struct Indexer3D {
    pub origin: (f64, f64, f64),
    pub width: f64,
    pub dims: (i32, i32, i32),
}

impl Indexer3D {
    pub fn to_bins(&self, xyz: (f64, f64, f64)) -> (i32, i32, i32) {
        (
            ((xyz.0 - self.origin.0) / self.width).floor() as i32,
            ((xyz.1 - self.origin.1) / self.width).floor() as i32,
            ((xyz.2 - self.origin.2) / self.width).floor() as i32,
        )
    }

    /// Cartesian coordinates of a bin's centre.
    pub fn to_xyz(&self, bin: (i32, i32, i32)) -> (f64, f64, f64) {
        (
            self.origin.0 + (bin.0 as f64 + 0.5) * self.width,
            self.origin.1 + (bin.1 as f64 + 0.5) * self.width,
            self.origin.2 + (bin.2 as f64 + 0.5) * self.width,
        )
    }

    pub fn in_bounds(&self, bin: (i32, i32, i32)) -> bool {
        bin.0 >= 0 && bin.0 < self.dims.0 && bin.1 >= 0 && bin.1 < self.dims.1 && bin.2 >= 0 && bin.2 < self.dims.2
    }

    pub fn flat_index(&self, bin: (i32, i32, i32)) -> Option<usize> {
        if !self.in_bounds(bin) { return None; }
        Some(((bin.2 * self.dims.1 + bin.1) * self.dims.0 + bin.0) as usize)
    }

    pub fn n_cells(&self) -> usize { (self.dims.0 * self.dims.1 * self.dims.2).max(0) as usize }
}

/// The four radial-shell offset sets used by [`Grid::expand_volume`], cached by
/// grid width since an `f64` key can't be hashed directly.
type StencilSet = [Vec<(i32, i32, i32)>; 4];

static STENCIL_CACHE: Mutex<Option<HashMap<u64, StencilSet>>> = Mutex::new(None);

fn stencils_for_width(width: f64) -> StencilSet {
    let key = width.to_bits();
    let mut guard = STENCIL_CACHE.lock().unwrap();
    let cache = guard.get_or_insert_with(HashMap::new);
    cache.entry(key).or_insert_with(|| generate_stencils(width)).clone()
}

/// Generates one octant of each shell and reflects it across all eight octants
/// so every stencil is symmetric under sign flips, as required.
fn generate_stencils(width: f64) -> StencilSet {
    let base_bins = (0.5 / width).max(1.0);
    let radii: [f64; 4] = [base_bins, base_bins * 3.0, base_bins * 5.0, base_bins * 7.0];
    std::array::from_fn(|i| generate_one_shell(radii[i]))
}

fn generate_one_shell(radius: f64) -> Vec<(i32, i32, i32)> {
    let r_bins = radius.round() as i32;
    let mut octant = Vec::new();
    for dx in 0..=r_bins {
        for dy in 0..=r_bins {
            for dz in 0..=r_bins {
                let d = ((dx * dx + dy * dy + dz * dz) as f64).sqrt();
                if (d - radius).abs() < 0.75 {
                    octant.push((dx, dy, dz));
                }
            }
        }
    }
    let mut full = Vec::new();
    for &(dx, dy, dz) in &octant {
        for &sx in &[1, -1] {
            for &sy in &[1, -1] {
                for &sz in &[1, -1] {
                    let p = (dx * sx, dy * sy, dz * sz);
                    if !full.contains(&p) { full.push(p); }
                }
            }
        }
    }
    full
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MemberKind { Atom, Water }

struct Member {
    bin: (i32, i32, i32),
    kind: MemberKind,
    expanded: bool,
}

/// A dense, bounding-box-aligned occupancy grid over one or more bodies' atoms
/// and waters.
pub struct Grid {
    pub indexer: Indexer3D,
    cells: Vec<CellState>,
    members: Vec<Member>,
}

impl Grid {
    /// Builds an empty grid of the given `width` covering `points` (every atom's
    /// Cartesian position) with `padding` extra bins on each side and at least
    /// `min_bins_per_axis` bins along every axis.
    pub fn new(points: &[(f64, f64, f64)], width: f64, min_bins_per_axis: i32, padding: i32) -> Self {
        let (mut lo, mut hi) = match points.first() {
            Some(&p) => (p, p),
            None => ((0.0, 0.0, 0.0), (0.0, 0.0, 0.0)),
        };
        for &(x, y, z) in points {
            lo = (lo.0.min(x), lo.1.min(y), lo.2.min(z));
            hi = (hi.0.max(x), hi.1.max(y), hi.2.max(z));
        }

        let span = |a: f64, b: f64| (((b - a) / width).ceil() as i32 + 2 * padding).max(min_bins_per_axis);
        let dims = (span(lo.0, hi.0), span(lo.1, hi.1), span(lo.2, hi.2));
        let origin = (
            lo.0 - padding as f64 * width,
            lo.1 - padding as f64 * width,
            lo.2 - padding as f64 * width,
        );
        let indexer = Indexer3D { origin, width, dims };
        let cells = vec![CellState::EMPTY; indexer.n_cells()];
        Grid { indexer, cells, members: Vec::new() }
    }

    pub fn to_xyz(&self, bin: (i32, i32, i32)) -> (f64, f64, f64) { self.indexer.to_xyz(bin) }
    pub fn to_bins(&self, xyz: (f64, f64, f64)) -> (i32, i32, i32) { self.indexer.to_bins(xyz) }

    pub fn cell_at(&self, bin: (i32, i32, i32)) -> CellState {
        self.indexer.flat_index(bin).map(|i| self.cells[i]).unwrap_or(CellState::EMPTY)
    }

    fn set_flag(&mut self, bin: (i32, i32, i32), flag: CellState) {
        if let Some(i) = self.indexer.flat_index(bin) { self.cells[i].insert(flag); }
    }

    /// Records an atom at `xyz`, stamping `A_CENTER`. Returns the member id later
    /// passed to [`Grid::remove`].
    pub fn add_atom(&mut self, xyz: (f64, f64, f64)) -> usize {
        let bin = self.to_bins(xyz);
        self.set_flag(bin, CellState::A_CENTER);
        self.members.push(Member { bin, kind: MemberKind::Atom, expanded: false });
        self.members.len() - 1
    }

    /// Records a water at `xyz`, stamping `W_CENTER`.
    pub fn add_water(&mut self, xyz: (f64, f64, f64)) -> usize {
        let bin = self.to_bins(xyz);
        self.set_flag(bin, CellState::W_CENTER);
        self.members.push(Member { bin, kind: MemberKind::Water, expanded: false });
        self.members.len() - 1
    }

    /// Removes a member. Since shared shell cells may still be held up by other
    /// members, the whole grid's area/volume flags are re-stamped from the
    /// survivors rather than trying to reference-count individual cells.
    pub fn remove(&mut self, member_id: usize) {
        self.members.remove(member_id);
        self.rebuild_centers_and_areas();
    }

    fn rebuild_centers_and_areas(&mut self) {
        for c in self.cells.iter_mut() { *c = CellState::EMPTY; }
        for m in &self.members {
            let flag = match m.kind { MemberKind::Atom => CellState::A_CENTER, MemberKind::Water => CellState::W_CENTER };
            if let Some(i) = self.indexer.flat_index(m.bin) { self.cells[i].insert(flag); }
        }
        let expanded_members: Vec<Member> = self.members.iter()
            .filter(|m| m.expanded)
            .map(|m| Member { bin: m.bin, kind: m.kind, expanded: false })
            .collect();
        for m in &expanded_members {
            self.expand_member(m.bin, m.kind);
        }
        for (m, orig) in self.members.iter_mut().zip(expanded_members.iter()) {
            if m.bin == orig.bin && m.kind == orig.kind { m.expanded = true; }
        }
    }

    fn expand_member(&mut self, bin: (i32, i32, i32), kind: MemberKind) {
        let stencils = stencils_for_width(self.indexer.width);
        let (volume_flag, area_flag) = match kind {
            MemberKind::Atom => (CellState::VOLUME, CellState::A_AREA),
            MemberKind::Water => (CellState::VOLUME, CellState::W_AREA),
        };
        for (shell_idx, shell) in stencils.iter().enumerate() {
            let flag = if shell_idx == 0 { volume_flag } else { area_flag };
            for &(dx, dy, dz) in shell {
                self.set_flag((bin.0 + dx, bin.1 + dy, bin.2 + dz), flag);
            }
        }
    }

    /// Expands every member that has not yet been expanded, stamping `VOLUME`
    /// from the innermost stencil and `A_AREA`/`W_AREA` from the outer three.
    pub fn expand_volume(&mut self) {
        let pending: Vec<(usize, (i32, i32, i32), MemberKind)> = self.members.iter().enumerate()
            .filter(|(_, m)| !m.expanded)
            .map(|(i, m)| (i, m.bin, m.kind))
            .collect();
        for (_, bin, kind) in &pending {
            self.expand_member(*bin, *kind);
        }
        for (i, _, _) in pending {
            self.members[i].expanded = true;
        }
    }

    /// Smallest axis-aligned bin-index box containing every atom centre.
    pub fn bounding_box_index(&self) -> ((i32, i32, i32), (i32, i32, i32)) {
        let atom_bins: Vec<(i32, i32, i32)> = self.members.iter()
            .filter(|m| m.kind == MemberKind::Atom)
            .map(|m| m.bin)
            .collect();
        let mut lo = (i32::MAX, i32::MAX, i32::MAX);
        let mut hi = (i32::MIN, i32::MIN, i32::MIN);
        for (x, y, z) in atom_bins {
            lo = (lo.0.min(x), lo.1.min(y), lo.2.min(z));
            hi = (hi.0.max(x), hi.1.max(y), hi.2.max(z));
        }
        if lo.0 > hi.0 { ((0, 0, 0), (0, 0, 0)) } else { (lo, hi) }
    }

    /// Volume in Å³ of the union of `VOLUME` cells.
    pub fn get_volume(&self) -> f64 {
        let n = self.cells.iter().filter(|c| is_volume(**c)).count();
        n as f64 * self.indexer.width.powi(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexer_round_trip() {
        let indexer = Indexer3D { origin: (0.0, 0.0, 0.0), width: 1.0, dims: (10, 10, 10) };
        let bin = indexer.to_bins((3.4, 1.1, 9.9));
        assert_eq!(bin, (3, 1, 9));
        assert!(indexer.in_bounds(bin));
    }

    #[test]
    fn test_grid_add_atom_stamps_center() {
        let mut grid = Grid::new(&[(0.0, 0.0, 0.0)], 1.0, 4, 2);
        grid.add_atom((0.0, 0.0, 0.0));
        let bin = grid.to_bins((0.0, 0.0, 0.0));
        assert!(grid.cell_at(bin).contains(CellState::A_CENTER));
    }

    #[test]
    fn test_expand_volume_marks_neighbours() {
        let mut grid = Grid::new(&[(0.0, 0.0, 0.0)], 1.0, 12, 4);
        grid.add_atom((0.0, 0.0, 0.0));
        grid.expand_volume();
        let centre_bin = grid.to_bins((0.0, 0.0, 0.0));
        assert!(is_volume(grid.cell_at(centre_bin)) || grid.cell_at(centre_bin).contains(CellState::A_CENTER));
        let touched = (0..grid.cells.len()).filter(|&i| grid.cells[i] != CellState::EMPTY).count();
        assert!(touched > 1);
    }

    #[test]
    fn test_stencils_are_symmetric_under_sign_flips() {
        let stencils = stencils_for_width(1.0);
        for shell in &stencils {
            for &(dx, dy, dz) in shell {
                assert!(shell.contains(&(-dx, -dy, -dz)), "missing reflection of ({dx},{dy},{dz})");
            }
        }
    }

    #[test]
    fn test_stencil_cache_reuses_entries_for_same_width() {
        let a = stencils_for_width(2.0);
        let b = stencils_for_width(2.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_removing_unexpanded_atom_only_clears_centre() {
        let mut grid = Grid::new(&[(0.0, 0.0, 0.0), (5.0, 0.0, 0.0)], 1.0, 14, 4);
        let id = grid.add_atom((0.0, 0.0, 0.0));
        grid.add_atom((5.0, 0.0, 0.0));
        grid.remove(id);
        let bin = grid.to_bins((0.0, 0.0, 0.0));
        assert!(!grid.cell_at(bin).contains(CellState::A_CENTER));
    }

    #[test]
    fn test_expand_volume_is_idempotent() {
        let mut grid = Grid::new(&[(0.0, 0.0, 0.0)], 1.0, 12, 4);
        grid.add_atom((0.0, 0.0, 0.0));
        grid.expand_volume();
        let once = grid.cells.clone();
        grid.expand_volume();
        assert_eq!(once, grid.cells);
    }

    #[test]
    fn test_adding_and_removing_a_body_restores_pre_add_state() {
        let mut grid = Grid::new(&[(0.0, 0.0, 0.0), (5.0, 0.0, 0.0)], 1.0, 14, 4);
        grid.add_atom((0.0, 0.0, 0.0));
        grid.expand_volume();
        let before = grid.cells.clone();

        let id = grid.add_atom((5.0, 0.0, 0.0));
        grid.expand_volume();
        grid.remove(id);

        assert_eq!(before, grid.cells);
    }
}
