use crate::parameters::Parameter;

/// The outer minimiser's verdict on one run: the best parameter vector found,
/// its objective value, and how many times the objective was actually evaluated
/// (spec.md §4.6 "the minimiser is expected to treat [+inf] as a rejected step").
#[derive(Clone, Debug, PartialEq)]
pub struct MinimizeOutcome {
    pub best: Vec<f64>,
    pub best_value: f64,
    pub n_evaluations: usize,
}

/// Outer minimiser strategies, encoded as a tagged enum per spec.md §9's "avoid
/// open-ended dynamic dispatch" guidance: every variant only needs "evaluate
/// f(p)", spec.md §4.6's whole minimiser contract.
///
/// `BFGS`/`dlib-global`/`minimum-explorer` of spec.md §4.6 are third-party
/// backends outside this crate's scope (spec.md §1: "general minimization
/// algorithms" is a Non-goal beyond what the fitter itself needs); the two
/// variants below are dependency-free and sufficient to drive the
/// fit-convergence scenario of spec.md §8.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Minimizer {
    /// Repeated per-dimension golden-section sweeps until an iteration fails to
    /// improve the objective by more than `tol`, or `max_sweeps` is reached.
    GoldenSection { tol: f64, max_sweeps: usize },
    /// Evaluates an `n_points`-per-dimension grid (full Cartesian product for
    /// one or two parameters; one coordinate-wise sweep for more) and returns
    /// the best sample.
    Scan { n_points: usize },
    /// As `Scan`, but stops early once `max_evals` evaluations have been spent,
    /// returning the best point seen so far.
    LimitedScan { n_points: usize, max_evals: usize },
    /// Coordinate descent with a shrinking step: tries `+step`/`-step` on each
    /// dimension in turn, halving the step whenever a full sweep finds no
    /// improvement, until `max_evals` evaluations are spent.
    BoundedDescent { max_evals: usize },
}

impl Minimizer {
    pub fn minimize(&self, f: impl FnMut(&[f64]) -> f64, initial: &[Parameter]) -> MinimizeOutcome {
        match *self {
            Minimizer::GoldenSection { tol, max_sweeps } => coordinate_golden_section(f, initial, tol, max_sweeps),
            Minimizer::Scan { n_points } => grid_scan(f, initial, n_points, usize::MAX),
            Minimizer::LimitedScan { n_points, max_evals } => grid_scan(f, initial, n_points, max_evals),
            Minimizer::BoundedDescent { max_evals } => bounded_descent(f, initial, max_evals),
        }
    }
}

const GOLDEN_RATIO_INV: f64 = 0.6180339887498949;

/// Golden-section search of a single scalar dimension, holding every other
/// coordinate of `point` fixed at `point[dim]`'s neighbours.
fn golden_section_1d(
    f: &mut impl FnMut(&[f64]) -> f64,
    point: &mut [f64],
    dim: usize,
    lower: f64,
    upper: f64,
    tol: f64,
    evals: &mut usize,
) -> f64 {
    let mut a = lower;
    let mut b = upper;
    let eval_at = |f: &mut dyn FnMut(&[f64]) -> f64, point: &mut [f64], dim: usize, x: f64, evals: &mut usize| {
        point[dim] = x;
        *evals += 1;
        f(point)
    };

    let mut c = b - (b - a) * GOLDEN_RATIO_INV;
    let mut d = a + (b - a) * GOLDEN_RATIO_INV;
    let mut fc = eval_at(f, point, dim, c, evals);
    let mut fd = eval_at(f, point, dim, d, evals);

    while (b - a).abs() > tol {
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - (b - a) * GOLDEN_RATIO_INV;
            fc = eval_at(f, point, dim, c, evals);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + (b - a) * GOLDEN_RATIO_INV;
            fd = eval_at(f, point, dim, d, evals);
        }
    }
    (a + b) / 2.0
}

fn coordinate_golden_section(
    mut f: impl FnMut(&[f64]) -> f64,
    initial: &[Parameter],
    tol: f64,
    max_sweeps: usize,
) -> MinimizeOutcome {
    let mut point: Vec<f64> = initial.iter().map(|p| p.value).collect();
    let mut evals = 0usize;
    let mut best_value = f(&point);
    evals += 1;

    for _ in 0..max_sweeps.max(1) {
        let before = best_value;
        for (dim, param) in initial.iter().enumerate() {
            if point.len() <= 1 && initial.len() == 1 { /* single-dim case handled uniformly below */ }
            let optimum = golden_section_1d(&mut f, &mut point, dim, param.lower, param.upper, tol, &mut evals);
            point[dim] = optimum;
        }
        best_value = f(&point);
        evals += 1;
        if (before - best_value).abs() < tol {
            break;
        }
    }

    MinimizeOutcome { best: point, best_value, n_evaluations: evals }
}

fn grid_scan(mut f: impl FnMut(&[f64]) -> f64, initial: &[Parameter], n_points: usize, max_evals: usize) -> MinimizeOutcome {
    let n_points = n_points.max(2);
    let ndim = initial.len();

    if ndim == 0 {
        let value = f(&[]);
        return MinimizeOutcome { best: vec![], best_value: value, n_evaluations: 1 };
    }

    if ndim <= 2 {
        let axes: Vec<Vec<f64>> = initial
            .iter()
            .map(|p| (0..n_points).map(|i| p.lower + (p.upper - p.lower) * i as f64 / (n_points - 1) as f64).collect())
            .collect();

        let mut best: Vec<f64> = initial.iter().map(|p| p.value).collect();
        let mut best_value = f64::INFINITY;
        let mut evals = 0usize;

        let mut indices = vec![0usize; ndim];
        'outer: loop {
            let candidate: Vec<f64> = indices.iter().enumerate().map(|(d, &i)| axes[d][i]).collect();
            let value = f(&candidate);
            evals += 1;
            if value < best_value {
                best_value = value;
                best = candidate;
            }
            if evals >= max_evals { break 'outer; }

            let mut d = ndim;
            loop {
                if d == 0 { break 'outer; }
                d -= 1;
                indices[d] += 1;
                if indices[d] < n_points { break; }
                indices[d] = 0;
                if d == 0 { break 'outer; }
            }
        }
        MinimizeOutcome { best, best_value, n_evaluations: evals }
    } else {
        coordinate_sweep_scan(f, initial, n_points, max_evals)
    }
}

/// Higher-dimensional fallback: one coordinate-wise sweep over an `n_points`
/// grid per dimension, each dimension scanned holding the current best of the
/// others fixed. Avoids the combinatorial blowup of a full Cartesian grid.
fn coordinate_sweep_scan(mut f: impl FnMut(&[f64]) -> f64, initial: &[Parameter], n_points: usize, max_evals: usize) -> MinimizeOutcome {
    let mut point: Vec<f64> = initial.iter().map(|p| p.value).collect();
    let mut evals = 0usize;
    let mut best_value = f(&point);
    evals += 1;

    for (dim, param) in initial.iter().enumerate() {
        if evals >= max_evals { break; }
        let mut dim_best = point[dim];
        for i in 0..n_points {
            if evals >= max_evals { break; }
            let x = param.lower + (param.upper - param.lower) * i as f64 / (n_points - 1).max(1) as f64;
            point[dim] = x;
            let value = f(&point);
            evals += 1;
            if value < best_value {
                best_value = value;
                dim_best = x;
            }
        }
        point[dim] = dim_best;
    }

    MinimizeOutcome { best: point, best_value, n_evaluations: evals }
}

fn bounded_descent(mut f: impl FnMut(&[f64]) -> f64, initial: &[Parameter], max_evals: usize) -> MinimizeOutcome {
    let mut point: Vec<f64> = initial.iter().map(|p| p.value).collect();
    let mut steps: Vec<f64> = initial.iter().map(|p| (p.upper - p.lower) * 0.1).collect();
    let mut evals = 0usize;
    let mut best_value = f(&point);
    evals += 1;

    while evals < max_evals && steps.iter().any(|&s| s > 1e-6) {
        let mut improved = false;
        for dim in 0..point.len() {
            if evals + 2 > max_evals { break; }
            for sign in [1.0, -1.0] {
                let candidate_value = point[dim] + sign * steps[dim];
                let clamped = initial[dim].clamp(candidate_value);
                let mut trial = point.clone();
                trial[dim] = clamped;
                let value = f(&trial);
                evals += 1;
                if value < best_value {
                    best_value = value;
                    point = trial;
                    improved = true;
                }
                if evals >= max_evals { break; }
            }
        }
        if !improved {
            for s in steps.iter_mut() { *s *= 0.5; }
        }
    }

    MinimizeOutcome { best: point, best_value, n_evaluations: evals }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(p: &[f64]) -> f64 {
        p.iter().map(|&x| (x - 2.0).powi(2)).sum()
    }

    #[test]
    fn test_golden_section_finds_quadratic_minimum() {
        let params = vec![Parameter::new("x", 0.0, -10.0, 10.0)];
        let outcome = Minimizer::GoldenSection { tol: 1e-6, max_sweeps: 50 }.minimize(quadratic, &params);
        assert!((outcome.best[0] - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_scan_two_dim_finds_quadratic_minimum() {
        let params = vec![Parameter::new("x", 0.0, -10.0, 10.0), Parameter::new("y", 0.0, -10.0, 10.0)];
        let outcome = Minimizer::Scan { n_points: 41 }.minimize(quadratic, &params);
        assert!((outcome.best[0] - 2.0).abs() < 0.6);
        assert!((outcome.best[1] - 2.0).abs() < 0.6);
    }

    #[test]
    fn test_limited_scan_respects_eval_budget() {
        let params = vec![Parameter::new("x", 0.0, -10.0, 10.0), Parameter::new("y", 0.0, -10.0, 10.0)];
        let outcome = Minimizer::LimitedScan { n_points: 41, max_evals: 20 }.minimize(quadratic, &params);
        assert!(outcome.n_evaluations <= 21);
    }

    #[test]
    fn test_bounded_descent_improves_from_initial() {
        let params = vec![Parameter::new("x", 0.0, -10.0, 10.0)];
        let start_value = quadratic(&[0.0]);
        let outcome = Minimizer::BoundedDescent { max_evals: 200 }.minimize(quadratic, &params);
        assert!(outcome.best_value <= start_value);
        assert!((outcome.best[0] - 2.0).abs() < 0.5);
    }

    #[test]
    fn test_zero_dimensional_scan_evaluates_once() {
        let outcome = Minimizer::Scan { n_points: 10 }.minimize(|_| 0.0, &[]);
        assert_eq!(outcome.n_evaluations, 1);
    }
}
