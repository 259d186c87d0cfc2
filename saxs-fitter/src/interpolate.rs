/// Natural cubic spline through `(xs[i], ys[i])`, evaluated at each of
/// `targets` (spec.md §4.6: "splice onto the dataset's q-grid by piecewise-cubic
/// interpolation"). `xs` must be sorted ascending and have at least two points;
/// a `target` outside `[xs[0], xs[last]]` is clamped to the nearest endpoint
/// rather than extrapolated, since a model curve's q-axis is expected to cover
/// the measured one.
pub fn cubic_spline_interpolate(xs: &[f64], ys: &[f64], targets: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n < 2 {
        let v = ys.first().copied().unwrap_or(0.0);
        return vec![v; targets.len()];
    }

    let second_derivatives = natural_spline_second_derivatives(xs, ys);

    targets
        .iter()
        .map(|&x| {
            let clamped = x.clamp(xs[0], xs[n - 1]);
            let i = segment_index(xs, clamped);
            evaluate_segment(xs, ys, &second_derivatives, i, clamped)
        })
        .collect()
}

fn segment_index(xs: &[f64], x: f64) -> usize {
    let n = xs.len();
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap()) {
        Ok(i) => i.min(n - 2),
        Err(0) => 0,
        Err(i) if i >= n => n - 2,
        Err(i) => i - 1,
    }
}

/// Tridiagonal solve for the natural-boundary (second derivative = 0 at both
/// ends) cubic spline coefficients, via the standard Thomas-algorithm sweep.
fn natural_spline_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2 = vec![0.0; n];
    let mut u = vec![0.0; n];

    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = (sig - 1.0) / p;
        let d = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]) - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * d / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    for i in (0..n - 1).rev() {
        y2[i] = y2[i] * y2[i + 1] + u[i];
    }
    y2
}

fn evaluate_segment(xs: &[f64], ys: &[f64], y2: &[f64], i: usize, x: f64) -> f64 {
    let h = xs[i + 1] - xs[i];
    let a = (xs[i + 1] - x) / h;
    let b = (x - xs[i]) / h;
    a * ys[i] + b * ys[i + 1] + ((a * a * a - a) * y2[i] + (b * b * b - b) * y2[i + 1]) * (h * h) / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spline_reproduces_linear_data_exactly() {
        let xs = vec![0.0, 1.0, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|&x| 2.0 * x + 1.0).collect();
        let targets = vec![0.5, 1.5, 2.5];
        let interpolated = cubic_spline_interpolate(&xs, &ys, &targets);
        for (&t, &v) in targets.iter().zip(interpolated.iter()) {
            assert!((v - (2.0 * t + 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spline_passes_through_control_points() {
        let xs = vec![0.0, 1.0, 2.0, 3.0];
        let ys = vec![0.0, 1.0, 0.5, 2.0];
        let interpolated = cubic_spline_interpolate(&xs, &ys, &xs);
        for (&target, &control) in interpolated.iter().zip(ys.iter()) {
            assert!((target - control).abs() < 1e-9);
        }
    }

    #[test]
    fn test_out_of_range_target_clamps_to_endpoint() {
        let xs = vec![0.0, 1.0, 2.0];
        let ys = vec![1.0, 2.0, 3.0];
        let interpolated = cubic_spline_interpolate(&xs, &ys, &[-5.0, 10.0]);
        assert!((interpolated[0] - 1.0).abs() < 1e-9);
        assert!((interpolated[1] - 3.0).abs() < 1e-9);
    }
}
