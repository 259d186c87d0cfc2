/// Closed-form weighted least-squares fit of `y = a*x + b`, plus chi^2
/// (spec.md §4.6 "Linear inner solve").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub slope_variance: f64,
    pub intercept_variance: f64,
    pub chi2: f64,
}

/// Solves the weighted normal equations for `y = a*x + b` in closed form, given
/// `x` (the model curve), `y` (the data) and `sigma` (per-point uncertainty), all
/// the same length and already aligned on a common q-grid.
///
/// `chi2 = sum(((y - a*x - b)/sigma)^2)`.
pub fn fit_linear(x: &[f64], y: &[f64], sigma: &[f64]) -> LinearFit {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(x.len(), sigma.len());

    let mut s = 0.0;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sxx = 0.0;
    let mut sxy = 0.0;

    for i in 0..x.len() {
        let w = 1.0 / (sigma[i] * sigma[i]);
        s += w;
        sx += w * x[i];
        sy += w * y[i];
        sxx += w * x[i] * x[i];
        sxy += w * x[i] * y[i];
    }

    let denom = s * sxx - sx * sx;
    let (a, b, var_a, var_b) = if denom.abs() < 1e-300 {
        (0.0, if s > 0.0 { sy / s } else { 0.0 }, f64::INFINITY, f64::INFINITY)
    } else {
        let a = (s * sxy - sx * sy) / denom;
        let b = (sxx * sy - sx * sxy) / denom;
        (a, b, s / denom, sxx / denom)
    };

    let chi2: f64 = (0..x.len())
        .map(|i| {
            let r = (y[i] - a * x[i] - b) / sigma[i];
            r * r
        })
        .sum();

    LinearFit { slope: a, intercept: b, slope_variance: var_a, intercept_variance: var_b, chi2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_linear_relationship_gives_zero_chi2() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|&xi| 2.0 * xi + 1.0).collect();
        let sigma = vec![1.0; 4];
        let fit = fit_linear(&x, &y, &sigma);
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!(fit.chi2.abs() < 1e-12);
    }

    #[test]
    fn test_noisy_data_increases_chi2() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y_exact: Vec<f64> = x.iter().map(|&xi| 2.0 * xi + 1.0).collect();
        let mut y_noisy = y_exact.clone();
        y_noisy[1] += 5.0;
        let sigma = vec![1.0; 4];
        let exact = fit_linear(&x, &y_exact, &sigma);
        let noisy = fit_linear(&x, &y_noisy, &sigma);
        assert!(noisy.chi2 > exact.chi2);
    }

    #[test]
    fn test_constant_x_falls_back_to_weighted_mean() {
        let x = vec![1.0, 1.0, 1.0];
        let y = vec![2.0, 4.0, 6.0];
        let sigma = vec![1.0; 3];
        let fit = fit_linear(&x, &y, &sigma);
        assert_eq!(fit.slope, 0.0);
        assert!((fit.intercept - 4.0).abs() < 1e-9);
    }
}
