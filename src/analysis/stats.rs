use statrs::distribution::{ContinuousCDF, StudentsT};

/// Summary of one numeric column, shaped like the original report:
/// count, mean, sample standard deviation, min, quartiles, max.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// `None` for fewer than two samples, where the ddof-1 estimate is
    /// undefined.
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Independent two-sample t-test result.
#[derive(Debug, Clone, PartialEq)]
pub struct TTest {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: f64,
}

/// Ordinary least-squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Descriptive statistics over `values`, or `None` when empty.
pub fn describe(values: &[f64]) -> Option<Describe> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let m = mean(values);
    let std = sample_std(values, m);

    Some(Describe {
        count: values.len(),
        mean: m,
        std,
        min: sorted[0],
        q1: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.50),
        q3: percentile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// ddof-1 standard deviation; `None` for fewer than two samples.
fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Linear-interpolation percentile over a sorted slice, `q` in [0, 1].
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Pooled-variance two-sample t-test with a two-sided p-value.
///
/// Returns `None` when a meaningful statistic cannot be formed: an empty
/// group, fewer than three samples overall, or zero pooled variance.
pub fn pooled_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    let (n1, n2) = (a.len(), b.len());
    if n1 == 0 || n2 == 0 || n1 + n2 <= 2 {
        return None;
    }

    let (m1, m2) = (mean(a), mean(b));
    let ss1: f64 = a.iter().map(|v| (v - m1).powi(2)).sum();
    let ss2: f64 = b.iter().map(|v| (v - m2).powi(2)).sum();
    let dof = (n1 + n2 - 2) as f64;
    let pooled_var = (ss1 + ss2) / dof;
    if pooled_var <= 0.0 {
        return None;
    }

    let statistic = (m1 - m2) / (pooled_var * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, dof).ok()?;
    let p_value = 2.0 * dist.cdf(-statistic.abs());

    Some(TTest {
        statistic,
        p_value,
        dof,
    })
}

/// Pearson correlation coefficient, `None` when undefined (fewer than two
/// pairs, or zero variance in either series).
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let (mx, my) = (mean(x), mean(y));
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        cov += (xi - mx) * (yi - my);
        var_x += (xi - mx).powi(2);
        var_y += (yi - my).powi(2);
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(cov / denom)
}

/// Least-squares regression over (x, y) pairs. `None` with fewer than two
/// pairs or zero variance in x.
pub fn linear_regression(pairs: &[(f64, f64)]) -> Option<LinearFit> {
    if pairs.len() < 2 {
        return None;
    }
    let xs: Vec<f64> = pairs.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = pairs.iter().map(|&(_, y)| y).collect();
    let (mx, my) = (mean(&xs), mean(&ys));

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for &(x, y) in pairs {
        cov += (x - mx) * (y - my);
        var_x += (x - mx).powi(2);
    }
    if var_x == 0.0 {
        return None;
    }

    let slope = cov / var_x;
    Some(LinearFit {
        slope,
        intercept: my - slope * mx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn describe_matches_hand_computed_summary() {
        let d = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(d.count, 5);
        assert!(close(d.mean, 3.0, 1e-12));
        assert!(close(d.std.unwrap(), 2.5f64.sqrt(), 1e-12));
        assert_eq!(d.min, 1.0);
        assert_eq!(d.q1, 2.0);
        assert_eq!(d.median, 3.0);
        assert_eq!(d.q3, 4.0);
        assert_eq!(d.max, 5.0);
    }

    #[test]
    fn percentiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(close(percentile(&sorted, 0.25), 1.75, 1e-12));
        assert!(close(percentile(&sorted, 0.50), 2.5, 1e-12));
        assert!(close(percentile(&sorted, 0.75), 3.25, 1e-12));
    }

    #[test]
    fn describe_of_single_value_has_no_std() {
        let d = describe(&[7.5]).unwrap();
        assert_eq!(d.count, 1);
        assert_eq!(d.std, None);
        assert_eq!(d.min, 7.5);
        assert_eq!(d.max, 7.5);
        assert_eq!(d.median, 7.5);
    }

    #[test]
    fn describe_of_empty_input_is_none() {
        assert!(describe(&[]).is_none());
    }

    #[test]
    fn t_test_matches_reference_values() {
        // pooled t for these groups: t = -sqrt(1.5), df = 4, p ~ 0.287864
        let result = pooled_t_test(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap();
        assert!(close(result.statistic, -1.5f64.sqrt(), 1e-9));
        assert_eq!(result.dof, 4.0);
        assert!(close(result.p_value, 0.287864, 1e-5));
    }

    #[test]
    fn t_test_is_symmetric_in_sign() {
        let ab = pooled_t_test(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap();
        let ba = pooled_t_test(&[2.0, 3.0, 4.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(close(ab.statistic, -ba.statistic, 1e-12));
        assert!(close(ab.p_value, ba.p_value, 1e-12));
    }

    #[test]
    fn t_test_rejects_degenerate_groups() {
        assert!(pooled_t_test(&[], &[1.0, 2.0]).is_none());
        assert!(pooled_t_test(&[1.0], &[2.0]).is_none());
        // identical constant groups: zero pooled variance
        assert!(pooled_t_test(&[3.0, 3.0], &[3.0, 3.0]).is_none());
    }

    #[test]
    fn pearson_detects_exact_linear_relationships() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y_up: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let y_down: Vec<f64> = x.iter().map(|v| -0.5 * v + 3.0).collect();
        assert!(close(pearson(&x, &y_up).unwrap(), 1.0, 1e-12));
        assert!(close(pearson(&x, &y_down).unwrap(), -1.0, 1e-12));
    }

    #[test]
    fn pearson_is_undefined_for_constant_series() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(pearson(&[1.0], &[2.0]).is_none());
    }

    #[test]
    fn regression_recovers_exact_line() {
        let pairs: Vec<(f64, f64)> = [0.0, 1.0, 2.0, 10.0]
            .iter()
            .map(|&x| (x, 0.5 * x + 2.0))
            .collect();
        let fit = linear_regression(&pairs).unwrap();
        assert!(close(fit.slope, 0.5, 1e-12));
        assert!(close(fit.intercept, 2.0, 1e-12));
        assert!(close(fit.predict(4.0), 4.0, 1e-12));
    }

    #[test]
    fn regression_needs_two_pairs_and_x_variance() {
        assert!(linear_regression(&[(1.0, 2.0)]).is_none());
        assert!(linear_regression(&[]).is_none());
        assert!(linear_regression(&[(2.0, 1.0), (2.0, 5.0)]).is_none());
    }
}
