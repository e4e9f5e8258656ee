//! Lag polynomial helpers
//!
//! A polynomial is stored as its coefficients in increasing lag order, so
//! `[1.0, -0.5]` is `1 - 0.5L`.

/// Product of two lag polynomials
pub fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut product = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            product[i + j] += x * y;
        }
    }
    product
}

/// `1 - c1 L - c2 L^2 - ...` with every lag scaled by `stride`
pub fn autoregressive(coefficients: &[f64], stride: usize) -> Vec<f64> {
    spread(coefficients, stride, -1.0)
}

/// `1 + c1 L + c2 L^2 + ...` with every lag scaled by `stride`
pub fn moving_average(coefficients: &[f64], stride: usize) -> Vec<f64> {
    spread(coefficients, stride, 1.0)
}

fn spread(coefficients: &[f64], stride: usize, sign: f64) -> Vec<f64> {
    let stride = stride.max(1);
    let mut poly = vec![0.0; coefficients.len() * stride + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * stride] = sign * c;
    }
    poly
}

/// Differencing operator `(1 - L)^d (1 - L^m)^D`
pub fn differencing(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = multiply(&poly, &[1.0, -1.0]);
    }
    if period > 0 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            poly = multiply(&poly, &seasonal);
        }
    }
    poly
}

/// Apply a lag polynomial to a series.
///
/// The output starts at the first index where every lag is available, so it
/// is `degree` elements shorter than the input.
pub fn apply(poly: &[f64], series: &[f64]) -> Vec<f64> {
    let degree = poly.len().saturating_sub(1);
    if series.len() <= degree {
        return Vec::new();
    }
    (degree..series.len())
        .map(|t| poly.iter().enumerate().map(|(k, c)| c * series[t - k]).sum())
        .collect()
}

/// Recover future levels from their transformed values.
///
/// `history` holds the untransformed series; each element of `transformed`
/// is the polynomial applied at the next position. The leading coefficient
/// must be 1.
pub fn integrate(poly: &[f64], history: &[f64], transformed: &[f64]) -> Vec<f64> {
    let mut levels = history.to_vec();
    let start = levels.len();
    for z in transformed {
        let t = levels.len();
        let carried: f64 = poly
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(k, _)| *k <= t)
            .map(|(k, c)| c * levels[t - k])
            .sum();
        levels.push(z - carried);
    }
    levels.split_off(start)
}

/// MA(infinity) weights `psi_0..psi_{n-1}` of `theta(L) / phi(L)`.
///
/// Both arguments are full lag polynomials with a leading 1.
pub fn psi_weights(ar: &[f64], ma: &[f64], n: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(n);
    for j in 0..n {
        let mut value = if j == 0 {
            1.0
        } else {
            ma.get(j).copied().unwrap_or(0.0)
        };
        for k in 1..ar.len().min(j + 1) {
            value -= ar[k] * psi[j - k];
        }
        psi.push(value);
    }
    psi
}
