//! SIMD kernels shared by the indicators.
//!
//! These use the `wide` crate for portable SIMD over four f64 lanes;
//! the scalar tail handles lengths that are not a multiple of four.

use wide::f64x4;

#[inline]
fn lanes(data: &[f64], idx: usize) -> f64x4 {
    f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]])
}

/// Sum of a slice.
pub fn sum_simd(data: &[f64]) -> f64 {
    let chunks = data.len() / 4;
    let mut simd_sum = f64x4::splat(0.0);

    for i in 0..chunks {
        simd_sum += lanes(data, i * 4);
    }

    let mut result = simd_sum.reduce_add();
    for &value in &data[(chunks * 4)..] {
        result += value;
    }

    result
}

/// Split consecutive price changes into gains and losses.
///
/// Both outputs have `data.len() - 1` entries; losses are positive.
pub fn price_changes_simd(data: &[f64]) -> (Vec<f64>, Vec<f64>) {
    if data.len() < 2 {
        return (vec![], vec![]);
    }

    let n = data.len() - 1;
    let mut gains = Vec::with_capacity(n);
    let mut losses = Vec::with_capacity(n);
    let zero = f64x4::splat(0.0);
    let chunks = n / 4;

    for i in 0..chunks {
        let idx = i * 4;
        let diff = lanes(data, idx + 1) - lanes(data, idx);
        gains.extend(diff.max(zero).to_array());
        losses.extend((-diff).max(zero).to_array());
    }

    for i in (chunks * 4)..n {
        let change = data[i + 1] - data[i];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    (gains, losses)
}

/// Rolling population standard deviation.
pub fn std_dev_simd(data: &[f64], period: usize) -> Vec<f64> {
    if data.len() < period || period < 2 {
        return vec![];
    }

    let period_f64 = period as f64;
    data.windows(period)
        .map(|window| {
            let mean = sum_simd(window) / period_f64;
            (sum_sq_dev(window, mean) / period_f64).sqrt()
        })
        .collect()
}

/// Mean absolute deviation of a window around a known mean.
pub fn mean_abs_dev_simd(window: &[f64], mean: f64) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let chunks = window.len() / 4;
    let mean_vec = f64x4::splat(mean);
    let mut acc = f64x4::splat(0.0);

    for i in 0..chunks {
        acc += (lanes(window, i * 4) - mean_vec).abs();
    }

    let mut total = acc.reduce_add();
    for &value in &window[(chunks * 4)..] {
        total += (value - mean).abs();
    }

    total / window.len() as f64
}

/// Minimum and maximum of a slice.
pub fn minmax_simd(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }

    let chunks = data.len() / 4;
    let mut min_vec = f64x4::splat(f64::INFINITY);
    let mut max_vec = f64x4::splat(f64::NEG_INFINITY);

    for i in 0..chunks {
        let values = lanes(data, i * 4);
        min_vec = min_vec.min(values);
        max_vec = max_vec.max(values);
    }

    let min_arr = min_vec.to_array();
    let max_arr = max_vec.to_array();

    let mut min = min_arr[0].min(min_arr[1]).min(min_arr[2]).min(min_arr[3]);
    let mut max = max_arr[0].max(max_arr[1]).max(max_arr[2]).max(max_arr[3]);

    for &value in &data[(chunks * 4)..] {
        min = min.min(value);
        max = max.max(value);
    }

    Some((min, max))
}

fn sum_sq_dev(window: &[f64], mean: f64) -> f64 {
    let chunks = window.len() / 4;
    let mean_vec = f64x4::splat(mean);
    let mut acc = f64x4::splat(0.0);

    for i in 0..chunks {
        let diff = lanes(window, i * 4) - mean_vec;
        acc += diff * diff;
    }

    let mut total = acc.reduce_add();
    for &value in &window[(chunks * 4)..] {
        let diff = value - mean;
        total += diff * diff;
    }

    total
}
