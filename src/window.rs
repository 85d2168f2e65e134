// Spectral front end: scaled Hann window, calibrated so a full-scale
// sinusoid at the calibration frequency produces the calibration SPL.

use ndarray::Array1;

/// Peak factor for a sinusoid whose frequency falls between DFT bins.
fn gp(fc_n: f64, nf: usize, w: f64) -> f64 {
    let df = 1.0 / nf as f64;
    let k = (fc_n / df).floor();
    let df_n = ((k + 1.0) * df - fc_n).min(fc_n - k * df);
    let df_w = df_n * w;
    (std::f64::consts::PI * df_w).sin() / (std::f64::consts::PI * df_w * (1.0 - df_w * df_w))
}

/// Window gain `GL` per the calibration tone.
pub fn window_gain(nf: usize, amax: f64, fc_n: f64, lp_db: f64) -> f64 {
    let w = (nf - 1) as f64;
    let peak = gp(fc_n, nf, w);
    10f64.powf(lp_db / 20.0) / (peak * amax / 4.0 * w)
}

fn hann(nf: usize) -> Array1<f64> {
    Array1::from_iter(
        (0..nf).map(|n| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * n as f64 / (nf - 1) as f64).cos())),
    )
}

/// Precomputed scaled Hann window applied to each frame before the DFT.
pub fn scaled_hann(nf: usize, amax: f64, fs: f64, calibration_freq_hz: f64, calibration_spl_db: f64) -> Array1<f64> {
    let fc_n = calibration_freq_hz / fs;
    let gl = window_gain(nf, amax, fc_n, calibration_spl_db);
    hann(nf) * gl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_has_expected_length_and_zero_edges() {
        let hw = scaled_hann(2048, 1.0, 48000.0, 1019.5, 92.0);
        assert_eq!(hw.len(), 2048);
        assert!(hw[0].abs() < 1e-9);
    }

    #[test]
    fn window_gain_is_positive_and_finite() {
        let gl = window_gain(2048, 1.0, 1019.5 / 48000.0, 92.0);
        assert!(gl.is_finite());
        assert!(gl > 0.0);
    }
}
