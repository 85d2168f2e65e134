// Shared first-order IIR smoothing coefficients, used by time spreading,
// level/pattern adaptation, and modulation-pattern tracking alike -- each
// just plugs in a different tau_100.

use ndarray::Array1;

/// Per-band smoothing coefficient `alpha` (and its complement `beta`) for
/// a time constant that decreases from `tau_100` at 100 Hz towards
/// `tau_min` at high frequencies.
pub fn t_const(tau_100: f64, tau_min: f64, fc: &[f64], fss: f64) -> (Array1<f64>, Array1<f64>) {
    let alpha = Array1::from_iter(fc.iter().map(|&f| {
        let tau = tau_min + (100.0 / f) * (tau_100 - tau_min);
        (-1.0 / (fss * tau)).exp()
    }));
    let beta = alpha.mapv(|a| 1.0 - a);
    (alpha, beta)
}
