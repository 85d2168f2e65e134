// Loudness MOV (part of component G): total loudness of the time-spread
// excitation pattern under the FFT-model thresholds.

use ndarray::Array1;

pub fn loudness(ehs: &Array1<f64>, fc: &[f64]) -> f64 {
    let c = 1.07664;
    let e = 0.23;
    let e0 = 1e4;
    let nc = fc.len();

    let mut sum = 0.0;
    for i in 0..nc {
        let et = 10f64.powf((3.64 * (fc[i] / 1000.0).powf(-0.8)) / 10.0);
        let s = 10f64.powf(
            (-2.0 - 2.05 * (fc[i] / 4000.0).atan() - 0.75 * (fc[i] / 1600.0).powi(2).atan()) / 10.0,
        );
        let ets = c * (et / (s * e0)).powf(e);
        let term = ets * ((1.0 - s + s * ehs[i] / et).powf(e) - 1.0);
        sum += term.max(0.0);
    }
    (24.0 / nc as f64) * sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::FC;

    #[test]
    fn silence_has_zero_loudness() {
        let ehs = Array1::from_elem(FC.len(), 1e-12);
        assert!(loudness(&ehs, &FC) >= 0.0);
    }

    #[test]
    fn louder_excitation_increases_loudness() {
        let low = Array1::from_elem(FC.len(), 1.0);
        let high = Array1::from_elem(FC.len(), 100.0);
        assert!(loudness(&high, &FC) > loudness(&low, &FC));
    }
}
