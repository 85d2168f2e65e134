// Noise loudness MOV (component G): loudness of the distortion component
// estimated from the adapted excitation patterns and modulation.

use ndarray::Array1;

pub fn noise_loudness(m_ref: &Array1<f64>, m_test: &Array1<f64>, ep_ref: &Array1<f64>, ep_test: &Array1<f64>, ein: &Array1<f64>) -> f64 {
    let alpha = 1.5;
    let tf0 = 0.15;
    let s0 = 0.5;
    let e = 0.23;
    let nc = m_ref.len();

    let mut sum = 0.0;
    for i in 0..nc {
        let sref = tf0 * m_ref[i] + s0;
        let stest = tf0 * m_test[i] + s0;
        let beta = (-alpha * (ep_test[i] - ep_ref[i]) / ep_ref[i]).exp();
        let a = (stest * ep_test[i] - sref * ep_ref[i]).max(0.0);
        let b = ein[i] + sref * ep_ref[i] * beta;
        sum += (ein[i] / stest).powf(e) * ((1.0 + a / b).powf(e) - 1.0);
    }

    let nl = (24.0 / nc as f64) * sum;
    if nl < 0.0 {
        0.0
    } else {
        nl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_patterns_give_zero_noise_loudness() {
        let nc = 109;
        let m = Array1::from_elem(nc, 0.2);
        let ep = Array1::from_elem(nc, 5.0);
        let ein = Array1::from_elem(nc, 1e-2);
        let nl = noise_loudness(&m, &m, &ep, &ep, &ein);
        assert!(nl.abs() < 1e-9);
    }
}
