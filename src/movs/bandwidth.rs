// Bandwidth MOV (component G): detects where the test signal's spectral
// energy falls below a noise floor relative to the reference, from the
// pre-ear-weighting squared-magnitude spectra.

use ndarray::Array1;

pub fn bandwidth(x2_ref: &Array1<f64>, x2_test: &Array1<f64>, fs: f64, nf: usize) -> (f64, f64) {
    let half = nf / 2;
    let kx = ((nf as f64 * 21586.0 / fs).round()) as usize;
    let kl = ((nf as f64 * 8109.0 / fs).round()) as usize;
    let fr = 10f64.powf(1.0);
    let ft = 10f64.powf(0.5);

    let xth = x2_test
        .iter()
        .take(half)
        .skip(kx)
        .cloned()
        .fold(f64::MIN, f64::max);

    let xth_r = fr * xth;
    let mut bw_ref_k = 0usize;
    for k in (kl + 1)..kx {
        if x2_ref[k] >= xth_r {
            bw_ref_k = k;
        }
    }
    let bw_ref = bw_ref_k as f64 + 1.0;

    let xth_t = ft * xth;
    let mut bw_test_k = 0usize;
    for k in 0..bw_ref_k {
        if x2_test[k] >= xth_t {
            bw_test_k = k;
        }
    }
    let bw_test = bw_test_k as f64 + 1.0;

    (bw_ref, bw_test)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_gives_minimal_bandwidth() {
        let nf = 2048;
        let x2 = Array1::zeros(nf / 2 + 1);
        let (bw_ref, bw_test) = bandwidth(&x2, &x2, 48000.0, nf);
        assert_eq!(bw_ref, 1.0);
        assert_eq!(bw_test, 1.0);
    }

    #[test]
    fn full_band_energy_gives_wide_bandwidth() {
        let nf = 2048;
        // Strong energy through the signal band, near-silent noise floor
        // past kx, so both thresholds are exceeded well inside the band.
        let mut x2 = Array1::from_elem(nf / 2 + 1, 1.0);
        for v in x2.iter_mut().skip(900) {
            *v = 1e-9;
        }
        let (bw_ref, bw_test) = bandwidth(&x2, &x2, 48000.0, nf);
        assert!(bw_ref > 1.0);
        assert!(bw_test > 1.0);
    }
}
