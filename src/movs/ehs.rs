// Error-Harmonic Structure MOV (component G): detects periodic structure
// in the log-spectrum difference between reference and test, which shows
// up for codecs with harmonic distortion or block-based artifacts.

use crate::fft::RealSpectrum;
use ndarray::Array1;

const FMAX: f64 = 9000.0;
const ENERGY_THRESHOLD: f64 = 8000.0;

fn pq_log2(x: f64) -> i32 {
    let mut res = 0i32;
    let mut m = 1.0f64;
    while m < x {
        res += 1;
        m *= 2.0;
    }
    res - 1
}

/// Length of the autocorrelation/FFT window used by EHS, derived once
/// per `(fs, nf)` pair.
pub fn ehs_window_len(fs: f64, nf: usize) -> usize {
    let exponent = pq_log2(nf as f64 * FMAX / fs);
    2usize.pow(exponent as u32)
}

fn hann_scaled(m: usize) -> Array1<f64> {
    let scale = (1.0 / m as f64) * (8.0f64 / 3.0).sqrt();
    Array1::from_iter((0..m).map(|n| {
        let w = 0.5 * (1.0 - (2.0 * std::f64::consts::PI * n as f64 / (m - 1) as f64).cos());
        scale * w
    }))
}

pub struct EhsComputer {
    nl: usize,
    hw: Array1<f64>,
    spectrum: RealSpectrum,
    kabal_correct_peak: bool,
}

impl EhsComputer {
    pub fn new(fs: f64, nf: usize, kabal_correct_peak: bool) -> Self {
        let nl = ehs_window_len(fs, nf);
        Self {
            nl,
            hw: hann_scaled(nl),
            spectrum: RealSpectrum::new(nl),
            kabal_correct_peak,
        }
    }

    /// Returns the per-frame EHS value, or `-1.0` if the frame's trailing
    /// half carries too little energy to be meaningful.
    pub fn process(&mut self, x_r: &[f64], x_t: &[f64], nadv: usize, x2_r: &Array1<f64>, x2_t: &Array1<f64>) -> f64 {
        let nf = x_r.len();
        let en_ref: f64 = x_r[nadv..nf].iter().map(|v| v * v).sum();
        let en_test: f64 = x_t[nadv..nf].iter().map(|v| v * v).sum();
        if en_ref < ENERGY_THRESHOLD && en_test < ENERGY_THRESHOLD {
            return -1.0;
        }

        let half = nf / 2;
        let d: Array1<f64> = Array1::from_iter(
            (0..=half).map(|k| (x2_t[k] / x2_r[k]).ln()),
        );

        let nl = self.nl;
        let m = nl;
        let mut c = Array1::<f64>::zeros(nl);
        for i in 0..nl {
            let mut s = 0.0;
            for j in 0..m {
                s += d[j] * d[i + j];
            }
            c[i] = s;
        }

        let mut cn = Array1::<f64>::zeros(nl);
        cn[0] = 1.0;
        let s0 = c[0];
        let mut sj = s0;
        for i in 1..nl {
            sj += d[i + m - 1].powi(2) - d[i - 1].powi(2);
            let dd = s0 * sj;
            cn[i] = if dd <= 0.0 { 1.0 } else { c[i] / dd.sqrt() };
        }

        let cnm = cn.sum() / nl as f64;
        let cw: Array1<f64> = (0..nl).map(|n| self.hw[n] * (cn[n] - cnm)).collect();

        let c2 = self.spectrum.squared_magnitude(cw.as_slice().unwrap());
        find_peak(c2.as_slice().unwrap(), nl / 2 + 1, self.kabal_correct_peak)
    }
}

fn find_peak(c2: &[f64], n: usize, kabal_correct: bool) -> f64 {
    let mut cmax = 0.0f64;
    let mut cprev = c2[0];
    for c in c2.iter().take(n).skip(1) {
        if *c > cprev && *c > cmax {
            cmax = *c;
        }
        if kabal_correct {
            cprev = *c;
        }
    }
    cmax
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_length_matches_expected_value_at_48k() {
        assert_eq!(ehs_window_len(48000.0, 2048), 256);
    }

    #[test]
    fn silent_trailing_half_is_rejected() {
        let mut ehs = EhsComputer::new(48000.0, 2048, true);
        let x = vec![0.0f64; 2048];
        let x2 = Array1::from_elem(1025, 1.0);
        let v = ehs.process(&x, &x, 1024, &x2, &x2);
        assert_eq!(v, -1.0);
    }

    #[test]
    fn identical_spectra_give_zero_ehs() {
        let mut ehs = EhsComputer::new(48000.0, 2048, true);
        let mut x = vec![0.0f64; 2048];
        for (n, v) in x.iter_mut().enumerate() {
            *v = (2.0 * std::f64::consts::PI * 500.0 * n as f64 / 48000.0).sin();
        }
        let x2 = Array1::from_elem(1025, 1.0);
        let v = ehs.process(&x, &x, 1024, &x2, &x2);
        assert!((v - 0.0).abs() < 1e-6);
    }
}
