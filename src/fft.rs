// Real-valued forward DFT, wrapping `realfft` the way the teacher wraps
// `rustfft` in frequency_analysis.rs, but kept real-input/real-output
// squared-magnitude only: this model never needs the inverse transform.

use ndarray::Array1;
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

pub struct RealSpectrum {
    len: usize,
    fft: Arc<dyn RealToComplex<f64>>,
    input: Vec<f64>,
    output: Vec<Complex64>,
}

impl RealSpectrum {
    pub fn new(len: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(len);
        let input = fft.make_input_vec();
        let output = fft.make_output_vec();
        Self { len, fft, input, output }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Squared magnitude spectrum, length `len/2 + 1`. `X2[0] = Re[0]^2`,
    /// `X2[len/2] = Re[len/2]^2` (imaginary parts at DC/Nyquist are zero
    /// for a real input, so `norm_sqr` alone reproduces the reference's
    /// hand-split real/imaginary bookkeeping).
    pub fn squared_magnitude(&mut self, signal: &[f64]) -> Array1<f64> {
        self.input.copy_from_slice(signal);
        self.fft
            .process(&mut self.input, &mut self.output)
            .expect("realfft: mismatched buffer sizes");
        Array1::from_iter(self.output.iter().map(|c| c.norm_sqr()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parseval_relation_holds() {
        let n = 64;
        let mut rs = RealSpectrum::new(n);
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 5.0 * i as f64 / n as f64).sin())
            .collect();
        let x2 = rs.squared_magnitude(&signal);

        let time_energy: f64 = signal.iter().map(|x| x * x).sum::<f64>() * n as f64;
        let mut freq_energy = x2[0] + x2[n / 2];
        for k in 1..n / 2 {
            freq_energy += 2.0 * x2[k];
        }
        assert!((time_energy - freq_energy).abs() / time_energy < 1e-6);
    }
}
