// Modulation-pattern extraction (component F): envelope slope and
// average envelope per band, tracked across frames.

use crate::tconst::t_const;
use ndarray::Array1;

const TAU_100: f64 = 0.050;
const TAU_MIN: f64 = 0.008;
const MOD_EXP: f64 = 0.3;

pub struct ModulationTracker {
    alpha: Array1<f64>,
    beta: Array1<f64>,
    fss: f64,
    de: [Array1<f64>; 2],
    ese: [Array1<f64>; 2],
    eavg: [Array1<f64>; 2],
}

impl ModulationTracker {
    pub fn new(fc: &[f64], fss: f64) -> Self {
        let (alpha, beta) = t_const(TAU_100, TAU_MIN, fc, fss);
        let nc = fc.len();
        Self {
            alpha,
            beta,
            fss,
            de: [Array1::zeros(nc), Array1::zeros(nc)],
            ese: [Array1::zeros(nc), Array1::zeros(nc)],
            eavg: [Array1::zeros(nc), Array1::zeros(nc)],
        }
    }

    pub fn reset(&mut self) {
        for c in 0..2 {
            self.de[c].fill(0.0);
            self.ese[c].fill(0.0);
            self.eavg[c].fill(0.0);
        }
    }

    /// `es` holds the frequency-spread excitation for [ref, test]. Returns
    /// `(M[ref], M[test])` and the reference-channel envelope average.
    pub fn process(&mut self, es: &[Array1<f64>; 2]) -> ([Array1<f64>; 2], Array1<f64>) {
        let nc = es[0].len();
        let mut m = [Array1::zeros(nc), Array1::zeros(nc)];
        for c in 0..2 {
            for i in 0..nc {
                let ee = es[c][i].powf(MOD_EXP);
                self.de[c][i] = self.alpha[i] * self.de[c][i]
                    + self.beta[i] * self.fss * (ee - self.ese[c][i]).abs();
                self.eavg[c][i] = self.alpha[i] * self.eavg[c][i] + self.beta[i] * ee;
                self.ese[c][i] = ee;
                m[c][i] = self.de[c][i] / (1.0 + self.eavg[c][i] / MOD_EXP);
            }
        }
        (m, self.eavg[0].clone())
    }
}
