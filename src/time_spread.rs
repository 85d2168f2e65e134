// Time spreading: a first-order IIR per band applied to the frequency-
// spread excitation pattern (component D, time step). Stateful across
// frames; one instance per channel (reference and test keep separate
// `Ef` state).

use crate::tconst::t_const;
use ndarray::Array1;

const TAU_100: f64 = 0.030;
const TAU_MIN: f64 = 0.008;

pub struct TimeSpreader {
    alpha: Array1<f64>,
    ef: Array1<f64>,
}

impl TimeSpreader {
    pub fn new(fc: &[f64], fss: f64) -> Self {
        let (alpha, _beta) = t_const(TAU_100, TAU_MIN, fc, fss);
        Self {
            ef: Array1::zeros(fc.len()),
            alpha,
        }
    }

    pub fn reset(&mut self) {
        self.ef.fill(0.0);
    }

    pub fn process(&mut self, es: &Array1<f64>) -> Array1<f64> {
        let mut ehs = Array1::zeros(es.len());
        for i in 0..es.len() {
            self.ef[i] = self.alpha[i] * self.ef[i] + (1.0 - self.alpha[i]) * es[i];
            ehs[i] = self.ef[i].max(es[i]);
        }
        ehs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::FC;

    #[test]
    fn constant_input_converges_to_itself() {
        let mut ts = TimeSpreader::new(&FC, 48000.0 / 1024.0);
        let es = Array1::from_elem(FC.len(), 2.0);
        let mut last = ts.process(&es);
        for _ in 0..500 {
            last = ts.process(&es);
        }
        for v in last.iter() {
            assert!((v - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn reset_clears_state() {
        let mut ts = TimeSpreader::new(&FC, 48000.0 / 1024.0);
        let es = Array1::from_elem(FC.len(), 5.0);
        ts.process(&es);
        ts.reset();
        assert!(ts.ef.iter().all(|&v| v == 0.0));
    }
}
