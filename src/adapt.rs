// Level and pattern adaptation (component E). Persistent state `P, Rn,
// Rd, PC` lives on this struct, owned exclusively by one analyzer
// instance, reset at the start of each new (ref, test) pair.

use crate::tconst::t_const;
use ndarray::Array1;

const TAU_100: f64 = 0.050;
const TAU_MIN: f64 = 0.008;
const M1: isize = 3;
const M2: isize = 4;

pub struct Adapter {
    alpha: Array1<f64>,
    beta: Array1<f64>,
    p: [Array1<f64>; 2],
    rn: Array1<f64>,
    rd: Array1<f64>,
    pc: [Array1<f64>; 2],
    nc: usize,
}

impl Adapter {
    pub fn new(fc: &[f64], fss: f64) -> Self {
        let (alpha, beta) = t_const(TAU_100, TAU_MIN, fc, fss);
        let nc = fc.len();
        Self {
            alpha,
            beta,
            p: [Array1::zeros(nc), Array1::zeros(nc)],
            rn: Array1::zeros(nc),
            rd: Array1::zeros(nc),
            pc: [Array1::zeros(nc), Array1::zeros(nc)],
            nc,
        }
    }

    pub fn reset(&mut self) {
        self.p[0].fill(0.0);
        self.p[1].fill(0.0);
        self.rn.fill(0.0);
        self.rd.fill(0.0);
        self.pc[0].fill(0.0);
        self.pc[1].fill(0.0);
    }

    /// Advance adaptation state by one frame and return the adapted
    /// excitation patterns `EP[ref], EP[test]`.
    pub fn process(&mut self, ehs_r: &Array1<f64>, ehs_t: &Array1<f64>) -> [Array1<f64>; 2] {
        let nc = self.nc;
        for i in 0..nc {
            self.p[0][i] = self.alpha[i] * self.p[0][i] + self.beta[i] * ehs_r[i];
            self.p[1][i] = self.alpha[i] * self.p[1][i] + self.beta[i] * ehs_t[i];
        }

        let sn: f64 = (0..nc).map(|i| (self.p[0][i] * self.p[1][i]).sqrt()).sum();
        let sd: f64 = self.p[1].sum();
        let cl = (sn / sd).powi(2);

        let mut ep = [Array1::zeros(nc), Array1::zeros(nc)];
        for i in 0..nc {
            if cl > 1.0 {
                ep[0][i] = ehs_r[i] / cl;
                ep[1][i] = ehs_t[i];
            } else {
                ep[0][i] = ehs_r[i];
                ep[1][i] = ehs_t[i] * cl;
            }
        }

        for i in 0..nc {
            self.rn[i] = self.alpha[i] * self.rn[i] + ep[1][i] * ep[0][i];
            self.rd[i] = self.alpha[i] * self.rd[i] + ep[0][i] * ep[0][i];
        }

        let mut r = [Array1::zeros(nc), Array1::zeros(nc)];
        for i in 0..nc {
            if self.rn[i] >= self.rd[i] {
                r[0][i] = 1.0;
                r[1][i] = self.rd[i] / self.rn[i];
            } else {
                r[0][i] = self.rn[i] / self.rd[i];
                r[1][i] = 1.0;
            }
        }

        for m in 0..nc {
            let il = (m as isize - M1).max(0) as usize;
            let iu = ((m as isize + M2).max(0) as usize).min(nc - 1);
            let count = (iu - il + 1) as f64;
            let s0: f64 = (il..=iu).map(|k| r[0][k]).sum();
            let s1: f64 = (il..=iu).map(|k| r[1][k]).sum();
            self.pc[0][m] = self.alpha[m] * self.pc[0][m] + self.beta[m] * s0 / count;
            self.pc[1][m] = self.alpha[m] * self.pc[1][m] + self.beta[m] * s1 / count;
            ep[0][m] *= self.pc[0][m];
            ep[1][m] *= self.pc[1][m];
        }

        ep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::FC;

    #[test]
    fn identical_inputs_keep_level_correlation_at_one() {
        let mut adapter = Adapter::new(&FC, 48000.0 / 1024.0);
        let ehs = Array1::from_elem(FC.len(), 3.0);
        let mut ep = adapter.process(&ehs, &ehs);
        for _ in 0..20 {
            ep = adapter.process(&ehs, &ehs);
        }
        for i in 0..FC.len() {
            assert!((ep[0][i] - ep[1][i]).abs() < 1e-6);
        }
    }

    #[test]
    fn reset_clears_all_state() {
        let mut adapter = Adapter::new(&FC, 48000.0 / 1024.0);
        let ehs = Array1::from_elem(FC.len(), 3.0);
        adapter.process(&ehs, &ehs);
        adapter.reset();
        assert!(adapter.p[0].iter().all(|&v| v == 0.0));
        assert!(adapter.rn.iter().all(|&v| v == 0.0));
        assert!(adapter.pc[0].iter().all(|&v| v == 0.0));
    }
}
