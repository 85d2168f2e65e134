// Outer/middle-ear weighting, critical-band grouping, and internal-noise
// floor (component C).

use crate::tables::EMIN;
use ndarray::Array1;

/// Outer/middle-ear magnitude-squared response, one value per DFT bin
/// `0..=nf/2`. Bin 0 (DC) is zero.
pub fn outer_middle_ear(fs: f64, nf: usize) -> Array1<f64> {
    let half = nf / 2;
    let mut w2 = Array1::zeros(half + 1);
    for k in 0..half {
        let fk_hz = (k + 1) as f64 * fs / nf as f64;
        let fk_khz = fk_hz / 1000.0;
        let a_db = -2.184 * fk_khz.powf(-0.8) + 6.5 * (-0.6 * (fk_khz - 3.3).powi(2)).exp()
            - 0.001 * fk_khz.powf(3.6);
        w2[k + 1] = 10f64.powf(a_db / 10.0);
    }
    w2
}

/// Internal-noise floor per critical band.
pub fn internal_noise(fc: &[f64]) -> Array1<f64> {
    Array1::from_iter(fc.iter().map(|&f| {
        let in_db = 1.456 * (f / 1000.0).powf(-0.8);
        10f64.powf(in_db / 10.0)
    }))
}

/// Sparse critical-band grouping matrix `U[k, i]`. Each band only
/// overlaps a narrow contiguous range of DFT bins, so we store
/// `(bin, weight)` pairs per band rather than a dense `[bins x bands]`
/// matrix.
pub struct GroupingMatrix {
    bands: Vec<Vec<(usize, f64)>>,
}

impl GroupingMatrix {
    pub fn new(fs: f64, nf: usize, fl: &[f64], fu: &[f64]) -> Self {
        let half = nf / 2;
        let df = fs / nf as f64;
        let nc = fl.len();
        let mut bands = vec![Vec::new(); nc];
        for k in 0..=half {
            let bin_lo = (k as f64 - 0.5) * df;
            let bin_hi = (k as f64 + 0.5) * df;
            for (i, band) in bands.iter_mut().enumerate() {
                let lo = fl[i].max(bin_lo);
                let hi = fu[i].min(bin_hi);
                let weight = (hi - lo) / df;
                if weight > 0.0 {
                    band.push((k, weight));
                }
            }
        }
        Self { bands }
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Grouped, noise-floored band energy from a squared-magnitude
    /// spectrum (already ear-weighted, i.e. `Xw2`).
    pub fn group(&self, xw2: &Array1<f64>) -> Array1<f64> {
        Array1::from_iter(self.bands.iter().map(|entries| {
            let sum: f64 = entries.iter().map(|&(k, w)| w * xw2[k]).sum();
            sum.max(EMIN)
        }))
    }

    /// Sum of weights touching each DFT bin; used by the `sum U[k,:] <= 1`
    /// invariant check.
    #[cfg(test)]
    fn weight_sum_per_bin(&self, num_bins: usize) -> Vec<f64> {
        let mut sums = vec![0.0; num_bins];
        for band in &self.bands {
            for &(k, w) in band {
                sums[k] += w;
            }
        }
        sums
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{FC, FL, FU};

    #[test]
    fn outer_ear_response_is_zero_at_dc() {
        let w2 = outer_middle_ear(48000.0, 2048);
        assert_eq!(w2[0], 0.0);
        assert!(w2.iter().skip(1).all(|&v| v >= 0.0));
    }

    #[test]
    fn grouping_matrix_weights_are_bounded() {
        let gm = GroupingMatrix::new(48000.0, 2048, &FL, &FU);
        let sums = gm.weight_sum_per_bin(1025);
        for s in sums {
            assert!(s <= 1.0 + 1e-9);
            assert!(s >= 0.0);
        }
    }

    #[test]
    fn grouped_energy_floors_at_emin() {
        let gm = GroupingMatrix::new(48000.0, 2048, &FL, &FU);
        let silence = Array1::zeros(1025);
        let eb = gm.group(&silence);
        assert!(eb.iter().all(|&v| v == EMIN));
        assert_eq!(eb.len(), FC.len());
    }
}
