// Frequency (Bark) spreading with normalization (component D, spread
// step). The nested upper-spread loop is O(Nc^2) but Nc is fixed at 109,
// so it's left as straight arithmetic rather than cached or parallelized.

use ndarray::Array1;

const SPREAD_EXP: f64 = 0.4;

/// Spread an excitation vector across critical bands. `bs` is the
/// per-band normalization computed once by `spreading_normalization`.
pub fn spread_cb(e: &Array1<f64>, fc: &[f64], dz: f64, bs: &Array1<f64>) -> Array1<f64> {
    let nc = e.len();
    let a_l = 10f64.powf(2.7 * dz);
    let a_le = a_l.powf(-SPREAD_EXP);

    let mut a_ucee = vec![0.0; nc];
    let mut ene = vec![0.0; nc];
    let mut es = Array1::<f64>::zeros(nc);

    for l in 0..nc {
        let a_uc = 10f64.powf((-2.4 - 23.0 / fc[l]) * dz);
        let a_uce = a_uc * e[l].powf(0.2 * dz);
        let g_il = (1.0 - a_l.powf(-((l + 1) as f64))) / (1.0 - a_l.powf(-1.0));
        let g_iu = (1.0 - a_uce.powf((nc - l) as f64)) / (1.0 - a_uce);
        let en = e[l] / (g_il + g_iu - 1.0);
        a_ucee[l] = a_uce.powf(SPREAD_EXP);
        ene[l] = en.powf(SPREAD_EXP);
    }

    es[nc - 1] = ene[nc - 1];
    for i in (0..nc - 1).rev() {
        es[i] = a_le * es[i + 1] + ene[i];
    }

    for i in 0..nc - 1 {
        let mut r = ene[i];
        let a = a_ucee[i];
        for l in (i + 1)..nc {
            r *= a;
            es[l] += r;
        }
    }

    for i in 0..nc {
        es[i] = es[i].powf(1.0 / SPREAD_EXP) / bs[i];
    }

    es
}

/// Normalization factor `Bs`: the same spreading procedure run once with
/// a flat unit excitation and a unit normalization, so that a flat input
/// maps back to `Es == 1`.
pub fn spreading_normalization(fc: &[f64], dz: f64) -> Array1<f64> {
    let nc = fc.len();
    let ones = Array1::<f64>::from_elem(nc, 1.0);
    let unit_bs = Array1::<f64>::from_elem(nc, 1.0);
    spread_cb(&ones, fc, dz, &unit_bs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::FC;

    #[test]
    fn flat_excitation_normalizes_to_one() {
        let bs = spreading_normalization(&FC, 0.25);
        let ones = Array1::<f64>::from_elem(FC.len(), 1.0);
        let es = spread_cb(&ones, &FC, 0.25, &bs);
        for v in es.iter() {
            assert!((v - 1.0).abs() < 1e-9);
        }
    }
}
