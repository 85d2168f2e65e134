// Probability-of-detection MOV (component G).

use crate::tables::{PD_BM, PD_BP, PD_D1, PD_D2, PD_G, PD_POLY};
use ndarray::Array1;

/// Per-band detection probability/magnitude `(p[k], q[k])` summed into
/// the per-frame channel aggregate `(Pc, Qc)`.
///
/// `truncate_edb_for_q` reproduces the reference implementation's
/// integer truncation of `edB` before dividing by `s`; set to `false` for
/// the untruncated (almost certainly intended) value.
pub fn pd(ehs_r: &Array1<f64>, ehs_t: &Array1<f64>, truncate_edb_for_q: bool) -> (f64, f64) {
    let nc = ehs_r.len();
    let mut pr = 1.0;
    let mut qc = 0.0;

    for k in 0..nc {
        let edb_r = 10.0 * ehs_r[k].log10();
        let edb_t = 10.0 * ehs_t[k].log10();
        let edb = edb_r - edb_t;

        let (l, b) = if edb > 0.0 {
            (0.3 * edb_r + 0.7 * edb_t, PD_BP)
        } else {
            (edb_t, PD_BM)
        };

        let s = if l > 0.0 {
            PD_D1 * (PD_D2 / l).powf(PD_G)
                + PD_POLY[0]
                + l * (PD_POLY[1] + l * (PD_POLY[2] + l * (PD_POLY[3] + l * PD_POLY[4])))
        } else {
            1e30
        };

        let p = 1.0 - 0.5f64.powf((edb / s).powf(b));
        let edb_for_q = if truncate_edb_for_q { edb.trunc() } else { edb };
        let q = edb_for_q.abs() / s;

        pr *= 1.0 - p;
        qc += q;
    }

    (1.0 - pr, qc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_channels_give_zero_detection() {
        let nc = 109;
        let ehs = Array1::from_elem(nc, 3.0);
        let (pc, qc) = pd(&ehs, &ehs, true);
        assert!(pc.abs() < 1e-9);
        assert!(qc.abs() < 1e-9);
    }
}
