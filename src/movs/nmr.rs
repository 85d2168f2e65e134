// Noise-to-mask ratio MOV (component G).

use ndarray::Array1;

/// Per-band masking offset `gm[k]`, constant for a given `dz` (always
/// 0.25 for the Basic version), so computed once at construction.
pub fn mask_offset(dz: f64, nc: usize) -> Array1<f64> {
    Array1::from_iter((0..nc).map(|k| {
        let m_db = if (k as f64) <= 12.0 / dz {
            3.0
        } else {
            0.25 * k as f64 * dz
        };
        10f64.powf(-m_db / 10.0)
    }))
}

/// Returns `(NMRavg, NMRmax)` for one frame.
pub fn nmr(eb_n: &Array1<f64>, ehs_r: &Array1<f64>, gm: &Array1<f64>) -> (f64, f64) {
    let nc = eb_n.len();
    let mut nmr_max = 0.0f64;
    let mut sum = 0.0f64;
    for k in 0..nc {
        let nmr_m = eb_n[k] / (gm[k] * ehs_r[k]);
        sum += nmr_m;
        if nmr_m > nmr_max {
            nmr_max = nmr_m;
        }
    }
    (sum / nc as f64, nmr_max)
}
