// Modulation difference MOV (component G): compares the modulation
// patterns of reference and test channels.

use ndarray::Array1;

const MOD_EXP: f64 = 0.3;

/// Returns `(Mt1B, Mt2B, Wt)` for one frame.
pub fn mod_diff(
    m_ref: &Array1<f64>,
    m_test: &Array1<f64>,
    er_avg: &Array1<f64>,
    ein: &Array1<f64>,
) -> (f64, f64, f64) {
    let neg_wt_2b = 0.1;
    let offset_1b = 1.0;
    let offset_2b = 0.01;
    let lev_wt = 100.0;
    let nc = m_ref.len();

    let mut s1 = 0.0;
    let mut s2 = 0.0;
    let mut wt = 0.0;
    for i in 0..nc {
        let num1 = (m_ref[i] - m_test[i]).abs();
        let num2 = if m_ref[i] > m_test[i] {
            neg_wt_2b * num1
        } else {
            num1
        };
        s1 += num1 / (offset_1b + m_ref[i]);
        s2 += num2 / (offset_2b + m_ref[i]);
        let ete = ein[i].powf(MOD_EXP);
        wt += er_avg[i] / (er_avg[i] + lev_wt * ete);
    }

    ((100.0 / nc as f64) * s1, (100.0 / nc as f64) * s2, wt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_channels_give_zero_difference() {
        let nc = 109;
        let m = Array1::from_elem(nc, 0.5);
        let er_avg = Array1::from_elem(nc, 1.0);
        let ein = Array1::from_elem(nc, 1e-2);
        let (mt1, mt2, wt) = mod_diff(&m, &m, &er_avg, &ein);
        assert_eq!(mt1, 0.0);
        assert_eq!(mt2, 0.0);
        assert!(wt > 0.0);
    }
}
