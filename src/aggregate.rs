// Temporal aggregation (component H): reduces each per-frame MOV
// sequence to the scalar used by the ODG neural net.

fn lin_pos_avg(x: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in x {
        if v >= 0.0 {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn avg_bw(bw_ref: &[f64], bw_test: &[f64]) -> (f64, f64) {
    (lin_pos_avg(bw_ref), lin_pos_avg(bw_test))
}

pub fn avg_nmr(nmr_avg: &[f64], nmr_max: &[f64]) -> (f64, f64) {
    let mean_avg = nmr_avg.iter().sum::<f64>() / nmr_avg.len() as f64;
    let total_nmr_b = 10.0 * mean_avg.log10();
    let threshold = 10f64.powf(1.5 / 10.0);
    let count = nmr_max.iter().filter(|&&v| v > threshold).count();
    let rel_dist_frames_b = count as f64 / nmr_max.len() as f64;
    (total_nmr_b, rel_dist_frames_b)
}

/// First frame index where both loudness sequences exceed the threshold,
/// or `np` if no such frame exists.
pub fn loud_test(loud_ref: &[f64], loud_test: &[f64]) -> usize {
    let thr = 0.1;
    for (i, (&r, &t)) in loud_ref.iter().zip(loud_test.iter()).enumerate() {
        if r > thr && t > thr {
            return i;
        }
    }
    loud_ref.len()
}

fn win_avg(l: usize, x: &[f64]) -> f64 {
    let n = x.len();
    if n < l || l == 0 {
        return 0.0;
    }
    let mut s = 0.0;
    for i in (l - 1)..n {
        let mut t = 0.0;
        for m in 0..l {
            t += x[i - m].sqrt();
        }
        s += (t / l as f64).powi(4);
    }
    (s / (n - l + 1) as f64).sqrt()
}

fn wt_avg(x: &[f64], w: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let mut s = 0.0;
    let mut sw = 0.0;
    for i in 0..x.len() {
        s += w[i] * x[i];
        sw += w[i];
    }
    if sw == 0.0 {
        0.0
    } else {
        s / sw
    }
}

/// `(WinModDiff1B, AvgModDiff1B, AvgModDiff2B)`.
pub fn avg_mod_diff(ndel: usize, mt1b: &[f64], mt2b: &[f64], wt: &[f64], fss: f64) -> (f64, f64, f64) {
    let tavg = 0.1;
    let l = (tavg * fss).floor() as usize;
    let ndel = ndel.min(mt1b.len());

    let win_mod_diff_1b = win_avg(l, &mt1b[ndel..]);
    let avg_mod_diff_1b = wt_avg(&mt1b[ndel..], &wt[ndel..]);
    let avg_mod_diff_2b = wt_avg(&mt2b[ndel..], &wt[ndel..]);

    (win_mod_diff_1b, avg_mod_diff_1b, avg_mod_diff_2b)
}

pub fn avg_nloud(ndel: usize, nl: &[f64]) -> f64 {
    let ndel = ndel.min(nl.len());
    let x = &nl[ndel..];
    if x.is_empty() {
        return 0.0;
    }
    (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
}

/// `(ADBB, MFPDB)`.
pub fn avg_pd(pd_p: &[f64], pd_q: &[f64]) -> (f64, f64) {
    let c0 = 0.9;
    let mut nd = 0usize;
    let mut qsum = 0.0;
    let mut pcmax = 0.0f64;
    let mut phc = 0.0;
    for i in 0..pd_p.len() {
        phc = c0 * phc + (1.0 - c0) * pd_p[i];
        pcmax = pcmax.max(phc);
        if pd_p[i] > 0.5 {
            nd += 1;
            qsum += pd_q[i];
        }
    }
    let adbb = if nd == 0 {
        0.0
    } else if qsum > 0.0 {
        (qsum / nd as f64).log10()
    } else {
        -0.5
    };
    (adbb, pcmax)
}

pub fn avg_ehs(ehs: &[f64]) -> f64 {
    1000.0 * lin_pos_avg(ehs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_average_ignores_negative_frames() {
        let bw = [2.0, -1.0, 4.0, -1.0];
        assert!((lin_pos_avg(&bw) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn rel_dist_frames_counts_fraction_above_threshold() {
        let nmr_avg = vec![1.0; 4];
        let nmr_max = vec![0.01, 100.0, 0.01, 100.0];
        let (_total, rel) = avg_nmr(&nmr_avg, &nmr_max);
        assert!((rel - 0.5).abs() < 1e-9);
    }

    #[test]
    fn avg_nloud_is_zero_when_all_frames_delayed_out() {
        let nl = vec![1.0, 2.0, 3.0];
        assert_eq!(avg_nloud(3, &nl), 0.0);
    }
}
