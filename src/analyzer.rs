// Orchestrator (component J): iterates frames, feeds persistent state
// forward, collects per-frame MOVs, then runs the temporal aggregators
// and the ODG neural net.

use crate::adapt::Adapter;
use crate::aggregate;
use crate::config::{AnalyzerConfig, NC};
use crate::ear::{internal_noise, outer_middle_ear, GroupingMatrix};
use crate::error::{PeaqError, Result};
use crate::fft::RealSpectrum;
use crate::modulation::ModulationTracker;
use crate::movs::{self, EhsComputer};
use crate::neuralnet;
use crate::spreading::{spread_cb, spreading_normalization};
use crate::tables::{FC, FL, FU};
use crate::time_spread::TimeSpreader;
use crate::window::scaled_hann;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-frame MOVs accumulated over a `process()` call.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct FrameMovs {
    bw_ref: Vec<f64>,
    bw_test: Vec<f64>,
    nmr_avg: Vec<f64>,
    nmr_max: Vec<f64>,
    mdiff_mt1b: Vec<f64>,
    mdiff_mt2b: Vec<f64>,
    mdiff_wt: Vec<f64>,
    nloud_nl: Vec<f64>,
    pd_p: Vec<f64>,
    pd_q: Vec<f64>,
    ehs: Vec<f64>,
    loud_nref: Vec<f64>,
    loud_ntest: Vec<f64>,
}

/// Aggregated MOVs and the final ODG, returned by `aggregate()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeaqReport {
    pub avg_bw_ref: f64,
    pub avg_bw_test: f64,
    pub total_nmr_b: f64,
    pub rel_dist_frames_b: f64,
    pub win_mod_diff_1b: f64,
    pub avg_mod_diff_1b: f64,
    pub avg_mod_diff_2b: f64,
    pub rms_noise_loud_b: f64,
    pub adb_b: f64,
    pub mfpd_b: f64,
    pub ehs_b: f64,
    pub odg: f64,
}

pub struct Analyzer {
    config: AnalyzerConfig,
    hw: Array1<f64>,
    w2: Array1<f64>,
    ein: Array1<f64>,
    bs: Array1<f64>,
    grouping: GroupingMatrix,
    gm: Array1<f64>,
    spectrum: RealSpectrum,
    time_spread_r: TimeSpreader,
    time_spread_t: TimeSpreader,
    adapter: Adapter,
    modulation: ModulationTracker,
    ehs_computer: EhsComputer,
    frames: FrameMovs,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;

        let fss = config.fss();
        let hw = scaled_hann(
            config.nf,
            config.amax,
            config.fs,
            config.calibration_freq_hz,
            config.calibration_spl_db,
        );
        let w2 = outer_middle_ear(config.fs, config.nf);
        let ein = internal_noise(&FC);
        let bs = spreading_normalization(&FC, crate::config::DZ);
        let grouping = GroupingMatrix::new(config.fs, config.nf, &FL, &FU);
        let gm = movs::mask_offset(crate::config::DZ, NC);

        Ok(Self {
            spectrum: RealSpectrum::new(config.nf),
            time_spread_r: TimeSpreader::new(&FC, fss),
            time_spread_t: TimeSpreader::new(&FC, fss),
            adapter: Adapter::new(&FC, fss),
            modulation: ModulationTracker::new(&FC, fss),
            ehs_computer: EhsComputer::new(config.fs, config.nf, config.ehs_peak_kabal_correct),
            hw,
            w2,
            ein,
            bs,
            grouping,
            gm,
            frames: FrameMovs::default(),
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn reset_state(&mut self) {
        self.time_spread_r.reset();
        self.time_spread_t.reset();
        self.adapter.reset();
        self.modulation.reset();
        self.frames = FrameMovs::default();
    }

    fn validate_inputs(&self, sig_r: &[f64], sig_t: &[f64]) -> Result<()> {
        if sig_r.len() != sig_t.len() {
            return Err(PeaqError::Input(format!(
                "reference and test signals differ in length: {} vs {}",
                sig_r.len(),
                sig_t.len()
            )));
        }
        if sig_r.is_empty() {
            return Err(PeaqError::Input("signals must not be empty".into()));
        }
        if sig_r.iter().chain(sig_t.iter()).any(|v| !v.is_finite()) {
            return Err(PeaqError::Input("signals must not contain NaN/Inf".into()));
        }
        Ok(())
    }

    /// Processes a full `(reference, test)` pair. Resets all persistent
    /// state first, so each call analyzes a fresh pair.
    pub fn process(&mut self, sig_r: &[f64], sig_t: &[f64]) -> Result<()> {
        self.validate_inputs(sig_r, sig_t)?;
        self.reset_state();

        let (sig_r, sig_t) = self.maybe_normalize(sig_r, sig_t);

        let nf = self.config.nf;
        let nadv = self.config.nadv();
        let np = sig_r.len() / nadv;
        debug!(frames = np, "processing PEAQ frame sequence");

        let mut frame_r = vec![0.0f64; nf];
        let mut frame_t = vec![0.0f64; nf];

        for i in 0..np {
            let start = i * nadv;
            fill_frame(&mut frame_r, &sig_r, start, nf);
            fill_frame(&mut frame_t, &sig_t, start, nf);

            self.process_frame(&frame_r, &frame_t);
        }

        Ok(())
    }

    fn maybe_normalize(&self, sig_r: &[f64], sig_t: &[f64]) -> (Vec<f64>, Vec<f64>) {
        if !self.config.normalize_to_amax {
            return (sig_r.to_vec(), sig_t.to_vec());
        }
        let peak = sig_r.iter().fold(0.0f64, |m, &v| m.max(v.abs()));
        if peak == 0.0 {
            return (sig_r.to_vec(), sig_t.to_vec());
        }
        let scale = self.config.amax / peak;
        (
            sig_r.iter().map(|v| v * scale).collect(),
            sig_t.iter().map(|v| v * scale).collect(),
        )
    }

    fn process_frame(&mut self, x_r: &[f64], x_t: &[f64]) {
        let windowed_r: Vec<f64> = x_r.iter().zip(self.hw.iter()).map(|(x, h)| x * h).collect();
        let windowed_t: Vec<f64> = x_t.iter().zip(self.hw.iter()).map(|(x, h)| x * h).collect();

        let x2_r = self.spectrum.squared_magnitude(&windowed_r);
        let x2_t = self.spectrum.squared_magnitude(&windowed_t);

        let half = x2_r.len();
        let mut xw2_r = Array1::<f64>::zeros(half);
        let mut xw2_t = Array1::<f64>::zeros(half);
        let mut xw_n2 = Array1::<f64>::zeros(half);
        for k in 0..half {
            xw2_r[k] = x2_r[k] * self.w2[k];
            xw2_t[k] = x2_t[k] * self.w2[k];
            xw_n2[k] = xw2_r[k] - 2.0 * (xw2_r[k] * xw2_t[k]).sqrt() + xw2_t[k];
        }

        let eb_r = self.grouping.group(&xw2_r);
        let eb_t = self.grouping.group(&xw2_t);
        let eb_n = self.grouping.group(&xw_n2);

        let nc = eb_r.len();
        let mut e_r = Array1::<f64>::zeros(nc);
        let mut e_t = Array1::<f64>::zeros(nc);
        for i in 0..nc {
            e_r[i] = eb_r[i] + self.ein[i];
            e_t[i] = eb_t[i] + self.ein[i];
        }

        let es_r = spread_cb(&e_r, &FC, crate::config::DZ, &self.bs);
        let es_t = spread_cb(&e_t, &FC, crate::config::DZ, &self.bs);

        let ehs_r = self.time_spread_r.process(&es_r);
        let ehs_t = self.time_spread_t.process(&es_t);

        let ep = self.adapter.process(&ehs_r, &ehs_t);
        let (m, er_avg) = self.modulation.process(&[es_r, es_t]);

        let loud_nref = movs::loudness(&ehs_r, &FC);
        let loud_ntest = movs::loudness(&ehs_t, &FC);

        let (mt1b, mt2b, wt) = movs::mod_diff(&m[0], &m[1], &er_avg, &self.ein);
        let nl = movs::noise_loudness(&m[0], &m[1], &ep[0], &ep[1], &self.ein);
        let (bw_ref, bw_test) = movs::bandwidth(&x2_r, &x2_t, self.config.fs, self.config.nf);
        let (pd_p, pd_q) = movs::pd(&ehs_r, &ehs_t, self.config.pd_q_truncate_edb);
        let ehs_val = self
            .ehs_computer
            .process(x_r, x_t, self.config.nadv(), &x2_r, &x2_t);
        let (nmr_avg, nmr_max) = movs::nmr(&eb_n, &ehs_r, &self.gm);

        self.frames.bw_ref.push(bw_ref);
        self.frames.bw_test.push(bw_test);
        self.frames.nmr_avg.push(nmr_avg);
        self.frames.nmr_max.push(nmr_max);
        self.frames.mdiff_mt1b.push(mt1b);
        self.frames.mdiff_mt2b.push(mt2b);
        self.frames.mdiff_wt.push(wt);
        self.frames.nloud_nl.push(nl);
        self.frames.pd_p.push(pd_p);
        self.frames.pd_q.push(pd_q);
        self.frames.ehs.push(ehs_val);
        self.frames.loud_nref.push(loud_nref);
        self.frames.loud_ntest.push(loud_ntest);
    }

    /// Reduces the accumulated per-frame MOVs into the aggregated record
    /// and ODG. Call after `process()`.
    pub fn aggregate(&self) -> Result<PeaqReport> {
        if self.frames.bw_ref.is_empty() {
            return Err(PeaqError::Input(
                "aggregate() called before a successful process()".into(),
            ));
        }

        let fss = self.config.fss();
        let (avg_bw_ref, avg_bw_test) = aggregate::avg_bw(&self.frames.bw_ref, &self.frames.bw_test);
        let (total_nmr_b, rel_dist_frames_b) =
            aggregate::avg_nmr(&self.frames.nmr_avg, &self.frames.nmr_max);

        let ndel_fixed = (0.5 * fss).ceil() as usize;
        let (win_mod_diff_1b, avg_mod_diff_1b, avg_mod_diff_2b) = aggregate::avg_mod_diff(
            ndel_fixed,
            &self.frames.mdiff_mt1b,
            &self.frames.mdiff_mt2b,
            &self.frames.mdiff_wt,
            fss,
        );
        let (adb_b, mfpd_b) = aggregate::avg_pd(&self.frames.pd_p, &self.frames.pd_q);

        let n50ms = (0.05 * fss).ceil() as usize;
        let loud_onset = aggregate::loud_test(&self.frames.loud_nref, &self.frames.loud_ntest);
        let ndel_noise = ndel_fixed.max(loud_onset + n50ms);
        let rms_noise_loud_b = aggregate::avg_nloud(ndel_noise, &self.frames.nloud_nl);

        let ehs_b = aggregate::avg_ehs(&self.frames.ehs);

        let mov = [
            avg_bw_ref,
            avg_bw_test,
            total_nmr_b,
            win_mod_diff_1b,
            adb_b,
            ehs_b,
            avg_mod_diff_1b,
            avg_mod_diff_2b,
            rms_noise_loud_b,
            mfpd_b,
            rel_dist_frames_b,
        ];
        let odg = neuralnet::odg(&mov);

        Ok(PeaqReport {
            avg_bw_ref,
            avg_bw_test,
            total_nmr_b,
            rel_dist_frames_b,
            win_mod_diff_1b,
            avg_mod_diff_1b,
            avg_mod_diff_2b,
            rms_noise_loud_b,
            adb_b,
            mfpd_b,
            ehs_b,
            odg,
        })
    }

    /// Convenience wrapper over `process` + `aggregate`, for the common
    /// case of a single one-shot comparison.
    pub fn analyze(&mut self, sig_r: &[f64], sig_t: &[f64]) -> Result<PeaqReport> {
        self.process(sig_r, sig_t)?;
        self.aggregate()
    }
}

fn fill_frame(buf: &mut [f64], sig: &[f64], start: usize, nf: usize) {
    buf.iter_mut().for_each(|v| *v = 0.0);
    let available = sig.len().saturating_sub(start).min(nf);
    buf[..available].copy_from_slice(&sig[start..start + available]);
}

/// Runs several independent `(ref, test)` pairs concurrently. Each pair
/// gets its own `Analyzer`, so there is no shared mutable state; this
/// only parallelizes across pairs, never within one analyzer's frame
/// loop (which must stay strictly sequential).
pub fn analyze_many(config: &AnalyzerConfig, pairs: &[(Vec<f64>, Vec<f64>)]) -> Vec<Result<PeaqReport>> {
    use rayon::prelude::*;
    pairs
        .par_iter()
        .map(|(sig_r, sig_t)| {
            let mut analyzer = Analyzer::new(config.clone())?;
            analyzer.analyze(sig_r, sig_t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, amp: f64, seconds: f64, fs: f64) -> Vec<f64> {
        let n = (seconds * fs) as usize;
        (0..n)
            .map(|i| amp * (2.0 * std::f64::consts::PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn silence_vs_silence_stays_within_odg_bounds() {
        let config = AnalyzerConfig::default();
        let sig = vec![0.0f64; (10.0 * config.fs) as usize];
        let mut analyzer = Analyzer::new(config).unwrap();
        let report = analyzer.analyze(&sig, &sig).unwrap();
        assert!(report.odg >= -3.98 && report.odg <= 0.22);
    }

    #[test]
    fn identical_sinusoid_has_near_zero_noise_to_mask_ratio() {
        let config = AnalyzerConfig::default();
        let sig = sine(1000.0, 0.5, 5.0, config.fs);
        let mut analyzer = Analyzer::new(config).unwrap();
        let report = analyzer.analyze(&sig, &sig).unwrap();
        assert!(report.odg >= -3.98 && report.odg <= 0.22);
        assert!(report.total_nmr_b < -50.0);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let config = AnalyzerConfig::default();
        let mut analyzer = Analyzer::new(config).unwrap();
        let err = analyzer.process(&[0.0; 10], &[0.0; 5]).unwrap_err();
        assert!(matches!(err, PeaqError::Input(_)));
    }

    #[test]
    fn empty_signal_is_rejected() {
        let config = AnalyzerConfig::default();
        let mut analyzer = Analyzer::new(config).unwrap();
        let err = analyzer.process(&[], &[]).unwrap_err();
        assert!(matches!(err, PeaqError::Input(_)));
    }

    #[test]
    fn reprocessing_resets_persistent_state() {
        let config = AnalyzerConfig::default();
        let sig_a = sine(1000.0, 0.5, 2.0, config.fs);
        let sig_b = sine(200.0, 0.3, 2.0, config.fs);
        let mut analyzer = Analyzer::new(config).unwrap();

        let first = analyzer.analyze(&sig_a, &sig_a).unwrap();
        let second = analyzer.analyze(&sig_b, &sig_b).unwrap();
        assert!(first.odg >= -3.98 && first.odg <= 0.22);
        assert!(second.odg >= -3.98 && second.odg <= 0.22);
    }

    #[test]
    fn added_noise_degrades_odg_and_raises_nmr() {
        let config = AnalyzerConfig::default();
        let reference = sine(1000.0, 0.5, 5.0, config.fs);
        let mut rng_state = 0x2545F4914F6CDD1Du64;
        let mut next = || {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;
            (rng_state as f64 / u64::MAX as f64) - 0.5
        };
        let test: Vec<f64> = reference.iter().map(|&v| v + 0.01 * next()).collect();

        let mut analyzer = Analyzer::new(config).unwrap();
        let report = analyzer.analyze(&reference, &test).unwrap();
        assert!(report.total_nmr_b > -10.0);
        assert!(report.odg < 0.22);
    }
}
