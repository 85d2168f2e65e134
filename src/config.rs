// Analyzer configuration.
//
// Config + stateful-processor split, the same shape as EnvelopeConfig /
// EnvelopeFollower and ChunkConfig / ChunkProcessor.

use crate::error::{PeaqError, Result};
use serde::{Deserialize, Serialize};

/// Number of critical bands for the Basic version (fixed by the hardcoded
/// band-edge tables; not configurable).
pub const NC: usize = 109;

/// Bark-domain band resolution.
pub const DZ: f64 = 0.25;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Sample rate in Hz. The band tables and PD/EHS constants are only
    /// known-correct at 48000; other rates are accepted but not validated
    /// against an independent reference.
    pub fs: f64,
    /// Frame length in samples; must be even.
    pub nf: usize,
    /// Peak amplitude the calibration tone assumes.
    pub amax: f64,
    /// Calibration SPL in dB for a full-scale sinusoid at `calibration_freq_hz`.
    pub calibration_spl_db: f64,
    /// Calibration frequency in Hz.
    pub calibration_freq_hz: f64,
    /// If true, rescale both signals so the reference peaks at `amax`
    /// before analysis. The reference implementation logs that it scales
    /// but never actually does; default is `false` to match that observed
    /// behavior. Set `true` for genuine normalization.
    pub normalize_to_amax: bool,
    /// `PQ_FindPeak`'s `cprev` tracking. The reference implementation sets
    /// `cprev` once from `c2[0]` and never updates it inside the loop,
    /// which is not a true rising-edge test. Default `true` selects the
    /// Kabal-correct behavior (`cprev` updated every iteration); `false`
    /// reproduces the reference's literal behavior.
    pub ehs_peak_kabal_correct: bool,
    /// `PD_q` truncates `edB` to an integer before dividing by `s` in the
    /// reference implementation, almost certainly a source bug. Default
    /// `true` preserves that truncation for bit-compatibility; `false`
    /// uses the untruncated `edB`.
    pub pd_q_truncate_edb: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fs: 48000.0,
            nf: 2048,
            amax: 1.0,
            calibration_spl_db: 92.0,
            calibration_freq_hz: 1019.5,
            normalize_to_amax: false,
            ehs_peak_kabal_correct: true,
            pd_q_truncate_edb: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.nf == 0 || self.nf % 2 != 0 {
            return Err(PeaqError::Config(format!(
                "frame length must be even and non-zero, got {}",
                self.nf
            )));
        }
        if self.fs <= 0.0 {
            return Err(PeaqError::Config(format!(
                "sample rate must be positive, got {}",
                self.fs
            )));
        }
        if self.amax <= 0.0 {
            return Err(PeaqError::Config(format!(
                "Amax must be positive, got {}",
                self.amax
            )));
        }
        Ok(())
    }

    pub fn nadv(&self) -> usize {
        self.nf / 2
    }

    pub fn fss(&self) -> f64 {
        self.fs / self.nadv() as f64
    }
}
