// ODG neural net (component I): one-hidden-layer sigmoid network mapping
// the 11 aggregated MOVs to the Objective Difference Grade.

use crate::tables::{NN_AMAX, NN_AMIN, NN_BMAX, NN_BMIN, NN_WX, NN_WXB, NN_WY, NN_WYB};

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Feature order: [avgBWRef, avgBWTest, totalNMRB, WinModDiff1B, ADBB,
/// EHSB, AvgModDiff1B, AvgModDiff2B, RmsNoiseLoudB, MFPDB,
/// relDistFramesB].
pub fn odg(mov: &[f64; 11]) -> f64 {
    let mov_x: Vec<f64> = (0..11)
        .map(|i| (mov[i] - NN_AMIN[i]) / (NN_AMAX[i] - NN_AMIN[i]))
        .collect();

    let mut di = NN_WYB;
    for j in 0..3 {
        let mut arg = NN_WXB[j];
        for i in 0..11 {
            arg += NN_WX[i][j] * mov_x[i];
        }
        di += NN_WY[j] * sigmoid(arg);
    }

    NN_BMIN + (NN_BMAX - NN_BMIN) * sigmoid(di)
}
