//! Reference-run driver for the GN model.
//!
//! Runs the reference WDM configuration (95 channels on a 50 GHz pitch,
//! 32 GBd, 5% roll-off, 1 mW per channel over a 100 km span), times the
//! double integral, prints the NLI PSD at the evaluation frequencies, and
//! writes a JSON contract artifact under `target/contracts/`.
//!
//! Usage: `cargo run -p xtask --release [-- <num_channels>]`

use anyhow::{bail, Context, Result};
use gn_rs::kernel::KernelBuild;
use gn_rs::model::traits::NliPsd1D;
use gn_rs::model::{CombPsdConfig, NliModelParams, NliPsdConfig, NliPsdKernel};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

const CHANNEL_SPACING_THZ: f64 = 0.05;
const SYMBOL_RATE_TBAUD: f64 = 0.032;
const ROLL_OFF: f64 = 0.05;
const POWER_W: f64 = 0.001;
const BETA2_PS_THZ_KM: f64 = 21.27;
const SPAN_KM: f64 = 100.0;
const LOSS_DB_KM: f64 = 0.2;
const GAMMA_W_KM: f64 = 1.27;

#[derive(Debug, Serialize)]
struct Contract {
    num_channels: usize,
    channel_spacing_thz: f64,
    symbol_rate_tbaud: f64,
    roll_off: f64,
    power_w: f64,
    beta2_ps_thz_km: f64,
    span_km: f64,
    loss_db_km: f64,
    gamma_w_km: f64,
    min_fwm_db: f64,
    n_grid: usize,
    n_grid_min: usize,
    eval_freq_thz: Vec<f64>,
    nli_w_per_thz: Vec<f64>,
    nli_db_w_per_thz: Vec<f64>,
    elapsed_secs: f64,
}

/// Channel centers in baseband THz and the central inter-channel evaluation
/// frequencies: the comb center for an odd channel count, the two central
/// channel centers for an even one.
fn reference_comb(num_channels: usize) -> (Vec<f64>, Vec<f64>) {
    let centers: Vec<f64> = if num_channels % 2 == 1 {
        let half = (num_channels / 2) as f64;
        (0..num_channels)
            .map(|i| (i as f64 - half) * CHANNEL_SPACING_THZ)
            .collect()
    } else {
        let half = num_channels as f64 / 2.0;
        (0..num_channels)
            .map(|i| (i as f64 - half + 0.5) * CHANNEL_SPACING_THZ)
            .collect()
    };
    let eval_freq = if num_channels % 2 == 1 {
        vec![0.0]
    } else {
        vec![-0.5 * CHANNEL_SPACING_THZ, 0.5 * CHANNEL_SPACING_THZ]
    };
    (centers, eval_freq)
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let num_channels = match args.next() {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("channel count must be an integer, got `{raw}`"))?,
        None => 95,
    };
    if num_channels < 2 {
        bail!("the GN integral needs at least two channels, got {num_channels}");
    }

    let (center_freq, eval_freq) = reference_comb(num_channels);
    let model = NliModelParams {
        min_fwm_db: 30.0,
        n_grid: 500,
        n_grid_min: 4,
        eval_freq,
    };
    let kernel = NliPsdKernel::try_new(NliPsdConfig {
        beta2: BETA2_PS_THZ_KM,
        span_length: SPAN_KM,
        loss_db: LOSS_DB_KM,
        gamma: GAMMA_W_KM,
        channels: CombPsdConfig {
            center_freq,
            symbol_rate: vec![SYMBOL_RATE_TBAUD; num_channels],
            roll_off: vec![ROLL_OFF; num_channels],
            power: vec![POWER_W; num_channels],
        },
        n_channels: num_channels,
        model: model.clone(),
    })
    .context("reference configuration was rejected")?;

    let started = Instant::now();
    let nli = kernel
        .run_alloc()
        .context("GN integral failed on the reference configuration")?;
    let elapsed = started.elapsed().as_secs_f64();

    println!("Elapsed: {elapsed:.3} s ({num_channels} channels)");
    let nli_db: Vec<f64> = nli.iter().map(|v| 10.0 * v.log10()).collect();
    for (f, (lin, db)) in kernel.eval_freq().iter().zip(nli.iter().zip(&nli_db)) {
        println!("  f = {f:+.4} THz  NLI = {lin:.6e} W/THz  ({db:.2} dB(W/THz))");
    }

    let contract = Contract {
        num_channels,
        channel_spacing_thz: CHANNEL_SPACING_THZ,
        symbol_rate_tbaud: SYMBOL_RATE_TBAUD,
        roll_off: ROLL_OFF,
        power_w: POWER_W,
        beta2_ps_thz_km: BETA2_PS_THZ_KM,
        span_km: SPAN_KM,
        loss_db_km: LOSS_DB_KM,
        gamma_w_km: GAMMA_W_KM,
        min_fwm_db: model.min_fwm_db,
        n_grid: model.n_grid,
        n_grid_min: model.n_grid_min,
        eval_freq_thz: kernel.eval_freq().to_vec(),
        nli_w_per_thz: nli,
        nli_db_w_per_thz: nli_db,
        elapsed_secs: elapsed,
    };

    let out_dir = Path::new("target").join("contracts");
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let out_path = out_dir.join("gn_reference.json");
    fs::write(&out_path, serde_json::to_string_pretty(&contract)?)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("Contract written to {}", out_path.display());
    Ok(())
}
