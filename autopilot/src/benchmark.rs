//! Multi-seed, multi-bot benchmark sweep.

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::bots::bot_ids;
use crate::runner::{is_crash, is_fuel_out, run_bot, write_tape, RunArtifact, RunMetrics};
use crate::util::seed_to_hex;

#[derive(Clone, Debug, Serialize)]
pub struct BotRanking {
    pub bot_id: String,
    pub runs: usize,
    pub avg_distance: f64,
    pub max_distance: u32,
    pub avg_ticks: f64,
    pub avg_refuels: f64,
    pub crash_rate: f64,
    pub fuel_out_rate: f64,
    pub survival_rate: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct SavedTapeRecord {
    pub rank: usize,
    pub bot_id: String,
    pub seed_hex: String,
    pub distance: u32,
    pub ticks: u32,
    pub path: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub max_ticks: u32,
    pub run_count: usize,
    pub jobs: Option<usize>,
    pub bot_rankings: Vec<BotRanking>,
    pub saved_tapes: Vec<SavedTapeRecord>,
    pub runs: Vec<RunMetrics>,
}

pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_ticks: u32,
    pub out_dir: PathBuf,
    pub save_top: usize,
    pub jobs: Option<usize>,
}

/// Expand an optional comma-separated bot list, defaulting to the roster.
pub fn resolve_bots(csv: Option<&str>) -> Result<Vec<String>> {
    let Some(csv) = csv else {
        return Ok(bot_ids().iter().map(|id| id.to_string()).collect());
    };
    let known = bot_ids();
    let mut resolved = Vec::new();
    for raw in csv.split(',') {
        let id = raw.trim();
        if id.is_empty() {
            continue;
        }
        if !known.contains(&id) {
            return Err(anyhow!("unknown bot '{id}'. available: {}", known.join(", ")));
        }
        resolved.push(id.to_string());
    }
    if resolved.is_empty() {
        return Err(anyhow!("empty bot list"));
    }
    Ok(resolved)
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let pairs: Vec<(String, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.clone(), *seed)))
        .collect();

    let run_one = |(bot_id, seed): &(String, u32)| -> Result<RunArtifact> {
        run_bot(bot_id, *seed, config.max_ticks)
            .with_context(|| format!("run failed for bot={bot_id} seed={}", seed_to_hex(*seed)))
    };

    let results: Vec<Result<RunArtifact>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| pairs.par_iter().map(run_one).collect())
    } else {
        pairs.par_iter().map(run_one).collect()
    };

    let mut artifacts = Vec::with_capacity(results.len());
    for result in results {
        artifacts.push(result?);
    }

    let bot_rankings = rank_bots(&config.bots, &artifacts, config.max_ticks);
    let saved_tapes = save_top_tapes(&config, &artifacts)?;

    let report = BenchmarkReport {
        max_ticks: config.max_ticks,
        run_count: artifacts.len(),
        jobs: config.jobs,
        bot_rankings,
        saved_tapes,
        runs: artifacts
            .iter()
            .map(|artifact| artifact.metrics.clone())
            .collect(),
    };

    let report_path = config.out_dir.join("report.json");
    let encoded = serde_json::to_vec_pretty(&report).context("failed encoding report")?;
    fs::write(&report_path, encoded)
        .with_context(|| format!("failed writing {}", report_path.display()))?;

    Ok(report)
}

fn rank_bots(bots: &[String], artifacts: &[RunArtifact], max_ticks: u32) -> Vec<BotRanking> {
    let mut rankings: Vec<BotRanking> = bots
        .iter()
        .map(|bot_id| {
            let runs: Vec<&RunMetrics> = artifacts
                .iter()
                .map(|artifact| &artifact.metrics)
                .filter(|metrics| &metrics.bot_id == bot_id)
                .collect();
            let count = runs.len().max(1) as f64;

            let crashes = runs
                .iter()
                .filter(|m| m.game_over_reason.as_deref().is_some_and(is_crash))
                .count();
            let fuel_outs = runs
                .iter()
                .filter(|m| m.game_over_reason.as_deref().is_some_and(is_fuel_out))
                .count();
            let survived = runs
                .iter()
                .filter(|m| !m.game_over && m.tick_count == max_ticks)
                .count();

            BotRanking {
                bot_id: bot_id.clone(),
                runs: runs.len(),
                avg_distance: runs.iter().map(|m| m.final_distance).sum::<f64>() / count,
                max_distance: runs
                    .iter()
                    .map(|m| m.final_distance_units)
                    .max()
                    .unwrap_or(0),
                avg_ticks: runs.iter().map(|m| f64::from(m.tick_count)).sum::<f64>() / count,
                avg_refuels: runs.iter().map(|m| f64::from(m.refuels)).sum::<f64>() / count,
                crash_rate: crashes as f64 / count,
                fuel_out_rate: fuel_outs as f64 / count,
                survival_rate: survived as f64 / count,
            }
        })
        .collect();

    rankings.sort_by(|a, b| b.avg_distance.total_cmp(&a.avg_distance));
    rankings
}

fn save_top_tapes(
    config: &BenchmarkConfig,
    artifacts: &[RunArtifact],
) -> Result<Vec<SavedTapeRecord>> {
    let mut by_distance: Vec<&RunArtifact> = artifacts.iter().collect();
    by_distance.sort_by(|a, b| {
        b.metrics
            .final_distance_units
            .cmp(&a.metrics.final_distance_units)
    });

    let mut saved = Vec::new();
    for (index, artifact) in by_distance.iter().take(config.save_top).enumerate() {
        let metrics = &artifact.metrics;
        let file_name = format!(
            "{}-seed{:08x}-dist{}-ticks{}.tape",
            metrics.bot_id, metrics.seed, metrics.final_distance_units, metrics.tick_count
        );
        let path = config.out_dir.join(&file_name);
        write_tape(&path, &artifact.tape)?;
        saved.push(SavedTapeRecord {
            rank: index + 1,
            bot_id: metrics.bot_id.clone(),
            seed_hex: seed_to_hex(metrics.seed),
            distance: metrics.final_distance_units,
            ticks: metrics.tick_count,
            path: path.display().to_string(),
        });
    }
    Ok(saved)
}
