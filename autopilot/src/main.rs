use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use fuelrush_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig};
use fuelrush_autopilot::bots::describe_bots;
use fuelrush_autopilot::runner::{replay_tape_bytes, run_bot, write_tape};
use fuelrush_autopilot::util::{parse_seed, seed_sequence, seed_to_hex};
use fuelrush_core::parse_tape;

#[derive(Parser, Debug)]
#[command(name = "fuelrush-autopilot")]
#[command(about = "Headless driver lab for deterministic fuelrush tape generation and benchmarking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available driver bots
    ListBots,
    /// Run one bot on one seed and record a tape
    Drive {
        #[arg(long)]
        bot: String,
        #[arg(long)]
        seed: String,
        /// Five simulated minutes at 60 Hz
        #[arg(long, default_value_t = 18_000)]
        max_ticks: u32,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Verify an existing tape by replaying it
    Replay {
        #[arg(long)]
        input: PathBuf,
    },
    /// Run a multi-seed sweep across one or more bots
    Benchmark {
        /// Comma-separated bot ids; defaults to the whole roster
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = 18_000)]
        max_ticks: u32,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value_t = 4)]
        save_top: usize,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ListBots => {
            for (id, description) in describe_bots() {
                println!("{id:10} {description}");
            }
        }
        Commands::Drive {
            bot,
            seed,
            max_ticks,
            output,
        } => {
            let seed = parse_seed(&seed)?;
            let artifact = run_bot(&bot, seed, max_ticks)?;
            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "tapes/{}-seed{:08x}-dist{}-ticks{}.tape",
                    bot,
                    seed,
                    artifact.metrics.final_distance_units,
                    artifact.metrics.tick_count
                ))
            });
            write_tape(&output_path, &artifact.tape)?;

            println!("bot={}", artifact.metrics.bot_id);
            println!("seed={}", seed_to_hex(seed));
            println!("ticks={}", artifact.metrics.tick_count);
            println!("distance={:.1}", artifact.metrics.final_distance);
            println!("fuel={:.1}", artifact.metrics.final_fuel);
            println!("refuels={}", artifact.metrics.refuels);
            println!(
                "outcome={}",
                artifact
                    .metrics
                    .game_over_reason
                    .as_deref()
                    .unwrap_or("still driving")
            );
            println!("rng={:#010x}", artifact.metrics.final_rng_state);
            println!("output={}", output_path.display());
        }
        Commands::Replay { input } => {
            let bytes = fs::read(&input)?;
            let tape = parse_tape(&bytes)?;
            let outcome = replay_tape_bytes(&bytes)?;
            println!("input={}", input.display());
            println!("seed={}", seed_to_hex(tape.header.seed));
            println!("ticks={}", outcome.tick_count);
            println!("distance={}", outcome.final_distance_units);
            println!("rng={:#010x}", outcome.final_rng_state);
            println!("game_over={}", outcome.game_over);
            println!("verified=true");
        }
        Commands::Benchmark {
            bots,
            seed_start,
            seed_count,
            max_ticks,
            out_dir,
            save_top,
            jobs,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            let start = match seed_start {
                Some(value) => parse_seed(&value)?,
                None => 0xA57E_0001,
            };
            let seeds = seed_sequence(start, seed_count);
            let out_dir =
                out_dir.unwrap_or_else(|| PathBuf::from(format!("benchmarks/{}", timestamp_suffix())));

            let report = run_benchmark(BenchmarkConfig {
                bots,
                seeds,
                max_ticks,
                out_dir: out_dir.clone(),
                save_top,
                jobs,
            })?;

            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("bots:");
            for (index, bot) in report.bot_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  avg_dist={:.1} max_dist={} avg_ticks={:.1} avg_refuels={:.2} crash={:.0}% fuel_out={:.0}% survived={:.0}%",
                    index + 1,
                    bot.bot_id,
                    bot.avg_distance,
                    bot.max_distance,
                    bot.avg_ticks,
                    bot.avg_refuels,
                    bot.crash_rate * 100.0,
                    bot.fuel_out_rate * 100.0,
                    bot.survival_rate * 100.0,
                );
            }
            println!("saved tapes:");
            for tape in &report.saved_tapes {
                println!(
                    "  #{:02} {} {} dist={} ticks={}",
                    tape.rank, tape.bot_id, tape.seed_hex, tape.distance, tape.ticks
                );
            }
        }
    }

    Ok(())
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
