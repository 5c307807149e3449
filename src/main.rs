//! Plinko Fair CLI
//!
//! Runs rounds, computes commitments and verifies published rounds from
//! their revealed seed material.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use plinko_fair::{
    VERSION,
    game::GameConfig,
    proof::{commit, verify_commit, verify_seed_material, verify_transcript},
    round::RoundLedger,
    DeterministicRng, compute_outcome,
};

/// Provably fair Plinko engine.
#[derive(Parser)]
#[command(name = "plinko-fair")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full round (commit, start, reveal) and verify it
    Demo {
        /// Column choice
        #[arg(short, long)]
        column: Option<usize>,

        /// Player input (generated if omitted)
        #[arg(short, long)]
        player_input: Option<String>,
    },

    /// Compute a commit digest
    Commit {
        /// Operator secret
        #[arg(long)]
        secret: String,

        /// Round nonce
        #[arg(long)]
        nonce: String,
    },

    /// Recompute a round from revealed seed material
    Verify {
        /// Operator secret (revealed)
        #[arg(long)]
        secret: String,

        /// Player input
        #[arg(long)]
        player_input: String,

        /// Round nonce
        #[arg(long)]
        nonce: String,

        /// Column choice
        #[arg(long)]
        column: usize,

        /// Published commit digest to check
        #[arg(long)]
        commit: Option<String>,

        /// Published board fingerprint to check
        #[arg(long)]
        fingerprint: Option<String>,

        /// Published landing index to check
        #[arg(long)]
        landing: Option<usize>,
    },

    /// Estimate the return empirically over many seeded rounds
    Rtp {
        /// Number of rounds
        #[arg(short, long, default_value_t = 100_000)]
        rounds: u32,

        /// Column choice
        #[arg(short, long)]
        column: Option<usize>,

        /// Seed for generating combined seeds
        #[arg(long, default_value_t = 12345)]
        seed: u32,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let cli = Cli::parse();
    let config = GameConfig::from_env().context("loading game config")?;

    info!("Plinko Fair v{}", VERSION);

    match cli.command {
        Commands::Demo { column, player_input } => demo_round(config, column, player_input),
        Commands::Commit { secret, nonce } => {
            println!("{}", commit(&secret, &nonce)?);
            Ok(())
        }
        Commands::Verify {
            secret,
            player_input,
            nonce,
            column,
            commit: commit_digest,
            fingerprint,
            landing,
        } => {
            let report = verify_seed_material(
                &secret,
                &player_input,
                &nonce,
                column,
                config.rows,
                config.center_column,
            )?;
            println!("{}", serde_json::to_string_pretty(&report)?);

            let mut ok = true;
            if let Some(digest) = commit_digest {
                ok &= check("commit digest", verify_commit(&digest, &secret, &nonce));
            }
            if let Some(fp) = fingerprint {
                ok &= check("board fingerprint", fp == report.board_fingerprint);
            }
            if let Some(idx) = landing {
                ok &= check("landing index", idx == report.landing_index);
            }
            if !ok {
                bail!("round does not verify");
            }
            Ok(())
        }
        Commands::Rtp { rounds, column, seed } => {
            estimate_return(&config, rounds, column.unwrap_or(config.center_column), seed)
        }
    }
}

fn check(what: &str, matched: bool) -> bool {
    if matched {
        info!("{}: MATCH", what);
    } else {
        warn!("{}: MISMATCH", what);
    }
    matched
}

/// Demo: run one round through the whole lifecycle.
fn demo_round(config: GameConfig, column: Option<usize>, player_input: Option<String>) -> Result<()> {
    info!("=== Starting Demo Round ===");

    let column = column.unwrap_or(config.center_column);
    let mut ledger = RoundLedger::new(config);

    let (id, commitment) = ledger.create_round()?;
    info!("Round ID: {}", id);
    info!("Commit digest (published): {}", commitment.commit_digest);
    info!("Round nonce: {}", commitment.round_nonce);

    let result = ledger.start_round(id, player_input, column)?;
    info!("Player input: {}", result.player_input);
    info!("Board fingerprint: {}", result.board_fingerprint);
    for step in result.path.steps() {
        info!(
            "Row {:2}: peg {:2} bias {:.6} -> {:.6}, draw {:.6} {:?}",
            step.row, step.peg_index, step.left_bias, step.adjusted_bias, step.draw, step.direction
        );
    }
    info!("Landed in bucket {} (x{})", result.landing_index, result.multiplier);

    let transcript = ledger.reveal_round(id)?;
    println!("{}", transcript.to_json()?);

    info!("=== Verifying Round ===");
    let verification = verify_transcript(&transcript);
    if verification.valid {
        info!("FAIRNESS VERIFIED: commitment, board, path and payout all match");
        Ok(())
    } else {
        match verification.error {
            Some(e) => bail!("verification failed: {}", e),
            None => bail!("verification failed"),
        }
    }
}

/// Simulate many rounds and compare the mean multiplier with the table's
/// theoretical return.
fn estimate_return(config: &GameConfig, rounds: u32, column: usize, seed: u32) -> Result<()> {
    if rounds == 0 {
        bail!("need at least one round");
    }

    let mut seeds = DeterministicRng::new(seed);
    let mut histogram = vec![0u64; config.rows + 1];
    let mut total = 0.0;

    for _ in 0..rounds {
        let words: Vec<u8> = (0..8).flat_map(|_| seeds.next_u32().to_be_bytes()).collect();
        let combined_seed = hex::encode(words);

        let outcome = compute_outcome(&combined_seed, column, config.rows, config.center_column)?;
        histogram[outcome.landing_index] += 1;
        total += config.payout.multiplier_for(outcome.landing_index)?;
    }

    for (bucket, count) in histogram.iter().enumerate() {
        info!(
            "Bucket {:2}: {:8} ({:6.3}%)",
            bucket,
            count,
            *count as f64 * 100.0 / rounds as f64
        );
    }
    info!("Column {}: empirical return {:.4}", column, total / rounds as f64);
    info!("Theoretical return (fair pegs): {:.4}", config.payout.theoretical_return());

    Ok(())
}
