use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bleu_eval::corpus::{load_references, score_lines};
use bleu_eval::distort::{distortion_curve, DEFAULT_RATIOS};
use bleu_eval::suite::{render_report, run_suite, SuiteFile};
use bleu_eval::{evaluate, BleuConfig, BleuResult};
use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Sentence BLEU scoring against one or more reference translations.
#[derive(Parser, Debug)]
#[command(name = "bleu-eval", version)]
struct Cli {
    /// Highest n-gram order [default: 4, or the suite file's]
    #[arg(long, global = true)]
    max_n: Option<usize>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one candidate
    Score {
        candidate: String,

        /// Reference translation (repeatable)
        #[arg(short, long = "reference", required = true)]
        references: Vec<String>,
    },

    /// Score hypothesis lines against STEM or STEM0, STEM1, ...
    ScoreFile {
        reference_stem: PathBuf,

        /// Hypothesis file; stdin when absent
        #[arg(long)]
        hypothesis: Option<PathBuf>,
    },

    /// Run an evaluation suite from a JSON file with recorded translations
    Suite { path: PathBuf },

    /// Show how the score degrades as candidate tokens are replaced by <unk>
    Distort {
        candidate: String,

        #[arg(short, long = "reference", required = true)]
        references: Vec<String>,

        /// Distortion ratio (repeatable); defaults to 0.1, 0.2, 0.3
        #[arg(long = "ratio")]
        ratios: Vec<f64>,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_result(result: &BleuResult) {
    println!(
        "BLEU = {:.4} ({}), {} (BP={:.4}, hyp_len={}, ref_len={})",
        result.bleu_score,
        result.quality(),
        result.precision_details,
        result.brevity_penalty,
        result.candidate_length,
        result.reference_length
    );
}

/// `--max-n` when given, otherwise `fallback`.
fn resolve_config(max_n: Option<usize>, fallback: BleuConfig) -> Result<BleuConfig> {
    Ok(match max_n {
        Some(max_n) => BleuConfig::new(max_n)?,
        None => fallback,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = resolve_config(cli.max_n, BleuConfig::default())?;

    match cli.command {
        Command::Score {
            candidate,
            references,
        } => {
            let result = evaluate(&candidate, &references, &config)?;
            if cli.json {
                print_json(&result)?;
            } else {
                print_result(&result);
            }
        }

        Command::ScoreFile {
            reference_stem,
            hypothesis,
        } => {
            let references = load_references(&reference_stem)
                .with_context(|| format!("reading references from {}", reference_stem.display()))?;
            info!("loaded {} reference set(s)", references.len());

            let report = match hypothesis {
                Some(path) => {
                    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
                    score_lines(BufReader::new(file), &references, &config)?
                }
                None => score_lines(io::stdin().lock(), &references, &config)?,
            };

            if cli.json {
                print_json(&report)?;
            } else {
                for score in &report.scores {
                    print!("{}\t", score.line);
                    print_result(&score.result);
                }
                for skipped in &report.skipped {
                    println!("{}\tSKIPPED: {}", skipped.line, skipped.reason);
                }
                println!(
                    "average BLEU = {:.4} over {} sentence(s), {} skipped",
                    report.average_bleu(),
                    report.scores.len(),
                    report.skipped.len()
                );
            }
        }

        Command::Suite { path } => {
            let suite = SuiteFile::load(&path).with_context(|| format!("loading suite {}", path.display()))?;
            let config = resolve_config(cli.max_n, suite.config)?;
            let translator = suite.recorded_translator();
            let report = run_suite(&translator, &suite.cases, &config);
            if cli.json {
                print_json(&report)?;
            } else {
                print!("{}", render_report(&report));
            }
        }

        Command::Distort {
            candidate,
            references,
            ratios,
            seed,
        } => {
            let references = bleu_eval::prepare_references(&references)?;
            let ratios = if ratios.is_empty() { DEFAULT_RATIOS.to_vec() } else { ratios };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let curve = distortion_curve(&candidate, &references, &ratios, &config, &mut rng)?;
            if cli.json {
                print_json(&curve)?;
            } else {
                for point in &curve {
                    print!("ratio={:.2}\t", point.ratio);
                    print_result(&point.result);
                    println!("\t{}", point.candidate);
                }
            }
        }
    }

    Ok(())
}
