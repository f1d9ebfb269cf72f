//! Amida lottery CLI
//!
//! Draw a ghost-leg lottery, render it, export it, or audit the generator.

use amida_core::{
    generate, DiagramLayout, LayoutConfig, LotteryConfig, PairingHistogram, Roster, SvgRenderer,
    TextRenderer,
};
use amida_env::{entropy_seed, RandomSource, RunId, ThreadRandom};
use amida_sim::scenarios::ScenarioId;
use amida_sim::{derive_seed, LotteryExport, RerunLogger, ScenarioResult, ScenarioRunner, SeededRandom};
use clap::Parser;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Ghost-leg (Amidakuji) lottery
#[derive(Parser, Debug)]
#[command(name = "amida")]
#[command(about = "Pair participants with results through a random ghost-leg grid", long_about = None)]
struct Args {
    /// Participant names (repeat the flag or separate with commas)
    #[arg(short, long, visible_alias = "participant", value_delimiter = ',')]
    participants: Vec<String>,

    /// Result labels, in track order (repeat the flag or separate with commas)
    #[arg(short, long, visible_alias = "result", value_delimiter = ',')]
    results: Vec<String>,

    /// Seed for a reproducible draw (0 = fresh seed from OS entropy)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Number of horizontal levels
    #[arg(short = 'H', long, default_value = "10")]
    height: usize,

    /// Probability that an eligible slot gets a connector
    #[arg(short, long, default_value = "0.3")]
    density: f64,

    /// Draw even when participant and result counts differ
    #[arg(long)]
    lenient: bool,

    /// Print the run as JSON instead of a diagram
    #[arg(long)]
    json: bool,

    /// Skip the text diagram
    #[arg(long)]
    no_diagram: bool,

    /// Columns between tracks in the text diagram
    #[arg(long, default_value = "8")]
    cell_width: usize,

    /// Write the run to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Write the diagram to an SVG file
    #[arg(long)]
    svg: Option<String>,

    /// Canvas width in pixels for the SVG and Rerun diagrams
    #[arg(long, default_value = "600")]
    canvas_width: f64,

    /// Canvas height in pixels for the SVG and Rerun diagrams
    #[arg(long, default_value = "400")]
    canvas_height: f64,

    /// Stream the diagram to the Rerun viewer
    #[arg(long)]
    rerun: bool,

    /// Draw this many times and print the start -> destination histogram
    #[arg(long)]
    trials: Option<u64>,

    /// Audit the generator (bijection, height_zero, adjacency, single, mismatch, determinism, two_track, fairness, all)
    #[arg(long)]
    audit: Option<String>,

    /// Number of master seeds to audit
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Trials per audit scenario
    #[arg(long, default_value = "200")]
    audit_trials: u64,

    /// Largest participant count sampled by the audit
    #[arg(long, default_value = "12")]
    max_tracks: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if let Some(audit) = &args.audit {
        run_audit(&args, audit);
        return;
    }

    // Collect entries the way the form would: blank slots dropped, names trimmed
    let roster = Roster::from_entries(args.participants.clone(), args.results.clone());
    let entries = if args.lenient {
        let entries = roster.entries();
        if entries.participants.is_empty() {
            error!("Enter at least one participant");
            std::process::exit(1);
        }
        entries
    } else {
        match roster.validate() {
            Ok(entries) => entries,
            Err(e) => {
                error!("{}", e);
                error!("Pass --lenient to draw with mismatched counts");
                std::process::exit(1);
            }
        }
    };

    let config = LotteryConfig::default()
        .with_height(args.height)
        .with_density(args.density);
    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    let canvas = LayoutConfig {
        width: args.canvas_width,
        height: args.canvas_height,
        ..LayoutConfig::default()
    };

    let base_seed = resolve_seed(args.seed);

    if let Some(trials) = args.trials {
        run_histogram(&entries.participants, &entries.results, &config, base_seed, trials);
        return;
    }

    let mut rng: Box<dyn RandomSource> = match base_seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom::new()),
    };
    let draw = generate(&entries.participants, &entries.results, &config, &mut rng);
    debug!("{} connectors over {} levels", draw.lines.len(), draw.height);

    for advisory in &draw.advisories {
        warn!("{}", advisory);
    }

    let run_id = match base_seed {
        Some(seed) => RunId::from_seed(seed),
        None => RunId::new(),
    };
    let export = LotteryExport::new(
        run_id,
        rng.seed(),
        config,
        entries.participants,
        entries.results,
        draw,
    );

    if args.json {
        match export.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize run: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("Run {} (seed={})", export.run_id, export.seed);
        if !args.no_diagram {
            print!("{}", TextRenderer::with_cell_width(args.cell_width).render(&export.draw));
            println!();
        }
        println!("Result:");
        for line in export.draw.summary() {
            println!("  {}", line);
        }
    }

    let mut failed = false;

    if let Some(path) = &args.export {
        match export.write_to_file(path) {
            Ok(()) => info!("Exported run to {}", path),
            Err(e) => {
                error!("Failed to write export: {}", e);
                failed = true;
            }
        }
    }

    if let Some(path) = &args.svg {
        let svg = SvgRenderer::new(canvas).render(&export.draw);
        match std::fs::write(path, svg) {
            Ok(()) => info!("Wrote diagram to {}", path),
            Err(e) => {
                error!("Failed to write SVG: {}", e);
                failed = true;
            }
        }
    }

    if args.rerun {
        let logger = RerunLogger::new("amida");
        if logger.is_enabled() {
            let layout = DiagramLayout::for_draw(canvas, &export.draw);
            logger.log_draw(&export.draw, &layout);
            for advisory in &export.draw.advisories {
                logger.log_event("lottery/advisories", &advisory.to_string());
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Turns the `--seed` flag into a concrete seed.
///
/// Zero asks for a fresh seed; if the OS cannot provide one the run falls
/// back to the unseeded thread RNG and cannot be replayed.
fn resolve_seed(seed: u64) -> Option<u64> {
    if seed != 0 {
        return Some(seed);
    }
    match entropy_seed() {
        Ok(seed) => {
            debug!("Drew fresh seed {}", seed);
            Some(seed)
        }
        Err(e) => {
            warn!("{}; falling back to an unseeded draw", e);
            None
        }
    }
}

/// Draws `trials` times and prints how often each participant landed on each result.
fn run_histogram(
    participants: &[String],
    results: &[String],
    config: &LotteryConfig,
    base_seed: Option<u64>,
    trials: u64,
) {
    let mut histogram = PairingHistogram::new(participants.len());
    let mut fallback = ThreadRandom::new();

    for trial in 0..trials {
        let draw = match base_seed {
            Some(seed) => generate(participants, results, config, &mut SeededRandom::new(derive_seed(seed, trial))),
            None => generate(participants, results, config, &mut fallback),
        };
        histogram.record(&draw);
    }

    info!(
        "{} draws, height {}, density {} (seed={})",
        histogram.trials(),
        config.height,
        config.density,
        base_seed.unwrap_or(0)
    );

    let width = participants
        .iter()
        .chain(results.iter())
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(6, 12);

    print!("{:>width$}", "", width = width);
    for t in 0..participants.len() {
        let label = results
            .get(t)
            .cloned()
            .unwrap_or_else(|| amida_core::lottery::out_of_range_label(t));
        print!(" {:>width$}", truncate(&label, width), width = width);
    }
    println!();
    for (start, name) in participants.iter().enumerate() {
        print!("{:>width$}", truncate(name, width), width = width);
        for destination in 0..participants.len() {
            let pct = histogram.probability(start, destination) * 100.0;
            print!(" {:>width$.1}", pct, width = width - 1);
            print!("%");
        }
        println!();
    }
    println!();
    println!("chi-squared:       {:.2}", histogram.chi_squared());
    println!("max deviation:     {:.1}%", histogram.max_deviation() * 100.0);
    println!(
        "keep own track:    {:.1}% (uniform {:.1}%)",
        histogram.fixed_point_rate() * 100.0,
        100.0 / participants.len().max(1) as f64
    );
}

fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

/// Runs audit scenarios across one or more master seeds.
fn run_audit(args: &Args, audit: &str) {
    let scenarios: Vec<ScenarioId> = if audit == "all" {
        ScenarioId::all()
    } else {
        match audit.parse() {
            Ok(id) => vec![id],
            Err(e) => {
                error!("{}", e);
                error!("Available scenarios: bijection, height_zero, adjacency, single, mismatch, determinism, two_track, fairness, all");
                std::process::exit(1);
            }
        }
    };

    let base_seed = resolve_seed(args.seed).unwrap_or(42);

    if !args.json {
        info!("Amida audit v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let mut all_results: Vec<ScenarioResult> = Vec::new();

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = ScenarioRunner::new(seed)
            .with_trials(args.audit_trials)
            .with_max_tracks(args.max_tracks)
            .with_max_height(args.height.max(1));

        for scenario in &scenarios {
            let result = runner.run(*scenario);

            if !args.json {
                if result.passed {
                    info!("✓ {} (seed={}) PASSED in {} trials", scenario.name(), seed, result.trials);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            all_results.push(result);
        }
    }

    let total = all_results.len();
    let failed: Vec<&ScenarioResult> = all_results.iter().filter(|r| !r.passed).collect();

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": total - failed.len(),
            "failed": failed.len(),
            "results": all_results,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize audit summary: {}", e),
        }
    } else {
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        if failed.is_empty() {
            info!("All {} scenario runs passed", total);
        } else {
            error!("{}/{} scenario runs failed", failed.len(), total);
            for result in &failed {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario.name(),
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    if !failed.is_empty() {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_accept_repeated_and_comma_separated_flags() {
        let args = Args::try_parse_from([
            "amida",
            "--participant",
            "Aki",
            "-p",
            "Ben,Chie",
            "--result",
            "Gold",
            "--results",
            "Silver,Bronze",
        ])
        .unwrap();

        assert_eq!(args.participants, vec!["Aki", "Ben", "Chie"]);
        assert_eq!(args.results, vec!["Gold", "Silver", "Bronze"]);
    }

    #[test]
    fn test_canvas_defaults_match_layout() {
        let args = Args::try_parse_from(["amida", "-p", "A", "-r", "X"]).unwrap();
        let layout = LayoutConfig::default();
        assert_eq!(args.canvas_width, layout.width);
        assert_eq!(args.canvas_height, layout.height);

        let args = Args::try_parse_from(["amida", "--canvas-width", "800", "--canvas-height", "300"]).unwrap();
        assert_eq!((args.canvas_width, args.canvas_height), (800.0, 300.0));
    }
}
