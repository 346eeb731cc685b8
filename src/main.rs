//! Midnight Dial CLI
//!
//! Usage:
//!   midnight-dial --glyphs "🙂 ✨ 🔥"            # Single evaluation
//!   midnight-dial --interactive                 # Dial in the terminal
//!   midnight-dial --serve                       # HTTP API server
//!   midnight-dial --catalog                     # List the dial
//!   midnight-dial --glyphs "1 6 8" --json       # JSON output

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::sleep;
use tracing::debug;

use midnight_dial::config::DialConfig;
use midnight_dial::core::{run_server, DialDriver, ResponseEvaluator};
use midnight_dial::types::{
    parse_sequence, resolve_token, DialOutput, Evaluation, MoodCategory, ReasonCode, CATALOG,
};
use midnight_dial::{logging, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "midnight-dial",
    version = VERSION,
    about = "Midnight Dial - dial your mood, get a late-night answer",
    long_about = "Midnight Dial is a rotary mood dial.\n\n\
                  Dial up to five symbols. After three, the line may pick up\n\
                  at any moment; after five it always does. A moment of\n\
                  connecting later, an answer comes back.\n\n\
                  Modes:\n  \
                  --glyphs       Answer a line at once\n  \
                  --interactive  Dial in the terminal (slot numbers, glyphs or labels)\n  \
                  --serve        HTTP API server mode\n  \
                  --catalog      List the dial\n\n\
                  Moods:\n  \
                  CHAOTIC   - two or more dizzy symbols\n  \
                  POSITIVE  - positives outweigh negatives by two\n  \
                  NEGATIVE  - negatives outweigh positives by two\n  \
                  NEUTRAL   - anything else"
)]
struct Args {
    /// Symbols to evaluate (glyphs, slot numbers or labels)
    #[arg(short, long)]
    glyphs: Option<String>,

    /// Interactive mode - dial from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// List the dial symbols
    #[arg(long)]
    catalog: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// TOML file with dial tuning
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show tally and every dial transition
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = match &args.config {
        Some(path) => DialConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DialConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    debug!(?config, "dial configuration");

    if args.catalog {
        run_catalog(&args)
    } else if args.serve {
        run_serve(&args, config).await
    } else if let Some(ref line) = args.glyphs {
        run_single(line, &args, &config)
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args, config).await
    }
}

/// Print the dial
fn run_catalog(args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&CATALOG[..])?);
        return Ok(());
    }

    for symbol in CATALOG.iter() {
        println!(
            "  {}  {}  {:<10} {}",
            symbol.slot,
            symbol.glyph,
            symbol.label,
            symbol.category.to_string().color(symbol.category.color())
        );
    }
    Ok(())
}

/// Run single line evaluation
fn run_single(line: &str, args: &Args, config: &DialConfig) -> Result<()> {
    let glyphs = parse_sequence(line);
    let mut rng = config.rng();
    let evaluation = ResponseEvaluator::new().evaluate(&glyphs, &mut rng);

    if args.json {
        #[derive(serde::Serialize)]
        struct SingleOutput<'a> {
            glyphs: &'a [String],
            #[serde(flatten)]
            evaluation: &'a Evaluation,
        }
        let output = SingleOutput {
            glyphs: &glyphs,
            evaluation: &evaluation,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if args.verbose {
        print_tally(&glyphs, &evaluation);
    }
    print_answer(&evaluation.message, evaluation.category);
    Ok(())
}

/// Run interactive dialing
async fn run_interactive(args: &Args, config: DialConfig) -> Result<()> {
    let driver = DialDriver::from_config(config)?;

    print_header();
    println!("Dial with slot numbers, glyphs or labels (e.g. '1', '🔥', 'rain', '1 6 8').");
    println!("'hangup' to start over, 'quit' to exit.");
    println!();
    if !args.json {
        println!("{}", driver.snapshot().await.to_terminal_string());
    }

    let printer = {
        let mut rx = driver.subscribe();
        let json = args.json;
        let verbose = args.verbose;
        let no_color = args.no_color;
        tokio::spawn(async move {
            while let Ok(update) = rx.recv().await {
                print_update(&update, json, verbose, no_color);
            }
        })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut strokes = 0u64;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("hangup") || line.eq_ignore_ascii_case("reset") {
            driver.reset().await;
            continue;
        }
        if line.eq_ignore_ascii_case("status") {
            let snapshot = driver.snapshot().await;
            print_update(&snapshot, args.json, true, args.no_color);
            continue;
        }

        let mut symbols = Vec::new();
        for token in line.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
            match resolve_token(token) {
                Some(run) => symbols.extend(run),
                None => println!("{}", format!("  ⚠ '{}' is not on the dial", token).yellow()),
            }
        }

        for symbol in symbols {
            match driver.dial(symbol).await {
                Ok(started) => {
                    strokes += 1;
                    // let the dial come back before the next symbol
                    sleep(started.plan.total()).await;
                }
                Err(reason) => {
                    println!("{}", format!("  ⚠ {}", reason.description()).yellow());
                    break;
                }
            }
        }
    }

    printer.abort();
    println!("\nLine closed. Strokes: {}", strokes);
    Ok(())
}

/// Run HTTP API server
async fn run_serve(args: &Args, config: DialConfig) -> Result<()> {
    println!();
    println!("╔═══════════════════════════════════════════╗");
    println!("║  ☎️  Midnight Dial API Server               ║");
    println!("║  Version: {:<32}║", VERSION);
    println!("╚═══════════════════════════════════════════╝");
    println!();

    run_server(&args.addr, config)
        .await
        .with_context(|| format!("serving on {}", args.addr))
}

/// Print header
fn print_header() {
    println!("{}", "╔═══════════════════════════════════════════╗".bold());
    println!("{}", format!("║       Midnight Dial v{:<21}║", VERSION).bold());
    println!("{}", "╚═══════════════════════════════════════════╝".bold());
    println!();
}

/// Print one dial transition
fn print_update(update: &DialOutput, json: bool, verbose: bool, no_color: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(update) {
            println!("{}", line);
        }
        return;
    }

    let shown = verbose
        || !matches!(
            update.reason,
            ReasonCode::D003_STROKE_STARTED | ReasonCode::D003_STROKE_RELEASED
        );
    if !shown {
        return;
    }

    if no_color {
        println!("{}", update.to_parseable_string());
    } else {
        println!("{}", update.to_terminal_string());
    }

    if update.reason == ReasonCode::D004_RESULT_APPLIED {
        if let Some(response) = &update.response {
            let category = ResponseEvaluator::new().categorize(&update.glyphs);
            print_answer(response, category);
            println!("  (type 'hangup' to dial again)");
        }
    }
}

/// Print the answer card
fn print_answer(message: &str, category: Option<MoodCategory>) {
    let color = category.map(|c| c.color()).unwrap_or(colored::Color::BrightBlack);
    println!();
    println!("  {}", "┌──────────────────────────────".color(color));
    println!("  {} {}", "│".color(color), message.italic());
    println!("  {}", "└──────────────────────────────".color(color));
    println!();
}

/// Print the tally behind an answer
fn print_tally(glyphs: &[String], evaluation: &Evaluation) {
    let mood = evaluation
        .category
        .map(|c| c.to_string())
        .unwrap_or_else(|| "silent".to_string());
    println!("┌─────────────────────────────────────");
    println!("│ Dialed: {}", glyphs.join(" "));
    println!(
        "│ Recognized: {} | score={} | chaotic={}",
        evaluation.tally.classified, evaluation.tally.score, evaluation.tally.chaotic_count
    );
    println!("│ Mood: {}", mood);
    println!("└─────────────────────────────────────");
}
