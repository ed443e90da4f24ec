//! padtrace - replay Saturn controller traces
//!
//! Usage: padtrace [OPTIONS] <input>

use anyhow::{Context, bail};
use clap::Parser as ClapParser;
use padtrace::lexer::Lexer;
use padtrace::{DiagnosticReporter, ReplayConfig, Replayer, parse, read_source};
use smpc::ports::PollConfig;
use std::path::PathBuf;
use std::process;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(ClapParser, Debug)]
#[command(name = "padtrace")]
#[command(author = "SMPC-SDK Team")]
#[command(version)]
#[command(
    about = "Replay Saturn controller traces through the virtual port table",
    long_about = None
)]
struct Args {
    /// Trace file to replay
    #[arg(required = true)]
    input: PathBuf,

    /// Forget every virtual port before each poll
    #[arg(long)]
    clear_stale: bool,

    /// Report digital-mode axes for standard pads
    #[arg(long)]
    synthesize_axes: bool,

    /// List virtual ports with nothing connected
    #[arg(long)]
    show_empty: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump the parsed trace (for debugging)
    #[arg(long)]
    dump_trace: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = read_source(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    if args.dump_tokens {
        let tokens = match Lexer::new(&source).into_tokens() {
            Ok(tokens) => tokens,
            Err(err) => {
                reporter.report_error(file_id, &err);
                bail!("could not tokenize {}", filename);
            }
        };
        eprintln!("=== Tokens ===");
        for token in &tokens {
            eprintln!("{:>5}..{:<5} {}", token.span.start, token.span.end, token.kind);
        }
        eprintln!("=== End Tokens ===\n");
    }

    let trace = match parse(&source) {
        Ok(trace) => trace,
        Err(err) => {
            reporter.report_error(file_id, &err);
            bail!("could not parse {}", filename);
        }
    };

    if args.dump_trace {
        eprintln!("=== Trace ===");
        eprintln!("{:#?}", trace);
        eprintln!("=== End Trace ===\n");
    }

    info!(
        file = %filename,
        frames = trace.frames.len(),
        polls = trace.poll_count(),
        "replaying trace"
    );

    let config = ReplayConfig {
        poll: PollConfig {
            clear_stale_slots: args.clear_stale,
        },
        synthesize_axes: args.synthesize_axes,
        show_empty: args.show_empty,
    };

    let mut replayer = Replayer::new(config);
    for frame in trace.polls() {
        println!("{}", replayer.step(frame));
    }

    Ok(())
}
