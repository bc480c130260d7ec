use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::error;

use chinese_wall::dispatcher::HELP;
use chinese_wall::{ChineseWallEngine, Dispatcher, SetupSession, WallConfig, WallResult};

/// Interactive Chinese Wall (Brewer-Nash) access-control simulator.
///
/// Without --config the firms, portfolios and conflict classes are asked for
/// interactively before the command prompt starts.
#[derive(Parser, Debug)]
#[command(name = "chinese-wall", version, about, long_about = None)]
struct Cli {
    /// TOML file describing subjects, objects, portfolios and conflict classes
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("chinese_wall=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chinese_wall=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> WallResult<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    let mut engine = match &cli.config {
        Some(path) => WallConfig::load(path)?.build()?,
        None => setup(&mut input, &mut output)?,
    };

    writeln!(output, "{HELP}")?;
    Dispatcher::new(&mut engine).run(input, output)
}

fn setup<R: BufRead, W: Write>(input: R, output: W) -> WallResult<ChineseWallEngine> {
    SetupSession::new(input, output).run()
}
