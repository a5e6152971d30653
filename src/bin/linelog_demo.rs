//! Linelog demo
//!
//! Prints a short log with a status line, a progress bar and a message that
//! grows on update, redrawing each in place.
//!
//! ```bash
//! # Live on the terminal
//! linelog-demo
//!
//! # Replay into an in-memory screen and print what it shows
//! linelog-demo --headless --rows 12
//! linelog-demo --headless --json
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use linelog::headless::Screen;
use linelog::{term, Config, Session, Value};

#[derive(Parser, Debug)]
#[command(name = "linelog-demo")]
#[command(version)]
#[command(about = "Demonstrates in-place redraw of printed log lines", long_about = None)]
struct Args {
    /// Path to a config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Wrap column, overriding the config
    #[arg(short, long, value_name = "COLS")]
    width: Option<usize>,

    /// Disable colors
    #[arg(long)]
    no_color: bool,

    /// Replay into an in-memory screen instead of the terminal
    #[arg(long)]
    headless: bool,

    /// Screen rows in headless mode
    #[arg(long, value_name = "ROWS", default_value_t = 24)]
    rows: usize,

    /// Print the headless screen as a JSON snapshot
    #[arg(long, requires = "headless")]
    json: bool,

    /// Delay between steps in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 150)]
    delay: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load_or_default(),
    };
    if let Some(width) = args.width {
        config.message_width = width;
    }
    if args.no_color {
        config.color = false;
    }
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let result = if args.headless {
        run_headless(&args, config)
    } else {
        run_live(&args, config)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Demo failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_live(args: &Args, config: Config) -> linelog::Result<()> {
    let (row, col) = term::query_cursor_position();
    tracing::debug!(row, col, "starting position");

    let session = Session::stdio(config);
    let delay = Duration::from_millis(args.delay);
    script(&session, || thread::sleep(delay))
}

fn run_headless(args: &Args, config: Config) -> linelog::Result<()> {
    let cols = config.message_width;
    let session = Session::new(Vec::new(), io::empty(), config);
    script(&session, || {})?;

    let mut screen = Screen::new(cols, args.rows);
    screen.feed_bytes(&session.into_output());
    let snapshot = screen.snapshot();

    if args.json {
        let json = snapshot
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        println!("{}", json);
    } else {
        print!("{}", snapshot.to_text());
    }
    Ok(())
}

fn script<W, R>(session: &Session<W, R>, mut pause: impl FnMut()) -> linelog::Result<()>
where
    W: io::Write,
    R: io::BufRead,
{
    session.info("Preparing workspace")?;
    let status = session.status("Resolving packages...")?;
    let note = session.warn("cache is cold")?;
    pause();

    let steps = ["fetch", "unpack", "verify", "install"];
    let bar = session.progress("starting")?;
    for (i, step) in steps.iter().enumerate() {
        pause();
        session.set_progress(bar, (i + 1) * 100 / steps.len(), step)?;
        session.log_fmt(
            linelog::Category::Debug,
            "step {} of {}: {}",
            &[Value::from(i + 1), Value::from(steps.len()), Value::from(*step)],
        )?;
    }

    pause();
    session.update(status, "Resolved 4 packages")?;
    // Grows past one row, so everything below it moves down
    session.update(
        note,
        "cache was cold: every package was downloaded from the registry, \
         later runs reuse the local copies",
    )?;
    session.info("Done")?;
    Ok(())
}
