mod debug_log;

use clap::{Args, Parser, Subcommand};
use crossterm::event::KeyCode;
use debug_log::{dbg_log, DebugLogger, DEBUG_LOG_PATH};
use fractree::{
    Canvas, DrawConfig, FractalConfig, FractalError, FractalGenerator, JsonLines, LineRenderer,
    Point, Result, Rgb, Settings, Terminal, TreeOverrides, TreeStats,
};
use rand::prelude::*;
use std::io::{self, BufWriter};
use std::process::ExitCode;

/// Fallback surface when stdout is not a terminal
const PRINT_SIZE: (u16, u16) = (80, 40);
const LABEL_COLOR: Rgb = Rgb::new(128, 128, 128);

#[derive(Parser)]
#[command(name = "fractree")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "fractree: colorful recursive fractal trees drawn with turtle pen commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Tree shape and color flags shared by every subcommand
#[derive(Args, Clone)]
struct TreeArgs {
    /// Recursion depth (default: 7)
    #[arg(short, long, allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Trunk length in turtle units (default: 2.0)
    #[arg(short = 'L', long, allow_negative_numbers = true)]
    length: Option<f64>,

    /// Branch angle in degrees (default: 30)
    #[arg(short, long, allow_negative_numbers = true)]
    angle: Option<f64>,

    /// Color scheme: classic, autumn, winter, spring, fire, random (default: classic)
    #[arg(short, long)]
    color: Option<String>,

    /// Use rainbow colors
    #[arg(short, long)]
    rainbow: bool,

    /// Add middle branches for a denser tree
    #[arg(short, long)]
    middle_branch: bool,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Trunk base x in turtle units (default: 5.5)
    #[arg(long, allow_negative_numbers = true)]
    origin_x: Option<f64>,

    /// Trunk base y in turtle units (default: 0.5)
    #[arg(long, allow_negative_numbers = true)]
    origin_y: Option<f64>,

    /// Write a debug log to /tmp/fractree.log
    #[arg(long)]
    debug: bool,
}

impl TreeArgs {
    fn overrides(&self) -> TreeOverrides {
        TreeOverrides {
            depth: self.depth,
            length: self.length,
            angle: self.angle,
            color: self.color.clone(),
            rainbow: self.rainbow,
            middle_branch: self.middle_branch,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a fractal tree in the terminal
    Draw {
        #[command(flatten)]
        tree: TreeArgs,

        /// Show the tree growing branch by branch
        #[arg(short, long)]
        live: bool,

        /// Print tree to stdout (no interactive display)
        #[arg(short, long)]
        print: bool,

        /// Keep generating trees infinitely
        #[arg(short, long)]
        infinite: bool,

        /// Delay per pen command in live mode, in seconds (default: 0.015)
        #[arg(short, long)]
        time: Option<f32>,

        /// Wait time between trees in infinite mode, in seconds (default: 4.0)
        #[arg(short, long)]
        wait: Option<f64>,
    },

    /// Write the pen command stream to stdout as JSON lines
    Dump {
        #[command(flatten)]
        tree: TreeArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) | Err(FractalError::Interrupted) => ExitCode::SUCCESS,
        Err(err @ FractalError::Config(_)) => {
            eprintln!("error: {}", err);
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;

    match cli.command {
        Commands::Draw {
            tree,
            live,
            print,
            infinite,
            time,
            wait,
        } => {
            let config = FractalConfig::from_options(&settings.tree_options(&tree.overrides()))?;
            let (x, y) = settings.origin(tree.origin_x, tree.origin_y);
            let draw = DrawConfig {
                live: live && !print,
                print,
                infinite,
                time_step: settings.time_step(time)?,
                time_wait: settings.time_wait(wait)?,
                seed: tree.seed,
                debug: tree.debug,
            };
            let mut log = open_logger(draw.debug);
            dbg_log!(log, "Settings file: {}", Settings::config_path().display());

            if draw.print {
                run_print_mode(&config, &draw, Point::new(x, y), &mut log)
            } else {
                run_interactive(&config, &draw, Point::new(x, y), &mut log)
            }
        }
        Commands::Dump { tree } => {
            let config = FractalConfig::from_options(&settings.tree_options(&tree.overrides()))?;
            let (x, y) = settings.origin(tree.origin_x, tree.origin_y);
            let mut log = open_logger(tree.debug);
            run_dump(&config, tree.seed.unwrap_or_else(now_seed), Point::new(x, y), &mut log)
        }
    }
}

fn open_logger(debug: bool) -> DebugLogger {
    let log = DebugLogger::new(debug);
    if debug && !log.enabled() {
        eprintln!("warning: cannot open debug log {}", DEBUG_LOG_PATH);
    }
    log
}

fn now_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0) // Fallback seed for misconfigured system clocks
}

/// Draw one seeded tree into `renderer`
fn draw_tree<L: LineRenderer + ?Sized>(
    config: &FractalConfig,
    renderer: &mut L,
    origin: Point,
    seed: u64,
    log: &mut DebugLogger,
) -> Result<TreeStats> {
    dbg_log!(log, "Drawing tree with seed {}: {:?}", seed, config);
    let mut rng = StdRng::seed_from_u64(seed);

    let stats = match FractalGenerator::new(config, &mut rng).run(renderer, origin) {
        Ok(stats) => stats,
        Err(err) => {
            dbg_log!(log, "Draw aborted: {}", err);
            return Err(err);
        }
    };

    dbg_log!(log, "{} segments, {} decorative dots", stats.segments, stats.dots);
    dbg_log!(log, "Colorful fractal tree completed!");
    Ok(stats)
}

fn label(term: &mut Terminal, config: &FractalConfig, seed: u64) {
    let text = format!(
        "fractree depth {} {} {:.0}° seed {}",
        config.max_depth,
        config.color_name(),
        config.branch_angle.to_degrees(),
        seed
    );
    term.set_str(1, 0, &text, Some(LABEL_COLOR));
}

fn run_dump(config: &FractalConfig, seed: u64, origin: Point, log: &mut DebugLogger) -> Result<()> {
    let stdout = io::stdout();
    let mut sink = JsonLines::new(BufWriter::new(stdout.lock()));

    let stats = draw_tree(config, &mut sink, origin, seed, log)?;
    let written = sink.written();
    sink.finish()?;

    eprintln!(
        "Colorful fractal tree completed: {} segments, {} dots, {} commands (seed {})",
        stats.segments, stats.dots, written, seed
    );
    Ok(())
}

fn run_print_mode(config: &FractalConfig, draw: &DrawConfig, origin: Point, log: &mut DebugLogger) -> Result<()> {
    let mut seed = draw.seed.unwrap_or_else(now_seed);

    loop {
        let term = Terminal::new(false).unwrap_or_else(|_| Terminal::headless(PRINT_SIZE.0, PRINT_SIZE.1));
        let mut canvas = Canvas::new(term, false, 0.0);

        let stats = draw_tree(config, &mut canvas, origin, seed, log)?;
        let mut term = canvas.into_terminal();
        label(&mut term, config, seed);
        term.print_to_stdout()?;
        eprintln!(
            "Colorful fractal tree completed: {} segments, {} dots (seed {})",
            stats.segments, stats.dots, seed
        );

        if !draw.infinite {
            break;
        }

        std::thread::sleep(std::time::Duration::from_secs_f64(draw.time_wait));
        seed = now_seed();
    }

    Ok(())
}

fn run_interactive(config: &FractalConfig, draw: &DrawConfig, origin: Point, log: &mut DebugLogger) -> Result<()> {
    let mut seed = draw.seed.unwrap_or_else(now_seed);
    let term = Terminal::new(true)?;
    let mut canvas = Canvas::new(term, draw.live, draw.time_step);

    loop {
        canvas.reset();
        canvas.terminal().clear_screen()?;

        draw_tree(config, &mut canvas, origin, seed, log)?;
        label(canvas.terminal_mut(), config, seed);
        canvas.terminal().render()?;

        if !draw.infinite {
            // Wait for keypress to exit
            loop {
                if let Some(KeyCode::Char('q') | KeyCode::Esc) = canvas.terminal().wait_key(100)? {
                    break;
                }
            }
            break;
        }

        // Infinite mode: wait between trees
        let wait_ms = (draw.time_wait * 1000.0) as u64;
        if let Some(KeyCode::Char('q') | KeyCode::Esc) = canvas.terminal().wait_key(wait_ms)? {
            break;
        }
        seed = now_seed();
    }

    Ok(())
}
