//! Seat Layout CLI
//!
//! Usage:
//!   seat-layout [OPTIONS] --width <PX> --height <PX> --players <N>
//!
//! Options:
//!   -s, --seating <NAME>     Requested seating template
//!   -c, --catalog <FILE>     Template catalog (TOML format)
//!   --config <FILE>          Selector configuration (TOML format)
//!   -p, --place <REQUEST>    Extra box to place, e.g. 200x100-300x150@edge
//!   --pair                   Split placed boxes into button pairs
//!   --list                   List the available templates
//!   -h, --help               Print help

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use seat_layout::allocator::{Placement, PlacementRequest};
use seat_layout::geometry::Rect;
use seat_layout::template::{LinearPanel, Seat};
use seat_layout::{
    CatalogError, LayoutResult, LayoutSelector, PlanError, SelectorConfig, Size, TemplateRegistry,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Toml,
}

#[derive(Parser)]
#[command(name = "seat-layout")]
#[command(about = "Lay out a game board and player panels in a window")]
struct Cli {
    /// Window width in pixels
    #[arg(long, default_value_t = 1280)]
    width: i32,

    /// Window height in pixels
    #[arg(long, default_value_t = 800)]
    height: i32,

    /// Number of players
    #[arg(short = 'n', long, default_value_t = 2)]
    players: usize,

    /// Requested seating template
    #[arg(short, long)]
    seating: Option<String>,

    /// Template currently on screen
    #[arg(long)]
    active: Option<String>,

    /// Template catalog file (TOML format)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Selector configuration file (TOML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Panel size in cell units, WxH
    #[arg(long, default_value = "5x3", value_parser = parse_panel)]
    panel: LinearPanel,

    /// Gap around panels and placed boxes
    #[arg(long)]
    margin: Option<i32>,

    /// Board share the size search aims for
    #[arg(long)]
    min_share: Option<f64>,

    /// Preferred board aspect ratio (width / height)
    #[arg(long)]
    aspect: Option<f64>,

    #[arg(long)]
    min_cell: Option<f64>,

    #[arg(long)]
    max_cell: Option<f64>,

    /// Score multiplier for the active template
    #[arg(long)]
    hysteresis: Option<f64>,

    /// Judge the board by area instead of its largest square
    #[arg(long)]
    relaxed: bool,

    /// Extra box to place, SHAPE[/SHAPE][@ALIGN] with SHAPE = WxH or WxH-WxH
    #[arg(short, long)]
    place: Vec<PlacementRequest>,

    /// Keep the aspect ratio of placed boxes
    #[arg(long)]
    keep_aspect: bool,

    /// Grow placed boxes into free space afterwards
    #[arg(long)]
    optimize: bool,

    /// Split every placed box into a pair of buttons
    #[arg(long)]
    pair: bool,

    /// List the available templates and exit
    #[arg(long)]
    list: bool,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_panel(s: &str) -> Result<LinearPanel, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{}'", s))?;
    let width: f64 = w.trim().parse().map_err(|_| format!("invalid width '{}'", w))?;
    let height: f64 = h.trim().parse().map_err(|_| format!("invalid height '{}'", h))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(format!("panel units must be positive, got '{}'", s));
    }
    Ok(LinearPanel::new(width, height))
}

#[derive(Serialize)]
struct PlacedBox {
    request: String,
    placement: Option<Placement>,
    pair: Vec<Rect>,
}

#[derive(Serialize)]
struct Report {
    layout: LayoutResult,
    window: Size,
    panel: Size,
    seats: Vec<Seat>,
    placed: Vec<PlacedBox>,
    regrown: Vec<Rect>,
    board: Option<Rect>,
    spares: Vec<Rect>,
    anomalies: Vec<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "seat_layout=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load catalog
    let registry = match &cli.catalog {
        Some(path) => match TemplateRegistry::from_file(path) {
            Ok(registry) => registry,
            Err(e @ CatalogError::Toml(_)) => {
                let source = fs::read_to_string(path).unwrap_or_default();
                eprintln!("{}", e.format(&source, &path.display().to_string()));
                std::process::exit(1);
            }
            Err(e) => fail(format!("loading catalog '{}': {}", path.display(), e)),
        },
        None => TemplateRegistry::builtin(),
    };

    if cli.list {
        print_templates(&registry);
        return;
    }

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    let window = Size::new(cli.width, cli.height);
    let mut selector = LayoutSelector::new(&registry, config);
    if let Some(active) = &cli.active {
        selector = selector.with_active(active.as_str());
    }
    let mut plan = match selector.plan(cli.players, window, cli.seating.as_deref(), &cli.panel) {
        Ok(plan) => plan,
        Err(e) => fail(e),
    };

    let placed: Vec<PlacedBox> = cli
        .place
        .iter()
        .map(|raw| {
            let request = raw.clone().with_preserve_aspect(cli.keep_aspect);
            let placement = plan.place(&request);
            let pair = match placement {
                Some(p) if cli.pair => {
                    let (first, second) = p.rect.split_pair(plan.allocator.margin());
                    vec![first, second]
                }
                _ => Vec::new(),
            };
            PlacedBox {
                request: describe(raw),
                placement,
                pair,
            }
        })
        .collect();

    let regrown: Vec<Rect> = if cli.optimize {
        plan.allocator.optimize().into_iter().map(|r| r.to).collect()
    } else {
        Vec::new()
    };
    debug!(regrown = regrown.len(), "growth pass done");

    let board = plan.board();
    let report = Report {
        layout: plan.result.clone(),
        window,
        panel: plan.panel,
        seats: plan.seats.clone(),
        placed,
        regrown,
        board,
        spares: plan.allocator.spares().to_vec(),
        anomalies: plan.allocator.anomalies().iter().map(|a| a.to_string()).collect(),
    };

    match cli.format {
        Format::Text => print_report(&report),
        Format::Toml => match toml::to_string_pretty(&report) {
            Ok(text) => print!("{}", text),
            Err(e) => fail(e),
        },
    }
}

fn build_config(cli: &Cli) -> Result<SelectorConfig, PlanError> {
    let mut config = match &cli.config {
        Some(path) => SelectorConfig::from_file(path)?,
        None => SelectorConfig::default(),
    };
    if let Some(margin) = cli.margin {
        config = config.with_margin(margin);
    }
    if let Some(share) = cli.min_share {
        config = config.with_min_board_share(share);
    }
    if let Some(aspect) = cli.aspect {
        config = config.with_preferred_aspect(aspect);
    }
    if cli.min_cell.is_some() || cli.max_cell.is_some() {
        let min = cli.min_cell.unwrap_or(config.min_cell);
        let max = cli.max_cell.unwrap_or(config.max_cell);
        config = config.with_cell_range(min, max);
    }
    if let Some(hysteresis) = cli.hysteresis {
        config = config.with_hysteresis(hysteresis);
    }
    if cli.relaxed {
        config = config.with_strict_board_size(false);
    }
    config.validate()?;
    Ok(config)
}

fn describe(request: &PlacementRequest) -> String {
    let shape = |s: seat_layout::Shape| {
        if s.min == s.max {
            format!("{}", s.min)
        } else {
            format!("{}-{}", s.min, s.max)
        }
    };
    match request.alternate {
        Some(alternate) => format!(
            "{}/{}@{}",
            shape(request.primary),
            shape(alternate),
            request.align
        ),
        None => format!("{}@{}", shape(request.primary), request.align),
    }
}

fn print_templates(registry: &TemplateRegistry) {
    for def in registry.iter() {
        let alternate = def
            .alternate
            .as_deref()
            .map(|a| format!(" -> {}", a))
            .unwrap_or_default();
        match &def.description {
            Some(description) => println!("{:<20} {}{}", def.name, description, alternate),
            None => println!("{}{}", def.name, alternate),
        }
    }
}

fn print_report(report: &Report) {
    let layout = &report.layout;
    match layout.cell_size {
        Some(cell) => println!(
            "template {} cell {} board {:.1}%{}",
            layout.template,
            cell,
            layout.board_share * 100.0,
            if layout.emergency { " (emergency)" } else { "" }
        ),
        None => println!("template {} has no cell size", layout.template),
    }
    println!("window {} panel {}", report.window, report.panel);
    for seat in &report.seats {
        println!(
            "seat {} {} turned {}",
            seat.player,
            seat.rect,
            u32::from(seat.quarter_turns) * 90
        );
    }
    for placed in &report.placed {
        match &placed.placement {
            Some(p) if placed.pair.len() == 2 => println!(
                "box {} {} pair {} {}",
                placed.request, p.rect, placed.pair[0], placed.pair[1]
            ),
            Some(p) => println!("box {} {}", placed.request, p.rect),
            None => println!("box {} does not fit", placed.request),
        }
    }
    for rect in &report.regrown {
        println!("grown {}", rect);
    }
    if let Some(board) = report.board {
        println!("board {}", board);
    }
    for spare in &report.spares {
        println!("spare {}", spare);
    }
    for anomaly in &report.anomalies {
        eprintln!("warning: {}", anomaly);
    }
}
