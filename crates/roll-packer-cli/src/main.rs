use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roll_packer_core::{
    CuttingOptimizer, Item, OptimizationResult, OptimizeRequest, OptimizerConfig, PlacedRect,
};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "roll-packer",
    about = "Lay out rectangular pieces on a roll and export the cut plan",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Optimize the layout described by a job file
    Optimize(OptimizeArgs),
    /// Simple timing bench on random pieces (prints time, length, efficiency)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct OptimizeArgs {
    // Input/Output
    /// Job file (.json, .yaml or .yml)
    #[arg(help_heading = "Input/Output")]
    job: PathBuf,
    /// Write the layout here instead of stdout
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// Output format: json | cutlist
    #[arg(long, value_parser = ["json", "cutlist"], default_value = "json", help_heading = "Input/Output")]
    format: String,
    /// Export layout stats (JSON) to this file
    #[arg(long, help_heading = "Input/Output")]
    export_stats: Option<PathBuf>,

    // Roll (overrides the job file)
    /// Roll width
    #[arg(long, help_heading = "Roll")]
    roll_width: Option<f64>,
    /// Blade spacing (kerf) between pieces
    #[arg(long, help_heading = "Roll")]
    blade_spacing: Option<f64>,
    /// Allow 90deg rotation
    #[arg(long, help_heading = "Roll")]
    allow_rotation: Option<bool>,

    // Search
    /// Add randomized MaxRects passes
    #[arg(long, default_value_t = false, help_heading = "Search")]
    deep_search: bool,
    /// Number of deep-search passes
    #[arg(long, help_heading = "Search")]
    iterations: Option<usize>,
    /// Seed for deep search (reproducible runs)
    #[arg(long, help_heading = "Search")]
    seed: Option<u64>,
    /// Evaluate strategies in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Search")]
    parallel: bool,

    /// Print the merged configuration (after job file/CLI) and exit
    #[arg(long, default_value_t = false, help_heading = "Config")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Config")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Number of random pieces
    #[arg(long, default_value_t = 100)]
    count: usize,
    /// Smallest piece side
    #[arg(long, default_value_t = 10.0)]
    min_side: f64,
    /// Largest piece side
    #[arg(long, default_value_t = 120.0)]
    max_side: f64,
    /// Roll width
    #[arg(long, default_value_t = 152.0)]
    roll_width: f64,
    /// Blade spacing
    #[arg(long, default_value_t = 0.0)]
    blade_spacing: f64,
    /// Seed for piece generation and deep search
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Include deep search
    #[arg(long, default_value_t = false)]
    deep_search: bool,
    /// Evaluate strategies in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Optimize(args) => run_optimize(args),
        Commands::Bench(args) => run_bench(args),
    }
}

fn run_optimize(args: &OptimizeArgs) -> anyhow::Result<()> {
    let job = load_job(&args.job)?;

    let mut cfg = job.roll_config(OptimizerConfig::default());
    if let Some(v) = args.roll_width {
        cfg.roll_width = v;
    }
    if let Some(v) = args.blade_spacing {
        cfg.blade_spacing = v;
    }
    if let Some(v) = args.allow_rotation {
        cfg.allow_rotation = v;
    }
    if let Some(v) = args.iterations {
        cfg.deep_search_iterations = v;
    }
    if args.parallel {
        cfg.parallel = true;
    }

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let optimizer = CuttingOptimizer::new(cfg).context("invalid roll configuration")?;
    let request = job.into_request(args.deep_search);
    info!(
        pieces = request.items.len(),
        locked = request.locked_items.len(),
        deep_search = request.use_deep_search,
        "loaded job"
    );

    let start = Instant::now();
    let result = match args.seed {
        Some(seed) => optimizer.optimize_with_rng(&request, &mut StdRng::seed_from_u64(seed))?,
        None => optimizer.optimize(&request)?,
    };
    info!(
        strategy = %result.strategy,
        length = result.total_length,
        efficiency = result.efficiency,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "layout computed"
    );
    for id in result.unplaced(&request.items) {
        warn!(%id, "piece does not fit the roll and was left out");
    }

    let rendered = match args.format.as_str() {
        "cutlist" => roll_packer_core::cut_list_text(&result),
        _ => serde_json::to_string_pretty(&roll_packer_core::to_json_layout(&result))?,
    };
    match &args.out {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("write {}", path.display()))?;
            info!(?path, "layout written");
        }
        None => println!("{}", rendered),
    }

    if let Some(stats_path) = &args.export_stats {
        write_stats(stats_path, &result)?;
    }
    Ok(())
}

fn run_bench(args: &BenchArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.min_side > 0.0 && args.min_side <= args.max_side,
        "expected 0 < min_side <= max_side"
    );
    let mut rng = StdRng::seed_from_u64(args.seed);
    let items: Vec<Item> = (0..args.count)
        .map(|i| {
            let w = rng.gen_range(args.min_side..=args.max_side).round();
            let h = rng.gen_range(args.min_side..=args.max_side).round();
            Item::new(format!("p{}", i), w, h)
        })
        .collect();
    let cfg = OptimizerConfig::builder()
        .roll_width(args.roll_width)
        .blade_spacing(args.blade_spacing)
        .parallel(args.parallel)
        .build();
    let optimizer = CuttingOptimizer::new(cfg)?;
    let request = OptimizeRequest::new(items).deep_search(args.deep_search);

    let start = Instant::now();
    let result = optimizer.optimize_with_rng(&request, &mut rng)?;
    let elapsed = start.elapsed();
    println!(
        "pieces={} placed={} time_ms={} length={:.2} efficiency={:.2}% strategy={}",
        args.count,
        result.placed_items.len(),
        elapsed.as_millis(),
        result.total_length,
        result.efficiency,
        result.strategy,
    );
    Ok(())
}

fn write_stats(path: &Path, result: &OptimizationResult) -> anyhow::Result<()> {
    let stats = result.stats();
    let value = serde_json::json!({
        "pieces": stats.num_pieces,
        "rotated": stats.num_rotated,
        "length": stats.total_length,
        "used_area": stats.used_area,
        "total_area": stats.total_area,
        "waste_area": stats.wasted_area(),
        "efficiency": stats.efficiency,
        "strategy": result.strategy,
    });
    fs::write(path, serde_json::to_string_pretty(&value)?)
        .with_context(|| format!("write {}", path.display()))
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    // Layouts go to stdout; keep logs on stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// A requested piece; `quantity` copies become pieces `{id}-0 .. {id}-{n-1}`.
/// A missing quantity means one piece, an explicit `0` means none.
#[derive(Debug, Deserialize)]
struct JobPiece {
    id: String,
    label: Option<String>,
    #[serde(alias = "w")]
    width: f64,
    #[serde(alias = "h")]
    height: f64,
    quantity: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct JobFile {
    roll_width: Option<f64>,
    blade_spacing: Option<f64>,
    allow_rotation: Option<bool>,
    deep_search_iterations: Option<usize>,
    deep_search: Option<bool>,
    #[serde(default)]
    pieces: Vec<JobPiece>,
    #[serde(default)]
    forced_rotations: HashMap<String, bool>,
    #[serde(default)]
    locked_items: Vec<PlacedRect>,
}

impl JobFile {
    fn roll_config(&self, mut cfg: OptimizerConfig) -> OptimizerConfig {
        if let Some(v) = self.roll_width {
            cfg.roll_width = v;
        }
        if let Some(v) = self.blade_spacing {
            cfg.blade_spacing = v;
        }
        if let Some(v) = self.allow_rotation {
            cfg.allow_rotation = v;
        }
        if let Some(v) = self.deep_search_iterations {
            cfg.deep_search_iterations = v;
        }
        cfg
    }

    fn into_request(self, deep_search: bool) -> OptimizeRequest {
        let items = expand_pieces(&self.pieces);
        OptimizeRequest {
            items,
            forced_rotations: self.forced_rotations,
            use_deep_search: deep_search || self.deep_search.unwrap_or(false),
            locked_items: self.locked_items,
        }
    }
}

fn expand_pieces(pieces: &[JobPiece]) -> Vec<Item> {
    let mut items = Vec::new();
    for piece in pieces {
        let qty = piece.quantity.unwrap_or(1);
        let label = piece
            .label
            .clone()
            .unwrap_or_else(|| format!("{}x{}", piece.width, piece.height));
        for i in 0..qty {
            items.push(
                Item::new(format!("{}-{}", piece.id, i), piece.width, piece.height)
                    .with_label(label.clone()),
            );
        }
    }
    items
}

fn load_job(path: &Path) -> anyhow::Result<JobFile> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref(),
        Some("yaml") | Some("yml")
    );
    let job = if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    Ok(job)
}
