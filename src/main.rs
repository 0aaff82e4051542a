//! arc-objects CLI
//!
//! Usage:
//!     arc-objects detect data/training/007bbfb7.json --example 1 --diagonal false
//!     arc-objects bench --data-dir data/training --detail
//!     arc-objects bench --challenges challenges.json --solutions solutions.json

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arc_objects::bench::runner::run_benchmark;
use arc_objects::core::{DetectConfig, DetectOverrides, RunConfig, RunOverrides};
use arc_objects::perception::task::load_task;
use arc_objects::perception::{detect_objects, Color};

/// Connected-component object detection for ARC grids
#[derive(Parser)]
#[command(name = "arc-objects")]
#[command(version)]
#[command(about = "Detect objects in ARC grids and score object-centric solvers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct DetectArgs {
    /// Diagonal neighbours are adjacent (default: true)
    #[arg(long, value_name = "BOOL")]
    diagonal: Option<bool>,

    /// Only merge neighbours of the same color (default: false)
    #[arg(long, value_name = "BOOL")]
    monochromatic: Option<bool>,

    /// Background colors, by code or name (default: black)
    #[arg(long, value_delimiter = ',')]
    ignore: Vec<Color>,
}

impl DetectArgs {
    fn overrides(&self) -> DetectOverrides {
        DetectOverrides {
            go_diagonal: self.diagonal,
            monochromatic: self.monochromatic,
            ignore_colors: (!self.ignore.is_empty()).then(|| self.ignore.clone()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the objects found in one example input of a task
    Detect {
        /// Task file
        task: PathBuf,

        /// Example index
        #[arg(short, long, default_value_t = 0)]
        example: usize,

        /// Read from the test examples instead of train
        #[arg(long)]
        test: bool,

        /// Print the objects as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        detect: DetectArgs,
    },

    /// Score the object solvers over a set of tasks
    Bench {
        /// Directory of per-task JSON files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Challenges file keyed by task id
        #[arg(long)]
        challenges: Option<PathBuf>,

        /// Solutions file keyed by task id
        #[arg(long)]
        solutions: Option<PathBuf>,

        #[arg(long)]
        max_tasks: Option<usize>,

        /// JSON run configuration; flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print one line per task
        #[arg(long)]
        detail: bool,

        #[command(flatten)]
        detect: DetectArgs,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Detect { task, example, test, json, detect } => cmd_detect(task, example, test, json, &detect),
        Commands::Bench { data_dir, challenges, solutions, max_tasks, config, detail, detect } => {
            let base = match config {
                Some(path) => RunConfig::from_file(&path)?,
                None => RunConfig::default(),
            };
            let run = base.merged(RunOverrides {
                data_dir,
                challenges,
                solutions,
                max_tasks,
                detect: detect.overrides(),
            });

            let report = run_benchmark(&run)?;
            if detail { report.print_detail(); } else { report.print_summary(); }
            Ok(())
        }
    }
}

fn cmd_detect(path: PathBuf, index: usize, test: bool, json: bool, args: &DetectArgs) -> anyhow::Result<()> {
    let task = load_task(&path)?;
    let examples = if test { &task.test } else { &task.train };
    let Some(example) = examples.get(index) else {
        bail!("task {} has {} {} examples, asked for #{}",
            task.id, examples.len(), if test { "test" } else { "train" }, index);
    };
    let config = DetectConfig::default().merged(&args.overrides());
    let grid = &example.input;

    let objects = detect_objects(grid, &config);
    if json {
        println!("{}", serde_json::to_string_pretty(&objects).context("serializing objects")?);
        return Ok(());
    }

    println!("--- {} input #{} ({}x{}) ---", task.id, index, grid.height(), grid.width());
    println!("{}\n", grid);
    println!("{} objects (diagonal={}, monochromatic={}, ignore={:?})",
        objects.len(), config.go_diagonal, config.monochromatic, config.ignore_colors);
    for (i, obj) in objects.iter().enumerate() {
        let colors = match obj.color() {
            Some(c) => c.name().to_string(),
            None => obj.colors().iter().map(|c| c.name()).collect::<Vec<_>>().join("+"),
        };
        println!("  #{:<3} {:<16} bbox=({},{})-({},{}) {}x{} area={}",
            i, colors, obj.top, obj.left, obj.bottom, obj.right,
            obj.height(), obj.width(), obj.area());
    }
    Ok(())
}
