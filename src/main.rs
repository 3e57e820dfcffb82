//! relaxer - Bellman-Ford relaxation runner.
//!
//! Loads a graph description from TOML, runs the relaxation engine, and
//! renders the per-pass trace, the final value table, and the reconstructed
//! path. Run with: cargo run -- demos/six_nodes.toml --trace

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relaxer::{GraphSpec, Mode, PathFinder, RelaxationEngine, Run, TraceRecord};
use relaxer::solver::path_cost;
use relaxer::Graph;

#[derive(Parser)]
#[command(
    name = "relaxer",
    about = "Run a Bellman-Ford relaxation over a graph description"
)]
struct Cli {
    /// Graph description file (TOML)
    graph: PathBuf,

    /// Override the description's source node
    #[arg(long)]
    source: Option<String>,

    /// Target node for path reconstruction (overrides the description)
    #[arg(long)]
    target: Option<String>,

    /// Maximize instead of the description's mode
    #[arg(long)]
    maximize: bool,

    /// Print the per-pass relaxation trace
    #[arg(long)]
    trace: bool,

    /// Enumerate every optimal path to the target, not just one
    #[arg(long)]
    all_paths: bool,

    /// Emit the run and trace as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn print_banner(mode: Mode) {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(format!(" RELAXER - Bellman-Ford ({mode})")).cyan().bold()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════").cyan()
    );
    println!();
}

fn render_trace(trace: &[TraceRecord], mode: Mode) {
    println!("{}", style("Relaxation trace:").blue().bold());
    for record in trace {
        println!("{}", style(format!("Pass {}:", record.pass)).blue());
        if record.updates.is_empty() {
            println!("  no updates, converged");
        }
        for update in &record.updates {
            println!(
                "  {}: {} → {}  (via {}, weight {})",
                update.to,
                update.previous.render(mode),
                update.current.render(mode),
                update.from,
                update.weight
            );
        }
        let snapshot = record
            .values
            .iter()
            .map(|(node, value)| format!("{node}={}", value.render(mode)))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  values: {snapshot}");
    }
    println!();
}

fn render_values(run: &Run, mode: Mode) {
    println!("{}", style(format!("Final values ({mode}):")).green().bold());
    for (node, value) in &run.values {
        println!("  {node:<10} {}", value.render(mode));
    }
    println!();
}

fn render_paths(graph: &Graph, run: &Run, mode: Mode, source: &str, target: &str, all: bool) -> Result<()> {
    if run.cycle_detected {
        warn!("skipping path reconstruction: the predecessor map may be cyclic");
        return Ok(());
    }

    let finder = PathFinder::new(&run.predecessors);
    let paths = if all {
        finder.all_optimal(source, target)?
    } else {
        finder.reconstruct(source, target)?.into_iter().collect()
    };

    if paths.is_empty() {
        println!(
            "{}",
            style(format!("No path from {source} to {target}.")).yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        style(format!("Optimal path from {source} to {target}:")).green().bold()
    );
    for path in &paths {
        let total = path_cost(graph, mode, path)
            .map(|c| format!("{c}"))
            .unwrap_or_else(|| "?".to_string());
        println!("  {}  (total: {total})", path.join(" → "));
    }
    println!();
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("relaxer=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let spec = GraphSpec::from_file(&cli.graph)?;
    spec.validate()?;

    let mode = if cli.maximize { Mode::Maximize } else { spec.mode };
    let source = cli.source.as_deref().unwrap_or(&spec.source);
    let target = cli.target.as_deref().or(spec.target.as_deref());

    if !cli.json {
        print_banner(mode);
    }

    let graph = spec.build();
    graph.log_summary();

    let engine = RelaxationEngine::new(&graph, mode);
    let (run, trace) = engine.run_collected(source)?;

    info!(
        "run finished: {} passes, cycle_detected = {}",
        trace.len(),
        run.cycle_detected
    );

    if cli.json {
        let path = if run.cycle_detected || target.is_none() {
            None
        } else {
            PathFinder::new(&run.predecessors)
                .reconstruct(source, target.unwrap_or_default())?
        };
        let out = serde_json::json!({
            "mode": mode,
            "source": source,
            "run": run,
            "trace": trace,
            "path": path,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if cli.trace {
        render_trace(&trace, mode);
    }

    render_values(&run, mode);

    if run.cycle_detected {
        println!(
            "{}",
            style(format!(
                "Graph contains a {} weight cycle; values above are not a fixed point.",
                match mode {
                    Mode::Minimize => "negative",
                    Mode::Maximize => "positive",
                }
            ))
            .red()
            .bold()
        );
        println!();
    }

    if let Some(target) = target {
        render_paths(&graph, &run, mode, source, target, cli.all_paths)?;
    }

    Ok(())
}
