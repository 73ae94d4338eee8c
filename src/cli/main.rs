use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use layerdeck::core::telemetry::logging::init_logging_with;
use layerdeck::services::layout_file::{load_layout, save_layout};
use layerdeck::services::script::run_script;
use layerdeck::{Direction, LayerDefinition, NavDirection, Workspace, WorkspaceConfig};

#[derive(Parser)]
#[command(name = "layerdeck", version, about = "Drive a layer workspace from the command line")]
struct Cli {
    /// Workspace config (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command script and print the final snapshot.
    Run {
        script: PathBuf,
        /// Start from a saved layout instead of an empty workspace.
        #[arg(long)]
        load: Option<PathBuf>,
        /// Save the resulting layout.
        #[arg(long)]
        save: Option<PathBuf>,
        /// Abort on the first failing command.
        #[arg(long)]
        strict: bool,
    },
    /// Build a sample workspace, walk it and print the snapshot.
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging_with(&cli.log_level);

    let config = match &cli.config {
        Some(path) => WorkspaceConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => WorkspaceConfig::default(),
    };

    match cli.command {
        Commands::Run {
            script,
            load,
            save,
            strict,
        } => run(config, script, load, save, strict),
        Commands::Demo => demo(config),
    }
}

fn run(
    config: WorkspaceConfig,
    script: PathBuf,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
    strict: bool,
) -> Result<()> {
    let mut workspace: Workspace<String> = match &load {
        Some(path) => load_layout(path, config)
            .with_context(|| format!("failed to load layout {}", path.display()))?,
        None => Workspace::new(config)?,
    };

    let text = fs::read_to_string(&script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let report = run_script(&mut workspace, &text, strict)?;
    info!(
        applied = report.applied,
        moved = report.moved,
        failed = report.failed.len(),
        "script finished"
    );
    for entry in workspace.history().entries() {
        debug!(
            layer = %entry.layer_id,
            index = entry.layer_index,
            visited_at = %entry.visited_at,
            "history entry"
        );
    }

    if let Some(path) = &save {
        save_layout(&workspace, path)
            .with_context(|| format!("failed to save layout {}", path.display()))?;
    }

    println!("{}", serde_json::to_string_pretty(&workspace.snapshot())?);
    if !report.failed.is_empty() {
        bail!("{} script command(s) failed", report.failed.len());
    }
    Ok(())
}

/// A 3x3 surface around the root plus a depth stack on the root cell.
fn demo(config: WorkspaceConfig) -> Result<()> {
    let mut workspace: Workspace<String> = Workspace::new(config)?;
    let home = workspace.add_root(LayerDefinition::new("Home", "home".to_string()))?;

    let mut ring = Vec::new();
    for (direction, title) in [
        (Direction::Up, "North"),
        (Direction::Right, "East"),
        (Direction::Down, "South"),
        (Direction::Left, "West"),
    ] {
        let layer = LayerDefinition::new(title, title.to_lowercase());
        let id = workspace.connect(&home, direction, layer)?;
        ring.push((direction, id));
    }
    for (direction, id) in &ring {
        let corner = match direction {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            _ => Direction::Up,
        };
        let title = format!("{direction}-{corner} corner");
        workspace.connect(id, corner, LayerDefinition::new(title.clone(), title))?;
    }
    let detail_layer = LayerDefinition::new("Detail", "detail".to_string());
    let detail = workspace.connect(&home, Direction::Above, detail_layer)?;
    let overlay_layer = LayerDefinition::new("Overlay", "overlay".to_string());
    workspace.connect(&detail, Direction::Above, overlay_layer)?;

    workspace.navigate_to_id(&home)?;
    for direction in [
        NavDirection::Right,
        NavDirection::Up,
        NavDirection::Left,
        NavDirection::Down,
        NavDirection::First,
    ] {
        let moved = workspace.navigate(direction);
        info!(?direction, moved, "demo move");
    }
    workspace.back();

    println!("{}", serde_json::to_string_pretty(&workspace.snapshot())?);
    Ok(())
}
