use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use serde::Serialize;
use stackplan_engine::{Action, CatalogSeedEntry, Dimensions, RotationCatalog, Snapshot};
use stackplan_evaluator::domain::{DomainStats, TetrisDomain};
use stackplan_search::{BreadthCaps, SearchStats, Termination};

use crate::{
    command::weights::WeightArgs,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum OutputFormat {
    /// Full report with statistics
    #[default]
    Json,
    /// Key presses for the first action only
    Keys,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlanArg {
    /// Engine snapshot JSON file
    snapshot: PathBuf,
    /// Rotation catalog seed file, as written by `selfplay --save-catalog`
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Frontier size per depth, comma separated
    #[arg(long, default_value = "3,3,3,3")]
    caps: BreadthCaps,
    /// Planning time cap in seconds [default: derived from the game speed]
    #[arg(long)]
    time_cap: Option<f64>,
    /// Playfield width with walls, used when the snapshot carries no dimensions
    #[arg(long, default_value_t = 10)]
    width: usize,
    /// Playfield height, used when the snapshot carries no dimensions
    #[arg(long, default_value_t = 20)]
    height: usize,
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    weights: WeightArgs,
}

#[derive(Debug, Serialize)]
struct PlanReport {
    plan: Vec<Action>,
    keys: String,
    termination: Termination,
    cost: f64,
    heuristic: f64,
    search: SearchStats,
    domain: DomainStats,
}

pub(crate) fn run(arg: &PlanArg) -> anyhow::Result<()> {
    let PlanArg {
        snapshot,
        catalog,
        caps,
        time_cap,
        width,
        height,
        format,
        output,
        weights,
    } = arg;

    let snapshot: Snapshot = util::read_json_file("snapshot", snapshot)?;
    let dims = match snapshot.dimensions {
        Some(dims) => dims,
        None => Dimensions::new(*width, *height).context("Invalid playfield size")?,
    };
    let catalog = match catalog {
        Some(path) => load_catalog(path, dims)?,
        None => RotationCatalog::new(),
    };
    let state = snapshot
        .to_state(dims)
        .context("Snapshot does not fit the playfield")?
        .context("Snapshot has no falling piece")?;
    if !catalog.contains(state.piece()) {
        log::warn!(
            "no rotations known for the falling piece, the plan will be empty:\n{}",
            state.piece()
        );
    }
    let time_cap = match time_cap {
        Some(secs) => Duration::try_from_secs_f64(*secs)
            .with_context(|| format!("Invalid time cap: {secs}"))?,
        None => snapshot.planning_budget(),
    };

    let mut domain = TetrisDomain::new(catalog, dims, weights.resolve()?);
    let outcome = domain.plan(&state, caps.clone(), time_cap);
    log::info!(
        "{} plan of {} action(s) in {:?}",
        outcome.termination,
        outcome.plan.len(),
        outcome.stats.timings.total
    );

    let keys: String = outcome
        .plan
        .first()
        .map(|action| action.key_sequence(snapshot.game_speed))
        .unwrap_or_default()
        .into_iter()
        .collect();

    let mut output = Output::from_output_path(output.as_deref())?;
    match format {
        OutputFormat::Json => {
            let report = PlanReport {
                keys,
                termination: outcome.termination,
                cost: outcome.node.cost(),
                heuristic: outcome.node.heuristic(),
                search: outcome.stats,
                domain: domain.stats(),
                plan: outcome.plan,
            };
            output.write_json(&report)?;
        }
        OutputFormat::Keys => output.write_line(&keys)?,
    }
    Ok(())
}

fn load_catalog(path: &Path, dims: Dimensions) -> anyhow::Result<RotationCatalog> {
    let entries: Vec<CatalogSeedEntry> = util::read_json_file("catalog", path)?;
    let mut catalog = RotationCatalog::new();
    for (index, entry) in entries.iter().enumerate() {
        let added = catalog
            .seed(entry, dims)
            .with_context(|| format!("Invalid catalog entry #{index} in {}", path.display()))?;
        if !added {
            log::warn!("catalog entry #{index} repeats a known piece, skipped");
        }
    }
    log::info!("seeded {} piece(s) from {}", catalog.len(), path.display());
    Ok(catalog)
}
