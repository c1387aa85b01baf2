use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use rand::Rng as _;
use serde::Serialize;
use stackplan_engine::{
    Cell, Dimensions, LearnStep, MAX_GRAVITY_WAITS, MAX_ROTATIONS, RotationCatalog,
    RotationLearner,
};
use stackplan_evaluator::domain::{DomainStats, TetrisDomain};
use stackplan_search::BreadthCaps;
use stackplan_stats::running::RunningMean;

use crate::{
    command::weights::WeightArgs,
    emulator::Emulator,
    util::Output,
};

/// Observations a learner can take before the cycle must have closed.
const MAX_LEARN_OBSERVATIONS: usize = MAX_ROTATIONS * (MAX_GRAVITY_WAITS + 1);

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SelfPlayArg {
    /// Pieces to place before stopping
    #[arg(long, default_value_t = 200)]
    pieces: usize,
    /// Seed of the piece sequence [default: random]
    #[arg(long)]
    seed: Option<u64>,
    /// Playfield width with walls
    #[arg(long, default_value_t = 10)]
    width: usize,
    #[arg(long, default_value_t = 30)]
    height: usize,
    /// Initial frontier size per depth, comma separated
    #[arg(long, default_value = "3,3,3,3")]
    caps: BreadthCaps,
    /// Deepest the caps may grow while adapting
    #[arg(long, default_value_t = 4)]
    max_depth: usize,
    /// Planning time cap in seconds [default: derived from the game speed]
    #[arg(long)]
    time_cap: Option<f64>,
    /// Write the learned rotation catalog as a seed file
    #[arg(long)]
    save_catalog: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    weights: WeightArgs,
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    pieces: usize,
    max_depth: usize,
    time_cap: Option<Duration>,
}

#[derive(Debug, Serialize)]
struct SelfPlayReport {
    seed: u64,
    pieces: usize,
    lines: usize,
    game_over: bool,
    /// Plans that reached the goal instead of falling back to the best estimate.
    solutions: usize,
    learned_pieces: usize,
    avg_branching: f64,
    caps: BreadthCaps,
    domain: DomainStats,
}

pub(crate) fn run(arg: &SelfPlayArg) -> anyhow::Result<()> {
    let SelfPlayArg {
        pieces,
        seed,
        width,
        height,
        caps,
        max_depth,
        time_cap,
        save_catalog,
        output,
        weights,
    } = arg;

    let dims = Dimensions::new(*width, *height).context("Invalid playfield size")?;
    anyhow::ensure!(
        dims.interior_width() >= 4,
        "Self-play needs at least 4 interior columns, got {}",
        dims.interior_width()
    );
    let time_cap = time_cap
        .map(|secs| {
            Duration::try_from_secs_f64(secs).with_context(|| format!("Invalid time cap: {secs}"))
        })
        .transpose()?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    log::info!("self-play on a {width}x{height} playfield with seed {seed}");

    let mut emulator = Emulator::new(dims, seed);
    let mut domain = TetrisDomain::new(RotationCatalog::new(), dims, weights.resolve()?);
    let limits = Limits {
        pieces: *pieces,
        max_depth: *max_depth,
        time_cap,
    };
    let report = play(&mut emulator, &mut domain, caps.clone(), limits, seed)?;
    log::info!(
        "placed {} piece(s), cleared {} line(s){}",
        report.pieces,
        report.lines,
        if report.game_over { ", game over" } else { "" }
    );

    if let Some(path) = save_catalog {
        let mut catalog_output = Output::open(path)?;
        catalog_output.write_json(&domain.catalog().to_seed())?;
    }
    let mut output = Output::from_output_path(output.as_deref())?;
    output.write_json(&report)?;
    Ok(())
}

fn play(
    emulator: &mut Emulator,
    domain: &mut TetrisDomain,
    mut caps: BreadthCaps,
    limits: Limits,
    seed: u64,
) -> anyhow::Result<SelfPlayReport> {
    let dims = domain.dimensions();
    let mut solutions = 0;
    let mut branching = RunningMean::default();

    while !emulator.is_game_over() && emulator.pieces() < limits.pieces {
        let snapshot = emulator.snapshot();
        let state = snapshot
            .to_state(dims)
            .context("Emulator snapshot does not fit the playfield")?
            .context("Emulator shows no falling piece")?;
        if !domain.catalog().contains(state.piece()) {
            learn_rotations(emulator, domain.catalog_mut())?;
        }

        let time_cap = limits
            .time_cap
            .unwrap_or_else(|| snapshot.planning_budget());
        let started = Instant::now();
        let outcome = domain.plan(&state, caps.clone(), time_cap);
        let ticks_spent = started.elapsed().as_secs_f64() * f64::from(snapshot.game_speed);
        let free_rows = snapshot.stack_top().unwrap_or(dims.height());
        caps.adapt(ticks_spent, free_rows, limits.max_depth);

        if outcome.termination.is_solution() {
            solutions += 1;
        }
        branching.push(outcome.stats.avg_branching);
        match outcome.plan.first() {
            Some(action) => {
                for key in action.key_sequence(snapshot.game_speed) {
                    emulator.press(key);
                }
            }
            None => log::warn!("no plan for piece #{}, dropping it in place", emulator.pieces()),
        }
        let cleared = emulator.drop_piece();
        if cleared > 0 {
            log::debug!("piece #{} cleared {cleared} line(s)", emulator.pieces());
        }
    }

    Ok(SelfPlayReport {
        seed,
        pieces: emulator.pieces(),
        lines: emulator.lines(),
        game_over: emulator.is_game_over(),
        solutions,
        learned_pieces: domain.catalog().len(),
        avg_branching: branching.mean(),
        caps,
        domain: domain.stats(),
    })
}

/// Turns the falling piece through its rotation cycle and records every orientation.
///
/// Afterwards the piece is turned on until it shows its spawn cells again, since
/// planned actions count rotations from the spawn orientation.
fn learn_rotations(emulator: &mut Emulator, catalog: &mut RotationCatalog) -> anyhow::Result<()> {
    let spawn = sorted(emulator.piece_cells());
    let mut learner = RotationLearner::start(&spawn).context("No falling piece to learn")?;
    let mut commands = 0;
    let mut observations = 0;
    let mut step = LearnStep::Rotate;
    loop {
        anyhow::ensure!(
            observations < MAX_LEARN_OBSERVATIONS,
            "Rotation cycle did not close after {observations} observations"
        );
        if step.is_rotate() {
            emulator.rotate();
            commands += 1;
        }
        observations += 1;
        step = learner.observe(&emulator.piece_cells());
        match step {
            LearnStep::Rotate | LearnStep::Wait => {}
            LearnStep::Complete => break,
            LearnStep::Aborted => anyhow::bail!("Lost track of the piece while learning its rotations"),
        }
    }
    let count = learner.rotations().len();
    let piece = learner.piece().clone();
    if learner.finish(catalog) {
        log::info!("learned {count} rotation(s) after {commands} command(s):\n{piece}");
    }

    let mut turns = 0;
    while sorted(emulator.piece_cells()) != spawn {
        anyhow::ensure!(
            turns < MAX_ROTATIONS,
            "Piece did not return to its spawn orientation"
        );
        emulator.rotate();
        turns += 1;
    }
    Ok(())
}

fn sorted(mut cells: Vec<Cell>) -> Vec<Cell> {
    cells.sort_unstable();
    cells
}

#[cfg(test)]
mod tests {
    use stackplan_evaluator::weights::HeuristicWeights;

    use super::*;

    fn dims() -> Dimensions {
        Dimensions::new(10, 20).unwrap()
    }

    #[test]
    fn test_learning_returns_piece_to_spawn() {
        let mut emulator = Emulator::new(dims(), 3);
        let spawn = sorted(emulator.piece_cells());
        let mut catalog = RotationCatalog::new();

        learn_rotations(&mut emulator, &mut catalog).unwrap();
        assert_eq!(catalog.len(), 1);
        let (_, rotations) = catalog.iter().next().unwrap();
        assert!([1, 2, 4].contains(&rotations.len()));
        assert_eq!(sorted(emulator.piece_cells()), spawn);
    }

    #[test]
    fn test_short_game_places_every_piece() {
        let mut emulator = Emulator::new(dims(), 11);
        let mut domain = TetrisDomain::new(RotationCatalog::new(), dims(), HeuristicWeights::default());
        let limits = Limits {
            pieces: 8,
            max_depth: 2,
            time_cap: Some(Duration::from_millis(50)),
        };
        let caps = BreadthCaps::new(vec![2, 1]).unwrap();
        let report = play(&mut emulator, &mut domain, caps, limits, 11).unwrap();

        assert_eq!(report.pieces, 8);
        assert!(!report.game_over);
        assert!(report.learned_pieces >= 1);
        assert!(report.learned_pieces <= 7);
        assert!(report.caps.depth_limit() <= 2);
        assert!(report.domain.fall.entries > 0);
    }
}
