//! A small in-process game engine for self-play.
//!
//! The emulator speaks the same language as the real engine: it publishes [`Snapshot`]s
//! and accepts the planner's key presses. Rotation is a plain quarter turn inside the
//! piece's bounding box, so the planner still has to learn every orientation by
//! watching.

use std::collections::VecDeque;

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use stackplan_engine::{Cell, Dimensions, Snapshot};

/// Game speed reported in every snapshot.
pub const GAME_SPEED: u32 = 30;

/// Number of upcoming pieces shown in snapshots.
pub const LOOKAHEAD: usize = 3;

/// Tetromino cells inside their bounding box, spawn orientation.
const SHAPES: [(isize, [(isize, isize); 4]); 7] = [
    (4, [(0, 1), (1, 1), (2, 1), (3, 1)]), // I
    (2, [(0, 0), (1, 0), (0, 1), (1, 1)]), // O
    (3, [(1, 0), (0, 1), (1, 1), (2, 1)]), // T
    (3, [(1, 0), (2, 0), (0, 1), (1, 1)]), // S
    (3, [(0, 0), (1, 0), (1, 1), (2, 1)]), // Z
    (3, [(0, 0), (0, 1), (1, 1), (2, 1)]), // J
    (3, [(2, 0), (0, 1), (1, 1), (2, 1)]), // L
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Falling {
    kind: usize,
    rotation: usize,
    x: isize,
    y: isize,
}

impl Falling {
    fn cells(self) -> impl Iterator<Item = (isize, isize)> {
        let (size, cells) = SHAPES[self.kind];
        cells.into_iter().map(move |(mut cx, mut cy)| {
            for _ in 0..self.rotation {
                (cx, cy) = (size - 1 - cy, cx);
            }
            (self.x + cx, self.y + cy)
        })
    }
}

#[derive(Debug, Clone)]
pub struct Emulator {
    dims: Dimensions,
    /// Locked cells per row from the top, bit `x` for column `x`.
    rows: Vec<u64>,
    rng: Pcg32,
    bag: VecDeque<usize>,
    falling: Option<Falling>,
    lines: usize,
    pieces: usize,
    game_over: bool,
}

impl Emulator {
    #[must_use]
    pub fn new(dims: Dimensions, seed: u64) -> Self {
        let mut this = Self {
            dims,
            rows: vec![0; dims.height()],
            rng: Pcg32::seed_from_u64(seed),
            bag: VecDeque::with_capacity(SHAPES.len() * 2),
            falling: None,
            lines: 0,
            pieces: 0,
            game_over: false,
        };
        this.spawn();
        this
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    #[must_use]
    pub fn pieces(&self) -> usize {
        self.pieces
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let game = self
            .rows
            .iter()
            .enumerate()
            .flat_map(|(y, &row)| {
                (1..=self.dims.interior_width())
                    .filter(move |&x| row & (1 << x) != 0)
                    .map(move |x| Cell::new(x, y))
            })
            .collect();
        let next_pieces = self
            .bag
            .iter()
            .take(LOOKAHEAD)
            .map(|&kind| to_cells(self.spawn_position(kind)))
            .collect();
        Snapshot {
            game,
            piece: self.falling.map(to_cells),
            next_pieces,
            game_speed: GAME_SPEED,
            dimensions: Some(self.dims),
            score: Some(u64::try_from(self.lines).unwrap_or(u64::MAX)),
        }
    }

    /// Cells of the falling piece, empty when the game is over.
    #[must_use]
    pub fn piece_cells(&self) -> Vec<Cell> {
        self.falling.map(to_cells).unwrap_or_default()
    }

    /// Applies one key press; unknown keys are ignored.
    pub fn press(&mut self, key: char) {
        match key {
            'w' => self.rotate(),
            'a' => self.shift(-1),
            'd' => self.shift(1),
            's' => self.step(|f| Falling { y: f.y + 1, ..f }),
            _ => log::warn!("emulator ignores key {key:?}"),
        }
    }

    /// Quarter turn clockwise; blocked turns leave the piece in place.
    pub fn rotate(&mut self) {
        self.step(|f| Falling {
            rotation: (f.rotation + 1) % 4,
            ..f
        });
    }

    pub fn shift(&mut self, dx: isize) {
        self.step(|f| Falling { x: f.x + dx, ..f });
    }

    /// Drops the falling piece to rest, locks it and spawns the next one.
    ///
    /// Returns the number of cleared rows.
    pub fn drop_piece(&mut self) -> usize {
        let Some(mut falling) = self.falling.take() else {
            return 0;
        };
        loop {
            let below = Falling {
                y: falling.y + 1,
                ..falling
            };
            if !self.fits(below) {
                break;
            }
            falling = below;
        }
        for (x, y) in falling.cells() {
            self.rows[to_usize(y)] |= 1 << x;
        }
        self.pieces += 1;

        let full = self.full_row();
        let before = self.rows.len();
        self.rows.retain(|&row| row != full);
        let cleared = before - self.rows.len();
        let mut rows = vec![0; cleared];
        rows.append(&mut self.rows);
        self.rows = rows;
        self.lines += cleared;

        self.spawn();
        cleared
    }

    fn full_row(&self) -> u64 {
        u64::from(self.dims.full_row()) << 1
    }

    fn step(&mut self, f: impl FnOnce(Falling) -> Falling) {
        if let Some(falling) = self.falling {
            let next = f(falling);
            if self.fits(next) {
                self.falling = Some(next);
            }
        }
    }

    fn fits(&self, falling: Falling) -> bool {
        let width = isize::try_from(self.dims.interior_width()).unwrap_or(isize::MAX);
        falling.cells().all(|(x, y)| {
            (1..=width).contains(&x)
                && usize::try_from(y)
                    .ok()
                    .and_then(|y| self.rows.get(y))
                    .is_some_and(|row| row & (1 << x) == 0)
        })
    }

    fn spawn_position(&self, kind: usize) -> Falling {
        let width = isize::try_from(self.dims.interior_width()).unwrap_or(isize::MAX);
        let (size, _) = SHAPES[kind];
        Falling {
            kind,
            rotation: 0,
            x: 1 + (width - size) / 2,
            y: 0,
        }
    }

    fn spawn(&mut self) {
        while self.bag.len() <= LOOKAHEAD {
            let mut kinds: Vec<usize> = (0..SHAPES.len()).collect();
            kinds.shuffle(&mut self.rng);
            self.bag.extend(kinds);
        }
        let Some(kind) = self.bag.pop_front() else {
            return;
        };
        let falling = self.spawn_position(kind);
        if self.fits(falling) {
            self.falling = Some(falling);
        } else {
            log::info!("spawn blocked after {} pieces", self.pieces);
            self.game_over = true;
        }
    }
}

fn to_cells(falling: Falling) -> Vec<Cell> {
    falling
        .cells()
        .map(|(x, y)| Cell::new(to_usize(x), to_usize(y)))
        .collect()
}

fn to_usize(value: isize) -> usize {
    usize::try_from(value).expect("piece cells stay inside the playfield")
}
