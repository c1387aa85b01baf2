use std::ops::RangeInclusive;

use arrayvec::ArrayVec;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    CellOutOfRangeError,
    core::{Cell, Dimensions, Piece},
};

/// Maximum number of distinct rotations a piece can have.
pub const MAX_ROTATIONS: usize = 4;

/// Rotations of one piece, indexed by the number of rotate commands.
pub type RotationEntries = ArrayVec<Rotation, MAX_ROTATIONS>;

/// One observed orientation of a piece.
///
/// `offset` is the top-left corner of the bounding box where the engine showed this
/// orientation right after rotating at spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    piece: Piece,
    offset: Cell,
}

impl Rotation {
    #[must_use]
    pub fn new(piece: Piece, offset: Cell) -> Self {
        Self { piece, offset }
    }

    /// Builds the rotation shown by a set of observed cells.
    ///
    /// Returns `None` for an empty observation.
    #[must_use]
    pub fn from_cells(cells: &[Cell]) -> Option<Self> {
        let offset = Cell::top_left(cells)?;
        Some(Self {
            piece: Piece::from_cells(cells),
            offset,
        })
    }

    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    #[must_use]
    pub fn offset(&self) -> Cell {
        self.offset
    }

    /// Translations that keep this orientation strictly between the walls.
    ///
    /// ```
    /// use stackplan_engine::{Cell, Dimensions, Rotation};
    ///
    /// let dims = Dimensions::new(10, 20).unwrap();
    /// let bar = [3, 4, 5, 6].map(|x| Cell::new(x, 0));
    /// let rotation = Rotation::from_cells(&bar).unwrap();
    /// assert_eq!(rotation.translations(dims), -2..=2);
    /// ```
    #[must_use]
    pub fn translations(&self, dims: Dimensions) -> RangeInclusive<isize> {
        let origin = to_isize(self.offset.x);
        let leftmost = to_isize(crate::core::WALL_WIDTH);
        let rightmost = to_isize(dims.interior_width()) - to_isize(self.piece.width()) + 1;
        (leftmost - origin)..=(rightmost - origin)
    }

    /// Absolute cells of this orientation at its spawn offset.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        let width = self.piece.width();
        let mut cells = Vec::new();
        for (dy, &row) in self.piece.rows().iter().enumerate() {
            for dx in 0..width {
                if row & (1 << (width - 1 - dx)) != 0 {
                    cells.push(Cell::new(self.offset.x + dx, self.offset.y + dy));
                }
            }
        }
        cells
    }
}

fn to_isize(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

/// Rotations as absolute cells, used to seed a catalog from a file.
///
/// The first rotation doubles as the key pattern of the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSeedEntry {
    pub rotations: Vec<Vec<Cell>>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CatalogSeedError {
    #[display("seed entry has no rotations")]
    Empty,
    #[display("seed entry has {count} rotations, at most {MAX_ROTATIONS} are possible")]
    TooManyRotations { count: usize },
    #[display("seed rotation {index} has no cells")]
    EmptyRotation { index: usize },
    #[display("seed rotation is out of range: {_0}")]
    OutOfRange(CellOutOfRangeError),
}

/// Learned rotations per piece pattern.
///
/// Entries are added once per pattern and never modified afterwards: inserting for a
/// pattern that is already known keeps the existing entry. A pattern without an entry
/// cannot be planned for.
#[derive(Debug, Clone, Default)]
pub struct RotationCatalog {
    entries: FxHashMap<Piece, RotationEntries>,
}

impl RotationCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, piece: &Piece) -> bool {
        self.entries.contains_key(piece)
    }

    #[must_use]
    pub fn rotations(&self, piece: &Piece) -> Option<&[Rotation]> {
        self.entries.get(piece).map(|entries| entries.as_slice())
    }

    /// Registers the rotations of `piece`.
    ///
    /// Returns `false` and leaves the catalog untouched if `piece` was already known or
    /// `rotations` is empty.
    pub fn insert(&mut self, piece: Piece, rotations: RotationEntries) -> bool {
        if rotations.is_empty() || self.entries.contains_key(&piece) {
            return false;
        }
        log::debug!("learned {} rotation(s) for {piece:?}", rotations.len());
        self.entries.insert(piece, rotations);
        true
    }

    /// Adds an entry from absolute cells, checking them against `dims`.
    pub fn seed(
        &mut self,
        entry: &CatalogSeedEntry,
        dims: Dimensions,
    ) -> Result<bool, CatalogSeedError> {
        if entry.rotations.is_empty() {
            return Err(CatalogSeedError::Empty);
        }
        if entry.rotations.len() > MAX_ROTATIONS {
            return Err(CatalogSeedError::TooManyRotations {
                count: entry.rotations.len(),
            });
        }
        let mut rotations = RotationEntries::new();
        for (index, cells) in entry.rotations.iter().enumerate() {
            for &cell in cells {
                dims.check_cell(cell).map_err(CatalogSeedError::OutOfRange)?;
            }
            let rotation =
                Rotation::from_cells(cells).ok_or(CatalogSeedError::EmptyRotation { index })?;
            rotations.push(rotation);
        }
        let key = rotations[0].piece.clone();
        Ok(self.insert(key, rotations))
    }

    /// Exports every entry as absolute cells, the inverse of [`seed`](Self::seed).
    #[must_use]
    pub fn to_seed(&self) -> Vec<CatalogSeedEntry> {
        self.entries
            .values()
            .map(|rotations| CatalogSeedEntry {
                rotations: rotations.iter().map(Rotation::cells).collect(),
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Piece, &[Rotation])> + '_ {
        self.entries
            .iter()
            .map(|(piece, rotations)| (piece, rotations.as_slice()))
    }
}
