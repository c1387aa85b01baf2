pub use self::{bank::*, board::*, dimensions::*, piece::*};

pub(crate) mod bank;
pub(crate) mod bit_rows;
pub(crate) mod board;
pub(crate) mod dimensions;
pub(crate) mod piece;
