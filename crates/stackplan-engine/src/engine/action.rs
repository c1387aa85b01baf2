use serde::{Deserialize, Serialize};

/// Game speed at or above which the driver lets gravity finish the drop instead of
/// sending a soft-drop key.
const SOFT_DROP_SPEED_LIMIT: u32 = 130;

/// One placement decision for the current piece.
///
/// `rotation` indexes the piece's [`RotationCatalog`](super::RotationCatalog) entry and
/// equals the number of rotate commands to send. `translation` is the signed column
/// offset from the rotation's spawn column (negative is left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub rotation: usize,
    pub translation: isize,
}

impl Action {
    #[must_use]
    pub const fn new(rotation: usize, translation: isize) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Key presses that perform this action in the engine.
    ///
    /// `w` rotates, `a`/`d` move left/right and a trailing `s` soft-drops the piece when
    /// the game is slow enough for it to matter.
    ///
    /// ```
    /// use stackplan_engine::Action;
    ///
    /// assert_eq!(Action::new(2, -1).key_sequence(30), vec!['w', 'w', 'a', 's']);
    /// assert_eq!(Action::new(0, 3).key_sequence(200), vec!['d', 'd', 'd']);
    /// ```
    #[must_use]
    pub fn key_sequence(&self, game_speed: u32) -> Vec<char> {
        let shift = if self.translation < 0 { 'a' } else { 'd' };
        let mut keys = vec!['w'; self.rotation];
        keys.extend(std::iter::repeat_n(shift, self.translation.unsigned_abs()));
        if game_speed < SOFT_DROP_SPEED_LIMIT {
            keys.push('s');
        }
        keys
    }
}
