use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Widest a single depth level is allowed to grow when adapting.
pub const MAX_BREADTH: usize = 3;

/// Spare rows (in game ticks of planning time) above which the planner deepens.
const WIDEN_MARGIN: f64 = 25.0;
/// Spare rows below which the planner gives up depth to answer sooner.
const NARROW_MARGIN: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BreadthCapsError {
    #[display("breadth caps need at least one depth level")]
    Empty,
    #[display("breadth cap for depth {depth} must be positive")]
    ZeroCap { depth: usize },
    #[display("invalid breadth cap {value:?}")]
    Parse { value: String },
}

/// Frontier size allowed after expanding a node at each depth.
///
/// The number of levels is also the depth limit: nodes at depth `len()` are never
/// expanded. Parsed from and displayed as a comma separated list.
///
/// ```
/// use stackplan_search::BreadthCaps;
///
/// let caps: BreadthCaps = "3,2,1".parse().unwrap();
/// assert_eq!(caps.depth_limit(), 3);
/// assert_eq!(caps.cap(1), 2);
/// assert_eq!(caps.to_string(), "3,2,1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct BreadthCaps {
    caps: Vec<usize>,
}

impl Default for BreadthCaps {
    fn default() -> Self {
        Self { caps: vec![3; 4] }
    }
}

impl BreadthCaps {
    pub fn new(caps: Vec<usize>) -> Result<Self, BreadthCapsError> {
        if caps.is_empty() {
            return Err(BreadthCapsError::Empty);
        }
        if let Some(depth) = caps.iter().position(|&cap| cap == 0) {
            return Err(BreadthCapsError::ZeroCap { depth });
        }
        Ok(Self { caps })
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.caps
    }

    #[must_use]
    pub fn depth_limit(&self) -> usize {
        self.caps.len()
    }

    /// Frontier size kept after expanding a node at `depth`.
    #[must_use]
    pub fn cap(&self, depth: usize) -> usize {
        self.caps[depth]
    }

    /// Trades search effort against the room left on the playfield.
    ///
    /// `ticks_spent` is the last planning time measured in game ticks and `free_rows`
    /// the number of empty rows above the stack. With plenty of room the last level
    /// widens (up to [`MAX_BREADTH`]) and then a new level of breadth one is added, up to
    /// `max_depth` levels. When the stack gets close the last level narrows and then
    /// is dropped, always keeping one level.
    ///
    /// ```
    /// use stackplan_search::BreadthCaps;
    ///
    /// let mut caps = BreadthCaps::new(vec![3, 3, 3]).unwrap();
    /// caps.adapt(1.0, 30, 4);
    /// assert_eq!(caps.as_slice(), &[3, 3, 3, 1]);
    /// caps.adapt(1.0, 5, 4);
    /// assert_eq!(caps.as_slice(), &[3, 3, 3]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn adapt(&mut self, ticks_spent: f64, free_rows: usize, max_depth: usize) {
        let free_rows = free_rows as f64;
        let before = self.caps.clone();
        if ticks_spent + WIDEN_MARGIN < free_rows {
            let last = self.last_mut();
            if *last < MAX_BREADTH {
                *last += 1;
            } else if self.caps.len() < max_depth {
                self.caps.push(1);
            }
        } else if ticks_spent + NARROW_MARGIN > free_rows {
            let last = self.last_mut();
            if *last > 1 {
                *last -= 1;
            } else if self.caps.len() > 1 {
                self.caps.pop();
            }
        }
        if self.caps != before {
            log::debug!("breadth caps {before:?} -> {:?}", self.caps);
        }
    }

    fn last_mut(&mut self) -> &mut usize {
        self.caps
            .last_mut()
            .expect("breadth caps always hold one level")
    }
}

impl TryFrom<Vec<usize>> for BreadthCaps {
    type Error = BreadthCapsError;

    fn try_from(caps: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(caps)
    }
}

impl From<BreadthCaps> for Vec<usize> {
    fn from(caps: BreadthCaps) -> Self {
        caps.caps
    }
}

impl FromStr for BreadthCaps {
    type Err = BreadthCapsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = s
            .split(',')
            .map(|value| {
                value.trim().parse().map_err(|_| BreadthCapsError::Parse {
                    value: value.to_owned(),
                })
            })
            .collect::<Result<Vec<usize>, _>>()?;
        Self::new(caps)
    }
}

impl fmt::Display for BreadthCaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cap) in self.caps.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{cap}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(values: &[usize]) -> BreadthCaps {
        BreadthCaps::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_default_caps() {
        assert_eq!(BreadthCaps::default().as_slice(), &[3, 3, 3, 3]);
    }

    #[test]
    fn test_rejects_empty_and_zero() {
        assert_eq!(BreadthCaps::new(vec![]), Err(BreadthCapsError::Empty));
        assert_eq!(
            BreadthCaps::new(vec![2, 0]),
            Err(BreadthCapsError::ZeroCap { depth: 1 })
        );
        assert!(matches!(
            "3,x".parse::<BreadthCaps>(),
            Err(BreadthCapsError::Parse { .. })
        ));
    }

    #[test]
    fn test_widen_last_level_before_deepening() {
        let mut c = caps(&[3, 1]);
        c.adapt(0.0, 40, 4);
        assert_eq!(c.as_slice(), &[3, 2]);
        c.adapt(0.0, 40, 4);
        c.adapt(0.0, 40, 4);
        assert_eq!(c.as_slice(), &[3, 3, 1]);
    }

    #[test]
    fn test_depth_never_exceeds_max() {
        let mut c = caps(&[3, 3]);
        c.adapt(0.0, 40, 2);
        assert_eq!(c.as_slice(), &[3, 3]);
    }

    #[test]
    fn test_narrow_then_drop_level_but_keep_one() {
        let mut c = caps(&[2, 2]);
        c.adapt(10.0, 12, 4);
        assert_eq!(c.as_slice(), &[2, 1]);
        c.adapt(10.0, 12, 4);
        assert_eq!(c.as_slice(), &[2]);
        c.adapt(10.0, 12, 4);
        c.adapt(10.0, 12, 4);
        assert_eq!(c.as_slice(), &[1]);
    }

    #[test]
    fn test_comfortable_margin_keeps_caps() {
        let mut c = caps(&[3, 3, 3]);
        c.adapt(2.0, 20, 4);
        assert_eq!(c.as_slice(), &[3, 3, 3]);
    }
}
