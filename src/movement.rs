use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Move codes shared by every maze family.
///
/// Compass codes double as arrow tokens, knight codes are named after the
/// long leg first (`NNE` is two rows up and one column right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    N,
    S,
    W,
    E,
    NW,
    NE,
    SW,
    SE,
    NNE,
    ENE,
    ESE,
    SSE,
    SSW,
    WSW,
    WNW,
    NNW,
    #[serde(rename = "~")]
    Stay,
}

/// Two disjoint families used by the alternating jump rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoveType {
    Orthogonal,
    Diagonal,
}

impl MoveType {
    pub fn flip(self) -> MoveType {
        match self {
            MoveType::Orthogonal => MoveType::Diagonal,
            MoveType::Diagonal => MoveType::Orthogonal,
        }
    }

    pub fn directions(self) -> &'static [Direction] {
        match self {
            MoveType::Orthogonal => &Direction::ORTHOGONAL,
            MoveType::Diagonal => &Direction::DIAGONAL,
        }
    }
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [Direction::N, Direction::S, Direction::W, Direction::E];

    pub const DIAGONAL: [Direction; 4] =
        [Direction::NW, Direction::NE, Direction::SW, Direction::SE];

    pub const COMPASS: [Direction; 8] = [
        Direction::N,
        Direction::S,
        Direction::W,
        Direction::E,
        Direction::NW,
        Direction::NE,
        Direction::SW,
        Direction::SE,
    ];

    pub const KNIGHT: [Direction; 8] = [
        Direction::NNE,
        Direction::ENE,
        Direction::ESE,
        Direction::SSE,
        Direction::SSW,
        Direction::WSW,
        Direction::WNW,
        Direction::NNW,
    ];

    /// The eight compass neighbours plus standing still.
    pub const KING: [Direction; 9] = [
        Direction::N,
        Direction::S,
        Direction::W,
        Direction::E,
        Direction::NW,
        Direction::NE,
        Direction::SW,
        Direction::SE,
        Direction::Stay,
    ];

    const ALL: [Direction; 17] = [
        Direction::N,
        Direction::S,
        Direction::W,
        Direction::E,
        Direction::NW,
        Direction::NE,
        Direction::SW,
        Direction::SE,
        Direction::NNE,
        Direction::ENE,
        Direction::ESE,
        Direction::SSE,
        Direction::SSW,
        Direction::WSW,
        Direction::WNW,
        Direction::NNW,
        Direction::Stay,
    ];

    /// (Δrow, Δcol) of a single step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::N => (-1, 0),
            Direction::S => (1, 0),
            Direction::W => (0, -1),
            Direction::E => (0, 1),
            Direction::NW => (-1, -1),
            Direction::NE => (-1, 1),
            Direction::SW => (1, -1),
            Direction::SE => (1, 1),
            Direction::NNE => (-2, 1),
            Direction::ENE => (-1, 2),
            Direction::ESE => (1, 2),
            Direction::SSE => (2, 1),
            Direction::SSW => (2, -1),
            Direction::WSW => (1, -2),
            Direction::WNW => (-1, -2),
            Direction::NNW => (-2, -1),
            Direction::Stay => (0, 0),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::S => "S",
            Direction::W => "W",
            Direction::E => "E",
            Direction::NW => "NW",
            Direction::NE => "NE",
            Direction::SW => "SW",
            Direction::SE => "SE",
            Direction::NNE => "NNE",
            Direction::ENE => "ENE",
            Direction::ESE => "ESE",
            Direction::SSE => "SSE",
            Direction::SSW => "SSW",
            Direction::WSW => "WSW",
            Direction::WNW => "WNW",
            Direction::NNW => "NNW",
            Direction::Stay => "~",
        }
    }

    fn from_delta(delta: (isize, isize)) -> Direction {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.delta() == delta)
            .unwrap_or_else(|| unreachable!("no direction with delta {delta:?}"))
    }

    pub fn opposite(self) -> Direction {
        let (dr, dc) = self.delta();
        Direction::from_delta((-dr, -dc))
    }

    /// Quarter turn clockwise: north becomes east.
    pub fn rotate_cw(self) -> Direction {
        let (dr, dc) = self.delta();
        Direction::from_delta((dc, -dr))
    }

    /// Quarter turn counter-clockwise: north becomes west.
    pub fn rotate_ccw(self) -> Direction {
        let (dr, dc) = self.delta();
        Direction::from_delta((-dc, dr))
    }

    /// Knight and stay codes belong to neither family.
    pub fn move_type(self) -> Option<MoveType> {
        if Direction::ORTHOGONAL.contains(&self) {
            Some(MoveType::Orthogonal)
        } else if Direction::DIAGONAL.contains(&self) {
            Some(MoveType::Diagonal)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.code() == code)
            .ok_or_else(|| format!("unknown direction code {code:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert_eq!(Direction::N.opposite(), Direction::S);
        assert_eq!(Direction::NE.opposite(), Direction::SW);
        assert_eq!(Direction::NNE.opposite(), Direction::SSW);
        assert_eq!(Direction::Stay.opposite(), Direction::Stay);
    }

    #[test]
    fn test_rotations() {
        assert_eq!(Direction::N.rotate_cw(), Direction::E);
        assert_eq!(Direction::E.rotate_cw(), Direction::S);
        assert_eq!(Direction::NE.rotate_cw(), Direction::SE);
        assert_eq!(Direction::N.rotate_ccw(), Direction::W);
        assert_eq!(Direction::SW.rotate_ccw(), Direction::SE);

        for direction in Direction::ALL {
            assert_eq!(direction.rotate_cw().rotate_ccw(), direction);
            assert_eq!(
                direction.rotate_cw().rotate_cw(),
                direction.opposite(),
                "two quarter turns of {direction}"
            );
        }
    }

    #[test]
    fn test_move_type_partition() {
        for direction in Direction::ORTHOGONAL {
            assert_eq!(direction.move_type(), Some(MoveType::Orthogonal));
        }
        for direction in Direction::DIAGONAL {
            assert_eq!(direction.move_type(), Some(MoveType::Diagonal));
        }
        for direction in Direction::KNIGHT {
            assert_eq!(direction.move_type(), None);
        }
        assert_eq!(Direction::Stay.move_type(), None);
        assert_eq!(MoveType::Orthogonal.flip(), MoveType::Diagonal);
        assert_eq!(MoveType::Diagonal.directions(), &Direction::DIAGONAL);
    }

    #[test]
    fn test_codes_round_trip_through_parse() {
        for direction in Direction::ALL {
            assert_eq!(direction.code().parse::<Direction>(), Ok(direction));
        }
        assert!("X".parse::<Direction>().is_err());
    }
}
