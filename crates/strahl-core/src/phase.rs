//! Phase-space coordinates of a single particle.
//!
//! A particle is a fixed-width row of [`PHASE_DIM`] coordinates, indexed
//! by [`Coord`]. Positions are in metres, angles in radians and the
//! momentum deviation is dimensionless.

/// Number of phase-space coordinates per particle.
pub const PHASE_DIM: usize = 5;

/// One particle: `[x, px, y, py, dpp]`.
pub type Phase = [f64; PHASE_DIM];

/// Column index into a [`Phase`] row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Coord {
    /// Horizontal position.
    X = 0,
    /// Horizontal angle.
    Px = 1,
    /// Vertical position.
    Y = 2,
    /// Vertical angle.
    Py = 3,
    /// Relative momentum deviation.
    Dpp = 4,
}

impl Coord {
    /// All coordinates in column order.
    pub const ALL: [Coord; PHASE_DIM] = [Coord::X, Coord::Px, Coord::Y, Coord::Py, Coord::Dpp];

    /// Column index of this coordinate.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase label (`"x"`, `"px"`, ...).
    pub const fn label(self) -> &'static str {
        match self {
            Coord::X => "x",
            Coord::Px => "px",
            Coord::Y => "y",
            Coord::Py => "py",
            Coord::Dpp => "dpp",
        }
    }
}
