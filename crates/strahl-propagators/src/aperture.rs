//! Aperture checks.
//!
//! A particle is lost when it lies strictly outside the aperture; a
//! particle exactly on the boundary survives. The aperture is centred on
//! the element axis, so misaligned elements cut an offset region.
//!
//! Lost particles are flagged, not removed: their status records the turn
//! and element of loss and the tracking loop freezes their coordinates.

use strahl_beam::ParticleStatus;
use strahl_core::{Aperture, ApertureKind, Coord, ElementIndex, Misalignment, Phase, TurnIndex};

/// Whether `p` is inside `aperture` of an element offset by `misalignment`.
#[inline]
pub fn is_inside(aperture: &Aperture, misalignment: &Misalignment, p: &Phase) -> bool {
    let x = p[Coord::X.index()] - misalignment.dx;
    let y = p[Coord::Y.index()] - misalignment.dy;
    let (a, b) = (aperture.a, aperture.b);
    match aperture.kind {
        ApertureKind::None => true,
        ApertureKind::Circle => x * x + y * y <= a * a,
        ApertureKind::Rectangle => x.abs() <= a && y.abs() <= b,
        ApertureKind::Ellipse => (x / a).powi(2) + (y / b).powi(2) <= 1.0,
    }
}

/// Flag every live particle outside the aperture as lost at
/// `(turn, element)`. Returns the number of particles newly lost.
pub fn check_apertures(
    aperture: &Aperture,
    misalignment: &Misalignment,
    coordinates: &[Phase],
    status: &mut [ParticleStatus],
    turn: TurnIndex,
    element: ElementIndex,
) -> usize {
    if aperture.kind == ApertureKind::None {
        return 0;
    }
    let mut lost = 0;
    for (p, s) in coordinates.iter().zip(status.iter_mut()) {
        if s.is_alive() && !is_inside(aperture, misalignment, p) {
            *s = ParticleStatus::Lost { turn, element };
            lost += 1;
        }
    }
    lost
}
