//! The particle array and its loss bookkeeping.

use strahl_core::{ElementIndex, Kinematics, Phase, TurnIndex};

use crate::error::BeamError;
use crate::statistics::BeamStatistics;

/// Whether a particle is still being tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParticleStatus {
    /// Inside every aperture so far.
    #[default]
    Alive,
    /// Lost on the aperture of `element` during `turn`.
    Lost {
        /// Turn of loss.
        turn: TurnIndex,
        /// Element whose aperture removed the particle.
        element: ElementIndex,
    },
}

impl ParticleStatus {
    /// Whether the particle is alive.
    pub fn is_alive(&self) -> bool {
        matches!(self, ParticleStatus::Alive)
    }
}

/// A beam: particle coordinates, their status and the reference particle.
///
/// The row count never changes. Lost particles keep their row.
#[derive(Clone, Debug, PartialEq)]
pub struct Beam {
    kinematics: Kinematics,
    coordinates: Vec<Phase>,
    status: Vec<ParticleStatus>,
}

impl Beam {
    /// A beam of live particles.
    ///
    /// # Errors
    ///
    /// [`BeamError::Empty`] if `coordinates` is empty.
    pub fn new(kinematics: Kinematics, coordinates: Vec<Phase>) -> Result<Self, BeamError> {
        if coordinates.is_empty() {
            return Err(BeamError::Empty);
        }
        let status = vec![ParticleStatus::Alive; coordinates.len()];
        Ok(Self {
            kinematics,
            coordinates,
            status,
        })
    }

    /// Reassemble a beam from its parts.
    pub fn from_parts(
        kinematics: Kinematics,
        coordinates: Vec<Phase>,
        status: Vec<ParticleStatus>,
    ) -> Result<Self, BeamError> {
        if coordinates.is_empty() {
            return Err(BeamError::Empty);
        }
        if coordinates.len() != status.len() {
            return Err(BeamError::LengthMismatch {
                coordinates: coordinates.len(),
                status: status.len(),
            });
        }
        Ok(Self {
            kinematics,
            coordinates,
            status,
        })
    }

    /// Split into kinematics, coordinates and status.
    pub fn into_parts(self) -> (Kinematics, Vec<Phase>, Vec<ParticleStatus>) {
        (self.kinematics, self.coordinates, self.status)
    }

    /// Reference particle.
    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    /// Number of particles, alive or lost.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Always `false`: construction rejects empty beams.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Coordinates of every particle, including lost ones.
    pub fn coordinates(&self) -> &[Phase] {
        &self.coordinates
    }

    /// Status of every particle.
    pub fn status(&self) -> &[ParticleStatus] {
        &self.status
    }

    /// Borrowed view for observers and statistics.
    pub fn view(&self) -> BeamView<'_> {
        BeamView::new(&self.kinematics, &self.coordinates, &self.status)
    }

    /// Number of live particles.
    pub fn alive_count(&self) -> usize {
        self.view().alive_count()
    }

    /// Loss-aware statistics of the live particles.
    pub fn statistics(&self) -> BeamStatistics {
        BeamStatistics::from_view(&self.view())
    }
}

/// A borrowed beam: what observers see at each record point.
#[derive(Clone, Copy, Debug)]
pub struct BeamView<'a> {
    kinematics: &'a Kinematics,
    coordinates: &'a [Phase],
    status: &'a [ParticleStatus],
}

impl<'a> BeamView<'a> {
    /// Borrow parallel coordinate and status arrays.
    ///
    /// # Panics
    ///
    /// If the arrays differ in length.
    pub fn new(
        kinematics: &'a Kinematics,
        coordinates: &'a [Phase],
        status: &'a [ParticleStatus],
    ) -> Self {
        assert_eq!(coordinates.len(), status.len(), "coordinate/status length mismatch");
        Self {
            kinematics,
            coordinates,
            status,
        }
    }

    /// Reference particle.
    pub fn kinematics(&self) -> &'a Kinematics {
        self.kinematics
    }

    /// Every row, alive or lost.
    pub fn coordinates(&self) -> &'a [Phase] {
        self.coordinates
    }

    /// Status of every row.
    pub fn status(&self) -> &'a [ParticleStatus] {
        self.status
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Whether there are no particles.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Coordinates of the live particles only.
    pub fn alive(&self) -> impl Iterator<Item = &'a Phase> + 'a {
        self.coordinates
            .iter()
            .zip(self.status)
            .filter(|(_, s)| s.is_alive())
            .map(|(p, _)| p)
    }

    /// Number of live particles.
    pub fn alive_count(&self) -> usize {
        self.status.iter().filter(|s| s.is_alive()).count()
    }

    /// Owned snapshot copy.
    pub fn to_beam(&self) -> Beam {
        Beam {
            kinematics: *self.kinematics,
            coordinates: self.coordinates.to_vec(),
            status: self.status.to_vec(),
        }
    }
}
