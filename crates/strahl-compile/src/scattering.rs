//! The scattering-physics collaborator.
//!
//! Material tables (stopping powers, Fermi-Eyges scattering moments) live
//! outside this workspace. The compiler only needs the interface below.

use strahl_core::PhysicsError;

/// Flags forwarded to the scattering model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScatteringOptions {
    /// Model the momentum spread added by the material.
    pub with_dpp: bool,
    /// Model the fraction of particles lost in the material.
    pub with_losses: bool,
}

/// Energy-loss shape parameters of one degrader.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LossModel {
    /// Fermi-Eyges moments A0, A1, A2.
    pub moments: [f64; 3],
    /// Momentum spread added by the material.
    pub dpp: f64,
    /// Fraction of particles lost.
    pub loss: f64,
}

/// Material physics used by the compiler.
///
/// Energies are kinetic energies in MeV, thicknesses in centimetres.
/// Implementations must be pure: the same inputs give the same outputs.
pub trait ScatteringModel {
    /// Loss-model parameters for `thickness` cm of `material` traversed at
    /// `energy` MeV.
    fn compute_loss_model(
        &self,
        material: &str,
        energy: f64,
        thickness: f64,
        options: &ScatteringOptions,
    ) -> Result<LossModel, PhysicsError>;

    /// Kinetic energy after traversing `thickness` cm of `material`.
    fn residual_energy(
        &self,
        material: &str,
        energy: f64,
        thickness: f64,
    ) -> Result<f64, PhysicsError>;
}

/// A model in which materials have no effect.
///
/// Loss parameters are all zero and the energy is unchanged. Suitable for
/// lattices without degraders.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoScattering;

impl ScatteringModel for NoScattering {
    fn compute_loss_model(
        &self,
        _material: &str,
        _energy: f64,
        _thickness: f64,
        _options: &ScatteringOptions,
    ) -> Result<LossModel, PhysicsError> {
        Ok(LossModel::default())
    }

    fn residual_energy(
        &self,
        _material: &str,
        energy: f64,
        _thickness: f64,
    ) -> Result<f64, PhysicsError> {
        Ok(energy)
    }
}
