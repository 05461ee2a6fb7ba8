//! Compilation context: reference particle, circuit excitations and
//! scattering options.

use indexmap::IndexMap;
use strahl_core::{Kinematics, PhysicsError, PROTON_MASS_MEV};

use crate::scattering::ScatteringOptions;

/// Reference particle energy at the lattice entrance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReferenceEnergy {
    /// Kinetic energy (MeV).
    KineticEnergy(f64),
    /// Momentum (MeV/c).
    Momentum(f64),
}

impl ReferenceEnergy {
    /// Kinematics of the reference particle with rest mass `mass`.
    pub fn kinematics(self, mass: f64) -> Result<Kinematics, PhysicsError> {
        match self {
            ReferenceEnergy::KineticEnergy(e) => Kinematics::from_kinetic_energy(e, mass),
            ReferenceEnergy::Momentum(p) => Kinematics::from_momentum(p, mass),
        }
    }
}

/// Everything the compiler needs besides the lattice.
///
/// The reference energy is required; there is no default beam energy.
#[derive(Clone, Debug, PartialEq)]
pub struct CompileContext {
    /// Reference energy at the lattice entrance.
    pub reference: ReferenceEnergy,
    /// Rest mass of the tracked species (MeV/c²). Default: proton.
    pub mass: f64,
    /// Circuit name to excitation value, in insertion order.
    pub circuits: IndexMap<String, f64>,
    /// Flags forwarded to the scattering model.
    pub scattering: ScatteringOptions,
}

impl CompileContext {
    /// A proton context with no circuits.
    pub fn new(reference: ReferenceEnergy) -> Self {
        Self {
            reference,
            mass: PROTON_MASS_MEV,
            circuits: IndexMap::new(),
            scattering: ScatteringOptions::default(),
        }
    }

    /// Set one circuit excitation.
    pub fn with_circuit(mut self, name: impl Into<String>, value: f64) -> Self {
        self.circuits.insert(name.into(), value);
        self
    }

    /// Set the rest mass (MeV/c²).
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Set the scattering options.
    pub fn with_scattering(mut self, options: ScatteringOptions) -> Self {
        self.scattering = options;
        self
    }

    /// Excitation of a circuit, if known.
    pub fn circuit(&self, name: &str) -> Option<f64> {
        self.circuits.get(name.trim()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_reference_matches_energy_reference() {
        let by_energy = ReferenceEnergy::KineticEnergy(230.0)
            .kinematics(PROTON_MASS_MEV)
            .unwrap();
        let by_momentum = ReferenceEnergy::Momentum(by_energy.momentum())
            .kinematics(PROTON_MASS_MEV)
            .unwrap();
        assert!((by_momentum.kinetic_energy() - 230.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_reference_is_rejected() {
        assert!(ReferenceEnergy::KineticEnergy(-1.0)
            .kinematics(PROTON_MASS_MEV)
            .is_err());
    }

    #[test]
    fn circuits_lookup_trims_names() {
        let ctx = CompileContext::new(ReferenceEnergy::KineticEnergy(100.0))
            .with_circuit("I_Q1", 1.5);
        assert_eq!(ctx.circuit(" I_Q1 "), Some(1.5));
        assert_eq!(ctx.circuit("I_Q2"), None);
    }
}
