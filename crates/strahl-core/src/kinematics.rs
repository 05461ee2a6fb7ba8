//! Relativistic kinematics of the reference particle.
//!
//! Energies are kinetic energies in MeV, momenta in MeV/c and magnetic
//! rigidities in T·m.

use crate::error::PhysicsError;

/// Proton rest mass (MeV/c²).
pub const PROTON_MASS_MEV: f64 = 938.272_088_16;

/// Conversion factor between momentum in MeV/c and rigidity in T·m.
const MEV_PER_TESLA_METRE: f64 = 299.792_458;

/// Momentum (MeV/c) of a particle with kinetic energy `energy` (MeV).
pub fn energy_to_momentum(energy: f64, mass: f64) -> f64 {
    (energy * (energy + 2.0 * mass)).sqrt()
}

/// Kinetic energy (MeV) of a particle with momentum `momentum` (MeV/c).
pub fn momentum_to_energy(momentum: f64, mass: f64) -> f64 {
    (momentum * momentum + mass * mass).sqrt() - mass
}

/// Magnetic rigidity (T·m) of a particle with kinetic energy `energy` (MeV).
pub fn energy_to_rigidity(energy: f64, mass: f64) -> f64 {
    energy_to_momentum(energy, mass) / MEV_PER_TESLA_METRE
}

/// Kinematic state of the reference particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    mass: f64,
    energy: f64,
}

impl Kinematics {
    /// Reference particle from its kinetic energy (MeV) and rest mass (MeV/c²).
    ///
    /// Both must be finite; the energy must be positive and the mass
    /// non-negative.
    pub fn from_kinetic_energy(energy: f64, mass: f64) -> Result<Self, PhysicsError> {
        if !energy.is_finite() || energy <= 0.0 {
            return Err(PhysicsError::InvalidEnergy { value: energy });
        }
        if !mass.is_finite() || mass < 0.0 {
            return Err(PhysicsError::InvalidMass { value: mass });
        }
        Ok(Self { mass, energy })
    }

    /// Reference particle from its momentum (MeV/c) and rest mass (MeV/c²).
    pub fn from_momentum(momentum: f64, mass: f64) -> Result<Self, PhysicsError> {
        if !momentum.is_finite() || momentum <= 0.0 {
            return Err(PhysicsError::InvalidMomentum { value: momentum });
        }
        Self::from_kinetic_energy(momentum_to_energy(momentum, mass), mass)
    }

    /// Proton with the given kinetic energy (MeV).
    pub fn proton(energy: f64) -> Result<Self, PhysicsError> {
        Self::from_kinetic_energy(energy, PROTON_MASS_MEV)
    }

    /// Rest mass (MeV/c²).
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Kinetic energy (MeV).
    pub fn kinetic_energy(&self) -> f64 {
        self.energy
    }

    /// Total energy (MeV).
    pub fn total_energy(&self) -> f64 {
        self.energy + self.mass
    }

    /// Momentum (MeV/c).
    pub fn momentum(&self) -> f64 {
        energy_to_momentum(self.energy, self.mass)
    }

    /// Relativistic gamma.
    pub fn gamma(&self) -> f64 {
        if self.mass == 0.0 {
            return f64::INFINITY;
        }
        self.total_energy() / self.mass
    }

    /// Relativistic beta.
    pub fn beta(&self) -> f64 {
        self.momentum() / self.total_energy()
    }

    /// Magnetic rigidity (T·m).
    pub fn rigidity(&self) -> f64 {
        energy_to_rigidity(self.energy, self.mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proton_230_mev() {
        let k = Kinematics::proton(230.0).unwrap();
        assert!((k.momentum() - 696.06).abs() < 0.01, "p = {}", k.momentum());
        assert!((k.rigidity() - 2.3218).abs() < 1e-3, "brho = {}", k.rigidity());
        assert!(k.beta() > 0.59 && k.beta() < 0.60, "beta = {}", k.beta());
    }

    #[test]
    fn momentum_energy_round_trip() {
        let p = energy_to_momentum(70.0, PROTON_MASS_MEV);
        let e = momentum_to_energy(p, PROTON_MASS_MEV);
        assert!((e - 70.0).abs() < 1e-9);
        let k = Kinematics::from_momentum(p, PROTON_MASS_MEV).unwrap();
        assert!((k.kinetic_energy() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_physical_inputs() {
        assert_eq!(
            Kinematics::proton(0.0),
            Err(PhysicsError::InvalidEnergy { value: 0.0 })
        );
        assert!(Kinematics::proton(f64::NAN).is_err());
        assert!(Kinematics::from_kinetic_energy(100.0, -1.0).is_err());
        assert!(Kinematics::from_momentum(-5.0, PROTON_MASS_MEV).is_err());
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rigidity_grows_with_energy(e in 1.0f64..5000.0, de in 0.1f64..100.0) {
                prop_assert!(
                    energy_to_rigidity(e + de, PROTON_MASS_MEV) > energy_to_rigidity(e, PROTON_MASS_MEV)
                );
            }

            #[test]
            fn beta_is_below_one(e in 0.01f64..1.0e6) {
                let k = Kinematics::proton(e).unwrap();
                prop_assert!(k.beta() > 0.0 && k.beta() < 1.0);
            }
        }
    }
}
