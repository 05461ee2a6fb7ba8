//! Symbolic-to-numeric compilation.
//!
//! Each element is compiled by a total function of the element, the
//! context and the kinetic energy at its entrance. The only state carried
//! between elements is that energy, advanced after every element that
//! consumes energy.

use strahl_core::{energy_to_rigidity, ElementClass, ElementRecord, Field, PhysicsError};
use strahl_lattice::{ElementDescriptor, Lattice};
use tracing::{debug, info};

use crate::aperture;
use crate::compiled::{CompiledElement, CompiledLattice};
use crate::context::CompileContext;
use crate::error::CompileError;
use crate::scattering::ScatteringModel;

/// Descriptor fields copied verbatim into the record.
const CARRIED: [Field; 15] = [
    Field::Length,
    Field::Angle,
    Field::E1,
    Field::E2,
    Field::H1,
    Field::H2,
    Field::K1,
    Field::K2,
    Field::K3,
    Field::K4,
    Field::Kick,
    Field::Hgap,
    Field::Fint,
    Field::MisalignmentX,
    Field::MisalignmentY,
];

/// Centimetres per metre; material thickness is given to the scattering
/// model in cm.
const CM_PER_M: f64 = 100.0;

/// Compile a resolved lattice.
///
/// # Errors
///
/// [`CompileError::InvalidReference`] for an unusable reference energy,
/// and any per-element error of [`compile_element`].
pub fn compile(
    lattice: &Lattice,
    context: &CompileContext,
    model: &dyn ScatteringModel,
) -> Result<CompiledLattice, CompileError> {
    let reference = context
        .reference
        .kinematics(context.mass)
        .map_err(CompileError::InvalidReference)?;

    let mut energy = reference.kinetic_energy();
    let mut elements = Vec::with_capacity(lattice.len());
    for descriptor in lattice.elements() {
        let (record, exit_energy) = compile_element(descriptor, context, model, energy)?;
        elements.push(CompiledElement::new(&descriptor.name, energy, record));
        energy = exit_energy;
    }

    info!(
        lattice = lattice.name(),
        elements = elements.len(),
        entry_energy = reference.kinetic_energy(),
        exit_energy = energy,
        "lattice compiled"
    );
    Ok(CompiledLattice::new(lattice.name(), reference, elements))
}

/// Compile one element entered at kinetic energy `energy` (MeV).
///
/// Returns the record and the kinetic energy at the element exit.
pub fn compile_element(
    descriptor: &ElementDescriptor,
    context: &CompileContext,
    model: &dyn ScatteringModel,
    energy: f64,
) -> Result<(ElementRecord, f64), CompileError> {
    let class = ElementClass::from_name(&descriptor.class);
    if class == ElementClass::None {
        debug!(
            element = %descriptor.name,
            class = %descriptor.class,
            "unknown class compiled as NONE"
        );
    }

    let mut record = ElementRecord::new(class);
    for field in CARRIED {
        record.set(field, descriptor.field(field).unwrap_or(0.0));
    }

    if let Some(field) = plugged_field(descriptor) {
        let value = descriptor
            .circuit
            .as_deref()
            .and_then(|c| context.circuit(c))
            .unwrap_or(0.0);
        record.set(field, value);
    }

    let ap = aperture::resolve(descriptor, context)?;
    record.set_aperture_kind(ap.kind);
    record.set(Field::Aperture, ap.a);
    record.set(Field::Aperture2, ap.b);

    record.set(Field::Brho, energy_to_rigidity(energy, context.mass));

    if !class.consumes_energy() {
        return Ok((record, energy));
    }

    let length = record.length();
    let thickness = CM_PER_M * length;
    let physics = |source: PhysicsError| CompileError::Physics {
        element: descriptor.name.clone(),
        source,
    };

    if class == ElementClass::Degrader {
        let material = descriptor
            .material
            .as_deref()
            .ok_or_else(|| CompileError::MissingMaterial {
                element: descriptor.name.clone(),
            })?;
        let loss = model
            .compute_loss_model(material, energy, thickness, &context.scattering)
            .map_err(physics)?;
        record.set(Field::FeA0, loss.moments[0]);
        record.set(Field::FeA1, loss.moments[1]);
        record.set(Field::FeA2, loss.moments[2]);
        record.set(Field::FeDpp, loss.dpp);
        record.set(Field::FeLoss, loss.loss);
    }

    let exit_energy = match descriptor.material.as_deref() {
        Some(material) => {
            let residual = model
                .residual_energy(material, energy, thickness)
                .map_err(physics)?;
            if !residual.is_finite() || residual <= 0.0 {
                return Err(physics(PhysicsError::BeamStopped {
                    material: material.to_string(),
                    thickness,
                }));
            }
            residual
        }
        None => energy,
    };
    Ok((record, exit_energy))
}

/// The record field fed by the element's circuit, if any.
///
/// Class code, aperture code and aperture sizes are never plugged
/// directly; aperture plugs are handled by aperture decoding.
fn plugged_field(descriptor: &ElementDescriptor) -> Option<Field> {
    let field = descriptor.plug.as_deref()?.parse::<Field>().ok()?;
    match field {
        Field::ClassCode | Field::AperTypeCode | Field::Aperture | Field::Aperture2 => None,
        f => Some(f),
    }
}
