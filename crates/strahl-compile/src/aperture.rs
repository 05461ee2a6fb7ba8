//! Aperture decoding.
//!
//! Sizes come from one of three places, in order: a numeric size, a text
//! literal of one or two comma-separated numbers (`"0.03"`,
//! `"[0.03, 0.02]"`, `"{0.01,0.02}"`), or, when the element's plug is
//! `APERTURE`, the circuit context addressed by the same bracket/comma
//! convention with each missing component defaulting to `1.0`.

use smallvec::SmallVec;
use strahl_core::ApertureKind;
use strahl_lattice::{ApertureValue, ElementDescriptor};

use crate::context::CompileContext;
use crate::error::CompileError;

/// Default size of a circuit-driven aperture component (m).
const CIRCUIT_APERTURE_DEFAULT: f64 = 1.0;

/// A decoded aperture: shape code plus the two sizes stored in the record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedAperture {
    /// Shape.
    pub kind: ApertureKind,
    /// First size (m).
    pub a: f64,
    /// Second size (m).
    pub b: f64,
}

impl ResolvedAperture {
    const NONE: ResolvedAperture = ResolvedAperture {
        kind: ApertureKind::None,
        a: 0.0,
        b: 0.0,
    };
}

/// Split a bracketed, comma-separated list into trimmed components.
fn components(text: &str) -> impl Iterator<Item = &str> {
    text.trim()
        .trim_matches(|c| matches!(c, '[' | ']' | '{' | '}'))
        .split(',')
        .map(str::trim)
}

/// Parse a one- or two-component aperture literal.
///
/// Returns `None` if any component is not a number or there are more than
/// two components.
pub fn parse_sizes(text: &str) -> Option<SmallVec<[f64; 2]>> {
    let mut sizes = SmallVec::new();
    for part in components(text) {
        if sizes.len() == 2 {
            return None;
        }
        sizes.push(part.parse::<f64>().ok()?);
    }
    Some(sizes)
}

/// Decode the aperture of one element.
///
/// Only `CIRCLE` and `RECTANGLE` produce an active aperture; any other
/// shape tag, or none, decodes to [`ApertureKind::None`] with zero sizes.
pub fn resolve(
    element: &ElementDescriptor,
    context: &CompileContext,
) -> Result<ResolvedAperture, CompileError> {
    let Some(tag) = element.apertype.as_deref() else {
        return Ok(ResolvedAperture::NONE);
    };
    let kind = match ApertureKind::from_name(tag) {
        k @ (ApertureKind::Circle | ApertureKind::Rectangle) => k,
        _ => return Ok(ResolvedAperture::NONE),
    };

    let second = element.aperture_2.unwrap_or(0.0);
    let (a, b) = match &element.aperture {
        Some(ApertureValue::Size(a)) => (*a, second),
        Some(ApertureValue::Text(text)) => {
            let sizes = parse_sizes(text).ok_or_else(|| CompileError::InvalidApertureSpec {
                element: element.name.clone(),
                value: text.clone(),
            })?;
            (sizes[0], sizes.get(1).copied().unwrap_or(second))
        }
        None if plugs_aperture(element) => from_circuits(element, context),
        None => (0.0, second),
    };
    Ok(ResolvedAperture { kind, a, b })
}

fn plugs_aperture(element: &ElementDescriptor) -> bool {
    element
        .plug
        .as_deref()
        .is_some_and(|p| p.trim().eq_ignore_ascii_case("APERTURE"))
}

fn from_circuits(element: &ElementDescriptor, context: &CompileContext) -> (f64, f64) {
    let circuit = element.circuit.as_deref().unwrap_or_default();
    let names: SmallVec<[&str; 2]> = components(circuit).collect();
    // A zero or missing excitation leaves the aperture fully open.
    let a = names
        .first()
        .and_then(|n| context.circuit(n))
        .filter(|&v| v != 0.0)
        .unwrap_or(CIRCUIT_APERTURE_DEFAULT);
    let b = names
        .get(1)
        .and_then(|n| context.circuit(n))
        .unwrap_or(CIRCUIT_APERTURE_DEFAULT);
    (a, b)
}
