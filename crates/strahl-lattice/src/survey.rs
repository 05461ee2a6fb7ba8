//! Survey-to-sequence conversion.
//!
//! Survey input gives absolute element-centre positions in millimetres and
//! angles in degrees. Conversion turns those into the sequential form the
//! geometry resolver expects: angles in radians and an `AT_CENTER` column
//! computed from the straight-line distance between consecutive centres,
//! corrected for the difference between each element's length and its
//! orbit length.

use tracing::warn;

use crate::descriptor::{ElementDescriptor, Geometry};
use crate::error::LatticeError;
use crate::geometry::resolve_with;

/// Convert every bend and rotation angle from degrees to radians.
pub fn angles_to_radians(elements: &mut [ElementDescriptor]) {
    for e in elements {
        if let Some(angle) = e.angle.as_mut() {
            *angle = angle.to_radians();
        }
    }
}

/// Fill `LENGTH` and `ORBIT_LENGTH` without touching positions.
///
/// Runs the bounded fixed-point loop with a derivation restricted to the
/// two length fields.
pub fn resolve_lengths(
    elements: &mut [ElementDescriptor],
    max_passes: usize,
) -> Result<(), LatticeError> {
    let names: Vec<String> = elements.iter().map(|e| e.name.clone()).collect();
    let geometries: Vec<Geometry> = elements.iter().map(|e| e.geometry).collect();
    let (resolved, _) = resolve_with(geometries, &names, max_passes, |seq, i| {
        let mut g = seq[i];
        if g.length.is_none() {
            g.length = match (g.at_entry, g.at_center, g.at_exit) {
                (Some(entry), _, Some(exit)) => Some(exit - entry),
                _ => g.orbit_length,
            };
        }
        if g.orbit_length.is_none() {
            g.orbit_length = g.length;
        }
        g
    })?;
    for (e, g) in elements.iter_mut().zip(resolved) {
        e.geometry = g;
    }
    Ok(())
}

/// Cumulative arc-length centres of a survey sequence (m).
///
/// Every element must carry a survey point; the missing ones are reported
/// together.
pub fn survey_centers(elements: &[ElementDescriptor]) -> Result<Vec<f64>, LatticeError> {
    let missing: Vec<String> = elements
        .iter()
        .filter(|e| e.survey.is_none())
        .map(|e| e.name.clone())
        .collect();
    if !missing.is_empty() {
        warn!(count = missing.len(), "survey lattice has elements without positions");
        return Err(LatticeError::MissingSurveyData { names: missing });
    }

    let half_excess = |e: &ElementDescriptor| {
        let length = e.geometry.length.unwrap_or(0.0);
        let orbit = e.geometry.orbit_length.unwrap_or(0.0);
        (length - orbit) / 2.0
    };

    let offset = elements
        .first()
        .and_then(|e| e.geometry.orbit_length)
        .unwrap_or(0.0)
        / 2.0;

    let mut centers = Vec::with_capacity(elements.len());
    let mut cumulative = 0.0;
    let mut previous: Option<&ElementDescriptor> = None;
    for e in elements {
        let p = e.survey.unwrap_or_default();
        let distance = previous
            .and_then(|prev| prev.survey)
            .map(|q| {
                let (dx, dy, dz) = (p.x - q.x, p.y - q.y, p.z - q.z);
                (dx * dx + dy * dy + dz * dz).sqrt() / 1000.0
            })
            .unwrap_or(0.0);
        cumulative += distance - half_excess(e) + previous.map_or(0.0, half_excess);
        centers.push(cumulative + offset);
        previous = Some(e);
    }
    Ok(centers)
}

/// Convert a survey sequence in place so the generic resolver can finish it.
///
/// After this call every element has its length fields and an `AT_CENTER`;
/// entry and exit positions are cleared so they are re-derived from the
/// centre.
pub fn convert(elements: &mut [ElementDescriptor], max_passes: usize) -> Result<(), LatticeError> {
    angles_to_radians(elements);
    resolve_lengths(elements, max_passes)?;
    let centers = survey_centers(elements)?;
    for (e, center) in elements.iter_mut().zip(centers) {
        e.geometry.at_center = Some(center);
        e.geometry.at_entry = None;
        e.geometry.at_exit = None;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_are_converted() {
        let mut es = vec![ElementDescriptor::new("B", "SBEND")];
        es[0].angle = Some(180.0);
        angles_to_radians(&mut es);
        assert!((es[0].angle.unwrap() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn straight_survey_gives_cumulative_centers() {
        let mut es = vec![
            ElementDescriptor::new("A", "QUADRUPOLE")
                .with_length(0.2)
                .with_survey(0.0, 0.0, 0.0),
            ElementDescriptor::new("B", "QUADRUPOLE")
                .with_length(0.2)
                .with_survey(1000.0, 0.0, 0.0),
            ElementDescriptor::new("C", "QUADRUPOLE")
                .with_length(0.2)
                .with_survey(1000.0, 2000.0, 0.0),
        ];
        convert(&mut es, 10).unwrap();
        let c: Vec<f64> = es.iter().map(|e| e.geometry.at_center.unwrap()).collect();
        assert!((c[0] - 0.1).abs() < 1e-12);
        assert!((c[1] - 1.1).abs() < 1e-12);
        assert!((c[2] - 3.1).abs() < 1e-12);
        assert!(es.iter().all(|e| e.geometry.at_entry.is_none()));
    }

    #[test]
    fn length_longer_than_orbit_shifts_center() {
        let es = vec![
            ElementDescriptor::new("A", "DRIFT")
                .with_length(0.0)
                .with_orbit_length(0.0)
                .with_survey(0.0, 0.0, 0.0),
            ElementDescriptor::new("B", "SBEND")
                .with_length(1.2)
                .with_orbit_length(1.0)
                .with_survey(0.0, 0.0, 2000.0),
        ];
        let c = survey_centers(&es).unwrap();
        assert!((c[1] - (2.0 - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn missing_points_are_reported_together() {
        let es = vec![
            ElementDescriptor::new("A", "DRIFT").with_length(1.0),
            ElementDescriptor::new("B", "DRIFT")
                .with_length(1.0)
                .with_survey(0.0, 0.0, 0.0),
            ElementDescriptor::new("C", "DRIFT").with_length(1.0),
        ];
        assert_eq!(
            survey_centers(&es),
            Err(LatticeError::MissingSurveyData {
                names: vec!["A".into(), "C".into()]
            })
        );
    }
}
