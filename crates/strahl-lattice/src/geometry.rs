//! Fixed-point geometry resolution.
//!
//! [`resolve`] repeatedly applies a per-element derivation to the whole
//! sequence until a pass changes nothing. Each pass is Jacobi-style: every
//! element of pass `n + 1` is derived from the frozen pass-`n` sequence, so
//! the derivation is a pure function of its input and a resolved sequence
//! is a fixed point.
//!
//! The loop is bounded; a sequence that is still changing after
//! `max_passes` is rejected with [`LatticeError::GeometryDivergence`].

use tracing::debug;

use crate::descriptor::Geometry;
use crate::error::LatticeError;

/// Outcome of a successful resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveReport {
    /// Passes that changed at least one field. Zero for an already
    /// resolved sequence.
    pub changing_passes: usize,
}

/// Default pass bound for a sequence of `len` elements.
///
/// The derivation propagates placements one neighbour per pass, so a
/// sequential lattice needs at most `len + 2` changing passes.
pub fn default_max_passes(len: usize) -> usize {
    2 * len + 4
}

/// Derive the missing placement fields of element `i` from the frozen
/// sequence `seq`.
///
/// Never overwrites a known field, so applying it to a complete sequence
/// is a no-op.
pub fn derive(seq: &[Geometry], i: usize) -> Geometry {
    let mut g = seq[i];

    if g.length.is_none() {
        g.length = derive_length(&g);
    }
    if g.orbit_length.is_none() {
        g.orbit_length = g.length;
    }

    let Some(length) = g.length else {
        return g;
    };

    let unplaced = g.at_entry.is_none() && g.at_center.is_none() && g.at_exit.is_none();
    if unplaced {
        // Abut the upstream element; the first element starts at the origin.
        g.at_entry = if i == 0 { Some(0.0) } else { seq[i - 1].at_exit };
    }

    if g.at_entry.is_none() {
        g.at_entry = g
            .at_center
            .map(|c| c - length / 2.0)
            .or_else(|| g.at_exit.map(|x| x - length));
    }
    if g.at_center.is_none() {
        g.at_center = g
            .at_entry
            .map(|e| e + length / 2.0)
            .or_else(|| g.at_exit.map(|x| x - length / 2.0));
    }
    if g.at_exit.is_none() {
        g.at_exit = g
            .at_entry
            .map(|e| e + length)
            .or_else(|| g.at_center.map(|c| c + length / 2.0));
    }
    g
}

fn derive_length(g: &Geometry) -> Option<f64> {
    match (g.at_entry, g.at_center, g.at_exit) {
        (Some(entry), _, Some(exit)) => Some(exit - entry),
        (Some(entry), Some(center), None) => Some(2.0 * (center - entry)),
        (None, Some(center), Some(exit)) => Some(2.0 * (exit - center)),
        _ => Some(g.orbit_length.unwrap_or(0.0)),
    }
}

/// Resolve `geometries` to a fixed point with the standard derivation.
///
/// `names` must be parallel to `geometries`; they are only used to report
/// unsettled elements on divergence.
pub fn resolve(
    geometries: Vec<Geometry>,
    names: &[String],
    max_passes: usize,
) -> Result<(Vec<Geometry>, ResolveReport), LatticeError> {
    resolve_with(geometries, names, max_passes, derive)
}

/// Resolve `geometries` to a fixed point with a caller-supplied derivation.
///
/// `derive` must be referentially transparent; the loop stops as soon as
/// one full pass returns a sequence equal to its input.
pub fn resolve_with<F>(
    geometries: Vec<Geometry>,
    names: &[String],
    max_passes: usize,
    derive: F,
) -> Result<(Vec<Geometry>, ResolveReport), LatticeError>
where
    F: Fn(&[Geometry], usize) -> Geometry,
{
    debug_assert_eq!(geometries.len(), names.len());
    let mut current = geometries;
    let mut changing_passes = 0;

    loop {
        let next: Vec<Geometry> = (0..current.len()).map(|i| derive(&current, i)).collect();
        if next == current {
            debug!(passes = changing_passes, "geometry reached a fixed point");
            return Ok((current, ResolveReport { changing_passes }));
        }
        changing_passes += 1;
        if changing_passes >= max_passes {
            let unsettled = current
                .iter()
                .zip(&next)
                .zip(names)
                .filter(|((a, b), _)| a != b)
                .map(|(_, name)| name.clone())
                .collect();
            return Err(LatticeError::GeometryDivergence {
                passes: changing_passes,
                unsettled,
            });
        }
        debug!(pass = changing_passes, "geometry pass changed the sequence");
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("E{i}")).collect()
    }

    fn lengths(ls: &[f64]) -> Vec<Geometry> {
        ls.iter()
            .map(|&l| Geometry {
                length: Some(l),
                ..Geometry::default()
            })
            .collect()
    }

    #[test]
    fn sequential_lengths_chain_from_origin() {
        let (seq, report) = resolve(lengths(&[1.0, 2.0, 0.5]), &names(3), 10).unwrap();
        assert_eq!(seq[0].at_entry, Some(0.0));
        assert_eq!(seq[1].at_entry, Some(1.0));
        assert_eq!(seq[2].at_exit, Some(3.5));
        assert_eq!(seq[2].at_center, Some(3.25));
        assert!(report.changing_passes >= 3);
    }

    #[test]
    fn center_and_length_place_element() {
        let g = Geometry {
            length: Some(2.0),
            at_center: Some(5.0),
            ..Geometry::default()
        };
        let (seq, _) = resolve(vec![g], &names(1), 10).unwrap();
        assert_eq!(seq[0].at_entry, Some(4.0));
        assert_eq!(seq[0].at_exit, Some(6.0));
        assert_eq!(seq[0].orbit_length, Some(2.0));
    }

    #[test]
    fn length_from_positions() {
        let g = Geometry {
            at_entry: Some(1.0),
            at_exit: Some(4.0),
            ..Geometry::default()
        };
        let (seq, _) = resolve(vec![g], &names(1), 10).unwrap();
        assert_eq!(seq[0].length, Some(3.0));
        assert_eq!(seq[0].at_center, Some(2.5));
    }

    #[test]
    fn orbit_length_supplies_length() {
        let g = Geometry {
            orbit_length: Some(1.5),
            at_entry: Some(0.0),
            ..Geometry::default()
        };
        let (seq, _) = resolve(vec![g], &names(1), 10).unwrap();
        assert_eq!(seq[0].length, Some(1.5));
        assert_eq!(seq[0].at_exit, Some(1.5));
    }

    #[test]
    fn explicit_asymmetric_center_is_kept() {
        let g = Geometry {
            length: Some(2.0),
            orbit_length: Some(2.0),
            at_entry: Some(0.0),
            at_center: Some(1.2),
            at_exit: Some(2.0),
        };
        let (seq, report) = resolve(vec![g], &names(1), 10).unwrap();
        assert_eq!(seq[0].at_center, Some(1.2));
        assert_eq!(report.changing_passes, 0);
    }

    #[test]
    fn resolving_twice_is_a_no_op() {
        let (seq, _) = resolve(lengths(&[1.0, 0.0, 3.0]), &names(3), 10).unwrap();
        let (again, report) = resolve(seq.clone(), &names(3), 10).unwrap();
        assert_eq!(again, seq);
        assert_eq!(report.changing_passes, 0);
    }

    #[test]
    fn oscillating_derivation_diverges() {
        let flip = |seq: &[Geometry], i: usize| {
            let mut g = seq[i];
            g.length = Some(if g.length == Some(1.0) { 2.0 } else { 1.0 });
            g
        };
        let err = resolve_with(lengths(&[1.0, 1.0]), &names(2), 8, flip).unwrap_err();
        match err {
            LatticeError::GeometryDivergence { passes, unsettled } => {
                assert_eq!(passes, 8);
                assert_eq!(unsettled, vec!["E0".to_string(), "E1".to_string()]);
            }
            other => panic!("expected divergence, got {other:?}"),
        }
    }

    #[test]
    fn default_bound_covers_long_sequences() {
        let n = 200;
        let (seq, report) =
            resolve(lengths(&vec![0.25; n]), &names(n), default_max_passes(n)).unwrap();
        assert!(report.changing_passes < default_max_passes(n));
        assert!((seq[n - 1].at_exit.unwrap() - 50.0).abs() < 1e-9);
    }
}
