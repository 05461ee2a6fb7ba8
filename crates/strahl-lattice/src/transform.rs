//! Lattice transforms. Each returns a new resolved [`Lattice`].

use std::cmp::Ordering;

use crate::descriptor::{ApertureValue, ElementDescriptor, Geometry};
use crate::error::{LatticeError, Overlap};
use crate::lattice::{Lattice, LatticeOptions};

/// Gaps and overlaps below this size (m) are ignored.
const GAP_TOLERANCE: f64 = 1e-6;

/// Options of [`Lattice::add_drifts`].
#[derive(Clone, Debug, PartialEq)]
pub struct DriftOptions {
    /// Fill gaps with collimators instead of drifts.
    pub using_collimators: bool,
    /// Give filler drifts a beam-pipe aperture.
    pub with_pipe: bool,
    /// Beam-pipe aperture size (m).
    pub pipe_aperture: f64,
    /// Beam-pipe aperture shape.
    pub pipe_apertype: String,
}

impl Default for DriftOptions {
    fn default() -> Self {
        Self {
            using_collimators: false,
            with_pipe: true,
            pipe_aperture: 1.0,
            pipe_apertype: "CIRCLE".to_string(),
        }
    }
}

impl Lattice {
    /// Fill every gap between consecutive elements with a drift.
    ///
    /// A filler is named `DRIFT_<next element>` and is not physical.
    ///
    /// # Errors
    ///
    /// [`LatticeError::NegativeDriftLength`] listing every pair of
    /// overlapping elements.
    pub fn add_drifts(&self, options: &DriftOptions) -> Result<Lattice, LatticeError> {
        let mut out = Vec::with_capacity(self.len() * 2);
        let mut offenders = Vec::new();
        let mut cursor = 0.0;
        let mut previous: Option<&str> = None;

        for e in self.elements() {
            let entry = e.geometry.at_entry.unwrap_or(cursor);
            let gap = entry - cursor;
            if gap > GAP_TOLERANCE {
                out.push(filler(&e.name, gap, cursor, options));
            } else if gap < -GAP_TOLERANCE {
                offenders.push(Overlap {
                    previous: previous.map(str::to_string),
                    next: e.name.clone(),
                    length: gap,
                });
            }
            out.push(e.clone());
            cursor = e.geometry.at_exit.unwrap_or(entry);
            previous = Some(e.name.as_str());
        }

        if !offenders.is_empty() {
            return Err(LatticeError::NegativeDriftLength { offenders });
        }
        self.rebuilt(self.name().to_string(), out, true)
    }

    /// Add `<NAME>_IN` and `<NAME>_OUT` markers at the entrance and exit of
    /// every element that is not itself a marker, instrument or drift.
    ///
    /// Existing markers are kept and each missing half of a pair is added on
    /// its own; the result is ordered by `AT_CENTER`.
    pub fn add_markers(&self) -> Result<Lattice, LatticeError> {
        // (center, source element, 0 = entry marker / 1 = element / 2 = exit marker)
        let mut keyed: Vec<(f64, usize, u8, ElementDescriptor)> = Vec::new();
        for (i, e) in self.elements().iter().enumerate() {
            let g = e.geometry;
            keyed.push((g.at_center.unwrap_or(0.0), i, 1, e.clone()));
            if ["MARKER", "INSTRUMENT", "DRIFT"]
                .iter()
                .any(|c| e.is_class(c))
            {
                continue;
            }
            let entry_name = format!("{}_IN", e.name);
            if self.get(&entry_name).is_none() {
                let at = g.at_entry.unwrap_or(0.0);
                keyed.push((at, i, 0, marker(entry_name, at)));
            }
            let exit_name = format!("{}_OUT", e.name);
            if self.get(&exit_name).is_none() {
                let at = g.at_exit.unwrap_or(0.0);
                keyed.push((at, i, 2, marker(exit_name, at)));
            }
        }
        if keyed.len() == self.len() {
            return Ok(self.clone());
        }
        keyed.sort_by(|a, b| match a.0.total_cmp(&b.0) {
            Ordering::Equal => (a.1, a.2).cmp(&(b.1, b.2)),
            other => other,
        });
        let elements = keyed.into_iter().map(|(.., e)| e).collect();
        self.rebuilt(self.name().to_string(), elements, true)
    }

    /// Collapse `name` to a zero-length quadrupole at its centre.
    pub fn to_thin(&self, name: &str) -> Result<Lattice, LatticeError> {
        let i = self.require(name)?;
        let mut elements = self.elements().to_vec();
        let e = &mut elements[i];
        let center = e.geometry.at_center;
        e.geometry = Geometry {
            length: Some(0.0),
            orbit_length: Some(0.0),
            at_entry: center,
            at_center: center,
            at_exit: center,
        };
        e.class = "QUADRUPOLE".to_string();
        e.apertype = None;
        e.aperture = None;
        self.rebuilt(self.name().to_string(), elements, true)
    }

    /// The sub-lattice from `start` to `stop`, both included, rebased so
    /// that `start` enters at 0.
    pub fn slice(&self, start: &str, stop: &str) -> Result<Lattice, LatticeError> {
        let (i, j) = (self.require(start)?, self.require(stop)?);
        if i > j {
            return Err(LatticeError::InvalidSlice {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }
        let elements = rebased(&self.elements()[i..=j], 0.0);
        Lattice::with_options(
            self.name().to_string(),
            elements,
            &LatticeOptions::default(),
        )
    }

    /// Join lattices end to end.
    ///
    /// Each lattice is placed after the total length of the preceding ones;
    /// the name is the component names joined by `_`. Positions are taken
    /// as resolved and not re-expanded.
    pub fn concatenate(lattices: &[Lattice]) -> Result<Lattice, LatticeError> {
        let mut elements = Vec::new();
        let mut names = Vec::with_capacity(lattices.len());
        let mut offset = 0.0;
        for l in lattices {
            names.push(l.name());
            elements.extend(rebased(l.elements(), offset));
            offset += l.length();
        }
        Lattice::with_options(
            names.join("_"),
            elements,
            &LatticeOptions {
                with_expansion: false,
                ..LatticeOptions::default()
            },
        )
    }
}

fn filler(next: &str, length: f64, at: f64, options: &DriftOptions) -> ElementDescriptor {
    let class = if options.using_collimators {
        "COLLIMATOR"
    } else {
        "DRIFT"
    };
    let mut drift = ElementDescriptor::new(format!("DRIFT_{next}"), class)
        .with_length(length)
        .with_orbit_length(length)
        .at_entry(at)
        .at_center(at + length / 2.0)
        .at_exit(at + length);
    if options.with_pipe || options.using_collimators {
        drift.apertype = Some(options.pipe_apertype.clone());
        drift.aperture = Some(ApertureValue::Size(options.pipe_aperture));
    }
    drift.physical = false;
    drift
}

fn marker(name: String, at: f64) -> ElementDescriptor {
    let mut m = ElementDescriptor::new(name, "MARKER").at_center(at);
    m.physical = false;
    m
}

/// Copy `elements` shifted so the first entrance lands on `origin`.
fn rebased(elements: &[ElementDescriptor], origin: f64) -> Vec<ElementDescriptor> {
    let first = elements
        .first()
        .and_then(|e| e.geometry.at_entry)
        .unwrap_or(0.0);
    elements
        .iter()
        .map(|e| {
            let mut e = e.clone();
            e.geometry = e.geometry.shifted(origin - first);
            e
        })
        .collect()
}
