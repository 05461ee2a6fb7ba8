//! The resolved symbolic lattice.

use indexmap::IndexMap;
use tracing::info;

use crate::descriptor::{ElementDescriptor, Geometry};
use crate::error::LatticeError;
use crate::geometry::{self, default_max_passes, ResolveReport};
use crate::survey;

/// Construction options for [`Lattice`].
#[derive(Clone, Debug, PartialEq)]
pub struct LatticeOptions {
    /// Input is survey data (absolute positions in mm, angles in degrees).
    pub from_survey: bool,
    /// Run the geometry resolver. Disable only for sequences that are
    /// already resolved, such as concatenations of resolved lattices.
    pub with_expansion: bool,
    /// Pass bound for the resolver. `None` uses
    /// [`default_max_passes`](crate::geometry::default_max_passes).
    pub max_passes: Option<usize>,
}

impl Default for LatticeOptions {
    fn default() -> Self {
        Self {
            from_survey: false,
            with_expansion: true,
            max_passes: None,
        }
    }
}

/// An ordered, name-keyed sequence of resolved element descriptors.
///
/// Immutable once built: transforms return new lattices.
#[derive(Clone, Debug)]
pub struct Lattice {
    name: String,
    elements: Vec<ElementDescriptor>,
    index: IndexMap<String, usize>,
    report: ResolveReport,
    extra: f64,
}

impl Lattice {
    /// Build and resolve a lattice with default options.
    pub fn new(
        name: impl Into<String>,
        elements: Vec<ElementDescriptor>,
    ) -> Result<Self, LatticeError> {
        Self::with_options(name, elements, &LatticeOptions::default())
    }

    /// Build a lattice, converting survey input and resolving geometry as
    /// the options request.
    ///
    /// # Errors
    ///
    /// [`LatticeError::EmptyLattice`] for an empty sequence,
    /// [`LatticeError::DuplicateName`] for a repeated name, and any error of
    /// the survey conversion or the resolver.
    pub fn with_options(
        name: impl Into<String>,
        mut elements: Vec<ElementDescriptor>,
        options: &LatticeOptions,
    ) -> Result<Self, LatticeError> {
        let name = name.into();
        if elements.is_empty() {
            return Err(LatticeError::EmptyLattice);
        }
        let index = build_index(&elements)?;
        let max_passes = options
            .max_passes
            .unwrap_or_else(|| default_max_passes(elements.len()));

        if options.from_survey {
            survey::convert(&mut elements, max_passes)?;
        }

        let report = if options.with_expansion {
            let names: Vec<String> = elements.iter().map(|e| e.name.clone()).collect();
            let geometries: Vec<Geometry> = elements.iter().map(|e| e.geometry).collect();
            let (resolved, report) = geometry::resolve(geometries, &names, max_passes)?;
            for (e, g) in elements.iter_mut().zip(resolved) {
                e.geometry = g;
            }
            report
        } else {
            ResolveReport { changing_passes: 0 }
        };

        let lattice = Self {
            name,
            elements,
            index,
            report,
            extra: 0.0,
        };
        info!(
            lattice = %lattice.name,
            elements = lattice.len(),
            length = lattice.length(),
            passes = report.changing_passes,
            "lattice built"
        );
        Ok(lattice)
    }

    /// Lattice name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elements in beam order.
    pub fn elements(&self) -> &[ElementDescriptor] {
        &self.elements
    }

    /// Consume the lattice, returning its elements.
    pub fn into_elements(self) -> Vec<ElementDescriptor> {
        self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always `false`: construction rejects empty sequences.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Resolver outcome recorded at construction.
    pub fn report(&self) -> ResolveReport {
        self.report
    }

    /// Total length (m): the largest `AT_EXIT` plus any extra drift.
    pub fn length(&self) -> f64 {
        self.elements
            .iter()
            .filter_map(|e| e.geometry.at_exit)
            .fold(0.0, f64::max)
            + self.extra
    }

    /// Extend the lattice length by a trailing drift of `extra` metres.
    pub fn add_extra_drift(&mut self, extra: f64) {
        self.extra += extra;
    }

    /// Element by name.
    pub fn get(&self, name: &str) -> Option<&ElementDescriptor> {
        self.index.get(name).map(|&i| &self.elements[i])
    }

    /// Position of an element in beam order.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Position of an element, or [`LatticeError::UnknownElement`].
    pub(crate) fn require(&self, name: &str) -> Result<usize, LatticeError> {
        self.position_of(name)
            .ok_or_else(|| LatticeError::UnknownElement {
                name: name.to_string(),
            })
    }

    /// Rebuild from already-resolved elements, preserving the extra drift.
    pub(crate) fn rebuilt(
        &self,
        name: String,
        elements: Vec<ElementDescriptor>,
        with_expansion: bool,
    ) -> Result<Self, LatticeError> {
        let mut lattice = Self::with_options(
            name,
            elements,
            &LatticeOptions {
                with_expansion,
                ..LatticeOptions::default()
            },
        )?;
        lattice.extra = self.extra;
        Ok(lattice)
    }
}

fn build_index(elements: &[ElementDescriptor]) -> Result<IndexMap<String, usize>, LatticeError> {
    let mut index = IndexMap::with_capacity(elements.len());
    for (i, e) in elements.iter().enumerate() {
        if index.insert(e.name.clone(), i).is_some() {
            return Err(LatticeError::DuplicateName {
                name: e.name.clone(),
            });
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple() -> Vec<ElementDescriptor> {
        vec![
            ElementDescriptor::new("D1", "DRIFT").with_length(1.0),
            ElementDescriptor::new("Q1", "QUADRUPOLE").with_length(0.5),
            ElementDescriptor::new("D2", "DRIFT").with_length(1.5),
        ]
    }

    #[test]
    fn empty_lattice_is_rejected() {
        assert_eq!(
            Lattice::new("empty", Vec::new()).unwrap_err(),
            LatticeError::EmptyLattice
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let es = vec![
            ElementDescriptor::new("A", "DRIFT"),
            ElementDescriptor::new("A", "DRIFT"),
        ];
        assert_eq!(
            Lattice::new("dup", es).unwrap_err(),
            LatticeError::DuplicateName { name: "A".into() }
        );
    }

    #[test]
    fn length_is_last_exit_plus_extra() {
        let mut l = Lattice::new("line", simple()).unwrap();
        assert!((l.length() - 3.0).abs() < 1e-12);
        l.add_extra_drift(0.5);
        assert!((l.length() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn lookup_by_name() {
        let l = Lattice::new("line", simple()).unwrap();
        assert_eq!(l.position_of("Q1"), Some(1));
        assert_eq!(l.get("Q1").unwrap().geometry.at_entry, Some(1.0));
        assert!(l.get("nope").is_none());
        assert!(matches!(
            l.require("nope"),
            Err(LatticeError::UnknownElement { .. })
        ));
    }

    #[test]
    fn survey_lattice_resolves_from_centers() {
        let es = vec![
            ElementDescriptor::new("A", "DRIFT")
                .with_length(1.0)
                .with_survey(0.0, 0.0, 0.0),
            ElementDescriptor::new("B", "SBEND")
                .with_length(1.0)
                .with_field(strahl_core::Field::Angle, 90.0)
                .with_survey(0.0, 0.0, 1000.0),
        ];
        let l = Lattice::with_options(
            "survey",
            es,
            &LatticeOptions {
                from_survey: true,
                ..LatticeOptions::default()
            },
        )
        .unwrap();
        let b = l.get("B").unwrap();
        assert_eq!(b.geometry.at_entry, Some(1.0));
        assert!((b.angle.unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
