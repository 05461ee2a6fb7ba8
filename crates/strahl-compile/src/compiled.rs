//! The numeric lattice consumed by the tracking loop.

use indexmap::IndexMap;
use smallvec::SmallVec;
use strahl_core::{
    Aperture, ElementIndex, ElementKind, ElementRecord, Field, Kinematics, Misalignment,
};

use crate::error::CompileError;

/// One compiled element.
///
/// `record` is the canonical numeric row; `kind`, `aperture` and
/// `misalignment` are decoded from it once so that the tracking loop does
/// not re-decode per particle.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledElement {
    /// Element name.
    pub name: String,
    /// Kinetic energy at the element entrance (MeV).
    pub energy: f64,
    record: ElementRecord,
    kind: ElementKind,
    aperture: Aperture,
    misalignment: Misalignment,
}

impl CompiledElement {
    /// Decode a record into a compiled element.
    pub fn new(name: impl Into<String>, energy: f64, record: ElementRecord) -> Self {
        Self {
            name: name.into(),
            energy,
            kind: ElementKind::from_record(&record),
            aperture: Aperture::from_record(&record),
            misalignment: Misalignment::from_record(&record),
            record,
        }
    }

    /// The canonical numeric row.
    pub fn record(&self) -> &ElementRecord {
        &self.record
    }

    /// Typed view used for propagator dispatch.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Transverse aperture.
    pub fn aperture(&self) -> &Aperture {
        &self.aperture
    }

    /// Transverse misalignment.
    pub fn misalignment(&self) -> &Misalignment {
        &self.misalignment
    }

    fn set(&mut self, field: Field, value: f64) {
        self.record.set(field, value);
        self.kind = ElementKind::from_record(&self.record);
        self.aperture = Aperture::from_record(&self.record);
        self.misalignment = Misalignment::from_record(&self.record);
    }
}

/// A record field of a named element, addressed for adjustment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    /// Element name.
    pub element: String,
    /// Field to set.
    pub field: Field,
}

impl Variable {
    /// Address `field` of `element`.
    pub fn new(element: impl Into<String>, field: Field) -> Self {
        Self {
            element: element.into(),
            field,
        }
    }
}

/// A compiled lattice: records in beam order plus the reference particle.
///
/// Read-only during tracking and safe to share between threads.
#[derive(Clone, Debug)]
pub struct CompiledLattice {
    name: String,
    reference: Kinematics,
    elements: Vec<CompiledElement>,
    index: IndexMap<String, usize>,
}

impl CompiledLattice {
    /// Assemble a compiled lattice.
    ///
    /// Names are expected to be unique; on a repeated name lookups resolve
    /// to the first occurrence.
    pub fn new(
        name: impl Into<String>,
        reference: Kinematics,
        elements: Vec<CompiledElement>,
    ) -> Self {
        let mut index = IndexMap::with_capacity(elements.len());
        for (i, e) in elements.iter().enumerate() {
            index.entry(e.name.clone()).or_insert(i);
        }
        Self {
            name: name.into(),
            reference,
            elements,
            index,
        }
    }

    /// Lattice name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference particle at the lattice entrance.
    pub fn reference(&self) -> &Kinematics {
        &self.reference
    }

    /// Elements in beam order.
    pub fn elements(&self) -> &[CompiledElement] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the lattice has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at `index`.
    pub fn get(&self, index: ElementIndex) -> Option<&CompiledElement> {
        self.elements.get(index.0)
    }

    /// Index of a named element.
    pub fn position_of(&self, name: &str) -> Option<ElementIndex> {
        self.index.get(name).map(|&i| ElementIndex(i))
    }

    /// Every record as a flat row, in beam order.
    pub fn to_rows(&self) -> Vec<[f64; strahl_core::RECORD_WIDTH]> {
        self.elements.iter().map(|e| e.record.to_row()).collect()
    }

    /// Indices of the named elements, in the order given.
    pub fn indices_of<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<SmallVec<[ElementIndex; 8]>, CompileError> {
        names
            .iter()
            .map(|n| {
                self.position_of(n.as_ref())
                    .ok_or_else(|| CompileError::UnknownElement {
                        name: n.as_ref().to_string(),
                    })
            })
            .collect()
    }

    /// Overwrite record fields in place, for parameter scans and fits.
    ///
    /// `values[i]` is written to `variables[i]`. Nothing is written unless
    /// every variable resolves.
    pub fn adjust(&mut self, variables: &[Variable], values: &[f64]) -> Result<(), CompileError> {
        if variables.len() != values.len() {
            return Err(CompileError::AdjustmentMismatch {
                variables: variables.len(),
                values: values.len(),
            });
        }
        let mut targets = Vec::with_capacity(variables.len());
        for v in variables {
            if v.field == Field::ClassCode {
                return Err(CompileError::FixedField {
                    field: v.field.name().to_string(),
                });
            }
            let i = self
                .index
                .get(&v.element)
                .copied()
                .ok_or_else(|| CompileError::UnknownElement {
                    name: v.element.clone(),
                })?;
            targets.push((i, v.field));
        }
        for ((i, field), &value) in targets.into_iter().zip(values) {
            self.elements[i].set(field, value);
        }
        Ok(())
    }
}
