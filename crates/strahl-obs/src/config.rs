//! Which record points an observer is notified at.

use smallvec::SmallVec;
use strahl_core::ElementIndex;

/// Observer activation flags.
///
/// `on_start` and `on_end` always fire. `on_element` fires only when
/// element-by-element recording is on, and then for every element unless an
/// allow-list narrows it. `on_turn` fires after every turn when turn-by-turn
/// recording is on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObserverConfig {
    /// Notify after every element.
    pub element_by_element: bool,
    /// Restrict element notifications to these elements. `None` means all.
    pub elements: Option<SmallVec<[ElementIndex; 8]>>,
    /// Notify after every turn.
    pub turn_by_turn: bool,
}

impl ObserverConfig {
    /// Start and end only.
    pub fn quiet() -> Self {
        Self::default()
    }

    /// Every element and every turn.
    pub fn everything() -> Self {
        Self {
            element_by_element: true,
            elements: None,
            turn_by_turn: true,
        }
    }

    /// Record after the listed elements only.
    pub fn at_elements(elements: impl IntoIterator<Item = ElementIndex>) -> Self {
        Self {
            element_by_element: true,
            elements: Some(elements.into_iter().collect()),
            turn_by_turn: false,
        }
    }

    /// Builder: set turn-by-turn recording.
    pub fn with_turn_by_turn(mut self, on: bool) -> Self {
        self.turn_by_turn = on;
        self
    }

    /// Whether `on_element` fires for `element`.
    pub fn records_element(&self, element: ElementIndex) -> bool {
        self.element_by_element
            && self
                .elements
                .as_ref()
                .is_none_or(|allowed| allowed.contains(&element))
    }

    /// The largest element index in the allow-list, if any.
    pub fn max_element(&self) -> Option<ElementIndex> {
        self.elements.as_ref().and_then(|e| e.iter().max().copied())
    }
}
