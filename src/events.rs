//! Event registration: which reactions run for each `(field, event)` pair.

use std::collections::HashMap;

use crate::form::FormLayout;
use crate::types::FieldId;

/// Kind of user interaction on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Every keystroke.
    Input,
    /// The field was committed (focus left, Enter).
    Change,
}

/// A validation step triggered by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    ValidateField,
    ValidateDates,
}

/// An interaction on one field, carrying the field's new raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEvent {
    pub field: FieldId,
    pub kind: EventKind,
    pub value: String,
}

impl FieldEvent {
    pub fn input(field: FieldId, value: impl Into<String>) -> Self {
        Self {
            field,
            kind: EventKind::Input,
            value: value.into(),
        }
    }

    pub fn change(field: FieldId, value: impl Into<String>) -> Self {
        Self {
            field,
            kind: EventKind::Change,
            value: value.into(),
        }
    }
}

/// Handler table, one entry per `(field, event)` pair.
#[derive(Debug, Clone, Default)]
pub struct EventBindings {
    handlers: HashMap<(FieldId, EventKind), Vec<Reaction>>,
}

impl EventBindings {
    /// Every tracked field validates itself on input and change; date
    /// fields also re-run the cross-field date check.
    pub fn for_layout(layout: FormLayout) -> Self {
        let mut bindings = Self::default();
        for field in layout.fields() {
            for kind in [EventKind::Input, EventKind::Change] {
                bindings.register(*field, kind, Reaction::ValidateField);
                if field.is_date() {
                    bindings.register(*field, kind, Reaction::ValidateDates);
                }
            }
        }
        bindings
    }

    pub fn register(&mut self, field: FieldId, kind: EventKind, reaction: Reaction) {
        let reactions = self.handlers.entry((field, kind)).or_default();
        if !reactions.contains(&reaction) {
            reactions.push(reaction);
        }
    }

    pub fn reactions(&self, field: FieldId, kind: EventKind) -> &[Reaction] {
        self.handlers
            .get(&(field, kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
