//! Notification hooks for relocations.
//!
//! Observers run after both nodes are located and before the splice. They
//! only see borrowed views of the tree and cannot change it.

use serde::Serialize;

use crate::domain::locate::Found;

pub trait RelocationObserver<T> {
    /// Called before a general-case move.
    fn on_moved(&mut self, _dragged: &Found<'_, T>, _hovered: &Found<'_, T>) {}

    /// Called before a nest.
    fn on_nested(&mut self, _dragged: &Found<'_, T>, _hovered: &Found<'_, T>) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl<T> RelocationObserver<T> for NoopObserver {}

impl<T, O: RelocationObserver<T> + ?Sized> RelocationObserver<T> for &mut O {
    fn on_moved(&mut self, dragged: &Found<'_, T>, hovered: &Found<'_, T>) {
        (**self).on_moved(dragged, hovered);
    }

    fn on_nested(&mut self, dragged: &Found<'_, T>, hovered: &Found<'_, T>) {
        (**self).on_nested(dragged, hovered);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelocationKind {
    Moved,
    Nested,
}

/// Owned snapshot of a located node, detached from the tree borrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub id: String,
    pub parent_id: Option<String>,
    pub index: usize,
}

impl<T> From<&Found<'_, T>> for NodeRef {
    fn from(found: &Found<'_, T>) -> Self {
        Self {
            id: found.id().to_string(),
            parent_id: found.parent_id().map(str::to_string),
            index: found.index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelocationEvent {
    pub kind: RelocationKind,
    pub dragged: NodeRef,
    pub hovered: NodeRef,
}

/// Records every notification, for callers that prefer a list of what
/// happened over callbacks.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<RelocationEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RelocationEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<RelocationEvent> {
        std::mem::take(&mut self.events)
    }

    fn push<T>(&mut self, kind: RelocationKind, dragged: &Found<'_, T>, hovered: &Found<'_, T>) {
        self.events.push(RelocationEvent {
            kind,
            dragged: dragged.into(),
            hovered: hovered.into(),
        });
    }
}

impl<T> RelocationObserver<T> for EventLog {
    fn on_moved(&mut self, dragged: &Found<'_, T>, hovered: &Found<'_, T>) {
        self.push(RelocationKind::Moved, dragged, hovered);
    }

    fn on_nested(&mut self, dragged: &Found<'_, T>, hovered: &Found<'_, T>) {
        self.push(RelocationKind::Nested, dragged, hovered);
    }
}
