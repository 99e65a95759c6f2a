//! Drag session: turns drag gestures into relocations.
//!
//! A session owns the current tree snapshot and applies each gesture as a
//! sequential state transition. Pointer geometry is reduced to a single
//! horizontal offset; hit-testing and rendering stay with the caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{locate_one, DomainError, NoopObserver, Placement, RelocationObserver, Relocator, Tree};

/// Interaction options for a sortable tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Dragging far enough to the right nests instead of moving
    pub allow_nesting: bool,
    /// Read-only trees refuse to start drags
    pub edit_mode: bool,
    /// Horizontal offset past which a hover counts as a nest request
    pub indentation: i32,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            allow_nesting: false,
            edit_mode: true,
            indentation: 40,
        }
    }
}

/// A node being dragged and where it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragItem {
    pub id: String,
    pub origin: Option<Placement>,
}

/// What a hover did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverAction {
    /// Hovering over itself, or the tree is read-only
    Ignored,
    /// A relocation was requested but left the tree as it was
    Unchanged,
    Moved,
    Nested,
}

/// Receives drop and cancel notifications.
pub trait DragListener {
    fn on_drop(&mut self, _dragged: &str, _placement: &Placement) {}

    fn on_drag_cancel(&mut self, _dragged: &str, _origin: &Placement) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl DragListener for NoopListener {}

impl<L: DragListener + ?Sized> DragListener for &mut L {
    fn on_drop(&mut self, dragged: &str, placement: &Placement) {
        (**self).on_drop(dragged, placement);
    }

    fn on_drag_cancel(&mut self, dragged: &str, origin: &Placement) {
        (**self).on_drag_cancel(dragged, origin);
    }
}

pub struct DragSession<T, O = NoopObserver, L = NoopListener> {
    tree: Tree<T>,
    options: TreeOptions,
    relocator: Relocator<O>,
    listener: L,
}

impl<T: Clone> DragSession<T> {
    pub fn new(tree: Tree<T>, options: TreeOptions) -> Self {
        Self::with_hooks(tree, options, NoopObserver, NoopListener)
    }
}

impl<T, O, L> DragSession<T, O, L>
where
    T: Clone,
    O: RelocationObserver<T>,
    L: DragListener,
{
    pub fn with_hooks(tree: Tree<T>, options: TreeOptions, observer: O, listener: L) -> Self {
        Self {
            tree,
            options,
            relocator: Relocator::with_observer(observer),
            listener,
        }
    }

    pub fn tree(&self) -> &Tree<T> {
        &self.tree
    }

    pub fn into_tree(self) -> Tree<T> {
        self.tree
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn observer(&self) -> &O {
        self.relocator.observer()
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Start dragging `id`, remembering its current placement for a revert.
    #[instrument(level = "debug", skip(self))]
    pub fn begin_drag(&self, id: &str) -> ApplicationResult<DragItem> {
        if !self.options.edit_mode {
            return Err(ApplicationError::ReadOnly);
        }
        let origin = locate_one(&self.tree, id);
        if origin.is_none() {
            return Err(DomainError::NotFound(id.to_string()).into());
        }
        Ok(DragItem {
            id: id.to_string(),
            origin,
        })
    }

    /// The dragged item is over `hover_id`, `offset_x` pixels right of the
    /// hovered row's left edge.
    #[instrument(level = "debug", skip(self))]
    pub fn hover(&mut self, item: &DragItem, hover_id: &str, offset_x: i32) -> HoverAction {
        if !self.options.edit_mode || item.id == hover_id {
            return HoverAction::Ignored;
        }

        if self.options.allow_nesting && offset_x > self.options.indentation {
            let already_first = self
                .tree
                .find(hover_id)
                .and_then(|node| node.children.first())
                .is_some_and(|first| first.id == item.id);
            if already_first {
                return HoverAction::Unchanged;
            }
            return match self.relocator.try_nest(&self.tree, &item.id, hover_id, None) {
                Ok(tree) => {
                    self.tree = tree;
                    HoverAction::Nested
                }
                Err(e) => {
                    debug!(error = %e, "nest skipped");
                    HoverAction::Unchanged
                }
            };
        }

        match self.relocator.try_move(&self.tree, &item.id, hover_id) {
            Ok(tree) => {
                self.tree = tree;
                HoverAction::Moved
            }
            Err(e) => {
                debug!(error = %e, "move skipped");
                HoverAction::Unchanged
            }
        }
    }

    /// The item was dropped on a valid target. Reports where it ended up.
    ///
    /// A dropped node that cannot be placed means the caller's view and the
    /// tree have drifted apart; that is surfaced as `InvalidDropTarget`.
    #[instrument(level = "debug", skip(self))]
    pub fn complete_drop(&mut self, item: &DragItem) -> ApplicationResult<Placement> {
        let placement = locate_one(&self.tree, &item.id)
            .ok_or_else(|| ApplicationError::InvalidDropTarget(item.id.clone()))?;
        self.listener.on_drop(&item.id, &placement);
        Ok(placement)
    }

    /// The drag ended outside any target: put the node back where it started.
    ///
    /// Returns whether the node was put back.
    #[instrument(level = "debug", skip(self))]
    pub fn cancel(&mut self, item: &DragItem) -> bool {
        let Some(origin) = item.origin.as_ref() else {
            return false;
        };
        let reverted = match self.relocator.try_nest(
            &self.tree,
            &item.id,
            &origin.parent_id,
            Some(origin.index),
        ) {
            Ok(tree) => {
                self.tree = tree;
                true
            }
            Err(e) => {
                warn!(error = %e, id = %item.id, "cannot restore dragged node");
                false
            }
        };
        self.listener.on_drag_cancel(&item.id, origin);
        reverted
    }
}
