//! Undoable commands.
//!
//! Every change to the [`DocumentModel`] goes through the [`CommandBus`].
//! Each operation builds one [`Command`] holding a forward and an inverse
//! [`Mutation`], applies the forward half, and pushes it. Continuous
//! gestures call in once, when they end, with the net effect, so one
//! gesture is one undo step.

use crate::constants::{MAX_HISTORY_OPERATIONS, MIN_GLYPH_SIZE};
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::DocPoint;
use crate::model::{BackgroundSource, DocumentModel, Element, ElementId};
use crate::palette::is_valid_glyph;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// A single reversible change to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Insert an element at its insertion-order slot
    Insert(Element),
    Remove(ElementId),
    Translate { ids: Vec<ElementId>, delta: DocPoint },
    /// Set absolute sizes
    Resize { sizes: Vec<(ElementId, i32)> },
    SetBackground(BackgroundSource),
}

/// Side effects of applying a mutation that the owner of the selection and
/// the fetch coordinator must react to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationEffect {
    pub removed: Vec<ElementId>,
    pub background_changed: bool,
}

impl Mutation {
    fn apply(&self, model: &mut DocumentModel) -> MutationEffect {
        let mut effect = MutationEffect::default();
        match self {
            Mutation::Insert(element) => model.insert(element.clone()),
            Mutation::Remove(id) => {
                if model.remove(*id).is_some() {
                    effect.removed.push(*id);
                }
            }
            Mutation::Translate { ids, delta } => model.translate(ids, *delta),
            Mutation::Resize { sizes } => {
                for &(id, size) in sizes {
                    model.set_size(id, size);
                }
            }
            Mutation::SetBackground(source) => {
                let previous = model.set_background(source.clone());
                effect.background_changed = previous != *source;
            }
        }
        effect
    }
}

/// A mutation paired with its inverse. Immutable once pushed.
#[derive(Debug, Clone)]
pub struct Command {
    forward: Mutation,
    inverse: Mutation,
    label: &'static str,
}

impl Command {
    fn new(label: &'static str, forward: Mutation, inverse: Mutation) -> Self {
        Self {
            forward,
            inverse,
            label,
        }
    }

    pub fn forward(&self) -> &Mutation {
        &self.forward
    }

    pub fn inverse(&self) -> &Mutation {
        &self.inverse
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Result of an undo or redo request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStatus {
    /// False when the stack was empty and nothing happened
    pub applied: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub effect: MutationEffect,
}

/// Undo/redo stacks and the operations that feed them.
#[derive(Debug)]
pub struct CommandBus {
    undo_stack: VecDeque<Command>,
    redo_stack: Vec<Command>,
    max_history: usize,
    min_glyph_size: i32,
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new(MAX_HISTORY_OPERATIONS, MIN_GLYPH_SIZE)
    }
}

impl CommandBus {
    pub fn new(max_history: usize, min_glyph_size: i32) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_history: max_history.max(1),
            min_glyph_size: min_glyph_size.max(1),
        }
    }

    pub fn configure(&mut self, max_history: usize, min_glyph_size: i32) {
        self.max_history = max_history.max(1);
        self.min_glyph_size = min_glyph_size.max(1);
        while self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }
    }

    fn execute(&mut self, model: &mut DocumentModel, command: Command) -> MutationEffect {
        let effect = command.forward.apply(model);
        info!(label = command.label, "Command applied");
        self.undo_stack.push_back(command);
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
            debug!(limit = self.max_history, "History limit reached, dropped oldest entry");
        }
        self.redo_stack.clear();
        effect
    }

    /// Place a new glyph.
    pub fn add_element(
        &mut self,
        model: &mut DocumentModel,
        glyph: &str,
        at: DocPoint,
        size: i32,
    ) -> CanvasResult<ElementId> {
        if !is_valid_glyph(glyph) {
            return Err(CanvasError::InvalidGlyph(glyph.to_string()));
        }
        let element = model.mint_element(glyph.to_string(), at, size.max(self.min_glyph_size));
        let id = element.id;
        self.execute(
            model,
            Command::new("Add Glyph", Mutation::Insert(element), Mutation::Remove(id)),
        );
        Ok(id)
    }

    /// Translate the given elements by one net delta. Unknown ids are
    /// skipped. Returns false when nothing was pushed, including when any
    /// element would leave the coordinate range.
    pub fn move_elements(&mut self, model: &mut DocumentModel, ids: &[ElementId], delta: DocPoint) -> bool {
        let ids: Vec<ElementId> = ids.iter().copied().filter(|id| model.contains(*id)).collect();
        if ids.is_empty() || delta.is_zero() {
            return false;
        }
        let Some(reverse) = delta.checked_neg() else {
            warn!(?delta, "Move delta out of range, ignoring");
            return false;
        };
        if !model.can_translate(&ids, delta) {
            warn!(?delta, count = ids.len(), "Move would overflow document coordinates, ignoring");
            return false;
        }
        let inverse = Mutation::Translate {
            ids: ids.clone(),
            delta: reverse,
        };
        self.execute(model, Command::new("Move", Mutation::Translate { ids, delta }, inverse));
        true
    }

    /// Multiply the size of each element by `factor`. The inverse restores
    /// the exact prior sizes. Returns false when nothing was pushed.
    pub fn scale_elements(&mut self, model: &mut DocumentModel, ids: &[ElementId], factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 || factor == 1.0 {
            return false;
        }
        let mut before = Vec::new();
        let mut after = Vec::new();
        for &id in ids {
            let Some(element) = model.get(id) else { continue };
            let scaled = (element.size as f32 * factor).round();
            let scaled = if scaled >= i32::MAX as f32 {
                i32::MAX
            } else {
                (scaled as i32).max(self.min_glyph_size)
            };
            if scaled != element.size {
                before.push((id, element.size));
                after.push((id, scaled));
            }
        }
        if after.is_empty() {
            return false;
        }
        self.execute(
            model,
            Command::new(
                "Scale",
                Mutation::Resize { sizes: after },
                Mutation::Resize { sizes: before },
            ),
        );
        true
    }

    /// Remove an element. The inverse re-inserts it unchanged, in its
    /// original stacking slot.
    pub fn delete_element(&mut self, model: &mut DocumentModel, id: ElementId) -> CanvasResult<MutationEffect> {
        let element = model.get(id).cloned().ok_or(CanvasError::UnknownElement(id))?;
        Ok(self.execute(
            model,
            Command::new("Delete", Mutation::Remove(id), Mutation::Insert(element)),
        ))
    }

    /// Replace the background source. Returns false when the source is
    /// unchanged and nothing was pushed.
    pub fn set_background(&mut self, model: &mut DocumentModel, source: BackgroundSource) -> bool {
        if *model.background() == source {
            return false;
        }
        let previous = model.background().clone();
        self.execute(
            model,
            Command::new(
                "Set Background",
                Mutation::SetBackground(source),
                Mutation::SetBackground(previous),
            ),
        );
        true
    }

    pub fn undo(&mut self, model: &mut DocumentModel) -> HistoryStatus {
        let Some(command) = self.undo_stack.pop_back() else {
            return self.status(false, MutationEffect::default());
        };
        let effect = command.inverse.apply(model);
        info!(label = command.label, "Undo");
        self.redo_stack.push(command);
        self.status(true, effect)
    }

    pub fn redo(&mut self, model: &mut DocumentModel) -> HistoryStatus {
        let Some(command) = self.redo_stack.pop() else {
            return self.status(false, MutationEffect::default());
        };
        let effect = command.forward.apply(model);
        info!(label = command.label, "Redo");
        self.undo_stack.push_back(command);
        self.status(true, effect)
    }

    fn status(&self, applied: bool, effect: MutationEffect) -> HistoryStatus {
        HistoryStatus {
            applied,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            effect,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The command the next undo would revert.
    pub fn last_command(&self) -> Option<&Command> {
        self.undo_stack.back()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
