//! Screen path recorder: accumulates the active stroke and the history of
//! completed strokes awaiting surface resolution.

use std::collections::VecDeque;

use texture_brush_config::HistoryCapacity;
use tracing::{debug, info, trace};

use crate::types::{ScreenPoint, Stroke};

/// Completed strokes in the order they were ended.
///
/// The capacity policy decides how many survive; with the default
/// `Bounded(1)` ending a path replaces whatever was recorded before.
#[derive(Debug, Clone, Default)]
pub struct StrokeHistory {
    strokes: VecDeque<Stroke>,
    capacity: HistoryCapacity,
}

impl StrokeHistory {
    pub fn new(capacity: HistoryCapacity) -> Self {
        Self {
            strokes: VecDeque::new(),
            capacity,
        }
    }

    /// Append a completed stroke, evicting the oldest entries beyond capacity.
    pub fn push(&mut self, stroke: Stroke) {
        if let Some(limit) = self.capacity.limit() {
            while self.strokes.len() >= limit {
                self.strokes.pop_front();
            }
        }
        self.strokes.push_back(stroke);
    }

    pub fn capacity(&self) -> HistoryCapacity {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    pub fn latest(&self) -> Option<&Stroke> {
        self.strokes.back()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }
}

/// Records the stroke currently being drawn.
///
/// Only one stroke is active at a time. Input callbacks drive it through
/// [`start_new_path`](Self::start_new_path), [`add_point`](Self::add_point)
/// and [`end_path`](Self::end_path).
#[derive(Debug, Clone, Default)]
pub struct ScreenPathRecorder {
    current: Stroke,
    history: StrokeHistory,
}

impl ScreenPathRecorder {
    pub fn new(capacity: HistoryCapacity) -> Self {
        Self {
            current: Stroke::new(),
            history: StrokeHistory::new(capacity),
        }
    }

    /// Discard the active stroke and begin a new one.
    pub fn start_new_path(&mut self) {
        info!("New painting path");
        self.current.clear();
    }

    /// Append a point to the active stroke, ignoring exact repeats of the last point.
    pub fn add_point(&mut self, pos: ScreenPoint) -> bool {
        let added = self.current.push(pos);
        if added {
            trace!("path point [{}, {}]", pos.x, pos.y);
        }
        added
    }

    /// Close the active stroke and move it into the history.
    pub fn end_path(&mut self) {
        let stroke = std::mem::take(&mut self.current);
        info!("End painting path ({} points)", stroke.len());
        self.history.push(stroke);
        debug!(
            "stroke history holds {} stroke(s), capacity {:?}",
            self.history.len(),
            self.history.capacity()
        );
    }

    pub fn current(&self) -> &Stroke {
        &self.current
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut StrokeHistory {
        &mut self.history
    }
}
