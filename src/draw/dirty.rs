//! Dirty region tracking for incremental presentation.
//!
//! Collects window-space rectangles that have to be handed to the compositor
//! as damage after the next frame.

use crate::util::Rect;

/// Tracks dirty rectangles accumulated between frames.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    regions: Vec<Rect>,
    force_full: bool,
}

impl DirtyTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entire surface as dirty. Clears any accumulated rectangles.
    pub fn mark_full(&mut self) {
        self.force_full = true;
        self.regions.clear();
    }

    /// Adds a dirty rectangle if the tracker is not already full.
    pub fn mark_rect(&mut self, rect: Rect) {
        if !rect.is_valid() || self.force_full {
            return;
        }
        self.regions.push(rect);
    }

    /// Adds a dirty rectangle when present.
    pub fn mark_optional_rect(&mut self, rect: Option<Rect>) {
        if let Some(rect) = rect {
            self.mark_rect(rect);
        }
    }

    pub fn is_full(&self) -> bool {
        self.force_full
    }

    /// Returns true when nothing has been marked since the last drain.
    pub fn is_clean(&self) -> bool {
        !self.force_full && self.regions.is_empty()
    }

    /// Drains the dirty regions gathered so far.
    ///
    /// When the full surface is marked, returns a single rectangle covering the
    /// entire surface; otherwise returns accumulated rectangles clipped to it.
    pub fn take_regions(&mut self, width: i32, height: i32) -> Vec<Rect> {
        if self.force_full {
            self.force_full = false;
            self.regions.clear();
            return Rect::new(0, 0, width, height).into_iter().collect();
        }
        self.regions
            .drain(..)
            .map(|rect| rect.clamp_to_bounds(width, height))
            .filter(Rect::is_valid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_rect_records_rectangles() {
        let mut tracker = DirtyTracker::new();
        assert!(tracker.is_clean());
        tracker.mark_rect(Rect::new(0, 0, 10, 10).unwrap());

        let rects = tracker.take_regions(100, 100);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0], Rect::new(0, 0, 10, 10).unwrap());
        assert!(tracker.is_clean());
    }

    #[test]
    fn mark_full_takes_precedence() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(Rect::new(5, 5, 10, 10).unwrap());
        tracker.mark_full();
        tracker.mark_rect(Rect::new(20, 20, 15, 15).unwrap());

        let rects = tracker.take_regions(200, 100);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0], Rect::new(0, 0, 200, 100).unwrap());
    }

    #[test]
    fn regions_are_clipped_to_surface() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(Rect::new(-10, 90, 30, 30).unwrap());
        tracker.mark_rect(Rect::new(500, 500, 10, 10).unwrap());
        tracker.mark_optional_rect(None);

        let rects = tracker.take_regions(100, 100);
        assert_eq!(rects, vec![Rect::new(0, 90, 20, 10).unwrap()]);
    }
}
