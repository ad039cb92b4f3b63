/// Minimum viewport intersection ratio for the map to count as on screen.
pub const DEFAULT_INTERSECTION_THRESHOLD: f64 = 0.01;

/// Result of feeding a visibility signal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VisibilityChange {
    /// Went from active to inactive: stop rescheduling frames.
    Suspended,
    /// Went from inactive to active: re-arm whichever loop was running.
    Resumed,
    Unchanged,
}

/// Level-triggered gate combining viewport intersection and document
/// visibility. Frames run only while both are true.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Visibility {
    threshold: f64,
    intersecting: bool,
    document_visible: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::new(DEFAULT_INTERSECTION_THRESHOLD)
    }
}

impl Visibility {
    /// Starts active; hosts report the real state as soon as they know it.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            intersecting: true,
            document_visible: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.intersecting && self.document_visible
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    pub fn is_document_visible(&self) -> bool {
        self.document_visible
    }

    /// Feeds the viewport intersection ratio in [0, 1].
    pub fn set_intersection_ratio(&mut self, ratio: f64) -> VisibilityChange {
        // A zero threshold still requires some overlap.
        let intersecting = if self.threshold > 0.0 {
            ratio >= self.threshold
        } else {
            ratio > 0.0
        };
        self.update(|v| v.intersecting = intersecting)
    }

    pub fn set_document_visible(&mut self, visible: bool) -> VisibilityChange {
        self.update(|v| v.document_visible = visible)
    }

    fn update(&mut self, apply: impl FnOnce(&mut Self)) -> VisibilityChange {
        let before = self.is_active();
        apply(self);
        match (before, self.is_active()) {
            (true, false) => VisibilityChange::Suspended,
            (false, true) => VisibilityChange::Resumed,
            _ => VisibilityChange::Unchanged,
        }
    }
}
