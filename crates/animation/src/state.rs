#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// No route loaded, or the route failed to resolve.
    #[default]
    Idle,
    Revealing,
    LoopingDots,
    /// Terminal; reached only through disposal.
    Stopped,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Revealing => "revealing",
            Phase::LoopingDots => "looping-dots",
            Phase::Stopped => "stopped",
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, Phase::Revealing | Phase::LoopingDots)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the driver's progress.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct AnimationState {
    /// Reveal clock, clamped to the total reveal duration.
    pub elapsed_ms: f64,
    pub current_segment_index: usize,
    /// Revealed share of the current segment, in [0, 1].
    pub partial_fraction: f64,
    pub phase: Phase,
    /// Dots clock; starts at 0 on entering [`Phase::LoopingDots`].
    pub dots_elapsed_ms: f64,
}
