use foundation::time::Millis;

/// Deterministic frame metadata for hosts that step time themselves.
///
/// Browser hosts pass the callback timestamp straight to the session; the
/// headless host and tests use `Frame` to produce the same timestamps on
/// every run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (milliseconds).
    pub dt_ms: f64,
    /// Host time at the start of the frame.
    pub time: Millis,
}

impl Frame {
    pub fn new(index: u64, dt_ms: f64) -> Self {
        Self {
            index,
            dt_ms,
            time: Millis(index as f64 * dt_ms),
        }
    }

    /// Frame clock running at `fps` frames per second.
    pub fn at_rate(index: u64, fps: f64) -> Self {
        let fps = if fps > 0.0 { fps } else { 60.0 };
        Self::new(index, 1000.0 / fps)
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_ms)
    }
}
