/// Host timestamp in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Millis(pub f64);

impl Millis {
    pub const ZERO: Millis = Millis(0.0);

    /// Elapsed time since `earlier`, never negative.
    pub fn since(self, earlier: Millis) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}
