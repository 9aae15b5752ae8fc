/// Stateful DC baseline tracker using a single-pole IIR low-pass filter.
///
/// The baseline is seeded from the first sample so there is no warm-up
/// transient from zero. Each update returns the AC component, the sample
/// minus the refreshed baseline.
#[derive(Debug, Clone)]
pub struct DcTracker {
    baseline: Option<f32>,
    alpha: f32,
}

impl DcTracker {
    /// Create a new tracker with the given smoothing factor.
    /// Alpha close to 1.0 (e.g., 0.95) gives slow adaptation.
    pub fn new(alpha: f32) -> Self {
        Self {
            baseline: None,
            alpha,
        }
    }

    /// Fold one raw sample into the baseline and return its AC component.
    pub fn update(&mut self, raw: f32) -> f32 {
        let previous = self.baseline.unwrap_or(raw);
        let baseline = self.alpha * previous + (1.0 - self.alpha) * raw;
        self.baseline = Some(baseline);
        raw - baseline
    }

    /// Current baseline estimate, 0.0 before the first sample.
    pub fn baseline(&self) -> f32 {
        self.baseline.unwrap_or(0.0)
    }

    pub fn is_seeded(&self) -> bool {
        self.baseline.is_some()
    }
}
