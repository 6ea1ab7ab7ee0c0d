/// A scalar that walks back and forth across `[0, 1]` by a fixed step.
///
/// The direction flips once the value has left the range, so it overshoots
/// each end by at most one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPulse {
    value: f32,
    step: f32,
    increment: f32,
}

impl ColorPulse {
    pub fn new(step: f32) -> Self {
        let step = step.abs();
        Self {
            value: 0.0,
            step,
            increment: step,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn advance(&mut self) -> f32 {
        if self.value > 1.0 {
            self.increment = -self.step;
        }
        if self.value < 0.0 {
            self.increment = self.step;
        }
        self.value += self.increment;
        self.value
    }
}

impl Default for ColorPulse {
    fn default() -> Self {
        Self::new(0.05)
    }
}
