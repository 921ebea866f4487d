/// Scalar animation parameter pushed to the `offset` uniform.
///
/// Advances by a fixed step per rendered frame, not per unit of time: a faster
/// display refresh animates faster. State is not persisted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnimationState {
    offset: f32,
    step: f32,
    frames: u64,
}

impl AnimationState {
    pub const DEFAULT_START: f32 = -0.5;
    pub const DEFAULT_STEP: f32 = 0.001;

    pub fn new(start: f32, step: f32) -> Self {
        Self {
            offset: start,
            step,
            frames: 0,
        }
    }

    /// Moves one frame forward and returns the new offset.
    pub fn advance(&mut self) -> f32 {
        self.offset += self.step;
        self.frames = self.frames.wrapping_add(1);
        self.offset
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Number of `advance` calls so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_START, Self::DEFAULT_STEP)
    }
}
