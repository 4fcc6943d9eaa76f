use crate::particles::ParticleStorage;

/// One frame's worth of statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub mean_speed: f32,
    pub links: usize,
}

impl FrameStats {
    pub fn measure(particles: &ParticleStorage, links: usize) -> Self {
        let n = particles.len();
        if n == 0 {
            return Self { mean_speed: 0.0, links };
        }
        let total: f32 = (0..n).map(|i| particles.velocity(i).length()).sum();
        Self {
            mean_speed: total / n as f32,
            links,
        }
    }
}

/// Ring buffer of recent frame stats, averaged for display.
pub struct Diagnostics {
    ring: Vec<FrameStats>, // ring buffer of per-frame stats
    index: usize,          // next slot in ring buffer
    stored_frames: usize,  // how many frames stored so far
    speed_history: Vec<f32>, // mean speed per stored frame, oldest first
}

impl Diagnostics {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            ring: vec![FrameStats::default(); window],
            index: 0,
            stored_frames: 0,
            speed_history: Vec::with_capacity(window),
        }
    }

    pub fn window(&self) -> usize {
        self.ring.len()
    }

    pub fn stored_frames(&self) -> usize {
        self.stored_frames
    }

    /// Push the current frame's stats into the ring buffer.
    pub fn push(&mut self, stats: FrameStats) {
        self.ring[self.index] = stats;
        self.index = (self.index + 1) % self.ring.len();

        if self.stored_frames < self.ring.len() {
            self.stored_frames += 1;
        }

        self.speed_history.clear();
        let start = if self.stored_frames < self.ring.len() { 0 } else { self.index };
        for k in 0..self.stored_frames {
            let slot = (start + k) % self.ring.len();
            self.speed_history.push(self.ring[slot].mean_speed);
        }
    }

    /// Average over the stored frames.
    pub fn average(&self) -> FrameStats {
        if self.stored_frames == 0 {
            return FrameStats::default();
        }
        let frames = &self.ring[..self.stored_frames];
        let denom = self.stored_frames as f32;
        FrameStats {
            mean_speed: frames.iter().map(|s| s.mean_speed).sum::<f32>() / denom,
            links: (frames.iter().map(|s| s.links).sum::<usize>() as f32 / denom).round() as usize,
        }
    }

    /// Mean speed per stored frame, oldest first.
    pub fn speed_history(&self) -> &[f32] {
        &self.speed_history
    }

    pub fn clear(&mut self) {
        self.ring.fill(FrameStats::default());
        self.index = 0;
        self.stored_frames = 0;
        self.speed_history.clear();
    }
}
