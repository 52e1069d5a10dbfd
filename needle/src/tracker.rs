use zones::Error;

/// Absolute needle position on a circular track of `track_size` steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTracker {
    position: u32,
    track_size: u32,
}

impl PositionTracker {
    /// Tracker at step zero. `track_size` must be positive, which a
    /// validated [`zones::ZoneTable`] guarantees.
    pub fn new(track_size: u32) -> Self {
        assert!(track_size > 0, "track size must be positive");
        PositionTracker {
            position: 0,
            track_size,
        }
    }

    pub fn track_size(&self) -> u32 {
        self.track_size
    }

    pub fn get(&self) -> u32 {
        self.position
    }

    /// Leaves the position untouched when `step` is off the track.
    pub fn set(&mut self, step: u32) -> Result<(), Error> {
        if step >= self.track_size {
            return Err(Error::OutOfRange {
                value: step,
                track_size: self.track_size,
            });
        }
        self.position = step;
        Ok(())
    }

    pub fn add(&mut self, delta: u32) {
        let next = (u64::from(self.position) + u64::from(delta)) % u64::from(self.track_size);
        // next < track_size, which itself fits in u32
        self.position = next as u32;
    }
}
