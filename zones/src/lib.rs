pub mod zones {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use thiserror::Error;

    /// Logical steps per revolution of the dial on the stock build.
    pub const DEFAULT_TRACK_SIZE: u32 = 200;

    /// Why a zone table was refused.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Defect {
        ZeroTrackSize,
        Empty,
        /// `start > end` inside a single zone.
        Inverted { index: usize, zone: Zone },
        /// An end bound that is not below the track size.
        OutOfBounds { index: usize, zone: Zone, track_size: u32 },
        /// Zone `index` does not start strictly after zone `index - 1` ends.
        Unordered { index: usize, previous: Zone, zone: Zone },
    }

    impl fmt::Display for Defect {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Defect::ZeroTrackSize => write!(f, "track size must be positive"),
                Defect::Empty => write!(f, "zone table is empty"),
                Defect::Inverted { index, zone } => {
                    write!(f, "zone #{} {} has start after end", index, zone)
                }
                Defect::OutOfBounds { index, zone, track_size } => write!(
                    f,
                    "zone #{} {} exceeds track of {} steps",
                    index, zone, track_size
                ),
                Defect::Unordered { index, previous, zone } => write!(
                    f,
                    "zone #{} {} overlaps or precedes {}",
                    index, zone, previous
                ),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum Error {
        #[error("invalid zone configuration: {0}")]
        ConfigInvalid(Defect),
        #[error("step {value} is outside the track [0, {track_size})")]
        OutOfRange { value: u32, track_size: u32 },
        #[error("zone scan found no stop for position {position}")]
        InternalInvariantViolation { position: u32 },
    }

    /// Inclusive range of steps where the needle may come to rest.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Zone {
        pub start: u32,
        pub end: u32,
    }

    impl Zone {
        pub const fn new(start: u32, end: u32) -> Self {
            Zone { start, end }
        }

        pub fn contains(&self, step: u32) -> bool {
            self.start <= step && step <= self.end
        }

        /// Number of steps in the zone, both bounds counted.
        pub fn width(&self) -> u32 {
            self.end - self.start + 1
        }
    }

    impl fmt::Display for Zone {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "[{}, {}]", self.start, self.end)
        }
    }

    /// Sorted, non-overlapping set of rest zones on a circular track.
    ///
    /// The table can only be obtained through [`ZoneTable::new`], so holding one
    /// means every invariant below has been checked:
    /// - at least one zone,
    /// - `start <= end < track_size` for every zone,
    /// - `zones[i].end < zones[i + 1].start`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ZoneTable {
        track_size: u32,
        zones: Vec<Zone>,
    }

    impl ZoneTable {
        pub fn new(track_size: u32, zones: impl Into<Vec<Zone>>) -> Result<Self, Error> {
            let zones = zones.into();

            if track_size == 0 {
                return Err(Error::ConfigInvalid(Defect::ZeroTrackSize));
            }
            if zones.is_empty() {
                return Err(Error::ConfigInvalid(Defect::Empty));
            }

            for (index, zone) in zones.iter().copied().enumerate() {
                if zone.start > zone.end {
                    return Err(Error::ConfigInvalid(Defect::Inverted { index, zone }));
                }
                if zone.end >= track_size {
                    return Err(Error::ConfigInvalid(Defect::OutOfBounds {
                        index,
                        zone,
                        track_size,
                    }));
                }
                if index > 0 {
                    let previous = zones[index - 1];
                    if previous.end >= zone.start {
                        return Err(Error::ConfigInvalid(Defect::Unordered {
                            index,
                            previous,
                            zone,
                        }));
                    }
                }
            }

            Ok(ZoneTable { track_size, zones })
        }

        /// The compiled-in dial: five stops spaced a quarter turn apart.
        pub fn stock() -> Self {
            ZoneTable {
                track_size: DEFAULT_TRACK_SIZE,
                zones: vec![
                    Zone::new(0, 3),
                    Zone::new(48, 53),
                    Zone::new(98, 103),
                    Zone::new(148, 153),
                    Zone::new(198, 199),
                ],
            }
        }

        pub fn track_size(&self) -> u32 {
            self.track_size
        }

        /// Zone with the lowest start, used as the wrap-around target.
        pub fn first_zone(&self) -> Zone {
            self.zones[0]
        }

        pub fn zones(&self) -> &[Zone] {
            &self.zones
        }

        pub fn len(&self) -> usize {
            self.zones.len()
        }

        pub fn is_empty(&self) -> bool {
            self.zones.is_empty()
        }

        pub fn iter(&self) -> impl Iterator<Item = &Zone> {
            self.zones.iter()
        }

        pub fn zone_containing(&self, step: u32) -> Option<(usize, Zone)> {
            self.zones
                .iter()
                .copied()
                .enumerate()
                .find(|(_, zone)| zone.contains(step))
        }

        pub fn check_step(&self, step: u32) -> Result<u32, Error> {
            if step < self.track_size {
                Ok(step)
            } else {
                Err(Error::OutOfRange {
                    value: step,
                    track_size: self.track_size,
                })
            }
        }
    }

}

pub use zones::{Defect, Error, Zone, ZoneTable, DEFAULT_TRACK_SIZE};
