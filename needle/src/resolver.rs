use crate::random::RandomSource;
use zones::{Error, ZoneTable};

/// Picks where the needle comes to rest once the button is released.
///
/// `resolve` runs between trigger release and the stop move, so it must stay
/// free of logging and any other I/O.
pub trait Resolve {
    fn zones(&self) -> &ZoneTable;

    /// Called once at the start of every spin.
    fn reseed(&mut self);

    /// Forward distance in steps from `position` to the chosen resting step.
    fn resolve(&mut self, position: u32) -> Result<u32, Error>;
}

/// Zone scan with a random landing step inside the chosen zone.
pub struct StopResolver<R> {
    zones: ZoneTable,
    rng: R,
}

impl<R: RandomSource> StopResolver<R> {
    pub fn new(zones: ZoneTable, rng: R) -> Self {
        StopResolver { zones, rng }
    }
}

impl<R: RandomSource> Resolve for StopResolver<R> {
    fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    fn reseed(&mut self) {
        self.rng.reseed();
    }

    /// Forward distance from `position` to a random step of the nearest zone
    /// ahead, `0` when the needle already rests in a zone.
    ///
    /// Past the last zone the target is the first zone of the next turn. The
    /// drawn step is below `position` there, so every result is below
    /// `track_size`.
    fn resolve(&mut self, position: u32) -> Result<u32, Error> {
        let position = self.zones.check_step(position)?;
        let track_size = self.zones.track_size();
        let last = self.zones.len() - 1;

        for (index, zone) in self.zones.iter().enumerate() {
            if position < zone.start {
                let r = self.rng.uniform(zone.start, zone.end);
                return Ok(r - position);
            }
            if position <= zone.end {
                return Ok(0);
            }
            if index == last {
                let first = self.zones.first_zone();
                let r = self.rng.uniform(first.start, first.end);
                // r <= last.end < position, subtract first to stay in range
                return Ok(track_size - position + r);
            }
        }

        Err(Error::InternalInvariantViolation { position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use crate::tracker::PositionTracker;
    use rstest::rstest;
    use zones::Zone;

    /// Fails the test if the resolver asks for a random number.
    struct NoDraw;

    impl RandomSource for NoDraw {
        fn uniform(&mut self, low: u32, high: u32) -> u32 {
            panic!("unexpected draw in [{}, {}]", low, high)
        }
    }

    /// Returns the lower or upper bound and records every requested range.
    struct Bound {
        upper: bool,
        calls: Vec<(u32, u32)>,
    }

    impl Bound {
        fn low() -> Self {
            Bound { upper: false, calls: Vec::new() }
        }

        fn high() -> Self {
            Bound { upper: true, calls: Vec::new() }
        }
    }

    impl RandomSource for Bound {
        fn uniform(&mut self, low: u32, high: u32) -> u32 {
            self.calls.push((low, high));
            if self.upper {
                high
            } else {
                low
            }
        }
    }

    fn table(track_size: u32, zones: &[(u32, u32)]) -> ZoneTable {
        ZoneTable::new(
            track_size,
            zones.iter().map(|&(s, e)| Zone::new(s, e)).collect::<Vec<_>>(),
        )
        .unwrap()
    }

    fn lands_in_zone(table: &ZoneTable, position: u32, offset: u32) -> bool {
        let mut tracker = PositionTracker::new(table.track_size());
        tracker.set(position).unwrap();
        tracker.add(offset);
        table.zone_containing(tracker.get()).is_some()
    }

    #[rstest]
    #[case(10)]
    #[case(11)]
    #[case(12)]
    #[case(50)]
    #[case(52)]
    fn inside_zone_is_zero_without_drawing(#[case] position: u32) {
        let mut resolver = StopResolver::new(table(200, &[(10, 12), (50, 52)]), NoDraw);
        assert_eq!(resolver.resolve(position), Ok(0));
    }

    #[test]
    fn nearest_zone_ahead_is_chosen() {
        let mut resolver =
            StopResolver::new(table(200, &[(10, 12), (50, 52)]), SeededRandom::new(1));
        for _ in 0..500 {
            let offset = resolver.resolve(5).unwrap();
            assert!((5..=7).contains(&offset), "offset {}", offset);
        }
    }

    #[test]
    fn draw_range_is_the_zone_ahead() {
        let mut low = StopResolver::new(table(200, &[(10, 12), (50, 52)]), Bound::low());
        assert_eq!(low.resolve(20), Ok(30));
        let mut high = StopResolver::new(table(200, &[(10, 12), (50, 52)]), Bound::high());
        assert_eq!(high.resolve(20), Ok(32));
        assert_eq!(high.rng.calls, vec![(50, 52)]);
    }

    #[test]
    fn last_zone_ahead_beats_wrap() {
        let mut resolver =
            StopResolver::new(table(200, &[(0, 3), (198, 199)]), SeededRandom::new(3));
        assert_eq!(resolver.resolve(199), Ok(0));
        for _ in 0..200 {
            let offset = resolver.resolve(150).unwrap();
            assert!(offset == 48 || offset == 49, "offset {}", offset);
        }
    }

    #[test]
    fn wrap_draw_includes_last_step_of_first_zone() {
        let mut resolver = StopResolver::new(table(200, &[(10, 12), (50, 52)]), Bound::high());
        assert_eq!(resolver.resolve(60), Ok(200 + 12 - 60));
        assert_eq!(resolver.rng.calls, vec![(10, 12)]);

        let mut resolver = StopResolver::new(table(200, &[(10, 12), (50, 52)]), Bound::low());
        assert_eq!(resolver.resolve(199), Ok(200 + 10 - 199));
    }

    #[test]
    fn wrap_reaches_every_step_of_first_zone() {
        let zones = table(200, &[(10, 12), (50, 52)]);
        let mut resolver = StopResolver::new(zones, SeededRandom::new(11));
        let mut seen = [false; 3];
        for _ in 0..600 {
            let offset = resolver.resolve(100).unwrap();
            let landing = (100 + offset) % 200;
            seen[(landing - 10) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn stock_dial_from_sixty() {
        let mut resolver = StopResolver::new(ZoneTable::stock(), SeededRandom::new(5));
        let mut seen = [false; 6];
        for _ in 0..2000 {
            let offset = resolver.resolve(60).unwrap();
            assert!((38..=43).contains(&offset), "offset {}", offset);
            seen[(offset - 38) as usize] = true;
        }
        assert_eq!(seen, [true; 6]);
    }

    #[test]
    fn wrap_on_widest_track_does_not_overflow() {
        let zones = table(u32::MAX, &[(5, 5), (10, 10)]);
        let mut resolver = StopResolver::new(zones, Bound::high());
        assert_eq!(resolver.resolve(100), Ok(u32::MAX - 95));
        assert_eq!(resolver.resolve(u32::MAX - 1), Ok(6));
    }

    #[test]
    fn off_track_position_is_rejected() {
        let mut resolver = StopResolver::new(ZoneTable::stock(), NoDraw);
        assert_eq!(
            resolver.resolve(200),
            Err(Error::OutOfRange {
                value: 200,
                track_size: 200
            })
        );
    }

    #[rstest]
    #[case::stock(ZoneTable::stock())]
    #[case::single_point(table(50, &[(25, 25)]))]
    #[case::whole_track(table(12, &[(0, 11)]))]
    #[case::edges(table(200, &[(0, 3), (198, 199)]))]
    #[case::sparse(table(360, &[(7, 7), (90, 120), (121, 121), (300, 301)]))]
    fn every_position_lands_in_a_zone(#[case] zones: ZoneTable) {
        let track_size = zones.track_size();
        let checker = zones.clone();
        for rng in [Bound::low(), Bound::high()] {
            let mut resolver = StopResolver::new(zones.clone(), rng);
            for position in 0..track_size {
                let offset = resolver.resolve(position).unwrap();
                assert!(offset < track_size, "position {} offset {}", position, offset);
                assert!(
                    lands_in_zone(&checker, position, offset),
                    "position {} offset {}",
                    position,
                    offset
                );
            }
        }
    }
}
