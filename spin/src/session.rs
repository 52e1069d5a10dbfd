use buttons::{Buttons, Signal};
use embedded_hal::delay::DelayNs;
use log::*;
use needle::{PositionTracker, Resolve};
use power::Sleeper;
use zones::{Error, ZoneTable};

use crate::hal_devices::Actuator;
use crate::states::SpinState;

/// Delays of the return to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Pause after the stop move before the driver is powered down.
    pub settle_ms: u32,
    /// Poll period while waiting for the button to be let go.
    pub release_poll_ms: u32,
}

impl Default for SessionTiming {
    fn default() -> Self {
        SessionTiming {
            settle_ms: 200,
            release_poll_ms: 10,
        }
    }
}

/// What happened during one spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinOutcome {
    pub home_steps: u64,
    pub free_spin_steps: u64,
    /// Position at the moment the button was released.
    pub released_at: u32,
    /// `None` when the stop could not be resolved and the needle was left in place.
    pub offset: Option<u32>,
    pub final_position: u32,
    /// Index of the zone the needle rests in.
    pub zone: Option<usize>,
}

/// Drives the needle through one spin per button press.
pub struct SpinSession<A, T, H, S, P, D> {
    actuator: A,
    buttons: Buttons<T, H>,
    sleeper: S,
    resolver: P,
    tracker: PositionTracker,
    delay: D,
    timing: SessionTiming,
    state: SpinState,
}

impl<A, T, H, S, P, D> SpinSession<A, T, H, S, P, D>
where
    A: Actuator,
    T: Signal,
    H: Signal,
    S: Sleeper,
    P: Resolve,
    D: DelayNs,
{
    pub fn new(
        resolver: P,
        actuator: A,
        buttons: Buttons<T, H>,
        sleeper: S,
        delay: D,
        timing: SessionTiming,
    ) -> Self {
        let tracker = PositionTracker::new(resolver.zones().track_size());
        SpinSession {
            actuator,
            buttons,
            sleeper,
            resolver,
            tracker,
            delay,
            timing,
            state: SpinState::Idle,
        }
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn position(&self) -> u32 {
        self.tracker.get()
    }

    pub fn zones(&self) -> &ZoneTable {
        self.resolver.zones()
    }

    fn enter(&mut self, next: SpinState) {
        debug_assert_eq!(self.state.next(), next, "illegal transition");
        if !next.is_quiet() {
            debug!("{:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    /// Serves spins forever. Returns only on an internal fault.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            self.spin_once()?;
        }
    }

    /// Sleeps until the button is pressed, then homes, spins and stops.
    pub fn spin_once(&mut self) -> Result<SpinOutcome, Error> {
        self.actuator.set_energized(false);
        self.sleeper.wait_for_trigger(&mut self.buttons.trigger);

        self.enter(SpinState::Homing);
        self.resolver.reseed();
        self.actuator.set_energized(true);
        let mut home_steps = 0u64;
        while !self.buttons.is_home_reached() {
            self.actuator.move_forward(1);
            home_steps += 1;
        }
        match self.tracker.set(0) {
            Ok(()) => info!("Home reached after {} steps", home_steps),
            Err(e) => error!("Home reset skipped: {}", e),
        }

        self.enter(SpinState::FreeSpin);
        let mut free_spin_steps = 0u64;
        while self.buttons.is_trigger_pressed() {
            self.actuator.move_forward(1);
            self.tracker.add(1);
            free_spin_steps += 1;
        }

        // Button released: nothing but arithmetic until the stop move is issued.
        self.enter(SpinState::Resolving);
        let released_at = self.tracker.get();
        let resolved = self.resolver.resolve(released_at);

        self.enter(SpinState::Stopping);
        let offset = match resolved {
            Ok(offset) => {
                self.actuator.move_forward(offset);
                self.tracker.add(offset);
                Some(offset)
            }
            Err(e @ Error::OutOfRange { .. }) => {
                error!("Stop skipped: {}", e);
                None
            }
            Err(e) => {
                self.actuator.set_energized(false);
                self.state = SpinState::Idle;
                error!("Stop resolution fault: {}", e);
                return Err(e);
            }
        };

        let final_position = self.tracker.get();
        let zone = self
            .zones()
            .zone_containing(final_position)
            .map(|(index, _)| index);
        info!(
            "Released at {} after {} steps, offset {:?}, needle at {} (zone {:?})",
            released_at, free_spin_steps, offset, final_position, zone
        );

        self.delay.delay_ms(self.timing.settle_ms);
        self.actuator.set_energized(false);
        while self.buttons.is_trigger_pressed() {
            self.delay.delay_ms(self.timing.release_poll_ms);
        }
        self.enter(SpinState::Idle);

        Ok(SpinOutcome {
            home_steps,
            free_spin_steps,
            released_at,
            offset,
            final_position,
            zone,
        })
    }
}
