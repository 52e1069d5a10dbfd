pub mod power {
    use buttons::Signal;
    use embedded_hal::delay::DelayNs;
    use log::*;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    /// Single-slot "wake requested" flag raised by a sleeper's wake path and
    /// consumed by the next wait. Clones share the slot.
    #[derive(Debug, Clone, Default)]
    pub struct WakeFlag {
        raised: Arc<AtomicBool>,
    }

    impl WakeFlag {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn raise(&self) {
            self.raised.store(true, Ordering::SeqCst);
        }

        pub fn is_raised(&self) -> bool {
            self.raised.load(Ordering::SeqCst)
        }

        /// Consumes a pending wake request.
        pub fn take(&self) -> bool {
            self.raised.swap(false, Ordering::SeqCst)
        }
    }

    /// Blocks the control loop until the trigger asks for a spin.
    pub trait Sleeper {
        fn wait_for_trigger<S: Signal>(&mut self, trigger: &mut S);
    }

    impl<T: Sleeper + ?Sized> Sleeper for &mut T {
        fn wait_for_trigger<S: Signal>(&mut self, trigger: &mut S) {
            (**self).wait_for_trigger(trigger)
        }
    }

    /// Busy-waits on the trigger, sleeping `poll_ms` between reads.
    pub struct PollingSleeper<D> {
        delay: D,
        poll_ms: u32,
        wake: WakeFlag,
    }

    impl<D: DelayNs> PollingSleeper<D> {
        pub fn new(delay: D, poll_ms: u32, wake: WakeFlag) -> Self {
            PollingSleeper {
                delay,
                poll_ms,
                wake,
            }
        }

        pub fn wake_flag(&self) -> &WakeFlag {
            &self.wake
        }
    }

    impl<D: DelayNs> Sleeper for PollingSleeper<D> {
        fn wait_for_trigger<S: Signal>(&mut self, trigger: &mut S) {
            debug!("Waiting for trigger");
            loop {
                if self.wake.take() || trigger.is_asserted() {
                    break;
                }
                self.delay.delay_ms(self.poll_ms);
            }
            info!("Wake requested");
        }
    }

}

pub use power::{PollingSleeper, Sleeper, WakeFlag};
