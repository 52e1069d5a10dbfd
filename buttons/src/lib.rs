pub mod buttons {
    use embedded_hal::digital::InputPin;

    /// Polled digital input with an "asserted" meaning attached.
    pub trait Signal {
        fn is_asserted(&mut self) -> bool;
    }

    impl<S: Signal + ?Sized> Signal for &mut S {
        fn is_asserted(&mut self) -> bool {
            (**self).is_asserted()
        }
    }

    /// Pin level that counts as asserted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum Level {
        /// Pulled up, switch shorts to ground.
        #[default]
        Low,
        High,
    }

    /// Button or limit switch wired to a GPIO input.
    pub struct Input<P> {
        pin: P,
        active: Level,
    }

    impl<P: InputPin> Input<P> {
        pub fn new(pin: P, active: Level) -> Self {
            Input { pin, active }
        }

        pub fn active_low(pin: P) -> Self {
            Self::new(pin, Level::Low)
        }

        pub fn active_high(pin: P) -> Self {
            Self::new(pin, Level::High)
        }

        pub fn active_level(&self) -> Level {
            self.active
        }

        pub fn into_inner(self) -> P {
            self.pin
        }
    }

    impl<P: InputPin> Signal for Input<P> {
        // A pin that cannot be read counts as released, so the motor stops
        // instead of spinning forever.
        fn is_asserted(&mut self) -> bool {
            match self.active {
                Level::Low => self.pin.is_low().unwrap_or_default(),
                Level::High => self.pin.is_high().unwrap_or_default(),
            }
        }
    }

    /// The spin button and the home limit switch of the dial.
    pub struct Buttons<T, H> {
        pub trigger: T,
        pub home: H,
    }

    impl<T: Signal, H: Signal> Buttons<T, H> {
        pub fn new(trigger: T, home: H) -> Self {
            Buttons { trigger, home }
        }

        pub fn is_trigger_pressed(&mut self) -> bool {
            self.trigger.is_asserted()
        }

        pub fn is_home_reached(&mut self) -> bool {
            self.home.is_asserted()
        }
    }

}

pub use buttons::{Buttons, Input, Level, Signal};
