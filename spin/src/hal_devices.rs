use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Moves the needle forward by logical steps.
pub trait Actuator {
    /// Blocks until all `steps` have been issued.
    fn move_forward(&mut self, steps: u32);

    /// Wakes or powers down the motor driver.
    fn set_energized(&mut self, energized: bool);
}

impl<A: Actuator + ?Sized> Actuator for &mut A {
    fn move_forward(&mut self, steps: u32) {
        (**self).move_forward(steps)
    }

    fn set_energized(&mut self, energized: bool) {
        (**self).set_energized(energized)
    }
}

/// Pulse timing of a step/dir driver such as the DRV8825 or A4988.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepperSettings {
    /// Microsteps per logical step.
    pub microsteps: u32,
    pub pulse_high_us: u32,
    pub pulse_interval_us: u32,
    /// Time the driver needs after leaving sleep before it accepts pulses.
    pub wake_us: u32,
    /// Direction pin level for forward motion.
    pub forward_high: bool,
}

impl Default for StepperSettings {
    fn default() -> Self {
        StepperSettings {
            microsteps: 8,
            pulse_high_us: 2,
            pulse_interval_us: 600,
            wake_us: 1700,
            forward_high: true,
        }
    }
}

/// Step, direction and SLEEP pins of a driver board.
///
/// The SLEEP pin is active low on the DRV8825: high keeps the H-bridges
/// powered, low drops the coils.
pub struct StepperDriver<Step, Direction, Sleep, D> {
    step: Step,
    direction: Direction,
    sleep: Sleep,
    delay: D,
    settings: StepperSettings,
    energized: bool,
}

impl<Step, Direction, Sleep, D> StepperDriver<Step, Direction, Sleep, D>
where
    Step: OutputPin,
    Direction: OutputPin,
    Sleep: OutputPin,
    D: DelayNs,
{
    pub fn new(
        step: Step,
        direction: Direction,
        sleep: Sleep,
        delay: D,
        settings: StepperSettings,
    ) -> Self {
        let mut driver = StepperDriver {
            step,
            direction,
            sleep,
            delay,
            settings,
            energized: false,
        };
        driver.step.set_low().unwrap_or_default();
        driver.sleep.set_low().unwrap_or_default();
        driver
    }

    pub fn settings(&self) -> &StepperSettings {
        &self.settings
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }

    pub fn into_inner(self) -> (Step, Direction, Sleep, D) {
        (self.step, self.direction, self.sleep, self.delay)
    }

    fn pulse(&mut self) {
        self.step.set_high().unwrap_or_default();
        self.delay.delay_us(self.settings.pulse_high_us);
        self.step.set_low().unwrap_or_default();
        self.delay.delay_us(self.settings.pulse_interval_us);
    }
}

impl<Step, Direction, Sleep, D> Actuator for StepperDriver<Step, Direction, Sleep, D>
where
    Step: OutputPin,
    Direction: OutputPin,
    Sleep: OutputPin,
    D: DelayNs,
{
    // No logging in here: it runs right after the resolver.
    fn move_forward(&mut self, steps: u32) {
        for _ in 0..steps {
            for _ in 0..self.settings.microsteps {
                self.pulse();
            }
        }
    }

    fn set_energized(&mut self, energized: bool) {
        if energized == self.energized {
            return;
        }
        if energized {
            self.sleep.set_high().unwrap_or_default();
            let forward = if self.settings.forward_high {
                self.direction.set_high()
            } else {
                self.direction.set_low()
            };
            forward.unwrap_or_default();
            self.delay.delay_us(self.settings.wake_us);
        } else {
            self.step.set_low().unwrap_or_default();
            self.sleep.set_low().unwrap_or_default();
        }
        self.energized = energized;
    }
}
