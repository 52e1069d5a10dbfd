use buttons::{Level, Signal};
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::sys::{self, esp, EspError};
use log::*;
use power::{PollingSleeper, Sleeper, WakeFlag};

/// Light sleep with a level wakeup on the trigger GPIO. RAM and the needle
/// position survive; the motor driver is already powered down by the session.
pub struct LightSleeper {
    gpio: i32,
    active: Level,
    wake: WakeFlag,
    retry_ms: u32,
}

impl LightSleeper {
    pub fn new(gpio: i32, active: Level, wake: WakeFlag, retry_ms: u32) -> Self {
        LightSleeper {
            gpio,
            active,
            wake,
            retry_ms,
        }
    }

    /// Returns true when the trigger GPIO ended the sleep.
    fn sleep_once(&mut self) -> Result<bool, EspError> {
        let level = match self.active {
            Level::Low => sys::gpio_int_type_t_GPIO_INTR_LOW_LEVEL,
            Level::High => sys::gpio_int_type_t_GPIO_INTR_HIGH_LEVEL,
        };
        unsafe {
            esp!(sys::gpio_wakeup_enable(self.gpio, level))?;
            esp!(sys::esp_sleep_enable_gpio_wakeup())?;
            esp!(sys::esp_light_sleep_start())?;
            let cause = sys::esp_sleep_get_wakeup_cause();
            esp!(sys::gpio_wakeup_disable(self.gpio))?;
            Ok(cause == sys::esp_sleep_source_t_ESP_SLEEP_WAKEUP_GPIO)
        }
    }
}

impl Sleeper for LightSleeper {
    fn wait_for_trigger<S: Signal>(&mut self, trigger: &mut S) {
        info!("Entering light sleep");
        loop {
            if self.wake.take() || trigger.is_asserted() {
                break;
            }
            match self.sleep_once() {
                Ok(true) => self.wake.raise(),
                Ok(false) => debug!("Woke up without trigger"),
                Err(e) => {
                    warn!("Light sleep failed: {:?}", e);
                    FreeRtos::delay_ms(self.retry_ms);
                }
            }
        }
        info!("Woke up");
    }
}

/// Idle strategy picked from the `[power]` section.
pub enum IdleWait {
    Light(LightSleeper),
    Poll(PollingSleeper<FreeRtos>),
}

impl Sleeper for IdleWait {
    fn wait_for_trigger<S: Signal>(&mut self, trigger: &mut S) {
        match self {
            IdleWait::Light(sleeper) => sleeper.wait_for_trigger(trigger),
            IdleWait::Poll(sleeper) => sleeper.wait_for_trigger(trigger),
        }
    }
}
