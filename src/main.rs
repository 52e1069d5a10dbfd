mod config;
#[cfg(target_os = "espidf")]
mod sleep;

use config::Config;
use zones::ZoneTable;

// Trigger button and limit switch wiring
#[cfg(target_os = "espidf")]
const TRIGGER_GPIO: i32 = 5;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use buttons::{Buttons, Input, Level};
    use esp_idf_svc::{
        hal::{
            delay::{Ets, FreeRtos},
            gpio::{PinDriver, Pull},
            peripherals::Peripherals,
        },
        log::EspLogger,
    };
    use log::*;
    use needle::{ClockSeeded, StopResolver};
    use power::{PollingSleeper, WakeFlag};
    use sleep::{IdleWait, LightSleeper};
    use spin::{SpinSession, StepperDriver};

    // Required for ESP-IDF patches
    esp_idf_svc::sys::link_patches();
    EspLogger::initialize_default();

    let config = Config::load()?;
    info!(
        "{} firmware v{}",
        config.get_device_name(),
        env!("CARGO_PKG_VERSION")
    );

    // A bad table must stop us before the driver is ever energized.
    let zones = match config.zone_table() {
        Ok(zones) => zones,
        Err(e) => {
            error!("Refusing to start: {:#}", e);
            return Err(e);
        }
    };
    for line in describe(&zones) {
        info!("{}", line);
    }

    let pull = |level: Level| match level {
        Level::Low => Pull::Up,
        Level::High => Pull::Down,
    };

    let peripherals = Peripherals::take()?;

    // STEP, DIR and the driver SLEEP pin
    let step = PinDriver::output(peripherals.pins.gpio15)?;
    let direction = PinDriver::output(peripherals.pins.gpio16)?;
    let driver_sleep = PinDriver::output(peripherals.pins.gpio17)?;
    let motor = StepperDriver::new(step, direction, driver_sleep, Ets, config.stepper_settings());

    let mut trigger = PinDriver::input(peripherals.pins.gpio5)?;
    trigger.set_pull(pull(config.trigger_level()))?;
    let mut home = PinDriver::input(peripherals.pins.gpio14)?;
    home.set_pull(pull(config.home_level()))?;
    let buttons = Buttons::new(
        Input::new(trigger, config.trigger_level()),
        Input::new(home, config.home_level()),
    );

    let wake = WakeFlag::new();
    let idle = if config.power.light_sleep {
        IdleWait::Light(LightSleeper::new(
            TRIGGER_GPIO,
            config.trigger_level(),
            wake,
            config.power.poll_ms,
        ))
    } else {
        IdleWait::Poll(PollingSleeper::new(FreeRtos, config.power.poll_ms, wake))
    };

    let mut session = SpinSession::new(
        StopResolver::new(zones, ClockSeeded::new()),
        motor,
        buttons,
        idle,
        FreeRtos,
        config.session_timing(),
    );

    info!("Ready, press the button to spin");
    session.run()?;
    Ok(())
}

/// Host build: validate the configuration and print the dial.
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let zones = config.zone_table()?;
    println!("{} (v{})", config.get_device_name(), env!("CARGO_PKG_VERSION"));
    for line in describe(&zones) {
        println!("{}", line);
    }
    let motor = config.stepper_settings();
    let timing = config.session_timing();
    println!(
        "{} microsteps per step, trigger active {:?}, home active {:?}, settle {} ms",
        motor.microsteps,
        config.trigger_level(),
        config.home_level(),
        timing.settle_ms
    );
    Ok(())
}

fn describe(zones: &ZoneTable) -> Vec<String> {
    let track_size = zones.track_size();
    let mut lines = vec![format!(
        "Track of {} steps, {} rest zones",
        track_size,
        zones.len()
    )];
    for (index, zone) in zones.iter().enumerate() {
        let degrees = |step: u32| f64::from(step) * 360.0 / f64::from(track_size);
        lines.push(format!(
            "  zone #{}: steps {} ({} wide, {:.1}° to {:.1}°)",
            index,
            zone,
            zone.width(),
            degrees(zone.start),
            degrees(zone.end)
        ));
    }
    lines
}
