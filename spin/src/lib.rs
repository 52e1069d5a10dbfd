pub mod hal_devices;
pub mod session;
pub mod states;

pub use hal_devices::{Actuator, StepperDriver, StepperSettings};
pub use session::{SessionTiming, SpinOutcome, SpinSession};
pub use states::SpinState;
