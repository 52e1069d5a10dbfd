// Phases of one spin. The session walks them in order and returns to Idle.

/// - Idle: driver powered down, waiting for the button
/// - Homing: stepping until the limit switch closes
/// - FreeSpin: stepping while the button is held
/// - Resolving: picking the stop step, no I/O allowed
/// - Stopping: travelling the resolved offset
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum SpinState {
    #[default]
    Idle,
    Homing,
    FreeSpin,
    Resolving,
    Stopping,
}

impl SpinState {
    /// Only one successor is legal from every state.
    pub fn next(&self) -> SpinState {
        match self {
            SpinState::Idle => SpinState::Homing,
            SpinState::Homing => SpinState::FreeSpin,
            SpinState::FreeSpin => SpinState::Resolving,
            SpinState::Resolving => SpinState::Stopping,
            SpinState::Stopping => SpinState::Idle,
        }
    }

    pub fn is_energized(&self) -> bool {
        !matches!(self, SpinState::Idle)
    }

    /// States entered between trigger release and the end of the stop move,
    /// where nothing may be logged.
    pub fn is_quiet(&self) -> bool {
        matches!(self, SpinState::Resolving | SpinState::Stopping)
    }
}
