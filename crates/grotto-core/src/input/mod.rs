//! Input abstraction layer.

pub mod mock;

pub use mock::{MockInput, ScriptedInput};

/// Discrete key events consumed by the dialog machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    /// A number key was pressed. Only `1..=4` select a choice.
    Digit(u8),
    /// Request to leave the game. Handled by the host.
    Escape,
}

/// Polled, edge-triggered input provider. Each press is reported once.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}
