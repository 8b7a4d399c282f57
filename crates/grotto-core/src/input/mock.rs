use std::collections::VecDeque;

use super::{InputEvent, InputProvider};

/// Input source with no hardware behind it.
#[derive(Default, Debug, Clone, Copy)]
pub struct MockInput;

impl MockInput {
    pub const fn new() -> Self {
        Self
    }
}

impl InputProvider for MockInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        Ok(None)
    }
}

/// Replays queued events. Events pushed between ticks are delivered on the
/// next poll, mimicking a host that buffers presses per frame.
#[derive(Default, Debug, Clone)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = InputEvent>>(events: I) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl InputProvider for ScriptedInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        Ok(self.events.pop_front())
    }
}
