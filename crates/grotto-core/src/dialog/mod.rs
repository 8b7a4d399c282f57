//! Turn-order state machine between the narrator service and the player.
//!
//! ```text
//!  AwaitingNarration --submit--> WaitingForNarration --reply--> AwaitingAction
//!         ^   ^                        |      |                      |
//!         |   +---- recoverable -------+      +--> Ended / Failed    |
//!         +------------------------ choice 1..=4 ---------------------+
//! ```

mod dispatch;
mod history;
mod service;

pub use dispatch::{InlineDispatcher, NarrationDispatcher, NarrationReply, ThreadedDispatcher};
pub use history::{ConversationHistory, ConversationTurn, Role};
pub use service::{
    ErrorClass, NarrationRequest, NarrativeService, RetryConfig, SamplingConfig, ServiceError,
};

use indexed_fb::FrameBuffer;
use log::{debug, error, info, warn};

use crate::{
    config::{Persona, SessionConfig},
    input::{InputEvent, InputProvider},
    layout::{TextLayoutBuffer, TextLine},
    render::{GlyphRenderer, SceneStyle, draw_scene},
    text_policy::{NarrationVerdict, classify_narration},
};

/// Highest choice number the player can pick.
pub const CHOICE_COUNT: u8 = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Victory,
    /// The narrator offered no choices.
    Defeat,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameMode {
    AwaitingNarration,
    WaitingForNarration,
    AwaitingAction,
    Ended(Outcome),
    /// The narrator is unreachable for good.
    Failed(ServiceError),
}

impl GameMode {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameMode::Ended(_) | GameMode::Failed(_))
    }
}

/// Audio cues requested from the host.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cue {
    Opening,
    Victory,
}

pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

pub struct DialogMachine<D, IN, C>
where
    D: NarrationDispatcher,
    IN: InputProvider,
    C: CuePlayer,
{
    dispatcher: D,
    input: IN,
    cues: C,
    persona: Persona,
    sampling: SamplingConfig,
    retry: RetryConfig,
    scene: SceneStyle,
    layout: TextLayoutBuffer,
    history: ConversationHistory,
    mode: GameMode,
    failures: u8,
    retry_at_ms: Option<u64>,
    pending_redraw: bool,
    quit_requested: bool,
}

impl<D, IN, C> DialogMachine<D, IN, C>
where
    D: NarrationDispatcher,
    IN: InputProvider,
    C: CuePlayer,
{
    pub fn new(dispatcher: D, input: IN, cues: C, config: &SessionConfig) -> Self {
        Self {
            dispatcher,
            input,
            cues,
            persona: config.persona.clone(),
            sampling: config.sampling.clone(),
            retry: config.retry,
            scene: config.scene,
            layout: TextLayoutBuffer::new(config.layout),
            history: ConversationHistory::seeded(&config.persona.opening_prompt),
            mode: GameMode::AwaitingNarration,
            failures: 0,
            retry_at_ms: None,
            pending_redraw: true,
            quit_requested: false,
        }
    }

    /// Starts the session soundtrack.
    pub fn start(&mut self) {
        info!("session start; {} opening turns", self.history.len());
        self.cues.play(Cue::Opening);
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn layout(&self) -> &TextLayoutBuffer {
        &self.layout
    }

    pub fn visible_lines(&self) -> impl Iterator<Item = &TextLine> + '_ {
        self.layout.visible_lines()
    }

    /// The error that ended the session, if it failed.
    pub fn last_error(&self) -> Option<&ServiceError> {
        match &self.mode {
            GameMode::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the player pressed Escape. Exiting is up to the host.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn input_mut(&mut self) -> &mut IN {
        &mut self.input
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }

    /// Draw phase: recomputes the whole frame from the scrollback.
    pub fn draw(&self, frame: &mut FrameBuffer, renderer: &GlyphRenderer<'_>) {
        draw_scene(frame, renderer, self.layout.visible_lines(), &self.scene);
    }

    /// Update phase. Call once per frame before [`DialogMachine::draw`].
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        let choice = self.drain_input();

        let result = match self.mode {
            GameMode::AwaitingNarration => self.tick_request(now_ms),
            GameMode::WaitingForNarration => self.tick_waiting(now_ms),
            GameMode::AwaitingAction => self.tick_action(choice),
            GameMode::Ended(_) | GameMode::Failed(_) => TickResult::NoRender,
        };

        if self.pending_redraw {
            self.pending_redraw = false;
            return TickResult::RenderRequested;
        }
        result
    }

    /// Pulls every event queued for this tick so none carries over. While a
    /// choice is awaited the lowest valid digit among them wins.
    fn drain_input(&mut self) -> Option<u8> {
        let mut choice: Option<u8> = None;

        loop {
            match self.input.poll_event() {
                Ok(Some(InputEvent::Digit(digit))) => {
                    if self.mode == GameMode::AwaitingAction
                        && (1..=CHOICE_COUNT).contains(&digit)
                    {
                        choice = Some(choice.map_or(digit, |current| current.min(digit)));
                    }
                }
                Ok(Some(InputEvent::Escape)) => self.quit_requested = true,
                Ok(None) => break,
                Err(_) => {
                    debug!("input poll failed");
                    break;
                }
            }
        }

        choice
    }
}

include!("runtime.rs");

#[cfg(test)]
mod tests;
