//! Session configuration, built once at startup and passed down explicitly.

use crate::{
    dialog::{RetryConfig, SamplingConfig},
    layout::LayoutConfig,
    render::SceneStyle,
};

const DEFAULT_OPENING_PROMPT: &str = "\
We are going to play a tabletop RPG. You are the game master.

## Setting
* The player (me) and my partner Miku search a deep cave for a hidden treasure.
* Miku is optimistic and speaks casually.
* The cave is full of dangerous creatures and traps.

## Rules
* Describe the situation, then offer me at most four numbered actions. I answer with a number.
* Things go wrong along the way.
* If we bring the treasure out of the cave I win, and you must say \"おめでとう\".
  If we retreat without it, or either of us is badly hurt, I lose.
* Reply in Japanese.

Start the game.";

/// Narrator persona and the fixed strings the machine writes to the screen.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Persona {
    /// First history turn, sent as the requester.
    pub opening_prompt: String,
    /// Phrase the narrator uses to announce a win.
    pub victory_phrase: String,
    /// Marker of the first numbered choice. Its absence ends the game.
    pub first_choice: char,
    /// Prefix of the line echoing the player's pick.
    pub action_prefix: String,
    pub end_notice: String,
    pub failure_notice: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            opening_prompt: DEFAULT_OPENING_PROMPT.to_string(),
            victory_phrase: "おめでとう".to_string(),
            first_choice: '1',
            action_prefix: "私の行動：".to_string(),
            end_notice: "[Esc]でゲームを終了します。".to_string(),
            failure_notice: "通信エラーが発生しました。".to_string(),
        }
    }
}

impl Persona {
    pub fn with_opening_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.opening_prompt = prompt.into();
        self
    }

    pub fn with_victory_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.victory_phrase = phrase.into();
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    pub layout: LayoutConfig,
    pub sampling: SamplingConfig,
    pub persona: Persona,
    pub retry: RetryConfig,
    pub scene: SceneStyle,
}

impl SessionConfig {
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}
