use grotto_core::dialog::{Cue, CuePlayer};
use log::info;

/// Logs cues in place of playback. Hosts with an audio device swap this out.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCues;

impl CuePlayer for LogCues {
    fn play(&mut self, cue: Cue) {
        let track = match cue {
            Cue::Opening => "opening theme",
            Cue::Victory => "victory fanfare",
        };
        info!("audio: {track}");
    }
}
