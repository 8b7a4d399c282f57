//! Line-based keyboard input read from a terminal.

use std::{
    io::{self, BufRead, BufReader},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use grotto_core::input::{InputEvent, InputProvider};
use log::debug;

/// Reads stdin on a background thread. Each entered line yields at most one
/// event: a leading digit becomes [`InputEvent::Digit`], `q`/`esc` or end of
/// input becomes [`InputEvent::Escape`].
#[derive(Debug)]
pub struct StdinInput {
    events: Receiver<InputEvent>,
    closed: bool,
}

impl StdinInput {
    pub fn spawn() -> io::Result<Self> {
        Self::spawn_reader(BufReader::new(io::stdin()))
    }

    /// Spawns the reader over any line source.
    pub fn spawn_reader<R>(reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("stdin-input".into())
            .spawn(move || {
                for line in reader.lines() {
                    let Ok(line) = line else { break };
                    if let Some(event) = parse_line(&line) {
                        if tx.send(event).is_err() {
                            return;
                        }
                    }
                }
                let _ = tx.send(InputEvent::Escape);
            })?;

        Ok(Self {
            events: rx,
            closed: false,
        })
    }
}

impl InputProvider for StdinInput {
    type Error = io::Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        if self.closed {
            return Ok(None);
        }

        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                debug!("stdin reader finished");
                self.closed = true;
                Ok(None)
            }
        }
    }
}

fn parse_line(line: &str) -> Option<InputEvent> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("esc") {
        return Some(InputEvent::Escape);
    }

    line.chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|digit| InputEvent::Digit(digit as u8))
}
