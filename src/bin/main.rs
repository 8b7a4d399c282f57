use std::{fs, fs::File, io::BufReader};

use anyhow::Context;
use grotto_core::{
    config::{Persona, SessionConfig},
    dialog::{DialogMachine, SamplingConfig, ThreadedDispatcher, TickResult},
    font::GlyphTable,
    render::GlyphRenderer,
};
use grotto_host::{
    audio::LogCues,
    config::HostConfig,
    input::StdinInput,
    network::ChatClient,
    platform::display::{TerminalPresenter, draw_window_frame},
};
use indexed_fb::FrameBuffer;
use log::{info, warn};

use frame_clock::FrameClock;

#[path = "main/frame_clock.rs"]
mod frame_clock;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let host = HostConfig::from_env().context("reading host configuration")?;

    let font = File::open(&host.font_path)
        .with_context(|| format!("opening font {}", host.font_path.display()))?;
    let table = GlyphTable::parse(BufReader::new(font))
        .with_context(|| format!("parsing font {}", host.font_path.display()))?;
    info!("font loaded: {} glyphs", table.len());

    let mut persona = Persona::default();
    if let Some(path) = &host.prompt_path {
        let prompt = fs::read_to_string(path)
            .with_context(|| format!("reading prompt {}", path.display()))?;
        persona = persona.with_opening_prompt(prompt);
    }
    let session = SessionConfig::default()
        .with_persona(persona)
        .with_sampling(SamplingConfig::default().with_model(host.model.clone()));

    let dispatcher =
        ThreadedDispatcher::spawn(ChatClient::new(&host)).context("starting narrator worker")?;
    let input = StdinInput::spawn().context("starting input reader")?;
    let mut app = DialogMachine::new(dispatcher, input, LogCues, &session);

    let renderer = GlyphRenderer::new(&table);
    let mut frame = FrameBuffer::new();
    let mut presenter = TerminalPresenter::new(host.frame_out.clone());
    let mut clock = FrameClock::new(host.tick);

    app.start();
    loop {
        if app.tick(clock.now_ms()) == TickResult::RenderRequested {
            app.draw(&mut frame, &renderer);
            draw_window_frame(&mut frame);
            if let Err(err) = presenter.present(&frame, app.visible_lines(), app.mode()) {
                warn!("present failed: {err}");
            }
        }

        if app.quit_requested() {
            break;
        }
        clock.wait_next();
    }

    match app.last_error() {
        Some(err) => info!("session closed after {err}"),
        None => info!("session closed in {:?}", app.mode()),
    }
    Ok(())
}
