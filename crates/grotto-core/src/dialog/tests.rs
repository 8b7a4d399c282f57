use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use super::*;
use crate::input::{InputEvent, ScriptedInput, mock::MockInput};

#[derive(Clone, Default)]
struct ScriptedService {
    replies: Rc<RefCell<VecDeque<Result<String, ServiceError>>>>,
    requests: Rc<RefCell<Vec<NarrationRequest>>>,
}

impl ScriptedService {
    fn with_replies<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, ServiceError>>,
    {
        let service = Self::default();
        service.replies.borrow_mut().extend(replies);
        service
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl NarrativeService for ScriptedService {
    fn narrate(&mut self, request: &NarrationRequest) -> Result<String, ServiceError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::fatal("script exhausted")))
    }
}

#[derive(Default)]
struct RecordedCues(Vec<Cue>);

impl CuePlayer for RecordedCues {
    fn play(&mut self, cue: Cue) {
        self.0.push(cue);
    }
}

type Machine<IN> = DialogMachine<InlineDispatcher<ScriptedService>, IN, RecordedCues>;

fn machine<IN: InputProvider>(service: &ScriptedService, input: IN) -> Machine<IN> {
    DialogMachine::new(
        InlineDispatcher::new(service.clone()),
        input,
        RecordedCues::default(),
        &SessionConfig::default(),
    )
}

fn ok(text: &str) -> Result<String, ServiceError> {
    Ok(text.to_string())
}

fn screen_text<IN: InputProvider>(machine: &Machine<IN>) -> String {
    machine
        .visible_lines()
        .map(TextLine::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn first_request_carries_opening_prompt_and_sampling() {
    let service = ScriptedService::with_replies([ok("1. 進む")]);
    let mut app = machine(&service, MockInput::new());

    app.tick(0);

    let requests = service.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].turns.len(), 1);
    assert_eq!(requests[0].turns[0].role, Role::Requester);
    assert_eq!(requests[0].sampling.temperature, 0.6);
    assert_eq!(requests[0].sampling.frequency_penalty, 1.0);
}

#[test]
fn narration_without_first_choice_ends_without_player_turn() {
    let service = ScriptedService::with_replies([ok("洞窟は崩れた。2. 逃げる")]);
    let mut app = machine(&service, MockInput::new());

    assert_eq!(app.tick(0), TickResult::RenderRequested);

    assert_eq!(*app.mode(), GameMode::Ended(Outcome::Defeat));
    assert_eq!(app.history().len(), 2);
    assert_eq!(app.history().last().unwrap().role, Role::Narrator);
    assert!(app.history().turns().iter().all(|t| t.role != Role::Player));
    assert!(app.cues().0.is_empty());
}

#[test]
fn victory_phrase_ends_game_and_plays_cue() {
    let service = ScriptedService::with_replies([ok("おめでとう！秘宝を持ち帰った。1. もう一度")]);
    let mut app = machine(&service, MockInput::new());
    app.start();

    app.tick(0);

    assert_eq!(*app.mode(), GameMode::Ended(Outcome::Victory));
    assert_eq!(app.cues().0, vec![Cue::Opening, Cue::Victory]);
    assert!(screen_text(&app).contains("[Esc]"));
}

#[test]
fn narration_with_choices_awaits_action() {
    let service = ScriptedService::with_replies([ok("どうする？\n1. 進む\n2. 戻る")]);
    let mut app = machine(&service, MockInput::new());

    app.tick(0);

    assert_eq!(*app.mode(), GameMode::AwaitingAction);
    assert!(screen_text(&app).starts_with("どうする？"));
}

#[test]
fn choice_appends_player_turn_and_requests_again() {
    let service = ScriptedService::with_replies([ok("1. 進む 2. 戻る 3. 待つ"), ok("1. 続ける")]);
    let mut app = machine(&service, ScriptedInput::default());
    app.tick(0);

    app.input_mut().push(InputEvent::Digit(3));
    assert_eq!(app.tick(16), TickResult::RenderRequested);

    assert_eq!(*app.mode(), GameMode::AwaitingNarration);
    assert_eq!(
        app.history().last(),
        Some(&ConversationTurn::new(Role::Player, "3"))
    );
    assert!(screen_text(&app).ends_with("私の行動：3"));

    app.tick(32);
    assert_eq!(service.request_count(), 2);
    assert_eq!(service.requests.borrow()[1].turns.len(), 3);
    assert_eq!(*app.mode(), GameMode::AwaitingAction);
}

#[test]
fn no_input_or_unmapped_key_leaves_state_unchanged() {
    let service = ScriptedService::with_replies([ok("1. 進む")]);
    let mut app = machine(&service, ScriptedInput::default());
    app.tick(0);
    let before = app.history().clone();

    assert_eq!(app.tick(16), TickResult::NoRender);
    app.input_mut().push(InputEvent::Digit(5));
    app.input_mut().push(InputEvent::Digit(0));
    assert_eq!(app.tick(32), TickResult::NoRender);

    assert_eq!(*app.mode(), GameMode::AwaitingAction);
    assert_eq!(app.history(), &before);
    assert_eq!(app.input_mut().pending(), 0);
}

#[test]
fn lowest_choice_wins_and_the_rest_are_dropped() {
    let service = ScriptedService::with_replies([ok("1. a 2. b 3. c"), ok("1. d")]);
    let mut app = machine(&service, ScriptedInput::default());
    app.tick(0);

    app.input_mut().push(InputEvent::Digit(3));
    app.input_mut().push(InputEvent::Digit(1));
    app.input_mut().push(InputEvent::Digit(2));
    app.tick(16);

    assert_eq!(app.history().last().unwrap().content, "1");
    assert_eq!(app.input_mut().pending(), 0);
}

#[test]
fn long_bursts_of_early_presses_are_drained_in_one_tick() {
    let service = ScriptedService::with_replies([ok("1. a 2. b"), ok("1. c")]);
    let mut script = vec![InputEvent::Digit(9); 40];
    script.push(InputEvent::Digit(2));
    let mut app = machine(&service, ScriptedInput::new(script));

    app.tick(0);
    assert_eq!(app.input_mut().pending(), 0);
    assert_eq!(*app.mode(), GameMode::AwaitingAction);

    app.tick(16);
    assert_eq!(*app.mode(), GameMode::AwaitingAction);
    assert_eq!(app.history().last().unwrap().role, Role::Narrator);
}

#[test]
fn presses_before_choices_are_offered_are_discarded() {
    let service = ScriptedService::with_replies([ok("1. a")]);
    let mut app = machine(&service, ScriptedInput::new([InputEvent::Digit(1)]));

    app.tick(0);
    assert_eq!(*app.mode(), GameMode::AwaitingAction);

    app.tick(16);
    assert_eq!(*app.mode(), GameMode::AwaitingAction);
    assert_eq!(app.history().len(), 2);
}

#[test]
fn recoverable_failure_backs_off_then_succeeds() {
    let service = ScriptedService::with_replies([
        Err(ServiceError::recoverable("connection reset")),
        ok("1. 進む"),
    ]);
    let mut app = machine(&service, MockInput::new());

    app.tick(1_000);
    assert_eq!(*app.mode(), GameMode::AwaitingNarration);
    assert_eq!(app.history().len(), 1);

    app.tick(1_100);
    assert_eq!(service.request_count(), 1);

    app.tick(1_500);
    assert_eq!(service.request_count(), 2);
    assert_eq!(*app.mode(), GameMode::AwaitingAction);
    assert!(app.last_error().is_none());
}

#[test]
fn exhausted_retries_escalate_to_failed() {
    let service = ScriptedService::with_replies(
        (0..4).map(|_| Err(ServiceError::recoverable("timeout"))),
    );
    let mut app = machine(&service, MockInput::new());

    let mut now = 0;
    for _ in 0..10 {
        app.tick(now);
        now += 10_000;
    }

    assert_eq!(service.request_count(), 4);
    assert!(matches!(app.mode(), GameMode::Failed(_)));
    assert_eq!(
        app.last_error(),
        Some(&ServiceError::recoverable("timeout"))
    );
    assert_eq!(app.last_error().unwrap().class, ErrorClass::Recoverable);
    assert_eq!(app.history().len(), 1);
}

#[test]
fn fatal_failure_is_distinct_from_ended() {
    let service = ScriptedService::with_replies([Err(ServiceError::fatal("missing content"))]);
    let mut app = machine(&service, MockInput::new());

    app.tick(0);

    assert_eq!(
        *app.mode(),
        GameMode::Failed(ServiceError::fatal("missing content"))
    );
    assert!(app.mode().is_terminal());
    assert_eq!(app.last_error().unwrap().reason, "missing content");
    assert_eq!(app.history().len(), 1);
    assert!(screen_text(&app).contains("通信エラー"));
}

#[test]
fn escape_is_reported_to_the_host() {
    let service = ScriptedService::with_replies([ok("終わり")]);
    let mut app = machine(&service, ScriptedInput::new([InputEvent::Escape]));

    app.tick(0);

    assert!(app.quit_requested());
}

#[test]
fn draw_renders_the_scrollback() {
    let table = crate::font::GlyphTable::parse_str(
        "ENCODING 49\nBBX 1 1 0 0\nBITMAP\n80\nENDCHAR\n",
    )
    .unwrap();
    let renderer = GlyphRenderer::new(&table);
    let service = ScriptedService::with_replies([ok("1")]);
    let mut app = machine(&service, MockInput::new());
    app.tick(0);

    let mut frame = FrameBuffer::new();
    app.draw(&mut frame, &renderer);

    assert_eq!(frame.pixel(2, 16), Some(7));
}

/// Holds each reply back for a fixed number of polls.
struct SlowDispatcher {
    service: ScriptedService,
    ready: Option<NarrationReply>,
    hold: usize,
    remaining: usize,
}

impl SlowDispatcher {
    fn new(service: &ScriptedService, hold: usize) -> Self {
        Self {
            service: service.clone(),
            ready: None,
            hold,
            remaining: 0,
        }
    }
}

impl NarrationDispatcher for SlowDispatcher {
    fn submit(&mut self, request: NarrationRequest) -> Result<(), ServiceError> {
        self.ready = Some(self.service.narrate(&request));
        self.remaining = self.hold;
        Ok(())
    }

    fn poll(&mut self) -> Option<NarrationReply> {
        if self.remaining > 0 {
            self.remaining -= 1;
            return None;
        }
        self.ready.take()
    }
}

#[test]
fn waiting_survives_empty_polls_and_applies_late_reply() {
    let service = ScriptedService::with_replies([ok("洞窟の入口だ。1. 入る 2. 帰る")]);
    let mut app = DialogMachine::new(
        SlowDispatcher::new(&service, 2),
        ScriptedInput::default(),
        RecordedCues::default(),
        &SessionConfig::default(),
    );

    assert_eq!(app.tick(0), TickResult::RenderRequested);
    assert_eq!(*app.mode(), GameMode::WaitingForNarration);

    app.input_mut().push(InputEvent::Digit(1));
    assert_eq!(app.tick(16), TickResult::NoRender);
    assert_eq!(*app.mode(), GameMode::WaitingForNarration);
    assert_eq!(app.input_mut().pending(), 0);
    assert_eq!(app.history().len(), 1);

    assert_eq!(app.tick(32), TickResult::RenderRequested);
    assert_eq!(*app.mode(), GameMode::AwaitingAction);
    assert_eq!(service.request_count(), 1);
    assert_eq!(app.history().len(), 2);
    assert_eq!(app.history().last().unwrap().role, Role::Narrator);

    assert_eq!(app.tick(48), TickResult::NoRender);
    assert_eq!(*app.mode(), GameMode::AwaitingAction);
    assert_eq!(app.history().len(), 2);
}
