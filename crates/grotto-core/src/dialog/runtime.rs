impl<D, IN, C> DialogMachine<D, IN, C>
where
    D: NarrationDispatcher,
    IN: InputProvider,
    C: CuePlayer,
{
    fn tick_request(&mut self, now_ms: u64) -> TickResult {
        if self.retry_at_ms.is_some_and(|at| now_ms < at) {
            return TickResult::NoRender;
        }
        self.retry_at_ms = None;

        let request = NarrationRequest {
            turns: self.history.turns().to_vec(),
            sampling: self.sampling.clone(),
        };
        debug!(
            "narration request #{} with {} turns",
            self.failures + 1,
            request.turns.len()
        );

        if let Err(err) = self.dispatcher.submit(request) {
            return self.fail_request(err, now_ms);
        }

        self.mode = GameMode::WaitingForNarration;
        self.tick_waiting(now_ms)
    }

    fn tick_waiting(&mut self, now_ms: u64) -> TickResult {
        match self.dispatcher.poll() {
            None => TickResult::NoRender,
            Some(Ok(narration)) => self.apply_narration(narration),
            Some(Err(err)) => self.fail_request(err, now_ms),
        }
    }

    fn tick_action(&mut self, choice: Option<u8>) -> TickResult {
        let Some(choice) = choice else {
            return TickResult::NoRender;
        };

        let digit = choice.to_string();
        info!("player chose {}", digit);

        self.layout.append("\n\n");
        self.layout.append(&self.persona.action_prefix);
        self.layout.append(&digit);
        self.history.push(ConversationTurn::new(Role::Player, digit));
        self.mode = GameMode::AwaitingNarration;
        TickResult::RenderRequested
    }

    fn apply_narration(&mut self, narration: String) -> TickResult {
        self.failures = 0;
        self.retry_at_ms = None;

        self.layout.clear();
        self.layout.append(&narration);

        let verdict = classify_narration(
            &narration,
            &self.persona.victory_phrase,
            self.persona.first_choice,
        );
        self.history.push(ConversationTurn::new(Role::Narrator, narration));

        match verdict {
            NarrationVerdict::Victory => {
                self.cues.play(Cue::Victory);
                self.end_game(Outcome::Victory);
            }
            NarrationVerdict::NoChoices => self.end_game(Outcome::Defeat),
            NarrationVerdict::Choices => {
                debug!("awaiting player choice");
                self.mode = GameMode::AwaitingAction;
            }
        }

        TickResult::RenderRequested
    }

    fn end_game(&mut self, outcome: Outcome) {
        info!("game ended: {:?}", outcome);
        self.layout.append("\n\n");
        self.layout.append(&self.persona.end_notice);
        self.mode = GameMode::Ended(outcome);
    }

    fn fail_request(&mut self, err: ServiceError, now_ms: u64) -> TickResult {
        self.failures = self.failures.saturating_add(1);

        if err.is_recoverable() && self.failures < self.retry.max_attempts {
            let delay = self.retry.delay_ms(self.failures);
            warn!("{}; retry {} in {} ms", err, self.failures, delay);
            self.retry_at_ms = Some(now_ms.saturating_add(delay));
            self.mode = GameMode::AwaitingNarration;
            return TickResult::NoRender;
        }

        error!("{} after {} attempt(s)", err, self.failures);
        self.layout.append("\n\n");
        self.layout.append(&self.persona.failure_notice);
        self.mode = GameMode::Failed(err);
        TickResult::RenderRequested
    }
}
