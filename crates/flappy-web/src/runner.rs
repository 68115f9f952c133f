use flappy_engine::{
    Command, FramePacer, GameConfig, GameEvent, GameState, InputEvent, InputQueue, Outbox, Phase,
    Pipeline, SkinCatalog, Surface,
};

/// Owns everything the browser loop drives: simulation, input, pacing and the render pipeline.
///
/// Browser-free so the frame bookkeeping is testable natively. `lib.rs` keeps one in a
/// `thread_local!` and feeds it `requestAnimationFrame` timestamps.
pub struct GameRunner {
    state: GameState,
    input: InputQueue,
    pacer: FramePacer,
    pipeline: Pipeline,
    /// Emitted since the last drain, waiting to be dispatched to JS.
    outbox: Outbox,
    high_score: u32,
    skins: SkinCatalog,
}

impl GameRunner {
    pub fn new(config: GameConfig) -> Self {
        Self {
            pacer: FramePacer::new(config.pacing),
            state: GameState::new(config),
            input: InputQueue::new(),
            pipeline: Pipeline::new(),
            outbox: Outbox::new(),
            high_score: 0,
            skins: SkinCatalog::default(),
        }
    }

    /// Queue raw input for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply a command right away, outside the frame loop.
    pub fn command(&mut self, command: Command) {
        let outbox = self.state.apply(command);
        self.absorb(outbox);
    }

    /// Run one display refresh: translate queued input, then run however many
    /// simulation steps the pacer hands out. Commands go with the first step, or are
    /// applied on their own when the pacer hands out none.
    pub fn tick(&mut self, timestamp_ms: f64) {
        let commands = self.input.commands(self.state.phase());
        let paced = self.pacer.advance(timestamp_ms);

        if paced.count == 0 {
            for command in commands {
                self.command(command);
            }
            return;
        }

        for i in 0..paced.count {
            let frame = flappy_engine::Frame {
                dt_ms: paced.dt_ms,
                commands: if i == 0 { &commands[..] } else { &[] },
            };
            let outbox = self.state.advance(&frame);
            self.absorb(outbox);
        }
    }

    /// Draw the current state. Reads only.
    pub fn render<S: Surface>(&self, surface: &mut S, skin: Option<&S::Image>) {
        self.pipeline.draw(surface, &self.state, skin);
    }

    /// Take everything emitted since the last call.
    pub fn drain_outbox(&mut self) -> Outbox {
        std::mem::take(&mut self.outbox)
    }

    /// Forget the last frame timestamp so a resumed loop does not see one huge delta.
    pub fn reset_clock(&mut self) {
        self.pacer.reset();
    }

    fn absorb(&mut self, mut outbox: Outbox) {
        for event in &outbox.events {
            if let GameEvent::GameOver { final_score } = *event {
                if final_score > self.high_score {
                    log::info!("new high score: {final_score}");
                    self.high_score = final_score;
                }
            }
        }
        self.outbox.append(&mut outbox);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.state.config()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn skins(&self) -> &SkinCatalog {
        &self.skins
    }

    pub fn skins_mut(&mut self) -> &mut SkinCatalog {
        &mut self.skins
    }

    pub fn replace_skins(&mut self, skins: SkinCatalog) {
        self.skins = skins;
    }
}
