use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Rejected;
use crate::history::{FileStore, KeyValueStore, MemoryStore, RollHistory, RollHistoryEntry};
use crate::locale::{self, UiLanguage};
use crate::model::{BattleFormat, Event, Face, Mode, Parity, RollTicket, State};
use crate::notifier::Notifier;
use crate::rng::{Die, StdDie};
use crate::rules::{battle_progress, FaceProgress};
use crate::schedule::{Action, Scheduler};

fn epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

pub struct RoundController<D, N, S> {
    state: State,
    die: D,
    notifier: N,
    history: RollHistory<S>,
    scheduler: Scheduler,
    config: EngineConfig,
    now_ms: u64,
    outbox: Vec<Event>,
}

impl<N: Notifier> RoundController<StdDie, N, Box<dyn KeyValueStore>> {
    /// Entropy or seeded die per `config.seed`; file-backed history when
    /// `config.history_dir` is set, in-memory otherwise.
    pub fn from_config(config: EngineConfig, notifier: N) -> Self {
        let die = match config.seed {
            Some(seed) => StdDie::seeded(seed),
            None => StdDie::from_entropy(),
        };
        let store: Box<dyn KeyValueStore> = match &config.history_dir {
            Some(dir) => Box::new(FileStore::new(dir.clone())),
            None => Box::new(MemoryStore::new()),
        };
        Self::new(config, die, notifier, store)
    }
}

impl<D: Die, N: Notifier, S: KeyValueStore> RoundController<D, N, S> {
    pub fn new(config: EngineConfig, die: D, notifier: N, store: S) -> Self {
        let history = RollHistory::with_capacity(store, config.history_key.clone(), config.history_capacity);
        info!(
            speech = %config.speech_language,
            ui = ?config.ui_language,
            animation_ms = config.roll_animation_ms,
            "Starting round controller"
        );
        Self {
            state: crate::new_state(),
            die,
            notifier,
            history,
            scheduler: Scheduler::new(),
            config,
            now_ms: 0,
            outbox: vec![],
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// When the next scheduled action falls due, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Events produced since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    fn accept<T>(&self, action: &'static str, result: Result<T, Rejected>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(reason) => {
                debug!(action, %reason, "Rejected");
                None
            }
        }
    }

    fn record(&mut self, action: &'static str, result: Result<Event, Rejected>) -> bool {
        match self.accept(action, result) {
            Some(ev) => {
                self.outbox.push(ev);
                true
            }
            None => false,
        }
    }

    /// Drops announcements left over from a round that no longer exists.
    fn cancel_superseded(&mut self) {
        let dropped = self.scheduler.cancel_stale(self.state.round);
        if dropped > 0 {
            debug!(dropped, round = self.state.round.0, "Cancelled stale announcements");
            self.notifier.stop();
        }
    }

    pub fn select_mode(&mut self, mode: Mode) -> bool {
        let result = crate::select_mode(&mut self.state, mode);
        if !self.record("select_mode", result) { return false; }
        info!(?mode, "Mode selected");
        self.cancel_superseded();
        true
    }

    pub fn choose_parity(&mut self, parity: Parity) -> bool {
        let result = crate::choose_parity(&mut self.state, parity);
        self.record("choose_parity", result)
    }

    pub fn choose_battle_format(&mut self, format: BattleFormat) -> bool {
        let result = crate::choose_battle_format(&mut self.state, format);
        if !self.record("choose_battle_format", result) { return false; }
        self.cancel_superseded();
        true
    }

    pub fn toggle_selected_number(&mut self, n: Face) -> bool {
        let result = crate::toggle_selected_number(&mut self.state, n);
        self.record("toggle_selected_number", result)
    }

    pub fn add_player(&mut self) -> bool {
        let result = crate::add_player(&mut self.state);
        self.record("add_player", result)
    }

    pub fn remove_player(&mut self, idx: usize) -> bool {
        let result = crate::remove_player(&mut self.state, idx);
        self.record("remove_player", result)
    }

    pub fn set_player_name(&mut self, idx: usize, name: &str) -> bool {
        let result = crate::set_player_name(&mut self.state, idx, name);
        self.record("set_player_name", result)
    }

    pub fn set_player_bet(&mut self, idx: usize, bet: Option<Face>) -> bool {
        let result = crate::set_player_bet(&mut self.state, idx, bet);
        self.record("set_player_bet", result)
    }

    pub fn reset(&mut self) -> bool {
        let result = crate::reset_battle(&mut self.state);
        if !self.record("reset", result) { return false; }
        self.cancel_superseded();
        true
    }

    pub fn can_roll(&self) -> bool {
        crate::roll_guard(&self.state).is_ok()
    }

    /// Starts the roll animation. The die is sampled when the animation
    /// ends, on the first `advance` at or past the due time.
    pub fn roll(&mut self) -> bool {
        let result = crate::begin_roll(&mut self.state);
        let Some((ticket, ev)) = self.accept("roll", result) else { return false };
        self.outbox.push(ev);
        let due = self.now_ms + self.config.roll_animation_ms;
        self.scheduler.schedule(due, ticket.round, Action::CompleteRoll(ticket));
        debug!(round = ticket.round.0, roll = ticket.roll_seq, due, "Roll started");
        true
    }

    /// Moves the clock forward and runs everything that fell due, in order.
    /// Returns how many scheduled actions ran.
    pub fn advance(&mut self, now_ms: u64) -> usize {
        self.now_ms = self.now_ms.max(now_ms);
        let mut fired = 0;
        while let Some(entry) = self.scheduler.pop_due(self.now_ms) {
            fired += 1;
            match entry.action {
                Action::CompleteRoll(ticket) => self.complete_roll(ticket, entry.due_ms),
                Action::Announce { text, language } => self.announce(&text, &language),
            }
        }
        fired
    }

    fn complete_roll(&mut self, ticket: RollTicket, landed_at: u64) {
        let domain = crate::roll_domain(&self.state);
        let Some(face) = self.die.sample(&domain) else {
            warn!(?domain, "Die produced no face");
            self.abort(ticket);
            return;
        };
        let events = match crate::resolve_roll(&mut self.state, ticket, face) {
            Ok(events) => events,
            Err(reason) => {
                warn!(face, %reason, "Discarding roll");
                self.abort(ticket);
                return;
            }
        };
        self.outbox.extend(events);
        info!(face, mode = ?self.state.mode, winner = ?self.state.winner, "Roll resolved");

        self.history.append(RollHistoryEntry {
            value: face,
            player_name: self.state.round_winner_names().first().map(|n| n.to_string()),
            timestamp: epoch_ms(),
            game_mode: self.state.mode.label().to_string(),
        });

        let round = self.state.round;
        let speech = self.config.speech_language.clone();
        let spoken_at = landed_at + self.config.announce_delay_ms;
        let text = locale::roll_announcement(face, &speech);
        self.scheduler.schedule(spoken_at, round, Action::Announce { text, language: speech.clone() });
        if let Some(winner) = self.state.winner {
            let names = self.state.round_winner_names();
            let text = locale::winner_announcement(winner, &names, &speech, self.config.ui_language);
            let due = spoken_at + self.config.winner_announce_delay_ms;
            self.scheduler.schedule(due, round, Action::Announce { text, language: speech });
        }
    }

    fn abort(&mut self, ticket: RollTicket) {
        if let Err(reason) = crate::abort_roll(&mut self.state, ticket) {
            warn!(round = ticket.round.0, roll = ticket.roll_seq, %reason, "Could not abort roll");
        }
    }

    fn announce(&mut self, text: &str, language: &str) {
        if !self.notifier.is_available() {
            debug!(text, "Speech unavailable, skipping announcement");
            return;
        }
        if let Err(err) = self.notifier.speak(text, language) {
            warn!(%err, language, "Announcement failed");
        }
    }

    pub fn stop_speech(&mut self) {
        self.notifier.stop();
    }

    /// Unknown codes are accepted; number words fall back to English.
    pub fn set_speech_language(&mut self, code: &str) {
        match locale::language(code) {
            Some(lang) => info!(code, language = lang.name, "Speech language changed"),
            None => warn!(code, "Unknown speech language, numbers will be spoken in English"),
        }
        self.config.speech_language = code.to_string();
    }

    pub fn set_ui_language(&mut self, lang: UiLanguage) {
        self.config.ui_language = lang;
    }

    /// Per-face counts for the active battle, `None` outside a configured battle.
    pub fn battle_progress(&self) -> Option<Vec<FaceProgress>> {
        match (self.state.mode, self.state.battle_format) {
            (Mode::Battle, Some(format)) => Some(battle_progress(&self.state.round_rolls, format)),
            _ => None,
        }
    }

    pub fn history(&self) -> Vec<RollHistoryEntry> {
        self.history.list()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
