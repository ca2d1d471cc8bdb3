//! Screen navigation as a pure state machine.
//!
//! [`transition`] maps the active [`NavigationState`] and one [`Event`] to
//! the next state plus a list of [`Effect`]s. It performs no I/O and reads
//! no clock. The [`ViewCoordinator`] wraps it: it owns the state, applies
//! timer effects to a virtual [`SceneClock`], keeps the credits overlay,
//! and hands the remaining effects (completion requests and cancellations)
//! to the host.
//!
//! ```text
//! Loading -> IntroAnimation -> CardFlow -> InfoPage
//!                                       -> Quiz -> Game -> (restart) -> Quiz
//!                                       -> Chat
//! any --Back--> Loading
//! ```

use std::sync::Arc;
use std::time::Duration;

use greentrack_content::ContentRepository;
use greentrack_types::{CitationSection, PageId, Screen, SessionId, SwipeDirection};
use tracing::{debug, info, warn};

use crate::chat::{ChatSession, CompletionError, PendingCompletion};
use crate::clock::{ClockError, SceneClock, TimerKind};
use crate::config::{AppConfig, RestartTarget};
use crate::game::GameEngine;
use crate::gesture::SwipeGestureClassifier;
use crate::info::InfoPageState;
use crate::navigator::{DecisionTreeNavigator, NextAction};
use crate::quiz::{QuizEngine, QuizProgress};

// ---------------------------------------------------------------------------
// State, events, effects
// ---------------------------------------------------------------------------

/// The active screen together with the state scoped to it.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationState {
    /// Splash screen.
    Loading,
    /// Intro animation showing the word at this index.
    IntroAnimation {
        /// Index into the intro words.
        word: usize,
    },
    /// Swipe cards.
    CardFlow(DecisionTreeNavigator),
    /// An informational page.
    InfoPage(Box<InfoPageState>),
    /// The knowledge check.
    Quiz(QuizEngine),
    /// The design game.
    Game(GameEngine),
    /// The assistant chat.
    Chat(ChatSession),
}

impl NavigationState {
    /// Tag of the active screen.
    pub const fn screen(&self) -> Screen {
        match self {
            Self::Loading => Screen::Loading,
            Self::IntroAnimation { .. } => Screen::IntroAnimation,
            Self::CardFlow(_) => Screen::CardFlow,
            Self::InfoPage(_) => Screen::InfoPage,
            Self::Quiz(_) => Screen::Quiz,
            Self::Game(_) => Screen::Game,
            Self::Chat(_) => Screen::Chat,
        }
    }
}

/// Something that happened: user input, a timer, or a completion result.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A scheduled timer fired.
    TimerFired(TimerKind),
    /// The card is being dragged; horizontal distance in points.
    Drag(f64),
    /// The drag ended at this distance.
    Release(f64),
    /// A complete swipe in one direction.
    Swipe(SwipeDirection),
    /// Leave the quiz welcome screen.
    StartQuiz,
    /// Pick a quiz answer.
    Answer(usize),
    /// Move past an answered question.
    NextQuestion,
    /// Pick a design game option.
    ChooseOption(usize),
    /// Start over from the game's final screen.
    RestartGame,
    /// Replace the chat input buffer.
    SetInput(String),
    /// Send the chat input buffer.
    SubmitInput,
    /// Send this chat text directly.
    Say(String),
    /// A completion requested earlier has finished.
    CompletionFinished {
        /// Session that issued the request.
        session: SessionId,
        /// Reply text or failure.
        outcome: Result<String, CompletionError>,
    },
    /// Move the timeline slider.
    SelectYear(i32),
    /// Expand or collapse a benefit.
    ToggleBenefit(u32),
    /// Run the footprint calculator on this kWh input.
    CalculateFootprint(String),
    /// Return to the splash screen, discarding the current screen's state.
    Back,
}

impl Event {
    /// Short name for logging, without any user text.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TimerFired(_) => "timer_fired",
            Self::Drag(_) => "drag",
            Self::Release(_) => "release",
            Self::Swipe(_) => "swipe",
            Self::StartQuiz => "start_quiz",
            Self::Answer(_) => "answer",
            Self::NextQuestion => "next_question",
            Self::ChooseOption(_) => "choose_option",
            Self::RestartGame => "restart_game",
            Self::SetInput(_) => "set_input",
            Self::SubmitInput => "submit_input",
            Self::Say(_) => "say",
            Self::CompletionFinished { .. } => "completion_finished",
            Self::SelectYear(_) => "select_year",
            Self::ToggleBenefit(_) => "toggle_benefit",
            Self::CalculateFootprint(_) => "calculate_footprint",
            Self::Back => "back",
        }
    }
}

/// A request produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm the scene timer, replacing any pending one.
    ScheduleTimer {
        /// What fires.
        kind: TimerKind,
        /// Delay from now.
        after: Duration,
    },
    /// Run a completion and report back with [`Event::CompletionFinished`].
    RequestCompletion(PendingCompletion),
    /// Abandon the in-flight completion of this session.
    CancelCompletion(SessionId),
}

impl Effect {
    /// Whether the host, rather than the coordinator, carries this out.
    pub const fn is_host_facing(&self) -> bool {
        !matches!(self, Self::ScheduleTimer { .. })
    }
}

/// Result of [`transition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The state after the event.
    pub state: NavigationState,
    /// Requests to carry out, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    const fn stay(state: NavigationState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: NavigationState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}

// ---------------------------------------------------------------------------
// Pure transition function
// ---------------------------------------------------------------------------

/// Apply one event to the navigation state.
///
/// Events that make no sense for the active screen leave it unchanged.
pub fn transition(
    state: NavigationState,
    event: Event,
    content: &ContentRepository,
    config: &AppConfig,
) -> Transition {
    match event {
        Event::Back => back(state, config),
        Event::TimerFired(kind) => on_timer(state, kind, content, config),
        event => match state {
            NavigationState::CardFlow(nav) => on_card(nav, &event, content, config),
            NavigationState::InfoPage(page) => on_page(page, &event),
            NavigationState::Quiz(quiz) => on_quiz(quiz, &event, content),
            NavigationState::Game(game) => on_game(game, &event, content, config),
            NavigationState::Chat(chat) => on_chat(chat, event),
            other => ignored(other, &event),
        },
    }
}

fn ignored(state: NavigationState, event: &Event) -> Transition {
    debug!(screen = ?state.screen(), event = event.name(), "Event ignored on this screen");
    Transition::stay(state)
}

const fn loading_timer(config: &AppConfig) -> Effect {
    Effect::ScheduleTimer {
        kind: TimerKind::LoadingComplete,
        after: Duration::from_millis(config.timing.loading_delay_ms),
    }
}

const fn intro_timer(config: &AppConfig) -> Effect {
    Effect::ScheduleTimer {
        kind: TimerKind::IntroWord,
        after: Duration::from_millis(config.timing.intro_word_interval_ms),
    }
}

fn back(state: NavigationState, config: &AppConfig) -> Transition {
    let mut effects = Vec::new();
    if let NavigationState::Chat(chat) = &state
        && chat.is_waiting()
    {
        effects.push(Effect::CancelCompletion(chat.id()));
    }
    effects.push(loading_timer(config));
    debug!(from = ?state.screen(), "Back to loading screen");
    Transition {
        state: NavigationState::Loading,
        effects,
    }
}

fn on_timer(
    state: NavigationState,
    kind: TimerKind,
    content: &ContentRepository,
    config: &AppConfig,
) -> Transition {
    match (state, kind) {
        (NavigationState::Loading, TimerKind::LoadingComplete) => Transition::with(
            NavigationState::IntroAnimation { word: 0 },
            intro_timer(config),
        ),
        (NavigationState::IntroAnimation { word }, TimerKind::IntroWord) => {
            match word
                .checked_add(1)
                .filter(|next| *next < content.intro_words().len())
            {
                Some(next) => Transition::with(
                    NavigationState::IntroAnimation { word: next },
                    intro_timer(config),
                ),
                None => Transition::stay(NavigationState::CardFlow(DecisionTreeNavigator::new(
                    content.decision_tree(),
                    SwipeGestureClassifier::new(&config.gesture),
                ))),
            }
        }
        (state, kind) => {
            debug!(screen = ?state.screen(), timer = ?kind, "Stale timer ignored");
            Transition::stay(state)
        }
    }
}

fn on_card(
    mut nav: DecisionTreeNavigator,
    event: &Event,
    content: &ContentRepository,
    config: &AppConfig,
) -> Transition {
    let tree = content.decision_tree();
    let action = match event {
        Event::Drag(distance) => {
            nav.drag(*distance);
            None
        }
        Event::Release(distance) => nav.release(*distance, tree),
        Event::Swipe(direction) => nav.select(*direction, tree),
        other => return ignored(NavigationState::CardFlow(nav), other),
    };

    match action {
        None | Some(NextAction::ShowCard(_)) => Transition::stay(NavigationState::CardFlow(nav)),
        Some(NextAction::ShowInfoPage(page)) => open_page(nav, page, content),
        Some(NextAction::EnterChat) => Transition::stay(NavigationState::Chat(ChatSession::new(
            content.chat(),
            config.chat.system_prompt.clone(),
        ))),
    }
}

fn open_page(nav: DecisionTreeNavigator, page: PageId, content: &ContentRepository) -> Transition {
    if page.launches_quiz() {
        return Transition::stay(NavigationState::Quiz(QuizEngine::new(
            content.quiz().questions.clone(),
        )));
    }
    match content.page(page) {
        Some(info) => Transition::stay(NavigationState::InfoPage(Box::new(InfoPageState::new(
            info.clone(),
        )))),
        None => {
            warn!(page = ?page, "Page has no content; staying on card");
            Transition::stay(NavigationState::CardFlow(nav))
        }
    }
}

fn on_page(mut page: Box<InfoPageState>, event: &Event) -> Transition {
    match event {
        Event::SelectYear(year) => {
            let selected = page.select_year(*year);
            debug!(page = ?page.id(), requested = year, ?selected, "Slider moved");
        }
        Event::ToggleBenefit(id) => {
            let _ = page.toggle_benefit(*id);
        }
        Event::CalculateFootprint(input) => {
            let _ = page.calculate_footprint(input);
        }
        other => return ignored(NavigationState::InfoPage(page), other),
    }
    Transition::stay(NavigationState::InfoPage(page))
}

fn on_quiz(mut quiz: QuizEngine, event: &Event, content: &ContentRepository) -> Transition {
    match event {
        Event::StartQuiz => {
            let _ = quiz.start();
        }
        Event::Answer(option) => {
            let _ = quiz.select_answer(*option);
        }
        Event::NextQuestion => {
            if let Some(QuizProgress::Finished { .. }) = quiz.advance() {
                return Transition::stay(NavigationState::Game(GameEngine::new(
                    content.game().clone(),
                )));
            }
        }
        other => return ignored(NavigationState::Quiz(quiz), other),
    }
    Transition::stay(NavigationState::Quiz(quiz))
}

fn on_game(
    mut game: GameEngine,
    event: &Event,
    content: &ContentRepository,
    config: &AppConfig,
) -> Transition {
    match event {
        Event::ChooseOption(option) => {
            let _ = game.choose_option(*option);
        }
        Event::RestartGame if !game.is_finished() => {
            debug!(index = game.index(), "Restart ignored before the final score");
        }
        Event::RestartGame => {
            let questions = || content.quiz().questions.clone();
            return match config.flow.restart_target {
                RestartTarget::QuizQuestions => {
                    Transition::stay(NavigationState::Quiz(QuizEngine::started(questions())))
                }
                RestartTarget::QuizWelcome => {
                    Transition::stay(NavigationState::Quiz(QuizEngine::new(questions())))
                }
                RestartTarget::Game => {
                    game.restart();
                    Transition::stay(NavigationState::Game(game))
                }
            };
        }
        other => return ignored(NavigationState::Game(game), other),
    }
    Transition::stay(NavigationState::Game(game))
}

fn on_chat(mut chat: ChatSession, event: Event) -> Transition {
    let pending = match event {
        Event::SetInput(text) => {
            chat.set_input(text);
            None
        }
        Event::SubmitInput => chat.submit_input(),
        Event::Say(text) => chat.begin_send(&text),
        Event::CompletionFinished { session, outcome } => {
            let _ = chat.finish(session, outcome);
            None
        }
        other => return ignored(NavigationState::Chat(chat), &other),
    };
    match pending {
        Some(pending) => Transition::with(
            NavigationState::Chat(chat),
            Effect::RequestCompletion(pending),
        ),
        None => Transition::stay(NavigationState::Chat(chat)),
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Owns the navigation state, the scene clock, and the credits overlay.
#[derive(Debug, Clone)]
pub struct ViewCoordinator {
    content: Arc<ContentRepository>,
    config: AppConfig,
    state: NavigationState,
    clock: SceneClock,
    credits_visible: bool,
}

impl ViewCoordinator {
    /// Start on the loading screen with the splash timer armed.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] if the splash deadline cannot be represented.
    pub fn new(content: Arc<ContentRepository>, config: AppConfig) -> Result<Self, ClockError> {
        let mut coordinator = Self {
            content,
            config,
            state: NavigationState::Loading,
            clock: SceneClock::new(),
            credits_visible: false,
        };
        let effect = loading_timer(&coordinator.config);
        let _ = coordinator.apply(vec![effect])?;
        Ok(coordinator)
    }

    /// The active state.
    pub const fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Tag of the active screen.
    pub const fn screen(&self) -> Screen {
        self.state.screen()
    }

    /// Content tables backing every screen.
    pub fn content(&self) -> &ContentRepository {
        &self.content
    }

    /// The configuration in effect.
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The intro word on screen during the intro animation.
    pub fn intro_word(&self) -> Option<&str> {
        match self.state {
            NavigationState::IntroAnimation { word } => {
                self.content.intro_words().get(word).map(String::as_str)
            }
            _ => None,
        }
    }

    /// Handle one event and return the effects the host must carry out.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] if a timer deadline cannot be represented.
    pub fn dispatch(&mut self, event: Event) -> Result<Vec<Effect>, ClockError> {
        let before = self.state.screen();
        let state = std::mem::replace(&mut self.state, NavigationState::Loading);
        let Transition { state, effects } = transition(state, event, &self.content, &self.config);
        self.state = state;

        let after = self.state.screen();
        if before != after {
            info!(from = ?before, to = ?after, "Screen changed");
        }
        self.apply(effects)
    }

    /// Let `by` of virtual time pass, firing every timer that falls due.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] if virtual time would overflow.
    pub fn advance_clock(&mut self, by: Duration) -> Result<Vec<Effect>, ClockError> {
        let target = self.clock.offset(by)?;
        let mut effects = Vec::new();
        while let Some(kind) = self.clock.advance_until(target) {
            effects.extend(self.dispatch(Event::TimerFired(kind))?);
        }
        Ok(effects)
    }

    /// Delay until the next timer fires, if one is pending.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.clock.time_until_due()
    }

    /// Whether the credits overlay is showing.
    pub const fn credits_visible(&self) -> bool {
        self.credits_visible
    }

    /// Show the credits overlay over the current screen.
    pub fn show_credits(&mut self) {
        self.credits_visible = true;
        debug!(screen = ?self.screen(), "Credits shown");
    }

    /// Close the credits overlay.
    pub fn hide_credits(&mut self) {
        self.credits_visible = false;
        debug!(screen = ?self.screen(), "Credits hidden");
    }

    /// Citation sections listed by the credits overlay.
    pub fn citations(&self) -> &[CitationSection] {
        self.content.citations()
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Result<Vec<Effect>, ClockError> {
        let (host, timers): (Vec<Effect>, Vec<Effect>) =
            effects.into_iter().partition(Effect::is_host_facing);
        for effect in timers {
            if let Effect::ScheduleTimer { kind, after } = effect {
                self.clock.schedule(kind, after)?;
                debug!(timer = ?self.clock.pending(), now = ?self.clock.now(), ?after, "Timer armed");
            }
        }
        Ok(host)
    }
}
