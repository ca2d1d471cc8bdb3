//! The terminal event loop.
//!
//! One task owns the [`ViewCoordinator`]. It waits on three sources at once:
//! input lines, the scene timer deadline, and finished completions. Wall time
//! elapsed between wake-ups is fed to the coordinator's virtual clock.
//! Completions run on spawned tasks and report back over a channel, so the
//! transcript is only ever touched from the loop.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use greentrack_core::{CompletionError, CompletionService, Effect, Event, ViewCoordinator};
use greentrack_types::SessionId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::render::render;
use crate::shell::{self, Command, HELP};

type Finished = (SessionId, Result<String, CompletionError>);

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep going.
    Continue,
    /// The user asked to quit.
    Quit,
}

/// Drives a [`ViewCoordinator`] from a terminal.
pub struct Host<S> {
    coordinator: ViewCoordinator,
    service: Arc<S>,
    in_flight: HashMap<SessionId, JoinHandle<()>>,
    finished_tx: mpsc::UnboundedSender<Finished>,
    finished_rx: mpsc::UnboundedReceiver<Finished>,
    last_tick: Instant,
    last_frame: String,
}

impl<S> Host<S>
where
    S: CompletionService + Send + Sync + 'static,
{
    /// Create a host around a coordinator and a completion service.
    pub fn new(coordinator: ViewCoordinator, service: Arc<S>) -> Self {
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        Self {
            coordinator,
            service,
            in_flight: HashMap::new(),
            finished_tx,
            finished_rx,
            last_tick: Instant::now(),
            last_frame: String::new(),
        }
    }

    /// The coordinator being driven.
    pub const fn coordinator(&self) -> &ViewCoordinator {
        &self.coordinator
    }

    /// Run until the user quits, or until input ends and no completion is
    /// outstanding.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut input_open = true;

        loop {
            self.tick()?;
            self.present(out)?;
            if !input_open && self.in_flight.is_empty() {
                break;
            }

            let wait = self.coordinator.time_until_next_timer();
            tokio::select! {
                line = lines.next_line(), if input_open => match line? {
                    Some(line) => {
                        if self.handle_line(&line, out)? == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        debug!(in_flight = self.in_flight.len(), "Input closed");
                        input_open = false;
                    }
                },
                () = tokio::time::sleep(wait.unwrap_or_default()), if wait.is_some() => {}
                Some((session, outcome)) = self.finished_rx.recv() => {
                    if self.in_flight.remove(&session).is_none() {
                        debug!(%session, "Completion finished after cancellation");
                    }
                    self.dispatch(Event::CompletionFinished { session, outcome })?;
                }
                else => break,
            }
        }

        for (session, handle) in self.in_flight.drain() {
            debug!(%session, "Aborting completion on exit");
            handle.abort();
        }
        Ok(())
    }

    /// Handle one line of input.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, AppError> {
        let command = match shell::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(out, "{e}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Credits => self.coordinator.show_credits(),
            Command::Close => self.coordinator.hide_credits(),
            other => {
                // Elapsed time lands first so a command typed after a timer
                // was due sees the state the timer produced.
                self.tick()?;
                for event in other.into_events() {
                    self.dispatch(event)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn tick(&mut self) -> Result<(), AppError> {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        let effects = self.coordinator.advance_clock(elapsed)?;
        self.carry_out(effects);
        Ok(())
    }

    fn dispatch(&mut self, event: Event) -> Result<(), AppError> {
        let effects = self.coordinator.dispatch(event)?;
        self.carry_out(effects);
        Ok(())
    }

    fn carry_out(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestCompletion(pending) => {
                    let session = pending.session;
                    let service = Arc::clone(&self.service);
                    let finished = self.finished_tx.clone();
                    info!(%session, "Requesting completion");
                    let handle = tokio::spawn(async move {
                        let outcome = service.complete(&pending.request).await;
                        // The receiver lives as long as the host.
                        let _ = finished.send((pending.session, outcome));
                    });
                    if let Some(previous) = self.in_flight.insert(session, handle) {
                        warn!(%session, "Replacing an outstanding completion");
                        previous.abort();
                    }
                }
                Effect::CancelCompletion(session) => {
                    if let Some(handle) = self.in_flight.remove(&session) {
                        info!(%session, "Cancelling completion");
                        handle.abort();
                    }
                }
                Effect::ScheduleTimer { kind, .. } => {
                    warn!(?kind, "Timer effect reached the host");
                }
            }
        }
    }

    fn present<W: Write>(&mut self, out: &mut W) -> Result<(), AppError> {
        let frame = render(&self.coordinator);
        if frame != self.last_frame {
            write!(out, "{frame}")?;
            out.flush()?;
            self.last_frame = frame;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::time::Duration;

    use greentrack_content::ContentRepository;
    use greentrack_core::{AppConfig, StubCompletionService};
    use greentrack_types::{Screen, Sender, SwipeDirection};

    use super::*;

    fn coordinator_in_chat() -> ViewCoordinator {
        let content = Arc::new(ContentRepository::builtin().unwrap());
        let mut coordinator = ViewCoordinator::new(content, AppConfig::default()).unwrap();
        let _ = coordinator.advance_clock(Duration::from_secs(10)).unwrap();
        let _ = coordinator.dispatch(Event::Swipe(SwipeDirection::Right)).unwrap();
        let _ = coordinator.dispatch(Event::Swipe(SwipeDirection::Left)).unwrap();
        assert_eq!(coordinator.screen(), Screen::Chat);
        coordinator
    }

    #[tokio::test]
    async fn reply_is_appended_before_exit() {
        let service = Arc::new(StubCompletionService::replying("Switch idle servers off."));
        let mut host = Host::new(coordinator_in_chat(), Arc::clone(&service));
        let mut out = Vec::new();

        host.run(&b"say how can I help?\n"[..], &mut out).await.unwrap();

        let greentrack_core::NavigationState::Chat(chat) = host.coordinator().state() else {
            panic!("left the chat screen");
        };
        let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts.get(1), Some(&"how can I help?"));
        assert_eq!(texts.get(2), Some(&"Switch idle servers off."));
        assert_eq!(chat.messages().get(2).map(|m| m.sender), Some(Sender::Assistant));
        assert_eq!(service.requests().len(), 1);
        assert!(String::from_utf8_lossy(&out).contains("Assistant: Switch idle servers off."));
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let service = Arc::new(StubCompletionService::replying("unused"));
        let mut host = Host::new(coordinator_in_chat(), Arc::clone(&service));
        let mut out = Vec::new();

        host.run(&b"quit\nsay hello\n"[..], &mut out).await.unwrap();

        assert!(service.requests().is_empty());
    }

    #[tokio::test]
    async fn bad_command_is_reported_and_ignored() {
        let service = Arc::new(StubCompletionService::replying("unused"));
        let mut host = Host::new(coordinator_in_chat(), service);
        let mut out = Vec::new();

        let flow = host.handle_line("dance", &mut out).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(host.coordinator().screen(), Screen::Chat);
        assert!(String::from_utf8_lossy(&out).contains("unknown command 'dance'"));
    }

    #[tokio::test]
    async fn back_returns_to_loading() {
        let service = Arc::new(StubCompletionService::replying("late"));
        let mut host = Host::new(coordinator_in_chat(), service);
        let mut out = Vec::new();

        host.run(&b"say hi\nback\n"[..], &mut out).await.unwrap();

        assert!(matches!(host.coordinator().screen(), Screen::Loading | Screen::IntroAnimation));
        assert!(host.in_flight.is_empty());
    }

    #[tokio::test]
    async fn credits_toggle_without_events() {
        let service = Arc::new(StubCompletionService::replying("unused"));
        let mut host = Host::new(coordinator_in_chat(), service);
        let mut out = Vec::new();

        let _ = host.handle_line("credits", &mut out).unwrap();
        assert!(host.coordinator().credits_visible());
        let _ = host.handle_line("close", &mut out).unwrap();
        assert!(!host.coordinator().credits_visible());
        assert_eq!(host.coordinator().screen(), Screen::Chat);
    }
}
