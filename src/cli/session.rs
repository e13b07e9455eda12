//! Interactive timer session.
//!
//! Runs on a single thread inside a `tokio::task::LocalSet`: the countdown,
//! keyboard commands and host notification calls are multiplexed with
//! `tokio::select!`. Host calls run as local background tasks and report
//! back through a channel, so their results are always observed on the
//! session loop.

use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use super::commands::SessionCommand;
use super::display::{Display, OutputMode};
use crate::notification::{
    NotificationScheduler, NotificationSubmitter, PermissionRequester, PermissionState,
};
use crate::timer::{TickOutcome, TimerController, Wakeup};
use crate::types::{TimerConfig, TimerEvent};

/// How long quitting waits for host calls that are still in flight.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Results of background host calls, delivered to the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    Permission(PermissionState),
    NotificationScheduled(Option<String>),
}

/// Owns the controller and the scheduler for one run of the app.
pub struct Session<P, S> {
    controller: TimerController,
    scheduler: Rc<NotificationScheduler<P, S>>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    notice_tx: mpsc::UnboundedSender<SessionNotice>,
    notice_rx: mpsc::UnboundedReceiver<SessionNotice>,
    background: JoinSet<()>,
    output: OutputMode,
}

impl<P, S> Session<P, S>
where
    P: PermissionRequester + 'static,
    S: NotificationSubmitter + 'static,
{
    pub fn new(
        config: TimerConfig,
        scheduler: NotificationScheduler<P, S>,
        output: OutputMode,
    ) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        Self {
            controller: TimerController::new(config, event_tx),
            scheduler: Rc::new(scheduler),
            events,
            notice_tx,
            notice_rx,
            background: JoinSet::new(),
            output,
        }
    }

    /// Runs until `q`, end of input or Ctrl-C.
    ///
    /// Host calls still in flight on exit get [`SHUTDOWN_GRACE`] to finish.
    /// Must be called inside a `LocalSet`.
    pub async fn run<R>(&mut self, input: R, autostart: bool) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        if self.output == OutputMode::Human {
            Display::show_banner(&self.controller.snapshot());
        }
        self.request_permission();
        if autostart {
            self.controller.start();
        }

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            self.render_events();

            tokio::select! {
                wakeup = self.controller.next_wakeup() => {
                    self.handle_wakeup(wakeup);
                }
                Some(notice) = self.notice_rx.recv() => self.render_notice(&notice),
                Some(result) = self.background.join_next() => Self::reap(result),
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read command")? else {
                        debug!("Input closed");
                        break;
                    };
                    match line.parse::<SessionCommand>() {
                        Ok(command) => {
                            if self.dispatch(command).is_break() {
                                break;
                            }
                        }
                        Err(e) => Display::show_error(&e),
                    }
                }
                _ = &mut ctrl_c => {
                    debug!("Interrupted");
                    break;
                }
            }
        }

        self.shutdown_background().await;
        self.render_events();
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.render_notice(&notice);
        }
        Ok(())
    }

    /// Applies one interactive command.
    pub fn dispatch(&mut self, command: SessionCommand) -> ControlFlow<()> {
        debug!(?command, "Dispatching command");
        match command {
            SessionCommand::Toggle => {
                self.controller.toggle();
            }
            SessionCommand::Increase => {
                self.controller.increase();
            }
            SessionCommand::Decrease => {
                self.controller.decrease();
            }
            SessionCommand::RequestPermission => self.request_permission(),
            SessionCommand::Status => Display::show_status(
                &self.controller.snapshot(),
                self.scheduler.permission(),
                self.output,
            ),
            SessionCommand::Help => Display::show_help(),
            SessionCommand::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Applies a controller wakeup and fires the notification on expiry.
    pub fn handle_wakeup(&mut self, wakeup: Wakeup) -> TickOutcome {
        let outcome = self.controller.handle_wakeup(wakeup);
        if outcome == TickOutcome::Expired {
            self.schedule_expiry_notification();
        }
        outcome
    }

    /// Starts a background permission request.
    pub fn request_permission(&mut self) {
        let scheduler = Rc::clone(&self.scheduler);
        let notices = self.notice_tx.clone();
        self.background.spawn_local(async move {
            let state = scheduler.request_permission().await;
            let _ = notices.send(SessionNotice::Permission(state));
        });
    }

    fn schedule_expiry_notification(&mut self) {
        let scheduler = Rc::clone(&self.scheduler);
        let notices = self.notice_tx.clone();
        self.background.spawn_local(async move {
            let id = scheduler.schedule_expiry_notification().await;
            let _ = notices.send(SessionNotice::NotificationScheduled(id));
        });
    }

    /// Waits for every outstanding host call.
    pub async fn finish_background(&mut self) {
        while let Some(result) = self.background.join_next().await {
            Self::reap(result);
        }
    }

    /// Waits up to [`SHUTDOWN_GRACE`] for outstanding host calls, then
    /// aborts whatever is still pending.
    pub async fn shutdown_background(&mut self) {
        if tokio::time::timeout(SHUTDOWN_GRACE, self.finish_background())
            .await
            .is_err()
        {
            warn!(
                pending = self.background.len(),
                "Host notification calls still pending, abandoning them"
            );
            self.background.shutdown().await;
        }
    }

    /// Number of host calls that have not been reaped yet.
    pub fn pending_background(&self) -> usize {
        self.background.len()
    }

    fn reap(result: Result<(), JoinError>) {
        if let Err(e) = result {
            if !e.is_cancelled() {
                warn!(error = %e, "Background notification task failed");
            }
        }
    }

    /// Removes and returns the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Removes and returns the background results received so far.
    pub fn drain_notices(&mut self) -> Vec<SessionNotice> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.notice_rx.try_recv() {
            notices.push(notice);
        }
        notices
    }

    fn render_events(&mut self) {
        for event in self.drain_events() {
            Display::show_event(&event, self.output);
        }
    }

    fn render_notice(&self, notice: &SessionNotice) {
        match notice {
            SessionNotice::Permission(state) => {
                if self.output == OutputMode::Human {
                    Display::show_permission(*state);
                }
            }
            SessionNotice::NotificationScheduled(id) => {
                debug!(?id, "Notification request finished");
            }
        }
    }

    pub fn controller(&self) -> &TimerController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TimerController {
        &mut self.controller
    }

    pub fn scheduler(&self) -> &NotificationScheduler<P, S> {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{MockNotificationSubmitter, MockPermissionRequester};
    use crate::types::TimerPhase;
    use tokio::io::{AsyncWriteExt, BufReader};
    use tokio::task::LocalSet;

    type MockSession = Session<MockPermissionRequester, MockNotificationSubmitter>;

    fn create_session() -> MockSession {
        let scheduler = NotificationScheduler::new(
            MockPermissionRequester::new(),
            MockNotificationSubmitter::new(),
        );
        Session::new(TimerConfig::default(), scheduler, OutputMode::Human)
    }

    #[test]
    fn test_dispatch_quit_breaks() {
        let mut session = create_session();
        assert!(session.dispatch(SessionCommand::Quit).is_break());
        assert!(session.dispatch(SessionCommand::Increase).is_continue());
        assert_eq!(session.controller().remaining_seconds(), 1560);
    }

    #[tokio::test]
    async fn test_dispatch_toggle() {
        let mut session = create_session();
        session.dispatch(SessionCommand::Toggle);
        assert_eq!(session.controller().phase(), TimerPhase::Running);
        session.dispatch(SessionCommand::Toggle);
        assert_eq!(session.controller().phase(), TimerPhase::Idle);
    }

    #[tokio::test]
    async fn test_expiry_schedules_one_notification() {
        LocalSet::new()
            .run_until(async {
                let mut session = create_session();
                session.dispatch(SessionCommand::Decrease);
                session.dispatch(SessionCommand::Toggle);

                let mut expired = 0;
                for _ in 0..1441 {
                    if session.handle_wakeup(Wakeup::Tick) == TickOutcome::Expired {
                        expired += 1;
                    }
                }
                assert_eq!(expired, 1);

                session.finish_background().await;
                assert_eq!(session.scheduler().submitter().submission_count(), 1);

                let notices = session.drain_notices();
                assert_eq!(notices.len(), 1);
                assert!(matches!(
                    &notices[0],
                    SessionNotice::NotificationScheduled(Some(_))
                ));
            })
            .await;
    }

    #[tokio::test]
    async fn test_permission_request_reports_back() {
        LocalSet::new()
            .run_until(async {
                let mut session = create_session();
                session.scheduler().permissions().set_granted(false);
                session.dispatch(SessionCommand::RequestPermission);
                session.finish_background().await;

                assert_eq!(
                    session.drain_notices(),
                    vec![SessionNotice::Permission(PermissionState::Denied)]
                );
                assert_eq!(session.scheduler().permission(), PermissionState::Denied);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_host_calls_are_reaped_while_running() {
        LocalSet::new()
            .run_until(async {
                let mut session = create_session();
                let (mut writer, reader) = tokio::io::duplex(64);
                writer.write_all(b"b\nb\nb\n").await.unwrap();

                // Input stays open, so the loop is still running when cut off
                let run = session.run(BufReader::new(reader), false);
                let cut = tokio::time::timeout(Duration::from_secs(5), run).await;
                assert!(cut.is_err());

                assert_eq!(session.scheduler().permissions().request_count(), 4);
                assert_eq!(session.pending_background(), 0);
                drop(writer);
            })
            .await;
    }

    #[tokio::test]
    async fn test_failed_notification_does_not_touch_timer() {
        LocalSet::new()
            .run_until(async {
                let mut session = create_session();
                session.scheduler().submitter().set_should_fail(true);
                session.controller_mut().adjust_duration(-1440);
                session.controller_mut().start();
                for _ in 0..61 {
                    session.handle_wakeup(Wakeup::Tick);
                }
                session.finish_background().await;

                assert_eq!(
                    session.drain_notices(),
                    vec![SessionNotice::NotificationScheduled(None)]
                );
                let state = session.controller().snapshot();
                assert!(state.is_finished);
                assert_eq!(state.remaining_seconds, 1500);
            })
            .await;
    }
}
