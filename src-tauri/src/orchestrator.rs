//! Application orchestrator: owns the trigger loop, the session state and
//! the single in-flight analysis.
//!
//! Flow per cycle: capture (blocking worker) → analyze (async, timed out)
//! → result pushed to the overlay. At most one cycle runs at a time; a
//! trigger that arrives while one is running is dropped.

use crate::capture::{CaptureError, ScreenSource};
use crate::config::LoopConfig;
use crate::cursor::CursorSource;
use crate::llm::{AnalysisError, Analyzer};
use crate::overlay::{OverlayPhase, OverlaySink};
use crate::session::{AnalysisMode, AnalysisResult, SessionSnapshot, SessionState, TriggerOrigin};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Why a cycle produced no text.
#[derive(Debug, thiserror::Error)]
enum CycleError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Capture worker failed: {0}")]
    Worker(String),
}

struct Inner<A> {
    session: Mutex<SessionState>,
    screen: Arc<dyn ScreenSource>,
    analyzer: A,
    overlay: Arc<dyn OverlaySink>,
    cursor: Arc<dyn CursorSource>,
    loops: LoopConfig,
    cancel: CancellationToken,
}

/// Cheap to clone; all clones share one session.
pub struct Orchestrator<A: Analyzer> {
    inner: Arc<Inner<A>>,
}

impl<A: Analyzer> Clone for Orchestrator<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Analyzer> Orchestrator<A> {
    pub fn new(
        screen: Arc<dyn ScreenSource>,
        analyzer: A,
        overlay: Arc<dyn OverlaySink>,
        cursor: Arc<dyn CursorSource>,
        loops: LoopConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(SessionState::default()),
                screen,
                analyzer,
                overlay,
                cursor,
                loops,
                cancel: CancellationToken::new(),
            }),
        }
    }

    fn session(&self) -> MutexGuard<'_, SessionState> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.inner
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts the automatic trigger loop, the cursor loop and the AI status
    /// probe. Must be called from within a tokio runtime.
    pub fn start(&self) {
        log::info!(
            "[CYCLE] Automatic analysis every {}s",
            self.inner.loops.trigger_interval.as_secs()
        );
        self.inner
            .overlay
            .update_status("Starting AI-powered screenshot analysis...");

        tokio::spawn(self.clone().trigger_loop());
        tokio::spawn(self.clone().cursor_loop());
        tokio::spawn(self.clone().probe_access());
    }

    /// Cancels the loops and marks the overlay as closing. Does not wait for
    /// an in-flight request; its result is dropped when it arrives.
    pub fn stop(&self) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        log::info!("[CYCLE] Stopping");
        self.inner.cancel.cancel();
        self.inner.overlay.set_phase(OverlayPhase::Closing);
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session().snapshot()
    }

    pub fn mode(&self) -> AnalysisMode {
        self.session().mode.clone()
    }

    /// Advances General → Text → UI → Summary → General. From Custom the
    /// rotation restarts at General.
    pub fn cycle_mode(&self) -> AnalysisMode {
        let mode = {
            let mut session = self.session();
            session.mode = session.mode.next();
            session.mode.clone()
        };
        log::info!("[MODE] Analysis mode set to: {}", mode);
        self.inner.overlay.update_mode(&mode);
        self.inner
            .overlay
            .update_status(&format!("Analysis mode: {}", mode));
        mode
    }

    /// Switches to Custom mode with `prompt`. Blank prompts are rejected and
    /// leave the mode unchanged.
    pub fn set_custom_prompt(&self, prompt: &str) -> bool {
        if prompt.trim().is_empty() {
            log::info!("[MODE] Ignoring empty custom prompt");
            return false;
        }
        let mode = AnalysisMode::Custom(prompt.to_string());
        self.session().mode = mode.clone();
        log::info!("[MODE] Custom prompt set ({} chars)", prompt.len());
        self.inner.overlay.update_mode(&mode);
        self.inner
            .overlay
            .update_status(&format!("Analysis mode: {}", mode));
        true
    }

    /// Runs one capture+analyze cycle now, unless one is already in flight
    /// or the orchestrator is stopped. Returns whether a cycle was started.
    ///
    /// `mode_override` applies to this cycle only.
    pub fn trigger_analysis(&self, origin: TriggerOrigin, mode_override: Option<AnalysisMode>) -> bool {
        if self.is_stopped() {
            return false;
        }

        let (mode, cursor) = {
            let mut session = self.session();
            if session.in_flight {
                log::info!(
                    "[{}] Still processing previous capture, trigger ignored",
                    origin
                );
                return false;
            }
            session.in_flight = true;
            (
                mode_override.unwrap_or_else(|| session.mode.clone()),
                session.cursor,
            )
        };

        match cursor {
            Some((x, y)) => log::info!(
                "[{}] {} analysis at cursor position ({}, {})",
                origin, mode, x, y
            ),
            None => log::info!("[{}] {} analysis", origin, mode),
        }

        self.inner.overlay.set_phase(OverlayPhase::Analyzing);
        self.inner.overlay.update_status("AI analyzing screenshot...");

        tokio::spawn(self.clone().run_cycle(mode));
        true
    }

    async fn run_cycle(self, mode: AnalysisMode) {
        let start = std::time::Instant::now();
        let cancel = self.inner.cancel.clone();

        let outcome = tokio::select! {
            outcome = self.capture_and_analyze(&mode) => outcome,
            _ = cancel.cancelled() => {
                log::info!("[CYCLE] Abandoned in-flight analysis on shutdown");
                return;
            }
        };

        log::info!("[CYCLE] Finished in {}ms", start.elapsed().as_millis());
        self.finish_cycle(mode, outcome);
    }

    async fn capture_and_analyze(&self, mode: &AnalysisMode) -> Result<String, CycleError> {
        let screen = Arc::clone(&self.inner.screen);
        let capture_start = std::time::Instant::now();
        let image = tokio::task::spawn_blocking(move || screen.capture())
            .await
            .map_err(|e| CycleError::Worker(e.to_string()))??;
        log::info!(
            "[CAPTURE] Captured {}x{} in {}ms",
            image.width(),
            image.height(),
            capture_start.elapsed().as_millis()
        );

        let timeout = self.inner.loops.request_timeout;
        let text = tokio::time::timeout(timeout, self.inner.analyzer.analyze(&image, mode))
            .await
            .map_err(|_| AnalysisError::Timeout(timeout.as_secs()))??;
        Ok(text)
    }

    fn finish_cycle(&self, mode: AnalysisMode, outcome: Result<String, CycleError>) {
        if self.is_stopped() {
            log::info!("[CYCLE] Discarding result that arrived after shutdown");
            return;
        }

        let overlay = &self.inner.overlay;
        match outcome {
            Ok(text) => {
                let label = mode.label();
                let result = AnalysisResult::text(mode, text);
                self.session().last_result = Some(result.clone());
                overlay.update_result(&result);
                overlay.update_status(&format!("AI {} analysis complete", label));
            }
            Err(CycleError::Analysis(err)) => {
                log::error!("[CYCLE] AI analysis error: {}", err);
                let message = err.to_string();
                let result = AnalysisResult::error(mode, message.clone());
                self.session().last_result = Some(result.clone());
                overlay.update_result(&result);
                overlay.update_status(&format!("AI Error: {}", message));
            }
            Err(err) => {
                // Capture failures keep the previous result on screen.
                log::error!("[CYCLE] Capture error: {}", err);
                overlay.update_status(&format!("Error: {}", err));
            }
        }
        overlay.set_phase(OverlayPhase::Idle);

        // Cleared only after the Idle phase is out.
        self.session().in_flight = false;
    }

    async fn trigger_loop(self) {
        let period = self.inner.loops.trigger_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.trigger_analysis(TriggerOrigin::Automatic, None);
                }
                _ = self.inner.cancel.cancelled() => {
                    log::info!("[CYCLE] Trigger loop shutting down");
                    break;
                }
            }
        }
    }

    async fn cursor_loop(self) {
        let mut ticker = tokio::time::interval(self.inner.loops.cursor_poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some((x, y)) = self.inner.cursor.current_position() {
                        self.session().cursor = Some((x, y));
                        self.inner.overlay.update_position(x, y);
                    }
                }
                _ = self.inner.cancel.cancelled() => break,
            }
        }
    }

    async fn probe_access(self) {
        let probe = self.inner.analyzer.check_access();
        let outcome = tokio::select! {
            outcome = probe => outcome,
            _ = self.inner.cancel.cancelled() => return,
        };
        match outcome {
            Ok(model) => {
                log::info!("[LLM] API reachable, model {}", model);
                self.inner.overlay.update_ai_status(&model);
            }
            Err(e) => {
                log::warn!("[LLM] API status check failed: {}", e);
                self.inner.overlay.update_ai_status("Error");
            }
        }
    }
}
