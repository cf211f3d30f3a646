//! Debounced background rendering
//!
//! The UI thread never renders markdown itself. Edits are scheduled on the
//! [`RenderWorker`], which waits for a quiet period, hands the latest text to
//! a background thread and exposes the finished HTML through a non-blocking
//! [`RenderWorker::poll`].

use std::io;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::renderer::{MarkdownRenderer, RenderError};

/// A finished render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Submission number, increasing with every submitted text
    pub generation: u64,
    /// Rendered HTML or the failure
    pub result: Result<String, RenderError>,
}

#[derive(Debug)]
struct RenderJob {
    generation: u64,
    markdown: String,
}

/// Owns the render thread and the debounce state.
#[derive(Debug)]
pub struct RenderWorker {
    jobs: Option<Sender<RenderJob>>,
    results: Receiver<RenderOutput>,
    handle: Option<JoinHandle<()>>,
    debounce: Duration,
    /// Latest unsubmitted text and the time it was last edited
    pending: Option<(String, Instant)>,
    next_generation: u64,
    delivered: u64,
}

impl RenderWorker {
    /// Start the render thread.
    ///
    /// `on_ready` runs on the render thread after each finished render; the
    /// host uses it to request a repaint.
    pub fn spawn(
        renderer: Arc<MarkdownRenderer>,
        debounce: Duration,
        on_ready: impl Fn() + Send + 'static,
    ) -> io::Result<Self> {
        let (job_tx, job_rx) = channel::<RenderJob>();
        let (result_tx, result_rx) = channel();

        let handle = thread::Builder::new()
            .name("markdown-render".to_string())
            .spawn(move || Self::run(renderer, job_rx, result_tx, on_ready))?;

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
            debounce,
            pending: None,
            next_generation: 1,
            delivered: 0,
        })
    }

    fn run(
        renderer: Arc<MarkdownRenderer>,
        jobs: Receiver<RenderJob>,
        results: Sender<RenderOutput>,
        on_ready: impl Fn(),
    ) {
        while let Ok(mut job) = jobs.recv() {
            // Only the newest queued text is worth rendering
            while let Ok(newer) = jobs.try_recv() {
                job = newer;
            }

            let result = renderer.render(&job.markdown);
            if let Err(e) = &result {
                warn!("Render #{} failed: {}", job.generation, e);
            }

            let output = RenderOutput {
                generation: job.generation,
                result,
            };
            if results.send(output).is_err() {
                break;
            }
            on_ready();
        }
        debug!("Render thread exiting");
    }

    /// Record an edit. Replaces any text still waiting for its quiet period.
    pub fn schedule(&mut self, markdown: impl Into<String>, now: Instant) {
        self.pending = Some((markdown.into(), now));
    }

    /// Submit the pending text once it has been quiet for the debounce
    /// duration.
    ///
    /// Returns how long until the pending text becomes due, or `None` when
    /// nothing is waiting.
    pub fn pump(&mut self, now: Instant) -> Option<Duration> {
        let (_, edited_at) = self.pending.as_ref()?;
        let quiet = now.saturating_duration_since(*edited_at);
        if quiet < self.debounce {
            return Some(self.debounce - quiet);
        }

        if let Some((markdown, _)) = self.pending.take() {
            self.submit(markdown);
        }
        None
    }

    /// Submit text immediately, discarding any pending edit.
    pub fn render_now(&mut self, markdown: impl Into<String>) {
        self.pending = None;
        self.submit(markdown.into());
    }

    /// Whether an edit is waiting for its quiet period.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget the pending edit and discard every render already submitted.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.delivered = self.next_generation - 1;
    }

    fn submit(&mut self, markdown: String) {
        let generation = self.next_generation;
        self.next_generation += 1;

        let Some(jobs) = &self.jobs else {
            return;
        };
        debug!("Submitting render #{} ({} bytes)", generation, markdown.len());
        if jobs.send(RenderJob { generation, markdown }).is_err() {
            warn!("Render thread is gone; dropping render #{}", generation);
        }
    }

    /// Collect finished renders without blocking.
    ///
    /// Returns the newest result, or `None` if nothing newer than the last
    /// delivered result has arrived.
    pub fn poll(&mut self) -> Option<RenderOutput> {
        let mut newest: Option<RenderOutput> = None;
        while let Ok(output) = self.results.try_recv() {
            if output.generation <= self.delivered {
                debug!("Discarding stale render #{}", output.generation);
                continue;
            }
            self.delivered = output.generation;
            newest = Some(output);
        }
        newest
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        // Closing the job channel ends the render loop
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Render thread panicked");
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
