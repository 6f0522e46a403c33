//! Boundary to the external tutoring collaborator.
//!
//! The core never talks to an LLM directly; it calls a [`TutorService`]
//! and treats every failure as recoverable. A failed or rate-limited
//! analysis call degrades to a subject-aware fallback phrase so the user
//! always gets some hint text.

use crate::stroke::{Stroke, ToolKind};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use thiserror::Error;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
use std::time::Duration;

/// Tutor boundary errors. All of these are caught at the call site and
/// replaced with a fallback phrase before reaching the canvas.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Rate limit exceeded, retry in {0:?}")]
    RateLimited(Duration),
    #[error("Tutor service unavailable: {0}")]
    Unavailable(String),
    #[error("Tutor returned an empty response")]
    EmptyResponse,
}

pub type TutorResult<T> = Result<T, TutorError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Tutor,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Async contract with the tutoring backend.
///
/// On native platforms implementations must be Send + Sync; on WASM the
/// bounds are relaxed since it is single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait TutorService: Send + Sync {
    /// Short conversational reply to a chat history.
    fn chat(&self, history: &[ChatMessage], subject: &str) -> BoxFuture<'_, TutorResult<String>>;

    /// Hint derived from a textual census of the board's strokes.
    fn analyze_board(
        &self,
        summary: &str,
        subject: &str,
        session_title: &str,
    ) -> BoxFuture<'_, TutorResult<String>>;

    /// Hint derived from a rasterized board snapshot (PNG data URL).
    fn analyze_board_with_image(
        &self,
        image_data_url: &str,
        subject: &str,
    ) -> BoxFuture<'_, TutorResult<String>>;
}

#[cfg(target_arch = "wasm32")]
pub trait TutorService {
    fn chat(&self, history: &[ChatMessage], subject: &str) -> BoxFuture<'_, TutorResult<String>>;

    fn analyze_board(
        &self,
        summary: &str,
        subject: &str,
        session_title: &str,
    ) -> BoxFuture<'_, TutorResult<String>>;

    fn analyze_board_with_image(
        &self,
        image_data_url: &str,
        subject: &str,
    ) -> BoxFuture<'_, TutorResult<String>>;
}

/// Textual census of the board, used when image analysis is unavailable.
/// Per-tool counts plus the content of every text and hint stroke, under
/// a subject header, so a text-only tutor still sees what was written.
pub fn strokes_summary(strokes: &[Stroke], subject: &str) -> String {
    let mut out = format!("Subject: {subject}\nBoard content: ");
    if strokes.is_empty() {
        out.push_str("an empty board");
        return out;
    }
    let mut counts: [usize; 7] = [0; 7];
    for stroke in strokes {
        let slot = match stroke.tool() {
            ToolKind::Pen => 0,
            ToolKind::Eraser => 1,
            ToolKind::Rectangle => 2,
            ToolKind::Circle => 3,
            ToolKind::Text => 4,
            ToolKind::AiText => 5,
            ToolKind::Image => 6,
            ToolKind::Move => continue,
        };
        counts[slot] += 1;
    }
    let labels = [
        ("pen stroke", "pen strokes"),
        ("eraser pass", "eraser passes"),
        ("rectangle", "rectangles"),
        ("circle", "circles"),
        ("text label", "text labels"),
        ("hint", "hints"),
        ("image", "images"),
    ];
    let parts: Vec<String> = counts
        .iter()
        .zip(labels)
        .filter(|&(&n, _)| n > 0)
        .map(|(&n, (one, many))| format!("{} {}", n, if n == 1 { one } else { many }))
        .collect();
    out.push_str(&parts.join(", "));
    for stroke in strokes {
        match stroke {
            Stroke::Text(text) => {
                out.push_str(&format!("\nText: \"{}\"", text.text));
            }
            Stroke::AiText(ai) => {
                out.push_str(&format!("\nHint: \"{}\"", ai.full_text));
            }
            _ => {}
        }
    }
    out
}

/// Static hint used whenever the tutor call fails. Picks a phrase from
/// what is actually on the board before falling through to the subject.
pub fn fallback_hint(strokes: &[Stroke], subject: &str) -> &'static str {
    let has_text = strokes
        .iter()
        .any(|s| matches!(s.tool(), ToolKind::Text | ToolKind::AiText));
    let has_shapes = strokes
        .iter()
        .any(|s| matches!(s.tool(), ToolKind::Rectangle | ToolKind::Circle));
    let has_handwriting = strokes.iter().any(|s| s.tool() == ToolKind::Pen);
    if strokes.is_empty() {
        return "Ready to start? Begin!";
    }
    if strokes.len() < 3 {
        return "Good start! Keep going.";
    }
    if has_text && has_shapes {
        return "Great organization!";
    }
    if has_handwriting && !has_text {
        return "Nice work! Add labels?";
    }
    let lower = subject.to_ascii_lowercase();
    if lower.contains("math") {
        if has_shapes {
            "Good diagrams! Check math."
        } else {
            "Step by step works!"
        }
    } else if lower.contains("science") || lower.contains("physics") || lower.contains("chem") {
        "Good observations!"
    } else if lower.contains("english") || lower.contains("writing") || lower.contains("language") {
        "Clear thinking! Expand more."
    } else {
        "Making progress! Continue."
    }
}

/// Fallback used for chat replies rather than board hints.
pub fn fallback_chat(subject: &str) -> String {
    format!(
        "I couldn't reach the tutor just now. Keep working on your {} and try again in a moment.",
        if subject.is_empty() { "board" } else { subject }
    )
}

const RATE_LIMIT_CALLS: usize = 10;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Client-side sliding-window rate limiter for tutor calls.
#[derive(Debug, Default)]
pub struct RateLimiter {
    calls: Vec<Instant>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call if under the limit, otherwise report how long until
    /// the oldest call ages out of the window.
    pub fn check(&mut self) -> TutorResult<()> {
        let now = Instant::now();
        self.calls
            .retain(|t| now.duration_since(*t) < RATE_LIMIT_WINDOW);
        if self.calls.len() >= RATE_LIMIT_CALLS {
            let oldest = self.calls[0];
            let wait = RATE_LIMIT_WINDOW.saturating_sub(now.duration_since(oldest));
            return Err(TutorError::RateLimited(wait));
        }
        self.calls.push(now);
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        RATE_LIMIT_CALLS.saturating_sub(self.calls.len())
    }
}

/// Tutor wrapper that applies the [`RateLimiter`] budget to every call
/// before delegating to the inner service.
#[derive(Debug, Default)]
pub struct RateLimited<T> {
    inner: T,
    limiter: Mutex<RateLimiter>,
}

impl<T> RateLimited<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            limiter: Mutex::new(RateLimiter::new()),
        }
    }

    fn admit(&self) -> TutorResult<()> {
        let mut limiter = match self.limiter.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        limiter.check()
    }
}

impl<T: TutorService> TutorService for RateLimited<T> {
    fn chat(&self, history: &[ChatMessage], subject: &str) -> BoxFuture<'_, TutorResult<String>> {
        if let Err(err) = self.admit() {
            return Box::pin(async move { Err(err) });
        }
        self.inner.chat(history, subject)
    }

    fn analyze_board(
        &self,
        summary: &str,
        subject: &str,
        session_title: &str,
    ) -> BoxFuture<'_, TutorResult<String>> {
        if let Err(err) = self.admit() {
            return Box::pin(async move { Err(err) });
        }
        self.inner.analyze_board(summary, subject, session_title)
    }

    fn analyze_board_with_image(
        &self,
        image_data_url: &str,
        subject: &str,
    ) -> BoxFuture<'_, TutorResult<String>> {
        if let Err(err) = self.admit() {
            return Box::pin(async move { Err(err) });
        }
        self.inner.analyze_board_with_image(image_data_url, subject)
    }
}

/// Canned tutor for offline use and tests. Always succeeds.
#[derive(Debug, Clone)]
pub struct StaticTutor {
    pub hint: String,
}

impl StaticTutor {
    pub fn new(hint: impl Into<String>) -> Self {
        Self { hint: hint.into() }
    }
}

impl Default for StaticTutor {
    fn default() -> Self {
        Self::new("Check your steps so far.")
    }
}

impl TutorService for StaticTutor {
    fn chat(&self, _history: &[ChatMessage], _subject: &str) -> BoxFuture<'_, TutorResult<String>> {
        let hint = self.hint.clone();
        Box::pin(async move { Ok(hint) })
    }

    fn analyze_board(
        &self,
        _summary: &str,
        _subject: &str,
        _session_title: &str,
    ) -> BoxFuture<'_, TutorResult<String>> {
        let hint = self.hint.clone();
        Box::pin(async move { Ok(hint) })
    }

    fn analyze_board_with_image(
        &self,
        _image_data_url: &str,
        _subject: &str,
    ) -> BoxFuture<'_, TutorResult<String>> {
        let hint = self.hint.clone();
        Box::pin(async move { Ok(hint) })
    }
}
