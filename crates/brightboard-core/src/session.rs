//! Live board session: wires the stroke store, tool gestures, assistance
//! timers, analysis tokens, and the page set into one event-driven unit.
//!
//! The host owns the event loop. It forwards pointer events, advances the
//! virtual clock, fulfils [`SessionAction`]s (text prompts, analysis
//! calls), and redraws after anything reports a change.

use crate::assist::{
    AssistPhase, AssistancePoint, SPARKLE_ARM_DELAY_MS, TYPE_FIRST_DELAY_MS, TYPE_TICK_MS,
};
use crate::clock::{Millis, TimerEvent, TimerId, TimerQueue};
use crate::input::{Cursor, PointerInput};
use crate::page::{PageError, PageId, PageManager};
use crate::store::StrokeStore;
use crate::stroke::{
    AiText, AssistPointId, Image, ImageFormat, Stroke, StrokeId, ToolKind, MAX_INSERT_WIDTH_RATIO,
};
use crate::tools::{GestureEffect, ToolManager};
use crate::tutor::{fallback_hint, strokes_summary, TutorError};
use crate::hittest;
use kurbo::Point;
use log::{debug, warn};

/// Board size threshold above which image analysis is preferred over the
/// textual stroke summary.
const IMAGE_ANALYSIS_MIN_STROKES: usize = 3;

/// Something the host must do on the session's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Collect a text value from the user, then call
    /// [`BoardSession::commit_text`] with this anchor.
    PromptText(Point),
    /// Ask the tutor collaborator to analyze the board, then call
    /// [`BoardSession::apply_analysis`] with the request's token.
    RequestAnalysis(AnalysisRequest),
}

/// What to send the tutor for a board analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    /// Rasterized board snapshot as a PNG data URL.
    BoardImage(String),
    /// Textual stroke census, used when no snapshot is available or the
    /// board is nearly empty.
    StrokeSummary(String),
}

/// One outstanding analysis call. The token is compared on completion so
/// a response for a superseded request is dropped instead of applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub token: u64,
    pub point: AssistPointId,
    pub payload: AnalysisPayload,
    pub subject: String,
    pub session_title: String,
}

/// State changes surfaced by [`BoardSession::advance`] so the host knows
/// what to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SparkleShown(AssistPointId),
    TypingTick(StrokeId),
    TypingDone(StrokeId),
}

/// A sparkle that has been scheduled but whose quiet period has not
/// elapsed yet.
#[derive(Debug, Clone)]
struct PendingSparkle {
    timer: TimerId,
    point: AssistancePoint,
}

/// The live whiteboard session for one user.
#[derive(Debug)]
pub struct BoardSession {
    pub store: StrokeStore,
    pub tools: ToolManager,
    pages: PageManager,
    timers: TimerQueue,
    /// At most one entry at a time; kept as a list because page snapshots
    /// store it verbatim.
    assist_points: Vec<AssistancePoint>,
    pending_sparkle: Option<PendingSparkle>,
    next_token: u64,
    /// Token of the newest analysis request; older responses are stale.
    latest_token: Option<u64>,
    pub subject: String,
    pub session_title: String,
}

impl BoardSession {
    pub fn new(subject: impl Into<String>, session_title: impl Into<String>) -> Self {
        Self {
            store: StrokeStore::new(),
            tools: ToolManager::new(),
            pages: PageManager::new(0),
            timers: TimerQueue::new(),
            assist_points: Vec::new(),
            pending_sparkle: None,
            next_token: 0,
            latest_token: None,
            subject: subject.into(),
            session_title: session_title.into(),
        }
    }

    pub fn now(&self) -> Millis {
        self.timers.now()
    }

    pub fn assist_points(&self) -> &[AssistancePoint] {
        &self.assist_points
    }

    pub fn pages(&self) -> &PageManager {
        &self.pages
    }

    // ---- pointer plumbing ----

    pub fn pointer_down(&mut self, input: PointerInput) -> Option<SessionAction> {
        match self.tools.begin(&self.store, input) {
            GestureEffect::PromptText(anchor) => Some(SessionAction::PromptText(anchor)),
            GestureEffect::None => None,
        }
    }

    pub fn pointer_move(&mut self, input: PointerInput) {
        self.tools.update(&mut self.store, input);
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> Option<StrokeId> {
        let stroke = self.tools.end(input)?;
        Some(self.add_stroke(stroke))
    }

    /// Hover feedback for the move tool.
    pub fn cursor_at(&self, point: Point) -> Cursor {
        if self.tools.current_tool != ToolKind::Move {
            return Cursor::Default;
        }
        if self.tools.is_active() {
            return Cursor::Grabbing;
        }
        hittest::hover_cursor(self.store.strokes(), self.tools.selected, point)
    }

    /// Fulfil a [`SessionAction::PromptText`]. Empty input aborts with no
    /// stroke created.
    pub fn commit_text(&mut self, anchor: Point, text: &str) -> Option<StrokeId> {
        let stroke = self.tools.make_text(anchor, text)?;
        Some(self.add_stroke(stroke))
    }

    // ---- stroke insertion and assistance scheduling ----

    /// Append a stroke. Any existing sparkle vanishes the moment new
    /// content lands, whatever tool drew it; a qualifying pen stroke then
    /// arms a fresh sparkle after the quiet period.
    pub fn add_stroke(&mut self, stroke: Stroke) -> StrokeId {
        self.clear_assistance();
        let qualifying = match &stroke {
            Stroke::Pen(pen) if pen.is_handwriting() => pen.last_point(),
            _ => None,
        };
        let id = self.store.add(stroke);
        if let Some(last_point) = qualifying {
            let point = AssistancePoint::for_stroke(id, last_point);
            debug!("arming sparkle {} for stroke {}", point.id, id);
            let timer = self
                .timers
                .schedule(SPARKLE_ARM_DELAY_MS, TimerEvent::ArmSparkle(point.id));
            self.pending_sparkle = Some(PendingSparkle { timer, point });
        }
        id
    }

    /// Drop every assistance point, pending sparkle, typing animation,
    /// and in-flight analysis.
    fn clear_assistance(&mut self) {
        if let Some(pending) = self.pending_sparkle.take() {
            self.timers.cancel(pending.timer);
        }
        self.assist_points.clear();
        self.timers.cancel_all();
        self.latest_token = None;
    }

    // ---- clock ----

    /// Advance the virtual clock, firing due timers. Runs in steps so a
    /// timer scheduled by an earlier firing (the typing tick chain) still
    /// fires within the same call if it comes due inside `delta`.
    pub fn advance(&mut self, delta: Millis) -> Vec<SessionEvent> {
        let target = self.timers.now() + delta;
        let mut events = Vec::new();
        while let Some(due) = self.timers.next_due().filter(|&d| d <= target) {
            let step = due - self.timers.now();
            for fired in self.timers.advance(step) {
                self.handle_timer(fired, &mut events);
            }
        }
        let rest = target - self.timers.now();
        if rest > 0 {
            self.timers.advance(rest);
        }
        events
    }

    fn handle_timer(&mut self, fired: TimerEvent, events: &mut Vec<SessionEvent>) {
        match fired {
            TimerEvent::ArmSparkle(point_id) => {
                let Some(pending) = self.pending_sparkle.take() else {
                    return;
                };
                if pending.point.id != point_id {
                    return;
                }
                self.assist_points.clear();
                self.assist_points.push(pending.point);
                events.push(SessionEvent::SparkleShown(point_id));
            }
            TimerEvent::TypeTick(stroke_id) => {
                if let Some(event) = self.type_tick(stroke_id) {
                    events.push(event);
                }
            }
        }
    }

    fn type_tick(&mut self, stroke_id: StrokeId) -> Option<SessionEvent> {
        let stroke = self.store.get_mut(stroke_id)?;
        let ai_text = stroke.as_ai_text_mut()?;
        let more = ai_text.reveal_next();
        let revealed = ai_text.text.clone();
        let point_id = ai_text.assist_point;
        if !more {
            ai_text.finish_typing();
        }
        if let Some(point) = self
            .assist_points
            .iter_mut()
            .find(|p| Some(p.id) == point_id)
        {
            point.current_text = revealed;
            if !more {
                point.phase = AssistPhase::Settled;
            }
        }
        if more {
            self.timers
                .schedule(TYPE_TICK_MS, TimerEvent::TypeTick(stroke_id));
            Some(SessionEvent::TypingTick(stroke_id))
        } else {
            Some(SessionEvent::TypingDone(stroke_id))
        }
    }

    // ---- assistance flow ----

    /// Click on a sparkle: hide it, mark loading, and hand the host an
    /// analysis request. `board_image` is a rasterized snapshot if the
    /// host has a canvas to rasterize; it is only used when the board has
    /// enough strokes to be worth looking at.
    pub fn begin_assist(
        &mut self,
        point_id: AssistPointId,
        board_image: Option<String>,
    ) -> Option<SessionAction> {
        let stroke_count = self.store.len();
        let point = self
            .assist_points
            .iter_mut()
            .find(|p| p.id == point_id && p.phase == AssistPhase::Visible)?;
        point.phase = AssistPhase::Loading;
        let payload = match board_image {
            Some(data_url) if stroke_count > IMAGE_ANALYSIS_MIN_STROKES => {
                AnalysisPayload::BoardImage(data_url)
            }
            _ => AnalysisPayload::StrokeSummary(strokes_summary(
                self.store.strokes(),
                &self.subject,
            )),
        };
        let token = self.next_token;
        self.next_token += 1;
        self.latest_token = Some(token);
        Some(SessionAction::RequestAnalysis(AnalysisRequest {
            token,
            point: point_id,
            payload,
            subject: self.subject.clone(),
            session_title: self.session_title.clone(),
        }))
    }

    /// Apply an analysis outcome. A failed call degrades to a fallback
    /// hint; a stale token (superseded request) is dropped entirely.
    pub fn apply_analysis(
        &mut self,
        token: u64,
        point_id: AssistPointId,
        outcome: Result<String, TutorError>,
    ) -> Option<StrokeId> {
        if self.latest_token != Some(token) {
            debug!("dropping stale analysis response (token {})", token);
            return None;
        }
        self.latest_token = None;
        let point = self
            .assist_points
            .iter_mut()
            .find(|p| p.id == point_id && p.phase == AssistPhase::Loading)?;
        let text = match outcome {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) | Err(_) => fallback_hint(self.store.strokes(), &self.subject).to_string(),
        };
        point.phase = AssistPhase::Typing;
        point.current_text.clear();
        let anchor = point.text_anchor();
        let stroke = Stroke::AiText(AiText::new(anchor, text, point_id));
        // Inserted directly so the new hint does not clear its own
        // assistance point.
        let stroke_id = self.store.add(stroke);
        self.timers
            .schedule(TYPE_FIRST_DELAY_MS, TimerEvent::TypeTick(stroke_id));
        Some(stroke_id)
    }

    /// Discard a generated hint: the ai-text stroke is removed (undoable)
    /// and the sparkle reappears ready for a fresh request.
    pub fn remove_hint(&mut self, point_id: AssistPointId) -> bool {
        let hint = self
            .store
            .strokes()
            .iter()
            .find(|s| s.as_ai_text().is_some_and(|t| t.assist_point == Some(point_id)))
            .map(|s| s.id());
        let Some(stroke_id) = hint else {
            return false;
        };
        self.timers.cancel_typing(stroke_id);
        self.store.remove(stroke_id);
        if let Some(point) = self.assist_points.iter_mut().find(|p| p.id == point_id) {
            point.reset();
        }
        true
    }

    // ---- undo / clear ----

    /// Undo the last structural mutation. Also tears down all assistance
    /// state so nothing references rolled-back strokes.
    pub fn undo(&mut self) -> bool {
        self.clear_assistance();
        self.tools.selected = None;
        self.store.undo()
    }

    /// Empty the board (undoable), with the same assistance teardown.
    pub fn clear(&mut self) {
        self.clear_assistance();
        self.tools.selected = None;
        self.store.clear();
    }

    // ---- image insertion ----

    /// Insert a pasted or picked image centered on the canvas, scaled to
    /// at most 40% of the canvas width.
    pub fn insert_image(
        &mut self,
        data: &[u8],
        source_width: u32,
        source_height: u32,
        format: ImageFormat,
        canvas_width: f64,
        canvas_height: f64,
    ) -> StrokeId {
        let image = Image::new(Point::ZERO, data, source_width, source_height, format)
            .fit_width(canvas_width * MAX_INSERT_WIDTH_RATIO);
        let position = Point::new(
            (canvas_width - image.width) / 2.0,
            (canvas_height - image.height) / 2.0,
        );
        let mut image = image;
        image.position = position;
        self.add_stroke(Stroke::Image(image))
    }

    // ---- pages ----

    /// Snapshot the live state into the current page record. Any running
    /// typing animation completes instantly so the snapshot never holds a
    /// half-revealed hint.
    fn save_current_page(&mut self) {
        let typing: Vec<StrokeId> = self
            .store
            .strokes()
            .iter()
            .filter(|s| s.as_ai_text().is_some_and(|t| t.is_typing))
            .map(|s| s.id())
            .collect();
        for id in typing {
            if let Some(ai_text) = self.store.get_mut(id).and_then(|s| s.as_ai_text_mut()) {
                ai_text.finish_typing();
                let full = ai_text.text.clone();
                let point_id = ai_text.assist_point;
                if let Some(point) = self
                    .assist_points
                    .iter_mut()
                    .find(|p| Some(p.id) == point_id)
                {
                    point.current_text = full;
                    point.phase = AssistPhase::Settled;
                }
            }
        }
        if let Some(pending) = self.pending_sparkle.take() {
            self.timers.cancel(pending.timer);
        }
        self.timers.cancel_all();
        self.latest_token = None;
        let current = self.pages.current_id();
        let now = self.timers.now();
        let strokes = self.store.snapshot();
        let points = self.assist_points.clone();
        // The current page always exists
        let _ = self.pages.save_into(current, strokes, points, now);
    }

    fn load_page(&mut self, id: PageId) {
        let (strokes, points) = {
            let page = self.pages.get(id).expect("page exists after set_current");
            (page.strokes.clone(), page.assistance_points.clone())
        };
        self.store.load(strokes);
        self.assist_points = points;
        self.tools.selected = None;
        self.tools.cancel();
    }

    /// Save-then-load page switch.
    pub fn switch_page(&mut self, id: PageId) -> Result<(), PageError> {
        if id == self.pages.current_id() {
            return Ok(());
        }
        self.save_current_page();
        self.pages.set_current(id)?;
        self.load_page(id);
        Ok(())
    }

    pub fn add_page(&mut self) -> PageId {
        self.save_current_page();
        let now = self.timers.now();
        let id = self.pages.add_page(now);
        self.load_page(id);
        id
    }

    pub fn delete_page(&mut self, id: PageId) -> Result<(), PageError> {
        let was_current = id == self.pages.current_id();
        match self.pages.delete_page(id) {
            Ok(()) => {
                if was_current {
                    let next = self.pages.current_id();
                    self.load_page(next);
                }
                Ok(())
            }
            Err(err) => {
                warn!("page delete rejected: {err}");
                Err(err)
            }
        }
    }

    pub fn rename_page(&mut self, id: PageId, name: String) -> Result<(), PageError> {
        let now = self.timers.now();
        self.pages.rename_page(id, name, now)
    }

    pub fn duplicate_page(&mut self, id: PageId) -> Result<PageId, PageError> {
        self.save_current_page();
        let now = self.timers.now();
        let new_id = self.pages.duplicate_page(id, now)?;
        self.load_page(new_id);
        Ok(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::stroke::Pen;
    use crate::tools::ToolStyle;

    fn session() -> BoardSession {
        let _ = env_logger::builder().is_test(true).try_init();
        BoardSession::new("Math", "Fractions practice")
    }

    fn handwriting(end: Point) -> Stroke {
        let points: Vec<Point> = (0..10)
            .map(|i| Point::new(end.x - (9 - i) as f64, end.y))
            .collect();
        Stroke::Pen(Pen::from_points(points, Rgba::black(), 4.0))
    }

    fn short_pen() -> Stroke {
        Stroke::Pen(Pen::from_points(
            vec![Point::ZERO, Point::new(1.0, 1.0)],
            Rgba::black(),
            4.0,
        ))
    }

    #[test]
    fn test_sparkle_appears_after_quiet_period() {
        let mut s = session();
        s.add_stroke(handwriting(Point::new(100.0, 100.0)));
        assert!(s.assist_points().is_empty());
        assert!(s.advance(2999).is_empty());
        let events = s.advance(1);
        assert_eq!(events.len(), 1);
        assert_eq!(s.assist_points().len(), 1);
        assert_eq!(s.assist_points()[0].position, Point::new(120.0, 90.0));
    }

    #[test]
    fn test_short_stroke_never_arms() {
        let mut s = session();
        s.add_stroke(short_pen());
        assert!(s.advance(5000).is_empty());
        assert!(s.assist_points().is_empty());
    }

    #[test]
    fn test_newer_stroke_supersedes_pending_sparkle() {
        let mut s = session();
        s.add_stroke(handwriting(Point::new(50.0, 50.0)));
        s.advance(1000);
        let second = handwriting(Point::new(200.0, 200.0));
        let second_id = second.id();
        s.add_stroke(second);
        s.advance(3000);
        assert_eq!(s.assist_points().len(), 1);
        assert_eq!(s.assist_points()[0].stroke, second_id);
    }

    #[test]
    fn test_any_new_stroke_clears_visible_sparkle() {
        let mut s = session();
        s.add_stroke(handwriting(Point::new(50.0, 50.0)));
        s.advance(3000);
        assert_eq!(s.assist_points().len(), 1);
        s.add_stroke(short_pen());
        assert!(s.assist_points().is_empty());
    }

    fn arm_and_invoke(s: &mut BoardSession) -> AnalysisRequest {
        s.add_stroke(handwriting(Point::new(100.0, 100.0)));
        s.advance(3000);
        let point_id = s.assist_points()[0].id;
        match s.begin_assist(point_id, None) {
            Some(SessionAction::RequestAnalysis(req)) => req,
            other => panic!("expected analysis request, got {other:?}"),
        }
    }

    #[test]
    fn test_full_assist_flow() {
        let mut s = session();
        let req = arm_and_invoke(&mut s);
        assert_eq!(s.assist_points()[0].phase, AssistPhase::Loading);
        assert!(!s.assist_points()[0].sparkle_visible());
        let stroke_id = s
            .apply_analysis(req.token, req.point, Ok("Check your steps".to_string()))
            .unwrap();
        // First character after 300ms, one per 100ms after
        s.advance(300);
        let text_after_first = s
            .store
            .get(stroke_id)
            .and_then(|st| st.as_ai_text())
            .unwrap()
            .text
            .clone();
        assert_eq!(text_after_first, "C");
        let remaining = "Check your steps".len() as u64 - 1;
        let events = s.advance(remaining * 100);
        assert!(events.contains(&SessionEvent::TypingDone(stroke_id)));
        let ai = s.store.get(stroke_id).and_then(|st| st.as_ai_text()).unwrap();
        assert_eq!(ai.text, "Check your steps");
        assert!(!ai.is_typing);
        assert_eq!(s.assist_points()[0].phase, AssistPhase::Settled);
    }

    #[test]
    fn test_double_invoke_blocked() {
        let mut s = session();
        let req = arm_and_invoke(&mut s);
        assert!(s.begin_assist(req.point, None).is_none());
    }

    #[test]
    fn test_failure_falls_back_to_static_hint() {
        let mut s = session();
        let req = arm_and_invoke(&mut s);
        let expected = fallback_hint(s.store.strokes(), "Math");
        let stroke_id = s
            .apply_analysis(
                req.token,
                req.point,
                Err(TutorError::Unavailable("down".into())),
            )
            .unwrap();
        let ai = s.store.get(stroke_id).and_then(|st| st.as_ai_text()).unwrap();
        assert_eq!(ai.full_text, expected);
        assert!(!ai.full_text.is_empty());
    }

    #[test]
    fn test_fallback_reflects_board_content() {
        let mut s = session();
        for _ in 0..3 {
            s.add_stroke(short_pen());
        }
        let req = arm_and_invoke(&mut s);
        let stroke_id = s
            .apply_analysis(req.token, req.point, Ok(String::new()))
            .unwrap();
        let ai = s.store.get(stroke_id).and_then(|st| st.as_ai_text()).unwrap();
        // Four unlabeled pen strokes on the board at apply time
        assert_eq!(ai.full_text, "Nice work! Add labels?");
    }

    #[test]
    fn test_summary_carries_written_text() {
        let mut s = session();
        s.commit_text(Point::new(10.0, 10.0), "y = mx + b");
        let req = arm_and_invoke(&mut s);
        let AnalysisPayload::StrokeSummary(summary) = &req.payload else {
            panic!("sparse board should use the stroke summary");
        };
        assert!(summary.contains("Text: \"y = mx + b\""));
        assert!(summary.starts_with("Subject: Math\n"));
    }

    #[test]
    fn test_stale_response_dropped() {
        let mut s = session();
        let first = arm_and_invoke(&mut s);
        // New handwriting supersedes the in-flight request
        s.add_stroke(handwriting(Point::new(300.0, 300.0)));
        assert!(s
            .apply_analysis(first.token, first.point, Ok("late".to_string()))
            .is_none());
        assert!(!s.store.strokes().iter().any(|st| st.as_ai_text().is_some()));
    }

    #[test]
    fn test_summary_payload_for_sparse_board() {
        let mut s = session();
        s.add_stroke(handwriting(Point::new(10.0, 10.0)));
        s.advance(3000);
        let point_id = s.assist_points()[0].id;
        let action = s.begin_assist(point_id, Some("data:image/png;base64,x".into()));
        match action {
            Some(SessionAction::RequestAnalysis(req)) => {
                assert!(matches!(req.payload, AnalysisPayload::StrokeSummary(_)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_image_payload_for_busy_board() {
        let mut s = session();
        for _ in 0..4 {
            s.add_stroke(short_pen());
        }
        s.add_stroke(handwriting(Point::new(10.0, 10.0)));
        s.advance(3000);
        let point_id = s.assist_points()[0].id;
        match s.begin_assist(point_id, Some("data:image/png;base64,x".into())) {
            Some(SessionAction::RequestAnalysis(req)) => {
                assert!(matches!(req.payload, AnalysisPayload::BoardImage(_)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_remove_hint_resets_sparkle() {
        let mut s = session();
        let req = arm_and_invoke(&mut s);
        let stroke_id = s
            .apply_analysis(req.token, req.point, Ok("hi".to_string()))
            .unwrap();
        s.advance(300 + 200);
        assert!(s.remove_hint(req.point));
        assert!(s.store.get(stroke_id).is_none());
        assert_eq!(s.assist_points()[0].phase, AssistPhase::Visible);
        assert!(s.assist_points()[0].current_text.is_empty());
        // Removal is undoable
        assert!(s.undo());
    }

    #[test]
    fn test_undo_clears_assistance() {
        let mut s = session();
        s.add_stroke(handwriting(Point::new(10.0, 10.0)));
        s.advance(3000);
        assert_eq!(s.assist_points().len(), 1);
        assert!(s.undo());
        assert!(s.assist_points().is_empty());
        assert!(s.store.is_empty());
        // The pending timer state is also gone
        assert!(s.advance(5000).is_empty());
    }

    #[test]
    fn test_page_isolation() {
        let mut s = session();
        s.add_stroke(short_pen());
        s.add_stroke(short_pen());
        let first = s.pages().current_id();
        let second = s.add_page();
        assert!(s.store.is_empty());
        s.add_stroke(short_pen());
        s.switch_page(first).unwrap();
        assert_eq!(s.store.len(), 2);
        s.switch_page(second).unwrap();
        assert_eq!(s.store.len(), 1);
    }

    #[test]
    fn test_page_switch_finishes_typing() {
        let mut s = session();
        let req = arm_and_invoke(&mut s);
        let stroke_id = s
            .apply_analysis(req.token, req.point, Ok("Check again".to_string()))
            .unwrap();
        s.advance(300 + 100);
        let origin = s.pages().current_id();
        s.add_page();
        s.switch_page(origin).unwrap();
        let ai = s.store.get(stroke_id).and_then(|st| st.as_ai_text()).unwrap();
        assert_eq!(ai.text, "Check again");
        assert!(!ai.is_typing);
    }

    #[test]
    fn test_delete_last_page_rejected() {
        let mut s = session();
        let only = s.pages().current_id();
        assert_eq!(s.delete_page(only), Err(PageError::LastPage));
        assert_eq!(s.pages().pages().len(), 1);
    }

    #[test]
    fn test_insert_image_centered_and_scaled() {
        let mut s = session();
        let id = s.insert_image(&[0u8; 16], 1000, 500, ImageFormat::Png, 800.0, 600.0);
        let image = s.store.get(id).unwrap().as_image().unwrap();
        // 40% of 800 = 320 wide, aspect preserved
        assert_eq!(image.width, 320.0);
        assert_eq!(image.height, 160.0);
        assert_eq!(image.position, Point::new(240.0, 220.0));
    }

    fn block_on_ready<T>(mut fut: crate::tutor::BoxFuture<'_, T>) -> T {
        use std::task::{Context, Poll, Waker};
        let mut cx = Context::from_waker(Waker::noop());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(value) => value,
            Poll::Pending => panic!("tutor future was not immediately ready"),
        }
    }

    #[test]
    fn test_handwriting_to_hint_scenario() {
        use crate::tutor::{StaticTutor, TutorService};

        let mut s = session();
        // Draw a 10-point pen stroke ending at (100, 100)
        assert!(s.pointer_down(PointerInput::at(91.0, 100.0)).is_none());
        for i in 1..=9 {
            s.pointer_move(PointerInput::at(91.0 + i as f64, 100.0));
        }
        let stroke_id = s.pointer_up(PointerInput::at(100.0, 100.0)).unwrap();
        let Some(Stroke::Pen(pen)) = s.store.get(stroke_id) else {
            panic!("expected pen stroke");
        };
        assert_eq!(pen.points.len(), 10);

        // The quiet period elapses and the sparkle appears offset from
        // the stroke's last point
        let events = s.advance(3000);
        assert!(matches!(events[..], [SessionEvent::SparkleShown(_)]));
        let point = &s.assist_points()[0];
        assert_eq!(point.position, Point::new(120.0, 90.0));
        let point_id = point.id;

        // Click the sparkle and run the analysis through the tutor
        let Some(SessionAction::RequestAnalysis(req)) = s.begin_assist(point_id, None) else {
            panic!("expected analysis request");
        };
        let AnalysisPayload::StrokeSummary(summary) = &req.payload else {
            panic!("sparse board should use the stroke summary");
        };
        let tutor = StaticTutor::new("Check your steps");
        let outcome = block_on_ready(tutor.analyze_board(summary, &req.subject, &req.session_title));
        let hint_id = s.apply_analysis(req.token, req.point, outcome).unwrap();

        // Type out the whole hint
        let ticks = "Check your steps".len() as u64;
        let events = s.advance(300 + ticks * 100);
        assert!(events.contains(&SessionEvent::TypingDone(hint_id)));
        let hint = s.store.get(hint_id).and_then(|st| st.as_ai_text()).unwrap();
        assert_eq!(hint.text, "Check your steps");
        assert!(!hint.is_typing);
        assert!(!s.assist_points()[0].sparkle_visible());
        assert_eq!(s.assist_points()[0].phase, AssistPhase::Settled);
    }

    #[test]
    fn test_text_tool_round_trip() {
        let mut s = session();
        s.tools.set_tool(ToolKind::Text);
        s.tools.style = ToolStyle::default();
        let action = s.pointer_down(PointerInput::at(40.0, 60.0));
        let Some(SessionAction::PromptText(anchor)) = action else {
            panic!("expected prompt");
        };
        assert!(s.commit_text(anchor, "").is_none());
        let id = s.commit_text(anchor, "y = mx + b").unwrap();
        assert!(s.store.get(id).is_some());
    }
}
