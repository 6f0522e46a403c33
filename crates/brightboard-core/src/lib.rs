//! BrightBoard Core Library
//!
//! Platform-agnostic data structures and logic for the BrightBoard
//! education whiteboard: strokes and undo, tool gestures, hit-testing,
//! the AI assistance flow, and multi-page management. Rendering lives in
//! the companion render crate.

pub mod assist;
pub mod clock;
pub mod color;
pub mod geometry;
pub mod hittest;
pub mod input;
pub mod page;
pub mod session;
pub mod store;
pub mod stroke;
pub mod tools;
pub mod tutor;

pub use assist::{AssistPhase, AssistancePoint};
pub use clock::{Millis, TimerEvent, TimerQueue};
pub use color::Rgba;
pub use input::{Cursor, Modifiers, PointerInput};
pub use page::{Page, PageError, PageId, PageManager};
pub use session::{AnalysisPayload, AnalysisRequest, BoardSession, SessionAction, SessionEvent};
pub use store::StrokeStore;
pub use stroke::{AssistPointId, Stroke, StrokeGeometry, StrokeId, ToolKind};
pub use tools::{GestureEffect, ToolManager, ToolState, ToolStyle};
pub use tutor::{
    ChatMessage, ChatRole, RateLimited, RateLimiter, StaticTutor, TutorError, TutorService,
};
