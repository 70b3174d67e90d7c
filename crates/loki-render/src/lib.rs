//! View-model snapshotting and the renderer protocol (§4.12-4.13): turns the
//! live editor state owned by `loki-model`/`loki-state` into an owned,
//! pointer-free frame description, and defines the callback bundle a
//! transport implements to draw it.

pub mod null_renderer;
pub mod renderer;
pub mod segment;
pub mod snapshot;
pub mod status;
pub mod view_model;

pub use null_renderer::NullRenderer;
pub use renderer::{render_frame, Renderer};
pub use segment::{build_row_segments, build_row_segments_windowed, Segment, MAX_SEGMENTS_PER_ROW};
pub use snapshot::build_snapshot;
pub use status::{build_status, compose_status, format_status, StatusContext, StatusSegment};
pub use view_model::{CursorInfo, ReplSnapshot, RowView, TabInfo, ViewModel};
