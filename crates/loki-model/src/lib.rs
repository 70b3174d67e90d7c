//! View state, editor context, layout, and the multi-buffer manager (§3
//! View state / Editor context / Buffer manager, §4.8).

pub mod buffer_manager;
pub mod context;
pub mod layout;
pub mod view;

pub use buffer_manager::{BufferId, BufferManager, SlotMeta};
pub use context::{EditorContext, RendererHandle, ScriptingHandle};
pub use layout::{Layout, LayoutRegion};
pub use view::{compute_scroll_intent, DisplayFlags, Palette, PendingPrefix, ReplPaneState, ViewState};
