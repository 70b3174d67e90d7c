//! Terminal collaborator (§1 external collaborators, §4 Terminal
//! collaborator): raw-mode/alternate-screen lifecycle, capability probing, a
//! window-size query with a CPR fallback, a resize-pending latch, an
//! append-buffer primitive, and the process-wide terminal host that ties
//! them together. Key-event reading itself lives in `loki-input`, which
//! delegates straight to `crossterm`'s own escape-sequence parsing rather
//! than duplicating it here.

pub mod append_buffer;
pub mod backend;
pub mod capabilities;
pub mod host;
pub mod resize;
pub mod window;

pub use append_buffer::AppendBuffer;
pub use backend::{raw_mode_active, raw_mode_disable, raw_mode_enable, CrosstermBackend, TerminalBackend, TerminalGuard};
pub use capabilities::TerminalCapabilities;
pub use host::TerminalHost;
pub use resize::ResizeFlag;
pub use window::window_size;
