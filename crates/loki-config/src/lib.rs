//! Configuration file loading (ambient stack: not named by the spec's own
//! component table, but required to back the `:set`-adjacent persisted
//! defaults it does name — scroll margin, input timeout, display flags,
//! undo budgets, indent width). Ported from `core-config/src/lib.rs`'s
//! `ConfigFile`/`ConfigContext`/`Config` split, its TOML table extended from
//! `[scroll]`/`[input]` to also cover `[display]`, `[undo]`, and `[indent]`
//! so every tunable the rest of the workspace exposes has one home.
//!
//! Deliberately has no dependency on `loki-state`/`loki-model`: this crate
//! only parses and clamps plain data. `loki-session` is where parsed values
//! get threaded into `loki_state::{IndentConfig, UndoJournal}` and
//! `loki_model::DisplayFlags`.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigPlatformTraits {
    pub is_windows: bool,
    pub supports_scroll_region: bool,
}

impl ConfigPlatformTraits {
    pub const fn new(is_windows: bool, supports_scroll_region: bool) -> Self {
        Self { is_windows, supports_scroll_region }
    }
}

/// Live viewport shape, supplied by the caller at apply-time rather than
/// parsed, since it changes every resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
    pub status_rows: u16,
    pub overlay_rows: u16,
    pub platform: ConfigPlatformTraits,
}

impl ConfigContext {
    pub fn new(viewport_columns: u16, viewport_rows: u16, status_rows: u16, overlay_rows: u16, platform: ConfigPlatformTraits) -> Self {
        Self { viewport_columns, viewport_rows, status_rows, overlay_rows, platform }
    }

    pub fn text_rows(&self) -> u16 {
        let reserved = self.status_rows.saturating_add(self.overlay_rows);
        self.viewport_rows.saturating_sub(reserved)
    }

    pub fn from_viewport_height(viewport_rows: u16) -> Self {
        Self { viewport_columns: 0, viewport_rows, status_rows: 0, overlay_rows: 0, platform: ConfigPlatformTraits::default() }
    }
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct MarginConfig {
    #[serde(default)]
    pub vertical: u16,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct ScrollConfig {
    #[serde(default)]
    pub margin: MarginConfig,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_timeout")]
    pub timeout: bool,
    #[serde(default = "InputConfig::default_timeoutlen")]
    pub timeoutlen: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { timeout: Self::default_timeout(), timeoutlen: Self::default_timeoutlen() }
    }
}

impl InputConfig {
    const fn default_timeout() -> bool {
        true
    }
    const fn default_timeoutlen() -> u32 {
        1000
    }
}

/// §3 "display flags (line-number gutter, word-wrap)" persisted defaults.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_line_numbers")]
    pub line_numbers: bool,
    #[serde(default)]
    pub word_wrap: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { line_numbers: Self::default_line_numbers(), word_wrap: false }
    }
}

impl DisplayConfig {
    const fn default_line_numbers() -> bool {
        true
    }
}

/// §4.3 undo journal budgets (`DEFAULT_MAX_ENTRIES`/`DEFAULT_MAX_BYTES`/
/// `DEFAULT_IDLE_THRESHOLD` in `loki-state::undo`, made configurable).
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct UndoConfig {
    #[serde(default = "UndoConfig::default_history_max")]
    pub history_max: usize,
    #[serde(default = "UndoConfig::default_byte_budget")]
    pub byte_budget: usize,
    #[serde(default = "UndoConfig::default_idle_ms")]
    pub idle_ms: u64,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self { history_max: Self::default_history_max(), byte_budget: Self::default_byte_budget(), idle_ms: Self::default_idle_ms() }
    }
}

impl UndoConfig {
    const fn default_history_max() -> usize {
        2000
    }
    const fn default_byte_budget() -> usize {
        1 << 20
    }
    const fn default_idle_ms() -> u64 {
        500
    }
}

/// §4.7 indent width (`loki-state::indent::IndentConfig::unit`).
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct IndentConfig {
    #[serde(default = "IndentConfig::default_unit")]
    pub unit: usize,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self { unit: Self::default_unit() }
    }
}

impl IndentConfig {
    const fn default_unit() -> usize {
        2
    }
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct ConfigFile {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub undo: UndoConfig,
    #[serde(default)]
    pub indent: IndentConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Original file contents, kept for diagnostics (e.g. reporting parse
    /// errors back through the caller).
    pub raw: Option<String>,
    pub file: ConfigFile,
    pub effective_vertical_margin: u16,
}

/// Best-effort config path following platform conventions (XDG / AppData
/// Roaming), checking a working-directory override first.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("loki.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("loki").join("loki.toml");
    }
    PathBuf::from("loki.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Ok(Config { raw: Some(content), file, effective_vertical_margin: 0 }),
            Err(e) => {
                tracing::warn!(target: "config", path = %path.display(), error = %e, "config parse failed, using defaults");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}

impl Config {
    /// Apply viewport + platform context to compute the clamped vertical
    /// scroll margin. Returns the effective value.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> u16 {
        let raw = self.file.scroll.margin.vertical;
        let text_rows = ctx.text_rows();
        let (clamped, max) = if text_rows <= 3 {
            (0, 0)
        } else {
            let max = (text_rows.saturating_sub(2)) / 2;
            (raw.min(max), max)
        };

        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                text_rows,
                viewport_rows = ctx.viewport_rows,
                overlay_rows = ctx.overlay_rows,
                status_rows = ctx.status_rows,
                supports_scroll_region = ctx.platform.supports_scroll_region,
                is_windows = ctx.platform.is_windows,
                "scroll_margin_vertical_clamped"
            );
        }
        self.effective_vertical_margin = clamped;
        clamped
    }

    pub fn apply_viewport_height(&mut self, viewport_height: u16) -> u16 {
        self.apply_context(ConfigContext::from_viewport_height(viewport_height))
    }

    /// Recompute on a viewport/platform change. Returns `Some(new_margin)`
    /// only when the effective value actually changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<u16> {
        let prev = self.effective_vertical_margin;
        let current = self.apply_context(ctx);
        if current != prev {
            Some(current)
        } else {
            None
        }
    }

    pub fn recompute_after_resize(&mut self, new_viewport_height: u16) -> Option<u16> {
        self.recompute_with_context(ConfigContext::from_viewport_height(new_viewport_height))
    }
}
