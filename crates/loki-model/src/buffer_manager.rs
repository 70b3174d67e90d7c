//! Multi-buffer manager (§4.8): a fixed-size table of slots, each either
//! empty or holding one editor context. Exactly one slot is current.
//!
//! Slot identity is a `(slot_index, generation)` pair rather than a raw
//! index, per §9's redesign flag for "pointer-identified slots" — closing a
//! slot bumps its generation, so an id captured before the close is
//! detectably stale rather than silently aliasing whatever gets created in
//! the freed slot next.

use anyhow::{bail, Result};
use loki_state::{OperatorMetrics, Registers, RegistersFacade};

use crate::context::EditorContext;

/// Hard upper bound on live buffers. "Fixed-size table" per §3; not a
/// growth-on-demand `Vec`.
pub const MAX_SLOTS: usize = 64;

/// Opaque, stale-detectable reference to one buffer-manager slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId {
    slot: usize,
    generation: u64,
}

/// Cached per-slot display metadata (§4.8), refreshed whenever the slot's
/// filename changes.
#[derive(Debug, Clone)]
pub struct SlotMeta {
    pub label: String,
    pub modified: bool,
}

impl SlotMeta {
    fn from_context(ctx: &EditorContext) -> Self {
        let label = ctx
            .document
            .filename
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "[No Name]".to_string());
        Self { label, modified: ctx.document.dirty > 0 }
    }
}

struct Slot {
    generation: u64,
    context: EditorContext,
    meta: SlotMeta,
}

/// Registers and operator metrics are clipboard-like state shared by every
/// buffer (yanking in one and pasting in another is ordinary Vim usage), so
/// they live here rather than inside each slot's `EditorContext`.
pub struct BufferManager {
    slots: Vec<Option<Slot>>,
    current: usize,
    next_generation: u64,
    registers: Registers,
    operator_metrics: OperatorMetrics,
}

impl BufferManager {
    /// Build a manager with one slot holding `initial`.
    pub fn new(initial: EditorContext) -> Self {
        let meta = SlotMeta::from_context(&initial);
        let slot = Some(Slot { generation: 0, context: initial, meta });
        Self {
            slots: vec![slot],
            current: 0,
            next_generation: 1,
            registers: Registers::default(),
            operator_metrics: OperatorMetrics::default(),
        }
    }

    /// Disjoint mutable access to the current context and the shared
    /// register/metrics state, for operator dispatch (§4.4/§4.6) without
    /// resorting to unsafe pointer splitting.
    pub fn split_current(&mut self) -> (&mut EditorContext, RegistersFacade<'_>) {
        let slot = self.slots[self.current].as_mut().expect("current slot always occupied");
        (&mut slot.context, RegistersFacade::new(&mut self.registers, &mut self.operator_metrics))
    }

    pub fn registers_facade(&mut self) -> RegistersFacade<'_> {
        RegistersFacade::new(&mut self.registers, &mut self.operator_metrics)
    }

    fn id_for(&self, index: usize) -> BufferId {
        let generation = self.slots[index].as_ref().expect("id_for on empty slot").generation;
        BufferId { slot: index, generation }
    }

    fn resolve(&self, id: BufferId) -> Result<usize> {
        match self.slots.get(id.slot).and_then(|s| s.as_ref()) {
            Some(slot) if slot.generation == id.generation => Ok(id.slot),
            Some(_) => bail!("stale buffer id: slot {} has since been reused", id.slot),
            None => bail!("no such buffer slot {}", id.slot),
        }
    }

    pub fn current_id(&self) -> BufferId {
        self.id_for(self.current)
    }

    pub fn current(&self) -> &EditorContext {
        &self.slots[self.current].as_ref().expect("current slot always occupied").context
    }

    pub fn current_mut(&mut self) -> &mut EditorContext {
        &mut self.slots[self.current].as_mut().expect("current slot always occupied").context
    }

    /// Refresh cached display metadata for the current slot; call after any
    /// operation that may have changed the filename or dirty counter.
    pub fn refresh_current_meta(&mut self) {
        let slot = self.slots[self.current].as_mut().expect("current slot always occupied");
        slot.meta = SlotMeta::from_context(&slot.context);
    }

    /// Create a new buffer, optionally opening `path`; an empty row if none
    /// (§4.8). The new slot becomes current.
    pub fn create(&mut self, path: Option<&std::path::Path>, screen_rows: usize, screen_cols: usize) -> Result<BufferId> {
        let document = match path {
            Some(p) => loki_state::DocumentModel::open(p)?,
            None => loki_state::DocumentModel::empty(),
        };
        let ctx = EditorContext::new(document, crate::view::ViewState::new(screen_rows, screen_cols));
        let meta = SlotMeta::from_context(&ctx);
        let generation = self.next_generation;
        self.next_generation += 1;
        let slot = Some(Slot { generation, context: ctx, meta });

        let index = if let Some(empty) = self.slots.iter().position(|s| s.is_none()) {
            self.slots[empty] = slot;
            empty
        } else {
            if self.slots.len() >= MAX_SLOTS {
                bail!("buffer manager is full ({MAX_SLOTS} slots)");
            }
            self.slots.push(slot);
            self.slots.len() - 1
        };
        self.current = index;
        tracing::debug!(target: "model.buffers", slot = index, "buffer created");
        Ok(self.id_for(index))
    }

    /// Close `id`. Refuses when the target is dirty unless `force`.
    /// Closing the current slot switches away *before* freeing it (§9);
    /// closing the last live slot is forbidden.
    pub fn close(&mut self, id: BufferId, force: bool) -> Result<()> {
        let index = self.resolve(id)?;
        if self.live_count() <= 1 {
            bail!("cannot close the last buffer");
        }
        let dirty = self.slots[index].as_ref().unwrap().context.document.dirty > 0;
        if dirty && !force {
            bail!("buffer has unsaved changes");
        }
        if index == self.current {
            let next_id = self.next_id_excluding(index)?;
            self.current = self.resolve(next_id)?;
        }
        self.slots[index] = None;
        tracing::debug!(target: "model.buffers", slot = index, "buffer closed");
        Ok(())
    }

    pub fn switch(&mut self, id: BufferId) -> Result<()> {
        self.current = self.resolve(id)?;
        Ok(())
    }

    pub fn list(&self) -> Vec<(BufferId, &SlotMeta)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (BufferId { slot: i, generation: s.generation }, &s.meta)))
            .collect()
    }

    fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    fn next_id_excluding(&self, excluded: usize) -> Result<BufferId> {
        let len = self.slots.len();
        let mut i = (excluded + 1) % len;
        loop {
            if i != excluded {
                if let Some(slot) = &self.slots[i] {
                    return Ok(BufferId { slot: i, generation: slot.generation });
                }
            }
            i = (i + 1) % len;
            if i == excluded {
                bail!("no other live buffer");
            }
        }
    }

    /// Wrapping switch to the next live slot (§4.8).
    pub fn next(&mut self) -> Result<BufferId> {
        let id = self.next_id_excluding(self.current)?;
        self.current = self.resolve(id)?;
        Ok(id)
    }

    /// Wrapping switch to the previous live slot (§4.8).
    pub fn previous(&mut self) -> Result<BufferId> {
        let len = self.slots.len();
        let mut i = (self.current + len - 1) % len;
        loop {
            if i != self.current {
                if let Some(slot) = &self.slots[i] {
                    let id = BufferId { slot: i, generation: slot.generation };
                    self.current = i;
                    return Ok(id);
                }
            }
            i = (i + len - 1) % len;
            if i == self.current {
                bail!("no other live buffer");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mgr() -> BufferManager {
        BufferManager::new(EditorContext::empty(24, 80))
    }

    #[test]
    fn create_adds_a_new_current_slot() {
        let mut m = mgr();
        let first = m.current_id();
        let second = m.create(None, 24, 80).unwrap();
        assert_ne!(first, second);
        assert_eq!(m.current_id(), second);
        assert_eq!(m.list().len(), 2);
    }

    #[test]
    fn closing_last_buffer_is_forbidden() {
        let mut m = mgr();
        assert!(m.close(m.current_id(), true).is_err());
    }

    #[test]
    fn closing_dirty_buffer_requires_force() {
        let mut m = mgr();
        let second = m.create(None, 24, 80).unwrap();
        m.current_mut().document.dirty = 1;
        assert!(m.close(second, false).is_err());
        assert!(m.close(second, true).is_ok());
    }

    #[test]
    fn closing_current_switches_away_first() {
        let mut m = mgr();
        let first = m.current_id();
        let second = m.create(None, 24, 80).unwrap();
        assert_eq!(m.current_id(), second);
        m.close(second, true).unwrap();
        assert_eq!(m.current_id(), first);
        assert_eq!(m.list().len(), 1);
    }

    #[test]
    fn stale_id_after_close_is_rejected() {
        let mut m = mgr();
        let second = m.create(None, 24, 80).unwrap();
        m.close(second, true).unwrap();
        let third = m.create(None, 24, 80).unwrap();
        assert_ne!(second, third, "generation must differ even if the slot index is reused");
        assert!(m.switch(second).is_err());
    }

    #[test]
    fn registers_persist_across_buffer_switch() {
        let mut m = mgr();
        {
            let mut regs = m.registers_facade();
            regs.write_yank("hello", None);
        }
        m.create(None, 24, 80).unwrap();
        let mut regs = m.registers_facade();
        assert_eq!(regs.read_paste(loki_state::PasteSource::Unnamed).unwrap(), "hello");
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut m = mgr();
        let first = m.current_id();
        let second = m.create(None, 24, 80).unwrap();
        let third = m.create(None, 24, 80).unwrap();
        assert_eq!(m.current_id(), third);
        assert_eq!(m.next().unwrap(), first);
        assert_eq!(m.previous().unwrap(), third);
        assert_eq!(m.previous().unwrap(), second);
    }
}
