//! Multi-buffer navigation (§4.8 `CTRL-X` prefix) and quit confirmation
//! (§4.10 "three-press confirmation when dirty").

use loki_model::BufferManager;

use crate::BufferPrefixKey;

use super::DispatchResult;

pub fn handle_buffer_prefix(mgr: &mut BufferManager, key: BufferPrefixKey) -> DispatchResult {
    mgr.current_mut().view.pending_prefix = None;
    match key {
        BufferPrefixKey::Next => {
            if mgr.next().is_ok() {
                DispatchResult::buffer_replaced()
            } else {
                DispatchResult::clean()
            }
        }
        BufferPrefixKey::Previous => {
            if mgr.previous().is_ok() {
                DispatchResult::buffer_replaced()
            } else {
                DispatchResult::clean()
            }
        }
        BufferPrefixKey::CloseSoft => close(mgr, false),
        BufferPrefixKey::CloseForce => close(mgr, true),
        BufferPrefixKey::Jump(n) => {
            let targets: Vec<_> = mgr.list().into_iter().map(|(id, _)| id).collect();
            match targets.get(n.saturating_sub(1) as usize) {
                Some(&id) if mgr.switch(id).is_ok() => DispatchResult::buffer_replaced(),
                _ => DispatchResult::clean(),
            }
        }
    }
}

fn close(mgr: &mut BufferManager, force: bool) -> DispatchResult {
    let id = mgr.current_id();
    match mgr.close(id, force) {
        Ok(()) => DispatchResult::buffer_replaced(),
        Err(e) => {
            tracing::warn!(target: "actions.buffers", error = %e, "close refused");
            DispatchResult::clean()
        }
    }
}

/// `CTRL-Q` (§4.10): quits immediately on a clean buffer; on a dirty one,
/// requires three consecutive presses, tracked on the view and reset by any
/// other action (`dispatch::dispatch` clears it before routing).
pub fn handle_quit(mgr: &mut BufferManager, force: bool) -> DispatchResult {
    let ctx = mgr.current_mut();
    if force || ctx.document.dirty == 0 {
        return DispatchResult::quit();
    }
    ctx.view.quit_confirm_presses += 1;
    if ctx.view.quit_confirm_presses >= 3 {
        DispatchResult::quit()
    } else {
        DispatchResult::clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_model::EditorContext;

    fn mgr() -> BufferManager {
        BufferManager::new(EditorContext::empty(24, 80))
    }

    #[test]
    fn clean_buffer_quits_on_first_press() {
        let mut m = mgr();
        assert!(handle_quit(&mut m, false).quit);
    }

    #[test]
    fn dirty_buffer_requires_three_presses() {
        let mut m = mgr();
        m.current_mut().document.dirty = 1;
        assert!(!handle_quit(&mut m, false).quit);
        assert!(!handle_quit(&mut m, false).quit);
        assert!(handle_quit(&mut m, false).quit);
    }

    #[test]
    fn force_quit_bypasses_confirmation() {
        let mut m = mgr();
        m.current_mut().document.dirty = 1;
        assert!(handle_quit(&mut m, true).quit);
    }

    #[test]
    fn next_and_previous_cycle_buffers() {
        let mut m = mgr();
        let first = m.current_id();
        m.create(None, 24, 80).unwrap();
        let r = handle_buffer_prefix(&mut m, BufferPrefixKey::Previous);
        assert!(r.buffer_replaced);
        assert_eq!(m.current_id(), first);
    }

    #[test]
    fn close_soft_refuses_dirty_buffer() {
        let mut m = mgr();
        m.create(None, 24, 80).unwrap();
        m.current_mut().document.dirty = 1;
        let r = handle_buffer_prefix(&mut m, BufferPrefixKey::CloseSoft);
        assert!(!r.buffer_replaced);
        assert_eq!(m.list().len(), 2);
    }

    #[test]
    fn jump_switches_to_the_nth_listed_buffer() {
        let mut m = mgr();
        m.create(None, 24, 80).unwrap();
        let targets = m.list();
        let first_id = targets[0].0;
        handle_buffer_prefix(&mut m, BufferPrefixKey::Jump(1));
        assert_eq!(m.current_id(), first_id);
    }
}
