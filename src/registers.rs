//! Shared control registers.
//!
//! The externally visible control surface of the engine: the requested mode
//! and static color, plus the saved snapshot used by the `test` self-check.
//! Both live behind a single `critical-section` lock. Command handlers write,
//! the render loop takes one snapshot per frame; critical sections contain
//! only field copies, never computation or I/O.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::color::Rgb;
use crate::effect::ModeId;

/// Snapshot of the control surface as seen by the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub mode: ModeId,
    pub color: Rgb,
}

struct Inner {
    state: ControlState,
    /// Mode/color captured when entering `test`, restored on completion.
    saved: Option<ControlState>,
}

/// Mode and color registers shared between command handlers and the
/// render loop.
pub struct ControlRegisters {
    inner: Mutex<RefCell<Inner>>,
}

impl ControlRegisters {
    /// Create registers with an initial mode and color.
    pub const fn new(mode: ModeId, color: Rgb) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                state: ControlState { mode, color },
                saved: None,
            })),
        }
    }

    /// Atomically read the current control state.
    pub fn snapshot(&self) -> ControlState {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().state)
    }

    /// Set the static color. Implies a switch to [`ModeId::Static`].
    ///
    /// A color command issued mid-test cancels the pending restore; the
    /// snapshot is dropped, not resurrected later.
    pub fn set_color(&self, color: Rgb) {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow(cs).borrow_mut();
            inner.state = ControlState {
                mode: ModeId::Static,
                color,
            };
            inner.saved = None;
        });
    }

    /// Set the requested mode, leaving the color untouched.
    ///
    /// Entering [`ModeId::Test`] from any other mode captures the current
    /// state so it can be restored when the self-check completes. A repeated
    /// `test` request while the test is running does not overwrite the
    /// capture. Any other mode request drops the snapshot: an explicit
    /// command supersedes the pending restore.
    pub fn set_mode(&self, mode: ModeId) {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow(cs).borrow_mut();
            if mode == ModeId::Test {
                if inner.state.mode != ModeId::Test {
                    inner.saved = Some(inner.state);
                }
            } else {
                inner.saved = None;
            }
            inner.state.mode = mode;
        });
    }

    /// Consume the saved snapshot and restore it as the current state.
    ///
    /// Called by the render loop when the `test` pulse has finished. Returns
    /// the restored state, or `None` if no snapshot was captured.
    pub fn complete_test(&self) -> Option<ControlState> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow(cs).borrow_mut();
            let saved = inner.saved.take()?;
            inner.state = saved;
            Some(saved)
        })
    }

    /// Check whether a test snapshot is currently held.
    pub fn has_saved(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().saved.is_some())
    }
}
