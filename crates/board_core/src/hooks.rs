use crate::PilotId;

/// What a "board" hook wants done with the attempt that fired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookVerdict {
    Proceed,
    /// Abort before the loot picker opens or the timer starts.
    Unboard,
}

/// Scripting seam fired when a pilot enters `Requested`.
///
/// Dispatch is synchronous. Returning `Unboard` is the only way a hook can
/// cancel the attempt it was notified about.
pub trait BoardHooks {
    fn on_board(&mut self, boarder: &PilotId, target: &PilotId) -> HookVerdict;
}

/// No scripts attached.
pub struct NoHooks;

impl BoardHooks for NoHooks {
    fn on_board(&mut self, _boarder: &PilotId, _target: &PilotId) -> HookVerdict {
        HookVerdict::Proceed
    }
}

/// Unboards any attempt against one of the listed targets, e.g. mission
/// ships a script wants left alone.
#[derive(Debug, Clone, Default)]
pub struct GuardedTargets {
    pub targets: Vec<PilotId>,
}

impl BoardHooks for GuardedTargets {
    fn on_board(&mut self, _boarder: &PilotId, target: &PilotId) -> HookVerdict {
        if self.targets.contains(target) {
            HookVerdict::Unboard
        } else {
            HookVerdict::Proceed
        }
    }
}
