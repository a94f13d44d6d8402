use std::fmt;

/// Host lifecycle.
///
/// `Broken` is absorbing. `Running` and `Quit` alternate through quit/restart.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LifecycleState {
    #[default]
    Loading,
    Running,
    Quit,
    Broken,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Loading => "loading",
            LifecycleState::Running => "running",
            LifecycleState::Quit => "quit",
            LifecycleState::Broken => "broken",
        };
        f.write_str(s)
    }
}

/// Transition table for [`LifecycleState`].
///
/// Every state change goes through [`Lifecycle::transition`], which is the single
/// place that enforces the absorbing broken state.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_broken(&self) -> bool {
        self.state == LifecycleState::Broken
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// Whether `to` is reachable from the current state.
    pub fn allows(&self, to: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self.state, to),
            (Loading, Running) | (Running, Quit) | (Quit, Running) | (Loading | Running | Quit, Broken)
        )
    }

    /// Applies the transition if allowed. Returns `false` (and changes nothing) otherwise.
    pub fn transition(&mut self, to: LifecycleState) -> bool {
        if !self.allows(to) {
            log::trace!("rejected lifecycle transition {} -> {to}", self.state);
            return false;
        }
        log::info!("lifecycle {} -> {to}", self.state);
        self.state = to;
        true
    }
}
