use rts_macro::MacroContext;

use crate::ScoreWindow;

/// State shared by every simulation of one planning cycle and nothing beyond it.
#[derive(Debug, Clone, Default)]
pub struct CycleContext {
    /// Cities already claimed by an expansion this cycle.
    pub macros: MacroContext,
    /// Heuristic min/max seen this cycle.
    pub window: ScoreWindow,
}

impl CycleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.macros.reset();
        self.window.reset();
    }
}
