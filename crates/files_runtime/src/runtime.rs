//! Headless driver that feeds effect results back through the reducer.

use std::{cell::RefCell, collections::VecDeque};

use panel_host::HostServices;

use crate::{
    executor::run_effect,
    model::FileBrowserState,
    reducer::{reduce_browser, BrowserAction, BrowserEffect, BrowserError},
    trace,
};

/// File-browser state plus a queue of effects awaiting execution.
///
/// Effects run one at a time in emission order, so uploads and bulk deletes reach the host
/// strictly sequentially. Browser hosts that spawn effects concurrently use [`reduce_browser`]
/// and [`run_effect`] directly instead.
pub struct FileBrowserRuntime {
    state: FileBrowserState,
    services: HostServices,
    pending: VecDeque<BrowserEffect>,
}

impl FileBrowserRuntime {
    /// Runtime positioned at `initial_path`; nothing is fetched until [`BrowserAction::Initialize`].
    pub fn new(services: HostServices, initial_path: &str) -> Self {
        Self {
            state: FileBrowserState::new(initial_path),
            services,
            pending: VecDeque::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &FileBrowserState {
        &self.state
    }

    /// Injected services.
    pub fn services(&self) -> &HostServices {
        &self.services
    }

    /// Effects not yet executed.
    pub fn pending(&self) -> &VecDeque<BrowserEffect> {
        &self.pending
    }

    /// Reduces `action` and queues its effects without running them.
    ///
    /// # Errors
    ///
    /// Returns the reducer's precondition failure; nothing is queued in that case.
    pub fn reduce(&mut self, action: BrowserAction) -> Result<(), BrowserError> {
        let effects = reduce_browser(&mut self.state, action)?;
        self.pending.extend(effects);
        Ok(())
    }

    /// Removes and returns every queued effect.
    pub fn take_pending(&mut self) -> Vec<BrowserEffect> {
        self.pending.drain(..).collect()
    }

    /// Reduces `action` and runs effects until the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns the reducer's precondition failure for `action` itself.
    pub async fn dispatch(&mut self, action: BrowserAction) -> Result<(), BrowserError> {
        self.reduce(action)?;
        self.run_until_idle().await;
        Ok(())
    }

    /// Runs the oldest queued effect and reduces what it emitted. Returns `false` when idle.
    pub async fn run_next(&mut self) -> bool {
        let Some(effect) = self.pending.pop_front() else {
            return false;
        };
        let emitted = RefCell::new(Vec::new());
        run_effect(&self.services, effect, &|action: BrowserAction| {
            emitted.borrow_mut().push(action)
        })
        .await;
        for action in emitted.into_inner() {
            self.apply_follow_up(action);
        }
        true
    }

    /// Runs effects until the queue is empty.
    pub async fn run_until_idle(&mut self) {
        while self.run_next().await {}
    }

    fn apply_follow_up(&mut self, action: BrowserAction) {
        let name = action.name();
        if let Err(err) = self.reduce(action) {
            trace::trace_follow_up_rejected(name, &err.to_string());
        }
    }
}
