//! Generic finite state machine
//!
//! A keyed set of states with exactly one active at a time. States operate on
//! an agent `A` and the world `W` they are passed on every call, so the
//! machine can live inside the agent it drives without borrowing it.
//!
//! ## Lifecycle
//! ```text
//! change_state(k): current.on_exit → swap → states[k].on_enter
//! execute():       current.on_update → Some(next)? → change_state(next)
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Logic for one named state.
pub trait State<K, A, W> {
    fn on_enter(&mut self, _agent: &mut A, _world: &mut W) {}

    /// Per-tick behavior. Returns `Some(key)` to request a transition, which
    /// the machine applies before `execute` returns.
    fn on_update(&mut self, agent: &mut A, world: &mut W) -> Option<K>;

    fn on_exit(&mut self, _agent: &mut A, _world: &mut W) {}
}

/// A completed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<K> {
    pub from: Option<K>,
    pub to: K,
}

pub struct FiniteStateMachine<K, A, W> {
    states: HashMap<K, Box<dyn State<K, A, W> + Send>>,
    current: Option<K>,
}

impl<K, A, W> Default for FiniteStateMachine<K, A, W> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
        }
    }
}

impl<K: fmt::Debug, A, W> fmt::Debug for FiniteStateMachine<K, A, W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FiniteStateMachine")
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish()
    }
}

impl<K, A, W> FiniteStateMachine<K, A, W>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state. The first registration for a key wins; later ones
    /// are dropped and `false` is returned.
    pub fn add_state<S>(&mut self, key: K, state: S) -> bool
    where
        S: State<K, A, W> + Send + 'static,
    {
        if self.states.contains_key(&key) {
            return false;
        }
        self.states.insert(key, Box::new(state));
        true
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn contains(&self, key: &K) -> bool {
        self.states.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Exit the active state and enter `key`.
    ///
    /// No-op for unknown keys and for the key already active.
    pub fn change_state(&mut self, key: K, agent: &mut A, world: &mut W) -> Option<Transition<K>> {
        if !self.states.contains_key(&key) || self.current == Some(key) {
            return None;
        }

        let from = self.current;
        if let Some(prev) = from {
            if let Some(state) = self.states.get_mut(&prev) {
                state.on_exit(agent, world);
            }
        }

        self.current = Some(key);
        if let Some(state) = self.states.get_mut(&key) {
            state.on_enter(agent, world);
        }

        log::debug!("FSM transition {:?} -> {:?}", from, key);
        Some(Transition { from, to: key })
    }

    /// Run the active state's update; applies any requested transition.
    ///
    /// Safe no-op before the first `change_state`.
    pub fn execute(&mut self, agent: &mut A, world: &mut W) -> Option<Transition<K>> {
        let key = self.current?;
        let next = self.states.get_mut(&key)?.on_update(agent, world)?;
        self.change_state(next, agent, world)
    }
}
