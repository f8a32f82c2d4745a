use std::collections::HashMap;

use crate::interpreter::value::core::Value;

/// A stable handle addressing one scope frame inside [`Environments`].
///
/// Handles are cheap to copy and never dangle: frames live as long as the
/// arena. Closures store the handle of their defining frame, which gives
/// shared, mutable, by-reference capture semantics without pointer
/// management.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvRef(usize);

/// One scope frame: a name→value map plus the handle of its parent.
#[derive(Debug)]
struct Frame {
    values: HashMap<String, Value>,
    parent: Option<EnvRef>,
}

/// Arena of all scope frames created during evaluation.
///
/// Frame 0 is the global environment. A child frame is pushed on entering a
/// block or a function call; the parent chain is a forest, never cyclic,
/// and its depth equals the static nesting depth at any point in
/// evaluation.
#[derive(Debug)]
pub struct Environments {
    frames: Vec<Frame>,
}

impl Environments {
    /// Creates the arena with only the global frame.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![Frame { values: HashMap::new(),
                                    parent: None, }], }
    }

    /// The handle of the global frame.
    #[must_use]
    pub const fn global(&self) -> EnvRef {
        EnvRef(0)
    }

    /// Allocates a fresh child frame of `parent` and returns its handle.
    pub fn push(&mut self, parent: EnvRef) -> EnvRef {
        self.frames.push(Frame { values: HashMap::new(),
                                 parent: Some(parent), });
        EnvRef(self.frames.len() - 1)
    }

    /// Binds `name` in the frame addressed by `env`, overwriting any
    /// previous binding of the same name in that frame.
    pub fn define(&mut self, env: EnvRef, name: &str, value: Value) {
        self.frames[env.0].values.insert(name.to_string(), value);
    }

    /// Reads `name` from exactly the frame addressed by `env`, without
    /// walking the parent chain.
    #[must_use]
    pub fn get(&self, env: EnvRef, name: &str) -> Option<&Value> {
        self.frames[env.0].values.get(name)
    }

    /// Overwrites an existing binding of `name` in exactly the frame
    /// addressed by `env`. Returns `false` when no such binding exists.
    #[must_use]
    pub fn assign(&mut self, env: EnvRef, name: &str, value: Value) -> bool {
        match self.frames[env.0].values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            },
            None => false,
        }
    }

    /// Walks exactly `distance` parent links starting at `env`.
    ///
    /// The resolver guarantees that a recorded hop count never walks past
    /// the root; a stale handle would be a logic error, so the walk stops
    /// at the root rather than panicking.
    #[must_use]
    pub fn ancestor(&self, env: EnvRef, distance: usize) -> EnvRef {
        let mut frame = env;
        for _ in 0..distance {
            match self.frames[frame.0].parent {
                Some(parent) => frame = parent,
                None => break,
            }
        }
        frame
    }

    /// Reads `name` from the frame `distance` hops above `env`.
    #[must_use]
    pub fn get_at(&self, env: EnvRef, distance: usize, name: &str) -> Option<&Value> {
        self.get(self.ancestor(env, distance), name)
    }

    /// Overwrites `name` in the frame `distance` hops above `env`.
    #[must_use]
    pub fn assign_at(&mut self, env: EnvRef, distance: usize, name: &str, value: Value) -> bool {
        let target = self.ancestor(env, distance);
        self.assign(target, name, value)
    }
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}
