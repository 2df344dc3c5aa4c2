//! Variable environment: globals plus call frames of block scopes.

use crate::value::Value;
use std::collections::HashMap;

type Scope = HashMap<String, Value>;

/// Lookup rules:
/// - inside a call, names resolve through the current frame's block
///   scopes (innermost first) and then the globals — a function body
///   never sees another call's locals;
/// - at the top level there is no frame and names resolve through the
///   top-level block scopes and globals directly.
#[derive(Debug, Default)]
pub struct Environment {
    globals: Scope,
    /// Top-level block scopes (for `if`/`for` bodies outside functions).
    top_scopes: Vec<Scope>,
    /// One entry per active call: that call's stack of block scopes.
    frames: Vec<Vec<Scope>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a function call.
    pub fn push_frame(&mut self) {
        self.frames.push(vec![Scope::new()]);
    }

    /// Leave a function call, discarding all of its scopes.
    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Enter a block.
    pub fn push_scope(&mut self) {
        match self.frames.last_mut() {
            Some(frame) => frame.push(Scope::new()),
            None => self.top_scopes.push(Scope::new()),
        }
    }

    /// Leave a block.
    pub fn pop_scope(&mut self) {
        match self.frames.last_mut() {
            Some(frame) => {
                if frame.len() > 1 {
                    frame.pop();
                }
            }
            None => {
                self.top_scopes.pop();
            }
        }
    }

    /// Define a name in the innermost visible scope.
    pub fn define(&mut self, name: &str, value: Value) {
        let scope = match self.frames.last_mut() {
            Some(frame) => frame.last_mut().expect("frame always has a scope"),
            None => match self.top_scopes.last_mut() {
                Some(scope) => scope,
                None => &mut self.globals,
            },
        };
        scope.insert(name.to_string(), value);
    }

    /// Define a name in the globals, regardless of the current frame.
    /// Used for hoisted function declarations.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        for scope in self.visible_scopes() {
            if let Some(v) = scope.get(name) {
                return Some(v);
            }
        }
        self.globals.get(name)
    }

    /// Overwrite an existing binding. Returns `false` when the name is
    /// not defined anywhere visible.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        let scopes: &mut Vec<Scope> = match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.top_scopes,
        };
        for scope in scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        if let Some(slot) = self.globals.get_mut(name) {
            *slot = value;
            return true;
        }
        false
    }

    fn visible_scopes(&self) -> impl Iterator<Item = &Scope> {
        let scopes = match self.frames.last() {
            Some(frame) => frame.as_slice(),
            None => self.top_scopes.as_slice(),
        };
        scopes.iter().rev()
    }
}
