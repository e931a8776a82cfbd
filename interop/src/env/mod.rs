//! Per-call environment
//!
//! Collaborator state the strategies need while converting: the non-fatal
//! warning channel (the permissive script semantics coerce-and-warn instead
//! of failing), the working directory strings resolve against for path
//! parameters, and the function table callbacks by name resolve through.

use crate::value::{Callable, CallbackHandle, ClosureRef, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Call environment
pub struct Env {
    /// Working directory for relative path resolution
    cwd: PathBuf,
    /// Collected non-fatal diagnostics
    warnings: Vec<String>,
    /// Named host functions, for name-based callbacks
    functions: HashMap<String, ClosureRef>,
}

impl Env {
    /// Create an environment rooted at "."
    pub fn new() -> Self {
        Self::with_cwd(PathBuf::from("."))
    }

    /// Create an environment with an explicit working directory
    pub fn with_cwd(cwd: PathBuf) -> Self {
        Env {
            cwd,
            warnings: Vec::new(),
            functions: HashMap::new(),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Record a non-fatal diagnostic
    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "lume_interop", "{message}");
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Resolve a script-supplied path string against the working directory
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.cwd.join(p)
        }
    }

    /// Register a host function callbacks can reference by name
    pub fn register_function(&mut self, name: impl Into<String>, f: ClosureRef) {
        self.functions.insert(name.into(), f);
    }

    pub fn lookup_function(&self, name: &str) -> Option<ClosureRef> {
        self.functions.get(name).cloned()
    }

    /// Wrap a callable value into an invocable handle.
    /// A bare string becomes a late-bound named callback.
    pub fn create_callback(&self, value: &Value) -> Option<CallbackHandle> {
        match value {
            Value::Callable(c) => Some(CallbackHandle::new(c.clone())),
            Value::Str(s) => Some(CallbackHandle::new(Callable::Named(s.to_text_lossy().0))),
            _ => None,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
