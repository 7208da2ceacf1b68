//! Append-only operator log of lifecycle events.

use serde::Serialize;
use tracing::{info, warn};

use idl_console_core::error::ConsoleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    IdlLoaded,
    IdlLoadFailed,
    SignerConnected,
    SignerDisconnected,
    Invoked,
    Succeeded,
    Failed,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeEntry {
    pub kind: EventKind,
    pub message: String,
}

/// Entries are kept in emission order and never rewritten.
#[derive(Debug, Default)]
pub struct Narrator {
    entries: Vec<NarrativeEntry>,
}

impl Narrator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: EventKind, message: String) {
        match kind {
            EventKind::IdlLoadFailed | EventKind::Failed | EventKind::Discarded => {
                warn!(event = ?kind, "{}", message)
            }
            _ => info!(event = ?kind, "{}", message),
        }
        self.entries.push(NarrativeEntry { kind, message });
    }

    pub fn idl_loaded(&mut self, source: &str, program: &str, instructions: usize) {
        self.push(
            EventKind::IdlLoaded,
            format!("Loaded IDL for '{}' from {} ({} instruction(s))", program, source, instructions),
        );
    }

    pub fn idl_load_failed(&mut self, source: &str, err: &ConsoleError) {
        self.push(EventKind::IdlLoadFailed, format!("IDL load from {} failed: {}", source, err));
    }

    pub fn signer_connected(&mut self, address: Option<&str>) {
        let who = address.unwrap_or("unknown address");
        self.push(EventKind::SignerConnected, format!("Signer connected: {}", who));
    }

    pub fn signer_disconnected(&mut self) {
        self.push(EventKind::SignerDisconnected, "Signer disconnected".to_string());
    }

    pub fn invoked(&mut self, instruction: &str, simulate: bool) {
        let verb = if simulate { "Simulating" } else { "Invoking" };
        self.push(EventKind::Invoked, format!("{} '{}'", verb, instruction));
    }

    pub fn succeeded(&mut self, instruction: &str, result: &str) {
        self.push(EventKind::Succeeded, format!("'{}' succeeded: {}", instruction, result));
    }

    pub fn failed(&mut self, instruction: &str, message: &str) {
        self.push(EventKind::Failed, format!("'{}' failed: {}", instruction, message));
    }

    /// An action failed before anything was sent.
    pub fn action_failed(&mut self, action: &str, err: &ConsoleError) {
        self.push(EventKind::Failed, format!("{} failed: {}", action, err));
    }

    pub fn discarded(&mut self, instruction: &str) {
        self.push(
            EventKind::Discarded,
            format!("Discarded late result for '{}': selection changed", instruction),
        );
    }

    pub fn entries(&self) -> &[NarrativeEntry] {
        &self.entries
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
