//! One operator action at a time: session, narrator and signer wired together.
//!
//! Each method is a discrete unit of work. Errors are narrated and handed
//! back; the session keeps its previous state.

use std::sync::Arc;

use idl_console_core::error::ConsoleError;
use idl_console_core::types::FieldKind;

use crate::loader::{load_idl, IdlSource};
use crate::narrator::Narrator;
use crate::session::{Completion, InvocationResult, PendingInvocation, Session};
use crate::signer::{SubmitOptions, TransactionSigner};
use crate::tx::PreparedInvocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Send,
    Simulate,
}

pub struct Console {
    session: Session,
    narrator: Narrator,
    options: SubmitOptions,
}

impl Console {
    pub fn new(session: Session, options: SubmitOptions) -> Self {
        Self {
            session,
            narrator: Narrator::new(),
            options,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    pub async fn load(&mut self, source: &IdlSource) -> Result<(), ConsoleError> {
        let label = source.to_string();
        match load_idl(source).await {
            Ok(idl) => {
                self.narrator
                    .idl_loaded(&label, idl.program_name(), idl.instructions().len());
                self.session.load_idl(idl);
                Ok(())
            }
            Err(err) => {
                self.narrator.idl_load_failed(&label, &err);
                Err(err)
            }
        }
    }

    pub fn select(&mut self, name: &str) -> Result<(), ConsoleError> {
        match self.session.select_instruction(name) {
            Ok(_) => Ok(()),
            Err(err) => {
                self.narrator.action_failed(&format!("Selecting '{}'", name), &err);
                Err(err)
            }
        }
    }

    pub fn set_field(&mut self, kind: FieldKind, name: &str, value: &str) -> Result<(), ConsoleError> {
        self.session.set_field(kind, name, value).inspect_err(|err| {
            self.narrator.action_failed(&format!("Setting {} '{}'", kind, name), err)
        })
    }

    pub fn clear_field(&mut self, kind: FieldKind, name: &str) -> Result<(), ConsoleError> {
        self.session.clear_field(kind, name).inspect_err(|err| {
            self.narrator.action_failed(&format!("Clearing {} '{}'", kind, name), err)
        })
    }

    pub fn connect(&mut self, signer: Arc<dyn TransactionSigner>) {
        let address = signer.address().map(|a| a.to_string());
        self.session.connect(signer);
        self.narrator.signer_connected(address.as_deref());
    }

    pub fn disconnect(&mut self) {
        if self.session.disconnect() {
            self.narrator.signer_disconnected();
        }
    }

    /// Assemble and encode without submitting.
    pub fn preview(&mut self) -> Result<PreparedInvocation, ConsoleError> {
        self.session
            .prepare()
            .inspect_err(|err| self.narrator.action_failed("Preparing invocation", err))
    }

    /// Submit or simulate the selected instruction and narrate the outcome.
    pub async fn submit(&mut self, mode: SubmitMode) -> Result<Completion, ConsoleError> {
        let pending = match self.session.begin_submission() {
            Ok(pending) => pending,
            Err(err) => {
                let instruction = self.session.selected_name().unwrap_or("invocation").to_string();
                self.narrator.failed(&instruction, &err.to_string());
                return Err(err);
            }
        };
        let instruction = pending.prepared.call.instruction.clone();
        self.narrator.invoked(&instruction, mode == SubmitMode::Simulate);

        let result = run(&pending, mode, &self.options).await;
        let completion = self.session.finish_submission(pending.ticket, result);
        match &completion {
            Completion::Applied(InvocationResult::Success(id)) => self.narrator.succeeded(&instruction, id),
            Completion::Applied(InvocationResult::Failure(message)) => {
                self.narrator.failed(&instruction, message)
            }
            Completion::Stale => self.narrator.discarded(&instruction),
        }
        Ok(completion)
    }
}

/// Drive one pending invocation through its signer.
pub async fn run(
    pending: &PendingInvocation,
    mode: SubmitMode,
    options: &SubmitOptions,
) -> InvocationResult {
    let result = match mode {
        SubmitMode::Send => pending.signer.sign_and_submit(&pending.prepared, options).await,
        SubmitMode::Simulate => pending
            .signer
            .simulate(&pending.prepared)
            .await
            .map(|report| report.to_string()),
    };
    InvocationResult::from(result)
}
