//! Session state: loaded IDL, selected instruction, form, signer handle.
//!
//! Every transition replaces whole values and a failing operation leaves
//! the session as it was. Submissions are ticketed: changing the
//! selection or reloading the IDL bumps the generation, and a result
//! carrying an older generation is discarded instead of applied. A stale
//! submission still blocks a new one until its result comes back.

use std::sync::Arc;

use idl_console_core::error::{ConsoleError, SignerError};
use idl_console_core::idl::{IdlInstruction, InterfaceDefinition};
use idl_console_core::types::FieldKind;
use solana_sdk::pubkey::Pubkey;

use crate::address::parse_address;
use crate::assemble::Assembler;
use crate::form::FormInputState;
use crate::signer::TransactionSigner;
use crate::tx::{prepare_invocation, PreparedInvocation};

/// Outcome of one invocation. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Success(String),
    Failure(String),
}

impl From<Result<String, SignerError>> for InvocationResult {
    fn from(result: Result<String, SignerError>) -> Self {
        match result {
            Ok(id) => InvocationResult::Success(id),
            Err(err) => InvocationResult::Failure(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
    serial: u64,
}

/// A submission that has left the session and awaits its result.
pub struct PendingInvocation {
    pub ticket: SubmitTicket,
    pub prepared: PreparedInvocation,
    pub signer: Arc<dyn TransactionSigner>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied(InvocationResult),
    /// The selection changed while the result was in flight.
    Stale,
}

#[derive(Debug, Clone)]
struct Selection {
    instruction: String,
    form: FormInputState,
    last_result: Option<InvocationResult>,
}

#[derive(Default)]
pub struct Session {
    idl: Option<Arc<InterfaceDefinition>>,
    selection: Option<Selection>,
    signer: Option<Arc<dyn TransactionSigner>>,
    program_override: Option<Pubkey>,
    generation: u64,
    serial: u64,
    in_flight: Option<SubmitTicket>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a program explicitly instead of the IDL's `address`.
    pub fn with_program_id(program_id: Option<Pubkey>) -> Self {
        Self {
            program_override: program_id,
            ..Self::default()
        }
    }

    /// Replace the IDL wholesale and drop the selection.
    pub fn load_idl(&mut self, idl: InterfaceDefinition) {
        self.idl = Some(Arc::new(idl));
        self.selection = None;
        self.invalidate();
    }

    pub fn idl(&self) -> Option<&InterfaceDefinition> {
        self.idl.as_deref()
    }

    fn loaded_idl(&self) -> Result<&InterfaceDefinition, ConsoleError> {
        self.idl.as_deref().ok_or(ConsoleError::NoIdlLoaded)
    }

    /// Outstanding tickets go stale but stay in flight until finished.
    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Select an instruction and install a fresh, empty form for it.
    pub fn select_instruction(&mut self, name: &str) -> Result<&IdlInstruction, ConsoleError> {
        let idl = self.idl.clone().ok_or(ConsoleError::NoIdlLoaded)?;
        let form = FormInputState::for_instruction(idl.instruction(name)?);
        self.selection = Some(Selection {
            instruction: name.to_string(),
            form,
            last_result: None,
        });
        self.invalidate();
        self.selected_instruction().ok_or(ConsoleError::NoInstructionSelected)
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.instruction.as_str())
    }

    pub fn selected_instruction(&self) -> Option<&IdlInstruction> {
        let name = self.selected_name()?;
        self.idl.as_deref()?.instruction(name).ok()
    }

    pub fn form(&self) -> Option<&FormInputState> {
        self.selection.as_ref().map(|s| &s.form)
    }

    pub fn last_result(&self) -> Option<&InvocationResult> {
        self.selection.as_ref().and_then(|s| s.last_result.as_ref())
    }

    pub fn set_field(
        &mut self,
        kind: FieldKind,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ConsoleError> {
        let selection = self.selection.as_mut().ok_or(ConsoleError::NoInstructionSelected)?;
        selection.form.set(kind, name, value)
    }

    pub fn clear_field(&mut self, kind: FieldKind, name: &str) -> Result<(), ConsoleError> {
        let selection = self.selection.as_mut().ok_or(ConsoleError::NoInstructionSelected)?;
        selection.form.clear(kind, name)
    }

    pub fn connect(&mut self, signer: Arc<dyn TransactionSigner>) {
        self.signer = Some(signer);
    }

    /// Returns whether a signer was connected.
    pub fn disconnect(&mut self) -> bool {
        self.signer.take().is_some()
    }

    pub fn signer_address(&self) -> Option<Pubkey> {
        self.signer.as_ref().and_then(|s| s.address())
    }

    /// Explicit program id, else the IDL's `address`.
    pub fn program_id(&self) -> Result<Pubkey, ConsoleError> {
        if let Some(id) = self.program_override {
            return Ok(id);
        }
        let address = self
            .loaded_idl()?
            .program_address()
            .ok_or(ConsoleError::ProgramIdUnknown)?;
        parse_address(address).map_err(|_| ConsoleError::InvalidAddress {
            name: "address".to_string(),
            value: address.to_string(),
        })
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Assemble and encode the current form without touching state.
    pub fn prepare(&self) -> Result<PreparedInvocation, ConsoleError> {
        let idl = self.loaded_idl()?;
        let selection = self.selection.as_ref().ok_or(ConsoleError::NoInstructionSelected)?;
        let ix = idl.instruction(&selection.instruction)?;
        let program_id = self.program_id()?;
        let call = Assembler::new(idl, Some(program_id)).assemble(ix, &selection.form)?;
        prepare_invocation(idl, ix, call, program_id)
    }

    /// Start a submission. Refused while another one is in flight.
    pub fn begin_submission(&mut self) -> Result<PendingInvocation, ConsoleError> {
        if self.in_flight.is_some() {
            return Err(ConsoleError::SubmissionInProgress);
        }
        let signer = self.signer.clone().ok_or(SignerError::NotConnected)?;
        let prepared = self.prepare()?;

        self.serial += 1;
        let ticket = SubmitTicket {
            generation: self.generation,
            serial: self.serial,
        };
        self.in_flight = Some(ticket);
        Ok(PendingInvocation { ticket, prepared, signer })
    }

    /// Apply a result, unless the selection moved on since `ticket` was issued.
    pub fn finish_submission(
        &mut self,
        ticket: SubmitTicket,
        result: impl Into<InvocationResult>,
    ) -> Completion {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        if ticket.generation != self.generation {
            return Completion::Stale;
        }
        let result = result.into();
        if let Some(selection) = self.selection.as_mut() {
            selection.last_result = Some(result.clone());
        }
        Completion::Applied(result)
    }
}
