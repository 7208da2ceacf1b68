//! Invocation assembly: raw form values to an ordered, typed call.
//!
//! Arguments are bound positionally in declaration order. Accounts are
//! resolved in declaration order too; a blank account is filled from the
//! IDL's fixed address, then the well-known table, then its PDA seeds,
//! and only then reported missing.

use std::collections::HashMap;

use idl_console_core::error::ConsoleError;
use idl_console_core::idl::{IdlAccountItem, IdlInstruction, IdlType, InterfaceDefinition};
use idl_console_core::types::FieldKind;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::address::{parse_address, well_known_address};
use crate::coerce::{coerce, CoercedValue};
use crate::form::FormInputState;
use crate::pda::compute_pda_from_seeds;

/// An argument value bound to its declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgument {
    pub name: String,
    pub type_: IdlType,
    pub value: CoercedValue,
}

/// Where a resolved account address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSource {
    Supplied,
    Fixed,
    WellKnown,
    Derived,
    /// Omitted optional account, passed as the program id.
    Omitted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAccount {
    pub name: String,
    pub address: Pubkey,
    pub writable: bool,
    pub signer: bool,
    pub source: AccountSource,
}

/// The call shape handed to the instruction builder.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationCall {
    pub instruction: String,
    pub args: Vec<BoundArgument>,
    pub accounts: Vec<ResolvedAccount>,
}

impl InvocationCall {
    /// Argument values in declaration order.
    pub fn ordered_args(&self) -> impl Iterator<Item = &CoercedValue> {
        self.args.iter().map(|a| &a.value)
    }

    pub fn account(&self, name: &str) -> Option<Pubkey> {
        self.accounts.iter().find(|a| a.name == name).map(|a| a.address)
    }

    pub fn account_map(&self) -> HashMap<String, Pubkey> {
        self.accounts.iter().map(|a| (a.name.clone(), a.address)).collect()
    }
}

/// Assemble without PDA derivation.
pub fn assemble(ix: &IdlInstruction, form: &FormInputState) -> Result<InvocationCall, ConsoleError> {
    assemble_call(ix, form, None)
}

/// Assembler that can also derive PDA accounts for a known program.
pub struct Assembler<'a> {
    idl: &'a InterfaceDefinition,
    program_id: Option<Pubkey>,
}

impl<'a> Assembler<'a> {
    pub fn new(idl: &'a InterfaceDefinition, program_id: Option<Pubkey>) -> Self {
        Self { idl, program_id }
    }

    pub fn assemble(
        &self,
        ix: &IdlInstruction,
        form: &FormInputState,
    ) -> Result<InvocationCall, ConsoleError> {
        let ctx = self.program_id.as_ref().map(|id| (self.idl, id));
        assemble_call(ix, form, ctx)
    }
}

fn assemble_call(
    ix: &IdlInstruction,
    form: &FormInputState,
    pda_ctx: Option<(&InterfaceDefinition, &Pubkey)>,
) -> Result<InvocationCall, ConsoleError> {
    let mut args = Vec::with_capacity(ix.args.len());
    for arg in &ix.args {
        let raw = form
            .get(FieldKind::Argument, &arg.name)
            .ok_or_else(|| ConsoleError::MissingArgument { name: arg.name.clone() })?;
        args.push(BoundArgument {
            name: arg.name.clone(),
            type_: arg.type_.clone(),
            value: coerce(raw, arg.type_.tag())?,
        });
    }

    let mut resolved: Vec<Option<(Pubkey, AccountSource)>> = Vec::with_capacity(ix.accounts.len());
    for acc in &ix.accounts {
        resolved.push(resolve_direct(acc, form, pda_ctx.map(|(_, id)| id))?);
    }

    if let Some((idl, program_id)) = pda_ctx {
        derive_pdas(idl, ix, program_id, &args, &mut resolved);
    }

    let mut accounts = Vec::with_capacity(ix.accounts.len());
    for (acc, slot) in ix.accounts.iter().zip(resolved) {
        let (address, source) =
            slot.ok_or_else(|| ConsoleError::MissingAccount { name: acc.name.clone() })?;
        accounts.push(ResolvedAccount {
            name: acc.name.clone(),
            address,
            writable: acc.writable,
            signer: acc.signer,
            source,
        });
    }

    Ok(InvocationCall {
        instruction: ix.name.clone(),
        args,
        accounts,
    })
}

/// Resolve an account without looking at other accounts. `Ok(None)`
/// means "PDA, derive later".
fn resolve_direct(
    acc: &IdlAccountItem,
    form: &FormInputState,
    program_id: Option<&Pubkey>,
) -> Result<Option<(Pubkey, AccountSource)>, ConsoleError> {
    let invalid = |value: &str| ConsoleError::InvalidAddress {
        name: acc.name.clone(),
        value: value.to_string(),
    };

    let supplied = form
        .get(FieldKind::Account, &acc.name)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(raw) = supplied {
        let address = parse_address(raw).map_err(|_| invalid(raw))?;
        return Ok(Some((address, AccountSource::Supplied)));
    }
    if let Some(fixed) = &acc.address {
        let address = parse_address(fixed).map_err(|_| invalid(fixed))?;
        return Ok(Some((address, AccountSource::Fixed)));
    }
    if let Some(address) = well_known_address(&acc.name) {
        return Ok(Some((address, AccountSource::WellKnown)));
    }
    if acc.pda.is_some() && program_id.is_some() {
        return Ok(None);
    }
    match program_id {
        Some(id) if acc.optional => Ok(Some((*id, AccountSource::Omitted))),
        _ => Err(ConsoleError::MissingAccount { name: acc.name.clone() }),
    }
}

/// Derive deferred PDAs, repeating while progress is made so seeds may
/// reference other PDAs regardless of declaration order. Whatever stays
/// unresolved is reported missing by the caller.
fn derive_pdas(
    idl: &InterfaceDefinition,
    ix: &IdlInstruction,
    program_id: &Pubkey,
    args: &[BoundArgument],
    resolved: &mut [Option<(Pubkey, AccountSource)>],
) {
    loop {
        let known: HashMap<String, Pubkey> = ix
            .accounts
            .iter()
            .zip(resolved.iter())
            .filter_map(|(acc, slot)| slot.map(|(address, _)| (acc.name.clone(), address)))
            .collect();

        let mut progressed = false;
        for (acc, slot) in ix.accounts.iter().zip(resolved.iter_mut()) {
            let Some(pda) = acc.pda.as_ref().filter(|_| slot.is_none()) else {
                continue;
            };
            match compute_pda_from_seeds(idl, ix, pda, program_id, &known, args) {
                Ok(address) => {
                    debug!(account = %acc.name, %address, "derived PDA");
                    *slot = Some((address, AccountSource::Derived));
                    progressed = true;
                }
                Err(reason) => debug!(account = %acc.name, %reason, "PDA not derivable yet"),
            }
        }
        if !progressed {
            break;
        }
    }
}
