//! Instruction building: an assembled call becomes a Solana instruction.

use idl_console_core::error::ConsoleError;
use idl_console_core::idl::{IdlInstruction, InterfaceDefinition};
use serde::Serialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use crate::address::hex_encode;
use crate::assemble::{AccountSource, InvocationCall};
use crate::cli::to_pascal_case;
use crate::serialize::encode_instruction_data;

/// A fully built instruction, ready for a signer.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInvocation {
    pub call: InvocationCall,
    pub program_id: Pubkey,
    pub instruction: Instruction,
}

/// Build the instruction for an assembled call.
pub fn prepare_invocation(
    idl: &InterfaceDefinition,
    ix: &IdlInstruction,
    call: InvocationCall,
    program_id: Pubkey,
) -> Result<PreparedInvocation, ConsoleError> {
    let data = encode_instruction_data(idl, ix, &call.args)?;
    let accounts = call
        .accounts
        .iter()
        .map(|acc| match (acc.source, acc.writable) {
            (AccountSource::Omitted, _) => AccountMeta::new_readonly(acc.address, false),
            (_, true) => AccountMeta::new(acc.address, acc.signer),
            (_, false) => AccountMeta::new_readonly(acc.address, acc.signer),
        })
        .collect();
    Ok(PreparedInvocation {
        call,
        program_id,
        instruction: Instruction { program_id, accounts, data },
    })
}

/// JSON view of a prepared invocation, printed by `--dry-run`.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationSummary {
    pub program_id: String,
    pub instruction: String,
    pub args: Vec<ArgSummary>,
    pub accounts: Vec<AccountSummary>,
    pub data_hex: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgSummary {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub name: String,
    pub address: String,
    pub writable: bool,
    pub signer: bool,
    pub source: AccountSource,
}

impl PreparedInvocation {
    pub fn summary(&self) -> InvocationSummary {
        InvocationSummary {
            program_id: self.program_id.to_string(),
            instruction: self.call.instruction.clone(),
            args: self
                .call
                .args
                .iter()
                .map(|a| ArgSummary { name: a.name.clone(), value: a.value.to_string() })
                .collect(),
            accounts: self
                .call
                .accounts
                .iter()
                .map(|a| AccountSummary {
                    name: a.name.clone(),
                    address: a.address.to_string(),
                    writable: a.writable,
                    signer: a.signer,
                    source: a.source,
                })
                .collect(),
            data_hex: hex_encode(&self.instruction.data),
        }
    }
}

/// Print the prepared instruction for the operator.
pub fn print_prepared(prepared: &PreparedInvocation) {
    let call = &prepared.call;
    println!("📋 Instruction: {}", call.instruction);
    println!();
    println!("Accounts:");
    for acc in &call.accounts {
        let mut flags = vec![];
        if acc.writable { flags.push("mut"); }
        if acc.signer { flags.push("signer"); }
        let flags_str = if flags.is_empty() { String::new() } else { format!(" [{}]", flags.join(", ")) };
        let note = match acc.source {
            AccountSource::Supplied => "",
            AccountSource::Fixed => " (fixed by IDL)",
            AccountSource::WellKnown => " (well-known)",
            AccountSource::Derived => " (PDA, auto-computed)",
            AccountSource::Omitted => " (optional, omitted)",
        };
        println!("  📦 {}{} → {}{}", acc.name, flags_str, acc.address, note);
    }
    println!();
    println!("Arguments (parsed):");
    for arg in &call.args {
        println!("  {} = {}", arg.name, arg.value);
    }
    println!();
    println!("🔧 Transaction:");
    println!("  program: {}", prepared.program_id);
    println!("  instruction: {} {{", to_pascal_case(&call.instruction));
    for arg in &call.args {
        println!("    {}: {},", arg.name, arg.value);
    }
    println!("  }}");
    println!();
    println!("  Instruction data ({} bytes):", prepared.instruction.data.len());
    println!("    {}", hex_encode(&prepared.instruction.data));
    println!();
}
