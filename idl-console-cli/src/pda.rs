//! PDA (Program Derived Address) computation from IDL seed definitions.

use std::collections::HashMap;

use idl_console_core::idl::{IdlInstruction, IdlPda, IdlSeed, InterfaceDefinition};
use solana_sdk::pubkey::Pubkey;

use crate::address::parse_address;
use crate::assemble::BoundArgument;
use crate::coerce::CoercedValue;
use crate::serialize::encode_value;

/// Derive a PDA from its IDL seeds.
///
/// Account seeds must already be resolved in `accounts`; arg seeds use
/// the raw bytes of strings and addresses and the Borsh bytes of
/// everything else. The address is derived under `pda.program` when the
/// IDL names one, otherwise under `program_id`.
pub fn compute_pda_from_seeds(
    idl: &InterfaceDefinition,
    ix: &IdlInstruction,
    pda: &IdlPda,
    program_id: &Pubkey,
    accounts: &HashMap<String, Pubkey>,
    args: &[BoundArgument],
) -> Result<Pubkey, String> {
    let mut seed_bytes: Vec<Vec<u8>> = Vec::with_capacity(pda.seeds.len());
    for seed in &pda.seeds {
        let bytes = resolve_seed(idl, seed, accounts, args)?;
        if bytes.len() > 32 {
            return Err(format!("seed of {} bytes exceeds 32", bytes.len()));
        }
        seed_bytes.push(bytes);
    }

    let owner = match &pda.program {
        Some(seed) => {
            let bytes = resolve_seed(idl, seed, accounts, args)?;
            <[u8; 32]>::try_from(bytes.as_slice())
                .map(Pubkey::new_from_array)
                .map_err(|_| format!("PDA program resolved to {} bytes, expected 32", bytes.len()))?
        }
        None => *program_id,
    };

    let refs: Vec<&[u8]> = seed_bytes.iter().map(|s| s.as_slice()).collect();
    Pubkey::try_find_program_address(&refs, &owner)
        .map(|(address, _bump)| address)
        .ok_or_else(|| format!("no viable bump for PDA in '{}'", ix.name))
}

fn resolve_seed(
    idl: &InterfaceDefinition,
    seed: &IdlSeed,
    accounts: &HashMap<String, Pubkey>,
    args: &[BoundArgument],
) -> Result<Vec<u8>, String> {
    match seed {
        IdlSeed::Const { value } => Ok(value.as_bytes().to_vec()),
        IdlSeed::Account { path } => accounts
            .get(path)
            .map(|key| key.to_bytes().to_vec())
            .ok_or_else(|| format!("seed references account '{}' which is not resolved", path)),
        IdlSeed::Arg { path } => {
            let arg = args
                .iter()
                .find(|a| &a.name == path)
                .ok_or_else(|| format!("seed references unknown arg '{}'", path))?;
            arg_seed_bytes(idl, arg)
        }
    }
}

fn arg_seed_bytes(idl: &InterfaceDefinition, arg: &BoundArgument) -> Result<Vec<u8>, String> {
    match &arg.value {
        CoercedValue::Text(raw) if arg.type_.is_address() => {
            parse_address(raw).map(|key| key.to_bytes().to_vec())
        }
        CoercedValue::Text(raw) => Ok(raw.as_bytes().to_vec()),
        value => {
            let mut out = Vec::new();
            encode_value(&mut out, idl, &arg.name, &arg.type_, value).map_err(|e| e.to_string())?;
            Ok(out)
        }
    }
}
