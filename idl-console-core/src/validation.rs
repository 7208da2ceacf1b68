//! Shape checks run once when an IDL is loaded.
//!
//! Only presence and uniqueness are checked; type names are not
//! validated against a schema.

use std::collections::HashSet;

use crate::error::ConsoleError;
use crate::idl::{Idl, IdlInstruction};

/// Validate a deserialized IDL document.
pub fn validate_idl(idl: &Idl) -> Result<(), ConsoleError> {
    let mut seen = HashSet::new();
    for ix in &idl.instructions {
        if ix.name.is_empty() {
            return Err(ConsoleError::invalid_idl("instruction with empty name"));
        }
        if !seen.insert(ix.name.as_str()) {
            return Err(ConsoleError::invalid_idl(format!(
                "duplicate instruction '{}'",
                ix.name
            )));
        }
        validate_instruction(ix)?;
    }
    Ok(())
}

fn validate_instruction(ix: &IdlInstruction) -> Result<(), ConsoleError> {
    if let Some(disc) = &ix.discriminator {
        if disc.len() != 8 {
            return Err(ConsoleError::invalid_idl(format!(
                "instruction '{}' has a {}-byte discriminator, expected 8",
                ix.name,
                disc.len()
            )));
        }
    }
    check_names(&ix.name, "argument", ix.args.iter().map(|a| a.name.as_str()))?;
    check_names(&ix.name, "account", ix.accounts.iter().map(|a| a.name.as_str()))?;
    Ok(())
}

fn check_names<'a>(
    instruction: &str,
    kind: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConsoleError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(ConsoleError::invalid_idl(format!(
                "instruction '{instruction}' has an {kind} with empty name"
            )));
        }
        if !seen.insert(name) {
            return Err(ConsoleError::invalid_idl(format!(
                "instruction '{instruction}' declares {kind} '{name}' twice"
            )));
        }
    }
    Ok(())
}
