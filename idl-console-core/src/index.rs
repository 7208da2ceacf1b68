//! Instruction lookup by name.
//!
//! The index is an explicit name → position map built once when an
//! [`InterfaceDefinition`](crate::idl::InterfaceDefinition) is loaded.
//! Lookups are exact and case-sensitive.

use std::collections::HashMap;

use crate::error::ConsoleError;
use crate::idl::{IdlInstruction, InterfaceDefinition};

#[derive(Debug, Clone, Default)]
pub struct InstructionIndex {
    positions: HashMap<String, usize>,
}

impl InstructionIndex {
    /// Build the index. Names are assumed unique (checked by validation);
    /// on a duplicate the first declaration wins.
    pub fn build(instructions: &[IdlInstruction]) -> Self {
        let mut positions = HashMap::with_capacity(instructions.len());
        for (i, ix) in instructions.iter().enumerate() {
            positions.entry(ix.name.clone()).or_insert(i);
        }
        Self { positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn resolve<'a>(
        &self,
        instructions: &'a [IdlInstruction],
        name: &str,
    ) -> Result<&'a IdlInstruction, ConsoleError> {
        self.position(name)
            .and_then(|i| instructions.get(i))
            .ok_or_else(|| ConsoleError::InstructionNotFound { name: name.to_string() })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Resolve `name` in `idl`, returning the instruction with its argument
/// and account lists in declaration order.
pub fn resolve<'a>(
    idl: &'a InterfaceDefinition,
    name: &str,
) -> Result<&'a IdlInstruction, ConsoleError> {
    idl.instruction(name)
}
