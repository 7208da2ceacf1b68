//! Raw per-field operator input for one selected instruction.

use std::collections::BTreeMap;

use idl_console_core::error::ConsoleError;
use idl_console_core::idl::IdlInstruction;
use idl_console_core::types::FieldKind;

/// Raw string inputs keyed by argument and account name.
///
/// The key sets are fixed at construction to the instruction's declared
/// names; a field is either unset or holds the operator's raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputState {
    args: BTreeMap<String, Option<String>>,
    accounts: BTreeMap<String, Option<String>>,
}

impl FormInputState {
    /// An empty form keyed exactly by `ix`'s argument and account names.
    pub fn for_instruction(ix: &IdlInstruction) -> Self {
        Self {
            args: ix.args.iter().map(|a| (a.name.clone(), None)).collect(),
            accounts: ix.accounts.iter().map(|a| (a.name.clone(), None)).collect(),
        }
    }

    fn fields(&self, kind: FieldKind) -> &BTreeMap<String, Option<String>> {
        match kind {
            FieldKind::Argument => &self.args,
            FieldKind::Account => &self.accounts,
        }
    }

    fn fields_mut(&mut self, kind: FieldKind) -> &mut BTreeMap<String, Option<String>> {
        match kind {
            FieldKind::Argument => &mut self.args,
            FieldKind::Account => &mut self.accounts,
        }
    }

    /// The raw value, if the field is declared and set.
    pub fn get(&self, kind: FieldKind, name: &str) -> Option<&str> {
        self.fields(kind).get(name).and_then(|v| v.as_deref())
    }

    pub fn set(
        &mut self,
        kind: FieldKind,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ConsoleError> {
        let slot = self
            .fields_mut(kind)
            .get_mut(name)
            .ok_or_else(|| ConsoleError::UnknownField { kind, name: name.to_string() })?;
        *slot = Some(value.into());
        Ok(())
    }

    pub fn clear(&mut self, kind: FieldKind, name: &str) -> Result<(), ConsoleError> {
        let slot = self
            .fields_mut(kind)
            .get_mut(name)
            .ok_or_else(|| ConsoleError::UnknownField { kind, name: name.to_string() })?;
        *slot = None;
        Ok(())
    }

    pub fn keys(&self, kind: FieldKind) -> impl Iterator<Item = &str> {
        self.fields(kind).keys().map(String::as_str)
    }

    /// Declared fields with their current values, for display.
    pub fn entries(&self, kind: FieldKind) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields(kind).iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}
