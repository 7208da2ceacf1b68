//! # IDL Console Core
//!
//! Interface definition model, instruction index and error taxonomy
//! shared by the console front ends.

pub mod error;
pub mod types;
pub mod idl;
pub mod index;
pub mod validation;

pub mod prelude {
    pub use crate::error::{ConsoleError, ConsoleResult, SignerError};
    pub use crate::idl::{IdlAccountItem, IdlArg, IdlInstruction, IdlType, InterfaceDefinition};
    pub use crate::index::resolve;
    pub use crate::types::{FieldKind, IntKind, TypeTag};
}
