//! IDL (Interface Definition Language) types for Anchor-style programs.
//!
//! Both IDL generations deserialize into the same model: the legacy
//! spelling (`isMut`, `isSigner`, `publicKey`, `defined: "Name"`) and the
//! current one (`writable`, `signer`, `pubkey`, `defined: { name }`).
//! Documents are parsed and validated once, through
//! [`InterfaceDefinition::from_json`]; nothing downstream sees an
//! unvalidated document.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConsoleError;
use crate::index::InstructionIndex;
use crate::validation::validate_idl;

/// Raw IDL document as it appears on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Idl {
    /// Program address (current IDL generation only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<IdlMetadata>,
    #[serde(default)]
    pub instructions: Vec<IdlInstruction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<IdlTypeDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<IdlError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdlMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// An instruction in the IDL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlInstruction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<String>,
    /// Explicit 8-byte discriminator. Older IDLs leave it out and rely on
    /// the `global:<name>` sighash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Vec<u8>>,
    #[serde(default)]
    pub accounts: Vec<IdlAccountItem>,
    #[serde(default)]
    pub args: Vec<IdlArg>,
}

/// An account expected by an instruction.
///
/// `writable` and `signer` are informational: they are displayed and
/// forwarded as account metadata, never enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlAccountItem {
    pub name: String,
    #[serde(default, alias = "isMut")]
    pub writable: bool,
    #[serde(default, alias = "isSigner")]
    pub signer: bool,
    #[serde(default, alias = "isOptional", skip_serializing_if = "is_false")]
    pub optional: bool,
    /// Fixed address baked into the IDL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pda: Option<IdlPda>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<String>,
}

fn is_false(v: &bool) -> bool { !v }

/// Seeds an account address is derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlPda {
    pub seeds: Vec<IdlSeed>,
    /// Owning program when it is not the invoked one (associated token
    /// accounts, for instance). Resolves to 32 bytes like any seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<IdlSeed>,
}

/// A seed component for PDA derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum IdlSeed {
    #[serde(rename = "const")]
    Const { value: IdlSeedValue },
    #[serde(rename = "account")]
    Account { path: String },
    #[serde(rename = "arg")]
    Arg { path: String },
}

/// Constant seed bytes: a byte list (current IDLs) or a string (legacy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlSeedValue {
    Bytes(Vec<u8>),
    Text(String),
}

impl IdlSeedValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IdlSeedValue::Bytes(bytes) => bytes,
            IdlSeedValue::Text(text) => text.as_bytes(),
        }
    }
}

/// An instruction argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlArg {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: IdlType,
}

/// Type representation in the IDL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlType {
    Primitive(String),
    Vec { vec: Box<IdlType> },
    Option { option: Box<IdlType> },
    Defined { defined: IdlDefinedRef },
    Array { array: (Box<IdlType>, usize) },
}

impl IdlType {
    /// True for the address primitive in either IDL generation.
    pub fn is_address(&self) -> bool {
        matches!(self, IdlType::Primitive(p) if p == "publicKey" || p == "pubkey")
    }
}

/// Reference to a user-defined type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlDefinedRef {
    Name(String),
    Named { name: String },
}

impl IdlDefinedRef {
    pub fn name(&self) -> &str {
        match self {
            IdlDefinedRef::Name(name) | IdlDefinedRef::Named { name } => name,
        }
    }
}

/// Named type definition (struct or enum).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlTypeDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: IdlTypeDefBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlTypeDefBody {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<IdlEnumVariant>,
}

/// An enum variant. Only fieldless variants can be entered as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlEnumVariant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

/// Error definition in the IDL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlError {
    pub code: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl IdlInstruction {
    /// The 8-byte instruction discriminator.
    ///
    /// Uses the explicit IDL value when present, otherwise
    /// `sha256("global:<snake_case name>")[..8]`.
    pub fn discriminator(&self) -> [u8; 8] {
        if let Some(Ok(explicit)) = self.discriminator.as_deref().map(<[u8; 8]>::try_from) {
            return explicit;
        }
        sighash("global", &to_snake_case(&self.name))
    }

    pub fn arg(&self, name: &str) -> Option<&IdlArg> {
        self.args.iter().find(|a| a.name == name)
    }

    pub fn account(&self, name: &str) -> Option<&IdlAccountItem> {
        self.accounts.iter().find(|a| a.name == name)
    }
}

/// `sha256("<namespace>:<name>")[..8]`
pub fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// `initializeVault` → `initialize_vault`, `mintNFT` → `mint_nft`.
///
/// Word boundaries follow the `heck` rules Anchor hashes legacy names
/// with: a lowercase letter or digit followed by an uppercase letter, the
/// last capital of an uppercase run that continues in lowercase
/// (`NFTMint` → `nft_mint`), and any non-alphanumeric separator.
pub fn to_snake_case(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for chunk in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let chars: Vec<char> = chunk.chars().collect();
        let mut word = String::new();
        let mut prev_lower = false;
        for (i, &ch) in chars.iter().enumerate() {
            let next = chars.get(i + 1).copied();
            let run_ends = ch.is_ascii_uppercase()
                && i > 0
                && chars[i - 1].is_ascii_uppercase()
                && next.is_some_and(|n| n.is_ascii_lowercase());
            if !word.is_empty() && ((prev_lower && ch.is_ascii_uppercase()) || run_ends) {
                words.push(std::mem::take(&mut word));
            }
            word.push(ch.to_ascii_lowercase());
            if ch.is_ascii_lowercase() {
                prev_lower = true;
            } else if ch.is_ascii_uppercase() {
                prev_lower = false;
            }
        }
        if !word.is_empty() {
            words.push(word);
        }
    }
    words.join("_")
}

/// A validated interface definition, immutable once loaded.
#[derive(Debug, Clone)]
pub struct InterfaceDefinition {
    idl: Idl,
    index: InstructionIndex,
}

impl InterfaceDefinition {
    /// Validate a deserialized document and build its instruction index.
    pub fn new(idl: Idl) -> Result<Self, ConsoleError> {
        validate_idl(&idl)?;
        let index = InstructionIndex::build(&idl.instructions);
        Ok(Self { idl, index })
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConsoleError> {
        let idl: Idl = serde_json::from_str(text)
            .map_err(|e| ConsoleError::invalid_idl(e.to_string()))?;
        Self::new(idl)
    }

    pub fn idl(&self) -> &Idl {
        &self.idl
    }

    pub fn instructions(&self) -> &[IdlInstruction] {
        &self.idl.instructions
    }

    /// Resolve an instruction by exact, case-sensitive name.
    pub fn instruction(&self, name: &str) -> Result<&IdlInstruction, ConsoleError> {
        self.index.resolve(&self.idl.instructions, name)
    }

    /// Program name from the legacy top-level field or current metadata.
    pub fn program_name(&self) -> &str {
        self.idl
            .name
            .as_deref()
            .or_else(|| self.idl.metadata.as_ref().and_then(|m| m.name.as_deref()))
            .unwrap_or("program")
    }

    pub fn program_version(&self) -> &str {
        self.idl
            .version
            .as_deref()
            .or_else(|| self.idl.metadata.as_ref().and_then(|m| m.version.as_deref()))
            .unwrap_or("0.0.0")
    }

    pub fn program_address(&self) -> Option<&str> {
        self.idl.address.as_deref()
    }

    pub fn type_def(&self, name: &str) -> Option<&IdlTypeDef> {
        self.idl.types.iter().find(|t| t.name == name)
    }
}
