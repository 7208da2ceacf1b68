//! Configuration from environment variables, overridable by CLI flags.

use std::env;
use std::path::PathBuf;

use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::read_keypair_file;
use thiserror::Error;

use crate::address::parse_address;
use crate::cli::GlobalOptions;
use crate::signer::{RpcKeypairSigner, SubmitOptions};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";
pub const DEFAULT_IDL_SOURCE: &str = "idl.json";
pub const DEFAULT_MAX_RETRIES: usize = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("Failed to read keypair '{path}': {message}")]
    Keypair { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Target program; falls back to the IDL's `address` when unset
    pub program_id: Option<String>,
    pub keypair_path: PathBuf,
    /// File path, URL, or `-` for stdin
    pub idl_source: String,
    pub commitment: String,
    pub submit: SubmitOptions,
}

impl ConsoleConfig {
    /// Load `.env` if present, then read the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_retries = match lookup("IDL_CONSOLE_MAX_RETRIES") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "IDL_CONSOLE_MAX_RETRIES",
                message: format!("'{}' is not a count", raw),
            })?,
            None => DEFAULT_MAX_RETRIES,
        };
        let skip_preflight = match lookup("IDL_CONSOLE_SKIP_PREFLIGHT").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "IDL_CONSOLE_SKIP_PREFLIGHT",
                    message: format!("'{}' is not a boolean", other),
                })
            }
        };

        let config = Self {
            rpc_url: lookup("IDL_CONSOLE_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            program_id: lookup("IDL_CONSOLE_PROGRAM_ID"),
            keypair_path: lookup("IDL_CONSOLE_KEYPAIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_keypair_path(&lookup)),
            idl_source: lookup("IDL_CONSOLE_IDL").unwrap_or_else(|| DEFAULT_IDL_SOURCE.to_string()),
            commitment: lookup("IDL_CONSOLE_COMMITMENT").unwrap_or_else(|| "confirmed".to_string()),
            submit: SubmitOptions {
                max_retries: Some(max_retries),
                skip_preflight,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the environment.
    pub fn apply_overrides(&mut self, options: &GlobalOptions) -> Result<(), ConfigError> {
        if let Some(url) = &options.rpc_url {
            self.rpc_url = url.clone();
        }
        if let Some(program_id) = &options.program_id {
            self.program_id = Some(program_id.clone());
        }
        if let Some(path) = &options.keypair {
            self.keypair_path = PathBuf::from(path);
        }
        if let Some(idl) = &options.idl {
            self.idl_source = idl.clone();
        }
        if let Some(retries) = options.max_retries {
            self.submit.max_retries = Some(retries);
        }
        if options.skip_preflight {
            self.submit.skip_preflight = true;
        }
        self.validate()
    }

    /// The endpoint and program id are opaque; only emptiness is checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Empty("IDL_CONSOLE_RPC_URL"));
        }
        if self.program_id.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::Empty("IDL_CONSOLE_PROGRAM_ID"));
        }
        Ok(())
    }

    pub fn program_pubkey(&self) -> Result<Option<Pubkey>, ConfigError> {
        self.program_id
            .as_deref()
            .map(|raw| {
                parse_address(raw).map_err(|message| ConfigError::Invalid {
                    key: "IDL_CONSOLE_PROGRAM_ID",
                    message,
                })
            })
            .transpose()
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig, ConfigError> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(ConfigError::Invalid {
                key: "IDL_CONSOLE_COMMITMENT",
                message: format!("'{}' is not processed|confirmed|finalized", other),
            }),
        }
    }

    /// Read the keypair and connect it to the configured endpoint.
    pub fn connect_signer(&self) -> Result<RpcKeypairSigner, ConfigError> {
        let keypair = read_keypair_file(&self.keypair_path).map_err(|e| ConfigError::Keypair {
            path: self.keypair_path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(RpcKeypairSigner::new(
            self.rpc_url.clone(),
            self.commitment_config()?,
            keypair,
        ))
    }
}

fn default_keypair_path(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    let home = lookup("HOME").unwrap_or_else(|| ".".to_string());
    PathBuf::from(home).join(".config/solana/id.json")
}
