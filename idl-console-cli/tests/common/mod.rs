#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use idl_console::signer::{SimulationReport, SubmitOptions, TransactionSigner};
use idl_console::tx::PreparedInvocation;
use idl_console_core::error::SignerError;
use idl_console_core::idl::InterfaceDefinition;
use solana_sdk::pubkey::Pubkey;
use tokio::sync::Notify;

pub const VAULT_ADDR: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
pub const PROGRAM_ADDR: &str = "Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS";

/// Legacy-format IDL without a program address.
pub const VAULT_IDL: &str = r#"{
    "version": "0.1.0",
    "name": "vault",
    "instructions": [
        {
            "name": "deposit",
            "accounts": [
                {"name": "vault", "isMut": true, "isSigner": false},
                {"name": "systemProgram", "isMut": false, "isSigner": false}
            ],
            "args": [{"name": "amount", "type": "u64"}]
        },
        {
            "name": "initialize",
            "accounts": [
                {"name": "admin", "isMut": true, "isSigner": true},
                {"name": "config", "isMut": true, "isSigner": false},
                {"name": "systemProgram", "isMut": false, "isSigner": false}
            ],
            "args": [
                {"name": "feeBps", "type": "u16"},
                {"name": "paused", "type": "bool"},
                {"name": "label", "type": "string"},
                {"name": "cap", "type": "u128"}
            ]
        },
        {
            "name": "setAuthority",
            "accounts": [
                {"name": "config", "isMut": true, "isSigner": false},
                {"name": "admin", "isMut": false, "isSigner": true},
                {"name": "auditor", "isMut": false, "isSigner": false, "isOptional": true}
            ],
            "args": [
                {"name": "newAuthority", "type": "publicKey"},
                {"name": "delay", "type": {"option": "i64"}}
            ]
        }
    ]
}"#;

/// Current-format IDL with an address, PDA seeds and a defined enum.
pub const ESCROW_IDL: &str = r#"{
    "address": "Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS",
    "metadata": {"name": "escrow", "version": "0.2.0"},
    "instructions": [
        {
            "name": "open_escrow",
            "discriminator": [1, 2, 3, 4, 5, 6, 7, 8],
            "accounts": [
                {"name": "escrow", "writable": true, "pda": {"seeds": [
                    {"kind": "const", "value": [101, 115, 99, 114, 111, 119]},
                    {"kind": "account", "path": "maker"},
                    {"kind": "arg", "path": "seed"}
                ]}},
                {"name": "maker", "writable": true, "signer": true},
                {"name": "system_program", "address": "11111111111111111111111111111111"}
            ],
            "args": [
                {"name": "seed", "type": "u64"},
                {"name": "side", "type": {"defined": {"name": "Side"}}},
                {"name": "tag", "type": {"array": ["u8", 4]}}
            ]
        },
        {
            "name": "close_escrow",
            "accounts": [
                {"name": "escrow", "writable": true},
                {"name": "maker", "signer": true}
            ],
            "args": []
        }
    ],
    "types": [
        {"name": "Side", "type": {"kind": "enum", "variants": [{"name": "Bid"}, {"name": "Ask"}]}}
    ]
}"#;

pub fn vault_idl() -> InterfaceDefinition {
    InterfaceDefinition::from_json(VAULT_IDL).unwrap()
}

pub fn escrow_idl() -> InterfaceDefinition {
    InterfaceDefinition::from_json(ESCROW_IDL).unwrap()
}

pub fn pubkey(s: &str) -> Pubkey {
    s.parse().unwrap()
}

/// Signer double: answers with a fixed outcome, optionally waiting for a
/// release so a test can act while the submission is in flight.
pub struct FakeSigner {
    pub address: Pubkey,
    pub outcome: Result<String, SignerError>,
    pub gate: Option<Arc<Notify>>,
    pub calls: AtomicUsize,
}

impl FakeSigner {
    pub fn ok(signature: &str) -> Self {
        Self {
            address: Pubkey::new_unique(),
            outcome: Ok(signature.to_string()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: SignerError) -> Self {
        Self { outcome: Err(err), ..Self::ok("") }
    }

    pub fn gated(signature: &str, gate: Arc<Notify>) -> Self {
        Self { gate: Some(gate), ..Self::ok(signature) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSigner for FakeSigner {
    fn address(&self) -> Option<Pubkey> {
        Some(self.address)
    }

    async fn sign_and_submit(
        &self,
        _prepared: &PreparedInvocation,
        _options: &SubmitOptions,
    ) -> Result<String, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcome.clone()
    }

    async fn simulate(&self, _prepared: &PreparedInvocation) -> Result<SimulationReport, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map(|_| SimulationReport {
            units_consumed: Some(4200),
            logs: vec!["Program log: ok".to_string()],
        })
    }
}
