//! Signer collaborator.
//!
//! The console never holds key material itself: it hands a prepared
//! instruction to a [`TransactionSigner`] and reports whatever comes back.
//! [`RpcKeypairSigner`] is the stock implementation, signing with a local
//! keypair and talking to an RPC endpoint through the non-blocking client.

use std::fmt;

use async_trait::async_trait;
use idl_console_core::error::SignerError;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcSendTransactionConfig, RpcSimulateTransactionConfig};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::{Transaction, TransactionError};
use tracing::{debug, info};

use crate::tx::PreparedInvocation;

/// Options passed through to the signer untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    pub max_retries: Option<usize>,
    pub skip_preflight: bool,
}

/// Outcome of a successful simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub units_consumed: Option<u64>,
    pub logs: Vec<String>,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.units_consumed {
            Some(units) => write!(f, "simulation ok, {} compute units", units)?,
            None => write!(f, "simulation ok")?,
        }
        if !self.logs.is_empty() {
            write!(f, ", {} log line(s)", self.logs.len())?;
        }
        Ok(())
    }
}

#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Currently connected account, if any.
    fn address(&self) -> Option<Pubkey>;

    /// Sign and submit; returns the transaction signature.
    async fn sign_and_submit(
        &self,
        prepared: &PreparedInvocation,
        options: &SubmitOptions,
    ) -> Result<String, SignerError>;

    async fn simulate(&self, prepared: &PreparedInvocation) -> Result<SimulationReport, SignerError>;
}

pub struct RpcKeypairSigner {
    client: RpcClient,
    keypair: Keypair,
}

impl RpcKeypairSigner {
    pub fn new(rpc_url: impl Into<String>, commitment: CommitmentConfig, keypair: Keypair) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url.into(), commitment),
            keypair,
        }
    }

    async fn build_transaction(
        &self,
        prepared: &PreparedInvocation,
        partial: bool,
    ) -> Result<Transaction, SignerError> {
        let payer = self.keypair.pubkey();
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(map_client_error)?;
        let message = Message::new(&[prepared.instruction.clone()], Some(&payer));
        let mut tx = Transaction::new_unsigned(message);
        let signed = if partial {
            tx.try_partial_sign(&[&self.keypair], blockhash)
        } else {
            tx.try_sign(&[&self.keypair], blockhash)
        };
        signed.map_err(|e| SignerError::Rejected(e.to_string()))?;
        Ok(tx)
    }
}

#[async_trait]
impl TransactionSigner for RpcKeypairSigner {
    fn address(&self) -> Option<Pubkey> {
        Some(self.keypair.pubkey())
    }

    async fn sign_and_submit(
        &self,
        prepared: &PreparedInvocation,
        options: &SubmitOptions,
    ) -> Result<String, SignerError> {
        let tx = self.build_transaction(prepared, false).await?;
        let config = RpcSendTransactionConfig {
            skip_preflight: options.skip_preflight,
            max_retries: options.max_retries,
            ..Default::default()
        };
        debug!(?options, "sending transaction");
        let signature = self
            .client
            .send_transaction_with_config(&tx, config)
            .await
            .map_err(map_client_error)?;
        info!(%signature, instruction = %prepared.call.instruction, "transaction submitted");
        Ok(signature.to_string())
    }

    async fn simulate(&self, prepared: &PreparedInvocation) -> Result<SimulationReport, SignerError> {
        let tx = self.build_transaction(prepared, true).await?;
        let config = RpcSimulateTransactionConfig {
            sig_verify: false,
            replace_recent_blockhash: true,
            ..Default::default()
        };
        let result = self
            .client
            .simulate_transaction_with_config(&tx, config)
            .await
            .map_err(map_client_error)?
            .value;
        let logs = result.logs.unwrap_or_default();
        if let Some(err) = result.err {
            let tail = logs.last().map(|l| format!(" (last log: {l})")).unwrap_or_default();
            return Err(SignerError::Simulation(format!("{err}{tail}")));
        }
        Ok(SimulationReport { units_consumed: result.units_consumed, logs })
    }
}

fn matches_error_pattern(error_msg: &str, pattern: &str) -> bool {
    let normalized_msg = error_msg.to_lowercase().replace(' ', "");
    let normalized_pattern = pattern.to_lowercase().replace(' ', "");
    normalized_msg.contains(&normalized_pattern)
}

fn map_client_error(err: ClientError) -> SignerError {
    let message = err.to_string();
    if matches!(err.get_transaction_error(), Some(TransactionError::InsufficientFundsForFee))
        || matches_error_pattern(&message, "insufficient funds")
        || matches_error_pattern(&message, "insufficient lamports")
    {
        return SignerError::InsufficientFunds(message);
    }
    match err.kind() {
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => SignerError::Network(message),
        _ => SignerError::Rpc(message),
    }
}
