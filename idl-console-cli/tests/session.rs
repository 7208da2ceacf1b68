//! Session transitions and ticketed submissions.

mod common;

use std::sync::Arc;

use common::*;
use idl_console::session::{Completion, InvocationResult, Session};
use idl_console_core::error::{ConsoleError, SignerError};
use idl_console_core::types::FieldKind;

fn keys(session: &Session, kind: FieldKind) -> Vec<String> {
    session.form().unwrap().keys(kind).map(str::to_string).collect()
}

fn ready_deposit() -> Session {
    let mut session = Session::with_program_id(Some(pubkey(PROGRAM_ADDR)));
    session.load_idl(vault_idl());
    session.select_instruction("deposit").unwrap();
    session.set_field(FieldKind::Argument, "amount", "5").unwrap();
    session.set_field(FieldKind::Account, "vault", VAULT_ADDR).unwrap();
    session.connect(Arc::new(FakeSigner::ok("sig")));
    session
}

#[test]
fn test_switch_resets_form_to_new_key_set() {
    let mut session = Session::new();
    session.load_idl(vault_idl());

    session.select_instruction("deposit").unwrap();
    session.set_field(FieldKind::Argument, "amount", "5").unwrap();
    assert_eq!(keys(&session, FieldKind::Argument), ["amount"]);

    session.select_instruction("initialize").unwrap();
    let mut args = keys(&session, FieldKind::Argument);
    args.sort();
    assert_eq!(args, ["cap", "feeBps", "label", "paused"]);
    let mut accounts = keys(&session, FieldKind::Account);
    accounts.sort();
    assert_eq!(accounts, ["admin", "config", "systemProgram"]);
    assert!(session.form().unwrap().entries(FieldKind::Argument).all(|(_, v)| v.is_none()));

    // Reselecting the same instruction also starts from an empty form.
    session.set_field(FieldKind::Argument, "label", "x").unwrap();
    session.select_instruction("initialize").unwrap();
    assert_eq!(session.form().unwrap().get(FieldKind::Argument, "label"), None);
}

#[test]
fn test_unknown_instruction_leaves_state_untouched() {
    let mut session = Session::new();
    session.load_idl(vault_idl());
    session.select_instruction("deposit").unwrap();
    session.set_field(FieldKind::Argument, "amount", "5").unwrap();
    let before = session.form().cloned();

    let err = session.select_instruction("Deposit").unwrap_err();
    assert_eq!(err, ConsoleError::InstructionNotFound { name: "Deposit".into() });
    assert_eq!(session.selected_name(), Some("deposit"));
    assert_eq!(session.form().cloned(), before);
}

#[test]
fn test_unknown_field_is_rejected() {
    let mut session = Session::new();
    session.load_idl(vault_idl());
    session.select_instruction("deposit").unwrap();

    assert_eq!(
        session.set_field(FieldKind::Argument, "vault", "x").unwrap_err(),
        ConsoleError::UnknownField { kind: FieldKind::Argument, name: "vault".into() }
    );
    assert_eq!(
        session.set_field(FieldKind::Account, "owner", "x").unwrap_err(),
        ConsoleError::UnknownField { kind: FieldKind::Account, name: "owner".into() }
    );
}

#[test]
fn test_operations_before_load_or_select() {
    let mut session = Session::new();
    assert_eq!(session.select_instruction("deposit").unwrap_err(), ConsoleError::NoIdlLoaded);
    session.load_idl(vault_idl());
    assert_eq!(
        session.set_field(FieldKind::Argument, "amount", "1").unwrap_err(),
        ConsoleError::NoInstructionSelected
    );
}

#[test]
fn test_program_id_falls_back_to_idl_address() {
    let mut session = Session::new();
    session.load_idl(vault_idl());
    assert_eq!(session.program_id().unwrap_err(), ConsoleError::ProgramIdUnknown);

    session.load_idl(escrow_idl());
    assert_eq!(session.program_id().unwrap(), pubkey(PROGRAM_ADDR));
}

#[test]
fn test_submit_requires_signer() {
    let mut session = ready_deposit();
    session.disconnect();
    assert_eq!(
        session.begin_submission().err(),
        Some(ConsoleError::Signer(SignerError::NotConnected))
    );
    assert!(!session.is_submitting());
}

#[test]
fn test_second_submission_refused_while_in_flight() {
    let mut session = ready_deposit();
    let pending = session.begin_submission().unwrap();
    assert!(session.is_submitting());
    assert_eq!(session.begin_submission().err(), Some(ConsoleError::SubmissionInProgress));

    let completion = session.finish_submission(pending.ticket, Ok::<_, SignerError>("sig".to_string()));
    assert_eq!(completion, Completion::Applied(InvocationResult::Success("sig".into())));
    assert!(!session.is_submitting());
    assert_eq!(session.last_result(), Some(&InvocationResult::Success("sig".into())));
}

#[test]
fn test_late_result_after_switch_is_discarded() {
    let mut session = ready_deposit();
    let pending = session.begin_submission().unwrap();

    session.select_instruction("initialize").unwrap();
    let completion = session.finish_submission(pending.ticket, Ok::<_, SignerError>("sig".to_string()));

    assert_eq!(completion, Completion::Stale);
    assert_eq!(session.last_result(), None);
    assert!(!session.is_submitting());
}

#[test]
fn test_reselecting_keeps_in_flight_guard_until_stale_result_returns() {
    let mut session = ready_deposit();
    let pending = session.begin_submission().unwrap();

    session.select_instruction("deposit").unwrap();
    session.set_field(FieldKind::Argument, "amount", "6").unwrap();
    session.set_field(FieldKind::Account, "vault", VAULT_ADDR).unwrap();
    assert!(session.is_submitting());
    assert_eq!(session.begin_submission().err(), Some(ConsoleError::SubmissionInProgress));

    let completion = session.finish_submission(pending.ticket, Ok::<_, SignerError>("old".to_string()));
    assert_eq!(completion, Completion::Stale);
    assert!(!session.is_submitting());
    assert!(session.begin_submission().is_ok());
}

#[test]
fn test_failed_assembly_does_not_start_submission() {
    let mut session = ready_deposit();
    session.set_field(FieldKind::Argument, "amount", "five").unwrap();

    assert!(matches!(
        session.begin_submission(),
        Err(ConsoleError::InvalidNumericLiteral { .. })
    ));
    assert!(!session.is_submitting());
    assert_eq!(session.form().unwrap().get(FieldKind::Argument, "amount"), Some("five"));
}

#[test]
fn test_signer_error_recorded_verbatim() {
    let mut session = ready_deposit();
    let pending = session.begin_submission().unwrap();
    let err = SignerError::Rejected("User rejected the request.".into());

    let completion = session.finish_submission(pending.ticket, Err::<String, _>(err.clone()));
    assert_eq!(completion, Completion::Applied(InvocationResult::Failure(err.to_string())));
}
