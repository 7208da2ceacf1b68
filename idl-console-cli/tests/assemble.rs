//! Form values to an ordered call with resolved accounts.

mod common;

use common::*;
use idl_console::address::{ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
use idl_console::assemble::{assemble, AccountSource, Assembler};
use idl_console::coerce::CoercedValue;
use idl_console::form::FormInputState;
use idl_console_core::error::ConsoleError;
use idl_console_core::types::{FieldKind, IntKind};
use num_bigint::BigInt;
use solana_sdk::pubkey::Pubkey;

fn form_for(idl: &idl_console_core::idl::InterfaceDefinition, name: &str) -> FormInputState {
    FormInputState::for_instruction(idl.instruction(name).unwrap())
}

#[test]
fn test_deposit_end_to_end() {
    let idl = vault_idl();
    let ix = idl.instruction("deposit").unwrap();
    let mut form = form_for(&idl, "deposit");
    form.set(FieldKind::Argument, "amount", "1000000").unwrap();
    form.set(FieldKind::Account, "vault", VAULT_ADDR).unwrap();

    let call = assemble(ix, &form).unwrap();

    let args: Vec<&CoercedValue> = call.ordered_args().collect();
    assert_eq!(
        args,
        vec![&CoercedValue::Int { kind: IntKind::new(64, false), value: BigInt::from(1_000_000u32) }]
    );
    let map = call.account_map();
    assert_eq!(map.len(), 2);
    assert_eq!(map["vault"], pubkey(VAULT_ADDR));
    assert_eq!(map["systemProgram"], SYSTEM_PROGRAM_ID);
    assert_eq!(call.accounts[1].source, AccountSource::WellKnown);
}

#[test]
fn test_args_follow_declaration_order() {
    let idl = vault_idl();
    let ix = idl.instruction("initialize").unwrap();
    let mut form = form_for(&idl, "initialize");
    // Set in reverse to make sure insertion order does not leak through.
    form.set(FieldKind::Argument, "cap", "340282366920938463463374607431768211455").unwrap();
    form.set(FieldKind::Argument, "label", "main").unwrap();
    form.set(FieldKind::Argument, "paused", "1").unwrap();
    form.set(FieldKind::Argument, "feeBps", "25").unwrap();
    form.set(FieldKind::Account, "admin", VAULT_ADDR).unwrap();
    form.set(FieldKind::Account, "config", PROGRAM_ADDR).unwrap();

    let call = assemble(ix, &form).unwrap();

    let names: Vec<&str> = call.args.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["feeBps", "paused", "label", "cap"]);
    assert_eq!(call.args[0].value, CoercedValue::U16(25));
    assert_eq!(call.args[1].value, CoercedValue::Bool(true));
    assert_eq!(call.args[2].value, CoercedValue::Text("main".into()));
    assert_eq!(call.args[3].value, CoercedValue::Int {
        kind: IntKind::new(128, false),
        value: BigInt::from(u128::MAX),
    });

    let accounts: Vec<&str> = call.accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(accounts, ["admin", "config", "systemProgram"]);
    assert!(call.accounts[0].writable && call.accounts[0].signer);
}

#[test]
fn test_missing_admin_account() {
    let idl = vault_idl();
    let ix = idl.instruction("initialize").unwrap();
    let mut form = form_for(&idl, "initialize");
    for (name, value) in [("feeBps", "1"), ("paused", "false"), ("label", "x"), ("cap", "0")] {
        form.set(FieldKind::Argument, name, value).unwrap();
    }
    form.set(FieldKind::Account, "config", PROGRAM_ADDR).unwrap();

    assert_eq!(
        assemble(ix, &form).unwrap_err(),
        ConsoleError::MissingAccount { name: "admin".into() }
    );
}

#[test]
fn test_blank_account_counts_as_missing() {
    let idl = vault_idl();
    let ix = idl.instruction("deposit").unwrap();
    let mut form = form_for(&idl, "deposit");
    form.set(FieldKind::Argument, "amount", "1").unwrap();
    form.set(FieldKind::Account, "vault", "   ").unwrap();

    assert_eq!(
        assemble(ix, &form).unwrap_err(),
        ConsoleError::MissingAccount { name: "vault".into() }
    );
}

#[test]
fn test_missing_argument_reported_before_accounts() {
    let idl = vault_idl();
    let ix = idl.instruction("deposit").unwrap();
    let form = form_for(&idl, "deposit");

    assert_eq!(
        assemble(ix, &form).unwrap_err(),
        ConsoleError::MissingArgument { name: "amount".into() }
    );
}

#[test]
fn test_invalid_address_names_the_account() {
    let idl = vault_idl();
    let ix = idl.instruction("deposit").unwrap();
    let mut form = form_for(&idl, "deposit");
    form.set(FieldKind::Argument, "amount", "1").unwrap();
    form.set(FieldKind::Account, "vault", "9xQe...").unwrap();

    assert_eq!(
        assemble(ix, &form).unwrap_err(),
        ConsoleError::InvalidAddress { name: "vault".into(), value: "9xQe...".into() }
    );
}

#[test]
fn test_supplied_value_overrides_well_known() {
    let idl = vault_idl();
    let ix = idl.instruction("deposit").unwrap();
    let mut form = form_for(&idl, "deposit");
    form.set(FieldKind::Argument, "amount", "1").unwrap();
    form.set(FieldKind::Account, "vault", VAULT_ADDR).unwrap();
    form.set(FieldKind::Account, "systemProgram", PROGRAM_ADDR).unwrap();

    let call = assemble(ix, &form).unwrap();
    assert_eq!(call.account("systemProgram"), Some(pubkey(PROGRAM_ADDR)));
    assert_eq!(call.accounts[1].source, AccountSource::Supplied);
}

#[test]
fn test_hex_address_accepted() {
    let idl = vault_idl();
    let ix = idl.instruction("deposit").unwrap();
    let key = Pubkey::new_from_array([0xab; 32]);
    let mut form = form_for(&idl, "deposit");
    form.set(FieldKind::Argument, "amount", "1").unwrap();
    form.set(FieldKind::Account, "vault", format!("0x{}", "ab".repeat(32))).unwrap();

    assert_eq!(assemble(ix, &form).unwrap().account("vault"), Some(key));

    form.set(FieldKind::Account, "vault", "ab".repeat(32)).unwrap();
    assert_eq!(assemble(ix, &form).unwrap().account("vault"), Some(key));
}

#[test]
fn test_pda_and_fixed_accounts_with_program_id() {
    let idl = escrow_idl();
    let ix = idl.instruction("open_escrow").unwrap();
    let program_id = pubkey(PROGRAM_ADDR);
    let maker = Pubkey::new_unique();
    let mut form = form_for(&idl, "open_escrow");
    form.set(FieldKind::Argument, "seed", "7").unwrap();
    form.set(FieldKind::Argument, "side", "Ask").unwrap();
    form.set(FieldKind::Argument, "tag", "abcd").unwrap();
    form.set(FieldKind::Account, "maker", maker.to_string()).unwrap();

    let call = Assembler::new(&idl, Some(program_id)).assemble(ix, &form).unwrap();

    let (expected, _) = Pubkey::find_program_address(
        &[b"escrow", maker.as_ref(), &7u64.to_le_bytes()],
        &program_id,
    );
    assert_eq!(call.account("escrow"), Some(expected));
    assert_eq!(call.accounts[0].source, AccountSource::Derived);
    assert_eq!(call.account("system_program"), Some(SYSTEM_PROGRAM_ID));
    assert_eq!(call.accounts[2].source, AccountSource::Fixed);
}

#[test]
fn test_pda_not_derived_without_program_id() {
    let idl = escrow_idl();
    let ix = idl.instruction("open_escrow").unwrap();
    let mut form = form_for(&idl, "open_escrow");
    form.set(FieldKind::Argument, "seed", "7").unwrap();
    form.set(FieldKind::Argument, "side", "Ask").unwrap();
    form.set(FieldKind::Argument, "tag", "abcd").unwrap();
    form.set(FieldKind::Account, "maker", VAULT_ADDR).unwrap();

    assert_eq!(
        assemble(ix, &form).unwrap_err(),
        ConsoleError::MissingAccount { name: "escrow".into() }
    );
}

#[test]
fn test_optional_account_omitted_as_program_id() {
    let idl = vault_idl();
    let ix = idl.instruction("setAuthority").unwrap();
    let program_id = pubkey(PROGRAM_ADDR);
    let mut form = form_for(&idl, "setAuthority");
    form.set(FieldKind::Argument, "newAuthority", VAULT_ADDR).unwrap();
    form.set(FieldKind::Argument, "delay", "").unwrap();
    form.set(FieldKind::Account, "config", VAULT_ADDR).unwrap();
    form.set(FieldKind::Account, "admin", VAULT_ADDR).unwrap();

    let call = Assembler::new(&idl, Some(program_id)).assemble(ix, &form).unwrap();
    assert_eq!(call.account("auditor"), Some(program_id));
    assert_eq!(call.accounts[2].source, AccountSource::Omitted);

    // Without a program id there is nothing to stand in for it.
    assert_eq!(
        assemble(ix, &form).unwrap_err(),
        ConsoleError::MissingAccount { name: "auditor".into() }
    );
}

fn token_account_idl(program_seed: &str) -> idl_console_core::idl::InterfaceDefinition {
    let text = format!(
        r#"{{
            "address": "{program}",
            "metadata": {{"name": "wallet", "version": "0.1.0"}},
            "instructions": [{{
                "name": "fund",
                "discriminator": [9, 9, 9, 9, 9, 9, 9, 9],
                "accounts": [
                    {{"name": "owner_token", "writable": true, "pda": {{
                        "seeds": [
                            {{"kind": "account", "path": "owner"}},
                            {{"kind": "account", "path": "token_program"}},
                            {{"kind": "account", "path": "mint"}}
                        ],
                        "program": {program_seed}
                    }}}},
                    {{"name": "owner", "signer": true}},
                    {{"name": "mint"}},
                    {{"name": "token_program"}},
                    {{"name": "associated_token_program"}}
                ],
                "args": []
            }}]
        }}"#,
        program = PROGRAM_ADDR,
        program_seed = program_seed,
    );
    idl_console_core::idl::InterfaceDefinition::from_json(&text).unwrap()
}

#[test]
fn test_pda_derived_under_its_declared_program() {
    let owner = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let (expected, _) = Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    );
    let (under_target, _) = Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &pubkey(PROGRAM_ADDR),
    );
    assert_ne!(expected, under_target);

    let const_program = format!(
        r#"{{"kind": "const", "value": {:?}}}"#,
        ASSOCIATED_TOKEN_PROGRAM_ID.to_bytes()
    );
    let account_program = r#"{"kind": "account", "path": "associated_token_program"}"#;

    for program_seed in [const_program.as_str(), account_program] {
        let idl = token_account_idl(program_seed);
        let ix = idl.instruction("fund").unwrap();
        let mut form = form_for(&idl, "fund");
        form.set(FieldKind::Account, "owner", owner.to_string()).unwrap();
        form.set(FieldKind::Account, "mint", mint.to_string()).unwrap();

        let call = Assembler::new(&idl, Some(pubkey(PROGRAM_ADDR))).assemble(ix, &form).unwrap();
        assert_eq!(call.account("owner_token"), Some(expected));
        assert_eq!(call.accounts[0].source, AccountSource::Derived);
    }
}
