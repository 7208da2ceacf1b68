//! CLI helpers: option parsing, help text, string utilities.

use std::collections::HashMap;

use idl_console_core::error::ConsoleError;
use idl_console_core::idl::{IdlInstruction, IdlType, InterfaceDefinition};
use idl_console_core::types::FieldKind;

use crate::form::FormInputState;

/// Options accepted before the command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub idl: Option<String>,
    pub rpc_url: Option<String>,
    pub program_id: Option<String>,
    pub keypair: Option<String>,
    pub max_retries: Option<usize>,
    pub skip_preflight: bool,
    pub simulate: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// Split global options from the command and its arguments.
///
/// Global options may appear anywhere; everything else is returned in order.
pub fn parse_global_options(args: &[String]) -> Result<(GlobalOptions, Vec<String>), String> {
    let mut options = GlobalOptions::default();
    let mut rest = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        let mut value = || -> Result<String, String> {
            i += 1;
            args.get(i).cloned().ok_or_else(|| format!("{} requires a value", arg))
        };
        match arg {
            "-i" | "--idl" => options.idl = Some(value()?),
            "-u" | "--url" => options.rpc_url = Some(value()?),
            "-p" | "--program-id" => options.program_id = Some(value()?),
            "-k" | "--keypair" => options.keypair = Some(value()?),
            "--max-retries" => {
                let raw = value()?;
                options.max_retries =
                    Some(raw.parse().map_err(|_| format!("--max-retries: '{}' is not a count", raw))?);
            }
            "--skip-preflight" => options.skip_preflight = true,
            "--simulate" => options.simulate = true,
            "--dry-run" => options.dry_run = true,
            "--json" => options.json = true,
            _ => rest.push(arg.to_string()),
        }
        i += 1;
    }
    Ok((options, rest))
}

/// Print help for all commands derived from the IDL.
pub fn print_help(idl: &InterfaceDefinition, binary_name: &str) {
    println!("🔧 {} v{} — IDL-driven console", idl.program_name(), idl.program_version());
    println!();
    println!("USAGE:");
    println!("  {} [OPTIONS] <COMMAND> [ARGS]", binary_name);
    println!();
    println!("OPTIONS:");
    println!("  -i, --idl <FILE|URL|->     IDL JSON source");
    println!("  -u, --url <URL>            RPC endpoint");
    println!("  -p, --program-id <ADDR>    Target program (defaults to the IDL address)");
    println!("  -k, --keypair <FILE>       Signer keypair");
    println!("  --max-retries <N>          Retry count passed to the RPC node");
    println!("  --skip-preflight           Skip preflight checks when sending");
    println!("  --simulate                 Simulate instead of sending");
    println!("  --dry-run                  Print the built instruction without contacting the RPC");
    println!("  --json                     With --dry-run, print the instruction as JSON");
    println!();
    println!("COMMANDS:");
    println!("  idl                        Print IDL information");
    println!("  repl                       Interactive session");

    for ix in idl.instructions() {
        let cmd = snake_to_kebab(&ix.name);
        let args_desc: Vec<String> = ix.args.iter()
            .map(|a| format!("--{} <{}>", snake_to_kebab(&a.name), idl_type_hint(&a.type_)))
            .collect();
        let acct_desc: Vec<String> = ix.accounts.iter()
            .map(|a| format!("--{}-account <ADDR>", snake_to_kebab(&a.name)))
            .collect();
        let all_args: Vec<String> = args_desc.into_iter().chain(acct_desc).collect();
        println!("  {:<20} {}", cmd, all_args.join(" "));
    }
    println!();
    println!("TYPE FORMATS:");
    println!("  u8..u256, i8..i256    Decimal integer");
    println!("  f32, f64              Decimal number");
    println!("  bool                  true|1 (anything else is false)");
    println!("  pubkey                Base58 or 64 hex chars");
    println!("  [u8; N]               Hex string (2*N hex chars) or UTF-8 string (≤N chars, right-padded)");
    println!("  Vec<T>, [T; N]        Comma-separated elements");
    println!("  Option<T>             Empty, null or none for None");
    println!();
    println!("Blank accounts are filled from the IDL address, well-known programs, or PDA seeds.");
}

/// Print detailed help for a single instruction.
pub fn print_instruction_help(ix: &IdlInstruction) {
    println!("📋 {} — {} account(s), {} arg(s)", ix.name, ix.accounts.len(), ix.args.len());
    for doc in &ix.docs {
        println!("   {}", doc);
    }
    println!();
    println!("ACCOUNTS:");
    for acc in &ix.accounts {
        let mut flags = vec![];
        if acc.writable { flags.push("mut"); }
        if acc.signer { flags.push("signer"); }
        if acc.optional { flags.push("optional"); }
        let flags_str = if flags.is_empty() { String::new() } else { format!(" [{}]", flags.join(", ")) };
        let note = if acc.pda.is_some() {
            " (PDA — auto-computed)"
        } else if acc.address.is_some() {
            " (fixed address)"
        } else {
            ""
        };
        println!("  {}{}{}", acc.name, flags_str, note);
    }
    println!();
    println!("ARGS:");
    for arg in &ix.args {
        println!("  --{:<25} {} ({}) — format: {}",
            snake_to_kebab(&arg.name), arg.name, idl_type_display(&arg.type_), idl_type_hint(&arg.type_));
    }
    for acc in &ix.accounts {
        println!("  --{}-account    Address for '{}'", snake_to_kebab(&acc.name), acc.name);
    }
}

/// Parse `--key value` pairs. A flag without a value is recorded as "true".
pub fn parse_instruction_args(args: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut i = 0;
    while i < args.len() {
        if let Some(key) = args[i].strip_prefix("--") {
            if i + 1 < args.len() && !args[i + 1].starts_with("--") {
                map.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                map.insert(key.to_string(), "true".to_string());
                i += 1;
            }
        } else {
            i += 1;
        }
    }
    map
}

pub fn wants_help(flags: &HashMap<String, String>) -> bool {
    flags.contains_key("help") || flags.contains_key("h")
}

/// Build a form for `ix` from parsed `--key value` flags.
///
/// Arguments are `--<arg>`; accounts are `--<account>-account`. Any other
/// flag is an unknown field.
pub fn form_from_flags(
    ix: &IdlInstruction,
    flags: &HashMap<String, String>,
) -> Result<FormInputState, ConsoleError> {
    let mut form = FormInputState::for_instruction(ix);
    for (key, value) in flags {
        if let Some(arg) = ix.args.iter().find(|a| snake_to_kebab(&a.name) == *key) {
            form.set(FieldKind::Argument, &arg.name, value.clone())?;
            continue;
        }
        let account = key
            .strip_suffix("-account")
            .and_then(|stem| ix.accounts.iter().find(|a| snake_to_kebab(&a.name) == stem));
        match account {
            Some(acc) => form.set(FieldKind::Account, &acc.name, value.clone())?,
            None => {
                let kind = if key.ends_with("-account") { FieldKind::Account } else { FieldKind::Argument };
                return Err(ConsoleError::UnknownField { kind, name: key.clone() });
            }
        }
    }
    Ok(form)
}

/// Map a command to an instruction name: exact first, then kebab-case.
pub fn find_instruction_name<'a>(idl: &'a InterfaceDefinition, command: &str) -> Option<&'a str> {
    if let Ok(ix) = idl.instruction(command) {
        return Some(ix.name.as_str());
    }
    idl.instructions()
        .iter()
        .find(|ix| snake_to_kebab(&ix.name) == command)
        .map(|ix| ix.name.as_str())
}

// ─── String utilities ────────────────────────────────────────────

pub fn snake_to_kebab(s: &str) -> String {
    s.replace('_', "-")
}

pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(ch) => ch.to_uppercase().collect::<String>() + c.as_str(),
            }
        })
        .collect()
}

pub fn idl_type_display(ty: &IdlType) -> String {
    match ty {
        IdlType::Primitive(s) => s.clone(),
        IdlType::Vec { vec } => format!("Vec<{}>", idl_type_display(vec)),
        IdlType::Option { option } => format!("Option<{}>", idl_type_display(option)),
        IdlType::Defined { defined } => defined.name().to_string(),
        IdlType::Array { array } => format!("[{}; {}]", idl_type_display(&array.0), array.1),
    }
}

pub fn idl_type_hint(ty: &IdlType) -> String {
    match ty {
        IdlType::Primitive(s) => match s.as_str() {
            "u8" | "u16" | "u32" | "u64" | "u128" | "u256"
            | "i8" | "i16" | "i32" | "i64" | "i128" | "i256" => "INT".to_string(),
            "f32" | "f64" => "NUMBER".to_string(),
            "publicKey" | "pubkey" => "ADDR".to_string(),
            "bool" => "true|false".to_string(),
            "bytes" => "HEX".to_string(),
            _ => s.to_uppercase(),
        },
        IdlType::Vec { vec } => format!("{},...", idl_type_hint(vec)),
        IdlType::Option { option } => format!("OPT<{}>", idl_type_hint(option)),
        IdlType::Defined { defined } => defined.name().to_string(),
        IdlType::Array { array } => match &*array.0 {
            IdlType::Primitive(p) if p == "u8" => format!("HEX{}|STR≤{}", array.1 * 2, array.1),
            _ => format!("[_; {}]", array.1),
        },
    }
}
