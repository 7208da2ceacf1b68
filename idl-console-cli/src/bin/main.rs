//! `idl-console`: invoke any Anchor-style program from its IDL.
//!
//! ```text
//! idl-console -i vault.json deposit --amount 5 --vault-account <ADDR>
//! idl-console -i vault.json --dry-run --json deposit --amount 5
//! idl-console -i https://example.org/vault.json repl
//! ```

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use idl_console::address::hex_encode;
use idl_console::cli::{
    find_instruction_name, form_from_flags, parse_global_options, parse_instruction_args,
    print_help, print_instruction_help, wants_help, GlobalOptions,
};
use idl_console::config::ConsoleConfig;
use idl_console::console::{Console, SubmitMode};
use idl_console::loader::IdlSource;
use idl_console::repl::Repl;
use idl_console::session::{Completion, InvocationResult, Session};
use idl_console::signer::TransactionSigner;
use idl_console::tx::print_prepared;
use idl_console_core::error::ConsoleError;
use idl_console_core::idl::InterfaceDefinition;
use idl_console_core::types::FieldKind;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BINARY_NAME: &str = "idl-console";

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "idl_console=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run().await {
        match err.downcast_ref::<ConsoleError>() {
            Some(console_err) => eprintln!("❌ [{}] {}", console_err.error_code(), console_err),
            None => eprintln!("❌ {:#}", err),
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (options, rest) = parse_global_options(&args).map_err(|e| anyhow!(e))?;

    let mut config = ConsoleConfig::from_env()?;
    config.apply_overrides(&options)?;

    let session = Session::with_program_id(config.program_pubkey()?);
    let mut console = Console::new(session, config.submit);
    let source = IdlSource::parse(&config.idl_source);
    let command = rest.first().map(String::as_str);

    if command == Some("repl") {
        if matches!(source, IdlSource::Stdin) {
            bail!("the repl reads commands from stdin; load the IDL with 'paste' instead");
        }
        let signer = if options.dry_run {
            None
        } else {
            match config.connect_signer() {
                Ok(signer) => Some(Arc::new(signer) as Arc<dyn TransactionSigner>),
                Err(err) => {
                    warn!(%err, "starting without a signer");
                    None
                }
            }
        };
        // A missing default IDL is not fatal here; it is narrated and the
        // operator can `load` another.
        let _ = console.load(&source).await;
        if let Some(signer) = &signer {
            console.connect(signer.clone());
        }
        return Repl::new(console, signer).run_stdin().await;
    }

    console.load(&source).await?;
    let idl = console
        .session()
        .idl()
        .cloned()
        .ok_or(ConsoleError::NoIdlLoaded)?;

    match command {
        None | Some("help") | Some("--help") | Some("-h") => {
            print_help(&idl, BINARY_NAME);
            Ok(())
        }
        Some("idl") => {
            print_idl(&idl);
            Ok(())
        }
        Some(cmd) => {
            let name = find_instruction_name(&idl, cmd)
                .ok_or_else(|| ConsoleError::InstructionNotFound { name: cmd.to_string() })?
                .to_string();
            invoke(&mut console, &idl, &name, &rest[1..], &options, &config).await
        }
    }
}

async fn invoke(
    console: &mut Console,
    idl: &InterfaceDefinition,
    name: &str,
    raw_args: &[String],
    options: &GlobalOptions,
    config: &ConsoleConfig,
) -> Result<()> {
    let ix = idl.instruction(name)?;
    let flags = parse_instruction_args(raw_args);
    if wants_help(&flags) {
        print_instruction_help(ix);
        return Ok(());
    }

    let form = form_from_flags(ix, &flags)?;
    console.select(name)?;
    for kind in [FieldKind::Argument, FieldKind::Account] {
        for (field, value) in form.entries(kind) {
            if let Some(value) = value {
                console.set_field(kind, field, value)?;
            }
        }
    }

    let prepared = console.preview()?;
    if options.dry_run {
        if options.json {
            println!("{}", serde_json::to_string_pretty(&prepared.summary())?);
        } else {
            print_prepared(&prepared);
            println!("⚠️  Dry run — not submitted.");
        }
        return Ok(());
    }
    print_prepared(&prepared);

    let signer = config.connect_signer()?;
    console.connect(Arc::new(signer));
    let mode = if options.simulate { SubmitMode::Simulate } else { SubmitMode::Send };
    println!("📤 {}...", if options.simulate { "Simulating" } else { "Submitting" });

    match console.submit(mode).await? {
        Completion::Applied(InvocationResult::Success(result)) => {
            println!("✅ {}", result);
            Ok(())
        }
        Completion::Applied(InvocationResult::Failure(message)) => bail!("{} failed: {}", name, message),
        Completion::Stale => bail!("{}: result discarded", name),
    }
}

fn print_idl(idl: &InterfaceDefinition) {
    println!("📄 {} v{}", idl.program_name(), idl.program_version());
    match idl.program_address() {
        Some(address) => println!("   address: {}", address),
        None => println!("   address: (none, pass --program-id)"),
    }
    println!();
    for ix in idl.instructions() {
        println!(
            "  {:<24} [{}] {} arg(s), {} account(s)",
            ix.name,
            hex_encode(&ix.discriminator()),
            ix.args.len(),
            ix.accounts.len()
        );
    }
    if !idl.idl().errors.is_empty() {
        println!();
        println!("Errors:");
        for e in &idl.idl().errors {
            println!("  {:>6} {}", e.code, e.name);
        }
    }
}
