//! Interactive session over stdin.
//!
//! One line is one operator action. `paste` reads an IDL document up to a
//! line holding a single `.`.

use std::sync::Arc;

use idl_console_core::types::FieldKind;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::{idl_type_display, print_help};
use crate::console::{Console, SubmitMode};
use crate::loader::IdlSource;
use crate::session::{Completion, InvocationResult};
use crate::signer::TransactionSigner;
use crate::tx::print_prepared;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(String),
    Paste,
    List,
    Select(String),
    Set { kind: FieldKind, name: String, value: String },
    Clear { kind: FieldKind, name: String },
    Show,
    Preview,
    Submit(SubmitMode),
    Connect,
    Disconnect,
    Log,
    Help,
    Quit,
}

/// Parse one input line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let need = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("usage: {} {}", word, what))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word {
        "load" => Command::Load(need("<path|url>")?),
        "paste" => Command::Paste,
        "ls" | "instructions" => Command::List,
        "select" | "use" => Command::Select(need("<instruction>")?),
        "arg" | "account" => {
            let kind = field_kind(word);
            // Values may contain spaces; an absent value sets the empty string.
            let (name, value) = match need("<name> [value]")?.split_once(char::is_whitespace) {
                Some((name, value)) => (name.to_string(), value.trim().to_string()),
                None => (rest.to_string(), String::new()),
            };
            Command::Set { kind, name, value }
        }
        "clear" => {
            let args = need("arg|account <name>")?;
            let (which, name) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: clear arg|account <name>".to_string())?;
            if which != "arg" && which != "account" {
                return Err(format!("clear: expected 'arg' or 'account', got '{}'", which));
            }
            Command::Clear { kind: field_kind(which), name: name.trim().to_string() }
        }
        "show" => Command::Show,
        "preview" => Command::Preview,
        "simulate" => Command::Submit(SubmitMode::Simulate),
        "submit" | "send" => Command::Submit(SubmitMode::Send),
        "connect" => Command::Connect,
        "disconnect" => Command::Disconnect,
        "log" => Command::Log,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

fn field_kind(word: &str) -> FieldKind {
    if word == "account" { FieldKind::Account } else { FieldKind::Argument }
}

pub struct Repl {
    console: Console,
    /// Signer handed to the session on `connect`.
    signer: Option<Arc<dyn TransactionSigner>>,
    printed: usize,
}

impl Repl {
    pub fn new(console: Console, signer: Option<Arc<dyn TransactionSigner>>) -> Self {
        Self { console, signer, printed: 0 }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub async fn run_stdin(&mut self) -> anyhow::Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        self.run(reader).await
    }

    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, reader: R) -> anyhow::Result<()> {
        let mut lines = reader.lines();
        self.flush_narrative();
        println!("Type 'help' for commands.");
        while let Some(line) = lines.next_line().await? {
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    println!("❌ {}", message);
                    continue;
                }
            };
            match command {
                Command::Quit => break,
                Command::Paste => {
                    let mut text = String::new();
                    while let Some(line) = lines.next_line().await? {
                        if line.trim() == "." {
                            break;
                        }
                        text.push_str(&line);
                        text.push('\n');
                    }
                    self.execute(Command::Load(String::new()), Some(text)).await;
                }
                other => self.execute(other, None).await,
            }
            self.flush_narrative();
        }
        Ok(())
    }

    /// Run one command. `pasted` carries the document for a pasted load.
    pub async fn execute(&mut self, command: Command, pasted: Option<String>) {
        match command {
            Command::Load(target) => {
                let source = match pasted {
                    Some(text) => IdlSource::Text(text),
                    None if target == "-" => {
                        println!("❌ stdin is the command stream here; use 'paste'");
                        return;
                    }
                    None => IdlSource::parse(&target),
                };
                let _ = self.console.load(&source).await;
            }
            Command::List => self.list(),
            Command::Select(name) => {
                let _ = self.console.select(&name);
            }
            Command::Set { kind, name, value } => {
                let _ = self.console.set_field(kind, &name, &value);
            }
            Command::Clear { kind, name } => {
                let _ = self.console.clear_field(kind, &name);
            }
            Command::Show => self.show(),
            Command::Preview => {
                if let Ok(prepared) = self.console.preview() {
                    print_prepared(&prepared);
                }
            }
            Command::Submit(mode) => {
                if let Ok(Completion::Applied(InvocationResult::Success(id))) =
                    self.console.submit(mode).await
                {
                    println!("✅ {}", id);
                }
            }
            Command::Connect => match &self.signer {
                Some(signer) => self.console.connect(signer.clone()),
                None => println!("❌ No signer configured (dry run)"),
            },
            Command::Disconnect => self.console.disconnect(),
            Command::Log => {
                for (i, line) in self.console.narrator().lines().enumerate() {
                    println!("{:>4}  {}", i + 1, line);
                }
            }
            Command::Help => print_commands(self.console.session().idl()),
            Command::Paste | Command::Quit => {}
        }
    }

    fn list(&self) {
        let Some(idl) = self.console.session().idl() else {
            println!("No IDL loaded");
            return;
        };
        for ix in idl.instructions() {
            println!("  {} ({} arg(s), {} account(s))", ix.name, ix.args.len(), ix.accounts.len());
        }
    }

    fn show(&self) {
        let session = self.console.session();
        let (Some(ix), Some(form)) = (session.selected_instruction(), session.form()) else {
            println!("No instruction selected");
            return;
        };
        println!("📋 {}", ix.name);
        for arg in &ix.args {
            let value = form.get(FieldKind::Argument, &arg.name).unwrap_or("<unset>");
            println!("  arg     {:<20} {:<14} = {}", arg.name, idl_type_display(&arg.type_), value);
        }
        for acc in &ix.accounts {
            let value = form.get(FieldKind::Account, &acc.name).unwrap_or("<auto>");
            println!("  account {:<20} {:<14} = {}", acc.name, "", value);
        }
        match session.signer_address() {
            Some(address) => println!("  signer: {}", address),
            None => println!("  signer: not connected"),
        }
        if let Some(result) = session.last_result() {
            match result {
                InvocationResult::Success(id) => println!("  last result: ✅ {}", id),
                InvocationResult::Failure(message) => println!("  last result: ❌ {}", message),
            }
        }
    }

    /// Echo narrative entries not printed yet.
    fn flush_narrative(&mut self) {
        for line in self.console.narrator().lines().skip(self.printed) {
            println!("• {}", line);
        }
        self.printed = self.console.narrator().len();
    }
}

fn print_commands(idl: Option<&idl_console_core::idl::InterfaceDefinition>) {
    println!("COMMANDS:");
    println!("  load <path|url>            Load an IDL document");
    println!("  paste                      Paste an IDL document, end with a line '.'");
    println!("  ls                         List instructions");
    println!("  select <instruction>       Select an instruction (resets the form)");
    println!("  arg <name> [value]         Set an argument");
    println!("  account <name> [address]   Set an account (blank = auto)");
    println!("  clear arg|account <name>   Unset a field");
    println!("  show                       Show the form");
    println!("  preview                    Build the instruction without sending");
    println!("  simulate | submit          Simulate or send the selected instruction");
    println!("  connect | disconnect       Attach or detach the signer");
    println!("  log                        Print the narrative");
    println!("  quit                       Leave");
    if let Some(idl) = idl {
        println!();
        print_help(idl, "idl-console");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_with_spaces() {
        let cmd = parse_command("arg memo hello there").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                kind: FieldKind::Argument,
                name: "memo".into(),
                value: "hello there".into()
            }
        );
    }

    #[test]
    fn test_parse_set_without_value_is_empty() {
        let cmd = parse_command("account vault").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Set { kind: FieldKind::Account, name: "vault".into(), value: String::new() }
        );
    }

    #[test]
    fn test_parse_blank_and_comment() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# note").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("select").is_err());
        assert!(parse_command("clear thing x").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_parse_submit_modes() {
        assert_eq!(parse_command("simulate").unwrap(), Some(Command::Submit(SubmitMode::Simulate)));
        assert_eq!(parse_command("send").unwrap(), Some(Command::Submit(SubmitMode::Send)));
    }
}
