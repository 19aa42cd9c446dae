//! # Command Dispatcher
//!
//! Reads menu lines from any async line source and writes human output to
//! any writer. Errors of individual commands are printed and the menu goes
//! on; only I/O failures end it.

use std::io::Write;

use anyhow::Result;
use mi_01_private_state::{PrivateStateKey, PrivateStateStore};
use mi_06_index_registry::IndexRegistry;
use shared_types::{Identity, IndexError, PublicState, TransactionReceipt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::commands::{MenuCommand, StartCommand};
use crate::runtime::{read_with_retry, NodeRuntime, READ_ATTEMPTS, READ_RETRY_DELAY};

const START_MENU: &str = "\
You can do one of the following:
  deploy              Deploy a new main index contract
  join <address>      Join an existing main index contract
  clear-keys          Delete every stored identity
  import-key <hex>    Import a 32-byte secret key
  exit                Exit";

const MAIN_MENU: &str = "\
You can do one of the following:
  add <address> <title>   Add an entry
  remove-first            Remove the most recently added entry
  remove-all              Remove every entry
  clear                   Clear the contract and start a new epoch
  initialize              Claim ownership of the contract
  ledger                  Display the public ledger state
  private                 Display the private state
  derived                 Display the derived state
  exit                    Exit";

/// Line-driven menu loop.
pub struct CommandDispatcher<R, W> {
    lines: Lines<R>,
    out: W,
    shutdown: watch::Receiver<bool>,
}

impl<R, W> CommandDispatcher<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Create a dispatcher over `input` and `out`.
    pub fn new(input: R, out: W, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            lines: input.lines(),
            out,
            shutdown,
        }
    }

    /// Consume the dispatcher, returning the writer.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run the deploy-or-join menu until a contract is open.
    ///
    /// `None` when the user exits, input ends or shutdown is requested.
    pub async fn choose_contract(&mut self, runtime: &NodeRuntime) -> Result<Option<IndexRegistry>> {
        let user = runtime.container().config.private_state.user.clone();

        loop {
            let Some(line) = self.prompt(START_MENU).await? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }
            let command = match StartCommand::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.out, "{e}")?;
                    continue;
                }
            };

            match command {
                StartCommand::Deploy => match runtime.deploy_registry().await {
                    Ok(registry) => {
                        writeln!(self.out, "Deployed contract at address: {}", registry.address())?;
                        return Ok(Some(registry));
                    }
                    Err(e) => writeln!(self.out, "Failed to deploy contract: {e}")?,
                },
                StartCommand::Join(address) => match runtime.join_registry(address).await {
                    Ok(registry) => {
                        writeln!(self.out, "Joined contract at address: {}", registry.address())?;
                        return Ok(Some(registry));
                    }
                    Err(e) => writeln!(self.out, "Failed to join contract: {e}")?,
                },
                StartCommand::ClearKeys => match runtime.container().store.clear().await {
                    Ok(()) => {
                        info!("Private state cleared");
                        writeln!(self.out, "All stored keys deleted.")?;
                    }
                    Err(e) => writeln!(self.out, "Failed to clear keys: {e}")?,
                },
                StartCommand::ImportKey(secret_key) => {
                    let key = PrivateStateKey::shared(user.clone());
                    match runtime.container().store.set(&key, Identity::new(secret_key)).await {
                        Ok(()) => {
                            info!(key = %key, "Secret key imported");
                            writeln!(self.out, "Secret key imported for user {user}.")?;
                        }
                        Err(e) => writeln!(self.out, "Failed to import key: {e}")?,
                    }
                }
                StartCommand::Exit => return Ok(None),
            }
        }
    }

    /// Run the main menu on `registry` until exit, end of input or shutdown.
    pub async fn run_menu(&mut self, runtime: &NodeRuntime, registry: &IndexRegistry) -> Result<()> {
        loop {
            let Some(line) = self.prompt(MAIN_MENU).await? else {
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }
            let command = match MenuCommand::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.out, "{e}")?;
                    continue;
                }
            };

            match command {
                MenuCommand::Add { address, title } => {
                    match registry.add_address(&address, &title).await {
                        Ok((entry, receipt)) => {
                            writeln!(self.out, "Added entry {}", entry.to_wire())?;
                            self.print_receipt(&receipt)?;
                        }
                        Err(e) => self.print_failure("add entry", &e)?,
                    }
                }
                MenuCommand::RemoveFirst => {
                    let outcome = registry.remove_first_address().await;
                    self.print_outcome("remove entry", outcome)?;
                }
                MenuCommand::RemoveAll => {
                    let outcome = registry.remove_all_addresses().await;
                    self.print_outcome("remove all entries", outcome)?;
                }
                MenuCommand::Clear => {
                    let outcome = registry.clear().await;
                    self.print_outcome("clear contract", outcome)?;
                }
                MenuCommand::Initialize => {
                    let outcome = registry.initialize().await;
                    self.print_outcome("initialize contract", outcome)?;
                }
                MenuCommand::Ledger => match read_with_retry(READ_ATTEMPTS, READ_RETRY_DELAY, || {
                    registry.session().query_public_state()
                })
                .await
                {
                    Ok(state) => self.print_ledger(&state)?,
                    Err(e) => self.print_failure("read ledger state", &e)?,
                },
                MenuCommand::Private => {
                    let secret = registry.session().identity().secret_key.to_hex();
                    writeln!(self.out, "Current private state:")?;
                    writeln!(self.out, "  Secret key: {secret}")?;
                    writeln!(
                        self.out,
                        "  User: {}",
                        runtime.container().config.private_state.user
                    )?;
                }
                MenuCommand::Derived => match registry.derived_state() {
                    Some(state) => {
                        writeln!(self.out, "Current derived state:")?;
                        writeln!(self.out, "  Sequence: {}", state.sequence)?;
                        writeln!(self.out, "  Owner: {}", if state.is_owner { "yes" } else { "no" })?;
                        self.print_entries(&state.entries)?;
                    }
                    None => writeln!(self.out, "No derived state observed yet.")?,
                },
                MenuCommand::Exit => return Ok(()),
            }
        }
    }

    /// Print `menu` and read one line. `None` at end of input or shutdown.
    async fn prompt(&mut self, menu: &str) -> Result<Option<String>> {
        writeln!(self.out, "{menu}")?;
        write!(self.out, "> ")?;
        self.out.flush()?;

        let line = tokio::select! {
            line = self.lines.next_line() => line?,
            _ = shutdown_requested(&mut self.shutdown) => None,
        };
        Ok(line)
    }

    fn print_outcome(
        &mut self,
        action: &str,
        outcome: Result<TransactionReceipt, IndexError>,
    ) -> Result<()> {
        match outcome {
            Ok(receipt) => self.print_receipt(&receipt),
            Err(e) => self.print_failure(action, &e),
        }
    }

    fn print_receipt(&mut self, receipt: &TransactionReceipt) -> Result<()> {
        writeln!(
            self.out,
            "Transaction {} added in block {}",
            receipt.transaction_id, receipt.block_height
        )?;
        Ok(())
    }

    fn print_failure(&mut self, action: &str, error: &IndexError) -> Result<()> {
        warn!(action, error = %error, "Command failed");
        writeln!(self.out, "Failed to {action}: {error}")?;
        Ok(())
    }

    fn print_ledger(&mut self, state: &PublicState) -> Result<()> {
        writeln!(self.out, "Current ledger state:")?;
        writeln!(self.out, "  Sequence: {}", state.sequence)?;
        writeln!(self.out, "  Owner: {}", state.owner_hex())?;
        writeln!(self.out, "  Entry count: {}", state.entry_count)?;
        self.print_entries(&state.entries)
    }

    fn print_entries(&mut self, entries: &[String]) -> Result<()> {
        if entries.is_empty() {
            writeln!(self.out, "  Entries: none")?;
            return Ok(());
        }
        writeln!(self.out, "  Entries:")?;
        for (i, entry) in entries.iter().enumerate() {
            writeln!(self.out, "    {}. {entry}", i + 1)?;
        }
        Ok(())
    }
}

/// Resolves once shutdown is requested; never if the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
