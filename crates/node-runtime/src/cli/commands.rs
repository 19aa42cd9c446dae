//! # Menu Commands
//!
//! Lines typed at the prompt, parsed without side effects. Numeric choices
//! of the classic menus are accepted next to the command words.

use shared_types::{ContractAddress, SecretKey, SECRET_KEY_LEN};
use thiserror::Error;

/// Parse failure of one input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Unknown command word.
    #[error("Invalid choice: {0}")]
    Unknown(String),

    /// A command is missing an argument.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Contract address is not hex.
    #[error("Invalid contract address: {0}")]
    Address(String),

    /// Imported secret key is not 32 bytes of hex.
    #[error("Invalid secret key format. Please provide a 32-byte hex string (64 hex characters).")]
    SecretKey,
}

/// Commands available before a contract is open.
#[derive(Debug, PartialEq, Eq)]
pub enum StartCommand {
    /// Deploy and initialize a new index contract.
    Deploy,
    /// Join an existing contract.
    Join(ContractAddress),
    /// Delete every stored identity.
    ClearKeys,
    /// Store an operator-supplied identity.
    ImportKey(SecretKey),
    /// Leave.
    Exit,
}

/// Commands available on an open contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    /// Add an (address, title) entry.
    Add {
        /// Indexed contract address.
        address: String,
        /// Entry title (rest of the line).
        title: String,
    },
    /// Remove the most recently added entry.
    RemoveFirst,
    /// Remove every entry.
    RemoveAll,
    /// Clear and start a new epoch.
    Clear,
    /// Claim ownership.
    Initialize,
    /// Print the public ledger state.
    Ledger,
    /// Print the stored secret key.
    Private,
    /// Print the derived state.
    Derived,
    /// Leave.
    Exit,
}

impl StartCommand {
    /// Parse one line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        match command.as_str() {
            "1" | "deploy" => Ok(Self::Deploy),
            "2" | "join" => {
                let raw = words.next().ok_or(CommandError::Usage("join <address>"))?;
                ContractAddress::parse(raw)
                    .map(Self::Join)
                    .map_err(|_| CommandError::Address(raw.to_string()))
            }
            "3" | "exit" | "quit" => Ok(Self::Exit),
            "4" | "clear-keys" => Ok(Self::ClearKeys),
            "5" | "import-key" => {
                let raw = words.next().ok_or(CommandError::Usage("import-key <hex>"))?;
                parse_secret_key(raw).map(Self::ImportKey)
            }
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

impl MenuCommand {
    /// Parse one line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let trimmed = line.trim();
        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        match command.to_ascii_lowercase().as_str() {
            "1" | "add" => {
                let (address, title) = match rest.split_once(char::is_whitespace) {
                    Some((address, title)) => (address, title.trim()),
                    None => (rest, ""),
                };
                if address.is_empty() || title.is_empty() {
                    return Err(CommandError::Usage("add <address> <title>"));
                }
                Ok(Self::Add {
                    address: address.to_string(),
                    title: title.to_string(),
                })
            }
            "2" | "remove-first" => Ok(Self::RemoveFirst),
            "3" | "remove-all" => Ok(Self::RemoveAll),
            "4" | "clear" => Ok(Self::Clear),
            "5" | "ledger" => Ok(Self::Ledger),
            "6" | "private" => Ok(Self::Private),
            "7" | "derived" => Ok(Self::Derived),
            "8" | "exit" | "quit" => Ok(Self::Exit),
            "initialize" | "init" => Ok(Self::Initialize),
            _ => Err(CommandError::Unknown(trimmed.to_string())),
        }
    }
}

/// Exactly 64 hex digits, optionally `0x`-prefixed.
fn parse_secret_key(raw: &str) -> Result<SecretKey, CommandError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.len() != SECRET_KEY_LEN * 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CommandError::SecretKey);
    }
    SecretKey::from_hex(digits).map_err(|_| CommandError::SecretKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_commands() {
        assert_eq!(StartCommand::parse("deploy"), Ok(StartCommand::Deploy));
        assert_eq!(StartCommand::parse(" 1 "), Ok(StartCommand::Deploy));
        assert_eq!(
            StartCommand::parse("join 0xabc"),
            Ok(StartCommand::Join(ContractAddress::parse("0xabc").unwrap()))
        );
        assert_eq!(StartCommand::parse("join"), Err(CommandError::Usage("join <address>")));
        assert!(matches!(StartCommand::parse("join xyz"), Err(CommandError::Address(_))));
        assert_eq!(StartCommand::parse("exit"), Ok(StartCommand::Exit));
        assert_eq!(StartCommand::parse("clear-keys"), Ok(StartCommand::ClearKeys));
        assert!(matches!(StartCommand::parse("9"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_import_key_requires_64_hex_digits() {
        let key = "ab".repeat(32);
        assert_eq!(
            StartCommand::parse(&format!("import-key {key}")),
            Ok(StartCommand::ImportKey(SecretKey::from_hex(&key).unwrap()))
        );
        assert!(StartCommand::parse(&format!("import-key 0x{key}")).is_ok());
        assert_eq!(
            StartCommand::parse("import-key abcd"),
            Err(CommandError::SecretKey)
        );
        assert_eq!(
            StartCommand::parse(&format!("import-key {}", "zz".repeat(32))),
            Err(CommandError::SecretKey)
        );
    }

    #[test]
    fn test_add_takes_rest_of_line_as_title() {
        assert_eq!(
            MenuCommand::parse("add deadbeef My Site"),
            Ok(MenuCommand::Add {
                address: "deadbeef".into(),
                title: "My Site".into()
            })
        );
        assert_eq!(
            MenuCommand::parse("add deadbeef"),
            Err(CommandError::Usage("add <address> <title>"))
        );
    }

    #[test]
    fn test_menu_words_and_numbers() {
        assert_eq!(MenuCommand::parse("2"), Ok(MenuCommand::RemoveFirst));
        assert_eq!(MenuCommand::parse("remove-all"), Ok(MenuCommand::RemoveAll));
        assert_eq!(MenuCommand::parse("CLEAR"), Ok(MenuCommand::Clear));
        assert_eq!(MenuCommand::parse("ledger"), Ok(MenuCommand::Ledger));
        assert_eq!(MenuCommand::parse("6"), Ok(MenuCommand::Private));
        assert_eq!(MenuCommand::parse("derived"), Ok(MenuCommand::Derived));
        assert_eq!(MenuCommand::parse("initialize"), Ok(MenuCommand::Initialize));
        assert_eq!(MenuCommand::parse("8"), Ok(MenuCommand::Exit));
        assert!(MenuCommand::parse("").is_err());
    }
}
