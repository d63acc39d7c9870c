//! Account CLI commands

use clap::Subcommand;

use crate::error::LedgerResult;
use crate::models::Account;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// IBAN, used by the import resolver
        #[arg(short, long)]
        iban: Option<String>,
    },
    /// List all accounts
    List {
        /// Show archived accounts too
        #[arg(short, long)]
        all: bool,
    },
    /// Archive an account so imports stop targeting it
    Archive {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> LedgerResult<()> {
    match cmd {
        AccountCommands::Create { name, iban } => {
            let account = match iban {
                Some(iban) => Account::with_iban(&name, &iban),
                None => Account::new(&name),
            };

            println!("Created account: {}", account.name);
            if let Some(iban) = &account.iban {
                println!("  IBAN: {}", iban);
            }
            println!("  ID: {}", account.id);

            storage.accounts.upsert(account)?;
            storage.accounts.save()?;
        }

        AccountCommands::List { all } => {
            let accounts = storage.accounts.get_all()?;
            let mut shown = 0;
            for account in accounts {
                if account.archived && !all {
                    continue;
                }
                shown += 1;
                let marker = if account.archived { " (archived)" } else { "" };
                let iban = account.iban.as_deref().unwrap_or("-");
                println!("{}  {}  {}{}", account.id, account.name, iban, marker);
            }
            if shown == 0 {
                println!("No accounts. Create one with 'ledgerlink account create'.");
            }
        }

        AccountCommands::Archive { account } => {
            let mut found = super::find_account(storage, &account)?;
            found.archive();
            println!("Archived account: {}", found.name);

            storage.accounts.upsert(found)?;
            storage.accounts.save()?;
        }
    }

    Ok(())
}
