mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::token::MintArgs;

#[derive(Parser, Debug)]
#[command(name = "bookstore", version, about = "Bookstore key, token and filter tools")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Signing key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Access token tools (mint/verify/inspect)
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// Listing filter tools
    Filter {
        #[command(subcommand)]
        cmd: FilterCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new Ed25519 key pair
    Generate {
        /// Directory to write private.key and public.key into
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Mint an access token
    Mint {
        /// Private key file or hex string
        #[arg(long, env = "BOOKSTORE_PRIVATE_KEY", hide_env_values = true)]
        key: Option<String>,

        /// Subject (username) the token is issued for
        #[arg(long)]
        subject: String,

        /// Role to grant; repeat for several roles
        #[arg(long = "role", required = true)]
        roles: Vec<String>,

        /// Custom string claim as name=value; repeatable
        #[arg(long = "claim")]
        claims: Vec<String>,

        /// Token lifetime, e.g. "1h", "30m"
        #[arg(long, default_value = "1h")]
        lifetime: String,

        /// Write the token to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Verify a token's signature and expiry
    Verify {
        /// Public key file or hex string
        #[arg(long, env = "BOOKSTORE_PUBLIC_KEY")]
        key: Option<String>,

        /// Token string or path to a file holding it
        token: String,
    },

    /// Print a token's header and payload without verifying it
    Inspect {
        /// Token string or path to a file holding it
        token: String,
    },
}

#[derive(Subcommand, Debug)]
enum FilterCommand {
    /// Show the predicate and SQL a listing query compiles to
    Explain {
        /// books, authors, customers or users
        #[arg(long)]
        resource: String,

        /// Query string, e.g. "title=Sapiens&isAvailableOnline=true"
        #[arg(long, default_value = "")]
        query: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { output } => commands::keys::generate(output)?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Mint {
                key,
                subject,
                roles,
                claims,
                lifetime,
                output,
            } => commands::token::mint(MintArgs {
                private_key: key,
                subject,
                roles,
                claims,
                lifetime,
                output,
            })?,
            TokenCommand::Verify { key, token } => {
                commands::token::verify(key, token)?;
            }
            TokenCommand::Inspect { token } => commands::token::inspect(token)?,
        },

        Command::Filter { cmd } => match cmd {
            FilterCommand::Explain { resource, query } => {
                commands::filter::explain(&resource, &query)?
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_mint() {
        let cli = Cli::try_parse_from([
            "bookstore",
            "token",
            "mint",
            "--key",
            "keys/private.key",
            "--subject",
            "carroyom",
            "--role",
            "App/Admin",
            "--role",
            "App/Customer",
            "--claim",
            "customer_id=42",
        ])
        .unwrap();

        match cli.cmd {
            Command::Token {
                cmd:
                    TokenCommand::Mint {
                        roles, lifetime, ..
                    },
            } => {
                assert_eq!(roles, vec!["App/Admin", "App/Customer"]);
                assert_eq!(lifetime, "1h");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_mint_requires_a_role() {
        let result = Cli::try_parse_from([
            "bookstore",
            "token",
            "mint",
            "--key",
            "k",
            "--subject",
            "carroyom",
        ]);
        assert!(result.is_err());
    }
}
