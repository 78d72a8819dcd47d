//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};
use secrecy::{ExposeSecret, SecretString};

use profiled_config::{
    Config, KEYRING_SERVICE, KEYRING_TOKEN_ENTRY, PeerEntry, TOKEN_ENV,
};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn keyring_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "keyring".into(),
        reason: format!("failed to access keyring: {e}"),
    }
}

/// Prompt for the cluster token without echo.
fn prompt_token() -> Result<SecretString, CliError> {
    let token = Password::new()
        .with_prompt("Cluster token")
        .interact()
        .map_err(prompt_err)?;
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(SecretString::from(token))
}

fn store_token(token: &SecretString) -> Result<(), CliError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_ENTRY).map_err(keyring_err)?;
    entry
        .set_password(token.expose_secret())
        .map_err(keyring_err)
}

/// Ask for peers until an empty name is entered.
fn prompt_peers() -> Result<Vec<PeerEntry>, CliError> {
    let mut peers = Vec::new();
    loop {
        let name: String = Input::new()
            .with_prompt("Peer name (empty to finish)")
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_err)?;
        if name.is_empty() {
            return Ok(peers);
        }
        let url: String = Input::new()
            .with_prompt(format!("URL for {name}"))
            .validate_with(|input: &String| {
                url::Url::parse(input)
                    .map(|_| ())
                    .map_err(|e| format!("invalid URL: {e}"))
            })
            .interact_text()
            .map_err(prompt_err)?;
        peers.push(PeerEntry { name, url });
    }
}

/// Copy of the config safe to print.
fn masked(mut cfg: Config) -> Config {
    if cfg.cluster.token.is_some() {
        cfg.cluster.token = Some("********".into());
    }
    cfg
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config::config_path(global);
            eprintln!("profiled configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let mut cfg = Config::default();

            cfg.node.name = Input::new()
                .with_prompt("Node name")
                .default(cfg.node.name.clone())
                .interact_text()
                .map_err(prompt_err)?;

            cfg.cluster.peers = prompt_peers()?;

            if !cfg.cluster.peers.is_empty() {
                cfg.cluster.timeout = Input::new()
                    .with_prompt("Peer timeout (seconds)")
                    .default(cfg.cluster.timeout)
                    .interact_text()
                    .map_err(prompt_err)?;

                let from_env = format!("Read token from ${TOKEN_ENV}");
                let choices = [
                    "Store token in system keyring (recommended)",
                    from_env.as_str(),
                    "Save token to config file (plaintext)",
                ];
                let selection = Select::new()
                    .with_prompt("Cluster token")
                    .items(&choices)
                    .default(0)
                    .interact()
                    .map_err(prompt_err)?;

                match selection {
                    0 => {
                        store_token(&prompt_token()?)?;
                        eprintln!("   Token stored in system keyring");
                    }
                    1 => {}
                    _ => {
                        cfg.cluster.token = Some(prompt_token()?.expose_secret().to_owned());
                    }
                }
            }

            profiled_config::save_config(&cfg, &path)?;

            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Node: {}", cfg.node.name);
            eprintln!("  Peers: {}", cfg.cluster.peers.len());
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = masked(config::load(global)?);
            let out = output::render_single(
                config::output_format(global, &cfg),
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |_| "config".into(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path(global).display());
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken => {
            store_token(&prompt_token()?)?;
            eprintln!("Cluster token stored in system keyring");
            Ok(())
        }
    }
}
