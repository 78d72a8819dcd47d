//! Command dispatch: bridges CLI args -> profile service -> output formatting.

pub mod config_cmd;
pub mod profiles;
pub mod util;

use std::sync::Arc;

use tracing::debug;

use profiled_core::{Collaborators, ProfileService, StandardValidator, StaticMembership};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::state::FileStore;

/// Everything a profile handler needs.
pub struct Context {
    pub service: ProfileService,
    pub project: String,
    pub output: OutputFormat,
    pub quiet: bool,
    pub yes: bool,
}

/// Wire a service to the state file and configured peers.
pub fn build_context(global: &GlobalOpts) -> Result<Context, CliError> {
    let cfg = config::load(global)?;
    let projects = profiled_config::to_projects(&cfg);
    let state_path = config::state_path(global, &cfg);
    let store = Arc::new(FileStore::open(
        &state_path,
        &projects.isolated_namespaces(),
    )?);

    let mut cluster = profiled_config::to_cluster_config(&cfg)?;
    if !cluster.peers.is_empty() {
        cluster.token = profiled_config::resolve_cluster_token(&cfg.cluster);
    }
    let membership = StaticMembership::from_config(&cluster)?;
    debug!(
        state = %state_path.display(),
        peers = membership.len(),
        "profile service ready"
    );

    let service = ProfileService::new(
        profiled_config::to_service_config(&cfg),
        Collaborators {
            store: store.clone(),
            features: Arc::new(projects),
            validator: Arc::new(StandardValidator),
            instances: store,
            membership: Arc::new(membership),
        },
    );

    Ok(Context {
        service,
        project: config::active_project(global, &cfg),
        output: config::output_format(global, &cfg),
        quiet: global.quiet,
        yes: global.yes,
    })
}

/// Dispatch a profile command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => profiles::list(ctx, &args),
        Command::Show(args) => profiles::show(ctx, &args),
        Command::Create(args) => profiles::create(ctx, args).await,
        Command::Edit(args) => profiles::edit(ctx, args).await,
        Command::Patch(args) => profiles::patch(ctx, args).await,
        Command::Rename(args) => profiles::rename(ctx, args).await,
        Command::Delete(args) => profiles::delete(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal {
            message: "command does not use the profile service".into(),
        }),
    }
}
