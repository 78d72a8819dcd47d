//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use profiled_config::ConfigError;
use profiled_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const FORBIDDEN: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const PRECONDITION: i32 = 9;
    pub const IN_USE: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Profiles ─────────────────────────────────────────────────────
    #[error("Profile '{name}' not found in namespace '{namespace}'")]
    #[diagnostic(
        code(profiled::not_found),
        help("Run: profiled list --project {namespace} to see available profiles")
    )]
    NotFound { namespace: String, name: String },

    #[error("Project '{name}' is not configured")]
    #[diagnostic(
        code(profiled::project_not_found),
        help(
            "Declare it in the config file:\n\
             [projects.{name}]\n\
             profiles = true"
        )
    )]
    ProjectNotFound { name: String },

    #[error("Profile '{name}' already exists in namespace '{namespace}'")]
    #[diagnostic(code(profiled::conflict))]
    Conflict { namespace: String, name: String },

    #[error("Profile '{name}' was modified by someone else")]
    #[diagnostic(
        code(profiled::precondition_failed),
        help("Run: profiled show {name} to get the current ETag, then retry")
    )]
    PreconditionFailed { name: String },

    #[error("{message}")]
    #[diagnostic(code(profiled::forbidden))]
    Forbidden { message: String },

    #[error("Profile '{name}' is in use by: {instances}")]
    #[diagnostic(
        code(profiled::in_use),
        help("Remove the profile from these instances before renaming or deleting it.")
    )]
    InUse { name: String, instances: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(profiled::validation))]
    Validation { field: String, reason: String },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("State file error: {message}")]
    #[diagnostic(
        code(profiled::state),
        help("Check the path given by --state or `[node] state_file`.")
    )]
    State { message: String },

    #[error("Cluster error: {message}")]
    #[diagnostic(code(profiled::cluster))]
    Cluster { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(profiled::internal))]
    Internal { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(profiled::config),
        help("Run: profiled config path to locate the file, or profiled config init")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(profiled::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Aborted")]
    #[diagnostic(code(profiled::aborted))]
    Aborted,

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(profiled::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(profiled::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::ProjectNotFound { .. } => exit_code::NOT_FOUND,
            Self::Forbidden { .. } => exit_code::FORBIDDEN,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::PreconditionFailed { .. } => exit_code::PRECONDITION,
            Self::InUse { .. } => exit_code::IN_USE,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BadRequest { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NotFound { namespace, name } => CliError::NotFound { namespace, name },

            CoreError::NamespaceNotFound { namespace } => {
                CliError::ProjectNotFound { name: namespace }
            }

            CoreError::AlreadyExists { namespace, name } | CoreError::Conflict { namespace, name } => {
                CliError::Conflict { namespace, name }
            }

            CoreError::PreconditionFailed { name } => CliError::PreconditionFailed { name },

            CoreError::Forbidden { message } => CliError::Forbidden { message },

            CoreError::InUse { name, instances } => CliError::InUse {
                name,
                instances: instances.join(", "),
            },

            CoreError::Storage { message } => CliError::State { message },

            CoreError::Peer { message, status } => CliError::Cluster {
                message: match status {
                    Some(code) => format!("{message} (HTTP {code})"),
                    None => message,
                },
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_stable_exit_codes() {
        let cases = [
            (
                CoreError::NotFound {
                    namespace: "default".into(),
                    name: "web".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Forbidden {
                    message: "no".into(),
                },
                exit_code::FORBIDDEN,
            ),
            (
                CoreError::Conflict {
                    namespace: "default".into(),
                    name: "web".into(),
                },
                exit_code::CONFLICT,
            ),
            (
                CoreError::PreconditionFailed { name: "web".into() },
                exit_code::PRECONDITION,
            ),
            (
                CoreError::InUse {
                    name: "web".into(),
                    instances: vec!["c1".into()],
                },
                exit_code::IN_USE,
            ),
            (
                CoreError::BadRequest {
                    message: "bad".into(),
                },
                exit_code::USAGE,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }
}
