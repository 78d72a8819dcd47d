use super::profile::ProfileFields;

/// A committed profile mutation, as replayed on other cluster members.
///
/// Field values carried here were already validated on the origin node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileMutation {
    Create {
        name: String,
        fields: ProfileFields,
    },
    /// `prior` is the origin's pre-write snapshot; receivers check their
    /// own copy against it before writing `fields`.
    Update {
        name: String,
        prior: ProfileFields,
        fields: ProfileFields,
    },
    /// Only the name change travels, never field data.
    Rename {
        name: String,
        new_name: String,
    },
    Delete {
        name: String,
    },
}

impl ProfileMutation {
    /// The profile name the mutation targets (pre-rename name for renames).
    pub fn name(&self) -> &str {
        match self {
            Self::Create { name, .. }
            | Self::Update { name, .. }
            | Self::Rename { name, .. }
            | Self::Delete { name } => name,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Rename { .. } => "rename",
            Self::Delete { .. } => "delete",
        }
    }
}
