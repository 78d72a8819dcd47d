// ── Domain model ──
//
// Canonical profile types shared by every component. Wire shapes live in
// `profiled-api`; `convert` bridges the two.

mod mutation;
mod profile;

pub use mutation::ProfileMutation;
pub use profile::{
    ConfigMap, DEFAULT_NAMESPACE, DEFAULT_PROFILE, DeviceMap, NewProfile, Profile, ProfileFields,
    ProfileId, profile_uri,
};
