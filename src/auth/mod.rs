mod identity;
mod middleware;

pub use identity::{IDENTITY_HEADER, encode_identity, external_tenant};
pub use middleware::{AuthError, RequireTenant};
