//! Immutable provider credentials and per-provider client policies.
//!
//! [`Credentials`] carries everything a client needs to talk to one provider: app key and
//! secret, base URL, request timeout, and retry budget. Values are validated once by
//! [`CredentialsBuilder::build`] and never mutated afterwards. [`ClientPolicy`] holds the
//! provider's fixed pacing constants (rate ceiling, throttle backoff, market calendar).

pub mod credentials;
pub mod policy;

pub use credentials::*;
pub use policy::*;
