//! # Gather Core
//!
//! Domain engine for the gather social-events service - identity
//! lifecycle, the friendship ledger and the event catalog, written
//! against the repository traits so any transport can embed it.
//!
//! ## Architecture
//!
//! Every operation runs inside a per-request context:
//!
//! 1. **Session in**: the transport rebuilds the [`context::Session`]
//!    from its cookie and stamps a [`context::RequestContext`]
//! 2. **Resolve**: the viewer and every entity read are memoized in the
//!    context, one store hit per key per request
//! 3. **Operate**: the services enforce validation, the friendship
//!    transition table and viewer-relative field gating
//! 4. **Session out**: the possibly mutated session goes back to the
//!    transport
//!
//! ## Modules
//!
//! - [`accounts`]: registration, authentication and profile updates
//! - [`auth`]: viewer-relative authorization predicates
//! - [`context`]: session view, entity cache and viewer resolution
//! - [`engine`]: service wiring and context construction
//! - [`errors`]: the domain error and its fixed user-facing texts
//! - [`events`]: the public event catalog
//! - [`friends`]: proposals, confirmation, severing and traversal
//! - [`password`]: pluggable password hashing

pub mod accounts;
pub mod auth;
pub mod context;
pub mod engine;
pub mod errors;
pub mod events;
pub mod friends;
pub mod password;

pub use accounts::{AccountService, NewAccount, ProfileUpdate};
pub use auth::can_view_private_fields;
pub use context::{CachedEntity, EntityKey, RequestContext, Session};
pub use engine::Engine;
pub use errors::DomainError;
pub use events::EventService;
pub use friends::FriendshipService;
pub use password::{
    Argon2PasswordHasher, PasswordHashError, PasswordHasher, PlainTextPasswordHasher,
};
