mod event;
mod friendship;
mod identity;
mod ids;

pub use event::{EventDraft, EventRecord, Tag};
pub use friendship::{EdgePair, FriendEdge, FriendshipState};
pub use identity::{Identity, PasswordDigest, Username, UsernameKey};
pub use ids::{EventId, IdentityId, TagId};
