use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::IdentityId;

/// A directed friendship edge.
///
/// `source` asked, `target` was asked. The ordered pair is unique in the
/// store and a confirmed edge is the single record of an established
/// friendship regardless of who initiated it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendEdge {
    pub source: IdentityId,
    pub target: IdentityId,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Both possible directed edges between a pair of identities, from the
/// point of view of one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgePair {
    /// Edge from the viewpoint identity towards the other one.
    pub outgoing: Option<FriendEdge>,
    /// Edge from the other identity towards the viewpoint one.
    pub incoming: Option<FriendEdge>,
}

impl EdgePair {
    /// Classify the relationship this pair encodes.
    pub fn state(&self) -> FriendshipState {
        FriendshipState::classify(self)
    }
}

/// The relationship between two identities, collapsed from the two
/// possible directed edges.
///
/// Classification precedence: a confirmed edge in either direction wins,
/// then an unconfirmed incoming edge, then an unconfirmed outgoing edge.
/// The precedence makes a double-pending pair (both sides proposed before
/// seeing each other's edge) converge: the next proposal observes
/// `PendingIncoming` and confirms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FriendshipState {
    /// No edge in either direction; the identities are strangers.
    NoEdge,
    /// The viewpoint identity has asked and waits for reciprocity.
    PendingOutgoing,
    /// The other identity has asked; a proposal from the viewpoint
    /// identity confirms the friendship.
    PendingIncoming,
    /// An edge in one direction is confirmed; the friendship is mutual.
    Confirmed,
}

impl FriendshipState {
    /// Compute the state from the two directed edges of a pair.
    pub fn classify(pair: &EdgePair) -> Self {
        let confirmed = |edge: &Option<FriendEdge>| edge.as_ref().is_some_and(|e| e.confirmed);

        if confirmed(&pair.outgoing) || confirmed(&pair.incoming) {
            Self::Confirmed
        } else if pair.incoming.is_some() {
            Self::PendingIncoming
        } else if pair.outgoing.is_some() {
            Self::PendingOutgoing
        } else {
            Self::NoEdge
        }
    }
}
