//! Follows, purchases and hot/not votes

use crate::error::{EncoreError, Result};
use crate::types::{ArtistId, PurchaseId, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user following an artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: UserId,
    pub artist_id: ArtistId,
    pub created_at: DateTime<Utc>,
}

/// A completed track purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub track_id: TrackId,
    /// Amount paid in cents
    pub amount: u32,
    pub created_at: DateTime<Utc>,
}

/// Data for recording a purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub user_id: UserId,
    pub track_id: TrackId,
    pub amount: u32,
}

impl NewPurchase {
    pub fn validate(&self) -> Result<()> {
        if self.amount == 0 {
            return Err(EncoreError::validation(
                "amount",
                "a purchase must have a positive amount",
            ));
        }
        Ok(())
    }
}

/// Hot or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Hot,
    Not,
}

impl VoteKind {
    /// Column value in the `votes` table
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Not => "not",
        }
    }
}

impl std::fmt::Display for VoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user's vote on one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: UserId,
    pub track_id: TrackId,
    #[serde(rename = "vote_type")]
    pub kind: VoteKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_purchase_rejected() {
        let purchase = NewPurchase {
            user_id: UserId::new("u1"),
            track_id: TrackId::new("t1"),
            amount: 0,
        };
        assert!(purchase.validate().is_err());
    }

    #[test]
    fn vote_row_uses_vote_type_column() {
        let vote = Vote {
            user_id: UserId::new("u1"),
            track_id: TrackId::new("t1"),
            kind: VoteKind::Hot,
        };
        let json = serde_json::to_value(&vote).unwrap();
        assert_eq!(json["vote_type"], "hot");

        let back: Vote = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind, VoteKind::Hot);
    }
}
