//! Stored records and their client projections
//!
//! Stored documents keep their identifier under `_id`; every projection sent
//! to a client exposes it as `id` and never carries the password hash.

pub mod player;
pub mod user;

pub use player::{Comment, CommentView, NewPlayer, Player, PlayerView};
pub use user::{NewUser, User, UserProjection};

use crate::store::UniqueField;

/// Fields both stores keep unique
pub const UNIQUE_FIELDS: &[UniqueField] = &[
    UniqueField {
        collection: User::COLLECTION_NAME,
        field: "username",
    },
    UniqueField {
        collection: Player::COLLECTION_NAME,
        field: "name",
    },
];
