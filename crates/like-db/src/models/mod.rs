//! Database models - rows as SQLx reads them

mod like;

pub use like::{LikeCountModel, LikeModel, OwnerModel, UpsertModel};
