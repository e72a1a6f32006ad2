//! Resource type to table mapping
//!
//! Posts live in `posts`; comments and replies share `comments`, a reply
//! being a comment with a parent. The filters keep the two comment kinds
//! disjoint so reconciling one never touches the other.

use like_core::value_objects::ResourceType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResourceTable {
    pub name: &'static str,
    /// Extra predicate restricting the table to this resource type
    pub filter: &'static str,
}

impl ResourceTable {
    pub const fn for_type(resource_type: ResourceType) -> Self {
        match resource_type {
            ResourceType::Post => Self {
                name: "posts",
                filter: "TRUE",
            },
            ResourceType::Comment => Self {
                name: "comments",
                filter: "parent_id IS NULL",
            },
            ResourceType::Reply => Self {
                name: "comments",
                filter: "parent_id IS NOT NULL",
            },
        }
    }
}
