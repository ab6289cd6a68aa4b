//! Resource operations: request shaping, execution, retry, pagination

pub mod client;
pub mod envelope;
pub mod executor;
pub mod pagination;
pub mod types;

pub use client::BandClient;
pub use envelope::{CommentsQuery, NewComment, NewPost, PostsQuery};
pub use executor::{ApiOutcome, RequestExecutor};
pub use pagination::PostPages;
pub use types::{
    Ack, Album, Author, BandSummary, Comment, CreatedPost, Page, PageParams, Paging, Permission,
    PermissionList, Photo, Post, Profile,
};
