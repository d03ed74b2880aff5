pub mod markdown;
pub mod media;
pub mod pagination;
pub mod posts;
pub mod slug;
pub mod tags;
