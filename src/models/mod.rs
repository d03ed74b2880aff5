mod post;
mod tag;

pub use post::*;
pub use tag::*;
