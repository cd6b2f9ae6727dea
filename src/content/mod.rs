//! Content module - posts, front-matter and the post collection

mod collection;
mod date;
mod excerpt;
mod frontmatter;
pub mod loader;
mod post;

pub use collection::{Listing, PostCollection};
pub use date::{InvalidDate, PostDate};
pub use excerpt::{split_excerpt, summarize, Excerpt};
pub use frontmatter::FrontMatter;
pub use post::Post;
