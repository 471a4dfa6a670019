pub mod page;
pub mod post;
pub mod requests;

pub use page::Paginated;
pub use post::{Post, PostFields};
pub use requests::{ListQuery, PostPayload};
