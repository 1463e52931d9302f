mod handler;
pub mod types;
pub mod utils;

pub use handler::HostService;
pub use types::CommentFeed;
