pub mod comments;
pub mod tags;
pub mod tasks;

pub use comments::CommentsHandler;
pub use tags::TagsHandler;
pub use tasks::TasksHandler;
