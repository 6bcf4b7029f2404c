pub mod files;
pub mod query;
pub mod session;

pub use files::FileStore;
pub use query::{ModelFactory, QueryService};
pub use session::SessionStore;
