pub mod comments;
pub mod error;
pub mod frontend;
pub mod generate;
pub mod posts;
pub mod router;
pub mod state;
pub mod validate;

pub use router::build_router;
pub use state::{AppState, AppStateInner};
