pub mod catalog;
pub mod clock;
pub mod engine;
pub mod errors;
pub mod models;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod store;

pub use catalog::*;
pub use clock::*;
pub use engine::*;
pub use errors::*;
pub use models::*;
pub use scheduler::*;
pub use session::*;
pub use stats::*;
pub use store::*;
