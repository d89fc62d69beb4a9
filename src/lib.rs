// TodoStore - Priority to-do list core with snapshot persistence

pub mod clock;
pub mod config;
pub mod due;
pub mod models;
pub mod remaining;
pub mod snapshot;
pub mod store;
pub mod view;

// Re-export main types for convenience
pub use clock::{Clock, FixedClock, SystemClock, now_ms};
pub use config::Config;
pub use models::{Priority, Task, TaskUpdate};
pub use remaining::{Locale, Remaining, remaining_time};
pub use store::TodoStore;
pub use view::{TaskRow, ViewFilter};
