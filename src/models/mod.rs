pub mod entity;
pub mod report;
pub mod segment;
pub mod session;

pub use entity::*;
pub use report::*;
pub use segment::*;
pub use session::*;
