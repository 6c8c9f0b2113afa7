mod id;
mod timestamp;

pub use id::{IdGenerator, new_id};
pub use timestamp::Timestamp;
