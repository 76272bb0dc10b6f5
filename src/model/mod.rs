pub mod task;
pub mod view_state;

pub use task::*;
pub use view_state::*;
