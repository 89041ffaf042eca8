pub mod input;
pub mod list;
pub mod progress;
pub mod viewer;

pub use input::*;
pub use list::*;
pub use progress::*;
pub use viewer::*;
