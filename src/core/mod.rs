pub mod analysis;
pub mod models;
pub mod questions;
pub mod sentiment;
pub mod video_id;
pub mod youtube;

pub use analysis::*;
pub use models::*;
pub use questions::*;
pub use video_id::*;
pub use youtube::*;
