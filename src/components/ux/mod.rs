mod button;
mod dropdown;

pub use button::*;
pub use dropdown::*;
