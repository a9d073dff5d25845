pub mod controls;
pub mod debug;
pub mod picker;
pub mod results;
