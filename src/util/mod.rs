pub mod alphabet;
pub mod render;
