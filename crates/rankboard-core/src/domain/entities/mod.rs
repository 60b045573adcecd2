mod player;

pub use player::*;
