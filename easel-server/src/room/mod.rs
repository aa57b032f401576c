mod room;

pub use room::*;
