mod room;
mod signaling;
mod transport;

pub use room::*;
pub use signaling::*;
pub use transport::*;
