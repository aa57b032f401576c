pub use easel_core::model::{ChannelId, DrawLine};

pub mod model {
    pub use easel_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use easel_server::*;
}
