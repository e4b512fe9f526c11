pub mod coordinator;
pub mod fetch_markets;

pub use coordinator::*;
pub use fetch_markets::*;
