pub mod conversion;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod market_data;
pub mod polling;
pub mod state;
