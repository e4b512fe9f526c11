pub mod dto;
pub mod http;
pub mod services;

pub use http::CoinGeckoClient;
