// Adapters layer: concrete implementations for external systems (market API, coin pages, storage).

pub mod coingecko;
pub mod http;
pub mod resolvers;
pub mod storage;
