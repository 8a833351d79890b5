pub mod cache;
pub mod rate_limit;

pub use cache::TtlCache;
pub use rate_limit::SlidingWindowLimiter;
