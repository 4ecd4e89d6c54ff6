mod cache_key;
mod milestone;
mod result;

pub use cache_key::{CacheKey, DataKind};
pub use milestone::Milestone;
pub use result::{PortfolioError, Result};
