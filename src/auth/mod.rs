// AWS SSO token cache access
mod token_cache;

pub use token_cache::{default_cache_dir, TokenCache};
