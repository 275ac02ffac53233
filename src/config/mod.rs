mod loader;

pub use loader::{
    glob_match, CacheConfig, Config, DynamicConfig, EntryPointConfig, PoolConfig, ReportConfig,
    ResolverConfig,
};
