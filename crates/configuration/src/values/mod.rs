mod pool_settings;
mod secret;

pub use pool_settings::PoolSettings;
pub use secret::Secret;
