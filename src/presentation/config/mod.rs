mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    BucketClientProvider, BucketClientSettings, DatabaseSettings, LoggingSettings,
    ServerSettings, Settings, WorkerSettings,
};
