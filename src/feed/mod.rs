mod connector;
mod endpoint;
mod error;
mod sink;
mod state;

pub use connector::FeedConnector;
pub use endpoint::FeedEndpoint;
pub use error::FeedError;
pub use sink::{ErrorSink, LogSink};
pub use state::{ConnectionState, FeedStatus};
