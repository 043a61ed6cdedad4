use super::error::FeedError;

pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &FeedError);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, error: &FeedError) {
        log::error!("{}", error);
    }
}
