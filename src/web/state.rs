use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};

use crate::contact::{ContactSnapshot, ContactStore};
use crate::feed::FeedStatus;
use crate::session::SessionConfig;
use crate::view::MarkerLayer;

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: ContactStore,
    pub session: Arc<RwLock<SessionConfig>>,
    pub feed_status: watch::Receiver<FeedStatus>,
    pub markers: Arc<Mutex<MarkerLayer>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: ContactStore,
        session: SessionConfig,
        feed_status: watch::Receiver<FeedStatus>,
    ) -> Self {
        AppState {
            config: Arc::new(config),
            store,
            session: Arc::new(RwLock::new(session)),
            feed_status,
            markers: Arc::new(Mutex::new(MarkerLayer::new())),
        }
    }

    pub async fn view_inputs(&self) -> (Option<Arc<ContactSnapshot>>, SessionConfig) {
        let session = self.session.read().await.clone();
        (self.store.current(), session)
    }

    pub fn feed_status(&self) -> FeedStatus {
        self.feed_status.borrow().clone()
    }
}
