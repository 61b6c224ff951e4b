use std::sync::Arc;

use gz_store::ArticleLoader;

use crate::relay::Relay;

pub struct AppState {
    pub loader: Arc<ArticleLoader>,
    pub relay: Relay,
}

impl AppState {
    pub fn new(loader: Arc<ArticleLoader>) -> Self {
        Self {
            loader,
            relay: Relay::default(),
        }
    }
}
