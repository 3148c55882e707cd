use std::sync::Arc;

use domains::{AdminRepository, BlocklistRepository, PasswordVerifier, PostRepository, SessionTokens};
use services::{AuthService, BlocklistService, CommentService, PostService};

use crate::metrics::Metrics;
use crate::session::SessionPolicy;

/// The adapters the HTTP layer is wired against.
pub struct Ports {
    pub posts: Arc<dyn PostRepository>,
    pub blocklist: Arc<dyn BlocklistRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub passwords: Arc<dyn PasswordVerifier>,
    pub tokens: Arc<dyn SessionTokens>,
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub comments: Arc<CommentService>,
    pub posts: Arc<PostService>,
    pub blocklist: Arc<BlocklistService>,
    pub session: Arc<SessionPolicy>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(ports: Ports, session: SessionPolicy) -> Self {
        Self {
            auth: Arc::new(AuthService::new(ports.admins, ports.passwords, ports.tokens)),
            comments: Arc::new(CommentService::new(
                ports.posts.clone(),
                ports.blocklist.clone(),
            )),
            posts: Arc::new(PostService::new(ports.posts)),
            blocklist: Arc::new(BlocklistService::new(ports.blocklist)),
            session: Arc::new(session),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
