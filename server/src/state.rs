use std::path::PathBuf;

use crate::db::DbPool;
use crate::ws::ClientRegistry;

/// Shared application state passed to all handlers via axum State extractor.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection wrapped in Arc<Mutex>
    pub db: DbPool,
    /// JWT signing secret
    pub jwt_secret: Vec<u8>,
    /// Live chat clients, the broadcast relay's target set
    pub clients: ClientRegistry,
    /// Directory where uploaded files are written and served from
    pub uploads_dir: PathBuf,
    /// Directory served as the static file fallback
    pub public_dir: PathBuf,
}
