use std::{path::PathBuf, sync::Arc};

use crate::{
    collab::{BlobStore, InvoiceRenderer, Mailer},
    db::{DbPool, OrmConn},
    session::{SessionKeys, SessionStore},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub keys: SessionKeys,
    pub sessions: SessionStore,
    pub mailer: Arc<dyn Mailer>,
    pub blob: Arc<dyn BlobStore>,
    pub renderer: Arc<dyn InvoiceRenderer>,
    pub upload_dir: PathBuf,
}
