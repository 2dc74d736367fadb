use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{BackendKind, Config};
use crate::identity::{AuthEvents, FirebaseIdentity, Identity, MemoryIdentity};
use crate::session::SessionSigner;
use crate::store::{FirestoreStore, MemoryStore, Store};

/// Everything a request handler needs from the outside world. Built once at
/// startup and shared by the auth routes and the server functions.
#[derive(Clone)]
pub struct Backend {
    store: Store,
    identity: Identity,
    signer: SessionSigner,
    users_collection: Arc<str>,
}

impl Backend {
    pub fn new(store: Store, identity: Identity, signer: SessionSigner) -> Self {
        Self {
            store,
            identity,
            signer,
            users_collection: types::user::USERS_COLLECTION.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let events = AuthEvents::default();

        let (store, identity) = match config.backend {
            BackendKind::Memory => {
                tracing::info!("using in-memory store and identity provider");
                (
                    Store::Memory(MemoryStore::new()),
                    Identity::Memory(MemoryIdentity::new(events)),
                )
            }
            BackendKind::Firebase => {
                let firebase = &config.firebase;
                match (&firebase.api_key, &firebase.project_id) {
                    (Some(api_key), Some(project_id)) => {
                        tracing::info!(project_id, database = firebase.database, "using firebase");
                        (
                            Store::Firestore(FirestoreStore::new(
                                project_id,
                                &firebase.database,
                                api_key.clone(),
                            )?),
                            Identity::Firebase(FirebaseIdentity::new(api_key.clone(), events)?),
                        )
                    }
                    _ => {
                        tracing::error!(
                            "firebase backend selected but firebase.api_key or \
                             firebase.project_id is missing"
                        );
                        (Store::Unavailable, Identity::Unavailable(events))
                    }
                }
            }
        };

        let key = config.session_secret.clone().unwrap_or_else(|| {
            tracing::warn!("no session_secret configured; sessions will not survive a restart");
            SecretString::from(Uuid::new_v4().simple().to_string())
        });

        Ok(Self {
            users_collection: config.users_collection.as_str().into(),
            ..Self::new(store, identity, SessionSigner::new(key, config.secure_cookies))
        })
    }

    /// False when the external backend was selected but never configured.
    pub fn is_available(&self) -> bool {
        !matches!(self.store, Store::Unavailable)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn signer(&self) -> &SessionSigner {
        &self.signer
    }

    pub fn users_collection(&self) -> &str {
        &self.users_collection
    }
}
