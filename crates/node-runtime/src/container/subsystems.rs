//! # Subsystem Container
//!
//! Holds all subsystem instances and wires them to their adapters.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: keys, encoder, stores, client pool
//! Level 1: Party Info (ptm-01)
//! Level 2: Payload Publisher (ptm-02), Transaction Store (ptm-03)
//! Level 3: Resend (ptm-04)
//! Level 4: Recovery (ptm-05)
//! ```
//!
//! ## Thread Safety
//!
//! - All subsystems wrapped in `Arc` for shared ownership
//! - Mutable state lives behind each subsystem's own locks

use std::sync::Arc;

use ptm_01_party_info::{
    PartyInfoBroadcaster, PartyInfoError, PartyInfoService, SystemTimeSource,
};
use ptm_02_payload_publisher::{
    AsyncBatchPayloadPublisher, PartyInfoResolver, PayloadPublisher, TransportPayloadPublisher,
};
use ptm_03_transaction_store::{
    EncryptedTransactionDao, InMemoryEncryptedTransactionDao, InMemoryStagingEntityDao,
    OwnMessageStore, PersistenceError, ResendResponder, StagingEntityDao, TransactionManager,
};
use ptm_04_resend::{ResendPartyStore, SyncPoller, TransactionRequester};
use ptm_05_recovery::RecoveryOrchestrator;
use shared_types::{BincodePayloadEncoder, PayloadEncoder, StaticKeyProvider};
use thiserror::Error;
use tracing::info;

use crate::adapters::{ClientPool, HttpP2pClient};
use crate::container::config::{ConfigError, NodeConfig};

/// Startup failures.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    PartyInfo(#[from] PartyInfoError),

    #[error("Storage unavailable: {0}")]
    Storage(#[from] PersistenceError),
}

/// The three stores the node works with.
#[derive(Clone)]
pub struct Stores {
    /// Encrypted transactions served to peers and the local node.
    pub primary: Arc<dyn EncryptedTransactionDao>,
    /// Transactions pushed back to us during recovery.
    pub secondary: Arc<dyn EncryptedTransactionDao>,
    pub staging: Arc<dyn StagingEntityDao>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            primary: Arc::new(InMemoryEncryptedTransactionDao::new()),
            secondary: Arc::new(InMemoryEncryptedTransactionDao::new()),
            staging: Arc::new(InMemoryStagingEntityDao::new()),
        }
    }

    /// RocksDB-backed encrypted transaction stores; staging stays in memory.
    #[cfg(feature = "rocksdb")]
    pub fn open(config: &NodeConfig) -> Result<Self, ContainerError> {
        use crate::adapters::storage::{RocksDbConfig, RocksDbStore, RocksDbTransactionDao};

        let store = Arc::new(RocksDbStore::open(RocksDbConfig {
            path: config.storage.path.to_string_lossy().to_string(),
            ..Default::default()
        })?);
        info!("[node] RocksDB opened at {}", config.storage.path.display());
        Ok(Self {
            primary: Arc::new(RocksDbTransactionDao::primary(Arc::clone(&store))),
            secondary: Arc::new(RocksDbTransactionDao::secondary(store)),
            staging: Arc::new(InMemoryStagingEntityDao::new()),
        })
    }

    #[cfg(not(feature = "rocksdb"))]
    pub fn open(_config: &NodeConfig) -> Result<Self, ContainerError> {
        info!("[node] Using in-memory stores");
        Ok(Self::in_memory())
    }
}

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    pub config: NodeConfig,
    pub stores: Stores,
    pub client_pool: Arc<ClientPool>,

    /// Party Info (Subsystem 1)
    pub party_info: Arc<PartyInfoService>,
    pub broadcaster: Arc<PartyInfoBroadcaster>,

    /// Payload Publisher (Subsystem 2)
    pub publisher: Arc<dyn PayloadPublisher>,
    pub batch_publisher: Arc<AsyncBatchPayloadPublisher>,

    /// Transaction Store (Subsystem 3)
    pub transaction_manager: Arc<TransactionManager>,
    pub resend_responder: Arc<ResendResponder>,

    /// Resend (Subsystem 4)
    pub resend_queue: Arc<ResendPartyStore>,
    pub requester: Arc<TransactionRequester>,
    pub sync_poller: Arc<SyncPoller>,

    /// Recovery (Subsystem 5)
    pub recovery: Arc<RecoveryOrchestrator>,
}

impl SubsystemContainer {
    /// Validate `config`, open the configured stores and wire everything.
    pub fn new(config: NodeConfig) -> Result<Self, ContainerError> {
        config.validate()?;
        let stores = Stores::open(&config)?;
        Self::with_stores(config, stores)
    }

    /// Wire every subsystem on top of the given stores.
    pub fn with_stores(config: NodeConfig, stores: Stores) -> Result<Self, ContainerError> {
        // Level 0
        let keys = Arc::new(StaticKeyProvider::new(config.public_keys()?));
        let encoder: Arc<dyn PayloadEncoder> = Arc::new(BincodePayloadEncoder);
        let resend_config = config.resend_config();
        let client_pool = Arc::new(ClientPool::new(resend_config.request_timeout()));
        let http = Arc::new(HttpP2pClient::new(Arc::clone(&client_pool)));

        // Level 1
        let party_info = Arc::new(PartyInfoService::new(
            &config.party_info_config(),
            keys.as_ref(),
            Arc::new(SystemTimeSource),
        )?);
        let broadcaster = Arc::new(PartyInfoBroadcaster::new(
            party_info.clone(),
            http.clone(),
        ));

        // Level 2
        let publisher: Arc<dyn PayloadPublisher> = Arc::new(TransportPayloadPublisher::new(
            &config.publisher_config(),
            Arc::new(PartyInfoResolver::new(party_info.clone())),
            http.clone(),
            Arc::clone(&encoder),
        ));
        let batch_publisher = Arc::new(AsyncBatchPayloadPublisher::new(Arc::clone(&publisher)));

        let own_messages = Arc::new(OwnMessageStore::new(
            Arc::clone(&stores.primary),
            Arc::clone(&encoder),
            keys.clone(),
        ));
        let transaction_manager = Arc::new(
            TransactionManager::new(Arc::clone(&stores.primary), Arc::clone(&encoder), keys.clone())
                .with_resend_store(own_messages),
        );
        let resend_responder = Arc::new(ResendResponder::new(
            Arc::clone(&stores.primary),
            Arc::clone(&encoder),
            Arc::clone(&publisher),
            keys.clone(),
            config.resend.fetch_size,
        ));

        // Level 3
        let resend_queue = Arc::new(ResendPartyStore::new(resend_config.max_attempts));
        let requester = Arc::new(TransactionRequester::new(&resend_config, keys, http.clone()));
        let sync_poller = Arc::new(SyncPoller::new(
            Arc::clone(&resend_queue),
            requester.clone(),
            party_info.clone(),
            http,
        ));

        // Level 4
        let recovery = Arc::new(RecoveryOrchestrator::new(
            &config.recovery_config(),
            party_info.clone(),
            requester.clone(),
            Arc::clone(&stores.secondary),
            Arc::clone(&stores.primary),
            Arc::clone(&stores.staging),
            encoder,
            Arc::clone(&transaction_manager),
        ));

        info!(
            "[node] Subsystems wired: url={} peers={}",
            config.server.url,
            config.peers.len()
        );

        Ok(Self {
            config,
            stores,
            client_pool,
            party_info,
            broadcaster,
            publisher,
            batch_publisher,
            transaction_manager,
            resend_responder,
            resend_queue,
            requester,
            sync_poller,
            recovery,
        })
    }
}
