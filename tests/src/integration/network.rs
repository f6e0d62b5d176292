//! # Loopback Network
//!
//! In-process stand-in for the HTTP transport. Nodes register under their
//! normalized URL; a node marked offline answers nothing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use ptm_01_party_info::{
    normalize_url, PartyInfo, PartyInfoApi, PartyInfoBroadcaster, PartyInfoClient, PartyInfoConfig,
    PartyInfoError, PartyInfoService, SystemTimeSource,
};
use ptm_02_payload_publisher::{
    AsyncBatchPayloadPublisher, PartyInfoResolver, PayloadPublisher, PayloadTransport,
    PublisherConfig, TransportError, TransportPayloadPublisher,
};
use ptm_03_transaction_store::{
    EncryptedTransaction, EncryptedTransactionDao, FaultyStagingDao, OwnMessageStore,
    PersistenceError, RecordingTransactionDao, ResendResponder, TransactionManager,
};
use ptm_04_resend::{ResendClient, ResendClientError, ResendConfig, ResendPartyStore, SyncPoller, TransactionRequester};
use ptm_05_recovery::{RecoveryConfig, RecoveryOrchestrator};
use shared_types::{
    BincodePayloadEncoder, EncodedPayload, PayloadEncoder, PrivacyMode, PublicKey, RecipientBox,
    ResendRequest, StaticKeyProvider,
};

pub fn key(b: u8) -> PublicKey {
    PublicKey::new([b; 32])
}

pub fn url(name: &str) -> String {
    format!("http://{name}:9000/")
}

/// Payload sent by `sender` to `recipients`, one box per recipient.
pub fn payload(text: &[u8], sender: PublicKey, recipients: &[PublicKey]) -> EncodedPayload {
    EncodedPayload {
        sender_key: sender,
        cipher_text: text.to_vec(),
        cipher_text_nonce: vec![1],
        recipient_boxes: recipients
            .iter()
            .map(|k| RecipientBox(k.as_bytes()[..4].to_vec()))
            .collect(),
        recipient_nonce: vec![2],
        recipient_keys: recipients.to_vec(),
        privacy_mode: PrivacyMode::StandardPrivate,
        affected_contract_transactions: Vec::new(),
        exec_hash: Vec::new(),
    }
}

pub fn row(payload: &EncodedPayload) -> EncryptedTransaction {
    let blob = BincodePayloadEncoder.encode(payload).unwrap();
    EncryptedTransaction::new(payload.hash(), blob)
}

/// How to build a node.
pub struct NodeSpec {
    pub name: &'static str,
    pub keys: Vec<PublicKey>,
    pub peers: Vec<String>,
    pub primary_rows: Vec<EncryptedTransaction>,
    pub resend: ResendConfig,
    pub recovery: RecoveryConfig,
    pub fetch_size: u64,
}

impl NodeSpec {
    pub fn new(name: &'static str, keys: &[PublicKey]) -> Self {
        Self {
            name,
            keys: keys.to_vec(),
            peers: Vec::new(),
            primary_rows: Vec::new(),
            resend: ResendConfig {
                request_timeout_ms: 5_000,
                ..ResendConfig::for_testing()
            },
            recovery: RecoveryConfig::default(),
            fetch_size: 50,
        }
    }

    pub fn peers(mut self, names: &[&str]) -> Self {
        self.peers = names.iter().map(|n| url(n)).collect();
        self
    }

    pub fn primary_rows(mut self, rows: Vec<EncryptedTransaction>) -> Self {
        self.primary_rows = rows;
        self
    }
}

/// A node wired the way the runtime wires it, on in-memory stores.
pub struct TestNode {
    pub url: String,
    pub party_info: Arc<PartyInfoService>,
    pub broadcaster: PartyInfoBroadcaster,
    pub primary: Arc<RecordingTransactionDao>,
    pub secondary: Arc<RecordingTransactionDao>,
    pub staging: Arc<FaultyStagingDao>,
    pub manager: Arc<TransactionManager>,
    pub responder: ResendResponder,
    pub batch_publisher: AsyncBatchPayloadPublisher,
    pub requester: Arc<TransactionRequester>,
    pub resend_queue: Arc<ResendPartyStore>,
    pub poller: SyncPoller,
    pub recovery: RecoveryOrchestrator,
    /// Incoming pushes land in the secondary store.
    pub recovering: AtomicBool,
}

impl TestNode {
    pub fn set_recovering(&self, on: bool) {
        self.recovering.store(on, Ordering::SeqCst);
    }

    /// Accept a pushed payload blob.
    fn receive(&self, blob: Vec<u8>) -> Result<(), String> {
        let payload = BincodePayloadEncoder.decode(&blob).map_err(|e| e.to_string())?;
        if self.recovering.load(Ordering::SeqCst) {
            match self.secondary.save(EncryptedTransaction::new(payload.hash(), blob)) {
                Ok(()) | Err(PersistenceError::Duplicate(_)) => Ok(()),
                Err(e) => Err(e.to_string()),
            }
        } else {
            self.manager
                .store_payload(payload)
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
    }
}

/// In-process network connecting test nodes.
#[derive(Default)]
pub struct LoopbackNetwork {
    nodes: RwLock<HashMap<String, Arc<TestNode>>>,
    offline: RwLock<HashSet<String>>,
    rejected_keys: RwLock<HashSet<PublicKey>>,
    resend_calls: Mutex<Vec<(String, PublicKey)>>,
}

impl LoopbackNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_node(self: &Arc<Self>, spec: NodeSpec) -> Arc<TestNode> {
        let node = Arc::new(self.build(spec));
        self.nodes.write().insert(node.url.clone(), Arc::clone(&node));
        node
    }

    fn build(self: &Arc<Self>, spec: NodeSpec) -> TestNode {
        let encoder: Arc<dyn PayloadEncoder> = Arc::new(BincodePayloadEncoder);
        let keys = Arc::new(StaticKeyProvider::new(spec.keys));
        let config = PartyInfoConfig {
            advertised_url: url(spec.name),
            peers: spec.peers,
            disable_peer_discovery: false,
        };

        let party_info = Arc::new(
            PartyInfoService::new(&config, keys.as_ref(), Arc::new(SystemTimeSource)).unwrap(),
        );
        let broadcaster = PartyInfoBroadcaster::new(party_info.clone(), self.clone());

        let publisher: Arc<dyn PayloadPublisher> = Arc::new(TransportPayloadPublisher::new(
            &PublisherConfig::default(),
            Arc::new(PartyInfoResolver::new(party_info.clone())),
            self.clone(),
            Arc::clone(&encoder),
        ));
        let batch_publisher = AsyncBatchPayloadPublisher::new(Arc::clone(&publisher));

        let primary = Arc::new(RecordingTransactionDao::with_transactions(spec.primary_rows));
        let secondary = Arc::new(RecordingTransactionDao::new());
        let staging = Arc::new(FaultyStagingDao::new());

        let manager = Arc::new(
            TransactionManager::new(primary.clone(), Arc::clone(&encoder), keys.clone())
                .with_resend_store(Arc::new(OwnMessageStore::new(
                    primary.clone(),
                    Arc::clone(&encoder),
                    keys.clone(),
                ))),
        );
        let responder = ResendResponder::new(
            primary.clone(),
            Arc::clone(&encoder),
            publisher,
            keys.clone(),
            spec.fetch_size,
        );

        let requester = Arc::new(TransactionRequester::new(&spec.resend, keys, self.clone()));
        let resend_queue = Arc::new(ResendPartyStore::new(spec.resend.max_attempts));
        let poller = SyncPoller::new(
            Arc::clone(&resend_queue),
            requester.clone(),
            party_info.clone(),
            self.clone(),
        );

        let recovery = RecoveryOrchestrator::new(
            &spec.recovery,
            party_info.clone(),
            requester.clone(),
            secondary.clone(),
            primary.clone(),
            staging.clone(),
            encoder,
            Arc::clone(&manager),
        );

        TestNode {
            url: config.advertised_url,
            party_info,
            broadcaster,
            primary,
            secondary,
            staging,
            manager,
            responder,
            batch_publisher,
            requester,
            resend_queue,
            poller,
            recovery,
            recovering: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, name: &str, offline: bool) {
        let mut set = self.offline.write();
        if offline {
            set.insert(url(name));
        } else {
            set.remove(&url(name));
        }
    }

    /// Resend requests for `key` are answered with an error.
    pub fn reject_resend_for(&self, key: PublicKey) {
        self.rejected_keys.write().insert(key);
    }

    /// `(url, key)` of every resend request that reached the network.
    pub fn resend_calls(&self) -> Vec<(String, PublicKey)> {
        self.resend_calls.lock().clone()
    }

    fn route(&self, target: &str) -> Result<Arc<TestNode>, String> {
        let target = normalize_url(target).map_err(|e| e.to_string())?;
        if self.offline.read().contains(&target) {
            return Err(format!("{target} is offline"));
        }
        self.nodes
            .read()
            .get(&target)
            .cloned()
            .ok_or_else(|| format!("no node at {target}"))
    }
}

#[async_trait]
impl PartyInfoClient for LoopbackNetwork {
    async fn send_party_info(
        &self,
        url: &str,
        info: &PartyInfo,
    ) -> Result<PartyInfo, PartyInfoError> {
        let node = self.route(url).map_err(|reason| PartyInfoError::Transport {
            url: url.to_string(),
            reason,
        })?;
        node.party_info.update_party_info(info.clone())
    }
}

#[async_trait]
impl ResendClient for LoopbackNetwork {
    async fn make_resend_request(
        &self,
        url: &str,
        request: &ResendRequest,
    ) -> Result<bool, ResendClientError> {
        self.resend_calls
            .lock()
            .push((url.to_string(), request.public_key));

        let node = self.route(url).map_err(|reason| ResendClientError::Unreachable {
            url: url.to_string(),
            reason,
        })?;
        if self.rejected_keys.read().contains(&request.public_key) {
            return Err(ResendClientError::Rejected {
                url: url.to_string(),
                reason: "rejected".to_string(),
            });
        }
        node.responder
            .resend(request)
            .await
            .map(|_| true)
            .map_err(|e| ResendClientError::Rejected {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl PayloadTransport for LoopbackNetwork {
    async fn push(&self, url: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        let node = self.route(url).map_err(TransportError::Unreachable)?;
        node.receive(payload).map_err(TransportError::Rejected)
    }
}
