//! In-memory stand-in for a network of nodes.
//!
//! A [`MockLedger`] holds the state every node of one test network agrees
//! on: exchange-ledger UTXOs, platform balances, exported funds awaiting
//! import, transaction statuses, the validator set and which nodes are
//! online. Each [`MockNode`] adds what is private to one node (keystore
//! users, bootstrap answers, injected failures) and a [`MockSender`] routes
//! RPC requests to it, so the real [`crate::node_client::NodeClient`] request
//! building and response decoding run unchanged in tests.
//!
//! Wallet operations (`send`, `export`, `import`) charge no fee. Transfers
//! issued with `avm.issueTx` must spend an existing UTXO with its exact
//! amount, be signed by its owner and not create value; spending an
//! already-spent UTXO yields a `Rejected` transaction.

use {
    crate::rpc_sender::RpcSender,
    async_trait::async_trait,
    log::debug,
    parking_lot::Mutex,
    serde::Serialize,
    serde_json::{json, Value},
    solana_keypair::Keypair,
    solana_pubkey::Pubkey,
    solana_signer::Signer,
    stakenet_rpc_client_api::{
        client_error::{ClientError, Result},
        keys::{encode_private_key, format_address, parse_address, parse_private_key},
        response::{
            DelegatorInfo, ExchangeTxStatus, PeerInfo, PlatformTxStatus,
            PlatformTxStatusResponse, ValidatorInfo,
        },
        tx::{SignedTransfer, TransferOutput, Utxo, UtxoId, NATIVE_ASSET},
        Chain, RpcRequest, TxId,
    },
    std::{
        collections::{BTreeMap, HashMap, HashSet, VecDeque},
        sync::Arc,
    },
};

/// What a node answers to one `info.isBootstrapped` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapReply {
    Ready,
    NotReady,
    Unreachable,
}

#[derive(Debug, Clone)]
struct LiveNode {
    node_id: String,
    ip: String,
}

#[derive(Default)]
struct LedgerState {
    utxos: BTreeMap<UtxoId, Utxo>,
    spent: HashSet<UtxoId>,
    platform_balances: HashMap<String, u64>,
    exported: HashMap<(Chain, String), u64>,
    exchange_statuses: HashMap<TxId, VecDeque<ExchangeTxStatus>>,
    platform_statuses: HashMap<TxId, VecDeque<PlatformTxStatusResponse>>,
    validators: Vec<ValidatorInfo>,
    live_nodes: BTreeMap<String, LiveNode>,
    next_tx: u64,
    processing_polls: usize,
}

impl LedgerState {
    fn next_tx_id(&mut self) -> TxId {
        self.next_tx = self.next_tx.saturating_add(1);
        TxId::of(format!("mock-tx-{}", self.next_tx).as_bytes())
    }

    fn record_exchange(&mut self, tx_id: TxId, terminal: ExchangeTxStatus) {
        let mut statuses: VecDeque<_> =
            std::iter::repeat_n(ExchangeTxStatus::Processing, self.processing_polls).collect();
        statuses.push_back(terminal);
        self.exchange_statuses.insert(tx_id, statuses);
    }

    fn record_platform(&mut self, tx_id: TxId) {
        let processing = PlatformTxStatusResponse {
            status: PlatformTxStatus::Processing,
            reason: None,
        };
        let mut statuses: VecDeque<_> =
            std::iter::repeat_n(processing, self.processing_polls).collect();
        statuses.push_back(PlatformTxStatusResponse {
            status: PlatformTxStatus::Committed,
            reason: None,
        });
        self.platform_statuses.insert(tx_id, statuses);
    }

    fn exchange_balance(&self, owner: &Pubkey) -> u64 {
        self.utxos
            .values()
            .filter(|utxo| utxo.output.owner == *owner)
            .fold(0u64, |total, utxo| total.saturating_add(utxo.output.amount))
    }

    fn mint(&mut self, tx_id: TxId, output_index: u32, owner: Pubkey, amount: u64) -> Utxo {
        let utxo = Utxo {
            id: UtxoId {
                tx_id,
                output_index,
            },
            asset: NATIVE_ASSET.to_string(),
            output: TransferOutput { amount, owner },
        };
        self.utxos.insert(utxo.id, utxo.clone());
        utxo
    }

    /// Consume UTXOs of `owners` worth at least `amount`, returning the
    /// first consumed owner (who receives change) and the change amount.
    fn consume(&mut self, owners: &[Pubkey], amount: u64) -> std::result::Result<(Pubkey, u64), String> {
        let mut selected = Vec::new();
        let mut gathered = 0u64;
        for utxo in self.utxos.values() {
            if gathered >= amount {
                break;
            }
            if owners.contains(&utxo.output.owner) {
                gathered = gathered.saturating_add(utxo.output.amount);
                selected.push((utxo.id, utxo.output.owner));
            }
        }
        if gathered < amount {
            return Err(format!(
                "insufficient funds: have {gathered}, need {amount}"
            ));
        }
        let change_owner = selected
            .first()
            .map(|(_, owner)| *owner)
            .or_else(|| owners.first().copied())
            .ok_or_else(|| "no addresses to spend from".to_string())?;
        for (id, _) in selected {
            self.utxos.remove(&id);
            self.spent.insert(id);
        }
        Ok((change_owner, gathered.saturating_sub(amount)))
    }

    fn peers_of(&self, node_id: &str) -> Vec<PeerInfo> {
        let validators: HashSet<&str> = self
            .validators
            .iter()
            .map(|validator| validator.node_id.as_str())
            .collect();
        let sees_everyone = validators.contains(node_id);
        let mut seen = HashSet::new();
        self.live_nodes
            .values()
            .filter(|peer| peer.node_id != node_id)
            .filter(|peer| sees_everyone || validators.contains(peer.node_id.as_str()))
            .filter(|peer| seen.insert(peer.node_id.clone()))
            .map(|peer| PeerInfo {
                ip: format!("{}:9651", peer.ip),
                public_ip: format!("{}:9651", peer.ip),
                node_id: peer.node_id.clone(),
                version: "stakenet/mock".to_string(),
                last_sent: String::new(),
                last_received: String::new(),
            })
            .collect()
    }
}

fn next_status<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

/// Network-wide state shared by every [`MockNode`] of one test network.
#[derive(Default)]
pub struct MockLedger {
    state: Mutex<LedgerState>,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every new transaction report `Processing` for `polls` status
    /// queries before reaching its terminal status.
    pub fn set_processing_polls(&self, polls: usize) {
        self.state.lock().processing_polls = polls;
    }

    /// Create a genesis UTXO owned by `owner`.
    pub fn fund_exchange(&self, owner: &Pubkey, amount: u64) -> Utxo {
        let mut state = self.state.lock();
        let tx_id = state.next_tx_id();
        state.mint(tx_id, 0, *owner, amount)
    }

    pub fn fund_platform(&self, address: &str, amount: u64) {
        let mut state = self.state.lock();
        let balance = state.platform_balances.entry(address.to_string()).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Register a validator present since genesis.
    pub fn add_genesis_validator(&self, node_id: &str, stake_amount: u64) {
        self.state.lock().validators.push(ValidatorInfo {
            node_id: node_id.to_string(),
            start_time: 0,
            end_time: u64::MAX,
            stake_amount,
            delegators: Vec::new(),
        });
    }

    pub fn script_exchange_status(&self, tx_id: TxId, statuses: Vec<ExchangeTxStatus>) {
        self.state
            .lock()
            .exchange_statuses
            .insert(tx_id, statuses.into());
    }

    pub fn script_platform_status(&self, tx_id: TxId, statuses: Vec<PlatformTxStatusResponse>) {
        self.state
            .lock()
            .platform_statuses
            .insert(tx_id, statuses.into());
    }

    /// Mark the node registered under `key` online.
    pub fn connect(&self, key: &str, node_id: &str, ip: &str) {
        self.state.lock().live_nodes.insert(
            key.to_string(),
            LiveNode {
                node_id: node_id.to_string(),
                ip: ip.to_string(),
            },
        );
    }

    pub fn disconnect(&self, key: &str) {
        self.state.lock().live_nodes.remove(key);
    }

    pub fn exchange_balance(&self, address: &str) -> u64 {
        match parse_address(address) {
            Ok((_, owner)) => self.state.lock().exchange_balance(&owner),
            Err(_) => 0,
        }
    }

    pub fn platform_balance(&self, address: &str) -> u64 {
        self.state
            .lock()
            .platform_balances
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    pub fn validators(&self) -> Vec<ValidatorInfo> {
        self.state.lock().validators.clone()
    }

    pub fn is_spent(&self, utxo_id: &UtxoId) -> bool {
        self.state.lock().spent.contains(utxo_id)
    }
}

#[derive(Default)]
struct MockUser {
    password: String,
    exchange_secrets: Vec<[u8; 32]>,
    platform_addresses: Vec<String>,
}

impl MockUser {
    fn exchange_owners(&self) -> Vec<Pubkey> {
        self.exchange_secrets
            .iter()
            .map(|secret| Keypair::new_from_array(*secret).pubkey())
            .collect()
    }

    fn exchange_addresses(&self) -> Vec<String> {
        self.exchange_owners()
            .iter()
            .map(|owner| format_address(Chain::Exchange, owner))
            .collect()
    }
}

struct NodeState {
    users: HashMap<String, MockUser>,
    bootstrap_script: HashMap<Chain, VecDeque<BootstrapReply>>,
    bootstrap_default: BootstrapReply,
    bootstrap_queries: HashMap<Chain, usize>,
    failures: HashMap<RpcRequest, VecDeque<String>>,
    request_counts: HashMap<RpcRequest, usize>,
}

/// One node of a mock network.
pub struct MockNode {
    node_id: String,
    ledger: Arc<MockLedger>,
    state: Mutex<NodeState>,
}

impl MockNode {
    pub fn new(node_id: impl Into<String>, ledger: Arc<MockLedger>) -> Arc<Self> {
        Arc::new(Self {
            node_id: node_id.into(),
            ledger,
            state: Mutex::new(NodeState {
                users: HashMap::new(),
                bootstrap_script: HashMap::new(),
                bootstrap_default: BootstrapReply::Ready,
                bootstrap_queries: HashMap::new(),
                failures: HashMap::new(),
                request_counts: HashMap::new(),
            }),
        })
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn ledger(&self) -> &Arc<MockLedger> {
        &self.ledger
    }

    /// Answer used once every scripted bootstrap reply has been consumed.
    pub fn set_bootstrap_default(&self, reply: BootstrapReply) {
        self.state.lock().bootstrap_default = reply;
    }

    pub fn script_bootstrap(&self, chain: Chain, replies: Vec<BootstrapReply>) {
        self.state
            .lock()
            .bootstrap_script
            .insert(chain, replies.into());
    }

    pub fn bootstrap_queries(&self, chain: Chain) -> usize {
        self.state
            .lock()
            .bootstrap_queries
            .get(&chain)
            .copied()
            .unwrap_or(0)
    }

    /// Fail the next call of `request` with an RPC error carrying `message`.
    pub fn fail_next(&self, request: RpcRequest, message: impl Into<String>) {
        self.state
            .lock()
            .failures
            .entry(request)
            .or_default()
            .push_back(message.into());
    }

    pub fn request_count(&self, request: RpcRequest) -> usize {
        self.state
            .lock()
            .request_counts
            .get(&request)
            .copied()
            .unwrap_or(0)
    }

    fn handle(&self, request: RpcRequest, params: &Value) -> Result<Value> {
        let fail = |message: String| ClientError::rpc(request.endpoint().to_string(), request.method(), message);
        {
            let mut node = self.state.lock();
            let count = node.request_counts.entry(request).or_default();
            *count = count.saturating_add(1);
            if let Some(message) = node
                .failures
                .get_mut(&request)
                .and_then(VecDeque::pop_front)
            {
                return Err(fail(message));
            }
        }
        self.dispatch(request, params).map_err(fail)
    }

    fn dispatch(&self, request: RpcRequest, params: &Value) -> std::result::Result<Value, String> {
        use RpcRequest::*;
        match request {
            GetNodeId => respond(json!({ "nodeID": self.node_id })),
            IsBootstrapped => self.is_bootstrapped(params),
            Peers => {
                let peers = self.ledger.state.lock().peers_of(&self.node_id);
                respond(json!({ "numPeers": peers.len().to_string(), "peers": peers }))
            }
            CreateUser => {
                let username = str_param(params, "username")?;
                let password = str_param(params, "password")?;
                let mut node = self.state.lock();
                if node.users.contains_key(username) {
                    return Err(format!("user {username} already exists"));
                }
                node.users.insert(
                    username.to_string(),
                    MockUser {
                        password: password.to_string(),
                        ..MockUser::default()
                    },
                );
                respond(json!({ "success": true }))
            }
            AvmCreateAddress => {
                let keypair = Keypair::new();
                self.with_user(params, |user| {
                    user.exchange_secrets.push(secret_of(&keypair));
                })?;
                respond(json!({ "address": format_address(Chain::Exchange, &keypair.pubkey()) }))
            }
            AvmListAddresses => {
                let addresses = self.with_user(params, |user| user.exchange_addresses())?;
                respond(json!({ "addresses": addresses }))
            }
            AvmImportKey => {
                let keypair = parse_private_key(str_param(params, "privateKey")?)
                    .map_err(|err| err.to_string())?;
                let secret = secret_of(&keypair);
                self.with_user(params, |user| {
                    if !user.exchange_secrets.contains(&secret) {
                        user.exchange_secrets.push(secret);
                    }
                })?;
                respond(json!({ "address": format_address(Chain::Exchange, &keypair.pubkey()) }))
            }
            AvmExportKey => {
                let address = str_param(params, "address")?;
                let secret = self
                    .with_user(params, |user| {
                        user.exchange_secrets.iter().copied().find(|secret| {
                            format_address(Chain::Exchange, &Keypair::new_from_array(*secret).pubkey())
                                == address
                        })
                    })?
                    .ok_or_else(|| format!("address {address} is not controlled by this user"))?;
                respond(json!({ "privateKey": encode_private_key(&Keypair::new_from_array(secret)) }))
            }
            AvmSend => {
                let amount = u64_param(params, "amount")?;
                let (_, recipient) = parse_address(str_param(params, "to")?).map_err(|err| err.to_string())?;
                let owners = self.with_user(params, |user| user.exchange_owners())?;
                let mut ledger = self.ledger.state.lock();
                let (change_owner, change) = ledger.consume(&owners, amount)?;
                let tx_id = ledger.next_tx_id();
                ledger.mint(tx_id, 0, recipient, amount);
                if change > 0 {
                    ledger.mint(tx_id, 1, change_owner, change);
                }
                ledger.record_exchange(tx_id, ExchangeTxStatus::Accepted);
                respond(json!({ "txID": tx_id }))
            }
            AvmExport => {
                let amount = u64_param(params, "amount")?;
                let to = str_param(params, "to")?;
                let (destination, _) = parse_address(to).map_err(|err| err.to_string())?;
                let owners = self.with_user(params, |user| user.exchange_owners())?;
                let mut ledger = self.ledger.state.lock();
                let (change_owner, change) = ledger.consume(&owners, amount)?;
                let tx_id = ledger.next_tx_id();
                if change > 0 {
                    ledger.mint(tx_id, 0, change_owner, change);
                }
                let pending = ledger.exported.entry((destination, to.to_string())).or_default();
                *pending = pending.saturating_add(amount);
                ledger.record_exchange(tx_id, ExchangeTxStatus::Accepted);
                respond(json!({ "txID": tx_id }))
            }
            AvmImport => {
                let to = str_param(params, "to")?;
                let (_, owner) = parse_address(to).map_err(|err| err.to_string())?;
                self.with_user(params, |_| ())?;
                let mut ledger = self.ledger.state.lock();
                let amount = ledger
                    .exported
                    .remove(&(Chain::Exchange, to.to_string()))
                    .ok_or_else(|| format!("no exported funds to import into {to}"))?;
                let tx_id = ledger.next_tx_id();
                ledger.mint(tx_id, 0, owner, amount);
                ledger.record_exchange(tx_id, ExchangeTxStatus::Accepted);
                respond(json!({ "txID": tx_id }))
            }
            AvmGetBalance => {
                let (_, owner) = parse_address(str_param(params, "address")?).map_err(|err| err.to_string())?;
                let balance = self.ledger.state.lock().exchange_balance(&owner);
                respond(json!({ "balance": balance.to_string() }))
            }
            AvmGetUtxos => self.get_utxos(params),
            AvmIssueTx => self.issue_tx(params),
            AvmGetTxStatus => {
                let tx_id = tx_id_param(params)?;
                let status = self
                    .ledger
                    .state
                    .lock()
                    .exchange_statuses
                    .get_mut(&tx_id)
                    .and_then(next_status)
                    .unwrap_or(ExchangeTxStatus::Unknown);
                respond(json!({ "status": status }))
            }
            PlatformCreateAddress => {
                let address = format_address(Chain::Platform, &Keypair::new().pubkey());
                self.with_user(params, |user| user.platform_addresses.push(address.clone()))?;
                respond(json!({ "address": address }))
            }
            PlatformExportAvax => {
                let amount = u64_param(params, "amount")?;
                let to = str_param(params, "to")?;
                let addresses = self.with_user(params, |user| user.platform_addresses.clone())?;
                let mut ledger = self.ledger.state.lock();
                let source = addresses
                    .iter()
                    .find(|address| ledger.platform_balances.get(*address).copied().unwrap_or(0) >= amount)
                    .cloned()
                    .ok_or_else(|| format!("insufficient platform funds to export {amount}"))?;
                debit(&mut ledger.platform_balances, &source, amount)?;
                let pending = ledger.exported.entry((Chain::Exchange, to.to_string())).or_default();
                *pending = pending.saturating_add(amount);
                let tx_id = ledger.next_tx_id();
                ledger.record_platform(tx_id);
                respond(json!({ "txID": tx_id }))
            }
            PlatformImportAvax => {
                let to = str_param(params, "to")?;
                self.with_user(params, |_| ())?;
                let mut ledger = self.ledger.state.lock();
                let amount = ledger
                    .exported
                    .remove(&(Chain::Platform, to.to_string()))
                    .ok_or_else(|| format!("no exported funds to import into {to}"))?;
                let balance = ledger.platform_balances.entry(to.to_string()).or_default();
                *balance = balance.saturating_add(amount);
                let tx_id = ledger.next_tx_id();
                ledger.record_platform(tx_id);
                respond(json!({ "txID": tx_id }))
            }
            PlatformGetBalance => {
                let addresses = params
                    .get("addresses")
                    .and_then(Value::as_array)
                    .ok_or_else(|| "missing parameter addresses".to_string())?;
                let ledger = self.ledger.state.lock();
                let balance = addresses
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|address| ledger.platform_balances.get(address).copied().unwrap_or(0))
                    .fold(0u64, u64::saturating_add);
                respond(json!({ "balance": balance.to_string() }))
            }
            PlatformGetTxStatus => {
                let tx_id = tx_id_param(params)?;
                let status = self
                    .ledger
                    .state
                    .lock()
                    .platform_statuses
                    .get_mut(&tx_id)
                    .and_then(next_status)
                    .unwrap_or(PlatformTxStatusResponse {
                        status: PlatformTxStatus::Unknown,
                        reason: None,
                    });
                respond(status)
            }
            PlatformAddValidator => self.add_stake(params, false),
            PlatformAddDelegator => self.add_stake(params, true),
            PlatformGetCurrentValidators => {
                let validators = self.ledger.state.lock().validators.clone();
                respond(json!({ "validators": validators }))
            }
        }
    }

    fn is_bootstrapped(&self, params: &Value) -> std::result::Result<Value, String> {
        let chain: Chain = str_param(params, "chain")?
            .parse()
            .map_err(|err: stakenet_rpc_client_api::chain::ParseChainError| err.to_string())?;
        let reply = {
            let mut node = self.state.lock();
            let queries = node.bootstrap_queries.entry(chain).or_default();
            *queries = queries.saturating_add(1);
            let default = node.bootstrap_default;
            node.bootstrap_script
                .get_mut(&chain)
                .and_then(VecDeque::pop_front)
                .unwrap_or(default)
        };
        match reply {
            BootstrapReply::Ready => respond(json!({ "isBootstrapped": true })),
            BootstrapReply::NotReady => respond(json!({ "isBootstrapped": false })),
            BootstrapReply::Unreachable => Err("connection refused".to_string()),
        }
    }

    fn get_utxos(&self, params: &Value) -> std::result::Result<Value, String> {
        let owners = params
            .get("addresses")
            .and_then(Value::as_array)
            .ok_or_else(|| "missing parameter addresses".to_string())?
            .iter()
            .filter_map(Value::as_str)
            .map(|address| parse_address(address).map(|(_, owner)| owner))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| err.to_string())?;
        let limit = u64_param(params, "limit")
            .ok()
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);
        let ledger = self.ledger.state.lock();
        let utxos = ledger
            .utxos
            .values()
            .filter(|utxo| owners.contains(&utxo.output.owner))
            .take(limit)
            .map(Utxo::to_hex)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| err.to_string())?;
        respond(json!({
            "numFetched": utxos.len().to_string(),
            "utxos": utxos,
            "encoding": "hex",
        }))
    }

    fn issue_tx(&self, params: &Value) -> std::result::Result<Value, String> {
        let encoded = str_param(params, "tx")?;
        let bytes = hex::decode(encoded.trim_start_matches("0x")).map_err(|err| err.to_string())?;
        let tx = SignedTransfer::from_bytes(&bytes).map_err(|err| err.to_string())?;
        let tx_id = TxId::of(&bytes);

        let mut ledger = self.ledger.state.lock();
        if ledger.exchange_statuses.contains_key(&tx_id) {
            return respond(json!({ "txID": tx_id }));
        }
        let mut owners = Vec::with_capacity(tx.unsigned.inputs.len());
        let mut conflicting = false;
        for input in &tx.unsigned.inputs {
            if ledger.spent.contains(&input.utxo_id) {
                conflicting = true;
                continue;
            }
            let utxo = ledger
                .utxos
                .get(&input.utxo_id)
                .ok_or_else(|| format!("input {:?} does not exist", input.utxo_id))?;
            if utxo.output.amount != input.amount {
                return Err(format!(
                    "input amount {} does not match utxo amount {}",
                    input.amount, utxo.output.amount
                ));
            }
            owners.push(utxo.output.owner);
        }
        if conflicting {
            debug!("{tx_id} conflicts with an accepted transaction");
            ledger.record_exchange(tx_id, ExchangeTxStatus::Rejected);
            return respond(json!({ "txID": tx_id }));
        }
        if !tx.verify(&owners).map_err(|err| err.to_string())? {
            return Err("invalid signature".to_string());
        }
        match (tx.unsigned.input_total(), tx.unsigned.output_total()) {
            (Some(inputs), Some(outputs)) if outputs <= inputs => {}
            _ => return Err("outputs exceed inputs".to_string()),
        }
        for input in &tx.unsigned.inputs {
            ledger.utxos.remove(&input.utxo_id);
            ledger.spent.insert(input.utxo_id);
        }
        for (index, _) in tx.unsigned.outputs.iter().enumerate() {
            let index = u32::try_from(index).map_err(|err| err.to_string())?;
            if let Some(utxo) = tx.output_utxo(tx_id, index) {
                ledger.utxos.insert(utxo.id, utxo);
            }
        }
        ledger.record_exchange(tx_id, ExchangeTxStatus::Accepted);
        respond(json!({ "txID": tx_id }))
    }

    fn add_stake(&self, params: &Value, delegation: bool) -> std::result::Result<Value, String> {
        let node_id = str_param(params, "nodeID")?.to_string();
        let reward_address = str_param(params, "rewardAddress")?;
        let stake_amount = u64_param(params, "stakeAmount")?;
        let start_time = u64_param(params, "startTime")?;
        let end_time = u64_param(params, "endTime")?;
        if end_time <= start_time {
            return Err("staking period must end after it starts".to_string());
        }
        self.with_user(params, |_| ())?;

        let mut ledger = self.ledger.state.lock();
        debit(&mut ledger.platform_balances, reward_address, stake_amount)?;
        if delegation {
            let validator = ledger
                .validators
                .iter_mut()
                .find(|validator| validator.node_id == node_id)
                .ok_or_else(|| format!("{node_id} is not a validator"))?;
            validator.delegators.push(DelegatorInfo {
                node_id,
                start_time,
                end_time,
                stake_amount,
            });
        } else {
            if ledger.validators.iter().any(|validator| validator.node_id == node_id) {
                return Err(format!("{node_id} is already a validator"));
            }
            ledger.validators.push(ValidatorInfo {
                node_id,
                start_time,
                end_time,
                stake_amount,
                delegators: Vec::new(),
            });
        }
        let tx_id = ledger.next_tx_id();
        ledger.record_platform(tx_id);
        respond(json!({ "txID": tx_id }))
    }

    fn with_user<T>(
        &self,
        params: &Value,
        f: impl FnOnce(&mut MockUser) -> T,
    ) -> std::result::Result<T, String> {
        let username = str_param(params, "username")?;
        let password = str_param(params, "password")?;
        let mut node = self.state.lock();
        let user = node
            .users
            .get_mut(username)
            .ok_or_else(|| format!("user {username} not found"))?;
        if user.password != password {
            return Err("incorrect password".to_string());
        }
        Ok(f(user))
    }
}

fn secret_of(keypair: &Keypair) -> [u8; 32] {
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&keypair.to_bytes()[..32]);
    secret
}

fn debit(balances: &mut HashMap<String, u64>, address: &str, amount: u64) -> std::result::Result<(), String> {
    let balance = balances.entry(address.to_string()).or_default();
    *balance = balance
        .checked_sub(amount)
        .ok_or_else(|| format!("insufficient funds at {address}: need {amount}"))?;
    Ok(())
}

fn respond<T: Serialize>(value: T) -> std::result::Result<Value, String> {
    serde_json::to_value(value).map_err(|err| err.to_string())
}

fn str_param<'a>(params: &'a Value, name: &str) -> std::result::Result<&'a str, String> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing parameter {name}"))
}

fn u64_param(params: &Value, name: &str) -> std::result::Result<u64, String> {
    match params.get(name) {
        Some(Value::String(s)) => s.parse().map_err(|_| format!("parameter {name} is not a number")),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| format!("parameter {name} is not a u64")),
        _ => Err(format!("missing parameter {name}")),
    }
}

fn tx_id_param(params: &Value) -> std::result::Result<TxId, String> {
    str_param(params, "txID")?
        .parse()
        .map_err(|err: stakenet_rpc_client_api::keys::KeyError| err.to_string())
}

/// Routes requests to a [`MockNode`].
pub struct MockSender {
    node: Arc<MockNode>,
}

impl MockSender {
    pub fn new(node: Arc<MockNode>) -> Self {
        Self { node }
    }
}

#[async_trait]
impl RpcSender for MockSender {
    async fn send(&self, request: RpcRequest, params: Value) -> Result<Value> {
        self.node.handle(request, &params)
    }

    fn url(&self) -> String {
        format!("mock://{}", self.node.node_id)
    }
}
