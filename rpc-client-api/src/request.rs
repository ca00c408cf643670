use {
    crate::chain::Chain,
    serde::{Deserialize, Serialize},
    serde_json::{json, Value},
    std::fmt,
};

/// HTTP path a group of methods is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcEndpoint {
    Info,
    Keystore,
    Chain(Chain),
}

impl RpcEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            RpcEndpoint::Info => "ext/info",
            RpcEndpoint::Keystore => "ext/keystore",
            RpcEndpoint::Chain(Chain::Exchange) => "ext/bc/X",
            RpcEndpoint::Chain(Chain::Platform) => "ext/bc/P",
            RpcEndpoint::Chain(Chain::Contract) => "ext/bc/C/rpc",
        }
    }
}

impl fmt::Display for RpcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcRequest {
    // info
    GetNodeId,
    IsBootstrapped,
    Peers,
    // keystore
    CreateUser,
    // exchange ledger
    AvmCreateAddress,
    AvmListAddresses,
    AvmImportKey,
    AvmExportKey,
    AvmSend,
    AvmExport,
    AvmImport,
    AvmGetBalance,
    AvmGetUtxos,
    AvmIssueTx,
    AvmGetTxStatus,
    // platform ledger
    PlatformCreateAddress,
    PlatformExportAvax,
    PlatformImportAvax,
    PlatformGetBalance,
    PlatformGetTxStatus,
    PlatformAddValidator,
    PlatformAddDelegator,
    PlatformGetCurrentValidators,
}

impl RpcRequest {
    pub fn endpoint(&self) -> RpcEndpoint {
        use RpcRequest::*;
        match self {
            GetNodeId | IsBootstrapped | Peers => RpcEndpoint::Info,
            CreateUser => RpcEndpoint::Keystore,
            AvmCreateAddress | AvmListAddresses | AvmImportKey | AvmExportKey | AvmSend
            | AvmExport | AvmImport | AvmGetBalance | AvmGetUtxos | AvmIssueTx
            | AvmGetTxStatus => RpcEndpoint::Chain(Chain::Exchange),
            PlatformCreateAddress | PlatformExportAvax | PlatformImportAvax
            | PlatformGetBalance | PlatformGetTxStatus | PlatformAddValidator
            | PlatformAddDelegator | PlatformGetCurrentValidators => {
                RpcEndpoint::Chain(Chain::Platform)
            }
        }
    }

    pub fn method(&self) -> &'static str {
        use RpcRequest::*;
        match self {
            GetNodeId => "info.getNodeID",
            IsBootstrapped => "info.isBootstrapped",
            Peers => "info.peers",
            CreateUser => "keystore.createUser",
            AvmCreateAddress => "avm.createAddress",
            AvmListAddresses => "avm.listAddresses",
            AvmImportKey => "avm.importKey",
            AvmExportKey => "avm.exportKey",
            AvmSend => "avm.send",
            AvmExport => "avm.export",
            AvmImport => "avm.import",
            AvmGetBalance => "avm.getBalance",
            AvmGetUtxos => "avm.getUTXOs",
            AvmIssueTx => "avm.issueTx",
            AvmGetTxStatus => "avm.getTxStatus",
            PlatformCreateAddress => "platform.createAddress",
            PlatformExportAvax => "platform.exportAVAX",
            PlatformImportAvax => "platform.importAVAX",
            PlatformGetBalance => "platform.getBalance",
            PlatformGetTxStatus => "platform.getTxStatus",
            PlatformAddValidator => "platform.addValidator",
            PlatformAddDelegator => "platform.addDelegator",
            PlatformGetCurrentValidators => "platform.getCurrentValidators",
        }
    }

    pub fn build_request_json(self, id: u64, params: Value) -> Value {
        json!({
           "jsonrpc": "2.0",
           "id": id,
           "method": self.method(),
           "params": params,
        })
    }
}

impl fmt::Display for RpcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// Keystore credentials. Only suitable for test networks: the password is
/// held in memory in the clear.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPass {
    pub username: String,
    pub password: String,
}

impl UserPass {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for UserPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPass")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
