use {
    crate::node_client::NodeClient,
    serde_json::json,
    stakenet_rpc_client_api::{
        client_error::{ClientError, Result},
        response::{
            AddressResponse, AddressesResponse, BalanceResponse, ExchangeTxStatus,
            ExchangeTxStatusResponse, PrivateKeyResponse, TxIdResponse, UtxosResponse,
        },
        tx::Utxo,
        Chain, RpcRequest, TxId, UserPass,
    },
};

/// Keystore-backed wallet calls and raw transaction calls on the exchange
/// ledger.
pub struct ExchangeApi<'a> {
    client: &'a NodeClient,
}

impl<'a> ExchangeApi<'a> {
    pub(crate) fn new(client: &'a NodeClient) -> Self {
        Self { client }
    }

    pub async fn create_address(&self, user: &UserPass) -> Result<String> {
        let response: AddressResponse = self
            .client
            .send(RpcRequest::AvmCreateAddress, credentials(user))
            .await?;
        Ok(response.address)
    }

    pub async fn list_addresses(&self, user: &UserPass) -> Result<Vec<String>> {
        let response: AddressesResponse = self
            .client
            .send(RpcRequest::AvmListAddresses, credentials(user))
            .await?;
        Ok(response.addresses)
    }

    /// Import `private_key` into `user`'s keystore and return the address
    /// it controls.
    pub async fn import_key(&self, user: &UserPass, private_key: &str) -> Result<String> {
        let response: AddressResponse = self
            .client
            .send(
                RpcRequest::AvmImportKey,
                json!({
                    "username": user.username,
                    "password": user.password,
                    "privateKey": private_key,
                }),
            )
            .await?;
        Ok(response.address)
    }

    pub async fn export_key(&self, user: &UserPass, address: &str) -> Result<String> {
        let response: PrivateKeyResponse = self
            .client
            .send(
                RpcRequest::AvmExportKey,
                json!({
                    "username": user.username,
                    "password": user.password,
                    "address": address,
                }),
            )
            .await?;
        Ok(response.private_key)
    }

    pub async fn send(&self, user: &UserPass, amount: u64, asset: &str, to: &str) -> Result<TxId> {
        let response: TxIdResponse = self
            .client
            .send(
                RpcRequest::AvmSend,
                json!({
                    "username": user.username,
                    "password": user.password,
                    "amount": amount.to_string(),
                    "assetID": asset,
                    "to": to,
                }),
            )
            .await?;
        Ok(response.tx_id)
    }

    /// Export `amount` of `asset` to `to`, an address on another ledger.
    pub async fn export(&self, user: &UserPass, amount: u64, asset: &str, to: &str) -> Result<TxId> {
        let response: TxIdResponse = self
            .client
            .send(
                RpcRequest::AvmExport,
                json!({
                    "username": user.username,
                    "password": user.password,
                    "amount": amount.to_string(),
                    "assetID": asset,
                    "to": to,
                }),
            )
            .await?;
        Ok(response.tx_id)
    }

    /// Import funds previously exported from `source` to `to`.
    pub async fn import(&self, user: &UserPass, to: &str, source: Chain) -> Result<TxId> {
        let response: TxIdResponse = self
            .client
            .send(
                RpcRequest::AvmImport,
                json!({
                    "username": user.username,
                    "password": user.password,
                    "to": to,
                    "sourceChain": source.alias(),
                }),
            )
            .await?;
        Ok(response.tx_id)
    }

    pub async fn balance(&self, address: &str, asset: &str) -> Result<u64> {
        let response: BalanceResponse = self
            .client
            .send(
                RpcRequest::AvmGetBalance,
                json!({ "address": address, "assetID": asset }),
            )
            .await?;
        Ok(response.balance)
    }

    /// Fetch up to `limit` UTXOs owned by `addresses` and decode them.
    pub async fn utxos(&self, addresses: &[String], limit: u32) -> Result<Vec<Utxo>> {
        let request = RpcRequest::AvmGetUtxos;
        let response: UtxosResponse = self
            .client
            .send(
                request,
                json!({ "addresses": addresses, "limit": limit, "encoding": "hex" }),
            )
            .await?;
        response
            .utxos
            .iter()
            .map(|encoded| {
                Utxo::from_hex(encoded).map_err(|err| {
                    ClientError::rpc(
                        request.endpoint().to_string(),
                        request.method(),
                        format!("undecodable utxo {encoded}: {err}"),
                    )
                })
            })
            .collect()
    }

    /// Submit a signed transaction.
    pub async fn issue_tx(&self, tx_bytes: &[u8]) -> Result<TxId> {
        let response: TxIdResponse = self
            .client
            .send(
                RpcRequest::AvmIssueTx,
                json!({ "tx": format!("0x{}", hex::encode(tx_bytes)), "encoding": "hex" }),
            )
            .await?;
        Ok(response.tx_id)
    }

    pub async fn tx_status(&self, tx_id: &TxId) -> Result<ExchangeTxStatus> {
        let response: ExchangeTxStatusResponse = self
            .client
            .send(RpcRequest::AvmGetTxStatus, json!({ "txID": tx_id.to_string() }))
            .await?;
        Ok(response.status)
    }
}

pub(crate) fn credentials(user: &UserPass) -> serde_json::Value {
    json!({ "username": user.username, "password": user.password })
}
