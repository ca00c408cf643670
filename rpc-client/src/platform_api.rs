use {
    crate::{exchange_api::credentials, node_client::NodeClient},
    serde_json::json,
    stakenet_rpc_client_api::{
        client_error::Result,
        response::{
            AddressResponse, BalanceResponse, CurrentValidatorsResponse, PlatformTxStatusResponse,
            TxIdResponse, ValidatorInfo,
        },
        Chain, RpcRequest, TxId, UserPass,
    },
};

/// Parameters shared by `platform.addValidator` and `platform.addDelegator`.
#[derive(Debug, Clone, PartialEq)]
pub struct StakeRequest {
    /// Node being validated (or delegated to).
    pub node_id: String,
    /// Platform address that funds the stake and receives rewards.
    pub reward_address: String,
    pub stake_amount: u64,
    /// Unix seconds.
    pub start_time: u64,
    /// Unix seconds.
    pub end_time: u64,
    /// Percentage of delegator rewards kept by a validator. Ignored for
    /// delegations.
    pub delegation_fee_rate: f32,
}

/// Staking and atomic-transfer calls on the platform ledger.
pub struct PlatformApi<'a> {
    client: &'a NodeClient,
}

impl<'a> PlatformApi<'a> {
    pub(crate) fn new(client: &'a NodeClient) -> Self {
        Self { client }
    }

    pub async fn create_address(&self, user: &UserPass) -> Result<String> {
        let response: AddressResponse = self
            .client
            .send(RpcRequest::PlatformCreateAddress, credentials(user))
            .await?;
        Ok(response.address)
    }

    /// Export `amount` to `to`, an exchange-ledger address.
    pub async fn export_avax(&self, user: &UserPass, to: &str, amount: u64) -> Result<TxId> {
        let response: TxIdResponse = self
            .client
            .send(
                RpcRequest::PlatformExportAvax,
                json!({
                    "username": user.username,
                    "password": user.password,
                    "to": to,
                    "amount": amount.to_string(),
                }),
            )
            .await?;
        Ok(response.tx_id)
    }

    pub async fn import_avax(&self, user: &UserPass, to: &str, source: Chain) -> Result<TxId> {
        let response: TxIdResponse = self
            .client
            .send(
                RpcRequest::PlatformImportAvax,
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

    pub async fn balance(&self, address: &str) -> Result<u64> {
        let response: BalanceResponse = self
            .client
            .send(
                RpcRequest::PlatformGetBalance,
                json!({ "addresses": [address] }),
            )
            .await?;
        Ok(response.balance)
    }

    pub async fn tx_status(&self, tx_id: &TxId) -> Result<PlatformTxStatusResponse> {
        self.client
            .send(
                RpcRequest::PlatformGetTxStatus,
                json!({ "txID": tx_id.to_string(), "includeReason": true }),
            )
            .await
    }

    pub async fn add_validator(&self, user: &UserPass, stake: &StakeRequest) -> Result<TxId> {
        let response: TxIdResponse = self
            .client
            .send(
                RpcRequest::PlatformAddValidator,
                json!({
                    "username": user.username,
                    "password": user.password,
                    "nodeID": stake.node_id,
                    "rewardAddress": stake.reward_address,
                    "stakeAmount": stake.stake_amount.to_string(),
                    "startTime": stake.start_time.to_string(),
                    "endTime": stake.end_time.to_string(),
                    "delegationFeeRate": stake.delegation_fee_rate,
                }),
            )
            .await?;
        Ok(response.tx_id)
    }

    pub async fn add_delegator(&self, user: &UserPass, stake: &StakeRequest) -> Result<TxId> {
        let response: TxIdResponse = self
            .client
            .send(
                RpcRequest::PlatformAddDelegator,
                json!({
                    "username": user.username,
                    "password": user.password,
                    "nodeID": stake.node_id,
                    "rewardAddress": stake.reward_address,
                    "stakeAmount": stake.stake_amount.to_string(),
                    "startTime": stake.start_time.to_string(),
                    "endTime": stake.end_time.to_string(),
                }),
            )
            .await?;
        Ok(response.tx_id)
    }

    pub async fn current_validators(&self) -> Result<Vec<ValidatorInfo>> {
        let response: CurrentValidatorsResponse = self
            .client
            .send(RpcRequest::PlatformGetCurrentValidators, json!({}))
            .await?;
        Ok(response.validators)
    }
}
