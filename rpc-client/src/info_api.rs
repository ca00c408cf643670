use {
    crate::node_client::NodeClient,
    serde_json::json,
    stakenet_rpc_client_api::{
        client_error::Result,
        response::{IsBootstrappedResponse, NodeIdResponse, PeerInfo, PeersResponse},
        Chain, RpcRequest,
    },
};

/// Node identity, bootstrap status and peer list.
pub struct InfoApi<'a> {
    client: &'a NodeClient,
}

impl<'a> InfoApi<'a> {
    pub(crate) fn new(client: &'a NodeClient) -> Self {
        Self { client }
    }

    pub async fn node_id(&self) -> Result<String> {
        let response: NodeIdResponse = self.client.send(RpcRequest::GetNodeId, json!({})).await?;
        Ok(response.node_id)
    }

    pub async fn is_bootstrapped(&self, chain: Chain) -> Result<bool> {
        let response: IsBootstrappedResponse = self
            .client
            .send(RpcRequest::IsBootstrapped, json!({ "chain": chain.alias() }))
            .await?;
        Ok(response.is_bootstrapped)
    }

    pub async fn peers(&self) -> Result<Vec<PeerInfo>> {
        let response: PeersResponse = self.client.send(RpcRequest::Peers, json!({})).await?;
        Ok(response.peers)
    }
}
