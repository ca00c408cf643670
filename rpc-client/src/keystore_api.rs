use {
    crate::node_client::NodeClient,
    serde_json::json,
    stakenet_rpc_client_api::{
        client_error::{ClientError, Result},
        response::SuccessResponse,
        RpcRequest, UserPass,
    },
};

pub struct KeystoreApi<'a> {
    client: &'a NodeClient,
}

impl<'a> KeystoreApi<'a> {
    pub(crate) fn new(client: &'a NodeClient) -> Self {
        Self { client }
    }

    /// Create a keystore user. Fails if the user already exists.
    pub async fn create_user(&self, user: &UserPass) -> Result<()> {
        let request = RpcRequest::CreateUser;
        let response: SuccessResponse = self
            .client
            .send(
                request,
                json!({ "username": user.username, "password": user.password }),
            )
            .await?;
        if !response.success {
            return Err(ClientError::rpc(
                request.endpoint().to_string(),
                request.method(),
                format!("keystore refused to create user {}", user.username),
            ));
        }
        Ok(())
    }
}
