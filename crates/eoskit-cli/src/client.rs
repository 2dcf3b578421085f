use std::time::Duration;

use eoskit_core::{
    Abi, AbiDef, ActionDataPacker, Bytes, ChainContext, ChainSource, Checksum256, CoreError, Name,
    PackedTransaction, TransactionSubmitter,
};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Fields of `/v1/chain/get_info` used for linking
#[derive(Debug, Clone, Deserialize)]
pub struct ChainInfo {
    pub chain_id: Checksum256,
    pub head_block_num: u32,
    pub last_irreversible_block_num: u32,
    pub last_irreversible_block_id: Checksum256,
}

#[derive(Debug, Deserialize)]
struct GetAbiResponse {
    account_name: Name,
    abi: Option<AbiDef>,
}

#[derive(Debug, Deserialize)]
struct AbiJsonToBinResponse {
    binargs: Bytes,
}

#[derive(Serialize)]
struct AbiJsonToBinRequest<'a> {
    code: Name,
    action: Name,
    args: &'a Value,
}

/// Blocking client for a node's chain API
pub struct NodeClient {
    endpoint: String,
    http: Client,
}

impl NodeClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, CoreError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Delegation(format!("building HTTP client: {e}")))?;
        Ok(NodeClient {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn get_info(&self) -> Result<ChainInfo, CoreError> {
        self.post("/v1/chain/get_info", &json!({}))
    }

    /// Fetch and compile an account's ABI
    pub fn get_abi(&self, account: Name) -> Result<Abi, CoreError> {
        let response: GetAbiResponse =
            self.post("/v1/chain/get_abi", &json!({ "account_name": account }))?;
        let def = response.abi.ok_or_else(|| {
            CoreError::Delegation(format!("account {} has no ABI", response.account_name))
        })?;
        Abi::new(def)
    }

    fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| CoreError::Delegation(format!("{path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(CoreError::Delegation(format!("{path} returned {status}: {detail}")));
        }

        response
            .json()
            .map_err(|e| CoreError::Delegation(format!("{path}: malformed response: {e}")))
    }
}

impl ChainSource for NodeClient {
    fn chain_context(&self) -> Result<ChainContext, CoreError> {
        let info = self.get_info()?;
        debug!(
            "Chain head {}, last irreversible {}",
            info.head_block_num, info.last_irreversible_block_num
        );
        Ok(ChainContext {
            chain_id: info.chain_id,
            ref_block_id: info.last_irreversible_block_id,
        })
    }
}

impl ActionDataPacker for NodeClient {
    fn pack_action_data(
        &self,
        account: Name,
        action: Name,
        args: &Value,
    ) -> Result<Vec<u8>, CoreError> {
        let response: AbiJsonToBinResponse = self.post(
            "/v1/chain/abi_json_to_bin",
            &AbiJsonToBinRequest {
                code: account,
                action,
                args,
            },
        )?;
        Ok(response.binargs.into_vec())
    }
}

impl TransactionSubmitter for NodeClient {
    fn submit(&self, transaction: &PackedTransaction) -> Result<Value, CoreError> {
        self.post("/v1/chain/push_transaction", transaction)
    }
}
