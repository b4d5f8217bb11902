use prople_jsonrpc_core::types::RpcMethod;

use crate::common::types::CommonError;
use crate::rpc::shared::method::{RpcMethodBuilder, RPC_METHOD_PREFIX};

const METHOD_CONNECTION_CREATE: &str = "connection.create_from_invitation";
const METHOD_CONNECTION_GET: &str = "connection.get";
const METHOD_CONNECTION_LIST: &str = "connection.list";
const METHOD_CONNECTION_TOGGLE_SELECTED: &str = "connection.toggle_selected";
const METHOD_CONNECTION_SEND_MESSAGE: &str = "connection.send_message";
const METHOD_CONNECTION_REFRESH_STATUS: &str = "connection.refresh_status";
const METHOD_CONNECTION_RELEASE: &str = "connection.release";
const METHOD_CONNECTION_PAIRWISE_INFO: &str = "connection.pairwise_info";
const METHOD_CONNECTION_EXPORT: &str = "connection.export";
const METHOD_CREDENTIAL_LIST: &str = "credential.list";
const METHOD_CREDENTIAL_GET: &str = "credential.get";
const METHOD_CREDENTIAL_LIST_OFFERS: &str = "credential.list_offers";
const METHOD_SYNC_TICK: &str = "sync.tick";

#[derive(Clone, Debug, PartialEq)]
pub enum Method {
    CreateFromInvitation,
    GetConnection,
    ListConnections,
    ToggleSelected,
    SendMessage,
    RefreshStatus,
    ReleaseConnection,
    PairwiseInfo,
    ExportConnection,
    ListCredentials,
    GetCredential,
    ListOffers,
    Tick,
}

impl Method {
    /// `need_params` is false for the methods working on the whole registries
    pub fn need_params(&self) -> bool {
        !matches!(
            self,
            Method::ListConnections | Method::ListCredentials | Method::Tick
        )
    }
}

impl RpcMethodBuilder for Method {
    fn build_path(&self) -> &str {
        match self {
            Method::CreateFromInvitation => METHOD_CONNECTION_CREATE,
            Method::GetConnection => METHOD_CONNECTION_GET,
            Method::ListConnections => METHOD_CONNECTION_LIST,
            Method::ToggleSelected => METHOD_CONNECTION_TOGGLE_SELECTED,
            Method::SendMessage => METHOD_CONNECTION_SEND_MESSAGE,
            Method::RefreshStatus => METHOD_CONNECTION_REFRESH_STATUS,
            Method::ReleaseConnection => METHOD_CONNECTION_RELEASE,
            Method::PairwiseInfo => METHOD_CONNECTION_PAIRWISE_INFO,
            Method::ExportConnection => METHOD_CONNECTION_EXPORT,
            Method::ListCredentials => METHOD_CREDENTIAL_LIST,
            Method::GetCredential => METHOD_CREDENTIAL_GET,
            Method::ListOffers => METHOD_CREDENTIAL_LIST_OFFERS,
            Method::Tick => METHOD_SYNC_TICK,
        }
    }
}

impl TryFrom<RpcMethod> for Method {
    type Error = CommonError;

    fn try_from(value: RpcMethod) -> Result<Self, Self::Error> {
        let given = value.to_string();
        let prefix = format!("{}.", RPC_METHOD_PREFIX);
        let path = given.strip_prefix(prefix.as_str()).unwrap_or(given.as_str());

        // paths are matched exactly, `credential.list` is a prefix of `credential.list_offers`
        match path {
            METHOD_CONNECTION_CREATE => Ok(Self::CreateFromInvitation),
            METHOD_CONNECTION_GET => Ok(Self::GetConnection),
            METHOD_CONNECTION_LIST => Ok(Self::ListConnections),
            METHOD_CONNECTION_TOGGLE_SELECTED => Ok(Self::ToggleSelected),
            METHOD_CONNECTION_SEND_MESSAGE => Ok(Self::SendMessage),
            METHOD_CONNECTION_REFRESH_STATUS => Ok(Self::RefreshStatus),
            METHOD_CONNECTION_RELEASE => Ok(Self::ReleaseConnection),
            METHOD_CONNECTION_PAIRWISE_INFO => Ok(Self::PairwiseInfo),
            METHOD_CONNECTION_EXPORT => Ok(Self::ExportConnection),
            METHOD_CREDENTIAL_LIST => Ok(Self::ListCredentials),
            METHOD_CREDENTIAL_GET => Ok(Self::GetCredential),
            METHOD_CREDENTIAL_LIST_OFFERS => Ok(Self::ListOffers),
            METHOD_SYNC_TICK => Ok(Self::Tick),
            _ => Err(CommonError::MethodError(format!("unknown method: {}", given))),
        }
    }
}
