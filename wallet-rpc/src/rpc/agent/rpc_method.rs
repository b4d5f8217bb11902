use crate::rpc::shared::method::RpcMethodBuilder;

pub const AGENT_RPC_METHOD_PREFIX: &str = "prople.agent";

const METHOD_CONNECTION_CREATE: &str = "connection.create";
const METHOD_CONNECTION_CONNECT: &str = "connection.connect";
const METHOD_CONNECTION_GET_STATE: &str = "connection.get_state";
const METHOD_CONNECTION_UPDATE_STATE: &str = "connection.update_state";
const METHOD_CONNECTION_SEND_MESSAGE: &str = "connection.send_message";
const METHOD_CONNECTION_RELEASE: &str = "connection.release";
const METHOD_CONNECTION_SERIALIZE: &str = "connection.serialize";
const METHOD_CONNECTION_DESERIALIZE: &str = "connection.deserialize";
const METHOD_CONNECTION_GET_PW_DID: &str = "connection.get_pw_did";
const METHOD_CONNECTION_GET_THEIR_PW_DID: &str = "connection.get_their_pw_did";
const METHOD_CREDENTIAL_GET_OFFERS: &str = "credential.get_offers";
const METHOD_CREDENTIAL_CREATE_WITH_OFFER: &str = "credential.create_with_offer";
const METHOD_CREDENTIAL_SEND_REQUEST: &str = "credential.send_request";
const METHOD_CREDENTIAL_UPDATE_STATE_V2: &str = "credential.update_state_v2";
const METHOD_CREDENTIAL_GET_CREDENTIAL: &str = "credential.get_credential";

/// `Method` lists the agent runtime methods consumed by the wallet
#[derive(Clone, Debug, PartialEq)]
pub enum Method {
    ConnectionCreate,
    ConnectionConnect,
    ConnectionGetState,
    ConnectionUpdateState,
    ConnectionSendMessage,
    ConnectionRelease,
    ConnectionSerialize,
    ConnectionDeserialize,
    ConnectionGetPwDID,
    ConnectionGetTheirPwDID,
    CredentialGetOffers,
    CredentialCreateWithOffer,
    CredentialSendRequest,
    CredentialUpdateStateV2,
    CredentialGetCredential,
}

impl RpcMethodBuilder for Method {
    fn build_path(&self) -> &str {
        match self {
            Method::ConnectionCreate => METHOD_CONNECTION_CREATE,
            Method::ConnectionConnect => METHOD_CONNECTION_CONNECT,
            Method::ConnectionGetState => METHOD_CONNECTION_GET_STATE,
            Method::ConnectionUpdateState => METHOD_CONNECTION_UPDATE_STATE,
            Method::ConnectionSendMessage => METHOD_CONNECTION_SEND_MESSAGE,
            Method::ConnectionRelease => METHOD_CONNECTION_RELEASE,
            Method::ConnectionSerialize => METHOD_CONNECTION_SERIALIZE,
            Method::ConnectionDeserialize => METHOD_CONNECTION_DESERIALIZE,
            Method::ConnectionGetPwDID => METHOD_CONNECTION_GET_PW_DID,
            Method::ConnectionGetTheirPwDID => METHOD_CONNECTION_GET_THEIR_PW_DID,
            Method::CredentialGetOffers => METHOD_CREDENTIAL_GET_OFFERS,
            Method::CredentialCreateWithOffer => METHOD_CREDENTIAL_CREATE_WITH_OFFER,
            Method::CredentialSendRequest => METHOD_CREDENTIAL_SEND_REQUEST,
            Method::CredentialUpdateStateV2 => METHOD_CREDENTIAL_UPDATE_STATE_V2,
            Method::CredentialGetCredential => METHOD_CREDENTIAL_GET_CREDENTIAL,
        }
    }

    fn prefix(&self) -> &str {
        AGENT_RPC_METHOD_PREFIX
    }
}
