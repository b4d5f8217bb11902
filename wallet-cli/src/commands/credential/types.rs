use cli_table::Table;

use prople_wallet_core::credential::types::CredentialEntityAccessor;
use prople_wallet_core::credential::Credential;

#[derive(Table, Clone)]
pub(crate) struct CredentialRow {
    #[table(title = "Handle")]
    pub(crate) handle: u32,

    #[table(title = "Connection")]
    pub(crate) connection_id: String,

    #[table(title = "Offer")]
    pub(crate) offer_id: String,

    #[table(title = "Status")]
    pub(crate) status: String,

    #[table(title = "Request Sent")]
    pub(crate) request_sent: bool,

    #[table(title = "Materialized")]
    pub(crate) materialized: bool,
}

impl From<Credential> for CredentialRow {
    fn from(value: Credential) -> Self {
        Self {
            handle: value.get_handle(),
            connection_id: value.get_connection_id().to_string(),
            offer_id: value.get_offer_id(),
            status: value.get_status().description().to_string(),
            request_sent: value.is_request_sent(),
            materialized: value.is_materialized(),
        }
    }
}
