use cli_table::Table;

use prople_wallet_core::connection::types::ConnectionEntityAccessor;
use prople_wallet_core::connection::Connection;

#[derive(Table, Clone)]
pub(crate) struct ConnectionRow {
    #[table(title = "ID")]
    pub(crate) id: String,

    #[table(title = "Handle")]
    pub(crate) handle: u32,

    #[table(title = "Status")]
    pub(crate) status: String,

    #[table(title = "Selected")]
    pub(crate) selected: bool,

    #[table(title = "Updated At")]
    pub(crate) updated_at: String,
}

impl From<Connection> for ConnectionRow {
    fn from(value: Connection) -> Self {
        Self {
            id: value.get_id().to_string(),
            handle: value.get_handle(),
            status: value.get_status().description().to_string(),
            selected: value.is_selected(),
            updated_at: value.get_updated_at().to_rfc3339(),
        }
    }
}
