use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

/// `Database` holds the storage used to persist connection snapshots between restarts
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(crate = "self::serde")]
pub struct Database {
    pub wallet: WalletDb,
}

impl ToValidate for Database {
    fn validate(&self) -> Result<(), CommonError> {
        self.wallet.validate()
    }
}

/// `WalletDb` points to the RocksDB instance and the single column family holding
/// every snapshot record. The database and its column are created on first start
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct WalletDb {
    pub(super) path: String,
    pub(super) column: String,

    #[serde(default)]
    pub(super) wal_dir: Option<String>,
}

impl WalletDb {
    pub fn get_path(&self) -> String {
        self.path.to_owned()
    }

    pub fn get_column(&self) -> String {
        self.column.to_owned()
    }

    /// Write-ahead logs stay inside `path` unless a dedicated directory is configured
    pub fn get_wal_dir(&self) -> Option<String> {
        self.wal_dir.to_owned()
    }
}

impl Default for WalletDb {
    fn default() -> Self {
        Self {
            path: "./wallet-storage".to_string(),
            column: "".to_string(),
            wal_dir: None,
        }
    }
}

impl ToValidate for WalletDb {
    fn validate(&self) -> Result<(), CommonError> {
        if self.path.is_empty() {
            return Err(CommonError::ValidationError(
                "config: database:wallet:path is missing".to_string(),
            ));
        }

        if self.column.is_empty() {
            return Err(CommonError::ValidationError(
                "config: database:wallet:column is missing".to_string(),
            ));
        }

        if let Some(dir) = &self.wal_dir {
            if dir.trim().is_empty() {
                return Err(CommonError::ValidationError(
                    "config: database:wallet:wal_dir must not be blank".to_string(),
                ));
            }
        }

        Ok(())
    }
}
