use rstdev_storage::engine::rocksdb::db::DB;
use rstdev_storage::engine::rocksdb::executor::Executor;
use rstdev_storage::engine::rocksdb::options::Options;

use crate::common::types::CommonError;
use crate::config::{Config, WalletDb};

pub struct Builder {
    cfg: Config,
}

impl Builder {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    pub fn build(
        &mut self,
        db_callback: impl FnOnce(&Config) -> WalletDb,
    ) -> Result<Executor, CommonError> {
        let wallet_db = db_callback(&self.cfg);
        let column = wallet_db.get_column();
        let wal_dir = wallet_db.get_wal_dir();

        let mut db_opts = Options::new(wallet_db.get_path(), column.clone());
        db_opts.build_default_opts().set_db_opts(move |opt| {
            opt.create_if_missing(true);
            opt.create_missing_column_families(true);
            if let Some(dir) = &wal_dir {
                opt.set_wal_dir(dir);
            }

            opt
        });

        let mut db = DB::new(db_opts).map_err(|err| CommonError::DbError(err.to_string()))?;
        let db_instance = db
            .build()
            .map_err(|err| CommonError::DbError(err.to_string()))?;

        db.set_db(db_instance);
        Ok(Executor::new(db, column))
    }
}
