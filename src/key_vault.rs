mod key_vault_database;

pub use self::key_vault_database::KeyVaultDatabase;
use crate::{
    access_logs::{AccessLog, AccessLogsFilter},
    secrets::KeyMaterial,
};
use futures::future::BoxFuture;
use uuid::Uuid;

/// Facade for the store that keeps per-secret key material apart from the ciphertext and collects
/// the access log.
pub trait KeyVault: Sync + Send + 'static {
    fn insert_key_material<'a>(
        &'a self,
        key_material: &'a KeyMaterial,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;
    fn get_key_material<'a>(
        &'a self,
        id: Uuid,
    ) -> BoxFuture<'a, anyhow::Result<Option<KeyMaterial>>>;
    /// Appends an entry to the access log.
    fn log_access<'a>(&'a self, access_log: &'a AccessLog) -> BoxFuture<'a, anyhow::Result<u64>>;
    /// Returns a page of the user's access log entries within the filter's time range, newest
    /// first.
    fn list_access_logs<'a>(
        &'a self,
        filter: &'a AccessLogsFilter,
    ) -> BoxFuture<'a, anyhow::Result<Vec<AccessLog>>>;
}

#[cfg(test)]
pub mod tests {
    use crate::{
        access_logs::{AccessLog, AccessLogsFilter},
        key_vault::KeyVault,
        secrets::KeyMaterial,
    };
    use anyhow::bail;
    use futures::future::BoxFuture;
    use std::{collections::HashMap, sync::Mutex};
    use uuid::Uuid;

    /// In-memory key vault.
    #[derive(Default)]
    pub struct MemoryKeyVault {
        key_materials: Mutex<HashMap<Uuid, KeyMaterial>>,
        access_logs: Mutex<Vec<AccessLog>>,
    }

    impl MemoryKeyVault {
        /// Copy of every logged entry in insertion order.
        pub fn access_logs(&self) -> Vec<AccessLog> {
            self.access_logs.lock().unwrap().clone()
        }
    }

    impl KeyVault for MemoryKeyVault {
        fn insert_key_material<'a>(
            &'a self,
            key_material: &'a KeyMaterial,
        ) -> BoxFuture<'a, anyhow::Result<u64>> {
            Box::pin(async move {
                let mut key_materials = self.key_materials.lock().unwrap();
                if key_materials.contains_key(&key_material.id) {
                    bail!("Key material `{}` already exists.", key_material.id);
                }
                key_materials.insert(key_material.id, key_material.clone());
                Ok(1)
            })
        }

        fn get_key_material<'a>(
            &'a self,
            id: Uuid,
        ) -> BoxFuture<'a, anyhow::Result<Option<KeyMaterial>>> {
            Box::pin(async move { Ok(self.key_materials.lock().unwrap().get(&id).cloned()) })
        }

        fn log_access<'a>(
            &'a self,
            access_log: &'a AccessLog,
        ) -> BoxFuture<'a, anyhow::Result<u64>> {
            Box::pin(async move {
                self.access_logs.lock().unwrap().push(access_log.clone());
                Ok(1)
            })
        }

        fn list_access_logs<'a>(
            &'a self,
            filter: &'a AccessLogsFilter,
        ) -> BoxFuture<'a, anyhow::Result<Vec<AccessLog>>> {
            Box::pin(async move {
                let mut access_logs = self
                    .access_logs
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|log| {
                        log.user_id == filter.user_id
                            && log.access_at >= filter.start_date
                            && log.access_at <= filter.end_date
                    })
                    .cloned()
                    .collect::<Vec<_>>();
                access_logs.sort_by(|a, b| b.access_at.cmp(&a.access_at));

                Ok(access_logs
                    .into_iter()
                    .skip(filter.pagination.offset as usize)
                    .take(filter.pagination.page_size as usize)
                    .collect())
            })
        }
    }
}
