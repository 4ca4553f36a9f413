//! 共享儲存把手與工作階段
//!
//! [`StoreHandle`] 以讀寫鎖包裝 [`SerialStore`]：所有變更取得寫鎖依序執行，
//! 讀取只取得目前快照。[`SerialSession`] 管理儲存的生命週期，
//! 在工作階段之外取用儲存會得到 `MissingContext`。

use serial_core::{Result, SerialConfig, SerialError, SerialId};
use serial_hierarchy::HierarchyAdapter;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{AssignRequest, BulkCreate, CreateSerial, ImportBatch, SerialStore, Snapshot};

/// 序號儲存把手（可複製、可跨執行緒共享）
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<RwLock<SerialStore>>,
}

impl StoreHandle {
    pub fn new(store: SerialStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    // 變更總是以完整建好的快照替換，鎖中毒時沿用內部狀態即可
    fn read_guard(&self) -> RwLockReadGuard<'_, SerialStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, SerialStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// 以讀鎖存取儲存
    pub fn read<T>(&self, f: impl FnOnce(&SerialStore) -> T) -> T {
        f(&*self.read_guard())
    }

    /// 以寫鎖存取儲存
    pub fn write<T>(&self, f: impl FnOnce(&mut SerialStore) -> T) -> T {
        f(&mut *self.write_guard())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read_guard().snapshot()
    }

    pub fn create(&self, request: CreateSerial) -> Snapshot {
        self.write_guard().create(request)
    }

    pub fn bulk_create(&self, request: BulkCreate) -> Snapshot {
        self.write_guard().bulk_create(request)
    }

    pub fn import_from_batch(&self, batch: ImportBatch) -> Snapshot {
        self.write_guard().import_from_batch(batch)
    }

    pub fn assign(&self, request: &AssignRequest) -> Snapshot {
        self.write_guard().assign(request)
    }

    pub fn link_children(&self, parent_id: &SerialId, child_ids: &[SerialId]) -> Snapshot {
        self.write_guard().link_children(parent_id, child_ids)
    }

    pub fn try_link_children(
        &self,
        parent_id: &SerialId,
        child_ids: &[SerialId],
    ) -> Result<Snapshot> {
        self.write_guard().try_link_children(parent_id, child_ids)
    }

    pub fn try_assign(
        &self,
        request: &AssignRequest,
        hierarchy: &HierarchyAdapter<'_>,
    ) -> Result<Snapshot> {
        self.write_guard().try_assign(request, hierarchy)
    }

    pub fn try_create(&self, request: CreateSerial) -> Result<Snapshot> {
        self.write_guard().try_create(request)
    }

    pub fn try_bulk_create(&self, request: BulkCreate) -> Result<Snapshot> {
        self.write_guard().try_bulk_create(request)
    }

    pub fn try_import_from_batch(&self, batch: ImportBatch) -> Result<Snapshot> {
        self.write_guard().try_import_from_batch(batch)
    }
}

/// 序號儲存工作階段
#[derive(Debug, Default)]
pub struct SerialSession {
    config: SerialConfig,
    store: Option<StoreHandle>,
}

impl SerialSession {
    /// 創建尚未啟動的工作階段
    pub fn new(config: SerialConfig) -> Self {
        Self {
            config,
            store: None,
        }
    }

    /// 啟動工作階段；已啟動時回傳既有把手
    pub fn begin(&mut self) -> Result<StoreHandle> {
        if let Some(handle) = &self.store {
            return Ok(handle.clone());
        }

        let handle = StoreHandle::new(SerialStore::with_config(self.config.clone())?);
        tracing::info!("序號儲存工作階段已啟動");
        self.store = Some(handle.clone());
        Ok(handle)
    }

    /// 取得目前儲存把手
    pub fn store(&self) -> Result<StoreHandle> {
        self.store.clone().ok_or_else(|| {
            SerialError::MissingContext("序號儲存只能在工作階段內存取".to_string())
        })
    }

    pub fn is_active(&self) -> bool {
        self.store.is_some()
    }

    /// 結束工作階段，回傳原把手（已取得的把手仍可繼續使用）
    pub fn end(&mut self) -> Option<StoreHandle> {
        let handle = self.store.take();
        if handle.is_some() {
            tracing::info!("序號儲存工作階段已結束");
        }
        handle
    }
}
