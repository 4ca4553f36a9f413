//! 序號儲存

use chrono::Utc;
use serial_core::{
    Result, Serial, SerialConfig, SerialError, SerialId, SerialIdGenerator, SerialStatus,
};
use serial_hierarchy::HierarchyAdapter;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::linking::{self, SerialLookup};
use crate::mutation::{self, Mutation};
use crate::{AssignRequest, BulkCreate, CreateSerial, ImportBatch, Snapshot};

/// 序號儲存（單一寫入者、寫入時複製）
///
/// 每次變更都由目前快照與參數建立新的集合並整體替換；
/// 先前取得的 [`Snapshot`] 不會看到之後的變更。
#[derive(Debug)]
pub struct SerialStore {
    serials: Snapshot,

    /// ID → 集合位置（只追加、不刪除，位置永不改變）
    index: HashMap<SerialId, usize>,

    config: SerialConfig,

    id_generator: SerialIdGenerator,
}

impl Default for SerialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialStore {
    /// 以預設配置創建空儲存
    pub fn new() -> Self {
        Self {
            serials: Arc::new(Vec::new()),
            index: HashMap::new(),
            config: SerialConfig::default(),
            id_generator: SerialIdGenerator::new(),
        }
    }

    /// 以指定配置創建空儲存
    pub fn with_config(config: SerialConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// 以既有序號初始化（ID 必須唯一）
    pub fn from_serials(serials: Vec<Serial>, config: SerialConfig) -> Result<Self> {
        let mut store = Self::with_config(config)?;
        for (position, serial) in serials.iter().enumerate() {
            if store.index.insert(serial.id().clone(), position).is_some() {
                return Err(SerialError::InvalidRequest(format!(
                    "序號 ID 重複: {}",
                    serial.id()
                )));
            }
        }
        store.serials = Arc::new(serials);
        Ok(store)
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// 目前快照
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.serials)
    }

    pub fn len(&self) -> usize {
        self.serials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serials.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Serial> {
        self.serials.iter()
    }

    pub fn get(&self, id: &SerialId) -> Option<&Serial> {
        self.index.get(id).and_then(|&position| self.serials.get(position))
    }

    pub fn contains(&self, id: &SerialId) -> bool {
        self.index.contains_key(id)
    }

    /// 依序號編碼查找（編碼不保證唯一，回傳第一筆）
    pub fn find_by_serial_number(&self, serial_number: &str) -> Option<&Serial> {
        self.serials
            .iter()
            .find(|s| s.serial_number() == serial_number)
    }

    pub fn by_status(&self, status: SerialStatus) -> Vec<&Serial> {
        self.serials.iter().filter(|s| s.status() == status).collect()
    }

    pub fn by_buyer_part_number(&self, buyer_part_number: &str) -> Vec<&Serial> {
        self.serials
            .iter()
            .filter(|s| s.buyer_part_number() == buyer_part_number)
            .collect()
    }

    /// 子序號（依父序號子清單順序；不存在的 ID 略過）
    pub fn children_of(&self, id: &SerialId) -> Vec<&Serial> {
        self.get(id)
            .map(|parent| {
                parent
                    .child_serials()
                    .iter()
                    .filter_map(|child_id| self.get(child_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 祖先序號 ID（由近至遠）
    pub fn ancestors_of(&self, id: &SerialId) -> Vec<SerialId> {
        linking::ancestors(self, id)
    }

    /// 建立單筆序號
    pub fn create(&mut self, request: CreateSerial) -> Snapshot {
        let now = Utc::now();
        let id = self.id_generator.next_id(&self.config.id_prefix, now);
        tracing::debug!("建立序號 {} ({})", request.serial_number, id);

        let serial = Serial::new(
            id,
            request.serial_number,
            request.buyer_part_number,
            request.custom_attributes,
            now,
        );
        self.append(vec![serial])
    }

    /// 批量建立流水號序號
    pub fn bulk_create(&mut self, request: BulkCreate) -> Snapshot {
        tracing::info!(
            "開始批量建立序號：前綴 {}，起始 {}，數量 {}",
            request.prefix,
            request.start_number,
            request.count
        );

        let now = Utc::now();
        let new_serials: Vec<Serial> = request
            .numbers()
            .map(|number| {
                Serial::new(
                    self.id_generator.next_id(&self.config.id_prefix, now),
                    self.config.format_bulk_number(&request.prefix, number),
                    request.buyer_part_number.clone(),
                    Default::default(),
                    now,
                )
            })
            .collect();

        tracing::info!("批量建立完成，新增 {} 筆", new_serials.len());
        self.append(new_serials)
    }

    /// 從外部批次匯入（保留輸入順序）
    pub fn import_from_batch(&mut self, batch: ImportBatch) -> Snapshot {
        tracing::info!(
            "開始匯入序號批次：{} 筆，料號 {}",
            batch.entries.len(),
            batch.buyer_part_number
        );

        let now = Utc::now();
        let buyer_part_number = batch.buyer_part_number;
        let new_serials: Vec<Serial> = batch
            .entries
            .into_iter()
            .map(|entry| {
                Serial::new(
                    self.id_generator.next_id(&self.config.import_id_prefix, now),
                    entry.serial_number,
                    buyer_part_number.clone(),
                    entry.custom_attributes,
                    now,
                )
            })
            .collect();

        tracing::info!("匯入完成，新增 {} 筆", new_serials.len());
        self.append(new_serials)
    }

    /// 指派或取消指派（未知 ID 略過）
    pub fn assign(&mut self, request: &AssignRequest) -> Snapshot {
        let Mutation { serials, touched } =
            mutation::apply_assign(&self.serials, request, Utc::now());

        if request.is_unassign() {
            tracing::debug!(
                "取消指派：請求 {} 筆，命中 {} 筆",
                request.serial_ids.len(),
                touched
            );
        } else {
            tracing::debug!(
                "指派至 {} ({})：請求 {} 筆，命中 {} 筆，暫時={}",
                request.target_id,
                request.target_type,
                request.serial_ids.len(),
                touched,
                request.temporary
            );
        }

        self.replace(serials)
    }

    /// 連結子序號（寬鬆模式：不檢查結構，未知 ID 略過）
    pub fn link_children(&mut self, parent_id: &SerialId, child_ids: &[SerialId]) -> Snapshot {
        let Mutation { serials, touched } =
            mutation::apply_link(&self.serials, parent_id, child_ids, Utc::now());

        tracing::debug!(
            "連結子序號至 {}：請求 {} 筆，更新 {} 筆",
            parent_id,
            child_ids.len(),
            touched
        );

        self.replace(serials)
    }

    /// 連結子序號（檢查模式：拒絕循環、重複與已連結的子序號）
    pub fn try_link_children(
        &mut self,
        parent_id: &SerialId,
        child_ids: &[SerialId],
    ) -> Result<Snapshot> {
        if let Err(err) = linking::validate_link(&*self, parent_id, child_ids) {
            tracing::warn!("拒絕連結子序號至 {}: {}", parent_id, err);
            return Err(err);
        }
        Ok(self.link_children(parent_id, child_ids))
    }

    /// 指派（檢查模式：目標必須存在於階層且類型相符）
    pub fn try_assign(
        &mut self,
        request: &AssignRequest,
        hierarchy: &HierarchyAdapter<'_>,
    ) -> Result<Snapshot> {
        if !request.is_unassign()
            && !hierarchy.has_target(&request.target_id, request.target_type)
        {
            tracing::warn!(
                "拒絕指派：目標 {} ({}) 不存在",
                request.target_id,
                request.target_type
            );
            return Err(SerialError::UnknownTarget {
                target_id: request.target_id.clone(),
                target_type: request.target_type,
            });
        }
        Ok(self.assign(request))
    }

    /// 建立單筆序號（依唯一性政策檢查）
    pub fn try_create(&mut self, request: CreateSerial) -> Result<Snapshot> {
        self.check_serial_numbers(std::iter::once(request.serial_number.as_str()))?;
        Ok(self.create(request))
    }

    /// 批量建立（依唯一性政策與數量上限檢查）
    pub fn try_bulk_create(&mut self, request: BulkCreate) -> Result<Snapshot> {
        if request.count > self.config.max_bulk_count {
            return Err(SerialError::InvalidRequest(format!(
                "批量數量 {} 超過上限 {}",
                request.count, self.config.max_bulk_count
            )));
        }
        // 最後一個流水號為 start_number + count - 1
        if request.count > 0
            && request
                .start_number
                .checked_add(u64::from(request.count) - 1)
                .is_none()
        {
            return Err(SerialError::InvalidRequest(format!(
                "流水號超出範圍：起始 {}，數量 {}",
                request.start_number, request.count
            )));
        }

        if self.config.requires_unique_serial_numbers() {
            let numbers: Vec<String> = request
                .numbers()
                .map(|n| self.config.format_bulk_number(&request.prefix, n))
                .collect();
            self.check_serial_numbers(numbers.iter().map(String::as_str))?;
        }
        Ok(self.bulk_create(request))
    }

    /// 批次匯入（依唯一性政策檢查）
    pub fn try_import_from_batch(&mut self, batch: ImportBatch) -> Result<Snapshot> {
        self.check_serial_numbers(batch.entries.iter().map(|e| e.serial_number.as_str()))?;
        Ok(self.import_from_batch(batch))
    }

    /// 唯一性政策為 Unique 時，檢查新編碼與既有及請求內部皆不重複
    fn check_serial_numbers<'a>(&self, numbers: impl IntoIterator<Item = &'a str>) -> Result<()> {
        if !self.config.requires_unique_serial_numbers() {
            return Ok(());
        }

        let existing: HashSet<&str> = self.serials.iter().map(Serial::serial_number).collect();
        let mut requested: HashSet<&str> = HashSet::new();

        for number in numbers {
            if existing.contains(number) || !requested.insert(number) {
                tracing::warn!("序號編碼重複: {}", number);
                return Err(SerialError::DuplicateSerialNumber(number.to_string()));
            }
        }
        Ok(())
    }

    /// 追加新序號並替換快照
    fn append(&mut self, new_serials: Vec<Serial>) -> Snapshot {
        let mut serials = Vec::with_capacity(self.serials.len() + new_serials.len());
        serials.extend(self.serials.iter().cloned());

        for serial in new_serials {
            self.index.insert(serial.id().clone(), serials.len());
            serials.push(serial);
        }

        self.replace(serials)
    }

    fn replace(&mut self, serials: Vec<Serial>) -> Snapshot {
        self.serials = Arc::new(serials);
        self.snapshot()
    }
}

impl SerialLookup for SerialStore {
    fn lookup(&self, id: &SerialId) -> Option<&Serial> {
        self.get(id)
    }
}
