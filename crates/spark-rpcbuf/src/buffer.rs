use core::{fmt, mem::take, num::NonZeroUsize};

use bytes::Bytes;

use crate::{
    AllocationFailure, ByteOrder, ConfigError, FailureCause, RpcBufConfig, growth::DEFAULT_CHUNK,
};

/// 缓冲的生命周期状态，由字段推导而来，不单独存储。
///
/// - `Empty`：未持有存储（初始态、`clear` 之后、或失败时已自动释放且随后被 `reset`）；
/// - `Active`：持有存储且未失败；
/// - `Failed`：粘滞失败，直到 `clear`/`reset`。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BufferState {
    Empty,
    Active,
    Failed,
}

/// `RpcBuf` 是协议应答/事件载荷的组装缓冲。
///
/// # 设计动机（Why）
/// - 应答编码器逐字段写入，事先无法得知最终长度；缓冲需要自动增长，
///   同时以 4 字节为单位对齐，并按连接字节序写出多字节标量。
/// - 失败需要"粘滞"：一长串写入可以不逐个检查，只在拼装完成后检查一次。
///
/// # 结构说明（How）
/// - `storage` 的长度恒等于 `capacity`，`length` 之后的字节恒为 0；
///   扩容使用可失败的 `try_reserve_exact`，内存不足时不会中止进程；
/// - `generation` 在每次（重新）分配或释放存储时递增，用于观测旧视图是否已失效；
/// - 字节序、失败时自动释放、扩容块大小、容量上限属于策略字段，`clear`/`reset` 不会改动它们。
///
/// # 契约说明（What）
/// - `len() <= capacity()` 恒成立；`capacity() == 0` 当且仅当未持有存储；
/// - 失败后 `len()`/`capacity()` 不再变化（失败瞬间的自动释放除外）；
/// - 交付给连接层后不会自动释放，调用方需显式 [`clear`](Self::clear)，
///   或改用 [`take_bytes`](Self::take_bytes) 一次性移交所有权。
pub struct RpcBuf {
    pub(crate) storage: Vec<u8>,
    pub(crate) capacity: usize,
    pub(crate) length: usize,
    pub(crate) byte_order: ByteOrder,
    pub(crate) failed: bool,
    pub(crate) auto_release_on_failure: bool,
    pub(crate) chunk_size: NonZeroUsize,
    pub(crate) capacity_limit: Option<usize>,
    pub(crate) generation: u64,
}

impl RpcBuf {
    /// 创建空缓冲，不分配任何内存。
    pub const fn new() -> Self {
        Self {
            storage: Vec::new(),
            capacity: 0,
            length: 0,
            byte_order: ByteOrder::Native,
            failed: false,
            auto_release_on_failure: false,
            chunk_size: DEFAULT_CHUNK,
            capacity_limit: None,
            generation: 0,
        }
    }

    /// 创建使用指定字节序的空缓冲。
    pub const fn with_byte_order(byte_order: ByteOrder) -> Self {
        let mut buf = Self::new();
        buf.byte_order = byte_order;
        buf
    }

    /// 按配置创建空缓冲。
    ///
    /// # 契约说明（What）
    /// - 先执行 [`RpcBufConfig::validate`]，非法配置返回 [`ConfigError`]；
    /// - 返回的缓冲尚未分配存储，策略字段全部取自配置。
    pub fn from_config(config: &RpcBufConfig) -> Result<Self, ConfigError> {
        let chunk_size = config.validate()?;
        let mut buf = Self::with_byte_order(config.byte_order);
        buf.chunk_size = chunk_size;
        buf.capacity_limit = config.capacity_limit;
        buf.auto_release_on_failure = config.auto_release_on_failure;
        Ok(buf)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn is_swapped(&self) -> bool {
        self.byte_order.is_swapped()
    }

    /// 切换字节序；只影响之后的写入。
    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    pub fn auto_release_on_failure(&self) -> bool {
        self.auto_release_on_failure
    }

    /// 开启后，失败会立即释放存储，避免残缺应答被误发。
    pub fn set_auto_release_on_failure(&mut self, enabled: bool) {
        self.auto_release_on_failure = enabled;
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity_limit
    }

    /// 设置容量上限；对已分配的存储不做回收。
    pub fn set_capacity_limit(&mut self, limit: Option<usize>) {
        self.capacity_limit = limit;
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    /// 已写入的字节数，亦即下一次写入的偏移。
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 已分配的存储总量。
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 无需扩容即可写入的字节数。
    pub fn remaining(&self) -> usize {
        self.capacity - self.length
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// 存储代数：每次分配、重新分配或释放存储时递增。
    ///
    /// 两次观测之间代数变化，意味着此前取得的视图所指向的内存可能已经搬迁。
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> BufferState {
        if self.failed {
            BufferState::Failed
        } else if self.capacity == 0 {
            BufferState::Empty
        } else {
            BufferState::Active
        }
    }

    /// 拼装完成后的一次性检查。
    pub fn check(&self) -> Result<(), AllocationFailure> {
        if self.failed {
            Err(AllocationFailure::new(0, FailureCause::Sticky))
        } else {
            Ok(())
        }
    }

    /// 已写入的字节区间，供连接层发送。
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.length]
    }

    /// 复制已写入的内容；缓冲本身保持不变。
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }

    /// 移交已写入内容的所有权，缓冲回到空态。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：连接层以 `Bytes` 排队发送时，可直接接管底层 `Vec`，省去一次复制。
    /// - **契约 (What)**：失败态缓冲返回错误且保持原状，残缺应答永远不会被交出；
    ///   成功时等价于"读取字节区间 + `clear`"，策略字段保留。
    pub fn take_bytes(&mut self) -> Result<Bytes, AllocationFailure> {
        self.check()?;
        let mut storage = take(&mut self.storage);
        storage.truncate(self.length);
        self.clear();
        Ok(Bytes::from(storage))
    }

    /// 释放存储并回到空态，同时清除失败标志。
    pub fn clear(&mut self) {
        self.release_storage();
        self.failed = false;
    }

    /// 清零已写内容并把写位置归零，保留存储以便复用，同时清除失败标志。
    pub fn reset(&mut self) {
        self.storage[..self.length].fill(0);
        self.length = 0;
        self.failed = false;
    }

    pub(crate) fn release_storage(&mut self) {
        self.storage = Vec::new();
        self.capacity = 0;
        self.length = 0;
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Default for RpcBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for RpcBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for RpcBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcBuf")
            .field("length", &self.length)
            .field("capacity", &self.capacity)
            .field("byte_order", &self.byte_order)
            .field("failed", &self.failed)
            .field("auto_release_on_failure", &self.auto_release_on_failure)
            .field("chunk_size", &self.chunk_size)
            .field("capacity_limit", &self.capacity_limit)
            .field("generation", &self.generation)
            .finish()
    }
}
