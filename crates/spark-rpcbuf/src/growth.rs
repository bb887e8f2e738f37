//! 扩容管理：保证可写空间、按块取整、维护粘滞失败。
//!
//! # 设计背景（Why）
//! - 应答拼装以大量小而长度不可预测的写入为主，逐次精确扩容会导致频繁搬迁；
//!   按固定块取整可以摊薄成本，同时对大块载荷（图像、列表）把搬迁次数控制在可预期范围。
//! - 分配失败不能让进程中止：扩容走 `Vec::try_reserve_exact`，失败后只记录状态并返回错误。
//!
//! # 契约（What）
//! - 已失败的缓冲直接失败，不尝试分配；
//! - 剩余空间足够时不分配；
//! - 否则目标容量为 `round_up(length + needed, chunk_size)`，所有算术均检查溢出；
//! - 失败时置位 `failed`，若开启自动释放则立即归还存储。

use core::num::NonZeroUsize;

use tracing::{trace, warn};

use crate::{AllocationFailure, FailureCause, RpcBuf};

/// 默认扩容块大小（字节）。
pub const CHUNK_SIZE: usize = 4096;

pub(crate) const DEFAULT_CHUNK: NonZeroUsize = match NonZeroUsize::new(CHUNK_SIZE) {
    Some(chunk) => chunk,
    None => panic!("CHUNK_SIZE must be non-zero"),
};

/// 将 `value` 向上取整到 `chunk` 的整数倍；`chunk == 0` 或溢出时返回 `None`。
pub const fn round_up_to_chunk(value: usize, chunk: usize) -> Option<usize> {
    if chunk == 0 {
        return None;
    }
    match value.checked_add(chunk - 1) {
        Some(end) => Some(end / chunk * chunk),
        None => None,
    }
}

impl RpcBuf {
    /// 确保至少还能写入 `needed` 字节。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：所有写入与预留操作都经由此入口扩容，失败语义因此只在一处定义。
    /// - **执行 (How)**：
    ///   1. 已失败则返回 `Sticky`；
    ///   2. 剩余空间足够则直接返回；
    ///   3. 计算块对齐后的目标容量，检查溢出与容量上限；
    ///   4. 以 `try_reserve_exact` 扩容并用 0 填满新增部分，刷新容量与代数。
    /// - **契约 (What)**：成功后 `remaining() >= needed`；失败后 `is_failed()` 为真，
    ///   `len()`/`capacity()` 不变，除非开启了自动释放（此时两者归零）。
    pub fn ensure_capacity(&mut self, needed: usize) -> Result<(), AllocationFailure> {
        if self.failed {
            return Err(AllocationFailure::new(needed, FailureCause::Sticky));
        }
        if self.capacity - self.length >= needed {
            return Ok(());
        }

        let Some(target) = self
            .length
            .checked_add(needed)
            .and_then(|end| round_up_to_chunk(end, self.chunk_size.get()))
        else {
            return Err(self.fail(needed, FailureCause::Overflow));
        };
        if let Some(limit) = self.capacity_limit
            && target > limit
        {
            return Err(self.fail(needed, FailureCause::LimitExceeded { target, limit }));
        }
        if self
            .storage
            .try_reserve_exact(target - self.storage.len())
            .is_err()
        {
            return Err(self.fail(needed, FailureCause::OutOfMemory { target }));
        }

        let previous = self.capacity;
        self.storage.resize(target, 0);
        self.capacity = target;
        self.generation = self.generation.wrapping_add(1);
        trace!(
            target: "spark_rpcbuf::growth",
            previous,
            capacity = target,
            generation = self.generation,
            "rpc buffer grown"
        );
        Ok(())
    }

    /// 记录一次首发失败并返回对应错误。
    pub(crate) fn fail(&mut self, needed: usize, cause: FailureCause) -> AllocationFailure {
        self.mark_failed();
        warn!(
            target: "spark_rpcbuf::growth",
            needed,
            length = self.length,
            capacity = self.capacity,
            auto_release = self.auto_release_on_failure,
            %cause,
            "rpc buffer allocation failed"
        );
        AllocationFailure::new(needed, cause)
    }

    /// 置位失败标志；按策略释放存储。
    pub(crate) fn mark_failed(&mut self) {
        self.failed = true;
        if self.auto_release_on_failure {
            self.release_storage();
        }
    }
}
