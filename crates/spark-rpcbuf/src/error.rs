//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 组装缓冲只有一种运行期错误：扩容无法满足（内存耗尽、尺寸溢出、超出上限）。
//!   这里把它建模为单一的 [`AllocationFailure`]，并用 [`FailureCause`] 保留排障细节；
//! - 配置装载另有 [`ConfigError`]，只在构造阶段出现，不会污染写入路径。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，可直接交给上层的 `?` 传播；
//! - `AllocationFailure` 为 `Copy`，粘滞失败路径上反复返回它不产生分配。

use core::fmt;

use thiserror::Error;

/// 分配失败的具体成因。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureCause {
    /// 缓冲此前已经失败，本次调用未尝试分配。
    Sticky,
    /// `length + needed` 或块对齐后的目标容量溢出 `usize`。
    Overflow,
    /// 块对齐后的目标容量超过实例配置的上限。
    LimitExceeded { target: usize, limit: usize },
    /// 分配器拒绝了扩容请求。
    OutOfMemory { target: usize },
    /// 合并时来源缓冲已处于失败态，失败被传递到目标缓冲。
    Source,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Sticky => f.write_str("buffer already failed"),
            FailureCause::Overflow => f.write_str("capacity arithmetic overflow"),
            FailureCause::LimitExceeded { target, limit } => {
                write!(f, "target capacity {target} exceeds limit {limit}")
            }
            FailureCause::OutOfMemory { target } => {
                write!(f, "allocator refused to grow storage to {target} bytes")
            }
            FailureCause::Source => f.write_str("merged source buffer had failed"),
        }
    }
}

/// 组装缓冲唯一的运行期错误。
///
/// # 教案式说明
/// - **意图 (Why)**：长链条写入只需在末尾检查一次；任何一步失败后，缓冲进入粘滞失败态，
///   之后每次调用都会返回 `cause == Sticky` 的同类错误。
/// - **契约 (What)**：`needed` 为触发失败的那次请求的字节数；`cause` 区分首次失败的根因与粘滞重放。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("rpc buffer allocation failure while requesting {needed} bytes: {cause}")]
pub struct AllocationFailure {
    needed: usize,
    cause: FailureCause,
}

impl AllocationFailure {
    pub(crate) const fn new(needed: usize, cause: FailureCause) -> Self {
        Self { needed, cause }
    }

    /// 触发失败的请求字节数。
    pub const fn needed(&self) -> usize {
        self.needed
    }

    /// 失败成因。
    pub const fn cause(&self) -> FailureCause {
        self.cause
    }

    /// 是否只是对既有失败的重放。
    pub const fn is_sticky(&self) -> bool {
        matches!(self.cause, FailureCause::Sticky)
    }
}

/// 缓冲配置校验或解析失败。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 扩容块大小不能为 0。
    #[error("rpc buffer chunk_size must be non-zero")]
    ZeroChunkSize,

    /// 容量上限小于一个扩容块，任何扩容都注定失败。
    #[error("rpc buffer capacity_limit {limit} is smaller than chunk_size {chunk_size}")]
    LimitBelowChunk { limit: usize, chunk_size: usize },

    /// TOML 片段无法反序列化。
    #[cfg(feature = "toml-config")]
    #[error("failed to parse rpc buffer configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
