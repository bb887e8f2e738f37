//! 缓冲策略配置。
//!
//! # 设计背景（Why）
//! - 同一服务端里不同连接的缓冲策略不尽相同：字节序随客户端协商而定，
//!   容量上限通常与协议允许的最大应答长度挂钩，调试环境则可能关闭自动释放以便检查残缺应答；
//! - 把这些策略收敛为可序列化的 [`RpcBufConfig`]，宿主可以从自身配置文件中装载，
//!   再通过 [`RpcBuf::from_config`](crate::RpcBuf::from_config) 批量创建缓冲。
//!
//! # 契约（What）
//! - 所有字段带默认值（`#[serde(default)]`），未知字段拒绝；
//! - [`RpcBufConfig::validate`] 在构造缓冲前执行，返回经校验的块大小。

use core::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{ByteOrder, CHUNK_SIZE, ConfigError};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RpcBufConfig {
    /// 扩容取整单位（字节）。
    pub chunk_size: usize,
    /// 容量上限；`None` 表示只受分配器约束。
    pub capacity_limit: Option<usize>,
    /// 失败时是否立即释放存储。
    pub auto_release_on_failure: bool,
    /// 多字节标量的写出字节序。
    pub byte_order: ByteOrder,
}

impl Default for RpcBufConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            capacity_limit: None,
            auto_release_on_failure: false,
            byte_order: ByteOrder::Native,
        }
    }
}

impl RpcBufConfig {
    /// 校验配置并返回非零块大小。
    ///
    /// - `chunk_size == 0` → [`ConfigError::ZeroChunkSize`]；
    /// - `capacity_limit < chunk_size` → [`ConfigError::LimitBelowChunk`]，此时任何扩容都会失败。
    pub fn validate(&self) -> Result<NonZeroUsize, ConfigError> {
        let chunk_size = NonZeroUsize::new(self.chunk_size).ok_or(ConfigError::ZeroChunkSize)?;
        if let Some(limit) = self.capacity_limit
            && limit < chunk_size.get()
        {
            return Err(ConfigError::LimitBelowChunk {
                limit,
                chunk_size: chunk_size.get(),
            });
        }
        Ok(chunk_size)
    }

    /// 从 TOML 片段解析并校验配置。
    ///
    /// ```
    /// use spark_rpcbuf::{ByteOrder, RpcBufConfig};
    ///
    /// let config = RpcBufConfig::from_toml_str(
    ///     "byte_order = \"swapped\"\ncapacity_limit = 262144\n",
    /// )
    /// .expect("valid config");
    /// assert_eq!(config.byte_order, ByteOrder::Swapped);
    /// ```
    #[cfg(feature = "toml-config")]
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }
}
