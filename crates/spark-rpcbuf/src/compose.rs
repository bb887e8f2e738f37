//! # 组合与便捷写入
//!
//! ## 模块定位（Why）
//! - 协议要求结构化载荷以 4 字节单元收尾，应答头里的长度字段也以该单元计数；
//!   本模块提供对齐填充、单元计数以及在写入后自动填充的字符串/二进制写入；
//! - 嵌套的变长子结构往往先在临时缓冲中拼好，再整体拼接进外层应答，
//!   [`RpcBuf::merge_padded`] 把"拼接 + 失败传递 + 清理来源"收敛为一次调用。
//!
//! ## 空输入约定（What）
//! C 风格接口里"指针为空"与"长度为 0"在 Rust 中统一表现为空切片/空字符串，两者文档行为一致；
//! 唯一需要区分二者的计数字符串以 `Option<&str>` 表达。
//! - [`write_string_padded`](RpcBuf::write_string_padded)：空串严格无操作；
//! - [`write_string_padded_with_terminator`](RpcBuf::write_string_padded_with_terminator)：
//!   空串写入一个 4 字节的 0 占位，**与上者不对称**，两种行为都须保留；
//! - [`write_counted_string_padded`](RpcBuf::write_counted_string_padded)：`None` 无操作，
//!   `Some("")` 写出长度 0 与填充。

use tracing::{debug, warn};

use crate::{AllocationFailure, FailureCause, RpcBuf};

/// 协议的对齐单元（字节）。
pub const UNIT: usize = 4;

/// 把 `len` 补齐到 [`UNIT`] 所需的填充字节数。
pub const fn pad_len(len: usize) -> usize {
    (UNIT - len % UNIT) % UNIT
}

/// `len` 补齐到 [`UNIT`] 后的长度；溢出时返回 `None`。
pub const fn padded_len(len: usize) -> Option<usize> {
    len.checked_add(pad_len(len))
}

impl RpcBuf {
    /// 写入 0 字节直到写位置落在 4 字节边界；已对齐时不写入任何内容，连续调用幂等。
    pub fn pad(&mut self) -> Result<(), AllocationFailure> {
        let padding = pad_len(self.length);
        self.reserve_zeroed(padding).map(|_| ())
    }

    /// 以 4 字节单元计的已写长度（向上取整），即应答头 `length` 字段的取值。
    ///
    /// 超出 `u32` 表示范围时饱和为 `u32::MAX`。
    pub fn unit_count(&self) -> u32 {
        u32::try_from(self.length.div_ceil(UNIT)).unwrap_or(u32::MAX)
    }

    /// 写入二进制数据并填充到 4 字节边界；空数据为严格无操作（也不填充）。
    pub fn write_binary_padded(&mut self, data: &[u8]) -> Result<(), AllocationFailure> {
        if data.is_empty() {
            return Ok(());
        }
        self.write_u8s(data)?;
        self.pad()
    }

    /// 写入字符串字节并填充；空串为严格无操作。
    pub fn write_string_padded(&mut self, text: &str) -> Result<(), AllocationFailure> {
        self.write_binary_padded(text.as_bytes())
    }

    /// 写入字符串字节、一个 0 结束符，再填充。
    ///
    /// 空串不是无操作：写入单个 4 字节 0 值，充当长度占位。
    pub fn write_string_padded_with_terminator(
        &mut self,
        text: &str,
    ) -> Result<(), AllocationFailure> {
        if text.is_empty() {
            return self.write_u32(0);
        }
        self.write_u8s(text.as_bytes())?;
        self.write_u8(0)?;
        self.pad()
    }

    /// 写入 Pascal 风格的计数字符串：16 位长度（受字节序影响）、原始字节、填充。
    ///
    /// # 教案式说明
    /// - **契约 (What)**：
    ///   - `None` 无操作；`Some("")` 写出长度 0 与两字节填充，共 4 字节；
    ///   - 长度字段只有 16 位，超长文本截断为前 `u16::MAX` 字节，保证长度前缀与载荷一致。
    /// - **风险 (Trade-offs)**：截断按字节进行，可能切开多字节字符；线上格式只认字节，
    ///   截断事件以 `warn` 记录，便于定位上游越界的调用方。
    pub fn write_counted_string_padded(
        &mut self,
        text: Option<&str>,
    ) -> Result<(), AllocationFailure> {
        let Some(text) = text else {
            return Ok(());
        };
        let bytes = text.as_bytes();
        let count = match u16::try_from(bytes.len()) {
            Ok(count) => count,
            Err(_) => {
                warn!(
                    target: "spark_rpcbuf::compose",
                    original = bytes.len(),
                    written = u16::MAX,
                    "counted string truncated to 16-bit length"
                );
                u16::MAX
            }
        };
        self.write_u16(count)?;
        self.write_u8s(&bytes[..usize::from(count)])?;
        self.pad()
    }

    /// 把 `source` 的全部已写内容追加到本缓冲并填充，然后清空 `source`。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：子结构在临时缓冲里拼好后一键拼接，调用方无需分别处理两份失败与清理路径。
    /// - **执行 (How)**：
    ///   1. `source` 已失败：本缓冲置为失败（按策略自动释放），返回 `FailureCause::Source`；
    ///   2. 否则以 [`write_binary_padded`](Self::write_binary_padded) 追加；
    ///   3. 无论结果如何，`source` 都会被 [`clear`](Self::clear)。
    /// - **契约 (What)**：`&mut` 借用保证来源与目标不是同一实例；来源缺省的情形在类型上不可表达。
    pub fn merge_padded(&mut self, source: &mut RpcBuf) -> Result<(), AllocationFailure> {
        let outcome = if source.failed {
            let needed = source.length;
            self.mark_failed();
            debug!(
                target: "spark_rpcbuf::compose",
                needed,
                auto_release = self.auto_release_on_failure,
                "failed source buffer poisoned merge target"
            );
            Err(AllocationFailure::new(needed, FailureCause::Source))
        } else {
            self.write_binary_padded(source.as_bytes())
        };
        source.clear();
        outcome
    }
}
