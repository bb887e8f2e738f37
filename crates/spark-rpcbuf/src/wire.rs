//! # 结构化记录写入
//!
//! ## 设计意图（Why）
//! - 服务端的每一种线上结构（矩形、点、线段……）都按固定字段顺序组合标量写入，且自身不做填充；
//!   [`WireEncode`] 把这一模式固定为 trait，使列表类应答可以统一预留、统一写出。
//! - [`Rectangle`] 是该模式的样板实现，[`Point`] 是同一形态的最小例子。
//!
//! ## 契约（What）
//! - `encoded_len` 必须等于 `encode` 实际写入的字节数；
//! - `encode` 只调用 [`RpcBuf`] 的标量写入，失败原样传播。

use crate::{AllocationFailure, FailureCause, RpcBuf};

/// 可写入组装缓冲的定长线上结构。
pub trait WireEncode {
    /// 编码后的字节数。
    fn encoded_len(&self) -> usize;

    /// 按字段顺序写入，不追加填充。
    fn encode(&self, buf: &mut RpcBuf) -> Result<(), AllocationFailure>;
}

/// 线上 RECTANGLE：有符号 `x`/`y`，无符号 `width`/`height`，共 8 字节。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Rectangle {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rectangle {
    pub const WIRE_LEN: usize = 8;

    #[must_use]
    pub const fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl WireEncode for Rectangle {
    fn encoded_len(&self) -> usize {
        Self::WIRE_LEN
    }

    fn encode(&self, buf: &mut RpcBuf) -> Result<(), AllocationFailure> {
        buf.write_i16(self.x)?;
        buf.write_i16(self.y)?;
        buf.write_u16(self.width)?;
        buf.write_u16(self.height)
    }
}

/// 线上 POINT：有符号 `x`/`y`，共 4 字节。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const WIRE_LEN: usize = 4;

    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

impl WireEncode for Point {
    fn encoded_len(&self) -> usize {
        Self::WIRE_LEN
    }

    fn encode(&self, buf: &mut RpcBuf) -> Result<(), AllocationFailure> {
        buf.write_i16(self.x)?;
        buf.write_i16(self.y)
    }
}

impl RpcBuf {
    /// 写入一个 RECTANGLE，不填充。
    pub fn write_rect(
        &mut self,
        x: i16,
        y: i16,
        width: u16,
        height: u16,
    ) -> Result<(), AllocationFailure> {
        Rectangle::new(x, y, width, height).encode(self)
    }

    /// 预留记录所需空间后写入单条记录。
    pub fn write_encoded<T: WireEncode + ?Sized>(
        &mut self,
        record: &T,
    ) -> Result<(), AllocationFailure> {
        self.ensure_capacity(record.encoded_len())?;
        record.encode(self)
    }

    /// 一次性预留整组记录的空间，再依次写入；列表中途不会触发多次扩容。
    ///
    /// 空列表直接成功，与数组写入的约定一致。
    pub fn write_all_encoded<T: WireEncode>(
        &mut self,
        records: &[T],
    ) -> Result<(), AllocationFailure> {
        if records.is_empty() {
            return Ok(());
        }
        let Some(total) = records
            .iter()
            .try_fold(0usize, |acc, record| acc.checked_add(record.encoded_len()))
        else {
            if self.failed {
                return Err(AllocationFailure::new(usize::MAX, FailureCause::Sticky));
            }
            return Err(self.fail(usize::MAX, FailureCause::Overflow));
        };
        self.ensure_capacity(total)?;
        for record in records {
            record.encode(self)?;
        }
        Ok(())
    }
}
