//! 定宽标量与数组写入。
//!
//! 所有写入都恰好占用 `size_of` 个字节，不做隐式填充；16/32 位值按实例的
//! [`ByteOrder`](crate::ByteOrder) 决定是否翻转。有符号写入经无符号路径完成。

use crate::{AllocationFailure, RpcBuf};

impl RpcBuf {
    pub fn write_u8(&mut self, value: u8) -> Result<(), AllocationFailure> {
        self.reserve(1)?[0] = value;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), AllocationFailure> {
        let bytes = self.byte_order.u16_bytes(value);
        self.reserve(bytes.len())?.copy_from_slice(&bytes);
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), AllocationFailure> {
        let bytes = self.byte_order.u32_bytes(value);
        self.reserve(bytes.len())?.copy_from_slice(&bytes);
        Ok(())
    }

    pub fn write_i8(&mut self, value: i8) -> Result<(), AllocationFailure> {
        self.write_u8(value.cast_unsigned())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), AllocationFailure> {
        self.write_u16(value.cast_unsigned())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), AllocationFailure> {
        self.write_u32(value.cast_unsigned())
    }

    /// 写入字节数组，不填充。
    ///
    /// 空切片直接成功：不分配、不改动任何状态，失败态缓冲亦然。
    pub fn write_u8s(&mut self, values: &[u8]) -> Result<(), AllocationFailure> {
        if values.is_empty() {
            return Ok(());
        }
        self.reserve(values.len())?.copy_from_slice(values);
        Ok(())
    }

    /// 写入 16 位数组，逐元素应用字节序；空切片规则同 [`write_u8s`](Self::write_u8s)。
    pub fn write_u16s(&mut self, values: &[u16]) -> Result<(), AllocationFailure> {
        if values.is_empty() {
            return Ok(());
        }
        let order = self.byte_order;
        let view = self.reserve(size_of_val(values))?;
        for (slot, value) in view.chunks_exact_mut(2).zip(values) {
            slot.copy_from_slice(&order.u16_bytes(*value));
        }
        Ok(())
    }

    /// 写入 32 位数组，逐元素应用字节序；空切片规则同 [`write_u8s`](Self::write_u8s)。
    pub fn write_u32s(&mut self, values: &[u32]) -> Result<(), AllocationFailure> {
        if values.is_empty() {
            return Ok(());
        }
        let order = self.byte_order;
        let view = self.reserve(size_of_val(values))?;
        for (slot, value) in view.chunks_exact_mut(4).zip(values) {
            slot.copy_from_slice(&order.u32_bytes(*value));
        }
        Ok(())
    }
}
