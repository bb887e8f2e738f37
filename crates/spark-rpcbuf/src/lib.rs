#![deny(unsafe_code)]

//! `spark-rpcbuf` 提供协议服务端组装应答/事件载荷所用的可增长字节缓冲。
//!
//! # 模块定位（Why）
//! - 窗口系统协议的每一个应答、事件都需要按照严格的二进制布局写出：定宽标量、4 字节对齐、
//!   按连接协商的字节序。编码器在动笔之前往往不知道最终长度，若每个编码器各自管理内存，
//!   对齐、字节序与分配失败处理将被重复实现并逐渐分叉。
//! - [`RpcBuf`] 把这些约束集中到一个叶子组件：调用方只管顺序写入，
//!   最后一次性检查是否失败，再把字节区间交给连接层发送。
//!
//! # 设计概要（How）
//! - `growth`：按固定块（默认 4096 字节）扩容，维护粘滞失败（sticky failure）状态；
//! - `reserve`：返回借用内部存储的可写视图，视图有效期由借用检查器约束；
//! - `write`：8/16/32 位有符号、无符号标量及数组写入，按 [`ByteOrder`] 决定是否字节翻转；
//! - `compose`：对齐填充、带填充的字符串/二进制写入、计数字符串、跨缓冲合并；
//! - `wire`：结构化记录写入的模板（[`WireEncode`]、[`Rectangle`]）。
//!
//! # 契约（What）
//! - 空实例即有效缓冲，无需初始化步骤；
//! - 一旦分配失败，后续所有写入均为无副作用的失败，直到显式 [`RpcBuf::clear`] 或 [`RpcBuf::reset`]；
//! - 本 crate 不做网络 I/O，也不解析入站数据。
//!
//! ```
//! use spark_rpcbuf::{ByteOrder, RpcBuf};
//!
//! let mut buf = RpcBuf::with_byte_order(ByteOrder::Native);
//! buf.write_u32(91126).ok();
//! buf.write_string_padded("hello world").ok();
//! buf.check().expect("assembly should not fail");
//! assert_eq!(buf.len(), 4 + 12);
//! assert_eq!(buf.unit_count(), 4);
//! ```

mod buffer;
mod byte_order;
mod compose;
mod config;
mod error;
mod growth;
mod reserve;
mod wire;
mod write;

pub use buffer::{BufferState, RpcBuf};
pub use byte_order::ByteOrder;
pub use compose::{UNIT, pad_len, padded_len};
pub use config::RpcBufConfig;
pub use error::{AllocationFailure, ConfigError, FailureCause};
pub use growth::{CHUNK_SIZE, round_up_to_chunk};
pub use wire::{Point, Rectangle, WireEncode};
