use serde::{Deserialize, Serialize};

/// 多字节标量写入时采用的字节序。
///
/// # 教案式说明
/// - **意图 (Why)**：连接建立时客户端声明自己的字节序，服务端据此决定是否需要翻转；
///   协商本身发生在连接层，本类型只承载结果。
/// - **契约 (What)**：
///   - `Native`：按本机字节序原样存储；
///   - `Swapped`：相对本机字节序做纯字节置换。有符号值的补码表示在置换前后保持不变，
///     因此有符号写入直接复用无符号路径。
/// - **注意事项 (Trade-offs)**：刻意不提供 `Big`/`Little` 这样的绝对语义，
///   两态含义与原始的 `swapped` 布尔量一一对应。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    #[default]
    Native,
    Swapped,
}

impl ByteOrder {
    /// 由连接层给出的 `swapped` 标志构造。
    pub const fn from_swapped(swapped: bool) -> Self {
        if swapped {
            ByteOrder::Swapped
        } else {
            ByteOrder::Native
        }
    }

    pub const fn is_swapped(self) -> bool {
        matches!(self, ByteOrder::Swapped)
    }

    /// 16 位值在缓冲中的存储字节。
    pub const fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::Native => value.to_ne_bytes(),
            ByteOrder::Swapped => value.swap_bytes().to_ne_bytes(),
        }
    }

    /// 32 位值在缓冲中的存储字节。
    pub const fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::Native => value.to_ne_bytes(),
            ByteOrder::Swapped => value.swap_bytes().to_ne_bytes(),
        }
    }
}

impl From<bool> for ByteOrder {
    fn from(swapped: bool) -> Self {
        ByteOrder::from_swapped(swapped)
    }
}
