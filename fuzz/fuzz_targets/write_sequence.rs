#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spark_rpcbuf::{BufferState, ByteOrder, RpcBuf};

/// Fuzz 指令：一条写入序列，外加容量上限与失败策略。
///
/// - **Why**：扩容、失败粘滞与自动释放的组合路径很多，手写用例难以穷举；
/// - **How**：上限取较小值（至多 16 个块），让失败路径被频繁命中；
/// - **What**：每一步之后检查结构不变式，失败后检查粘滞语义。
#[derive(Debug, Arbitrary)]
struct WriteCase {
    swapped: bool,
    auto_release: bool,
    limit_chunks: Option<u8>,
    ops: Vec<WriteOp>,
}

#[derive(Debug, Arbitrary)]
enum WriteOp {
    U8(u8),
    U16(u16),
    U32(u32),
    U32s(Vec<u32>),
    Binary(Vec<u8>),
    Text(String),
    Terminated(String),
    Counted(Option<String>),
    Pad,
    Rect { x: i16, y: i16, width: u16, height: u16 },
    Reserve(u16),
    Merge(Vec<u8>),
    Reset,
    Clear,
}

fuzz_target!(|case: WriteCase| {
    let mut buf = RpcBuf::with_byte_order(ByteOrder::from_swapped(case.swapped));
    buf.set_auto_release_on_failure(case.auto_release);
    let chunk = buf.chunk_size();
    buf.set_capacity_limit(
        case.limit_chunks
            .map(|chunks| usize::from(chunks % 16 + 1) * chunk),
    );

    for op in case.ops {
        let was_failed = buf.is_failed();
        let before = buf.len();
        let outcome = match op {
            WriteOp::U8(v) => buf.write_u8(v),
            WriteOp::U16(v) => buf.write_u16(v),
            WriteOp::U32(v) => buf.write_u32(v),
            WriteOp::U32s(values) => buf.write_u32s(&values),
            WriteOp::Binary(data) => buf.write_binary_padded(&data),
            WriteOp::Text(text) => buf.write_string_padded(&text),
            WriteOp::Terminated(text) => buf.write_string_padded_with_terminator(&text),
            WriteOp::Counted(text) => buf.write_counted_string_padded(text.as_deref()),
            WriteOp::Pad => buf.pad(),
            WriteOp::Rect {
                x,
                y,
                width,
                height,
            } => buf.write_rect(x, y, width, height),
            WriteOp::Reserve(needed) => buf.reserve(usize::from(needed)).map(|_| ()),
            WriteOp::Merge(data) => {
                let mut source = RpcBuf::new();
                match source.write_u8s(&data) {
                    Ok(()) => buf.merge_padded(&mut source),
                    Err(err) => Err(err),
                }
            }
            WriteOp::Reset => {
                buf.reset();
                assert_eq!(buf.len(), 0);
                Ok(())
            }
            WriteOp::Clear => {
                buf.clear();
                assert_eq!(buf.state(), BufferState::Empty);
                Ok(())
            }
        };

        assert!(buf.len() <= buf.capacity());
        assert_eq!(buf.capacity() % buf.chunk_size(), 0);
        if let Some(limit) = buf.capacity_limit() {
            assert!(buf.capacity() <= limit);
        }
        assert_eq!(buf.unit_count() as usize, buf.len().div_ceil(4));

        if was_failed && let Err(err) = &outcome {
            assert!(err.is_sticky());
        }
        if outcome.is_err() {
            assert!(buf.is_failed());
            if buf.auto_release_on_failure() {
                assert_eq!(buf.capacity(), 0);
            } else {
                assert!(buf.len() >= before);
            }
        }
    }
});
