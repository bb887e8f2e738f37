//! `compose_contract` 集成测试：对齐填充、字符串写入、跨缓冲合并与交付。
//!
//! # 测试总览（Why）
//! - `pad` 幂等，`unit_count` 恒等于 `ceil(len / 4)`；
//! - 三种字符串写入在空输入上的行为刻意不对称，必须分别锁定；
//! - 合并总会清空来源缓冲，并把来源的失败传递给目标。

use spark_rpcbuf::{BufferState, ByteOrder, CHUNK_SIZE, FailureCause, Rectangle, RpcBuf};

/// 连续两次 `pad` 的结果与一次相同。
#[test]
fn pad_is_idempotent() {
    let mut buf = RpcBuf::new();
    buf.write_u8s(&[1, 2, 3, 4, 5]).expect("seed");
    buf.pad().expect("first pad");
    let after_first = buf.len();
    buf.pad().expect("second pad");
    assert_eq!(after_first, 8);
    assert_eq!(buf.len(), after_first);
    assert_eq!(&buf.as_bytes()[5..], &[0, 0, 0]);
}

/// 已对齐时 `pad` 不写入、不分配。
#[test]
fn pad_on_aligned_buffer_is_noop() {
    let mut buf = RpcBuf::new();
    buf.pad().expect("empty pad");
    assert_eq!(buf.capacity(), 0);
    buf.write_u32(1).expect("aligned write");
    buf.pad().expect("aligned pad");
    assert_eq!(buf.len(), 4);
}

/// `unit_count` 对每个长度都等于向上取整的 4 字节单元数。
#[test]
fn unit_count_is_ceil_of_length_over_four() {
    let mut buf = RpcBuf::new();
    assert_eq!(buf.unit_count(), 0);
    for written in 1..=17u32 {
        buf.write_u8(0xFF).expect("byte");
        assert_eq!(buf.unit_count(), written.div_ceil(4));
    }
}

/// 空串与 `write_string_padded`：严格无操作。
#[test]
fn string_padded_on_empty_is_strict_noop() {
    let mut buf = RpcBuf::new();
    buf.write_string_padded("").expect("noop");
    assert_eq!(buf.len(), 0);
    assert_eq!(buf.capacity(), 0);

    buf.write_u8(1).expect("misalign");
    buf.write_string_padded("").expect("noop");
    assert_eq!(buf.len(), 1, "no padding is emitted either");
}

/// 空串与带结束符写入：写入 4 字节 0 占位，区别于上一个用例。
#[test]
fn terminated_string_on_empty_writes_zero_placeholder() {
    let mut buf = RpcBuf::new();
    buf.write_string_padded_with_terminator("").expect("placeholder");
    assert_eq!(buf.as_bytes(), &[0, 0, 0, 0]);

    let mut other = RpcBuf::new();
    other.write_string_padded("").expect("noop");
    assert_ne!(buf.len(), other.len(), "the two empty-input behaviors stay asymmetric");
}

/// 非空字符串：原始字节后补齐。
#[test]
fn string_padded_pads_to_unit() {
    let mut buf = RpcBuf::new();
    buf.write_string_padded("hello").expect("write");
    assert_eq!(buf.as_bytes(), b"hello\0\0\0");
}

/// 带结束符：总是写入一个 0，再补齐。
#[test]
fn terminated_string_appends_nul_before_padding() {
    let mut buf = RpcBuf::new();
    buf.write_string_padded_with_terminator("abc").expect("write");
    assert_eq!(buf.as_bytes(), b"abc\0");

    buf.write_string_padded_with_terminator("abcd").expect("write");
    assert_eq!(&buf.as_bytes()[4..], b"abcd\0\0\0\0");
}

/// 二进制写入：空数据严格无操作，非空数据补齐。
#[test]
fn binary_padded_follows_string_rules() {
    let mut buf = RpcBuf::new();
    buf.write_binary_padded(&[]).expect("noop");
    assert_eq!(buf.len(), 0);
    buf.write_binary_padded(&[9, 9, 9, 9, 9, 9]).expect("write");
    assert_eq!(buf.as_bytes(), &[9, 9, 9, 9, 9, 9, 0, 0]);
}

/// 计数字符串 "ab"：本机字节序长度前缀 + 字节 + 填充。
#[test]
fn counted_string_native_layout() {
    let mut buf = RpcBuf::new();
    buf.write_counted_string_padded(Some("ab")).expect("write");
    let mut expected = 2u16.to_ne_bytes().to_vec();
    expected.extend_from_slice(b"ab");
    assert_eq!(buf.as_bytes(), expected.as_slice());
    assert_eq!(buf.len(), 4, "prefix plus two bytes is already aligned");

    buf.write_counted_string_padded(Some("abc")).expect("write");
    assert_eq!(buf.len(), 4 + 8);
    assert_eq!(&buf.as_bytes()[6..], b"abc\0\0\0");
}

/// 小端主机上的字面字节：`02 00 'a' 'b'`；翻转后前两字节为 `00 02`。
#[cfg(target_endian = "little")]
#[test]
fn counted_string_literal_bytes_on_little_endian_host() {
    let mut native = RpcBuf::new();
    native.write_counted_string_padded(Some("ab")).expect("write");
    assert_eq!(native.as_bytes(), &[0x02, 0x00, b'a', b'b'][..]);

    let mut swapped = RpcBuf::with_byte_order(ByteOrder::Swapped);
    swapped.write_counted_string_padded(Some("ab")).expect("write");
    assert_eq!(&swapped.as_bytes()[..2], &[0x00, 0x02]);
    assert_eq!(&swapped.as_bytes()[2..4], b"ab");
}

/// 计数字符串：`None` 无操作，`Some("")` 写出长度 0 与填充。
#[test]
fn counted_string_distinguishes_absent_from_empty() {
    let mut buf = RpcBuf::new();
    buf.write_counted_string_padded(None).expect("absent");
    assert_eq!(buf.len(), 0);
    assert_eq!(buf.capacity(), 0);

    buf.write_counted_string_padded(Some("")).expect("empty");
    assert_eq!(buf.as_bytes(), &[0, 0, 0, 0]);
}

/// 超过 16 位长度的文本被截断，长度前缀与载荷保持一致。
#[test]
fn counted_string_truncates_to_u16_max() {
    let text = "x".repeat(usize::from(u16::MAX) + 10);
    let mut buf = RpcBuf::new();
    buf.write_counted_string_padded(Some(&text)).expect("write");
    let prefix = u16::from_ne_bytes([buf.as_bytes()[0], buf.as_bytes()[1]]);
    assert_eq!(prefix, u16::MAX);
    assert_eq!(buf.len(), (2 + usize::from(u16::MAX)).div_ceil(4) * 4);
    assert_eq!(buf.len() % 4, 0);
}

/// 合并 5 字节来源：目标得到 8 字节，来源被彻底清空。
#[test]
fn merge_pads_source_content_and_clears_source() {
    let mut outer = RpcBuf::new();
    let mut scratch = RpcBuf::new();
    scratch.write_u8s(b"12345").expect("scratch");

    outer.merge_padded(&mut scratch).expect("merge");
    assert_eq!(outer.len(), 8);
    assert_eq!(outer.as_bytes(), b"12345\0\0\0");
    assert_eq!(scratch.capacity(), 0);
    assert_eq!(scratch.len(), 0);
    assert_eq!(scratch.state(), BufferState::Empty);
}

/// 空来源合并不写入任何内容，但依旧清空来源。
#[test]
fn merge_of_empty_source_is_noop_for_target() {
    let mut outer = RpcBuf::new();
    outer.write_u8(1).expect("misalign");
    let mut scratch = RpcBuf::new();
    scratch.reserve(0).expect("nothing");

    outer.merge_padded(&mut scratch).expect("merge");
    assert_eq!(outer.len(), 1);
    assert_eq!(scratch.state(), BufferState::Empty);
}

/// 来源失败：目标随之失败，原有内容按策略保留；来源被清空。
#[test]
fn failed_source_poisons_target() {
    let mut outer = RpcBuf::new();
    outer.write_u32(42).expect("seed");

    let mut scratch = RpcBuf::new();
    scratch.set_capacity_limit(Some(CHUNK_SIZE));
    scratch.write_u8(1).expect("seed");
    assert!(scratch.reserve(CHUNK_SIZE).is_err());

    let err = outer.merge_padded(&mut scratch).expect_err("poisoned");
    assert_eq!(err.cause(), FailureCause::Source);
    assert!(outer.is_failed());
    assert_eq!(outer.len(), 4);
    assert_eq!(outer.capacity(), CHUNK_SIZE);
    assert!(!scratch.is_failed());
    assert_eq!(scratch.state(), BufferState::Empty);
}

/// 来源失败且目标开启自动释放：目标立即归还存储。
#[test]
fn failed_source_releases_auto_clearing_target() {
    let mut outer = RpcBuf::new();
    outer.set_auto_release_on_failure(true);
    outer.write_u32(42).expect("seed");

    let mut scratch = RpcBuf::new();
    scratch.set_capacity_limit(Some(CHUNK_SIZE));
    assert!(scratch.reserve(CHUNK_SIZE + 1).is_err());

    assert!(outer.merge_padded(&mut scratch).is_err());
    assert!(outer.is_failed());
    assert_eq!(outer.capacity(), 0);
    assert!(outer.as_bytes().is_empty());
    assert!(outer.write_u8(1).expect_err("sticky").is_sticky());
}

/// 目标写入失败时来源同样被清空。
#[test]
fn source_is_cleared_even_when_append_fails() {
    let mut outer = RpcBuf::new();
    outer.set_capacity_limit(Some(CHUNK_SIZE));
    outer.write_u8s(&[0; CHUNK_SIZE - 2]).expect("nearly full");

    let mut scratch = RpcBuf::new();
    scratch.write_u32s(&[7, 7]).expect("scratch");
    assert!(outer.merge_padded(&mut scratch).is_err());
    assert!(outer.is_failed());
    assert_eq!(scratch.capacity(), 0);
    assert_eq!(scratch.len(), 0);
}

/// RECTANGLE：四个字段按固定顺序写出，共 8 字节，不填充。
#[test]
fn rect_writes_fields_in_order_without_padding() {
    let mut buf = RpcBuf::with_byte_order(ByteOrder::Swapped);
    buf.write_rect(-1, 2, 640, 480).expect("rect");
    assert_eq!(buf.len(), Rectangle::WIRE_LEN);

    let mut expected = Vec::new();
    expected.extend(ByteOrder::Swapped.u16_bytes((-1i16).cast_unsigned()));
    expected.extend(ByteOrder::Swapped.u16_bytes(2));
    expected.extend(ByteOrder::Swapped.u16_bytes(640));
    expected.extend(ByteOrder::Swapped.u16_bytes(480));
    assert_eq!(buf.as_bytes(), expected.as_slice());

    buf.write_u8(0).expect("misalign");
    buf.write_rect(0, 0, 1, 1).expect("rect");
    assert_eq!(buf.len(), 17, "rect never pads");
}

/// 批量写入记录：一次预留，逐条写出。
#[test]
fn encoded_lists_reserve_once() {
    let rects = [
        Rectangle::new(0, 0, 10, 10),
        Rectangle::new(5, 5, 20, 20),
        Rectangle::new(-5, -5, 1, 1),
    ];
    let mut buf = RpcBuf::new();
    buf.write_all_encoded(&rects).expect("list");
    assert_eq!(buf.len(), 3 * Rectangle::WIRE_LEN);
    assert_eq!(buf.generation(), 1);

    let mut one_by_one = RpcBuf::new();
    for rect in &rects {
        one_by_one
            .write_rect(rect.x, rect.y, rect.width, rect.height)
            .expect("rect");
    }
    assert_eq!(buf.as_bytes(), one_by_one.as_bytes());

    buf.write_all_encoded::<Rectangle>(&[]).expect("empty list");
    assert_eq!(buf.len(), 3 * Rectangle::WIRE_LEN);
}

/// `take_bytes` 交出已写内容并清空缓冲，策略字段保留。
#[test]
fn take_bytes_hands_off_and_clears() {
    let mut buf = RpcBuf::with_byte_order(ByteOrder::Swapped);
    buf.write_string_padded("reply").expect("write");
    let copy = buf.to_bytes();

    let bytes = buf.take_bytes().expect("handoff");
    assert_eq!(bytes, copy);
    assert_eq!(&bytes[..], b"reply\0\0\0");
    assert_eq!(buf.state(), BufferState::Empty);
    assert_eq!(buf.byte_order(), ByteOrder::Swapped);
}

/// 失败的缓冲拒绝交付，残缺应答不会离开缓冲。
#[test]
fn take_bytes_refuses_failed_buffer() {
    let mut buf = RpcBuf::new();
    buf.set_capacity_limit(Some(CHUNK_SIZE));
    buf.write_u8(1).expect("seed");
    assert!(buf.reserve(CHUNK_SIZE).is_err());

    assert!(buf.take_bytes().is_err());
    assert!(buf.is_failed());
    assert_eq!(buf.len(), 1);
}

/// 交付给连接层后缓冲不会自动释放。
#[test]
fn as_bytes_handoff_does_not_release() {
    let mut buf = RpcBuf::new();
    buf.write_u32(5).expect("write");
    let sent = buf.as_bytes().to_vec();
    assert_eq!(sent.len(), 4);
    assert_eq!(buf.capacity(), CHUNK_SIZE);
    let view: &[u8] = buf.as_ref();
    assert_eq!(view, sent.as_slice());
    buf.clear();
    assert_eq!(buf.capacity(), 0);
}
