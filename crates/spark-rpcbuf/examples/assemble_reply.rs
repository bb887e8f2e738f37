//! 组装一条"列表类"应答：先在临时缓冲中写出变长体，再以其 4 字节单元数填写定长头并合并。
//!
//! 运行：`RUST_LOG=spark_rpcbuf=trace cargo run -p spark-rpcbuf --example assemble_reply`

use spark_rpcbuf::{ByteOrder, Rectangle, RpcBuf, RpcBufConfig};
use std::error::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter())
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)?;

    // 客户端字节序与服务端相反时，整条应答以翻转字节序写出。
    let config = RpcBufConfig {
        byte_order: ByteOrder::Swapped,
        ..RpcBufConfig::default()
    };

    let clips = [
        Rectangle::new(0, 0, 640, 480),
        Rectangle::new(-16, 32, 128, 64),
        Rectangle::new(100, 100, 1, 1),
    ];
    let mut body = RpcBuf::from_config(&config)?;
    body.write_all_encoded(&clips)?;
    body.write_counted_string_padded(Some("clip-list"))?;

    let mut reply = RpcBuf::from_config(&config)?;
    reply.write_u8(1)?;
    reply.write_u8(0)?;
    reply.write_u16(42)?;
    reply.write_u32(body.unit_count())?;
    reply.write_u32(u32::try_from(clips.len())?)?;
    reply.write_u32s(&[0; 5])?;
    reply.merge_padded(&mut body)?;

    let units = reply.unit_count();
    let payload = reply.take_bytes()?;
    info!(bytes = payload.len(), units, "reply assembled");

    for (offset, row) in payload.chunks(16).enumerate() {
        let hex: Vec<String> = row.iter().map(|byte| format!("{byte:02x}")).collect();
        println!("{:04x}  {}", offset * 16, hex.join(" "));
    }
    Ok(())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
