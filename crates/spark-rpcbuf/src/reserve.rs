use crate::{AllocationFailure, RpcBuf};

impl RpcBuf {
    /// 预留 `needed` 字节并返回指向该区域的可写视图，写位置随即前移。
    ///
    /// # 教案式注释
    /// - **意图 (Why)**：让编码器直接在缓冲内原地写入，免去临时数组与二次复制。
    /// - **契约 (What)**：
    ///   - 视图借用 `&mut self`，在下一次操作同一实例之前必须用完；
    ///     扩容可能搬迁存储，借用检查器会拒绝跨调用保留视图；
    ///   - 区域内容未定义（实际为 0，但调用方不应依赖），需要清零请使用
    ///     [`reserve_zeroed`](Self::reserve_zeroed)；
    ///   - 失败时不返回视图，缓冲进入（或保持）失败态。
    pub fn reserve(&mut self, needed: usize) -> Result<&mut [u8], AllocationFailure> {
        self.ensure_capacity(needed)?;
        let start = self.length;
        self.length += needed;
        Ok(&mut self.storage[start..self.length])
    }

    /// 同 [`reserve`](Self::reserve)，但交出前先把区域清零。
    ///
    /// 填充字节、占位字段一律走这里，保证不会把旧数据暴露到线上。
    pub fn reserve_zeroed(&mut self, needed: usize) -> Result<&mut [u8], AllocationFailure> {
        let view = self.reserve(needed)?;
        view.fill(0);
        Ok(view)
    }
}
