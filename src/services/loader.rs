// Document Loader - 旧版等级文档加载
//
// 整份读入内存并分区；嵌套内容不做任何校验

use crate::data::{JsonManager, Result};
use crate::models::LegacyDocument;
use crate::utils::content_checksum;
use std::path::Path;

/// 已加载的源文档及其校验和（两者来自同一次读取）
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub document: LegacyDocument,
    /// 源文件内容的 SHA256
    pub checksum: String,
}

/// 旧版文档加载器
#[derive(Debug, Default)]
pub struct DocumentLoader {
    json: JsonManager,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            json: JsonManager::new(),
        }
    }

    /// 读取并分区旧版文档
    ///
    /// 文件不存在或不可读时返回 `DataError::NotFound`，此时调用方不应触碰目标库。
    pub fn load(&self, path: &Path) -> Result<SourceDocument> {
        tracing::info!(path = %path.display(), "加载旧版等级数据");

        let bytes = self.json.read_bytes(path)?;
        let checksum = content_checksum(&bytes);
        let document = LegacyDocument::from_value(self.json.parse(&bytes)?)?;

        tracing::info!(
            guilds = document.guild_count(),
            meta_guilds = document.metadata.len(),
            checksum = %checksum,
            "旧版文档加载完成"
        );

        Ok(SourceDocument { document, checksum })
    }
}
