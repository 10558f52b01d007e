use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// 文档内容类型（根据文件头魔数识别）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Jpeg,
    Png,
    Gif,
    Tiff,
    Pdf,
}

impl ContentType {
    /// 从文件头识别内容类型，无法识别时返回 `None`
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const SIGNATURES: &[(&[u8], ContentType)] = &[
            (&[0xFF, 0xD8, 0xFF], ContentType::Jpeg),
            (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], ContentType::Png),
            (b"GIF87a", ContentType::Gif),
            (b"GIF89a", ContentType::Gif),
            (b"II*\0", ContentType::Tiff),
            (b"MM\0*", ContentType::Tiff),
            (b"%PDF", ContentType::Pdf),
        ];

        SIGNATURES
            .iter()
            .find(|(magic, _)| bytes.starts_with(magic))
            .map(|(_, content_type)| *content_type)
    }

    /// MIME 类型
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Jpeg => "image/jpeg",
            ContentType::Png => "image/png",
            ContentType::Gif => "image/gif",
            ContentType::Tiff => "image/tiff",
            ContentType::Pdf => "application/pdf",
        }
    }
}

/// 被分析的文档
///
/// 发起分析时由数据本地生成（id 形如 `local-<n>`），
/// 分析完成后替换为后端返回的文档。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    pub id: String,
    pub content_type: ContentType,
    pub size: usize,
    pub created_at: DateTime<Utc>,
}

impl AnalysisDocument {
    /// 根据文档数据生成本地文档描述
    ///
    /// 数据为空或格式无法识别时返回 `InvalidPayload`
    pub fn from_payload(id: impl Into<String>, payload: &[u8]) -> AnalysisResult<Self> {
        if payload.is_empty() {
            return Err(AnalysisError::invalid_payload("文档数据为空"));
        }

        let content_type = ContentType::sniff(payload).ok_or_else(|| {
            AnalysisError::invalid_payload(format!(
                "无法识别的文档格式 (文件头: {:02X?})",
                &payload[..payload.len().min(8)]
            ))
        })?;

        Ok(Self {
            id: id.into(),
            content_type,
            size: payload.len(),
            created_at: Utc::now(),
        })
    }

    /// 替换文档 id（用于后端分配了自己的 id 的情况）
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_known_formats() {
        assert_eq!(ContentType::sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), Some(ContentType::Jpeg));
        assert_eq!(
            ContentType::sniff(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            Some(ContentType::Png)
        );
        assert_eq!(ContentType::sniff(b"GIF89a...."), Some(ContentType::Gif));
        assert_eq!(ContentType::sniff(b"MM\0*rest"), Some(ContentType::Tiff));
        assert_eq!(ContentType::sniff(b"%PDF-1.7"), Some(ContentType::Pdf));
    }

    #[test]
    fn test_sniff_rejects_unknown_and_truncated() {
        assert_eq!(ContentType::sniff(b"hello world"), None);
        assert_eq!(ContentType::sniff(&[0xFF, 0xD8]), None);
        assert_eq!(ContentType::sniff(&[]), None);
    }

    #[test]
    fn test_from_payload_describes_document() {
        let doc = AnalysisDocument::from_payload("local-1", b"%PDF-1.4 body").unwrap();
        assert_eq!(doc.id, "local-1");
        assert_eq!(doc.content_type, ContentType::Pdf);
        assert_eq!(doc.size, 13);
        assert_eq!(doc.content_type.mime(), "application/pdf");
    }

    #[test]
    fn test_from_payload_rejects_empty_and_unknown() {
        let err = AnalysisDocument::from_payload("local-1", &[]).unwrap_err();
        assert!(err.is_caller_error());

        let err = AnalysisDocument::from_payload("local-2", b"plain text").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidPayload { .. }));
    }
}
