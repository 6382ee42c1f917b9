//! 文件操作辅助函数

use sha2::{Digest, Sha256};

/// 计算源文档内容的 SHA256 校验和（十六进制）
///
/// 迁移报告中记录该值，便于确认两次运行使用的是同一份源文档。
/// 传入的必须是实际被解析的那份字节。
pub fn content_checksum(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_checksum() {
        let checksum = content_checksum(b"{}");
        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(checksum, content_checksum(b"{}"));
        assert_ne!(checksum, content_checksum(br#"{"10": {}}"#));
    }

    #[test]
    fn test_content_checksum_known_value() {
        assert_eq!(
            content_checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
