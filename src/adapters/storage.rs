use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// 本機目錄儲存。寫入時不會建立目錄，目錄必須事先存在。
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);
        // 同名檔案直接覆蓋
        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ExportError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.write_file("qrcode_rec1.png", b"first").await.unwrap();
        storage.write_file("qrcode_rec1.png", b"second").await.unwrap();

        let written = fs::read(temp_dir.path().join("qrcode_rec1.png")).unwrap();
        assert_eq!(written, b"second");
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_created() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("qrcodes");
        let storage = LocalStorage::new(missing.to_str().unwrap().to_string());

        let err = storage.write_file("qrcode_rec1.png", b"png").await.unwrap_err();

        assert!(matches!(err, ExportError::IoError(_)));
        assert!(!missing.exists());
    }
}
