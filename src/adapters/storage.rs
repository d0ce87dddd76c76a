use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

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

fn copy_tree(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        Path::new(&self.base_path).join(path).exists()
    }

    async fn copy_dir(&self, source: &str, path: &str) -> Result<()> {
        let target = Path::new(&self.base_path).join(path);
        copy_tree(Path::new(source), &target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.write_file("A/ECON/data.json", b"{}").await.unwrap();

        assert!(storage.exists("A/ECON/data.json").await);
        assert_eq!(storage.read_file("A/ECON/data.json").await.unwrap(), b"{}");
    }

    #[test]
    fn test_copy_dir_copies_nested_template() {
        let template = TempDir::new().unwrap();
        std::fs::create_dir_all(template.path().join("js")).unwrap();
        std::fs::write(template.path().join("index.html"), "<html></html>").unwrap();
        std::fs::write(template.path().join("js/main.js"), "// viewer").unwrap();

        let output = TempDir::new().unwrap();
        let storage = LocalStorage::new(output.path().to_str().unwrap().to_string());

        tokio_test::block_on(storage.copy_dir(template.path().to_str().unwrap(), "U/MATH")).unwrap();

        assert!(output.path().join("U/MATH/index.html").exists());
        assert!(output.path().join("U/MATH/js/main.js").exists());
        assert!(!tokio_test::block_on(storage.exists("U/HIST")));
    }
}
