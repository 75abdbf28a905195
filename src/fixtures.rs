#[cfg(test)]
pub mod test {
    use std::path::PathBuf;

    use tempfile::TempDir;

    /// Write `content` to `dir/name` and return the full path.
    pub fn json_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// A two-key recognized list, preferred key first.
    pub fn run_config_keys() -> [&'static str; 2] {
        ["run_config", "config"]
    }

    #[test]
    fn json_file_writes_content() {
        let dir = TempDir::new().unwrap();
        let path = json_file(&dir, "x.json", "{}");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }
}
