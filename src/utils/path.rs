use std::borrow::Cow;
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use log::error;

pub fn basename(path: &str) -> Cow<'_, str> {
    let mut pieces = path.rsplit('/');
    match pieces.next() {
        Some("") if path == "/" => "/".into(),
        Some(p) => p.into(),
        None => path.into(),
    }
}

/// PATH 未设置时使用的搜索路径
const DEFAULT_SEARCH_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// 按给定的 PATH 查找可执行文件；含 '/' 的名字原样返回
pub fn find_file_in_path(filename: &str, search_path: Option<&str>) -> Option<PathBuf> {
    if filename.is_empty() {
        return None;
    }
    if filename.contains('/') {
        return Some(PathBuf::from(filename));
    }

    search_path
        .unwrap_or(DEFAULT_SEARCH_PATH)
        .split(':')
        .map(|dir| if dir.is_empty() { Path::new(".") } else { Path::new(dir) })
        .map(|dir| dir.join(filename))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    match fs::metadata(path) {
        // not binary
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

pub fn current_dir() -> String {
    match env::current_dir() {
        Ok(dir) => dir.to_string_lossy().to_string(),
        Err(e) => {
            error!("treesh: PROMPT: env current_dir error: {}", e);
            String::new()
        }
    }
}
