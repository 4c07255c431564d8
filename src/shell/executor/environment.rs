use std::collections::HashMap;
use std::ffi::CString;

use log::warn;

/// 会话级环境变量表，由编排进程持有；子进程在 fork 时得到一份快照
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// 从宿主进程环境初始化
    pub fn from_host() -> Self {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// 形如 `NAME=VALUE` 且 NAME 为合法标识符时返回 (NAME, VALUE)
    pub fn parse_assignment(text: &str) -> Option<(&str, &str)> {
        let (name, value) = text.split_once('=')?;
        let mut chars = name.chars();
        let first = chars.next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some((name, value))
    }

    /// 供 execvpe 使用的 `NAME=VALUE` 列表；含 NUL 的条目被跳过
    pub fn to_envp(&self) -> Vec<CString> {
        self.vars
            .iter()
            .filter_map(|(name, value)| match CString::new(format!("{}={}", name, value)) {
                Ok(entry) => Some(entry),
                Err(_) => {
                    warn!("跳过包含 NUL 的环境变量: {}", name);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(Environment::parse_assignment("X=1"), Some(("X", "1")));
        assert_eq!(Environment::parse_assignment("_a9=b=c"), Some(("_a9", "b=c")));
        assert_eq!(Environment::parse_assignment("EMPTY="), Some(("EMPTY", "")));
    }

    #[test]
    fn test_non_identifier_is_not_assignment() {
        assert_eq!(Environment::parse_assignment("ls"), None);
        assert_eq!(Environment::parse_assignment("=x"), None);
        assert_eq!(Environment::parse_assignment("9X=1"), None);
        assert_eq!(Environment::parse_assignment("./run=fast"), None);
        assert_eq!(Environment::parse_assignment("a-b=1"), None);
    }

    #[test]
    fn test_set_overrides() {
        let mut env = Environment::default();
        env.set("X", "1");
        env.set("X", "2");
        assert_eq!(env.get("X"), Some("2"));
        assert_eq!(env.get("Y"), None);
    }

    #[test]
    fn test_envp_entries() {
        let mut env = Environment::default();
        env.set("A", "1");
        env.set("BAD", "x\0y");
        let envp = env.to_envp();
        assert_eq!(envp, vec![CString::new("A=1").unwrap_or_default()]);
    }
}
