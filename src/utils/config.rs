use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

pub struct Config {
    pub name: String,
    pub editor_mode: String,
    pub logger_level: String,
    pub logger_dir: PathBuf,
}

impl Config {
    fn get_config_dir() -> PathBuf {
        if let Ok(home) = env::var("HOME") {
            PathBuf::from(home).join(".config/treesh")
        } else {
            env::temp_dir().join("treesh")
        }
    }

    fn default() -> Self {
        let config_dir = Self::get_config_dir();
        Config {
            name: String::from(env!("CARGO_PKG_NAME")),
            editor_mode: String::from("emacs"),
            logger_level: String::from("warn"),
            logger_dir: config_dir.join("logs"),
        }
    }

    pub fn new() -> Self {
        // 优先加载 .env 文件
        if cfg!(debug_assertions) {
            dotenv::from_filename(".env.development").ok();
        } else {
            dotenv().ok();
        }

        let mut config = Config::default();

        if let Ok(editor) = env::var("TREESH_EDITOR") {
            config.editor_mode = editor.to_lowercase();
        }

        if let Ok(level) = env::var("TREESH_LOG_LEVEL") {
            config.logger_level = level;
        }

        if let Ok(dir) = env::var("TREESH_LOG_DIR") {
            config.logger_dir = PathBuf::from(dir);
        }

        config
    }
}
