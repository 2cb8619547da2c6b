use std::time::Duration;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 页面操作错误（导航、脚本、鼠标、等待超时）
    #[error("页面错误: {0}")]
    Page(#[from] PageError),
    /// 字段提取错误
    #[error("提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: BoxError,
    },
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: BoxError,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: BoxError,
    },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
}

/// 页面操作错误
#[derive(Debug, Error)]
pub enum PageError {
    /// 导航失败
    #[error("导航到 {url} 失败: {message}")]
    Navigation { url: String, message: String },
    /// 有界等待超时
    #[error("等待 {what} 超时 ({waited:?})")]
    Timeout { what: String, waited: Duration },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    Script {
        #[source]
        source: BoxError,
    },
    /// 鼠标输入失败
    #[error("鼠标输入失败: {message}")]
    Input { message: String },
    /// 元素不存在（或已从文档中移除）
    #[error("元素不存在: {selector} [{nth}]")]
    ElementNotFound { selector: String, nth: usize },
}

/// 字段提取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 必需字段缺失或为空
    #[error("必需字段 '{field}' 缺失或为空")]
    MissingField { field: String },
    /// 快照不是 JSON 对象
    #[error("快照格式错误: {message}")]
    MalformedSnapshot { message: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 序列化失败
    #[error("JSON 序列化失败: {source}")]
    JsonFailed {
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置项取值非法
    #[error("配置项 {key} 非法: {reason}")]
    Invalid { key: String, reason: String },
    /// TOML 解析失败
    #[error("TOML 解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Page(PageError::Script {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::JsonFailed { source: err })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Other(format!("URL 解析失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建导航失败错误
    pub fn navigation(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Page(PageError::Navigation {
            url: url.into(),
            message: message.to_string(),
        })
    }

    /// 创建等待超时错误
    pub fn timeout(what: impl Into<String>, waited: Duration) -> Self {
        AppError::Page(PageError::Timeout {
            what: what.into(),
            waited,
        })
    }

    /// 创建脚本执行错误
    pub fn script(message: impl Into<String>) -> Self {
        let message: String = message.into();
        AppError::Page(PageError::Script {
            source: message.into(),
        })
    }

    /// 创建鼠标输入错误
    pub fn input(message: impl Into<String>) -> Self {
        AppError::Page(PageError::Input {
            message: message.into(),
        })
    }

    /// 创建字段缺失错误
    pub fn missing_field(field: impl Into<String>) -> Self {
        AppError::Extraction(ExtractionError::MissingField {
            field: field.into(),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建配置非法错误
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::Invalid {
            key: key.into(),
            reason: reason.into(),
        })
    }

    /// 是否为有界等待超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Page(PageError::Timeout { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
