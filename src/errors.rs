use std::fmt;

#[derive(Debug, Clone)]
pub enum VitrineError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
}

impl VitrineError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            VitrineError::DatabaseConfig(_) => "E001",
            VitrineError::DatabaseConnection(_) => "E002",
            VitrineError::DatabaseOperation(_) => "E003",
            VitrineError::FileOperation(_) => "E004",
            VitrineError::Validation(_) => "E005",
            VitrineError::NotFound(_) => "E006",
            VitrineError::Serialization(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            VitrineError::DatabaseConfig(_) => "Database Configuration Error",
            VitrineError::DatabaseConnection(_) => "Database Connection Error",
            VitrineError::DatabaseOperation(_) => "Database Operation Error",
            VitrineError::FileOperation(_) => "File Operation Error",
            VitrineError::Validation(_) => "Validation Error",
            VitrineError::NotFound(_) => "Resource Not Found",
            VitrineError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            VitrineError::DatabaseConfig(msg) => msg,
            VitrineError::DatabaseConnection(msg) => msg,
            VitrineError::DatabaseOperation(msg) => msg,
            VitrineError::FileOperation(msg) => msg,
            VitrineError::Validation(msg) => msg,
            VitrineError::NotFound(msg) => msg,
            VitrineError::Serialization(msg) => msg,
        }
    }
}

impl fmt::Display for VitrineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for VitrineError {}

// 便捷的构造函数
impl VitrineError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        VitrineError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        VitrineError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        VitrineError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        VitrineError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        VitrineError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        VitrineError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        VitrineError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for VitrineError {
    fn from(err: sea_orm::DbErr) -> Self {
        VitrineError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for VitrineError {
    fn from(err: std::io::Error) -> Self {
        VitrineError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for VitrineError {
    fn from(err: serde_json::Error) -> Self {
        VitrineError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VitrineError>;
