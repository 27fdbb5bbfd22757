use std::fmt;

#[derive(Debug, Clone)]
pub enum ClickguardError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    LedgerUnavailable(String),
    Validation(String),
    NotFound(String),
}

impl ClickguardError {
    pub fn code(&self) -> &'static str {
        match self {
            ClickguardError::DatabaseConfig(_) => "E001",
            ClickguardError::DatabaseConnection(_) => "E002",
            ClickguardError::DatabaseOperation(_) => "E003",
            ClickguardError::LedgerUnavailable(_) => "E004",
            ClickguardError::Validation(_) => "E005",
            ClickguardError::NotFound(_) => "E006",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ClickguardError::DatabaseConfig(_) => "Database Configuration Error",
            ClickguardError::DatabaseConnection(_) => "Database Connection Error",
            ClickguardError::DatabaseOperation(_) => "Database Operation Error",
            ClickguardError::LedgerUnavailable(_) => "Click Ledger Unavailable",
            ClickguardError::Validation(_) => "Validation Error",
            ClickguardError::NotFound(_) => "Resource Not Found",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ClickguardError::DatabaseConfig(msg) => msg,
            ClickguardError::DatabaseConnection(msg) => msg,
            ClickguardError::DatabaseOperation(msg) => msg,
            ClickguardError::LedgerUnavailable(msg) => msg,
            ClickguardError::Validation(msg) => msg,
            ClickguardError::NotFound(msg) => msg,
        }
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ClickguardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ClickguardError {}

// 便捷的构造函数
impl ClickguardError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ClickguardError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ClickguardError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ClickguardError::DatabaseOperation(msg.into())
    }

    pub fn ledger_unavailable<T: Into<String>>(msg: T) -> Self {
        ClickguardError::LedgerUnavailable(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ClickguardError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ClickguardError::NotFound(msg.into())
    }
}

impl From<sea_orm::DbErr> for ClickguardError {
    fn from(err: sea_orm::DbErr) -> Self {
        ClickguardError::DatabaseOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClickguardError>;
