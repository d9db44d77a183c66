use thiserror::Error;

/// 核对流程的结果类型
pub type CheckResult<T> = Result<T, CheckError>;

/// 核对流程中的致命错误
///
/// 数据质量问题（重复单号、金额格式、孤立应收单等）不在这里，
/// 它们作为 [`crate::models::Finding`] 写入报告，流程继续。
#[derive(Debug, Error)]
pub enum CheckError {
    /// 配置文件/环境变量读取失败
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    /// 表头定义格式错误 (缺少 `:` 结束标记、空列名等)
    #[error("invalid header definition '{spec}': {message}")]
    HeaderSpec { spec: String, message: String },

    /// 配置的列序号超出表头范围
    #[error("column '{name}' index {index} is out of range for a header of {len} columns")]
    InvalidColumn {
        name: &'static str,
        index: usize,
        len: usize,
    },

    /// 工作簿打开或读取失败
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// 所有表单中都没有找到与表头匹配的数据
    #[error("no data rows matching header {header:?} were found")]
    NoMatchingData { header: Vec<String> },

    /// 数据库连接或查询失败
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 报告导出失败
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
