use crate::error::{CheckError, CheckResult};
use crate::models::{HeaderSpec, KeyColumns};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 默认配置文件名 (不含扩展名, 支持 yml/toml/json)
pub const DEFAULT_CONFIG_NAME: &str = "config";

/// 环境变量前缀, 例如 `DEPOSIT_DATABASES__STORE`
pub const ENV_PREFIX: &str = "DEPOSIT";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 表头定义, `列1, 列2, ... : 结束标记`
    #[serde(default)]
    pub target: String,
    pub databases: DatabaseConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    /// 订单号 -> 应收单号的前缀
    #[serde(default = "default_ar_doc_prefix")]
    pub ar_doc_prefix: String,
    #[serde(default)]
    pub pool: PoolConfig,
}

/// 三个数据库的连接串
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub store: String,    // 门店系统
    pub erp: String,      // ERP (批号/应收单)
    pub archive: String,  // 历史归档库
}

/// 定金金额列与订单号列在表头中的序号
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub amount: usize,
    pub key: usize,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self { amount: 0, key: 1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

fn default_ar_doc_prefix() -> String {
    "SHAR-".to_string()
}

impl AppConfig {
    /// 读取配置文件, 再用环境变量覆盖
    ///
    /// 未指定路径时读取当前目录下的 `config.*` (可以不存在)。
    pub fn load(path: Option<&Path>) -> CheckResult<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// 解析表头定义
    pub fn header(&self) -> CheckResult<HeaderSpec> {
        if self.target.trim().is_empty() {
            return Err(CheckError::HeaderSpec {
                spec: String::new(),
                message: "need header definition in config (`target`)".to_string(),
            });
        }
        self.target.parse()
    }

    /// 校验列序号并返回
    pub fn key_columns(&self, header: &HeaderSpec) -> CheckResult<KeyColumns> {
        let check = |name: &'static str, index: usize| {
            if index < header.len() {
                Ok(index)
            } else {
                Err(CheckError::InvalidColumn {
                    name,
                    index,
                    len: header.len(),
                })
            }
        };
        Ok(KeyColumns {
            key: check("key", self.columns.key)?,
            amount: check("amount", self.columns.amount)?,
        })
    }
}
