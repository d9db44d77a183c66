use clap::Parser;
use deposit_recon::service::Databases;
use deposit_recon::{AppConfig, DepositChecker, RegionExtractor};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

/// 定金退还数据核对
#[derive(Debug, Parser)]
#[command(name = "deposit-recon", version, about)]
struct Args {
    /// 数据文件 (*.xlsx)
    #[arg(short = 'd', long = "data")]
    data: PathBuf,

    /// 将源数据写入历史归档库
    #[arg(short = 'a', long = "archive")]
    archive: bool,

    /// 输出读取到的源数据
    #[arg(short = 'p', long = "print")]
    print: bool,

    /// 配置文件, 默认读取当前目录下的 config.*
    #[arg(short = 'c', long = "config", env = "DEPOSIT_CONFIG")]
    config: Option<PathBuf>,

    /// 将报告导出为 CSV
    #[arg(long = "report-csv")]
    report_csv: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let args = Args::parse();
    info!("deposit-recon v{}", env!("CARGO_PKG_VERSION"));

    // 加载配置
    let config = AppConfig::load(args.config.as_deref())?;
    let header = config.header()?;
    let columns = config.key_columns(&header)?;
    info!("表头定义: {:?}, 结束标记: {}", header.columns, header.end_marker);

    // 读取源数据
    let extraction = RegionExtractor::new(header)
        .print_rows(args.print)
        .extract_workbook(&args.data)?;

    // 核对
    let dbs = Databases::connect(&config).await?;
    let checker = DepositChecker::new(dbs, columns, config.ar_doc_prefix.clone());
    let outcome = checker.run(&extraction.table, args.archive).await?;

    if !outcome.report.is_empty() {
        println!("\n{}", outcome.report);
    }

    info!("应收总金额: {}", outcome.total);
    match outcome.archived_rows {
        Some(n) => info!("本次归档条数: {}", n),
        None if args.archive => warn!("归档未完成"),
        None => {}
    }

    if let Some(path) = &args.report_csv {
        outcome.report.export_csv(path)?;
        info!("报告已导出: {}", path.display());
    }

    Ok(())
}
