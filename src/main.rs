//! # 答案题库主程序
//!
//! 命令行入口：启动 HTTP 服务，或执行密钥生成等辅助命令

use std::path::PathBuf;
use std::sync::Arc;

use answer_bank::{
    app::{self, client_config},
    auth::generate_api_key,
    config::{AuthMode, load_config},
    lerror, linfo,
    logging::{self, LogComponent, LogStage},
    management::HttpServer,
};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "answer-bank", version, about = "题目答案查询服务")]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 日志级别（被 RUST_LOG 覆盖）
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 生成一个新的API密钥（不写入数据库）
    GenerateKey,
    /// 在身份库中登记一个哈希密钥（仅 hashed 模式），明文只输出一次
    RegisterKey {
        /// 密钥名称
        name: String,
    },
    /// 生成 bcrypt 哈希，用于 admin.token_hash 或身份库
    HashSecret {
        /// 待哈希的明文
        secret: String,
    },
    /// 输出答题脚本使用的题库配置
    ClientConfig {
        /// 写入配置的API密钥
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cli.config).await,
        Command::GenerateKey => {
            println!("{}", generate_api_key()?);
            Ok(())
        }
        Command::RegisterKey { name } => register_key(cli.config, &name).await,
        Command::HashSecret { secret } => {
            println!("{}", bcrypt::hash(secret, bcrypt::DEFAULT_COST)?);
            Ok(())
        }
        Command::ClientConfig { api_key } => {
            let config = load_config(cli.config.as_deref())?;
            let rendered = client_config(&config.server, api_key.as_deref());
            println!("{}", serde_json::to_string_pretty(&rendered)?);
            Ok(())
        }
    }
}

async fn register_key(config_path: Option<PathBuf>, name: &str) -> anyhow::Result<()> {
    let config = load_config(config_path.as_deref())?;
    if config.auth.mode != AuthMode::Hashed {
        anyhow::bail!("register-key 需要 auth.mode = \"hashed\"，database 模式请使用管理接口创建密钥");
    }

    let store = app::open_identity_store(&config).await?;
    let registered = store.register(name).await?;
    println!("{}", registered.api_key);
    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path.as_deref())?;
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "service_starting",
        "服务启动",
        platform = config.provider.platform().as_str(),
        addr = format!("{}:{}", config.server.host, config.server.port)
    );

    let context = Arc::new(app::build_context(config).await?);
    let rendered = client_config(&context.config.server, None);
    println!("\n题库配置信息:\n{}", serde_json::to_string_pretty(&rendered)?);

    let server = HttpServer::new(context)?;
    if let Err(err) = server.serve().await {
        lerror!(
            "system",
            LogStage::Error,
            LogComponent::Main,
            "service_failed",
            "服务运行失败",
            error = err.to_string()
        );
        return Err(err.into());
    }

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "service_shutdown",
        "服务正常关闭"
    );
    Ok(())
}
