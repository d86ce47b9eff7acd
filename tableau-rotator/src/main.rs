//! Tableau 凭据轮换工具
//!
//! 用法：
//!
//! ```text
//! tableau-rotator <server_url> <admin_user> <admin_password> <db_env_name> <new_db_password>
//! ```
//!
//! 流程：
//! - 登录 Tableau 服务器
//! - 更新所有指向目标数据库环境的数据源连接密码
//! - 更新第一个连接类型一致且指向目标环境的工作簿
//! - 登出并使令牌失效
//!
//! # Environment variables
//!
//! | Variable                           | Default | Description                                   |
//! |------------------------------------|---------|-----------------------------------------------|
//! | `ROTATOR_API_VERSION`              | `2.8`   | REST API version                              |
//! | `ROTATOR_SITE`                     | empty   | Site content URL (empty is the default site)  |
//! | `ROTATOR_REQUEST_TIMEOUT_SECS`     | `30`    | Per-request timeout                           |
//! | `ROTATOR_PAGE_SIZE`                | `100`   | Page size for listings                        |
//! | `ROTATOR_WORKBOOK_CONNECTION_TYPE` | unset   | Only rotate workbooks of this connection type |
//! | `LOG_FORMAT`                       | `text`  | `json` for structured log lines               |
//! | `RUST_LOG`                         | `info`  | Log filter                                    |

use std::sync::Arc;

use common::config::AppConfig;
use common::errors::AppResult;
use common::models::RotationReport;
use tableau_rotator::cli::{Cli, Invocation};
use tableau_rotator::{AppState, RotationService, TableauClient};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // 初始化日志追踪
    init_tracing();

    let exit_code = match run().await {
        Ok(Some(report)) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => error!(error = %e, "Failed to render rotation report"),
            }
            0
        }
        Ok(None) => 0,
        Err(e) => {
            let server_code = e.api_error().map(|api| api.code.as_str());
            error!(code = e.error_code(), server_code, error = %e, "轮换失败");
            eprintln!("error: {}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> AppResult<Option<RotationReport>> {
    let cli = match Cli::try_parse_args(std::env::args_os())? {
        Invocation::Rotate(cli) => cli,
        Invocation::Info(message) => {
            Invocation::write_info(&message, &mut std::io::stdout().lock())?;
            return Ok(None);
        }
    };

    // 加载配置
    let config = AppConfig::load();
    let (server, credentials, request) = cli.into_parts(&config)?;

    // 创建应用状态
    let state = AppState::new(config)?;
    info!(
        server = %server,
        api_version = %state.config.api_version,
        environment = %request.environment,
        "启动凭据轮换"
    );

    let client = TableauClient::new(state.http_client.clone(), server, &state.config);
    let service = RotationService::new(Arc::new(client), &state.config);
    let report = service.run(&credentials, &request).await?;

    Ok(Some(report))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
