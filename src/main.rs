use matjip::app::{ChatApp, ChatUpdate};
use matjip::config::{ClientConfig, Transport};
use matjip::error::ChatError;

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::prelude::*;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const QUIT_COMMAND: &str = "/quit";

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("matjip {}", VERSION);
        std::process::exit(0);
    }

    color_eyre::install()?;
    init_tracing();

    let mut config = ClientConfig::from_env();
    if std::env::args().any(|arg| arg == "--legacy") {
        config = config.with_transport(Transport::Legacy);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}

/// Logs go to stderr so they never interleave with answers on stdout.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("matjip=info,warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

async fn run(config: ClientConfig) -> Result<()> {
    tracing::info!(
        "Using backend {} ({:?} transport)",
        config.backend_url,
        config.transport
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = ChatApp::new(config).with_updates(tx);

    match app.health_check().await {
        Ok(true) => {}
        Ok(false) => tracing::warn!("Backend health check returned a non-success status"),
        Err(e) => tracing::warn!("Backend is not reachable yet: {}", e),
    }

    let printer = tokio::spawn(print_updates(rx));

    println!("맛집 추천 챗봇입니다. 질문을 입력하세요 ({} 종료).", QUIT_COMMAND);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == QUIT_COMMAND {
            break;
        }
        // Request failures are reported through the update channel; only
        // rejected input comes back here
        if let Err(e @ (ChatError::EmptyQuery | ChatError::Busy)) = app.submit(line).await {
            eprintln!("{}", e.user_message());
        }
    }

    drop(app);
    printer.await?;
    Ok(())
}

/// Print progress as it arrives. Intermediate content is shown as its newest
/// line only, so the trace scrolls instead of repeating.
async fn print_updates(mut rx: mpsc::UnboundedReceiver<ChatUpdate>) {
    let mut last_line = String::new();
    while let Some(update) = rx.recv().await {
        match update {
            ChatUpdate::AssistantContent(content) => {
                let newest = content.rsplit("\n\n").next().unwrap_or_default();
                if newest != last_line {
                    eprintln!("  {}", newest);
                    last_line = newest.to_string();
                }
            }
            ChatUpdate::Completed(content) => {
                println!("\n{}\n", content);
                last_line.clear();
            }
            ChatUpdate::Failed {
                message,
                detail,
                retryable,
            } => {
                eprintln!("{}", message);
                eprintln!("  ({})", detail);
                if !retryable {
                    eprintln!("  같은 질문으로 다시 시도해도 실패할 수 있습니다.");
                }
                last_line.clear();
            }
        }
    }
}
