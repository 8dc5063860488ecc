use clap::Parser;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tree_id::analyzer::{AnalysisClient, GeminiClient, Offline};
use tree_id::cli::{Cli, Commands};
use tree_id::config::Config;
use tree_id::error::{Result, TreeIdError};
use tree_id::render::{render_blocks, render_page};
use tree_id::session::Session;
use tree_id_common::{format_report, AnalysisReport};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Identify { photo, mime, format, model } => {
            let mut config = config;
            if let Some(model) = model {
                config.model = model;
            }

            if !photo.exists() {
                return Err(TreeIdError::FileNotFound(photo.display().to_string()));
            }

            let client = GeminiClient::from_config(&config)?;
            eprintln!("🌳 tree-id - {} ({})\n", photo.display(), client.model());

            let mut session = Session::new(client, config.default_image.clone());
            let progress = spinner("Identifying tree...");
            session.select_file(&photo, mime.as_deref()).await;
            progress.finish_and_clear();

            // 対話端末なら再識別を選べる
            while std::io::stdin().is_terminal() && session.state().can_reidentify() {
                println!("{}", render_page(session.state(), &session.blocks(), format)?);
                let again = Confirm::new()
                    .with_prompt("Re-identify this photo?")
                    .default(false)
                    .interact()
                    .map_err(|e| TreeIdError::Prompt(e.to_string()))?;
                if !again {
                    return Ok(exit_code(&session));
                }
                let progress = spinner("Identifying tree...");
                session.reidentify().await;
                progress.finish_and_clear();
            }

            println!("{}", render_page(session.state(), &session.blocks(), format)?);
            Ok(exit_code(&session))
        }

        Commands::Sample { format } => {
            let mut session = Session::new(Offline, config.default_image.clone());
            session.mount().await;
            println!("{}", render_page(session.state(), &session.blocks(), format)?);
            Ok(exit_code(&session))
        }

        Commands::Format { input, format } => {
            if !input.exists() {
                return Err(TreeIdError::FileNotFound(input.display().to_string()));
            }
            let content = std::fs::read_to_string(&input)?;
            let blocks = format_report(&AnalysisReport::new(content));
            println!("{}", render_blocks(&blocks, format)?);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  デフォルト画像: {}", config.default_image.display());
                println!("  APIキー: {}", config.masked_api_key());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn exit_code<C: AnalysisClient>(session: &Session<C>) -> ExitCode {
    if session.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
