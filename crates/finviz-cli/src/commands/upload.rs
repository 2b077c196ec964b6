//! `upload-note`: 마크다운 파일을 노트 보관소에 업로드.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use finviz_core::load_dotenv;
use finviz_notes::{default_note_path, NoteConfig, NoteError, NoteUploader, UploadReceipt};
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Parser, Debug)]
#[command(name = "upload-note")]
#[command(about = "上傳報告到 Fast Note Sync", long_about = None)]
#[command(version)]
pub struct UploadArgs {
    /// 업로드할 마크다운 파일
    pub file: Option<PathBuf>,

    /// stdin에서 내용 읽기 (--path 필수)
    #[arg(long)]
    pub stdin: bool,

    /// vault 내 노트 경로 (기본: finviz-stock/<파일명>)
    #[arg(short, long)]
    pub path: Option<String>,

    /// vault 이름 덮어쓰기 (기본: FAST_NOTE_VAULT)
    #[arg(short, long)]
    pub vault: Option<String>,

    /// 로그 레벨 (RUST_LOG가 우선)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// 업로드 대상
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteTarget {
    /// stdin 내용을 지정 경로로
    Stdin { path: String },
    /// 파일 내용을 지정 경로(또는 기본 경로)로
    File { file: PathBuf, path: String },
    /// `--stdin`인데 `--path`가 없음
    MissingPath,
    /// 파일도 stdin도 없음
    Nothing,
}

impl UploadArgs {
    /// 입력 소스와 노트 경로 결정. `--stdin`이 파일보다 우선합니다.
    pub fn target(&self) -> NoteTarget {
        if self.stdin {
            return match &self.path {
                Some(path) => NoteTarget::Stdin { path: path.clone() },
                None => NoteTarget::MissingPath,
            };
        }
        match &self.file {
            Some(file) => NoteTarget::File {
                file: file.clone(),
                path: self
                    .path
                    .clone()
                    .unwrap_or_else(|| default_note_path(file)),
            },
            None => NoteTarget::Nothing,
        }
    }
}

/// `upload-note` 실행
pub async fn run(args: UploadArgs) -> anyhow::Result<ExitCode> {
    load_dotenv();

    let config = match NoteConfig::from_env() {
        Ok(config) => config.with_vault(args.vault.clone()),
        Err(e) => {
            tracing::debug!(error = %e, "업로드 설정 누락");
            print_missing_config();
            return Ok(ExitCode::FAILURE);
        }
    };

    let (content, note_path) = match args.target() {
        NoteTarget::Stdin { path } => {
            let content = read_note(tokio::io::stdin()).await.context("stdin 읽기 실패")?;
            (content, path)
        }
        NoteTarget::File { file, path } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("파일 읽기 실패: {}", file.display()))?;
            (content, path)
        }
        NoteTarget::MissingPath => {
            eprintln!("錯誤: 使用 --stdin 時必須指定 --path");
            return Ok(ExitCode::FAILURE);
        }
        NoteTarget::Nothing => {
            UploadArgs::command().print_help()?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let uploader = NoteUploader::new(config)?;
    match uploader.upload(&note_path, &content).await {
        Ok(receipt) => {
            print_receipt(&receipt);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_upload_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// 입력 스트림 전체를 UTF-8 문자열로 읽습니다.
async fn read_note<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut content = String::new();
    reader.read_to_string(&mut content).await?;
    Ok(content)
}

/// `FAST_NOTE_URL`/`FAST_NOTE_TOKEN` 누락 안내 (stderr 두 줄)
pub fn print_missing_config() {
    eprintln!("錯誤: 需要設定 FAST_NOTE_URL 和 FAST_NOTE_TOKEN 環境變數");
    eprintln!("請確認已在環境變數或 .env 檔案中設定: FAST_NOTE_URL=... FAST_NOTE_TOKEN=... upload-note <file.md>");
}

/// 업로드 성공 안내 (stderr)
pub fn print_receipt(receipt: &UploadReceipt) {
    eprintln!("✅ 上傳成功: {}", receipt.path);
    eprintln!(
        "   版本: {} | ID: {}",
        receipt.version_display(),
        receipt.id_display()
    );
}

/// 업로드 실패 안내 (stderr)
pub fn print_upload_error(err: &NoteError) {
    eprintln!("{}", upload_error_line(err));
}

fn upload_error_line(err: &NoteError) -> String {
    match err {
        NoteError::Rejected(message) => format!("上傳失敗: {message}"),
        NoteError::Http { status, body } => format!("HTTP {status}: {body}"),
        other => format!("上傳失敗: {other}"),
    }
}
