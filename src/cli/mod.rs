//! CLI 모듈
//!
//! faqbot CLI 명령어 정의 및 구현

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::dataset::default_dataset_dir;
use crate::embedding::has_api_key;
use crate::session::Session;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "faqbot")]
#[command(version, about = "오프라인 FAQ 챗봇 (퍼지/키워드/시맨틱 3단 폴백)", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 질문 하나를 던지고 답변 출력
    Ask {
        /// 질문
        query: String,

        /// 데이터셋 디렉터리 (기본: ~/.faqbot/dataset)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// JSON 형식으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 대화형 세션 (exit/quit 입력 시 종료)
    Chat {
        /// 데이터셋 디렉터리
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// 로드된 FAQ 목록
    List {
        /// 카테고리 필터
        #[arg(short, long)]
        category: Option<String>,

        /// 데이터셋 디렉터리
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// 상태 확인
    Status {
        /// 데이터셋 디렉터리
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ask { query, data, json } => cmd_ask(&query, data, json).await,
        Commands::Chat { data } => cmd_chat(data).await,
        Commands::List { category, data } => cmd_list(category, data).await,
        Commands::Status { data } => cmd_status(data).await,
    }
}

/// 세션 로드 (실패 시 빈 세션으로 강등)
///
/// 데이터셋이 없거나 깨져 있어도 챗봇은 계속 동작해야 하므로 로드
/// 실패는 오류가 아니라 경고입니다.
async fn load_session(data: Option<PathBuf>) -> (Session, PathBuf) {
    let dir = data.unwrap_or_else(default_dataset_dir);

    match Session::load(&dir).await {
        Ok(session) => (session, dir),
        Err(e) => {
            warn!("Session load failed: {:#}", e);
            println!("[!] 데이터셋 로드 실패: {:#}", e);
            println!("    빈 세션으로 계속합니다. 모든 질의는 미해결 처리됩니다.");
            (Session::empty(), dir)
        }
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 단일 질의 명령어 (ask)
async fn cmd_ask(query: &str, data: Option<PathBuf>, json: bool) -> Result<()> {
    let (session, _) = load_session(data).await;
    let answer = session.ask(query).await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&answer).context("답변 직렬화 실패")?
        );
        return Ok(());
    }

    println!("{}", answer.answer);
    if let Some(ref info) = answer.additional_info {
        println!();
        println!("추가 정보: {}", info);
    }
    if let (Some(tier), Some(score)) = (answer.tier, answer.score) {
        println!();
        println!("[OK] 매칭 단계: {} (점수 {:.2})", tier, score);
    }

    Ok(())
}

/// 대화형 세션 명령어 (chat)
async fn cmd_chat(data: Option<PathBuf>) -> Result<()> {
    let (session, _) = load_session(data).await;

    println!("Welcome! How can I assist you today?");
    println!("(exit 또는 quit 입력 시 종료)");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush().context("stdout flush 실패")?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("stdin 읽기 실패")?;
        if bytes == 0 {
            // EOF
            break;
        }

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }

        let answer = session.ask(query).await;
        println!("{}", answer.answer);
        if let Some(ref info) = answer.additional_info {
            println!("({})", info);
        }
        println!();
    }

    println!("[OK] 세션을 종료합니다.");
    Ok(())
}

/// FAQ 목록 명령어 (list)
async fn cmd_list(category: Option<String>, data: Option<PathBuf>) -> Result<()> {
    let (session, dir) = load_session(data).await;
    let catalog = session.catalog();

    let records: Vec<_> = catalog
        .records()
        .iter()
        .filter(|r| category.as_ref().map_or(true, |c| &r.category == c))
        .collect();

    if records.is_empty() {
        println!("[!] 표시할 FAQ가 없습니다. ({})", dir.display());
        return Ok(());
    }

    println!("[OK] FAQ {} 건:\n", records.len());
    for (i, record) in records.iter().enumerate() {
        println!("{}. [{}] {}", i + 1, record.category, record.question);
        println!("   답변: {}", truncate_text(&record.answer, 120));
    }

    Ok(())
}

/// 상태 확인 명령어 (status)
async fn cmd_status(data: Option<PathBuf>) -> Result<()> {
    let (session, dir) = load_session(data).await;
    let stats = session.stats();

    println!("[*] faqbot 상태");
    println!("    데이터셋: {}", dir.display());
    println!("    FAQ 레코드: {} 건", stats.records);

    if !stats.categories.is_empty() {
        println!("    카테고리:");
        for (name, count) in &stats.categories {
            println!("      - {}: {} 건", name, count);
        }
    }

    println!("    TF-IDF 어휘: {} 개", stats.vocabulary_size);
    match stats.embedding_dimension {
        Some(dim) => println!(
            "    임베딩: {} ({} 차원)",
            stats.embedding_provider, dim
        ),
        None => println!("    임베딩: 인덱스 없음"),
    }
    println!(
        "    Gemini API 키: {}",
        if has_api_key() { "설정됨" } else { "없음 (해시 임베딩 사용)" }
    );

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 텍스트를 지정 길이로 자르기 (문자 단위)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let flattened = text.replace(['\n', '\r'], " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let truncated: String = flattened.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_text("short", 120), "short");
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "a".repeat(200);
        let result = truncate_text(&long, 120);
        assert_eq!(result.chars().count(), 123);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_flattens_newlines() {
        assert_eq!(truncate_text("line1\nline2", 120), "line1 line2");
    }
}
