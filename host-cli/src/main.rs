//! # 字幕草稿命令行宿主
//!
//! 读取草稿文件与命名样式表，驱动 caption-core 提取字幕组，
//! 并把结果以 JSON 清单输出给渲染管线。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p host-cli -- drafts/episode1.txt
//! cargo run -p host-cli -- drafts/episode1.txt --styles styles.json --manifest out.json
//! cargo run -p host-cli -- drafts/episode1.txt --check
//! cargo run -p host-cli -- drafts/episode1.txt --watch --interval 2
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use caption_core::{DiagnosticLevel, Style, analyze_draft, extract_subtitle_groups};

mod watcher;

use watcher::{DraftWatcher, Watcher};

#[derive(Parser)]
#[command(name = "caption")]
#[command(about = "字幕草稿宿主 - 解析草稿并输出渲染清单")]
#[command(version)]
struct Cli {
    /// 草稿文件路径
    draft: PathBuf,

    /// 命名样式表（JSON 文件，名称 → 样式）
    #[arg(short, long)]
    styles: Option<PathBuf>,

    /// 图片输入目录
    #[arg(long, default_value = "images")]
    image_dir: PathBuf,

    /// 渲染输出目录
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// 输出文件名前缀
    #[arg(short, long)]
    prefix: Option<String>,

    /// 清单输出路径（缺省写到标准输出）
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// 只做静态检查，不提取
    #[arg(long)]
    check: bool,

    /// 监视草稿变更并自动重新提取
    #[arg(short, long)]
    watch: bool,

    /// 监视轮询间隔（秒）
    #[arg(long, default_value = "1")]
    interval: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let styles = load_styles(cli.styles.as_deref())?;

    if cli.check {
        let error_count = run_check(&cli.draft, &styles)?;
        if error_count > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    if cli.watch {
        let mut watcher = DraftWatcher::new(
            cli.draft.clone(),
            Duration::from_secs(cli.interval.max(1)),
            move |draft| run_extraction(draft, &cli),
        );
        return watcher.watch();
    }

    run_extraction(&cli.draft, &cli)
}

/// 加载命名样式表
///
/// 加载后对每个条目做一次试校正，让坏样式表在提取前就报错。
/// 表中保留未校正的原值，校正统一发生在提取收尾阶段。
fn load_styles(path: Option<&Path>) -> Result<HashMap<String, Style>> {
    let Some(path) = path else {
        return Ok(HashMap::new());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("无法读取样式表: {}", path.display()))?;
    let styles: HashMap<String, Style> = serde_json::from_str(&text)
        .with_context(|| format!("样式表不是合法 JSON: {}", path.display()))?;

    for (name, style) in &styles {
        style
            .clone()
            .correct_values()
            .with_context(|| format!("命名样式 '{name}' 无法通过校正"))?;
    }

    info!("已加载 {} 个命名样式", styles.len());
    Ok(styles)
}

/// 静态检查草稿，打印诊断并返回错误数量
fn run_check(draft_path: &Path, styles: &HashMap<String, Style>) -> Result<usize> {
    let (draft_id, body) = read_draft(draft_path)?;
    let result = analyze_draft(&draft_id, &body, styles);

    for diag in result.filter_by_level(DiagnosticLevel::Info) {
        println!("{diag}");
    }
    println!(
        "检查完成: {} 个错误, {} 个警告",
        result.error_count(),
        result.warn_count()
    );
    Ok(result.error_count())
}

/// 完整提取一次并输出清单
fn run_extraction(draft_path: &Path, cli: &Cli) -> Result<()> {
    let (draft_id, body) = read_draft(draft_path)?;

    let styles = load_styles(cli.styles.as_deref())?;
    let groups = extract_subtitle_groups(
        &draft_id,
        &body,
        &styles,
        &cli.image_dir,
        &cli.output_dir,
        cli.prefix.as_deref(),
    )
    .with_context(|| format!("草稿解析失败: {}", draft_path.display()))?;

    let total: usize = groups.values().map(Vec::len).sum();
    info!("草稿 '{draft_id}': {} 张图片, {} 个字幕组", groups.len(), total);

    let manifest = serde_json::to_string_pretty(&groups)?;
    match &cli.manifest {
        Some(path) => {
            fs::write(path, manifest)
                .with_context(|| format!("无法写入清单: {}", path.display()))?;
            info!("清单已写入 {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(manifest.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// 读取草稿文件，返回 (草稿 ID, 正文)
///
/// 草稿 ID 取文件主干名。
fn read_draft(path: &Path) -> Result<(String, String)> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("无法读取草稿: {}", path.display()))?;
    let draft_id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| {
            warn!("草稿路径没有文件名，使用 'draft' 作为 ID");
            "draft".to_string()
        });
    Ok((draft_id, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_load_styles_none_is_empty() {
        assert!(load_styles(None).unwrap().is_empty());
    }

    #[test]
    fn test_load_styles_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "bold": {{ "fields": {{ "text": {{ "size": 48 }} }} }} }}"#
        )
        .unwrap();

        let styles = load_styles(Some(file.path())).unwrap();
        assert_eq!(styles.len(), 1);
        assert!(styles.contains_key("bold"));
    }

    #[test]
    fn test_load_styles_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // text.alpha 超出范围，应在加载阶段报错
        write!(
            file,
            r#"{{ "bad": {{ "fields": {{ "text": {{ "alpha": 2.5 }} }} }} }}"#
        )
        .unwrap();

        assert!(load_styles(Some(file.path())).is_err());
    }

    #[test]
    fn test_read_draft_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode1.txt");
        fs::write(&path, "image_id: a.png\ncontent: hi").unwrap();

        let (draft_id, body) = read_draft(&path).unwrap();
        assert_eq!(draft_id, "episode1");
        assert!(body.contains("content: hi"));
    }
}
