//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-core`: 运行 caption-core 覆盖率
//! - `draft-check`: 检查草稿文件（静态诊断 + 试提取）

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use walkdir::WalkDir;

use caption_core::{DiagnosticResult, Style, analyze_draft, extract_subtitle_groups};

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    let status = cmd.status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-core" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "caption-core", "--all-features", "--html"]);
            run(
                "cargo llvm-cov -p caption-core --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "draft-check" => {
            let path = args.next();
            let styles = args.next();
            draft_check(path.as_deref(), styles.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all     运行 fmt、clippy、test 门禁检查
  cov-core      运行 caption-core 覆盖率报告
  draft-check   检查草稿文件

DRAFT-CHECK:
  cargo xtask draft-check [path] [styles.json]

  不带参数：检查 drafts/ 下所有 .txt 文件
  带路径参数：检查指定文件或目录
  带样式表参数：用指定命名样式表做检查

  检查内容：
    - 草稿静态诊断（image_id / style_id / 属性路径）
    - 试提取（属性值转换与范围检查）

ALIASES (in .cargo/config.toml):
  cargo check-all   -> cargo xtask check-all
  cargo cov-core    -> cargo xtask cov-core
  cargo draft-check -> cargo xtask draft-check
"#
    );
}

//=============================================================================
// draft-check 命令实现
//=============================================================================

/// 草稿检查配置
struct DraftCheckConfig {
    /// 草稿目录（相对于 workspace root）
    drafts_dir: PathBuf,
    /// 试提取用的图片 / 输出目录（路径补全需要，不触碰文件系统）
    image_dir: PathBuf,
    output_dir: PathBuf,
}

impl Default for DraftCheckConfig {
    fn default() -> Self {
        Self {
            drafts_dir: PathBuf::from("drafts"),
            image_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// 草稿检查结果
struct DraftCheckResult {
    /// 检查的草稿数量
    drafts_checked: usize,
    /// 提取失败数量
    extract_errors: usize,
    /// 诊断结果
    diagnostics: DiagnosticResult,
}

/// 执行草稿检查
fn draft_check(path: Option<&str>, styles_path: Option<&str>) -> anyhow::Result<()> {
    let config = DraftCheckConfig::default();

    let styles: HashMap<String, Style> = match styles_path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .map_err(|e| anyhow::anyhow!("无法读取样式表 {p}: {e}"))?;
            serde_json::from_str(&text)
                .map_err(|e| anyhow::anyhow!("样式表不是合法 JSON {p}: {e}"))?
        }
        None => HashMap::new(),
    };

    // 确定要检查的文件
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_draft_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            if !config.drafts_dir.exists() {
                anyhow::bail!(
                    "默认草稿目录不存在: {}\n请在 workspace 根目录运行，或指定草稿路径",
                    config.drafts_dir.display()
                );
            }
            collect_draft_files(&config.drafts_dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到草稿文件（.txt）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个草稿文件...\n", files.len());

    let mut result = DraftCheckResult {
        drafts_checked: 0,
        extract_errors: 0,
        diagnostics: DiagnosticResult::new(),
    };

    for file in &files {
        check_draft_file(file, &config, &styles, &mut result);
    }

    print_check_result(&result);

    if result.extract_errors > 0 || result.diagnostics.has_errors() {
        anyhow::bail!("草稿检查发现错误");
    }

    Ok(())
}

/// 收集目录下的所有草稿文件
fn collect_draft_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    files
}

/// 检查单个草稿文件
fn check_draft_file(
    file: &Path,
    config: &DraftCheckConfig,
    styles: &HashMap<String, Style>,
    result: &mut DraftCheckResult,
) {
    let draft_id = file.display().to_string();
    result.drafts_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}: 无法读取文件 - {}", draft_id, e);
            result.extract_errors += 1;
            return;
        }
    };

    // 静态诊断
    let diag = analyze_draft(&draft_id, &content, styles);
    result.diagnostics.merge(diag);

    // 试提取：诊断覆盖不到的值校正问题在这里暴露
    if let Err(e) = extract_subtitle_groups(
        &draft_id,
        &content,
        styles,
        &config.image_dir,
        &config.output_dir,
        None,
    ) {
        eprintln!("[ERROR] {}: {}", draft_id, e);
        result.extract_errors += 1;
    }
}

/// 输出检查结果
fn print_check_result(result: &DraftCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个草稿", result.drafts_checked);
    eprintln!();

    for diag in &result.diagnostics.diagnostics {
        eprintln!("{}", diag);
    }

    let error_count = result.extract_errors + result.diagnostics.error_count();
    let warn_count = result.diagnostics.warn_count();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
