//! # 诊断模块
//!
//! 提供草稿静态检查和诊断 API，不依赖 IO。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 复用 style/path 的校验逻辑，不重复实现
//!
//! 诊断不会中断提取：提取管线遇到非法值才失败，
//! 这里把提取前就能静态发现的问题集中报告出来。

use std::collections::{HashMap, HashSet};

use crate::style::{Style, path};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 草稿 ID / 文件路径
    pub draft_id: String,
    /// 行号（如果可定位，从 1 开始）
    pub line: Option<usize>,
    /// 诊断消息
    pub message: String,
    /// 诊断详情（可选，如原始行内容）
    pub detail: Option<String>,
}

impl Diagnostic {
    /// 创建错误诊断
    pub fn error(draft_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            draft_id: draft_id.into(),
            line: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建警告诊断
    pub fn warn(draft_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warn,
            draft_id: draft_id.into(),
            line: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建信息诊断
    pub fn info(draft_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            draft_id: draft_id.into(),
            line: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 设置行号
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// 设置详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.draft_id)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  | {}", detail)?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
            .count()
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warn)
            .count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

//=============================================================================
// 草稿分析 API
//=============================================================================

/// 分析草稿，返回诊断结果
///
/// 执行以下检查：
/// - 草稿中没有任何 `image_id:` 标记（Info）
/// - `image_id:` 标记后没有文件名（Warn）
/// - 重复的 image id，后者会覆盖前者（Warn）
/// - `hide:` 标记导致整块被跳过（Info）
/// - `style_id:` 引用了未注册的命名样式（Warn）
/// - 点分键不是已知属性路径（Warn），或首段无法解析（Error）
pub fn analyze_draft(
    draft_id: &str,
    draft_body: &str,
    styles: &HashMap<String, Style>,
) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    let mut seen_images: HashSet<&str> = HashSet::new();
    let mut has_marker = false;

    for (index, raw_line) in draft_body.lines().enumerate() {
        let line_no = index + 1;
        if raw_line.starts_with('#') {
            continue;
        }
        let line = raw_line.trim();

        if let Some(image_id) = line.strip_prefix("image_id:") {
            has_marker = true;
            let image_id = image_id.trim();
            if image_id.is_empty() {
                result.push(
                    Diagnostic::warn(draft_id, "image_id 标记后缺少文件名")
                        .with_line(line_no),
                );
            } else if !seen_images.insert(image_id) {
                result.push(
                    Diagnostic::warn(
                        draft_id,
                        format!("重复的 image id: {image_id}，后者将覆盖前者"),
                    )
                    .with_line(line_no),
                );
            }
            continue;
        }

        if line.starts_with("hide:") {
            result.push(
                Diagnostic::info(draft_id, "hide 标记：该图片块会被整体跳过")
                    .with_line(line_no),
            );
            continue;
        }

        if let Some(name) = line.strip_prefix("style_id:") {
            let name = name.trim();
            if !styles.contains_key(name) {
                result.push(
                    Diagnostic::warn(
                        draft_id,
                        format!("style_id 引用了未注册的命名样式: {name}"),
                    )
                    .with_line(line_no)
                    .with_detail(raw_line.to_string()),
                );
            }
            continue;
        }

        // 只有点分键需要静态检查，单段未知键按普通内容处理
        if let Some((key, _)) = line.split_once(':')
            && key.contains('.')
        {
            match path::is_valid_path(key) {
                Ok(true) => {}
                Ok(false) => {
                    result.push(
                        Diagnostic::warn(
                            draft_id,
                            format!("'{key}' 不是已知属性路径，将被当作普通内容"),
                        )
                        .with_line(line_no)
                        .with_detail(raw_line.to_string()),
                    );
                }
                Err(err) => {
                    result.push(
                        Diagnostic::error(
                            draft_id,
                            format!("非法属性路径: {key}"),
                        )
                        .with_line(line_no)
                        .with_detail(err.to_string()),
                    );
                }
            }
        }
    }

    if !has_marker {
        result.push(Diagnostic::info(
            draft_id,
            "草稿中没有任何 image_id 标记，不会产出字幕组",
        ));
    }

    result
}
