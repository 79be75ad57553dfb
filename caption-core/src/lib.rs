//! # Caption Core
//!
//! 字幕草稿 DSL 的核心解析库。
//!
//! ## 架构概述
//!
//! `caption-core` 是纯逻辑核心，不依赖任何 IO 或渲染引擎。
//! 宿主层（Host）读取草稿文件与命名样式表，调用提取入口，
//! 再把结果序列化为 JSON 清单交给渲染管线：
//!
//! ```text
//! Host                               Core
//!   │                                  │
//!   │── 草稿文本 + 命名样式表 ───────►│
//!   │                                  │ extract_subtitle_groups()
//!   │◄── image id → Vec<SubtitleGroup> ──│
//!   │                                  │
//! ```
//!
//! ## 核心类型
//!
//! - [`Style`]：根样式聚合（嵌套变体 + 根级属性）
//! - [`Subtitle`] / [`SubtitleGroup`]：解析输出的数据模型
//! - [`StyleError`]：解析与校正错误
//! - [`DiagnosticResult`]：草稿静态检查结果
//!
//! ## 使用示例
//!
//! ```ignore
//! use std::collections::HashMap;
//! use std::path::Path;
//! use caption_core::extract_subtitle_groups;
//!
//! let styles: HashMap<String, Style> = serde_json::from_str(styles_json)?;
//! let groups = extract_subtitle_groups(
//!     "episode1",
//!     &draft_text,
//!     &styles,
//!     Path::new("images"),
//!     Path::new("output"),
//!     None,
//! )?;
//!
//! for (image_id, image_groups) in &groups {
//!     for group in image_groups {
//!         render(group)?;
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`style`]：样式模型（schema 注册表、属性值、点分路径）
//! - [`subtitle`]：字幕与字幕组定义
//! - [`extract`]：分块、分段状态机与提取入口
//! - [`diagnostic`]：草稿静态检查
//! - [`error`]：错误类型定义

pub mod diagnostic;
pub mod error;
pub mod extract;
pub mod style;
pub mod subtitle;

// 重导出核心类型
pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticResult, analyze_draft};
pub use error::{StyleError, StyleResult};
pub use extract::extract_subtitle_groups;
pub use style::{AttrType, AttrValue, FieldKind, Style};
pub use subtitle::{Subtitle, SubtitleGroup};
