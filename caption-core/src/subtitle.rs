//! # Subtitle 模块
//!
//! 定义解析输出的数据模型：字幕与字幕组。
//!
//! 所有类型随草稿解析临时构造，解析之间不保留任何状态；
//! 宿主层把它们序列化为 JSON 清单交给渲染管线。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::style::Style;

/// 单条字幕
///
/// 内容行的有序序列加上一个独占的样式。
/// 样式在分段阶段原地修改，合并与校正完成后不再变动。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    /// 内容行（空行只保留在内容中间，不作为首尾填充）
    pub content: Vec<String>,
    /// 字幕样式
    pub style: Style,
}

impl Subtitle {
    /// 创建空字幕（无内容、空样式）
    pub fn new() -> Self {
        Self::default()
    }

    /// 用给定样式创建无内容字幕
    pub fn with_style(style: Style) -> Self {
        Self {
            content: Vec::new(),
            style,
        }
    }
}

/// 字幕组
///
/// 共享同一渲染目标的字幕序列，附带路径元信息。
/// 每个 (image id, sep 分段) 对应一个字幕组。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleGroup {
    /// 所属草稿标识
    pub draft_id: String,
    /// 图片标识（草稿中 `image_id:` 后的文件名）
    pub image_id: String,
    /// 输入图片完整路径
    pub input_image_path: PathBuf,
    /// 输出图片完整路径
    pub output_image_path: PathBuf,
    /// 字幕序列
    pub subtitles: Vec<Subtitle>,
}

impl SubtitleGroup {
    /// 创建字幕组（路径信息待补全）
    pub fn new(subtitles: Vec<Subtitle>) -> Self {
        Self {
            subtitles,
            ..Self::default()
        }
    }

    /// 补全路径信息
    ///
    /// 输入路径为 `image_dir/image_id`；
    /// 输出文件名为 `{prefix}{主干}{suffix}.{扩展名}`，
    /// 其中 suffix 用于区分同一图片的多个 `sep:` 分段（`_0`、`_1`…）。
    pub fn complete_path_info(
        &mut self,
        draft_id: &str,
        image_id: &str,
        image_dir: &Path,
        output_dir: &Path,
        prefix: Option<&str>,
        suffix: Option<&str>,
    ) {
        self.draft_id = draft_id.to_string();
        self.image_id = image_id.to_string();
        self.input_image_path = image_dir.join(image_id);

        let (stem, extension) = match image_id.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (image_id, None),
        };

        let mut file_name = String::new();
        file_name.push_str(prefix.unwrap_or(""));
        file_name.push_str(stem);
        file_name.push_str(suffix.unwrap_or(""));
        if let Some(ext) = extension {
            file_name.push('.');
            file_name.push_str(ext);
        }
        self.output_image_path = output_dir.join(file_name);
    }
}
