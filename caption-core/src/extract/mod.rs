//! # Extract 模块
//!
//! 草稿文本 → 字幕组表的完整提取管线：
//!
//! ```text
//! 草稿文本
//!    │ 去注释、按 image_id: 切块
//!    ▼
//! 图片块 ──按 sep: 再切段──▶ 段文本
//!    │                        │ 分段状态机（segment）
//!    ▼                        ▼
//! 字幕组（路径补全）◀──── 字幕序列（样式合并 + 校正）
//! ```
//!
//! - [`classify`]：行分类（内容键 / 样式键）
//! - [`segment`]：分段状态机与字幕提取
//! - [`extract_subtitle_groups`]：顶层入口

pub mod classify;
pub mod segment;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::StyleResult;
use crate::style::Style;
use crate::subtitle::{Subtitle, SubtitleGroup};

/// 从草稿全文提取字幕组表
///
/// 返回 image id → 字幕组列表 的映射。无 `sep:` 的图片块产出
/// 单个无后缀的字幕组；有分段的块按顺序产出 `_0`、`_1`… 后缀的组。
/// 同一 image id 重复出现时后者覆盖前者。
pub fn extract_subtitle_groups(
    draft_id: &str,
    draft_body: &str,
    styles: &HashMap<String, Style>,
    image_dir: &Path,
    output_dir: &Path,
    prefix: Option<&str>,
) -> StyleResult<HashMap<String, Vec<SubtitleGroup>>> {
    let mut content_keys: HashSet<String> = styles.keys().cloned().collect();
    content_keys.insert("content".to_string());

    // 注释行整行剔除，不参与分块
    let body: String = draft_body
        .lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    let mut groups: HashMap<String, Vec<SubtitleGroup>> = HashMap::new();

    // 首个分片是第一个标记之前的散文，丢弃
    for block in body.split("image_id:").skip(1) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        let (image_id, rest) = match block.split_once('\n') {
            Some((first, rest)) => (first.trim(), Some(rest)),
            None => (block, None),
        };
        if image_id.is_empty() {
            continue;
        }

        let Some(rest) = rest else {
            // 只有标记行的块：占位组，让图片原样过管线
            let placeholder =
                Subtitle::with_style(Style::built_in_default().corrected()?);
            let mut group = SubtitleGroup::new(vec![placeholder]);
            group.complete_path_info(
                draft_id, image_id, image_dir, output_dir, prefix, None,
            );
            groups.insert(image_id.to_string(), vec![group]);
            continue;
        };

        if rest.lines().any(|line| line.trim().starts_with("hide:")) {
            continue;
        }

        let segments: Vec<&str> = rest.split("sep:").collect();
        let multi = segments.len() > 1;

        let mut image_groups = Vec::with_capacity(segments.len());
        for (index, segment_text) in segments.into_iter().enumerate() {
            let subtitles =
                segment::extract_subtitles(segment_text, &content_keys, styles)?;
            let mut group = SubtitleGroup::new(subtitles);
            let suffix = multi.then(|| format!("_{index}"));
            group.complete_path_info(
                draft_id,
                image_id,
                image_dir,
                output_dir,
                prefix,
                suffix.as_deref(),
            );
            image_groups.push(group);
        }

        groups.insert(image_id.to_string(), image_groups);
    }

    Ok(groups)
}

#[cfg(test)]
mod tests;
