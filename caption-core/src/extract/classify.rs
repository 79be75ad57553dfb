//! # 行分类器
//!
//! 判断草稿行属于内容键、样式键还是普通文本。
//!
//! 状态机对两者的检查顺序是：样式键优先于内容键
//! （样式键在语法上更具体），见 [`segment`](super::segment)。

use std::collections::HashSet;

use crate::error::StyleResult;
use crate::style::path;

/// 行是否以某个内容键开头（`<key>:`）
///
/// 内容键集合 = 字面键 `content` ∪ 全部命名样式名，
/// 因此裸别名行（如 `bold:`）既触发内容环境又应用样式别名。
pub fn has_content_key(line: &str, content_keys: &HashSet<String>) -> bool {
    content_keys
        .iter()
        .any(|key| line.strip_prefix(key.as_str()).is_some_and(|rest| rest.starts_with(':')))
}

/// 行是否是样式键（`<点分路径>:<值>`）
///
/// 只要求路径 schema 合法，不要求属性已在实例上存在。
/// 多段路径首段无法解析时错误向上传播，使整个草稿解析失败。
pub fn has_style_key(line: &str) -> StyleResult<bool> {
    match line.split_once(':') {
        Some((key, _)) => path::is_valid_path(key),
        None => Ok(false),
    }
}
