//! # 分段状态机
//!
//! 将单个图片块的行序列切分为字幕序列。
//!
//! ## 环境与转移
//!
//! 扫描过程维护一个环境（[`Environment`]）：
//!
//! 1. 非样式环境遇到样式键 → 进入样式环境，开启新字幕；
//! 2. 非内容环境遇到内容键 → 进入内容环境，仅当此前不在
//!    样式环境（或这是块首行）时开启新字幕 —— 先写样式行
//!    再写内容行的组合归属同一条字幕；
//! 3. 内容环境中再次遇到内容键 → 保持环境，开启新字幕；
//! 4. 其余情况保持环境，不开新字幕。
//!
//! 内容环境中的每一行都进入当前字幕的内容；
//! 样式环境只消费样式键行，其余行被忽略。

use std::collections::{HashMap, HashSet};

use crate::error::StyleResult;
use crate::extract::classify;
use crate::style::{Style, path};
use crate::subtitle::Subtitle;

/// 扫描环境
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 尚未进入任何字幕
    Neutral,
    /// 正在收集内容行
    Content,
    /// 正在收集样式键行
    Style,
}

/// 一次状态转移的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// 转移后的环境
    pub next: Environment,
    /// 该行是否开启一条新字幕
    pub starts_subtitle: bool,
}

/// 纯转移函数
///
/// 只依赖当前环境与该行的分类结果，便于逐条转移单测。
pub fn step(
    env: Environment,
    is_first_line: bool,
    has_content_key: bool,
    has_style_key: bool,
) -> Step {
    if has_style_key && env != Environment::Style {
        return Step {
            next: Environment::Style,
            starts_subtitle: true,
        };
    }
    if has_content_key && env != Environment::Content {
        return Step {
            next: Environment::Content,
            starts_subtitle: env != Environment::Style || is_first_line,
        };
    }
    if has_content_key && env == Environment::Content {
        return Step {
            next: Environment::Content,
            starts_subtitle: true,
        };
    }
    Step {
        next: env,
        starts_subtitle: false,
    }
}

/// 从图片块文本提取字幕序列
///
/// 每条字幕在收尾时依次合并草稿级 `default` 样式与内置默认样式，
/// 最后统一校正。空行只保留在内容中间，首尾的空行填充被丢弃。
pub fn extract_subtitles(
    block: &str,
    content_keys: &HashSet<String>,
    styles: &HashMap<String, Style>,
) -> StyleResult<Vec<Subtitle>> {
    let mut subtitles: Vec<Subtitle> = Vec::new();
    let mut env = Environment::Neutral;
    // 内容中间的空行先挂起，见到下一行非空内容才落盘
    let mut pending_blanks: usize = 0;

    for (index, line) in block.trim().split('\n').enumerate() {
        let has_content = classify::has_content_key(line, content_keys);
        let has_style = classify::has_style_key(line)?;

        let transition = step(env, index == 0, has_content, has_style);
        env = transition.next;
        if transition.starts_subtitle {
            subtitles.push(Subtitle::new());
            pending_blanks = 0;
        }

        let Some(subtitle) = subtitles.last_mut() else {
            // 中立环境下的前导杂行
            continue;
        };

        match env {
            Environment::Neutral => {}
            Environment::Content => {
                let fragment = if has_content {
                    let (key, rest) = line
                        .split_once(':')
                        .unwrap_or((line, ""));
                    // 命名样式作为内容键使用时顺带合并其样式（别名行）
                    if key != "content"
                        && let Some(named) = styles.get(key)
                    {
                        subtitle.style.coalesce(named);
                    }
                    rest.trim_start()
                } else {
                    line
                };

                if fragment.is_empty() {
                    pending_blanks += 1;
                } else {
                    if subtitle.content.is_empty() {
                        // 内容尚未开始，前导空行直接丢弃
                        pending_blanks = 0;
                    }
                    for _ in 0..pending_blanks {
                        subtitle.content.push(String::new());
                    }
                    pending_blanks = 0;
                    subtitle.content.push(fragment.to_string());
                }
            }
            Environment::Style => {
                if has_style
                    && let Some((key, value)) = line.split_once(':')
                {
                    let value = value.trim();
                    if key == "style_id" {
                        // 引用未注册的命名样式按无操作处理
                        if let Some(named) = styles.get(value) {
                            subtitle.style = named.clone();
                        }
                    } else {
                        path::assign(&mut subtitle.style, key, value)?;
                    }
                }
            }
        }
    }

    for subtitle in &mut subtitles {
        if let Some(default) = styles.get("default") {
            subtitle.style.coalesce(default);
        }
        subtitle.style.coalesce(&Style::built_in_default());
        subtitle.style.correct_values()?;
    }

    Ok(subtitles)
}
