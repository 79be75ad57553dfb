//! # 属性值模块
//!
//! 定义属性值的表示与校正（correction）逻辑。
//!
//! ## 生命周期
//!
//! 草稿中赋的值一律先以 [`AttrValue::Raw`] 原样保存；
//! 校正阶段再按 schema 声明的 [`AttrType`] 转换为最终类型并做范围检查。
//! 转换失败或超出范围是可报告的错误，不做静默截断。

use serde::{Deserialize, Serialize};

/// 属性值
///
/// `#[serde(untagged)]` 使 JSON 样式表可以直接书写
/// `true` / `48` / `0.5` / `[255, 0, 0]` / `"red"`，
/// 其中字符串一律反序列化为 `Raw`，交由校正阶段定型。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// RGB 颜色
    Color([u8; 3]),
    /// 未校正的原始字符串（校正后字符串类属性也保持此变体）
    Raw(String),
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Color([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Raw(s) => write!(f, "{s}"),
        }
    }
}

/// 属性的声明类型与取值范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrType {
    /// 任意字符串（仅做 trim）
    Str,
    /// 布尔值（true / false）
    Bool,
    /// 有界整数
    Int { min: i64, max: i64 },
    /// 有界浮点数
    Float { min: f64, max: f64 },
    /// RGB 颜色（颜色名或 #rrggbb）
    Color,
    /// 枚举字符串（大小写不敏感，规范化为小写）
    Choice(&'static [&'static str]),
}

impl AttrType {
    /// 校正单个属性值
    ///
    /// 返回最终类型的值；无法转换或超出范围时返回错误消息。
    pub fn correct(&self, value: &AttrValue) -> Result<AttrValue, String> {
        match self {
            AttrType::Str => match value {
                AttrValue::Raw(s) => Ok(AttrValue::Raw(s.trim().to_string())),
                other => Err(format!("期望字符串，实际 '{other}'")),
            },
            AttrType::Bool => match value {
                AttrValue::Bool(b) => Ok(AttrValue::Bool(*b)),
                AttrValue::Raw(s) => {
                    let s = s.trim();
                    if s.eq_ignore_ascii_case("true") {
                        Ok(AttrValue::Bool(true))
                    } else if s.eq_ignore_ascii_case("false") {
                        Ok(AttrValue::Bool(false))
                    } else {
                        Err("期望布尔值 true / false".to_string())
                    }
                }
                other => Err(format!("期望布尔值，实际 '{other}'")),
            },
            AttrType::Int { min, max } => {
                let n = match value {
                    AttrValue::Int(i) => *i,
                    AttrValue::Float(x) if x.fract() == 0.0 => *x as i64,
                    AttrValue::Raw(s) => s
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| "期望整数".to_string())?,
                    other => return Err(format!("期望整数，实际 '{other}'")),
                };
                if n < *min || n > *max {
                    return Err(format!("超出取值范围 {min}..={max}"));
                }
                Ok(AttrValue::Int(n))
            }
            AttrType::Float { min, max } => {
                let x = match value {
                    AttrValue::Float(x) => *x,
                    AttrValue::Int(i) => *i as f64,
                    AttrValue::Raw(s) => s
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| "期望数字".to_string())?,
                    other => return Err(format!("期望数字，实际 '{other}'")),
                };
                if !x.is_finite() || x < *min || x > *max {
                    return Err(format!("超出取值范围 {min}..={max}"));
                }
                Ok(AttrValue::Float(x))
            }
            AttrType::Color => match value {
                AttrValue::Color(rgb) => Ok(AttrValue::Color(*rgb)),
                AttrValue::Raw(s) => parse_color(s)
                    .map(AttrValue::Color)
                    .ok_or_else(|| "无法识别的颜色（支持颜色名或 #rrggbb）".to_string()),
                other => Err(format!("期望颜色，实际 '{other}'")),
            },
            AttrType::Choice(options) => match value {
                AttrValue::Raw(s) => {
                    let normalized = s.trim().to_ascii_lowercase();
                    if options.contains(&normalized.as_str()) {
                        Ok(AttrValue::Raw(normalized))
                    } else {
                        Err(format!("期望 {} 之一", options.join(" / ")))
                    }
                }
                other => Err(format!("期望 {} 之一，实际 '{other}'", options.join(" / "))),
            },
        }
    }
}

/// 解析颜色字符串
///
/// 支持常用颜色名和 `#rrggbb` 十六进制格式。
pub fn parse_color(s: &str) -> Option<[u8; 3]> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some([r, g, b]);
    }

    match s.to_ascii_lowercase().as_str() {
        "white" => Some([255, 255, 255]),
        "black" => Some([0, 0, 0]),
        "red" => Some([255, 0, 0]),
        "green" => Some([0, 128, 0]),
        "blue" => Some([0, 0, 255]),
        "yellow" => Some([255, 255, 0]),
        "cyan" => Some([0, 255, 255]),
        "magenta" => Some([255, 0, 255]),
        "orange" => Some([255, 165, 0]),
        "purple" => Some([128, 0, 128]),
        "pink" => Some([255, 192, 203]),
        "gray" | "grey" => Some([128, 128, 128]),
        "brown" => Some([165, 42, 42]),
        _ => None,
    }
}
