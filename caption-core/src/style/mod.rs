//! # Style 模块
//!
//! 样式数据模型与解析支撑：
//!
//! - [`schema`]：变体注册表与属性类型表
//! - [`value`]：属性值表示与校正
//! - [`path`]：点分属性路径的校验与赋值
//! - [`Style`]：根样式聚合（合并、校正、内置默认值）
//!
//! ## 存在性语义
//!
//! "未设置"用缺失表示（map 中没有条目 / 变体不在 `fields` 中），
//! 不用哨兵值。只有被显式赋值或从其他样式合并过来的变体才会出现，
//! 合并（coalesce）据此做只填空、不覆盖的判断。

pub mod path;
pub mod schema;
pub mod value;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{StyleError, StyleResult};

pub use schema::FieldKind;
pub use value::{AttrType, AttrValue};

/// 单个变体的属性集：属性名 → 值
///
/// 条目存在即"已设置"。
pub type FieldAttrs = BTreeMap<String, AttrValue>;

/// 根样式聚合
///
/// 持有根级标量属性和各嵌套变体的可选实例。
/// 变体只在被实际触碰时才出现在 `fields` 中，
/// 解析器不会为每条字幕急切地创建全部变体。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// 根级标量属性（layer / opacity / style_id）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: FieldAttrs,
    /// 嵌套变体实例
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<FieldKind, FieldAttrs>,
}

impl Style {
    /// 创建空样式（所有属性未设置）
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取属性值（`kind` 为 `None` 表示根级属性）
    pub fn get(&self, kind: Option<FieldKind>, attr: &str) -> Option<&AttrValue> {
        match kind {
            None => self.attrs.get(attr),
            Some(kind) => self.fields.get(&kind)?.get(attr),
        }
    }

    /// 是否没有任何已设置的属性
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.fields.iter().all(|(_, attrs)| attrs.is_empty())
    }

    /// 合并（coalesce）：用 `source` 填补自身的空缺
    ///
    /// 只填充未设置的属性，绝不覆盖已设置的值；
    /// 对两侧任一存在的嵌套变体递归执行同样的逻辑。
    /// 值从 `source` 克隆，调用方的共享样式表不会被改动。
    pub fn coalesce(&mut self, source: &Style) {
        for (name, value) in &source.attrs {
            self.attrs
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        for (kind, source_attrs) in &source.fields {
            let target = self.fields.entry(*kind).or_default();
            for (name, value) in source_attrs {
                target.entry(name.clone()).or_insert_with(|| value.clone());
            }
        }
    }

    /// 校正全部已设置的属性
    ///
    /// 将原始字符串值转换为 schema 声明的最终类型并做范围检查。
    /// 任何无法转换或超出范围的值都会使整个草稿解析失败。
    pub fn correct_values(&mut self) -> StyleResult<()> {
        for (name, value) in &mut self.attrs {
            let spec = schema::attr_type(None, name).ok_or_else(|| {
                StyleError::InvalidAttributePath {
                    style: schema::ROOT_NAME.to_string(),
                    path: name.clone(),
                }
            })?;
            let corrected =
                spec.correct(value)
                    .map_err(|message| StyleError::InvalidStyleValue {
                        attribute: name.clone(),
                        value: value.to_string(),
                        message,
                    })?;
            *value = corrected;
        }

        for (kind, attrs) in &mut self.fields {
            for (name, value) in attrs.iter_mut() {
                let spec = schema::attr_type(Some(*kind), name).ok_or_else(|| {
                    StyleError::InvalidAttributePath {
                        style: kind.name().to_string(),
                        path: format!("{}.{}", kind.name(), name),
                    }
                })?;
                let corrected =
                    spec.correct(value)
                        .map_err(|message| StyleError::InvalidStyleValue {
                            attribute: format!("{}.{}", kind.name(), name),
                            value: value.to_string(),
                            message,
                        })?;
                *value = corrected;
            }
        }

        Ok(())
    }

    /// 消费自身，返回校正后的样式
    pub fn corrected(mut self) -> StyleResult<Style> {
        self.correct_values()?;
        Ok(self)
    }

    /// schema 内置默认样式
    ///
    /// 作为每条字幕的最终回退层，在草稿级 `default` 之后合并。
    /// 值以原始字符串形式给出，统一走校正。
    pub fn built_in_default() -> Style {
        fn raw(s: &str) -> AttrValue {
            AttrValue::Raw(s.to_string())
        }

        let mut style = Style::new();
        style.attrs.insert("layer".to_string(), raw("0"));
        style.attrs.insert("opacity".to_string(), raw("1"));

        let text = style.fields.entry(FieldKind::Text).or_default();
        text.insert("font".to_string(), raw("sans-serif"));
        text.insert("size".to_string(), raw("36"));
        text.insert("color".to_string(), raw("white"));
        text.insert("alpha".to_string(), raw("1"));

        let outline = style.fields.entry(FieldKind::Outline).or_default();
        outline.insert("color".to_string(), raw("black"));
        outline.insert("size".to_string(), raw("4"));
        outline.insert("blur".to_string(), raw("0"));

        let layout = style.fields.entry(FieldKind::Box).or_default();
        layout.insert("align_h".to_string(), raw("center"));
        layout.insert("align_v".to_string(), raw("bottom"));
        layout.insert("anchor_x".to_string(), raw("0"));
        layout.insert("anchor_y".to_string(), raw("-80"));
        layout.insert("width".to_string(), raw("1600"));

        style
    }
}
