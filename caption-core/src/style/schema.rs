//! # 样式 Schema
//!
//! 嵌套样式变体的注册表：变体名 → 属性集合 → 属性类型。
//!
//! ## 设计说明
//!
//! 不使用运行时反射。所有查表都是显式的 `match`，在编译期固定：
//!
//! - [`FieldKind::from_name`]：变体名注册表（保留名 `style` 解析为根聚合）
//! - [`FieldKind::attributes`]：每个变体的属性名集合
//! - [`attr_type`]：每个属性的声明类型与取值范围

use serde::{Deserialize, Serialize};

use crate::style::value::AttrType;

/// 嵌套样式变体
///
/// 每个变体是一组扁平的可选属性；变体之间不再嵌套。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// 文字（字体、字号、颜色、透明度）
    Text,
    /// 描边
    Outline,
    /// 第二层描边
    #[serde(rename = "outline_1")]
    Outline1,
    /// 排版盒（对齐、锚点、换行宽度）
    Box,
    /// 叠加素材
    Asset,
    /// 亮度调整
    Brightness,
    /// 高斯模糊
    Gaussian,
    /// 运动效果
    Motion,
    /// 背景图层
    Background,
    /// 遮罩
    Mask,
}

impl FieldKind {
    /// 全部变体（固定顺序）
    pub const ALL: [FieldKind; 10] = [
        FieldKind::Text,
        FieldKind::Outline,
        FieldKind::Outline1,
        FieldKind::Box,
        FieldKind::Asset,
        FieldKind::Brightness,
        FieldKind::Gaussian,
        FieldKind::Motion,
        FieldKind::Background,
        FieldKind::Mask,
    ];

    /// 变体名注册表：DSL 中的字段名 → 变体
    pub fn from_name(name: &str) -> Option<FieldKind> {
        match name {
            "text" => Some(FieldKind::Text),
            "outline" => Some(FieldKind::Outline),
            "outline_1" => Some(FieldKind::Outline1),
            "box" => Some(FieldKind::Box),
            "asset" => Some(FieldKind::Asset),
            "brightness" => Some(FieldKind::Brightness),
            "gaussian" => Some(FieldKind::Gaussian),
            "motion" => Some(FieldKind::Motion),
            "background" => Some(FieldKind::Background),
            "mask" => Some(FieldKind::Mask),
            _ => None,
        }
    }

    /// 变体在 DSL 中的字段名
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Outline => "outline",
            FieldKind::Outline1 => "outline_1",
            FieldKind::Box => "box",
            FieldKind::Asset => "asset",
            FieldKind::Brightness => "brightness",
            FieldKind::Gaussian => "gaussian",
            FieldKind::Motion => "motion",
            FieldKind::Background => "background",
            FieldKind::Mask => "mask",
        }
    }

    /// 变体的属性名集合
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            FieldKind::Text => &["font", "size", "color", "alpha"],
            FieldKind::Outline | FieldKind::Outline1 => &["color", "size", "blur"],
            FieldKind::Box => &["align_h", "align_v", "anchor_x", "anchor_y", "width"],
            FieldKind::Asset => &["path", "scale", "rotate"],
            FieldKind::Brightness | FieldKind::Gaussian => &["value"],
            FieldKind::Motion => &["mode", "amount", "frames"],
            FieldKind::Background => &["path", "scale"],
            FieldKind::Mask => &["path", "invert"],
        }
    }
}

/// 根聚合的标量属性名集合（不含嵌套变体名）
pub const ROOT_ATTRIBUTES: &[&str] = &["style_id", "layer", "opacity"];

/// 根聚合在错误信息中使用的名字（同时是注册表中的保留名）
pub const ROOT_NAME: &str = "style";

/// 根聚合是否持有名为 `name` 的属性
///
/// 嵌套变体名本身也算根聚合的属性，
/// 因此 `text:`、`outline:` 等单段路径在分类阶段是合法的。
pub fn is_root_attribute(name: &str) -> bool {
    ROOT_ATTRIBUTES.contains(&name) || FieldKind::from_name(name).is_some()
}

/// 查询属性的声明类型与取值范围
///
/// `kind` 为 `None` 表示根聚合的标量属性。
/// 返回 `None` 表示该属性不在 schema 中。
pub fn attr_type(kind: Option<FieldKind>, attr: &str) -> Option<AttrType> {
    use AttrType::{Bool, Choice, Color, Float, Int, Str};

    match kind {
        None => match attr {
            "style_id" => Some(Str),
            "layer" => Some(Int {
                min: -100,
                max: 100,
            }),
            "opacity" => Some(Float { min: 0.0, max: 1.0 }),
            _ => None,
        },
        Some(FieldKind::Text) => match attr {
            "font" => Some(Str),
            "size" => Some(Float {
                min: 1.0,
                max: 1000.0,
            }),
            "color" => Some(Color),
            "alpha" => Some(Float { min: 0.0, max: 1.0 }),
            _ => None,
        },
        Some(FieldKind::Outline | FieldKind::Outline1) => match attr {
            "color" => Some(Color),
            "size" => Some(Float {
                min: 0.0,
                max: 100.0,
            }),
            "blur" => Some(Int { min: 0, max: 100 }),
            _ => None,
        },
        Some(FieldKind::Box) => match attr {
            "align_h" => Some(Choice(&["left", "center", "right"])),
            "align_v" => Some(Choice(&["top", "center", "bottom"])),
            "anchor_x" | "anchor_y" => Some(Int {
                min: -4096,
                max: 4096,
            }),
            "width" => Some(Int { min: 1, max: 4096 }),
            _ => None,
        },
        Some(FieldKind::Asset) => match attr {
            "path" => Some(Str),
            "scale" => Some(Float {
                min: 0.01,
                max: 100.0,
            }),
            "rotate" => Some(Float {
                min: -360.0,
                max: 360.0,
            }),
            _ => None,
        },
        Some(FieldKind::Brightness) => match attr {
            "value" => Some(Float { min: 0.0, max: 2.0 }),
            _ => None,
        },
        Some(FieldKind::Gaussian) => match attr {
            "value" => Some(Int { min: 0, max: 100 }),
            _ => None,
        },
        Some(FieldKind::Motion) => match attr {
            "mode" => Some(Choice(&["none", "wiggle", "slide"])),
            "amount" => Some(Float {
                min: 0.0,
                max: 1000.0,
            }),
            "frames" => Some(Int { min: 1, max: 120 }),
            _ => None,
        },
        Some(FieldKind::Background) => match attr {
            "path" => Some(Str),
            "scale" => Some(Float {
                min: 0.01,
                max: 100.0,
            }),
            _ => None,
        },
        Some(FieldKind::Mask) => match attr {
            "path" => Some(Str),
            "invert" => Some(Bool),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_registry_round_trip() {
        for kind in FieldKind::ALL {
            assert_eq!(FieldKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(FieldKind::from_name("style"), None);
        assert_eq!(FieldKind::from_name("unknown"), None);
    }

    #[test]
    fn test_every_attribute_has_a_type() {
        // 属性集合与类型表必须一一对应
        for kind in FieldKind::ALL {
            for attr in kind.attributes() {
                assert!(
                    attr_type(Some(kind), attr).is_some(),
                    "{}.{} 缺少类型声明",
                    kind.name(),
                    attr
                );
            }
        }
        for attr in ROOT_ATTRIBUTES {
            assert!(attr_type(None, attr).is_some());
        }
    }

    #[test]
    fn test_root_attribute_probe_includes_field_names() {
        assert!(is_root_attribute("layer"));
        assert!(is_root_attribute("style_id"));
        assert!(is_root_attribute("text"));
        assert!(is_root_attribute("outline_1"));
        assert!(!is_root_attribute("style"));
        assert!(!is_root_attribute("font"));
    }

    #[test]
    fn test_unknown_attribute_has_no_type() {
        assert_eq!(attr_type(Some(FieldKind::Text), "weight"), None);
        assert_eq!(attr_type(None, "text"), None);
    }
}
