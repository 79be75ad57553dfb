//! # 点分属性路径
//!
//! 校验和赋值形如 `outline.color` / `layer` 的属性路径。
//!
//! ## 规则
//!
//! - 单段路径：段名必须是当前节点的属性。根节点的属性探测
//!   包含嵌套变体名本身（`text:` 在分类阶段是合法键）。
//! - 多段路径：首段必须命名注册表中的变体（保留名 `style`
//!   指向根聚合，等价于去掉该前缀），其余部分在变体的属性
//!   集合内递归校验。首段无法解析时返回
//!   [`StyleError::InvalidAttributePath`]，携带当前样式名与完整路径。
//! - 变体内部不再嵌套：变体节点下出现多段剩余路径同样是路径错误。

use crate::error::{StyleError, StyleResult};
use crate::style::{AttrValue, FieldKind, Style, schema};

/// 路径当前所指的 schema 节点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaNode {
    /// 根聚合
    Root,
    /// 嵌套变体
    Field(FieldKind),
}

impl SchemaNode {
    fn name(self) -> &'static str {
        match self {
            SchemaNode::Root => schema::ROOT_NAME,
            SchemaNode::Field(kind) => kind.name(),
        }
    }

    fn has_attribute(self, name: &str) -> bool {
        match self {
            SchemaNode::Root => schema::is_root_attribute(name),
            SchemaNode::Field(kind) => kind.attributes().contains(&name),
        }
    }
}

/// 注册表查询：段名 → schema 节点
fn node_by_name(name: &str) -> Option<SchemaNode> {
    if name == schema::ROOT_NAME {
        return Some(SchemaNode::Root);
    }
    FieldKind::from_name(name).map(SchemaNode::Field)
}

/// 校验属性路径是否 schema 合法
///
/// 返回 `Ok(false)` 表示单段路径不是已知属性（行会被当作普通内容）；
/// 返回 `Err` 表示多段路径的首段无法解析（整个草稿解析失败）。
pub fn is_valid_path(path: &str) -> StyleResult<bool> {
    valid_for(SchemaNode::Root, path, path)
}

fn valid_for(node: SchemaNode, full: &str, rest: &str) -> StyleResult<bool> {
    match rest.split_once('.') {
        None => Ok(node.has_attribute(rest)),
        Some((head, tail)) => match node {
            SchemaNode::Root => match node_by_name(head) {
                Some(next) => valid_for(next, full, tail),
                None => Err(StyleError::InvalidAttributePath {
                    style: node.name().to_string(),
                    path: full.to_string(),
                }),
            },
            // 变体是扁平的，内部不允许继续嵌套
            SchemaNode::Field(_) => Err(StyleError::InvalidAttributePath {
                style: node.name().to_string(),
                path: full.to_string(),
            }),
        },
    }
}

/// 沿属性路径写入原始字符串值
///
/// 多段路径首次触及某个变体时按需创建其实例，
/// 每个被触及的变体至多分配一次。
/// 值保持为原始字符串，类型转换推迟到校正阶段。
pub fn assign(style: &mut Style, path: &str, raw: &str) -> StyleResult<()> {
    assign_into(style, SchemaNode::Root, path, path, raw)
}

fn assign_into(
    style: &mut Style,
    node: SchemaNode,
    full: &str,
    rest: &str,
    raw: &str,
) -> StyleResult<()> {
    match rest.split_once('.') {
        None => assign_attribute(style, node, full, rest, raw),
        Some((head, tail)) => match node {
            SchemaNode::Root => match node_by_name(head) {
                // `style.` 前缀回到根聚合自身
                Some(SchemaNode::Root) => {
                    assign_into(style, SchemaNode::Root, full, tail, raw)
                }
                Some(next @ SchemaNode::Field(_)) => assign_into(style, next, full, tail, raw),
                None => Err(StyleError::InvalidAttributePath {
                    style: node.name().to_string(),
                    path: full.to_string(),
                }),
            },
            SchemaNode::Field(_) => Err(StyleError::InvalidAttributePath {
                style: node.name().to_string(),
                path: full.to_string(),
            }),
        },
    }
}

fn assign_attribute(
    style: &mut Style,
    node: SchemaNode,
    full: &str,
    attr: &str,
    raw: &str,
) -> StyleResult<()> {
    match node {
        SchemaNode::Root => {
            // 变体名在分类阶段算根属性，但不能整体赋值
            if node_by_name(attr).is_some() {
                return Err(StyleError::InvalidStyleValue {
                    attribute: attr.to_string(),
                    value: raw.to_string(),
                    message: "嵌套样式不能整体赋值，请使用 '变体.属性' 形式".to_string(),
                });
            }
            if !schema::ROOT_ATTRIBUTES.contains(&attr) {
                return Err(StyleError::InvalidAttributePath {
                    style: node.name().to_string(),
                    path: full.to_string(),
                });
            }
            style
                .attrs
                .insert(attr.to_string(), AttrValue::Raw(raw.to_string()));
        }
        SchemaNode::Field(kind) => {
            if !kind.attributes().contains(&attr) {
                return Err(StyleError::InvalidAttributePath {
                    style: node.name().to_string(),
                    path: full.to_string(),
                });
            }
            style
                .fields
                .entry(kind)
                .or_default()
                .insert(attr.to_string(), AttrValue::Raw(raw.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_path_single_segment() {
        assert_eq!(is_valid_path("layer"), Ok(true));
        assert_eq!(is_valid_path("style_id"), Ok(true));
        // 变体名本身也算根属性
        assert_eq!(is_valid_path("text"), Ok(true));
        // 未知单段名不是错误，只是"不是样式键"
        assert_eq!(is_valid_path("hello"), Ok(false));
        assert_eq!(is_valid_path("content"), Ok(false));
    }

    #[test]
    fn test_is_valid_path_nested() {
        assert_eq!(is_valid_path("outline.color"), Ok(true));
        assert_eq!(is_valid_path("box.align_h"), Ok(true));
        assert_eq!(is_valid_path("outline_1.blur"), Ok(true));
        // 变体存在但属性不存在：不是样式键
        assert_eq!(is_valid_path("outline.font"), Ok(false));
    }

    #[test]
    fn test_is_valid_path_style_prefix() {
        // 注册表包含根聚合自身的保留名
        assert_eq!(is_valid_path("style.text.size"), Ok(true));
        assert_eq!(is_valid_path("style.layer"), Ok(true));
    }

    #[test]
    fn test_is_valid_path_unknown_head_is_error() {
        let err = is_valid_path("shadow.color").unwrap_err();
        assert_eq!(
            err,
            StyleError::InvalidAttributePath {
                style: "style".to_string(),
                path: "shadow.color".to_string(),
            }
        );
    }

    #[test]
    fn test_is_valid_path_no_nesting_inside_field() {
        let err = is_valid_path("outline.color.x").unwrap_err();
        assert_eq!(
            err,
            StyleError::InvalidAttributePath {
                style: "outline".to_string(),
                path: "outline.color.x".to_string(),
            }
        );
    }

    #[test]
    fn test_assign_creates_field_on_demand() {
        let mut style = Style::new();
        assert!(style.fields.is_empty());

        assign(&mut style, "outline.color", "red").unwrap();
        assert_eq!(style.fields.len(), 1);
        assert_eq!(
            style.get(Some(FieldKind::Outline), "color"),
            Some(&AttrValue::Raw("red".into()))
        );

        // 同一变体的第二次赋值复用已有实例
        assign(&mut style, "outline.size", "8").unwrap();
        assert_eq!(style.fields.len(), 1);
    }

    #[test]
    fn test_assign_root_attribute() {
        let mut style = Style::new();
        assign(&mut style, "layer", "3").unwrap();
        assert_eq!(style.get(None, "layer"), Some(&AttrValue::Raw("3".into())));
    }

    #[test]
    fn test_assign_style_prefix_targets_root() {
        let mut style = Style::new();
        assign(&mut style, "style.text.size", "40").unwrap();
        assert_eq!(
            style.get(Some(FieldKind::Text), "size"),
            Some(&AttrValue::Raw("40".into()))
        );
    }

    #[test]
    fn test_assign_last_value_wins() {
        let mut style = Style::new();
        assign(&mut style, "text.size", "40").unwrap();
        assign(&mut style, "text.size", "56").unwrap();
        assert_eq!(
            style.get(Some(FieldKind::Text), "size"),
            Some(&AttrValue::Raw("56".into()))
        );
    }

    #[test]
    fn test_assign_bare_field_name_is_rejected() {
        let mut style = Style::new();
        let err = assign(&mut style, "outline", "red").unwrap_err();
        assert!(matches!(err, StyleError::InvalidStyleValue { .. }));
    }

    #[test]
    fn test_assign_unknown_path_is_error() {
        let mut style = Style::new();
        assert!(assign(&mut style, "shadow.color", "red").is_err());
        assert!(assign(&mut style, "outline.font", "x").is_err());
        assert!(assign(&mut style, "unknown", "x").is_err());
    }
}
