//! extract 模块的集成测试：覆盖分块、分段、隐藏与路径补全的组合行为。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::style::{AttrValue, FieldKind, Style, path};
use crate::subtitle::SubtitleGroup;

use super::extract_subtitle_groups;

fn run(draft: &str, styles: &HashMap<String, Style>) -> HashMap<String, Vec<SubtitleGroup>> {
    extract_subtitle_groups(
        "draft1",
        draft,
        styles,
        Path::new("images"),
        Path::new("output"),
        None,
    )
    .unwrap()
}

fn no_styles() -> HashMap<String, Style> {
    HashMap::new()
}

#[test]
fn test_empty_draft_yields_empty_table() {
    assert!(run("", &no_styles()).is_empty());
    // 没有 image_id 标记的散文全部丢弃
    assert!(run("just some prose\nwithout any marker", &no_styles()).is_empty());
}

#[test]
fn test_single_image_single_subtitle() {
    let draft = "image_id: scene.png\ncontent: hello";
    let groups = run(draft, &no_styles());

    assert_eq!(groups.len(), 1);
    let image_groups = &groups["scene.png"];
    assert_eq!(image_groups.len(), 1);

    let group = &image_groups[0];
    assert_eq!(group.draft_id, "draft1");
    assert_eq!(group.input_image_path, PathBuf::from("images/scene.png"));
    assert_eq!(group.output_image_path, PathBuf::from("output/scene.png"));
    assert_eq!(group.subtitles.len(), 1);
    assert_eq!(group.subtitles[0].content, vec!["hello"]);
}

#[test]
fn test_marker_only_block_gets_placeholder_group() {
    let draft = "image_id: scene.png";
    let groups = run(draft, &no_styles());

    let group = &groups["scene.png"][0];
    assert_eq!(group.subtitles.len(), 1);
    assert!(group.subtitles[0].content.is_empty());
    // 占位字幕携带校正后的内置默认样式
    assert_eq!(
        group.subtitles[0].style.get(None, "layer"),
        Some(&AttrValue::Int(0))
    );
    assert_eq!(group.output_image_path, PathBuf::from("output/scene.png"));
}

#[test]
fn test_hidden_block_is_skipped() {
    let draft = "\
image_id: a.png
content: visible

image_id: b.png
hide: true
content: invisible";
    let groups = run(draft, &no_styles());

    assert_eq!(groups.len(), 1);
    assert!(groups.contains_key("a.png"));
    assert!(!groups.contains_key("b.png"));
}

#[test]
fn test_sep_segments_get_indexed_suffixes() {
    let draft = "\
image_id: scene.png
content: first part
sep:
content: second part";
    let groups = run(draft, &no_styles());

    let image_groups = &groups["scene.png"];
    assert_eq!(image_groups.len(), 2);
    assert_eq!(
        image_groups[0].output_image_path,
        PathBuf::from("output/scene_0.png")
    );
    assert_eq!(
        image_groups[1].output_image_path,
        PathBuf::from("output/scene_1.png")
    );
    assert_eq!(image_groups[0].subtitles[0].content, vec!["first part"]);
    assert_eq!(image_groups[1].subtitles[0].content, vec!["second part"]);
    // 所有分段共享同一输入图片
    assert_eq!(
        image_groups[0].input_image_path,
        image_groups[1].input_image_path
    );
}

#[test]
fn test_comment_lines_are_stripped() {
    let draft = "\
# 这一行是注释
image_id: scene.png
# content: commented out
content: real";
    let groups = run(draft, &no_styles());

    let group = &groups["scene.png"][0];
    assert_eq!(group.subtitles.len(), 1);
    assert_eq!(group.subtitles[0].content, vec!["real"]);
}

#[test]
fn test_duplicate_image_id_last_block_wins() {
    let draft = "\
image_id: scene.png
content: first

image_id: scene.png
content: second";
    let groups = run(draft, &no_styles());

    assert_eq!(groups.len(), 1);
    assert_eq!(groups["scene.png"][0].subtitles[0].content, vec!["second"]);
}

#[test]
fn test_prefix_applies_to_every_group() {
    let draft = "image_id: scene.png\ncontent: a\nsep:\ncontent: b";
    let groups = extract_subtitle_groups(
        "draft1",
        draft,
        &no_styles(),
        Path::new("images"),
        Path::new("output"),
        Some("ep1_"),
    )
    .unwrap();

    let image_groups = &groups["scene.png"];
    assert_eq!(
        image_groups[0].output_image_path,
        PathBuf::from("output/ep1_scene_0.png")
    );
    assert_eq!(
        image_groups[1].output_image_path,
        PathBuf::from("output/ep1_scene_1.png")
    );
}

#[test]
fn test_style_lines_split_subtitles_after_content() {
    // 内容行之后的样式行开启新字幕，样式只作用于后者
    let draft = "\
image_id: img1.png
content: hello

outline.color: red
content: styled";
    let groups = run(draft, &no_styles());

    let subtitles = &groups["img1.png"][0].subtitles;
    assert_eq!(subtitles.len(), 2);
    assert_eq!(subtitles[0].content, vec!["hello"]);
    assert_eq!(subtitles[1].content, vec!["styled"]);
    assert_eq!(
        subtitles[0].style.get(Some(FieldKind::Outline), "color"),
        Some(&AttrValue::Color([0, 0, 0]))
    );
    assert_eq!(
        subtitles[1].style.get(Some(FieldKind::Outline), "color"),
        Some(&AttrValue::Color([255, 0, 0]))
    );
}

#[test]
fn test_named_styles_flow_through_pipeline() {
    let mut styles = HashMap::new();
    let mut bold = Style::new();
    path::assign(&mut bold, "text.size", "48").unwrap();
    styles.insert("bold".to_string(), bold.clone());
    let mut default = Style::new();
    path::assign(&mut default, "text.color", "yellow").unwrap();
    styles.insert("default".to_string(), default.clone());

    let draft = "image_id: scene.png\nbold: emphasized text";
    let groups = run(draft, &styles);

    let subtitle = &groups["scene.png"][0].subtitles[0];
    assert_eq!(subtitle.content, vec!["emphasized text"]);
    // 别名样式 > 草稿级 default > 内置默认
    assert_eq!(
        subtitle.style.get(Some(FieldKind::Text), "size"),
        Some(&AttrValue::Float(48.0))
    );
    assert_eq!(
        subtitle.style.get(Some(FieldKind::Text), "color"),
        Some(&AttrValue::Color([255, 255, 0]))
    );
    assert_eq!(
        subtitle.style.get(Some(FieldKind::Text), "font"),
        Some(&AttrValue::Raw("sans-serif".into()))
    );

    // 共享样式表在提取后保持原样
    assert_eq!(styles["bold"], bold);
    assert_eq!(styles["default"], default);
}

#[test]
fn test_invalid_style_value_fails_extraction() {
    let draft = "image_id: scene.png\nlayer: duck\ncontent: hi";
    let result = extract_subtitle_groups(
        "draft1",
        draft,
        &no_styles(),
        Path::new("images"),
        Path::new("output"),
        None,
    );
    assert!(result.is_err());
}

#[test]
fn test_multiple_images_in_one_draft() {
    let draft = "\
image_id: a.png
content: alpha

image_id: b.png
outline.size: 8
content: beta";
    let groups = run(draft, &no_styles());

    assert_eq!(groups.len(), 2);
    assert_eq!(groups["a.png"][0].subtitles[0].content, vec!["alpha"]);
    let b = &groups["b.png"][0].subtitles[0];
    assert_eq!(b.content, vec!["beta"]);
    assert_eq!(
        b.style.get(Some(FieldKind::Outline), "size"),
        Some(&AttrValue::Float(8.0))
    );
}
