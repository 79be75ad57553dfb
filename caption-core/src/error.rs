//! # Error 模块
//!
//! 定义 caption-core 中使用的错误类型。
//!
//! 注意：引用不存在的命名样式（别名或 `style_id:`）不是错误，
//! 按"无操作合并"处理，由诊断层报告。

use thiserror::Error;

/// 样式解析/校正错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    /// 属性路径在样式结构中不存在
    #[error("样式 '{style}' 中不存在属性路径 '{path}'")]
    InvalidAttributePath { style: String, path: String },

    /// 属性值无法转换为目标类型或超出取值范围
    #[error("属性 '{attribute}' 的值 '{value}' 无效 - {message}")]
    InvalidStyleValue {
        attribute: String,
        value: String,
        message: String,
    },
}

/// Result 类型别名
pub type StyleResult<T> = Result<T, StyleError>;
