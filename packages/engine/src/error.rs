//! 引擎错误类型
//!
//! 所有错误都是用户可见的提示，不会使进程终止；调用方在收到错误时
//! 不得改变任何会话状态。

use thiserror::Error;

/// 会话引擎错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// 四选一测验需要至少 4 条词条
    #[error("词条不足: 四选一测验需要至少 4 条词条，当前只有 {0} 条")]
    InsufficientData(usize),

    /// 配对游戏: 牌组本身不够大
    #[error("词条不足: 配对游戏需要至少 {required} 组词条，当前只有 {available} 组")]
    InsufficientPairs { available: usize, required: usize },

    /// 配对游戏: 未通关的词条不够，提示重置去重历史
    #[error("未通关的词条不足（剩余 {remaining} 组，需要 {required} 组），请重置去重历史")]
    InsufficientUnseenPairs { remaining: usize, required: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;
