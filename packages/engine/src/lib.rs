//! # tango-engine - 词汇学习会话状态引擎
//!
//! 本 crate 提供纯 Rust 实现的学习会话状态机:
//!
//! - **QuizEngine** - 四选一测验（受控重复题池 + 固定/抽样误答选项）
//! - **MatchEngine** - 神经衰弱配对游戏（翻开/比对/回滚协议）
//! - **FlashcardEngine** - 单词卡（洗乱游标 + 翻面）
//! - **DeckSelector** - 牌组筛选与确定性会话缓存
//! - **HistoryLedger** - 追加式学习履历与熟练度推导
//!
//! ## 设计理念
//!
//! - **纯状态迁移** - 引擎不做 I/O，时间与随机数由调用方注入
//! - **显式会话值** - [`TrainerSession`] 把全部状态组合成一个值，
//!   由宿主应用层持有
//! - **纪元失效** - 牌组键变化即跨纪元，所有引擎进度一并重置
//! - **充分测试** - 所有状态机都有完整的单元测试
//!
//! ## 模块结构
//!
//! - [`types`] - 公共类型和常量
//! - [`store`] - 词库规整与内置示例数据
//! - [`history`] - 学习履历账本
//! - [`deck`] - 牌组筛选与会话缓存
//! - [`quiz`] - 四选一测验引擎
//! - [`matching`] - 配对游戏引擎
//! - [`flashcard`] - 单词卡引擎
//! - [`session`] - 会话组合
//! - [`error`] - 错误类型

pub mod deck;
pub mod error;
pub mod flashcard;
pub mod history;
pub mod matching;
pub mod quiz;
pub mod session;
pub mod store;
pub mod types;

pub use deck::{DeckKey, DeckSelector, SelectOutcome};
pub use error::{EngineError, EngineResult};
pub use flashcard::FlashcardState;
pub use history::{jst_now, HistoryLedger, LedgerStats};
pub use matching::{CardSide, ClickOutcome, MatchCard, MatchState};
pub use quiz::QuizState;
pub use session::{SessionSettings, TrainerSession};
pub use store::{normalize_rows, sample_items, VocabularyStore};
pub use types::{DeckLimit, HistoryRecord, Mastery, VocabItem};
