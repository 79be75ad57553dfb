//! # 监视模块
//!
//! 轮询式文件监视：周期性检查草稿修改时间，变更时重新提取。
//!
//! ## 设计原则
//!
//! - [`Watcher`] 把轮询骨架（setup → 循环检查 → 触发/空转 → 休眠）
//!   与具体触发条件分离，便于单测触发逻辑；
//! - 单次触发的处理失败只记日志，不中断监视循环。

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Result;
use tracing::{info, warn};

/// 轮询监视器骨架
pub trait Watcher {
    /// 进入循环前的一次性准备
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    /// 本轮是否有事件需要处理
    fn is_event_trigger(&mut self) -> Result<bool>;

    /// 处理一次事件
    fn on_trigger(&mut self) -> Result<()>;

    /// 无事件时的空转钩子
    fn on_idle(&mut self) {}

    /// 两轮检查之间的休眠时长
    fn sleep_time(&self) -> Duration;

    /// 监视主循环
    fn watch(&mut self) -> Result<()> {
        self.setup()?;
        info!("开始监视，轮询间隔 {:?}", self.sleep_time());
        loop {
            match self.is_event_trigger() {
                Ok(true) => {
                    if let Err(e) = self.on_trigger() {
                        warn!("处理失败: {e:#}");
                    }
                }
                Ok(false) => self.on_idle(),
                Err(e) => warn!("检查失败: {e:#}"),
            }
            std::thread::sleep(self.sleep_time());
        }
    }
}

/// 基于修改时间的草稿监视器
///
/// 草稿文件暂时不存在（编辑器原子保存的中间态）按无事件处理。
pub struct DraftWatcher<F> {
    draft_path: PathBuf,
    interval: Duration,
    last_modified: Option<SystemTime>,
    action: F,
}

impl<F> DraftWatcher<F>
where
    F: FnMut(&Path) -> Result<()>,
{
    pub fn new(draft_path: PathBuf, interval: Duration, action: F) -> Self {
        Self {
            draft_path,
            interval,
            last_modified: None,
            action,
        }
    }

    fn current_modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.draft_path)
            .and_then(|meta| meta.modified())
            .ok()
    }
}

impl<F> Watcher for DraftWatcher<F>
where
    F: FnMut(&Path) -> Result<()>,
{
    fn setup(&mut self) -> Result<()> {
        // 启动时立即做一次完整提取
        self.last_modified = self.current_modified();
        (self.action)(&self.draft_path)
    }

    fn is_event_trigger(&mut self) -> Result<bool> {
        let Some(modified) = self.current_modified() else {
            return Ok(false);
        };
        if self.last_modified != Some(modified) {
            self.last_modified = Some(modified);
            return Ok(true);
        }
        Ok(false)
    }

    fn on_trigger(&mut self) -> Result<()> {
        info!("草稿已变更: {}", self.draft_path.display());
        (self.action)(&self.draft_path)
    }

    fn sleep_time(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_draft_watcher_triggers_on_mtime_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");
        fs::write(&path, "image_id: a.png").unwrap();

        let mut watcher =
            DraftWatcher::new(path.clone(), Duration::from_millis(10), |_| Ok(()));
        watcher.setup().unwrap();

        // 未变更时不触发
        assert!(!watcher.is_event_trigger().unwrap());

        // 伪造一个更早的记录时间模拟变更
        watcher.last_modified = Some(SystemTime::UNIX_EPOCH);
        assert!(watcher.is_event_trigger().unwrap());
        // 触发后记录被更新，下一轮恢复平静
        assert!(!watcher.is_event_trigger().unwrap());
    }

    #[test]
    fn test_draft_watcher_missing_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");

        let mut watcher =
            DraftWatcher::new(path, Duration::from_millis(10), |_| Ok(()));
        assert!(!watcher.is_event_trigger().unwrap());
    }
}
