//! 端末ベルによる通知

use std::io::Write;

use async_trait::async_trait;

use super::{NotificationError, NotificationRequest, Notifier};

/// BEL制御文字
const BEL: &[u8] = b"\x07";

/// 端末ベル
///
/// 標準エラー出力にBELを書き込む。標準出力はカウントダウン表示が使うため使わない。
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn new() -> Self {
        Self
    }

    /// 任意のWriterにベルを書き込む
    pub fn ring<W: Write>(writer: &mut W) -> Result<(), NotificationError> {
        writer.write_all(BEL)?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for TerminalBell {
    fn name(&self) -> &str {
        "bell"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn notify(&self, _request: &NotificationRequest) -> Result<(), NotificationError> {
        Self::ring(&mut std::io::stderr())
    }
}
