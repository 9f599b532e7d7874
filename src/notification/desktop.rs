//! デスクトップ通知
//!
//! macOS: osascript / Linux・BSD: notify-send / Windows: PowerShell のバルーン通知

use async_trait::async_trait;
use tracing::info;

use super::command::{run_command, CommandSpec, Platform, COMMAND_TIMEOUT_SECS};
use super::{NotificationError, NotificationRequest, Notifier};

/// デスクトップ通知
#[derive(Debug)]
pub struct DesktopNotifier {
    platform: Platform,
    timeout_secs: u64,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            timeout_secs: COMMAND_TIMEOUT_SECS,
        }
    }

    /// プラットフォームごとの通知コマンドを組み立てる
    pub fn command(&self, request: &NotificationRequest) -> Option<CommandSpec> {
        match self.platform {
            Platform::MacOs => {
                let mut script = format!(
                    "display notification {} with title {}",
                    applescript_string(&request.body),
                    applescript_string(&request.title)
                );
                if let Some(subtitle) = &request.subtitle {
                    script.push_str(&format!(" subtitle {}", applescript_string(subtitle)));
                }
                Some(CommandSpec::new(
                    "osascript",
                    vec!["-e".to_string(), script],
                ))
            }
            Platform::Unix => Some(CommandSpec::new(
                "notify-send",
                vec![
                    "--app-name=timer".to_string(),
                    "--urgency=critical".to_string(),
                    request.title.clone(),
                    request.full_body(),
                ],
            )),
            Platform::Windows => {
                let script = format!(
                    "Add-Type -AssemblyName System.Windows.Forms; \
                     $n = New-Object System.Windows.Forms.NotifyIcon; \
                     $n.Icon = [System.Drawing.SystemIcons]::Information; \
                     $n.Visible = $true; \
                     $n.ShowBalloonTip(5000, {}, {}, 'Info'); \
                     Start-Sleep -Seconds 1; $n.Dispose()",
                    powershell_string(&request.title),
                    powershell_string(&request.full_body())
                );
                Some(CommandSpec::new(
                    "powershell",
                    vec![
                        "-NoProfile".to_string(),
                        "-NonInteractive".to_string(),
                        "-Command".to_string(),
                        script,
                    ],
                ))
            }
            Platform::Other => None,
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn name(&self) -> &str {
        "desktop"
    }

    fn is_available(&self) -> bool {
        self.platform != Platform::Other
    }

    async fn notify(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        let spec = self.command(request).ok_or_else(|| {
            NotificationError::Unsupported("desktop notification".to_string())
        })?;

        run_command(&spec, self.timeout_secs).await?;
        info!("Desktop notification sent: {}", request.id);
        Ok(())
    }
}

/// AppleScriptの文字列リテラルにする
fn applescript_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// PowerShellの単一引用符文字列リテラルにする
fn powershell_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NotificationRequest {
        NotificationRequest::new("Timer", "Time's up! (5m)")
    }

    #[test]
    fn test_applescript_string_escapes() {
        assert_eq!(applescript_string("plain"), "\"plain\"");
        assert_eq!(applescript_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(applescript_string("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_powershell_string_escapes() {
        assert_eq!(powershell_string("Time's up"), "'Time''s up'");
    }

    #[test]
    fn test_macos_command() {
        let notifier = DesktopNotifier::for_platform(Platform::MacOs);
        let spec = notifier
            .command(&request().with_subtitle("お茶"))
            .unwrap();

        assert_eq!(spec.program, "osascript");
        assert_eq!(spec.args[0], "-e");
        assert_eq!(
            spec.args[1],
            "display notification \"Time's up! (5m)\" with title \"Timer\" subtitle \"お茶\""
        );
    }

    #[test]
    fn test_unix_command() {
        let notifier = DesktopNotifier::for_platform(Platform::Unix);
        let spec = notifier.command(&request()).unwrap();

        assert_eq!(spec.program, "notify-send");
        assert_eq!(spec.args.len(), 4);
        assert_eq!(spec.args[2], "Timer");
        assert_eq!(spec.args[3], "Time's up! (5m)");
    }

    #[test]
    fn test_windows_command() {
        let notifier = DesktopNotifier::for_platform(Platform::Windows);
        let spec = notifier.command(&request()).unwrap();

        assert_eq!(spec.program, "powershell");
        let script = spec.args.last().unwrap();
        assert!(script.contains("'Time''s up! (5m)'"));
        assert!(script.contains("ShowBalloonTip"));
    }

    #[tokio::test]
    async fn test_other_platform_unsupported() {
        let notifier = DesktopNotifier::for_platform(Platform::Other);
        assert!(!notifier.is_available());
        assert!(notifier.command(&request()).is_none());

        let result = notifier.notify(&request()).await;
        assert!(matches!(result, Err(NotificationError::Unsupported(_))));
    }
}
