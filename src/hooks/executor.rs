use crate::config::TimerConfig;
use crate::hooks::{HookContext, HookDefinition, DEFAULT_HOOK_TIMEOUT_SECS};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// 出力ログの上限（10KB）
const MAX_LOG_SIZE: usize = 10 * 1024;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("script must be an absolute path: {0}")]
    NotAbsolute(PathBuf),

    #[error("script not found: {0}")]
    NotFound(PathBuf),

    #[error("script is not executable: {0}")]
    NotExecutable(PathBuf),

    #[error("failed to start script: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("script exited with status {0:?}")]
    ExitStatus(Option<i32>),

    #[error("script timed out ({0}s)")]
    Timeout(u64),
}

/// 失敗したフック
#[derive(Debug)]
pub struct HookFailure {
    pub hook: String,
    pub error: HookError,
}

/// フック実行機能
#[derive(Debug, Clone)]
pub struct HookExecutor {
    hooks: Vec<HookDefinition>,
    default_timeout: u64,
}

impl Default for HookExecutor {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_HOOK_TIMEOUT_SECS)
    }
}

impl HookExecutor {
    pub fn new(hooks: Vec<HookDefinition>, default_timeout: u64) -> Self {
        Self {
            hooks,
            default_timeout,
        }
    }

    pub fn from_config(config: &TimerConfig) -> Self {
        Self::new(config.hooks.clone(), config.hook_timeout)
    }

    /// イベントに登録されたフックがあるか
    pub fn has_hooks_for(&self, context: &HookContext) -> bool {
        self.hooks.iter().any(|h| h.runs_on(context.event))
    }

    /// イベントに登録されたフックを順に実行する
    ///
    /// 全てのフックの完了を待ってから戻る。失敗はログに記録して返すだけで、
    /// 残りのフックは実行を続ける。
    pub async fn run(&self, context: &HookContext) -> Vec<HookFailure> {
        let mut failures = Vec::new();

        for hook in self.hooks.iter().filter(|h| h.runs_on(context.event)) {
            if let Err(e) = self.execute_single_hook(hook, context).await {
                error!("Hook '{}' failed: {}", hook.name, e);
                failures.push(HookFailure {
                    hook: hook.name.clone(),
                    error: e,
                });
            }
        }

        failures
    }

    /// 単一のフックを実行
    async fn execute_single_hook(
        &self,
        hook: &HookDefinition,
        context: &HookContext,
    ) -> Result<(), HookError> {
        Self::validate_script(&hook.script)?;

        let timeout_secs = hook.timeout_secs(self.default_timeout);
        let env_vars = context.to_env_vars();

        info!(
            "Running hook '{}' for {} (timeout: {}s)",
            hook.name, context.event, timeout_secs
        );

        let child = Command::new(&hook.script)
            .envs(&env_vars)
            .env("TIMER_HOOK_NAME", &hook.name)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(HookError::Spawn)?;

        match timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await {
            Ok(Ok(output)) => {
                Self::log_output(&hook.name, "stdout", &output.stdout);
                Self::log_output(&hook.name, "stderr", &output.stderr);

                if output.status.success() {
                    debug!("Hook '{}' finished", hook.name);
                    Ok(())
                } else {
                    Err(HookError::ExitStatus(output.status.code()))
                }
            }
            Ok(Err(e)) => Err(HookError::Spawn(e)),
            Err(_) => Err(HookError::Timeout(timeout_secs)),
        }
    }

    /// スクリプトの検証
    fn validate_script(path: &Path) -> Result<(), HookError> {
        if !path.is_absolute() {
            return Err(HookError::NotAbsolute(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(HookError::NotFound(path.to_path_buf()));
        }
        // 実行権限チェック (Unix)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(metadata) = std::fs::metadata(path) {
                if metadata.permissions().mode() & 0o111 == 0 {
                    return Err(HookError::NotExecutable(path.to_path_buf()));
                }
            }
        }
        Ok(())
    }

    /// 出力ログ記録（最大10KB）
    fn log_output(hook_name: &str, stream_name: &str, data: &[u8]) {
        if data.is_empty() {
            return;
        }

        let log_content = if data.len() > MAX_LOG_SIZE {
            let truncated = &data[..MAX_LOG_SIZE];
            format!("{}... (truncated)", String::from_utf8_lossy(truncated))
        } else {
            String::from_utf8_lossy(data).to_string()
        };

        if stream_name == "stderr" {
            warn!("[Hook: {}] stderr: {}", hook_name, log_content.trim_end());
        } else {
            info!("[Hook: {}] stdout: {}", hook_name, log_content.trim_end());
        }
    }
}
