//! 満了時のサウンド再生
//!
//! 再生はOS付属のプレイヤーコマンド（afplay / paplay / PowerShell）に任せる。

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::command::{run_command, CommandSpec, Platform, COMMAND_TIMEOUT_SECS};
use super::{NotificationError, NotificationRequest, Notifier};

/// macOSシステムサウンドのディレクトリ
const MACOS_SOUND_DIR: &str = "/System/Library/Sounds";

/// freedesktopサウンドテーマの候補
const FREEDESKTOP_SOUNDS: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
    "/usr/share/sounds/freedesktop/stereo/alarm-clock-elapsed.oga",
    "/usr/share/sounds/freedesktop/stereo/bell.oga",
];

/// Windows標準のサウンド
const WINDOWS_SOUND: &str = r"C:\Windows\Media\Alarm01.wav";

/// macOSで優先するサウンド名
const PREFERRED_SOUNDS: &[&str] = &["Glass", "Ping"];

/// サウンドの取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// OS付属のサウンド
    System {
        /// サウンド名（例: "Glass"）
        name: String,
        path: PathBuf,
    },
    /// 設定で指定されたファイル
    Custom { path: PathBuf },
}

impl SoundSource {
    pub fn path(&self) -> &Path {
        match self {
            SoundSource::System { path, .. } | SoundSource::Custom { path } => path,
        }
    }

    /// ディレクトリ内のサウンドファイルを名前順に列挙する
    pub fn discover_in(dir: &Path) -> Vec<SoundSource> {
        let mut sounds: Vec<SoundSource> = fs::read_dir(dir)
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_sound_file(path))
            .filter_map(|path| {
                let name = path.file_stem()?.to_str()?.to_string();
                Some(SoundSource::System { name, path })
            })
            .collect();

        sounds.sort_by(|a, b| a.path().cmp(b.path()));
        sounds
    }

    /// プラットフォームのデフォルトサウンドを探す
    ///
    /// macOS: Glass -> Ping -> 最初に見つかったもの
    /// Linux: freedesktopテーマの候補順
    pub fn default_for(platform: Platform) -> Option<SoundSource> {
        match platform {
            Platform::MacOs => {
                let sounds = Self::discover_in(Path::new(MACOS_SOUND_DIR));
                PREFERRED_SOUNDS
                    .iter()
                    .find_map(|preferred| {
                        sounds.iter().find(|s| {
                            matches!(s, SoundSource::System { name, .. } if name == *preferred)
                        })
                    })
                    .or_else(|| sounds.first())
                    .cloned()
            }
            Platform::Unix => FREEDESKTOP_SOUNDS
                .iter()
                .map(PathBuf::from)
                .find(|path| path.is_file())
                .map(|path| SoundSource::System {
                    name: path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("default")
                        .to_string(),
                    path,
                }),
            Platform::Windows => {
                let path = PathBuf::from(WINDOWS_SOUND);
                path.is_file().then(|| SoundSource::System {
                    name: "Alarm01".to_string(),
                    path,
                })
            }
            Platform::Other => None,
        }
    }
}

fn is_sound_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            matches!(
                e.to_lowercase().as_str(),
                "aiff" | "wav" | "mp3" | "oga" | "ogg"
            )
        })
        .unwrap_or(false)
}

/// サウンド再生コマンドを組み立てる
pub fn sound_command(platform: Platform, path: &Path) -> Option<CommandSpec> {
    let path = path.display().to_string();
    match platform {
        Platform::MacOs => Some(CommandSpec::new("afplay", vec![path])),
        Platform::Unix => Some(CommandSpec::new("paplay", vec![path])),
        Platform::Windows => Some(CommandSpec::new(
            "powershell",
            vec![
                "-NoProfile".to_string(),
                "-NonInteractive".to_string(),
                "-Command".to_string(),
                format!(
                    "(New-Object Media.SoundPlayer '{}').PlaySync()",
                    path.replace('\'', "''")
                ),
            ],
        )),
        Platform::Other => None,
    }
}

/// サウンド通知
#[derive(Debug)]
pub struct SoundNotifier {
    platform: Platform,
    custom: Option<PathBuf>,
}

impl SoundNotifier {
    pub fn new(custom: Option<PathBuf>) -> Self {
        Self::for_platform(Platform::current(), custom)
    }

    pub fn for_platform(platform: Platform, custom: Option<PathBuf>) -> Self {
        Self { platform, custom }
    }

    /// 再生するサウンドを決める
    ///
    /// 設定されたファイルがあればそれを使い、存在しなければエラー。
    pub fn resolve_source(&self) -> Result<SoundSource, NotificationError> {
        match &self.custom {
            Some(path) if path.is_file() => Ok(SoundSource::Custom { path: path.clone() }),
            Some(path) => Err(NotificationError::SoundNotFound(
                path.display().to_string(),
            )),
            None => SoundSource::default_for(self.platform).ok_or_else(|| {
                NotificationError::SoundNotFound("no system sound available".to_string())
            }),
        }
    }
}

#[async_trait]
impl Notifier for SoundNotifier {
    fn name(&self) -> &str {
        "sound"
    }

    fn is_available(&self) -> bool {
        self.platform != Platform::Other
    }

    async fn notify(&self, _request: &NotificationRequest) -> Result<(), NotificationError> {
        let source = self.resolve_source()?;
        debug!("Playing sound: {}", source.path().display());

        let spec = sound_command(self.platform, source.path())
            .ok_or_else(|| NotificationError::Unsupported("sound playback".to_string()))?;
        run_command(&spec, COMMAND_TIMEOUT_SECS).await?;

        info!("Sound played: {}", source.path().display());
        Ok(())
    }
}
