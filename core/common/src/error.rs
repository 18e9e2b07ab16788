//! エラーハンドリング
//!
//! 失敗の分類を 1 つの enum に統一する。リトライ対象（transient）かどうかは
//! `is_transient()` で判定し、コマンド側はバリアントに応じたタイトルを付けて表示する。

/// assistant 全体で使うエラー型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// API キーが環境変数に設定されていない（ユーザーが修正可能）
    #[error("Set GEMINI_API_KEY (preferred) or GOOGLE_API_KEY in the environment.")]
    MissingCredential,

    /// クライアント構築に失敗した（原因メッセージを包む。リトライしない）
    #[error("Failed to initialize the API client: {0}")]
    Init(String),

    /// ネットワーク/API 呼び出しの失敗（transient。リトライ対象）
    #[error("{0}")]
    Http(String),

    /// JSON のシリアライズ/デシリアライズ失敗
    #[error("{0}")]
    Json(String),

    /// ファイル I/O の失敗
    #[error("{0}")]
    Io(String),

    /// コマンドライン引数の不正
    #[error("{0}")]
    InvalidArgument(String),

    /// モデルが安全性の理由で応答を拒否した（メッセージに各レーティングを列挙）
    #[error("{0}")]
    SafetyBlocked(String),

    /// テキストも安全性シグナルも無い応答
    #[error("No text returned from the model.")]
    EmptyResponse,
}

impl Error {
    /// 初期化エラー
    pub fn init(msg: impl Into<String>) -> Self {
        Error::Init(msg.into())
    }

    /// HTTP エラー（transient）
    pub fn http(msg: impl Into<String>) -> Self {
        Error::Http(msg.into())
    }

    /// JSON エラー
    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    /// I/O エラー
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    /// 引数不正エラー
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// リトライで解消しうる失敗かどうか
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// コンソール表示用のタイトル
    pub fn title(&self) -> &'static str {
        match self {
            Error::MissingCredential => "Missing API key",
            Error::Init(_) => "Initialization Error",
            Error::Http(_) => "API Error",
            Error::SafetyBlocked(_) => "Safety Blocked",
            Error::EmptyResponse => "Empty Response",
            Error::Json(_) | Error::Io(_) | Error::InvalidArgument(_) => "Error",
        }
    }
}
