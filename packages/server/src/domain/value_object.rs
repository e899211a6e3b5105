//! 値オブジェクト
//!
//! ゲームセッションで使う識別子や入力値を型で表現します。
//! 生成時にバリデーションを行い、不正な値がドメイン層に入り込まないようにします。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ValueObjectError;

/// 識別子の最大長
const MAX_ID_LENGTH: usize = 64;

/// ペアリングキーの最大長
const MAX_PAIRING_KEY_LENGTH: usize = 64;

fn validate_id(kind: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(kind));
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(ValueObjectError::TooLong {
            kind,
            max: MAX_ID_LENGTH,
        });
    }
    Ok(())
}

/// ゲーム ID（不透明なユニークトークン）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(String);

impl GameId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_id("game_id", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for GameId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// プレイヤー ID（接続ごとにユニーク）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_id("player_id", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ペアリングキー
///
/// クライアントが任意で指定するルームキー。
/// キーを指定しない接続は「キーなし」という独立したバケットとして扱い、
/// キーなし同士（かつ同じ難易度）でのみマッチングします。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PairingKey(Option<String>);

impl PairingKey {
    /// クライアントの入力からペアリングキーを作成
    ///
    /// 空文字列や空白のみのキーは「キーなし」として扱います。
    pub fn from_optional(value: Option<String>) -> Result<Self, ValueObjectError> {
        match value.map(|v| v.trim().to_string()) {
            None => Ok(Self(None)),
            Some(v) if v.is_empty() => Ok(Self(None)),
            Some(v) if v.len() > MAX_PAIRING_KEY_LENGTH => Err(ValueObjectError::TooLong {
                kind: "pair_id",
                max: MAX_PAIRING_KEY_LENGTH,
            }),
            Some(v) => Ok(Self(Some(v))),
        }
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

/// 難易度ティア
///
/// ラベルの選択とマッチングの互換性判定の両方に使われます。
/// 有効なティアの範囲は設定で決まるため、ここでは 0 のみを拒否します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Difficulty(u8);

impl Difficulty {
    pub fn new(value: u8) -> Result<Self, ValueObjectError> {
        if value == 0 {
            return Err(ValueObjectError::InvalidDifficulty(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// お題のラベル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// 分類器が返すラベル名
    pub name: String,
    /// 翻訳（ノルウェー語など）
    pub translation: Option<String>,
}

impl Label {
    pub fn new(name: impl Into<String>, translation: Option<String>) -> Self {
        Self {
            name: name.into(),
            translation,
        }
    }

    /// 指定言語での表示名
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::English => &self.name,
            Language::Norwegian => self.translation.as_deref().unwrap_or(&self.name),
        }
    }
}

/// クライアントが報告する残り時間（秒）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeLeft(f64);

impl TimeLeft {
    pub fn new(seconds: f64) -> Result<Self, ValueObjectError> {
        if !seconds.is_finite() {
            return Err(ValueObjectError::NotFinite("time_left"));
        }
        Ok(Self(seconds))
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }

    /// 時間切れかどうか（残り時間 0 以下）
    pub fn is_timeout(&self) -> bool {
        self.0 <= 0.0
    }
}

/// スコア
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Score(f64);

impl Score {
    pub fn new(value: f64) -> Result<Self, ValueObjectError> {
        if !value.is_finite() {
            return Err(ValueObjectError::NotFinite("score"));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// `earlier` からの経過ミリ秒
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }
}

/// 表示言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Norwegian,
}

impl Language {
    /// 言語コード（"EN" / "NO"）から変換
    pub fn from_code(code: Option<&str>) -> Result<Self, ValueObjectError> {
        match code.map(str::trim) {
            None | Some("") => Ok(Self::English),
            Some(c) if c.eq_ignore_ascii_case("EN") => Ok(Self::English),
            Some(c) if c.eq_ignore_ascii_case("NO") => Ok(Self::Norwegian),
            Some(c) => Err(ValueObjectError::UnknownLanguage(c.to_string())),
        }
    }
}

/// ゲーム内での役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "player_1")]
    Player1,
    #[serde(rename = "player_2")]
    Player2,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player1 => "player_1",
            Role::Player2 => "player_2",
        }
    }
}
