//! UseCase: 画像提出処理（Round Driver）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitDrawingUseCase::execute() メソッド
//! - 分類、勝敗判定、個別の prediction 通知、ラウンド完了への引き渡し
//!
//! ### なぜこのテストが必要か
//! - 勝利・時間切れ・相手の同時提出が競合しても、roundOver は各プレイヤーに 1 回だけ届く
//! - prediction は常に roundOver より先に届く
//! - 不正なリクエストや分類器の失敗では状態が変わらないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：A が勝ち、続いて B が勝つ
//! - 正常系：時間内の不正解（状態は変わらない）
//! - 異常系：古いラウンド、ありえない残り時間、不正な画像、分類器の失敗
//! - エッジケース：白紙の画像、時間切れの同時提出、ノルウェー語での表示

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use doodleduel_shared::time::Clock;
use rand::Rng;

use crate::{
    config::GameConfig,
    domain::{
        Classification, Classifier, Drawing, DrawingConstraints, GameEvent, LabelCatalog,
        Language, MessagePusher, PlayerId, PlayerState, Prediction, RepositoryError,
        RoundCompletion, RuleViolation, SessionRepository, TimeLeft, Timestamp,
        round::{check_round, check_time_plausibility, has_won},
    },
};

use super::{complete_round::CompleteRoundUseCase, error::SubmitDrawingError};

/// 画像提出の判定に使う設定値
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitDrawingSettings {
    pub certainty_threshold: f64,
    pub round_time_limit_secs: f64,
    pub time_tolerance_secs: f64,
    /// 時間切れによる完了に加える遅延の上限（0 で無効）
    pub timeout_jitter_ms: u64,
    pub blank_guess: String,
    pub constraints: DrawingConstraints,
}

impl From<&GameConfig> for SubmitDrawingSettings {
    fn from(config: &GameConfig) -> Self {
        Self {
            certainty_threshold: config.certainty_threshold,
            round_time_limit_secs: config.round_time_limit_secs,
            time_tolerance_secs: config.time_tolerance_secs,
            timeout_jitter_ms: config.timeout_jitter_ms,
            blank_guess: config.blank_guess.clone(),
            constraints: config.drawing_constraints(),
        }
    }
}

/// 画像提出のリクエスト
#[derive(Debug, Clone)]
pub struct SubmitDrawingRequest {
    /// クライアントが報告する残り時間（秒）
    pub time_left: f64,
    /// 提出先のラウンド（None なら現在のラウンド）
    pub round: Option<u32>,
    /// 言語コード（"EN" / "NO"）
    pub lang: Option<String>,
    /// PNG バイト列
    pub image: Vec<u8>,
}

/// 画像提出の結果
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitDrawingOutcome {
    pub prediction: Prediction,
    /// ラウンド完了処理を行った場合の結果
    pub completion: Option<RoundCompletion>,
}

/// 画像提出のユースケース
pub struct SubmitDrawingUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    classifier: Arc<dyn Classifier>,
    label_catalog: Arc<dyn LabelCatalog>,
    clock: Arc<dyn Clock>,
    settings: SubmitDrawingSettings,
    complete_round_usecase: Arc<CompleteRoundUseCase>,
}

impl SubmitDrawingUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        classifier: Arc<dyn Classifier>,
        label_catalog: Arc<dyn LabelCatalog>,
        clock: Arc<dyn Clock>,
        settings: SubmitDrawingSettings,
        complete_round_usecase: Arc<CompleteRoundUseCase>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            classifier,
            label_catalog,
            clock,
            settings,
            complete_round_usecase,
        }
    }

    /// 画像提出を実行
    ///
    /// 1. リクエストとプレイヤーの状態を検証（失敗時は状態を変更しない）
    /// 2. 画像を分類（ロックを保持しない）
    /// 3. 勝敗を判定し、prediction を本人にだけ送信
    /// 4. 勝利または時間切れならラウンド完了処理へ
    ///
    /// prediction はラウンド完了処理より先に送信するため、
    /// 本人には必ず prediction → roundOver の順で届きます。
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        request: SubmitDrawingRequest,
    ) -> Result<SubmitDrawingOutcome, SubmitDrawingError> {
        // 1. 入力の検証
        let time_left = TimeLeft::new(request.time_left)?;
        let language = Language::from_code(request.lang.as_deref())?;

        // 2. プレイヤーとゲームの状態を検証
        let player = self
            .repository
            .get_player(player_id)
            .await
            .map_err(not_in_game)?;
        let game = self
            .repository
            .get_game(&player.game_id)
            .await
            .map_err(not_in_game)?;

        check_round(&game, request.round)?;
        match player.state {
            PlayerState::Waiting => return Err(RuleViolation::GameNotReady.into()),
            PlayerState::Disconnected => return Err(SubmitDrawingError::NotInGame),
            // Done のプレイヤーも分類結果は受け取る（完了処理は 1 人目のまま）
            PlayerState::Ready | PlayerState::Playing | PlayerState::Done => {}
        }

        let now = Timestamp::new(self.clock.now_millis());
        check_time_plausibility(
            time_left,
            game.round_started_at,
            now,
            self.settings.round_time_limit_secs,
            self.settings.time_tolerance_secs,
        )?;

        let label = game
            .current_label()
            .cloned()
            .ok_or(RuleViolation::GameFinished)?;
        let drawing = Drawing::decode(request.image, self.settings.constraints)?;

        // 3. 分類
        let classification = if drawing.is_blank() {
            tracing::debug!("Blank drawing from '{}', skipping classifier", player_id);
            Classification::blank(&self.settings.blank_guess)
        } else {
            match self.classifier.classify(drawing.bytes()).await {
                Ok(classification) => classification,
                Err(e) if time_left.is_timeout() => {
                    tracing::warn!(
                        "Classifier failed for '{}' on timeout, completing the round anyway: {}",
                        player_id,
                        e
                    );
                    Classification {
                        certainty: BTreeMap::new(),
                        best_guess: String::new(),
                    }
                }
                Err(e) => {
                    tracing::warn!("Classifier failed for '{}': {}", player_id, e);
                    return Err(e.into());
                }
            }
        };

        // 4. 勝敗判定と結果の通知
        let won = has_won(
            time_left,
            &classification,
            &label.name,
            self.settings.certainty_threshold,
        );
        let completes = won || time_left.is_timeout();

        let prediction = Prediction {
            certainty: classification
                .certainty
                .into_iter()
                .map(|(name, confidence)| (self.localize(&name, language), confidence))
                .collect(),
            guess: self.localize(&classification.best_guess, language),
            correct_label: match (&label.translation, language) {
                (None, Language::Norwegian) => self.localize(&label.name, language),
                _ => label.display_name(language).to_string(),
            },
            has_won: won,
            game_state: if completes || player.state == PlayerState::Done {
                PlayerState::Done
            } else {
                PlayerState::Playing
            },
        };

        tracing::info!(
            "Player '{}' round {}: guess '{}' for '{}' (won: {}, time_left: {:.2})",
            player_id,
            game.round_index,
            classification.best_guess,
            label.name,
            won,
            time_left.seconds()
        );

        if let Err(e) = self
            .message_pusher
            .push_to(player_id, &GameEvent::Prediction(prediction.clone()))
            .await
        {
            tracing::warn!("Failed to push prediction to '{}': {}", player_id, e);
        }

        if !completes {
            return Ok(SubmitDrawingOutcome {
                prediction,
                completion: None,
            });
        }

        // 5. ラウンド完了
        if time_left.is_timeout() && self.settings.timeout_jitter_ms > 0 {
            let delay = rand::rng().random_range(0..=self.settings.timeout_jitter_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let completion = self
            .complete_round_usecase
            .execute(
                player_id,
                game.round_index,
                Timestamp::new(self.clock.now_millis()),
            )
            .await?;

        Ok(SubmitDrawingOutcome {
            prediction,
            completion: Some(completion),
        })
    }

    fn localize(&self, name: &str, language: Language) -> String {
        match language {
            Language::English => name.to_string(),
            Language::Norwegian => self
                .label_catalog
                .translate(name)
                .unwrap_or_else(|| name.to_string()),
        }
    }
}

fn not_in_game(error: RepositoryError) -> SubmitDrawingError {
    match error {
        RepositoryError::GameNotFound(_) | RepositoryError::PlayerNotFound(_) => {
            SubmitDrawingError::NotInGame
        }
        other => SubmitDrawingError::Repository(other),
    }
}
