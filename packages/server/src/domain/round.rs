//! ラウンド進行のルール
//!
//! 勝敗判定、残り時間の妥当性チェック、ラウンド完了時の競合解決を
//! 副作用のない関数として定義します。
//! Session Store はこれらの関数を 1 つのクリティカルセクション内で呼び出すことで、
//! 「2 人目の Done だけがラウンドを進める」ことを保証します。

use super::{
    classifier::Classification,
    entity::{Game, Player, PlayerState},
    error::RuleViolation,
    value_object::{GameId, TimeLeft, Timestamp},
};

/// ラウンド完了処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundCompletion {
    /// このプレイヤーが先にラウンドを終えた（相手はまだ）
    FirstToFinish,
    /// このプレイヤーが 2 人目。ラウンドが進んだ
    SecondToFinish {
        /// roundOver の送信先
        game_id: GameId,
        /// 進んだ後のラウンド番号
        round_index: u32,
        /// 最終ラウンドが終わったか
        game_complete: bool,
    },
}

impl RoundCompletion {
    pub fn is_round_over(&self) -> bool {
        matches!(self, RoundCompletion::SecondToFinish { .. })
    }
}

/// 勝利判定
///
/// 時間内で、最有力の推測がお題と一致し、その確信度がしきい値以上なら勝ち。
pub fn has_won(
    time_left: TimeLeft,
    classification: &Classification,
    target: &str,
    certainty_threshold: f64,
) -> bool {
    !time_left.is_timeout()
        && classification.best_guess == target
        && classification.best_confidence() >= certainty_threshold
}

/// クライアントが報告した残り時間がサーバー側の経過時間と矛盾しないか検証する
///
/// - 残り時間が制限時間（+ 許容誤差）を超えていたら不正
/// - 残り時間から逆算した経過時間が、サーバーで観測した経過時間（+ 許容誤差）を超えていたら不正
pub fn check_time_plausibility(
    time_left: TimeLeft,
    round_started_at: Option<Timestamp>,
    now: Timestamp,
    time_limit_secs: f64,
    tolerance_secs: f64,
) -> Result<(), RuleViolation> {
    let remaining = time_left.seconds();
    if remaining > time_limit_secs + tolerance_secs {
        return Err(RuleViolation::ImplausibleTime(format!(
            "{remaining:.2}s left exceeds the {time_limit_secs:.0}s round limit"
        )));
    }

    let Some(started_at) = round_started_at else {
        return Err(RuleViolation::GameNotReady);
    };

    let claimed_elapsed = time_limit_secs - remaining;
    let observed_elapsed = now.millis_since(started_at) as f64 / 1000.0;
    if claimed_elapsed > observed_elapsed + tolerance_secs {
        return Err(RuleViolation::ImplausibleTime(format!(
            "{claimed_elapsed:.2}s elapsed claimed, only {observed_elapsed:.2}s since the round started"
        )));
    }

    Ok(())
}

/// クライアントが指定したラウンド番号を検証する
pub fn check_round(game: &Game, requested: Option<u32>) -> Result<(), RuleViolation> {
    if game.is_complete() {
        return Err(RuleViolation::GameFinished);
    }
    match requested {
        Some(got) if got < game.round_index => Err(RuleViolation::StaleRound {
            expected: game.round_index,
            got,
        }),
        Some(got) if got > game.round_index => Err(RuleViolation::RoundNotStarted {
            expected: game.round_index,
            got,
        }),
        _ => Ok(()),
    }
}

/// ラウンド完了の競合を解決する
///
/// 1. プレイヤーを Done にする
/// 2. 相手の状態を読む
/// 3. 相手が Done でなければ 1 人目として終了
/// 4. 相手が Done なら 2 人目としてラウンドを進め、両者を次のラウンドへ
///
/// 既に Done のプレイヤーの再提出は、状態を変えずに 1 人目として扱う。
/// 相手が Done のまま残ることはない（2 人目の完了で両者が Playing に戻る）。
///
/// 引数はすべて同じクリティカルセクション内で読み出したものでなければならない。
/// エラー時は引数を変更しない。
pub fn resolve_completion(
    game: &mut Game,
    player: &mut Player,
    opponent: Option<&mut Player>,
    round: u32,
    now: Timestamp,
) -> Result<RoundCompletion, RuleViolation> {
    check_round(game, Some(round))?;

    if player.state == PlayerState::Done {
        return Ok(RoundCompletion::FirstToFinish);
    }

    let mut next_player = player.clone();
    next_player.finish_round()?;

    match opponent {
        Some(opponent) if opponent.state == PlayerState::Done => {
            let mut next_opponent = opponent.clone();
            next_player.start_next_round()?;
            next_opponent.start_next_round()?;

            let round_index = game.advance_round(now);
            *player = next_player;
            *opponent = next_opponent;

            Ok(RoundCompletion::SecondToFinish {
                game_id: game.id.clone(),
                round_index,
                game_complete: game.is_complete(),
            })
        }
        _ => {
            *player = next_player;
            Ok(RoundCompletion::FirstToFinish)
        }
    }
}
