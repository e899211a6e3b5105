//! HTTP 分類器クライアント
//!
//! 画像を `application/octet-stream` で POST し、
//! `{"predictions": [{"tagName": ..., "probability": ...}]}` 形式の応答を受け取ります。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Classification, Classifier, ClassifierError};

/// 分類サービスの認証ヘッダー
const PREDICTION_KEY_HEADER: &str = "Prediction-Key";

/// 1 回の分類リクエストのタイムアウト
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct PredictionBody {
    predictions: Vec<TagPrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagPrediction {
    tag_name: String,
    probability: f64,
}

/// HTTP 分類器
pub struct HttpClassifier {
    http: reqwest::Client,
    endpoint: String,
    prediction_key: Option<String>,
}

impl HttpClassifier {
    /// 分類器クライアントを作成
    ///
    /// エンドポイントが URL として不正な場合や、HTTP クライアントを構築できない場合はエラー。
    pub fn new(endpoint: String, prediction_key: Option<String>) -> Result<Self, ClassifierError> {
        reqwest::Url::parse(&endpoint)
            .map_err(|e| ClassifierError::Client(format!("invalid endpoint '{endpoint}': {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClassifierError::Client(e.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            prediction_key,
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassifierError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec());
        if let Some(key) = &self.prediction_key {
            request = request.header(PREDICTION_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let body: PredictionBody = response
            .json()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            "Classifier returned {} predictions",
            body.predictions.len()
        );

        Classification::from_predictions(
            body.predictions
                .into_iter()
                .map(|p| (p.tag_name, p.probability)),
        )
    }
}
