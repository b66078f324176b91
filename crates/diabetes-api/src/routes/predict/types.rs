//! 예측 API 타입 정의
//!
//! 요청 스키마 검증, 모델 선택, 응답 타입을 정의합니다.

use diabetes_ml::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::{FieldErrors, PredictError};

/// 요청 JSON의 feature 필드 이름 (모델 입력 순서).
pub const FEATURE_FIELDS: [&str; FEATURE_COUNT] = [
    "pregnancies",
    "glucose",
    "bloodPressure",
    "skinThickness",
    "insulin",
    "bmi",
    "diabetesPedigreeFunction",
    "age",
];

/// 모델 선택 필드 이름.
pub const MODEL_TYPE_FIELD: &str = "modelType";

// ==================== 모델 선택 ====================

/// 예측에 사용할 분류기.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// 기본 분류기
    #[default]
    Basic,
    /// 앙상블 분류기
    Ensemble,
}

impl ModelType {
    /// 사용 가능한 모든 모델.
    pub const ALL: [ModelType; 2] = [ModelType::Basic, ModelType::Ensemble];

    /// 요청의 `modelType` 값에서 모델 결정.
    ///
    /// `"ensemble"` 문자열만 ensemble을 선택합니다. 누락, 알 수 없는 문자열,
    /// 문자열이 아닌 값은 모두 basic으로 처리합니다.
    pub fn from_request_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if s == "ensemble" => ModelType::Ensemble,
            _ => ModelType::Basic,
        }
    }

    /// 응답/라벨용 식별자.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Basic => "basic",
            ModelType::Ensemble => "ensemble",
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== 위험도 ====================

/// 예측 레이블에서 파생된 위험도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// 레이블 1은 High, 그 외는 Low.
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Low => "Low",
        }
    }
}

// ==================== 검증된 입력 레코드 ====================

/// 검증을 통과한 환자 입력 레코드.
///
/// 범위 검증은 하지 않습니다. 숫자로 변환만 되면 음수도 허용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

impl PatientRecord {
    /// 고정 순서 값 배열에서 생성.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        let [
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age,
        ] = values;
        Self {
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age,
        }
    }

    /// 고정 순서 값 배열로 변환.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ]
    }

    /// 모델 입력 feature vector 생성.
    pub fn to_feature_vector(&self) -> FeatureVector {
        FeatureVector::from_f64(&self.values())
    }

    /// 요청 JSON 객체를 검증하여 레코드 생성.
    ///
    /// 첫 번째 실패에서 멈추지 않고 누락/변환 불가 필드를 모두 수집합니다.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, PredictError> {
        let mut values = [0.0_f64; FEATURE_COUNT];
        let mut errors = FieldErrors::default();

        for (slot, field) in values.iter_mut().zip(FEATURE_FIELDS) {
            match body.get(field) {
                None => errors.missing.push(field.to_string()),
                Some(value) => match coerce_f64(value) {
                    Some(number) => *slot = number,
                    None => errors.invalid.push(field.to_string()),
                },
            }
        }

        if errors.is_empty() {
            Ok(Self::from_values(values))
        } else {
            Err(PredictError::Validation(errors))
        }
    }
}

/// JSON 값을 f64로 변환.
///
/// 숫자, 불리언(`true` → 1.0, `false` → 0.0), 그리고 앞뒤 공백을 제거한 내용이
/// f64로 파싱되는 문자열을 허용합니다. `null`, 배열, 객체는 변환할 수 없습니다.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

// ==================== 요청/응답 ====================

/// 예측 요청 (문서화 및 클라이언트용 typed 표현).
///
/// 서버는 본문을 `PatientRecord::from_json`으로 검증하므로 숫자 문자열도 허용합니다.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    #[serde(flatten)]
    pub record: PatientRecord,
    /// 사용할 모델 (기본: basic, 알 수 없는 값은 basic으로 처리)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
}

/// 예측 결과 응답.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    /// 예측 레이블 (0 또는 1)
    pub prediction: u8,
    /// 예측 클래스의 확률 (%, 소수점 둘째 자리 반올림)
    pub confidence: f64,
    /// 위험도 ("High" | "Low")
    pub risk_level: RiskLevel,
    /// 실제 사용된 모델
    pub model_used: ModelType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn sample_body() -> Value {
        json!({
            "pregnancies": 2,
            "glucose": 130,
            "bloodPressure": 70,
            "skinThickness": 20,
            "insulin": 80,
            "bmi": 28.5,
            "diabetesPedigreeFunction": 0.5,
            "age": 33
        })
    }

    #[test]
    fn test_model_type_selection() {
        assert_eq!(ModelType::from_request_value(None), ModelType::Basic);
        assert_eq!(
            ModelType::from_request_value(Some(&json!("basic"))),
            ModelType::Basic
        );
        assert_eq!(
            ModelType::from_request_value(Some(&json!("ensemble"))),
            ModelType::Ensemble
        );
        assert_eq!(
            ModelType::from_request_value(Some(&json!("xgboost"))),
            ModelType::Basic
        );
        assert_eq!(
            ModelType::from_request_value(Some(&json!("Ensemble"))),
            ModelType::Basic
        );
        assert_eq!(
            ModelType::from_request_value(Some(&json!(1))),
            ModelType::Basic
        );
    }

    #[test]
    fn test_model_type_serialization() {
        assert_eq!(serde_json::to_value(ModelType::Ensemble).unwrap(), "ensemble");
        assert_eq!(ModelType::Basic.to_string(), "basic");
    }

    #[test]
    fn test_risk_level_from_label() {
        assert_eq!(RiskLevel::from_label(1), RiskLevel::High);
        assert_eq!(RiskLevel::from_label(0), RiskLevel::Low);
        assert_eq!(serde_json::to_value(RiskLevel::High).unwrap(), "High");
    }

    #[test]
    fn test_record_from_numbers() {
        let record = PatientRecord::from_json(&object(sample_body())).unwrap();
        assert_eq!(
            record.values(),
            [2.0, 130.0, 70.0, 20.0, 80.0, 28.5, 0.5, 33.0]
        );
    }

    #[test]
    fn test_record_from_numeric_strings() {
        let mut body = object(sample_body());
        body.insert("glucose".to_string(), json!("130"));
        body.insert("bmi".to_string(), json!(" 28.5 "));
        body.insert("age".to_string(), json!("3.3e1"));

        let record = PatientRecord::from_json(&body).unwrap();
        assert_eq!(record.glucose, 130.0);
        assert_eq!(record.bmi, 28.5);
        assert_eq!(record.age, 33.0);
    }

    #[test]
    fn test_record_accepts_negative_values() {
        let mut body = object(sample_body());
        body.insert("insulin".to_string(), json!(-5));

        let record = PatientRecord::from_json(&body).unwrap();
        assert_eq!(record.insulin, -5.0);
    }

    #[test]
    fn test_record_collects_all_failures() {
        let mut body = object(sample_body());
        body.remove("glucose");
        body.remove("age");
        body.insert("bmi".to_string(), json!("heavy"));
        body.insert("insulin".to_string(), Value::Null);

        match PatientRecord::from_json(&body) {
            Err(PredictError::Validation(errors)) => {
                assert_eq!(errors.missing, vec!["glucose", "age"]);
                assert_eq!(errors.invalid, vec!["insulin", "bmi"]);
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_coerce_f64() {
        assert_eq!(coerce_f64(&json!(1)), Some(1.0));
        assert_eq!(coerce_f64(&json!("2.5")), Some(2.5));
        assert_eq!(coerce_f64(&json!("")), None);
        assert_eq!(coerce_f64(&json!(true)), Some(1.0));
        assert_eq!(coerce_f64(&json!(false)), Some(0.0));
        assert_eq!(coerce_f64(&Value::Null), None);
        assert_eq!(coerce_f64(&json!({"value": 1})), None);
        assert_eq!(coerce_f64(&json!([1])), None);
    }

    #[test]
    fn test_feature_vector_order() {
        let record = PatientRecord::from_json(&object(sample_body())).unwrap();
        let features = record.to_feature_vector();
        assert_eq!(
            features.as_slice(),
            &[2.0, 130.0, 70.0, 20.0, 80.0, 28.5, 0.5, 33.0]
        );
    }

    #[test]
    fn test_predict_request_flattens_record() {
        let request = PredictRequest {
            record: PatientRecord::from_json(&object(sample_body())).unwrap(),
            model_type: Some("ensemble".to_string()),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["bloodPressure"], 70.0);
        assert_eq!(json["modelType"], "ensemble");
    }

    #[test]
    fn test_prediction_response_shape() {
        let response = PredictionResponse {
            prediction: 1,
            confidence: 87.5,
            risk_level: RiskLevel::High,
            model_used: ModelType::Ensemble,
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            json!({
                "prediction": 1,
                "confidence": 87.5,
                "riskLevel": "High",
                "modelUsed": "ensemble"
            })
        );
    }
}
