use crate::core::operation::OperationKind;
use crate::domain::model::{SpeedRange, VehicleKind, DEFAULT_FINISH_LINE};
use crate::utils::error::{EventedError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_unique_names,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_VEHICLE_SPEED: u32 = 1_000;
pub const MAX_LAP_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub property: PropertyConfig,
    pub calculator: CalculatorConfig,
    pub race: RaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyConfig {
    pub name: String,
    pub values: Vec<String>,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            values: vec!["New name".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub a: f64,
    pub b: f64,
    pub operations: Vec<String>,
    pub compose: Vec<String>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            a: 5.0,
            b: 3.0,
            operations: OperationKind::ALL.iter().map(|k| k.to_string()).collect(),
            compose: vec!["add".to_string(), "multiply".to_string()],
        }
    }
}

impl CalculatorConfig {
    pub fn operation_kinds(&self) -> Result<Vec<OperationKind>> {
        self.operations.iter().map(|name| name.parse()).collect()
    }

    pub fn compose_kinds(&self) -> Result<Vec<OperationKind>> {
        self.compose.iter().map(|name| name.parse()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub finish_line: u32,
    pub max_laps: u64,
    pub lap_delay_ms: u64,
    pub seed: Option<u64>,
    pub vehicles: Vec<VehicleConfig>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            finish_line: DEFAULT_FINISH_LINE,
            max_laps: crate::core::engine::DEFAULT_MAX_LAPS,
            lap_delay_ms: 0,
            seed: None,
            vehicles: vec![
                VehicleConfig::new("Ferrari", VehicleKind::SportsCar),
                VehicleConfig::new("Toyota", VehicleKind::PassengerCar),
                VehicleConfig::new("Volvo", VehicleKind::Truck),
                VehicleConfig::new("Ikarus", VehicleKind::Bus),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub model: String,
    pub kind: String,
    /// 固定速度，優先於速度範圍
    pub speed: Option<u32>,
    pub min_speed: Option<u32>,
    pub max_speed: Option<u32>,
}

impl VehicleConfig {
    pub fn new(model: &str, kind: VehicleKind) -> Self {
        Self {
            model: model.to_string(),
            kind: kind.to_string(),
            speed: None,
            min_speed: None,
            max_speed: None,
        }
    }

    pub fn vehicle_kind(&self) -> Result<VehicleKind> {
        self.kind.parse()
    }

    /// Custom range if both bounds are set, otherwise the kind's range.
    pub fn speed_range(&self) -> Result<SpeedRange> {
        match (self.min_speed, self.max_speed) {
            (Some(min), Some(max)) => SpeedRange::new(min, max),
            (None, None) => Ok(self.vehicle_kind()?.speed_range()),
            _ => Err(EventedError::ConfigValidationError {
                field: format!("race.vehicles.{}", self.model),
                message: "min_speed and max_speed must be set together".to_string(),
            }),
        }
    }
}

impl DemoConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EventedError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案存在才載入，否則使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) if path.as_ref().exists() => Self::from_file(path),
            Some(path) => {
                tracing::warn!(
                    "⚠️ Config file {} not found, using defaults",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${RACE_SEED})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EventedError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("property.name", &self.property.name)?;

        self.calculator.operation_kinds()?;
        self.calculator.compose_kinds()?;

        let race = &self.race;
        validate_positive_number("race.finish_line", race.finish_line, 1)?;
        validate_positive_number("race.max_laps", race.max_laps, 1)?;
        validate_range("race.lap_delay_ms", race.lap_delay_ms, 0, MAX_LAP_DELAY_MS)?;
        validate_unique_names("race.vehicles", race.vehicles.iter().map(|v| v.model.as_str()))?;

        for vehicle in &race.vehicles {
            validate_non_empty_string("race.vehicles.model", &vehicle.model)?;
            let kind = vehicle.vehicle_kind()?;
            let range = vehicle.speed_range()?;
            if let Some(speed) = vehicle.speed {
                validate_range("race.vehicles.speed", speed, 1, MAX_VEHICLE_SPEED)?;
                if !range.contains(speed) {
                    tracing::warn!(
                        "⚠️ {} ({}) has fixed speed {} outside [{}, {})",
                        vehicle.model,
                        kind,
                        speed,
                        range.min(),
                        range.max()
                    );
                }
            }
        }

        Ok(())
    }
}

impl Validate for DemoConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
