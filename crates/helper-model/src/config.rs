use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::{ConfigError, FieldIssue};

/// Host program launched by process-backed runners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCommand {
    /// Executable name or path.
    pub program: String,
    /// Arguments placed before the request file path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Extra environment for the host process.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

/// Diagnostic logging overrides, parsed by the observe crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<String>,
}

/// Typed view of a task definition file.
///
/// Built in one validation pass from the raw JSON object: every missing or mistyped key is
/// reported together.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskConfig {
    /// Metrics family name, interpreted by the metrics selector.
    pub metrics: String,
    pub ground_truth_path: PathBuf,
    pub source_image_path: PathBuf,
    pub save_folder: PathBuf,
    pub helper_task_definition_path: PathBuf,
    /// Circular log destination; empty disables the run log.
    pub log_file: PathBuf,
    /// Only read for SPT metrics.
    pub spt_max_linking_distance: Option<f64>,
    pub target_channel: u32,
    pub save_trackmate_files: bool,
    pub host: Option<HostCommand>,
    pub logging: LoggingSection,
}

impl TaskConfig {
    pub const METRICS: &'static str = "metrics";
    pub const GROUND_TRUTH_PATH: &'static str = "ground_truth_path";
    pub const SOURCE_IMAGE_PATH: &'static str = "source_image_path";
    pub const SAVE_FOLDER: &'static str = "save_folder";
    pub const HELPER_TASK_DEFINITION_PATH: &'static str = "helper_task_definition_path";
    pub const LOG_FILE: &'static str = "log_file";
    pub const SPT_MAX_LINKING_DISTANCE: &'static str = "spt_max_linking_distance";
    pub const TARGET_CHANNEL: &'static str = "target_channel";
    pub const SAVE_TRACKMATE_FILES: &'static str = "save_trackmate_files";
    pub const HOST: &'static str = "host";
    pub const LOGGING: &'static str = "logging";

    /// Validates a task definition object.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        let mut f = Fields::new(map);

        let metrics = f.string(Self::METRICS);
        let ground_truth_path = f.path(Self::GROUND_TRUTH_PATH);
        let source_image_path = f.path(Self::SOURCE_IMAGE_PATH);
        let save_folder = f.path(Self::SAVE_FOLDER);
        let helper_task_definition_path = f.path(Self::HELPER_TASK_DEFINITION_PATH);
        let log_file = f.path(Self::LOG_FILE);
        let target_channel = f.channel(Self::TARGET_CHANNEL);
        let spt_max_linking_distance = f.number_opt(Self::SPT_MAX_LINKING_DISTANCE);
        let save_trackmate_files = f.bool_opt(Self::SAVE_TRACKMATE_FILES).unwrap_or(false);
        let host = f.object_opt::<HostCommand>(Self::HOST, "an object with a 'program' string");
        let logging = f
            .object_opt::<LoggingSection>(
                Self::LOGGING,
                "an object with 'level' and 'format' strings",
            )
            .unwrap_or_default();

        if !f.issues.is_empty() {
            return Err(ConfigError::Invalid(f.issues));
        }

        match (
            metrics,
            ground_truth_path,
            source_image_path,
            save_folder,
            helper_task_definition_path,
            log_file,
            target_channel,
        ) {
            (
                Some(metrics),
                Some(ground_truth_path),
                Some(source_image_path),
                Some(save_folder),
                Some(helper_task_definition_path),
                Some(log_file),
                Some(target_channel),
            ) => Ok(Self {
                metrics,
                ground_truth_path,
                source_image_path,
                save_folder,
                helper_task_definition_path,
                log_file,
                spt_max_linking_distance,
                target_channel,
                save_trackmate_files,
                host,
                logging,
            }),
            // Every `None` above has recorded an issue.
            _ => Err(ConfigError::Invalid(f.issues)),
        }
    }

    /// Whether a run log file was configured.
    pub fn has_log_file(&self) -> bool {
        !self.log_file.as_os_str().is_empty()
    }
}

struct Fields<'a> {
    map: &'a Map<String, Value>,
    issues: Vec<FieldIssue>,
}

impl<'a> Fields<'a> {
    fn new(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            issues: Vec::new(),
        }
    }

    fn required(&mut self, field: &'static str) -> Option<&'a Value> {
        match self.map.get(field) {
            None | Some(Value::Null) => {
                self.issues.push(FieldIssue::Missing(field));
                None
            }
            Some(v) => Some(v),
        }
    }

    fn optional(&self, field: &'static str) -> Option<&'a Value> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    fn mistyped(&mut self, field: &'static str, expected: &'static str) {
        self.issues.push(FieldIssue::Mistyped { field, expected });
    }

    fn string(&mut self, field: &'static str) -> Option<String> {
        match self.required(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.mistyped(field, "a string");
                None
            }
        }
    }

    fn path(&mut self, field: &'static str) -> Option<PathBuf> {
        self.string(field).map(PathBuf::from)
    }

    fn channel(&mut self, field: &'static str) -> Option<u32> {
        let value = self.required(field)?;
        match value.as_u64().map(u32::try_from) {
            Some(Ok(channel)) => Some(channel),
            Some(Err(_)) => {
                self.issues.push(FieldIssue::OutOfRange {
                    field,
                    reason: "is too large",
                });
                None
            }
            None => {
                self.mistyped(field, "a non-negative integer");
                None
            }
        }
    }

    fn number_opt(&mut self, field: &'static str) -> Option<f64> {
        let value = self.optional(field)?;
        let n = value.as_f64();
        if n.is_none() {
            self.mistyped(field, "a number");
        }
        n
    }

    fn bool_opt(&mut self, field: &'static str) -> Option<bool> {
        let value = self.optional(field)?;
        let b = value.as_bool();
        if b.is_none() {
            self.mistyped(field, "a boolean");
        }
        b
    }

    fn object_opt<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        expected: &'static str,
    ) -> Option<T> {
        let value = self.optional(field)?;
        match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.mistyped(field, expected);
                None
            }
        }
    }
}
