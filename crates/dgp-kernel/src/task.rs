// task.rs — Per-evaluation task descriptor.

use serde::{Deserialize, Serialize};

use crate::error::KernelError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,

    #[serde(default)]
    pub risk: Option<Risk>,

    #[serde(rename = "requiresEscalation", default)]
    pub requires_escalation: Option<bool>,

    #[serde(rename = "driftLexicon", default)]
    pub drift_lexicon: Option<Vec<String>>,
}

impl Task {
    pub fn from_json(raw: serde_json::Value) -> Result<Task, KernelError> {
        if raw.is_null() {
            return Err(KernelError::MissingTaskId);
        }
        let task: Task = serde_json::from_value(raw).map_err(|_| KernelError::InvalidFieldType {
            field: "task".to_string(),
            expected: "an object matching the task schema",
        })?;
        if task.id.trim().is_empty() {
            return Err(KernelError::MissingTaskId);
        }
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_task() {
        let task = Task::from_json(json!({ "id": "t-1" })).expect("parses");
        assert_eq!(task.id, "t-1");
        assert_eq!(task.risk, None);
    }

    #[test]
    fn parses_full_task() {
        let task = Task::from_json(json!({
            "id": "t-2",
            "risk": "HIGH",
            "requiresEscalation": true,
            "driftLexicon": ["foo", "bar"]
        }))
        .expect("parses");
        assert_eq!(task.risk, Some(Risk::High));
        assert_eq!(task.requires_escalation, Some(true));
        assert_eq!(task.drift_lexicon, Some(vec!["foo".to_string(), "bar".to_string()]));
    }

    #[test]
    fn empty_id_is_missing_task_id() {
        let err = Task::from_json(json!({ "id": "" })).unwrap_err();
        assert_eq!(err, KernelError::MissingTaskId);
    }

    #[test]
    fn null_task_is_missing_task_id() {
        let err = Task::from_json(serde_json::Value::Null).unwrap_err();
        assert_eq!(err, KernelError::MissingTaskId);
    }
}
