//! Student profile as delivered by the backend
//!
//! The backend stores most profile fields as text, and list-valued fields as
//! JSON-encoded text (`"[\"視覺障礙\",\"肢體障礙\"]"`). [`StudentProfile::from_value`]
//! flattens every field to display text once, so the case summary never has to
//! care about the wire shape.

use serde_json::Value;

/// Shown for fields the backend left empty
pub const NOT_PROVIDED: &str = "未提供";

/// Display-ready student profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    pub name: String,
    pub gender: String,
    pub disability: String,
    pub communication_issues: String,
    pub communication_methods: String,
    pub strengths: String,
    pub weaknesses: String,
    /// Planned teaching time in minutes
    pub teaching_time: String,
}

impl StudentProfile {
    /// Flatten a backend profile object.
    ///
    /// Missing, null and blank fields become [`NOT_PROVIDED`].
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| flatten_field(value.get(key));
        Self {
            name: field("name"),
            gender: field("gender"),
            disability: field("disability"),
            communication_issues: field("communication_Issues"),
            communication_methods: field("communication_Methods"),
            strengths: field("strengths"),
            weaknesses: field("weaknesses"),
            teaching_time: field("teaching_Time"),
        }
    }

    /// The case summary handed to the model and printed under 個案資料
    pub fn case_info(&self) -> String {
        [
            format!("姓名: {}", self.name),
            format!("性別: {}", self.gender),
            format!("障礙類別: {}", self.disability),
            format!("溝通問題: {}", self.communication_issues),
            format!("溝通方式: {}", self.communication_methods),
            format!("優勢能力: {}", self.strengths),
            format!("弱勢能力: {}", self.weaknesses),
            format!("預計教學時間: {} 分鐘", self.teaching_time),
        ]
        .join("\n")
    }
}

fn flatten_field(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => return NOT_PROVIDED.to_string(),
        Some(Value::String(s)) => decode_text(s),
        Some(Value::Array(items)) => join_items(items),
        Some(other) => other.to_string(),
    };
    if text.trim().is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        text
    }
}

/// Decode JSON-encoded lists; anything else is shown as written
fn decode_text(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => join_items(&items),
        _ => text.to_string(),
    }
}

fn join_items(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encoded_list_is_joined() {
        let profile = StudentProfile::from_value(&json!({
            "name": "王小明",
            "disability": "[\"視覺障礙\",\"肢體障礙\"]"
        }));
        assert_eq!(profile.name, "王小明");
        assert_eq!(profile.disability, "視覺障礙, 肢體障礙");
    }

    #[test]
    fn test_missing_and_null_fields() {
        let profile = StudentProfile::from_value(&json!({
            "gender": null,
            "strengths": ""
        }));
        assert_eq!(profile.name, NOT_PROVIDED);
        assert_eq!(profile.gender, NOT_PROVIDED);
        assert_eq!(profile.strengths, NOT_PROVIDED);
    }

    #[test]
    fn test_numbers_and_native_lists() {
        let profile = StudentProfile::from_value(&json!({
            "teaching_Time": 30,
            "communication_Methods": ["手勢", "圖卡"]
        }));
        assert_eq!(profile.teaching_time, "30");
        assert_eq!(profile.communication_methods, "手勢, 圖卡");
    }

    #[test]
    fn test_numeric_text_stays_as_written() {
        let profile = StudentProfile::from_value(&json!({ "teaching_Time": "40" }));
        assert_eq!(profile.teaching_time, "40");
    }

    #[test]
    fn test_case_info_lines() {
        let profile = StudentProfile::from_value(&json!({
            "name": "王小明",
            "teaching_Time": "40"
        }));
        let info = profile.case_info();
        let lines: Vec<&str> = info.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "姓名: 王小明");
        assert_eq!(lines[1], "性別: 未提供");
        assert_eq!(lines[7], "預計教學時間: 40 分鐘");
    }
}
