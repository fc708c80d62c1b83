use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static INVITE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]{4,32}$").expect("Invalid invite code regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_activity_name(name: &str) -> Result<(), &'static str> {
    // 去除首尾空白后 1..=128 个字符
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Activity name must not be empty");
    }
    if trimmed.chars().count() > 128 {
        return Err("Activity name must be at most 128 characters");
    }
    Ok(())
}

pub fn validate_invite_code(code: &str) -> Result<(), &'static str> {
    if !INVITE_CODE_RE.is_match(code) {
        return Err("Invite code format is invalid");
    }
    Ok(())
}

pub fn validate_rubric_criteria(criteria: &[String]) -> Result<(), &'static str> {
    if criteria.iter().any(|c| c.trim().is_empty()) {
        return Err("Rubric criteria must not contain empty entries");
    }
    let mut seen = std::collections::HashSet::new();
    if !criteria.iter().all(|c| seen.insert(c.trim())) {
        return Err("Rubric criteria must be unique");
    }
    Ok(())
}

/// max_marks 必须是 评分项 -> 非负数 的对象
pub fn validate_max_marks(max_marks: &serde_json::Value) -> Result<(), &'static str> {
    let Some(map) = max_marks.as_object() else {
        return Err("max_marks must be a JSON object");
    };
    if map
        .values()
        .any(|v| v.as_f64().is_none_or(|n| n < 0.0 || !n.is_finite()))
    {
        return Err("max_marks values must be non-negative numbers");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.example.org").is_ok());
        assert!(validate_email("alice@").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b.c").is_err());
        assert!(validate_email("a|b@example.com").is_err());
    }

    #[test]
    fn test_validate_activity_name() {
        assert!(validate_activity_name("Design review").is_ok());
        assert!(validate_activity_name("   ").is_err());
        assert!(validate_activity_name(&"x".repeat(128)).is_ok());
        assert!(validate_activity_name(&"x".repeat(129)).is_err());
        // 按字符计数
        assert!(validate_activity_name(&"评".repeat(128)).is_ok());
    }

    #[test]
    fn test_validate_invite_code() {
        assert!(validate_invite_code("ab12cd34").is_ok());
        assert!(validate_invite_code("AB12CD34").is_err());
        assert!(validate_invite_code("ab'; --").is_err());
    }

    #[test]
    fn test_validate_rubric_criteria() {
        let ok = vec!["clarity".to_string(), "depth".to_string()];
        assert!(validate_rubric_criteria(&ok).is_ok());
        let dup = vec!["clarity".to_string(), "clarity ".to_string()];
        assert!(validate_rubric_criteria(&dup).is_err());
        let empty = vec![" ".to_string()];
        assert!(validate_rubric_criteria(&empty).is_err());
    }

    #[test]
    fn test_validate_max_marks() {
        assert!(validate_max_marks(&json!({"clarity": 10, "depth": 5.5})).is_ok());
        assert!(validate_max_marks(&json!({})).is_ok());
        assert!(validate_max_marks(&json!([1, 2])).is_err());
        assert!(validate_max_marks(&json!({"clarity": -1})).is_err());
        assert!(validate_max_marks(&json!({"clarity": "ten"})).is_err());
    }
}
