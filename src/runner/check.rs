// 返回值检查 - 判断一次成功返回的调用是否"看起来正确"
// 检查都很浅：存在、数组非空、数值非负、文本非空

/// 单次检查的结论
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// 值存在（非 null）
pub fn present<T>(value: &Option<T>, what: &str) -> Verdict {
    match value {
        Some(_) => Verdict::pass(format!("{} available", what)),
        None => Verdict::fail(format!("{} is missing", what)),
    }
}

/// 数组且至少有一个元素
pub fn non_empty<T>(items: &[T], what: &str) -> Verdict {
    if items.is_empty() {
        Verdict::fail(format!("No {} returned", what))
    } else {
        Verdict::pass(format!("{}: {}", what, items.len()))
    }
}

/// 数组，允许为空
pub fn listed<T>(items: &[T], what: &str) -> Verdict {
    Verdict::pass(format!("{}: {}", what, items.len()))
}

/// 有限且非负的数值
pub fn non_negative(value: f64, what: &str) -> Verdict {
    if !value.is_finite() {
        Verdict::fail(format!("{} is not a number: {}", what, value))
    } else if value < 0.0 {
        Verdict::fail(format!("{} is negative: {:.2}", what, value))
    } else {
        Verdict::pass(format!("{}: {:.2}", what, value))
    }
}

pub fn non_empty_text(text: &str, what: &str) -> Verdict {
    if text.trim().is_empty() {
        Verdict::fail(format!("{} is empty", what))
    } else {
        Verdict::pass(format!("{} ({} bytes)", what, text.len()))
    }
}

/// 无返回值的 setter，调用返回即成功
pub fn completed(what: &str) -> Verdict {
    Verdict::pass(format!("{} applied", what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present() {
        assert!(present(&Some(1), "value").passed);
        let missing = present::<u8>(&None, "Camera position");
        assert!(!missing.passed);
        assert_eq!(missing.message, "Camera position is missing");
    }

    #[test]
    fn test_non_empty() {
        let verdict = non_empty(&[1, 2, 3], "walls");
        assert!(verdict.passed);
        assert_eq!(verdict.message, "walls: 3");
        assert!(!non_empty::<u8>(&[], "walls").passed);
    }

    #[test]
    fn test_listed_allows_empty() {
        let verdict = listed::<u8>(&[], "doors");
        assert!(verdict.passed);
        assert_eq!(verdict.message, "doors: 0");
    }

    #[test]
    fn test_single_item_count_message() {
        assert_eq!(listed(&["front"], "doors").message, "doors: 1");
        assert_eq!(non_empty(&["oak"], "materials").message, "materials: 1");
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative(0.0, "Volume").passed);
        assert_eq!(non_negative(12.5, "Volume").message, "Volume: 12.50");
        assert!(!non_negative(-0.5, "Volume").passed);
        assert!(!non_negative(f64::NAN, "Volume").passed);
        assert!(!non_negative(f64::INFINITY, "Volume").passed);
    }

    #[test]
    fn test_non_empty_text() {
        assert!(non_empty_text("{}", "Export").passed);
        assert!(!non_empty_text("  \n", "Export").passed);
    }
}
