//! Submission template and format validation.
//!
//! A submission must open with twelve labelled lines in a fixed order, each
//! written as `label：value`. Values may be empty; only line presence and order
//! are checked. Anything after the last labelled line is tolerated.

use lazy_static::lazy_static;
use regex::Regex;

use super::errors::SubmissionError;

/// Full-width colon separating each label from its value
pub const LABEL_SEPARATOR: char = '：';

/// Required fields, in the order they must appear
pub const FIELD_LABELS: [&str; 12] = [
    "昵称",
    "性别",
    "年龄",
    "身高",
    "体重",
    "性格",
    "爱好",
    "性癖",
    "雷区",
    "在线时间",
    "想找的人",
    "联系方式",
];

lazy_static! {
    // \A anchors at the start of the text; $ in multi-line mode allows trailing lines
    static ref SUBMISSION_PATTERN: Regex = {
        let lines: Vec<String> = FIELD_LABELS
            .iter()
            .map(|label| format!("{}{}.*", regex::escape(label), LABEL_SEPARATOR))
            .collect();
        Regex::new(&format!(r"(?m)\A{}$", lines.join(r"\n"))).unwrap()
    };

    /// Blank template sent to users who ask for it or get the format wrong
    pub static ref SUBMISSION_TEMPLATE: String = {
        let mut template = String::from("\n请使用以下模板进行投稿：\n\n");
        for label in FIELD_LABELS {
            template.push_str(label);
            template.push(LABEL_SEPARATOR);
            template.push('\n');
        }
        template
    };
}

pub fn is_valid_submission(text: &str) -> bool {
    SUBMISSION_PATTERN.is_match(text)
}

pub fn validate_submission(text: &str) -> Result<(), SubmissionError> {
    if is_valid_submission(text) {
        Ok(())
    } else {
        Err(SubmissionError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[&str]) -> String {
        FIELD_LABELS
            .iter()
            .zip(values)
            .map(|(label, value)| format!("{}：{}", label, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_sample_submission_is_valid() {
        let text = "昵称：A\n性别：B\n年龄：C\n身高：D\n体重：E\n性格：F\n爱好：G\n性癖：H\n雷区：I\n在线时间：J\n想找的人：K\n联系方式：L";
        assert!(is_valid_submission(text));
        assert!(validate_submission(text).is_ok());
    }

    #[test]
    fn test_empty_values_are_accepted() {
        let text = filled(&[""; 12]);
        assert!(is_valid_submission(&text));
    }

    #[test]
    fn test_blank_template_body_is_valid() {
        // The template itself, minus its header, passes once pasted back
        let body = SUBMISSION_TEMPLATE
            .trim_start()
            .trim_start_matches("请使用以下模板进行投稿：")
            .trim_start();
        assert!(is_valid_submission(body));
    }

    #[test]
    fn test_trailing_content_is_tolerated() {
        let text = format!("{}\n\n补充说明：随便写点", filled(&["x"; 12]));
        assert!(is_valid_submission(&text));
    }

    #[test]
    fn test_leading_content_is_rejected() {
        let text = format!("你好\n{}", filled(&["x"; 12]));
        assert!(!is_valid_submission(&text));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        for skip in 0..FIELD_LABELS.len() {
            let text = FIELD_LABELS
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, label)| format!("{}：v", label))
                .collect::<Vec<_>>()
                .join("\n");
            assert!(!is_valid_submission(&text), "missing {}", FIELD_LABELS[skip]);
        }
    }

    #[test]
    fn test_reordered_fields_are_rejected() {
        let mut labels = FIELD_LABELS.to_vec();
        labels.swap(2, 3);
        let text = labels
            .iter()
            .map(|label| format!("{}：v", label))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(!is_valid_submission(&text));
    }

    #[test]
    fn test_missing_label_is_rejected() {
        let text = filled(&["v"; 12]).replacen("年龄：", "：", 1);
        assert!(!is_valid_submission(&text));
    }

    #[test]
    fn test_ascii_colon_is_rejected() {
        let text = filled(&["v"; 12]).replacen("昵称：", "昵称:", 1);
        assert!(!is_valid_submission(&text));
    }

    #[test]
    fn test_fields_joined_on_one_line_are_rejected() {
        let text = filled(&["v"; 12]).replacen('\n', " ", 1);
        assert!(matches!(
            validate_submission(&text),
            Err(SubmissionError::Validation)
        ));
    }

    #[test]
    fn test_template_lists_every_label() {
        for label in FIELD_LABELS {
            assert!(SUBMISSION_TEMPLATE.contains(&format!("{}：\n", label)));
        }
    }
}
