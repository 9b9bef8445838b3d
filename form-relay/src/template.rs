//! Email body rendering.
//!
//! Placeholders are replaced literally. Values are NOT HTML-escaped; the
//! rendered body is sent to the provider as raw HTML.

use crate::submission::Submission;

/// Built-in template used when `EMAIL_TEMPLATE` is not set.
pub const DEFAULT_TEMPLATE: &str = r#"
The following details have been submitted via <a href="https://graphnetworks.com.au/">https://graphnetworks.com.au/</a>
<br/>
<br/>
Name: {name}
<br/>
Company Name: {companyName}
<br/>
Company Industry: {companyIndustry}
<br/>
Email Address: {emailAddress}
<br/>
Phone Number: {phoneNumber}
<br/>
Message: {message}
"#;

/// Substitute every placeholder in `template` with the matching field.
///
/// Replacement runs field by field in declaration order, so a value that
/// itself contains a later placeholder gets substituted too.
pub fn render(template: &str, submission: &Submission) -> String {
    let placeholders = [
        ("{name}", submission.name.as_str()),
        ("{companyName}", submission.company_name.as_str()),
        ("{companyIndustry}", submission.company_industry.as_str()),
        ("{emailAddress}", submission.email_address.as_str()),
        ("{phoneNumber}", submission.phone_number.as_str()),
        ("{message}", submission.message.as_str()),
    ];

    placeholders
        .iter()
        .fold(template.to_string(), |body, &(placeholder, value)| {
            body.replace(placeholder, value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Submission {
        Submission {
            name: "A".to_string(),
            company_name: "B".to_string(),
            company_industry: "C".to_string(),
            email_address: "d@e.com".to_string(),
            phone_number: "123".to_string(),
            message: "hi".to_string(),
        }
    }

    #[test]
    fn test_default_template_substitution() {
        let body = render(DEFAULT_TEMPLATE, &sample());

        assert!(body.contains("Name: A"));
        assert!(body.contains("Company Name: B"));
        assert!(body.contains("Company Industry: C"));
        assert!(body.contains("Email Address: d@e.com"));
        assert!(body.contains("Phone Number: 123"));
        assert!(body.contains("Message: hi"));
        assert!(!body.contains('{'));
    }

    #[test]
    fn test_repeated_placeholders() {
        let body = render("{companyName} / {companyName}", &sample());
        assert_eq!(body, "B / B");
    }

    #[test]
    fn test_values_are_not_escaped() {
        let mut submission = sample();
        submission.message = "<b>urgent</b> & soon".to_string();

        let body = render("<p>{message}</p>", &submission);
        assert_eq!(body, "<p><b>urgent</b> & soon</p>");
    }

    #[test]
    fn test_empty_optional_fields() {
        let mut submission = sample();
        submission.name.clear();
        submission.message.clear();

        let body = render("[{name}][{message}]", &submission);
        assert_eq!(body, "[][]");
    }

    #[test]
    fn test_unknown_placeholders_left_alone() {
        let body = render("{website} {phoneNumber}", &sample());
        assert_eq!(body, "{website} 123");
    }
}
