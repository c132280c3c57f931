//! The dormitory and course registration schemas

use super::field::{FieldSpec, FieldValue, Rule};
use super::schema::FormSchema;
use crate::config::DeskConfig;
use crate::error::FormError;
use regex::Regex;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub const DORMITORY_SUCCESS_MESSAGE: &str = "Registration successful! Welcome to your new dorm.";
pub const COURSE_SUCCESS_MESSAGE: &str = "Registration successful! Welcome aboard.";

fn compile(key: &str, pattern: &str) -> Result<Regex, FormError> {
    Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
        key: key.to_string(),
        source,
    })
}

fn email_rule() -> Result<Rule, FormError> {
    Ok(Rule::pattern(
        compile("email", EMAIL_PATTERN)?,
        "Enter a valid email address",
    ))
}

fn phone_rule(key: &str, config: &DeskConfig) -> Result<Rule, FormError> {
    Ok(Rule::pattern(
        compile(key, config.phone_pattern())?,
        "Enter a valid phone number (e.g. 0912345678)",
    ))
}

/// University dormitory registration
pub fn dormitory_schema(config: &DeskConfig) -> Result<FormSchema, FormError> {
    let domains = config.allowed_email_domains();
    let domain_message = format!("Use your university email ({})", domains.join(" or "));

    let fields = vec![
        FieldSpec::text("fullName", "Full Name").required("Full name is required"),
        FieldSpec::text("studentId", "Student ID")
            .required("Student ID is required")
            .rule(Rule::pattern(
                compile("studentId", config.student_id_pattern())?,
                "Student ID format is invalid (e.g. UGR/1234/15)",
            )),
        FieldSpec::email("email", "University Email")
            .required("Email is required")
            .rule(email_rule()?)
            .rule(Rule::allowed_domains(domains, domain_message)),
        FieldSpec::phone("phone", "Phone Number")
            .required("Phone number is required")
            .rule(phone_rule("phone", config)?),
        FieldSpec::single_choice("gender", "Gender", &["Male", "Female"])
            .required("Select your gender"),
        FieldSpec::single_choice("roomType", "Room Type", &["Single", "Double", "Shared"])
            .required("Select a room type"),
        FieldSpec::date("arrivalDate", "Arrival Date (YYYY-MM-DD)")
            .required("Arrival date is required"),
        FieldSpec::date("departureDate", "Departure Date (YYYY-MM-DD)")
            .required("Departure date is required")
            .rule(Rule::not_before(
                "arrivalDate",
                "Departure date cannot be before arrival date",
            )),
        FieldSpec::multi_choice(
            "preferences",
            "Room Preferences",
            &[
                "Ground floor",
                "Quiet study area",
                "Near cafeteria",
                "Wheelchair access",
            ],
        ),
        FieldSpec::boolean("agreeToTerms", "I agree to the dormitory rules")
            .required("You must agree to the dormitory rules"),
    ];

    Ok(FormSchema::new(
        "Dormitory Registration",
        config.dormitory_endpoint(),
        DORMITORY_SUCCESS_MESSAGE,
        fields,
    )?
    .with_constants(config.dormitory_constants()))
}

/// Course registration
pub fn course_schema(config: &DeskConfig) -> Result<FormSchema, FormError> {
    let fields = vec![
        FieldSpec::text("fullName", "Full Name").required("Full name is required"),
        FieldSpec::email("email", "Email")
            .required("Email is required")
            .rule(email_rule()?),
        FieldSpec::phone("phone", "Phone Number")
            .required("Phone number is required")
            .rule(phone_rule("phone", config)?),
        FieldSpec::multi_choice(
            "courses",
            "Courses",
            &[
                "Web Development",
                "Data Science",
                "Mobile Apps",
                "UI/UX Design",
                "Cloud Computing",
            ],
        )
        .required("Select at least one course"),
        FieldSpec::single_choice(
            "schedule",
            "Preferred Schedule",
            &["Morning", "Afternoon", "Evening", "Weekend"],
        )
        .with_default(FieldValue::choice("Morning"))
        .required("Select a schedule"),
        FieldSpec::date("startDate", "Start Date (YYYY-MM-DD)")
            .required("Start date is required"),
        FieldSpec::single_choice(
            "experience",
            "Experience Level",
            &["Beginner", "Intermediate", "Advanced"],
        )
        .required("Select your experience level"),
        FieldSpec::multiline("comments", "Comments (optional)"),
        FieldSpec::boolean("agreeToTerms", "I agree to the terms and conditions")
            .required("You must agree to the terms and conditions"),
    ];

    Ok(FormSchema::new(
        "Course Registration",
        config.course_endpoint(),
        COURSE_SUCCESS_MESSAGE,
        fields,
    )?
    .with_constants(config.course_constants()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DormitoryConfig;
    use crate::state::forms::FormEngine;

    #[test]
    fn test_dormitory_schema_builds_from_defaults() {
        let schema = dormitory_schema(&DeskConfig::default()).unwrap();
        assert_eq!(schema.endpoint, "/api/dormitory/register");
        assert_eq!(schema.len(), 10);
        assert!(schema.field("preferences").is_some());
        assert!(!schema.field("preferences").unwrap().is_required());
    }

    #[test]
    fn test_course_schema_builds_from_defaults() {
        let schema = course_schema(&DeskConfig::default()).unwrap();
        assert_eq!(schema.endpoint, "/api/courses/register");
        assert!(schema.field("comments").unwrap().is_multiline);
        assert_eq!(
            schema.default_values().get("schedule"),
            Some(&FieldValue::choice("Morning"))
        );
    }

    #[test]
    fn test_invalid_student_id_pattern_is_reported() {
        let config = DeskConfig {
            dormitory: DormitoryConfig {
                student_id_pattern: Some("([".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = dormitory_schema(&config).unwrap_err();
        assert!(matches!(err, FormError::InvalidPattern { ref key, .. } if key == "studentId"));
    }

    #[test]
    fn test_configured_domains_drive_validation() {
        let config = DeskConfig {
            dormitory: DormitoryConfig {
                allowed_email_domains: Some(vec!["@example.edu".to_string()]),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = FormEngine::new(dormitory_schema(&config).unwrap());

        engine
            .set_field("email", FieldValue::text("bob@students.aau.edu.et"))
            .unwrap();
        engine.validate();
        assert!(engine.error("email").is_some());

        engine
            .set_field("email", FieldValue::text("bob@example.edu"))
            .unwrap();
        engine.validate();
        assert!(engine.error("email").is_none());
    }

    #[test]
    fn test_student_id_shape() {
        let mut engine = FormEngine::new(dormitory_schema(&DeskConfig::default()).unwrap());
        for (raw, ok) in [
            ("UGR/1234/15", true),
            ("ugr/12345/16", true),
            ("1234", false),
            ("UGR-1234-15", false),
        ] {
            engine.set_field("studentId", FieldValue::text(raw)).unwrap();
            engine.validate();
            assert_eq!(engine.error("studentId").is_none(), ok, "{raw}");
        }
    }

    #[test]
    fn test_phone_shape() {
        let mut engine = FormEngine::new(course_schema(&DeskConfig::default()).unwrap());
        for (raw, ok) in [
            ("0912345678", true),
            ("+251712345678", true),
            ("091234567", false),
            ("0812345678", false),
        ] {
            engine.set_field("phone", FieldValue::text(raw)).unwrap();
            engine.validate();
            assert_eq!(engine.error("phone").is_none(), ok, "{raw}");
        }
    }

    #[test]
    fn test_course_requires_a_course() {
        let mut engine = FormEngine::new(course_schema(&DeskConfig::default()).unwrap());
        engine.validate();
        assert!(engine.error("courses").is_some());
        // schedule has a default, so it is already satisfied
        assert!(engine.error("schedule").is_none());

        engine
            .toggle_multi_choice("courses", "Data Science")
            .unwrap();
        engine.validate();
        assert!(engine.error("courses").is_none());
    }
}
