//! Borrow request as captured by the borrow form.

use serde::{Deserialize, Serialize};

use lendkit_core::{DomainError, DomainResult};

use crate::record::Borrower;

/// Everything the borrower fills in before confirming a borrow.
///
/// `year` and `time_in` are required on the form but are not part of the
/// persisted record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub student_name: String,
    pub student_id: String,
    pub year: String,
    pub department: String,
    pub course: String,
    pub time_in: String,
    pub time_out: String,
    pub instructor: String,
}

impl BorrowRequest {
    /// Every field is required; the first blank one is reported.
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("student name", &self.student_name),
            ("student id", &self.student_id),
            ("year", &self.year),
            ("department", &self.department),
            ("course", &self.course),
            ("time in", &self.time_in),
            ("time out", &self.time_out),
            ("instructor", &self.instructor),
        ];

        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((label, _)) => Err(DomainError::validation(format!("{label} is required"))),
            None => Ok(()),
        }
    }

    pub fn borrower(&self) -> Borrower {
        Borrower {
            student_name: self.student_name.clone(),
            student_id: self.student_id.clone(),
            department: self.department.clone(),
            course: self.course.clone(),
            instructor: self.instructor.clone(),
        }
    }

    /// The requested "time out", stored as the record's initial return date.
    pub fn requested_return(&self) -> &str {
        &self.time_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> BorrowRequest {
        BorrowRequest {
            student_name: "Ana Cruz".to_string(),
            student_id: "2021-0042".to_string(),
            year: "2nd Year".to_string(),
            department: "CEIT".to_string(),
            course: "BSCE".to_string(),
            time_in: "1:00 PM".to_string(),
            time_out: "3:00 PM".to_string(),
            instructor: "Engr. Santos".to_string(),
        }
    }

    #[test]
    fn complete_request_is_valid() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn blank_field_is_named_in_error() {
        let mut request = filled();
        request.instructor = "   ".to_string();
        assert_eq!(
            request.validate(),
            Err(DomainError::validation("instructor is required"))
        );
    }

    #[test]
    fn borrower_drops_form_only_fields() {
        let borrower = filled().borrower();
        assert_eq!(borrower.department, "CEIT");
        assert_eq!(borrower.student_id, "2021-0042");
        assert_eq!(filled().requested_return(), "3:00 PM");
    }
}
