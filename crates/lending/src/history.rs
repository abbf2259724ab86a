//! Read-only history views over returned borrow records.
//!
//! These are pure functions of their input: no storage access, no clock.

use serde::Serialize;

use crate::record::BorrowRecord;

/// Number of returned records for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub department: String,
    pub borrower_count: usize,
}

/// Group returned records by department.
///
/// Departments appear in first-seen order and records keep their input order
/// within a group. Records that are not `Returned` are dropped.
pub fn group_returned_by_department(records: &[BorrowRecord]) -> Vec<(String, Vec<BorrowRecord>)> {
    let mut groups: Vec<(String, Vec<BorrowRecord>)> = Vec::new();

    for record in records.iter().filter(|r| r.is_returned()) {
        match groups.iter_mut().find(|(dept, _)| dept == record.department()) {
            Some((_, group)) => group.push(record.clone()),
            None => groups.push((record.department().to_string(), vec![record.clone()])),
        }
    }

    groups
}

/// Returned records for exactly one department (case-sensitive match).
pub fn filter_by_department(records: &[BorrowRecord], department: &str) -> Vec<BorrowRecord> {
    records
        .iter()
        .filter(|r| r.is_returned() && r.department() == department)
        .cloned()
        .collect()
}

/// Per-department counts of returned records, in first-seen order.
pub fn department_summaries(records: &[BorrowRecord]) -> Vec<DepartmentSummary> {
    group_returned_by_department(records)
        .into_iter()
        .map(|(department, group)| DepartmentSummary {
            department,
            borrower_count: group.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BorrowStatus, Borrower, ItemSnapshot, RecordId};
    use chrono::NaiveDate;
    use lendkit_inventory::ItemId;
    use proptest::prelude::*;

    fn test_record(id: u32, department: &str, returned: bool) -> BorrowRecord {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut record = BorrowRecord::open(
            RecordId::new(id.to_string()),
            Borrower {
                student_name: format!("student-{id}"),
                student_id: id.to_string(),
                department: department.to_string(),
                course: "BSIT".to_string(),
                instructor: "Prof. Reyes".to_string(),
            },
            ItemSnapshot {
                item_id: ItemId::from("1"),
                item_name: "Oscilloscope".to_string(),
                image_url: String::new(),
            },
            "5:00 PM",
            today,
        );
        if returned {
            record.mark_returned(today);
        }
        record
    }

    fn ids(records: &[BorrowRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn groups_in_first_seen_order() {
        let records = vec![
            test_record(1, "CTE", true),
            test_record(2, "CEIT", true),
            test_record(3, "CTE", true),
            test_record(4, "CAS", false),
        ];

        let groups = group_returned_by_department(&records);
        let depts: Vec<&str> = groups.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(depts, vec!["CTE", "CEIT"]);
        assert_eq!(ids(&groups[0].1), vec!["1", "3"]);
        assert_eq!(ids(&groups[1].1), vec!["2"]);
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(group_returned_by_department(&[]).is_empty());
    }

    #[test]
    fn filter_is_case_sensitive_and_returned_only() {
        let records = vec![
            test_record(1, "CEIT", true),
            test_record(2, "ceit", true),
            test_record(3, "CEIT", false),
        ];
        assert_eq!(ids(&filter_by_department(&records, "CEIT")), vec!["1"]);
        assert!(filter_by_department(&records, "COT").is_empty());
    }

    #[test]
    fn summaries_count_returned_records() {
        let records = vec![
            test_record(1, "COT", true),
            test_record(2, "COT", true),
            test_record(3, "CAS", true),
        ];
        assert_eq!(
            department_summaries(&records),
            vec![
                DepartmentSummary { department: "COT".to_string(), borrower_count: 2 },
                DepartmentSummary { department: "CAS".to_string(), borrower_count: 1 },
            ]
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: grouping is deterministic and only ever contains returned records.
        #[test]
        fn grouping_is_pure_and_returned_only(
            layout in prop::collection::vec((0usize..4, any::<bool>()), 0..40)
        ) {
            let departments = ["CEIT", "CTE", "COT", "CAS"];
            let records: Vec<BorrowRecord> = layout
                .iter()
                .enumerate()
                .map(|(i, (d, returned))| test_record(i as u32, departments[*d], *returned))
                .collect();

            let first = group_returned_by_department(&records);
            let second = group_returned_by_department(&records);
            prop_assert_eq!(&first, &second);

            let grouped: usize = first.iter().map(|(_, g)| g.len()).sum();
            let returned = records.iter().filter(|r| r.status == BorrowStatus::Returned).count();
            prop_assert_eq!(grouped, returned);
            for (dept, group) in &first {
                prop_assert!(group.iter().all(|r| r.is_returned() && r.department() == dept));
            }
        }
    }
}
