//! Score reports for one course across the students of one class.
//!
//! Every report lists every lab of the course exactly once, in lab order;
//! labs a student never submitted count as zero.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

use crate::db;
use crate::err::Error;
use crate::models::{Named, Report, ReportScore, Student, SubmittedScore};

#[derive(Debug, Clone, Serialize)]
pub struct Export {
    pub class: String,
    pub course: String,
    pub date: String,
    pub time: String,
    pub reports: Vec<Report>,
}

/// One row per lab of the course, carrying the student's score or zero.
pub fn reconcile(labs: &[Named], submitted: &HashMap<i32, i32>) -> Vec<ReportScore> {
    labs.iter()
        .map(|lab| ReportScore {
            lab_name: lab.name.clone(),
            score: submitted.get(&lab.id).copied().unwrap_or(0),
            id: lab.id,
        })
        .collect()
}

/// Average and total of a reconciled row; no labs averages to zero.
pub fn summarize(scores: &[ReportScore]) -> (f64, i64) {
    let total: i64 = scores.iter().map(|s| i64::from(s.score)).sum();
    if scores.is_empty() {
        return (0.0, total);
    }
    (total as f64 / scores.len() as f64, total)
}

/// Builds reports in student order from already fetched rows.
pub fn build(students: &[Student], labs: &[Named], scores: &[SubmittedScore]) -> Vec<Report> {
    let mut by_student: HashMap<i32, HashMap<i32, i32>> = HashMap::new();
    for row in scores {
        by_student
            .entry(row.user_id)
            .or_default()
            .insert(row.lab_id, row.score);
    }

    let none = HashMap::new();
    students
        .iter()
        .map(|student| {
            let submitted = by_student.get(&student.id).unwrap_or(&none);
            let scores = reconcile(labs, submitted);
            let (average, total) = summarize(&scores);
            Report {
                name: student.name.clone(),
                username: student.username.clone(),
                scores,
                average,
                total,
            }
        })
        .collect()
}

/// Looks up the course and class, then reports on every student of the class.
///
/// Unknown ids are `NotFound`; any later store failure aborts the whole export.
pub async fn export(pool: &PgPool, course_id: i32, class_id: i32) -> Result<Export, Error> {
    let course = db::courses::name_of(pool, course_id).await?;
    let class = db::classes::name_of(pool, class_id).await?;

    let students = db::users::in_class(pool, class_id).await?;
    let labs = db::labs::for_course(pool, course_id).await?;
    let scores = db::scores::for_class_course(pool, class_id, course_id).await?;
    let reports = build(&students, &labs, &scores);
    log::info!(
        "exported {} reports over {} labs for course `{}` / class `{}`",
        reports.len(),
        labs.len(),
        course,
        class
    );

    let now = Utc::now();
    Ok(Export {
        class,
        course,
        date: now.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M:%S").to_string(),
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(id: i32, name: &str) -> Named {
        Named {
            id,
            name: name.to_string(),
        }
    }

    fn student(id: i32, username: &str) -> Student {
        Student {
            id,
            username: username.to_string(),
            name: username.to_uppercase(),
        }
    }

    fn scored(user_id: i32, lab_id: i32, score: i32) -> SubmittedScore {
        SubmittedScore {
            user_id,
            lab_id,
            score,
        }
    }

    #[test]
    fn missing_submissions_count_as_zero() {
        let labs = [lab(1, "golang-001"), lab(2, "golang-002")];
        let reports = build(&[student(7, "alice")], &labs, &[scored(7, 2, 80)]);

        assert_eq!(reports.len(), 1);
        let alice = &reports[0];
        assert_eq!(alice.username, "alice");
        assert_eq!(
            alice.scores,
            vec![
                ReportScore {
                    lab_name: "golang-001".to_string(),
                    score: 0,
                    id: 1
                },
                ReportScore {
                    lab_name: "golang-002".to_string(),
                    score: 80,
                    id: 2
                },
            ]
        );
        assert_eq!(alice.average, 40.0);
        assert_eq!(alice.total, 80);
    }

    #[test]
    fn every_student_gets_every_lab() {
        let labs = [lab(3, "a"), lab(1, "b"), lab(2, "c")];
        let students = [student(1, "alice"), student(2, "bob"), student(3, "carol")];
        let scores = [scored(1, 1, 10), scored(1, 2, 20), scored(1, 3, 30), scored(2, 2, 100)];
        let reports = build(&students, &labs, &scores);

        for report in &reports {
            assert_eq!(report.scores.len(), labs.len());
            let order: Vec<i32> = report.scores.iter().map(|s| s.id).collect();
            assert_eq!(order, vec![3, 1, 2]);
        }
        assert_eq!(reports[0].total, 60);
        assert_eq!(reports[1].total, 100);
        assert_eq!(reports[2].total, 0);
    }

    #[test]
    fn reports_follow_student_order() {
        let reports = build(&[student(9, "zed"), student(2, "amy")], &[lab(1, "x")], &[]);
        let names: Vec<&str> = reports.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["zed", "amy"]);
    }

    #[test]
    fn scores_of_other_students_do_not_leak() {
        let reports = build(&[student(1, "alice")], &[lab(1, "x")], &[scored(2, 1, 90)]);
        assert_eq!(reports[0].scores[0].score, 0);
    }

    #[test]
    fn course_without_labs_averages_to_zero() {
        let reports = build(&[student(1, "alice")], &[], &[]);
        assert_eq!(reports[0].average, 0.0);
        assert_eq!(reports[0].total, 0);
        assert!(reports[0].scores.is_empty());
    }

    #[test]
    fn empty_class_has_no_reports() {
        assert!(build(&[], &[lab(1, "x")], &[]).is_empty());
    }

    #[test]
    fn summary_divides_by_lab_count() {
        let scores = reconcile(
            &[lab(1, "a"), lab(2, "b"), lab(3, "c")],
            &HashMap::from([(1, 100), (3, 50)]),
        );
        assert_eq!(summarize(&scores), (50.0, 150));
    }
}
