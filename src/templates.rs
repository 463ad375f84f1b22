// src/templates.rs
use crate::models::{
    assignment::{Assignment, AssignmentOverview},
    feedback::Feedback,
    student::Student,
    submission::{AssignmentSubmissionRow, StatusRow, SubmissionDetail},
};
use askama::Template;

// The tracker page: three insert forms plus the status board
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub students: Vec<Student>,
    pub assignments: Vec<Assignment>,
    pub rows: Vec<StatusRow>,
    // Flash feedback carried over from the redirect after a POST
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub error: Option<String>,
    // Set after registration redirects here
    pub success: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "teacher_dashboard.html")]
pub struct TeacherDashboardPage {
    pub user_name: String,
    pub total_submissions: i64,
    pub graded: i64,
    pub pending: i64,
    pub assignments: Vec<AssignmentOverview>,
    pub students: Vec<Student>,
}

#[derive(Template)]
#[template(path = "assignment_detail.html")]
pub struct AssignmentDetailPage {
    pub assignment: Assignment,
    pub submissions: Vec<AssignmentSubmissionRow>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "review_submission.html")]
pub struct ReviewSubmissionPage {
    pub submission: SubmissionDetail,
    // Present when this submission was reviewed before; prefills the form
    pub feedback: Option<Feedback>,
    pub error_message: Option<String>,
}

// One line of the per-student report, with the percentage precomputed
#[derive(Clone, Debug)]
pub struct ReportLine {
    pub assignment_title: String,
    pub submitted_on: String,
    pub score: f64,
    pub max_score: f64,
    pub percent: f64,
}

#[derive(Template)]
#[template(path = "student_report.html")]
pub struct StudentReportPage<'a> {
    pub student: &'a Student,
    pub lines: &'a [ReportLine],
    pub overall: f64,
}
