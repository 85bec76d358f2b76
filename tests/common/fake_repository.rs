//! # Scripted Fake Repository
//!
//! Records every call and answers from per-operation scripts. An empty
//! script falls back to a harmless default: list operations return an empty
//! list and create operations echo the request with a fresh id.

use async_trait::async_trait;
use gradeline::{AverageResponse, Grade, GradePatch, GradesRepository, Outcome, Student, Subject};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// One repository call as the controller issued it
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListStudents,
    CreateStudent(String),
    ListSubjects,
    CreateSubject(String),
    ListGrades(Option<i64>, Option<i64>),
    CreateGrade {
        student_id: i64,
        subject_id: i64,
        score: f64,
    },
    UpdateGrade(i64, GradePatch),
    SubjectAverage(i64),
}

/// Scripted answer to one call
pub enum Step<T> {
    Reply(Outcome<T>),
    /// Hold the answer until the paired [`Gate`] is opened.
    Gated(oneshot::Receiver<()>, Outcome<T>),
    Panic(&'static str),
}

/// Releases a [`Step::Gated`] answer.
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

impl<T> Step<T> {
    pub fn gated(outcome: Outcome<T>) -> (Gate, Self) {
        let (sender, receiver) = oneshot::channel();
        (Gate(sender), Step::Gated(receiver, outcome))
    }

    async fn resolve(self) -> Outcome<T> {
        match self {
            Step::Reply(outcome) => outcome,
            Step::Gated(receiver, outcome) => {
                let _ = receiver.await;
                outcome
            }
            Step::Panic(message) => panic!("{message}"),
        }
    }
}

type Script<T> = Mutex<VecDeque<Step<T>>>;
type GradesKey = (Option<i64>, Option<i64>);

#[derive(Default)]
pub struct FakeRepository {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicI64,
    students: Script<Vec<Student>>,
    create_student: Script<Student>,
    subjects: Script<Vec<Subject>>,
    create_subject: Script<Subject>,
    grades: Mutex<HashMap<GradesKey, VecDeque<Step<Vec<Grade>>>>>,
    create_grade: Script<Grade>,
    update_grade: Script<Grade>,
    averages: Script<AverageResponse>,
}

impl FakeRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI64::new(100),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn script_students(&self, step: Step<Vec<Student>>) {
        self.students.lock().unwrap().push_back(step);
    }

    pub fn script_create_student(&self, step: Step<Student>) {
        self.create_student.lock().unwrap().push_back(step);
    }

    pub fn script_subjects(&self, step: Step<Vec<Subject>>) {
        self.subjects.lock().unwrap().push_back(step);
    }

    pub fn script_create_subject(&self, step: Step<Subject>) {
        self.create_subject.lock().unwrap().push_back(step);
    }

    /// Script the answer for one filter pair.
    pub fn script_grades(
        &self,
        student_filter: Option<i64>,
        subject_filter: Option<i64>,
        step: Step<Vec<Grade>>,
    ) {
        self.grades
            .lock()
            .unwrap()
            .entry((student_filter, subject_filter))
            .or_default()
            .push_back(step);
    }

    pub fn script_create_grade(&self, step: Step<Grade>) {
        self.create_grade.lock().unwrap().push_back(step);
    }

    pub fn script_update_grade(&self, step: Step<Grade>) {
        self.update_grade.lock().unwrap().push_back(step);
    }

    pub fn script_average(&self, step: Step<AverageResponse>) {
        self.averages.lock().unwrap().push_back(step);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn fresh_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

fn next<T>(script: &Script<T>) -> Option<Step<T>> {
    script.lock().unwrap().pop_front()
}

async fn answer<T>(step: Option<Step<T>>, fallback: impl FnOnce() -> Outcome<T>) -> Outcome<T> {
    match step {
        Some(step) => step.resolve().await,
        None => fallback(),
    }
}

#[async_trait]
impl GradesRepository for FakeRepository {
    async fn list_students(&self) -> Outcome<Vec<Student>> {
        self.record(Call::ListStudents);
        answer(next(&self.students), || Ok(Vec::new())).await
    }

    async fn create_student(&self, name: &str) -> Outcome<Student> {
        self.record(Call::CreateStudent(name.to_string()));
        let id = self.fresh_id();
        answer(next(&self.create_student), || Ok(Student::new(id, name))).await
    }

    async fn list_subjects(&self) -> Outcome<Vec<Subject>> {
        self.record(Call::ListSubjects);
        answer(next(&self.subjects), || Ok(Vec::new())).await
    }

    async fn create_subject(&self, name: &str) -> Outcome<Subject> {
        self.record(Call::CreateSubject(name.to_string()));
        let id = self.fresh_id();
        answer(next(&self.create_subject), || Ok(Subject::new(id, name))).await
    }

    async fn list_grades(
        &self,
        student_filter: Option<i64>,
        subject_filter: Option<i64>,
    ) -> Outcome<Vec<Grade>> {
        self.record(Call::ListGrades(student_filter, subject_filter));
        let step = self
            .grades
            .lock()
            .unwrap()
            .get_mut(&(student_filter, subject_filter))
            .and_then(VecDeque::pop_front);
        answer(step, || Ok(Vec::new())).await
    }

    async fn create_grade(&self, student_id: i64, subject_id: i64, score: f64) -> Outcome<Grade> {
        self.record(Call::CreateGrade {
            student_id,
            subject_id,
            score,
        });
        let id = self.fresh_id();
        answer(next(&self.create_grade), || {
            Ok(Grade::new(id, student_id, subject_id, score))
        })
        .await
    }

    async fn update_grade(&self, grade_id: i64, patch: GradePatch) -> Outcome<Grade> {
        self.record(Call::UpdateGrade(grade_id, patch.clone()));
        answer(next(&self.update_grade), || {
            Ok(Grade::new(
                grade_id,
                patch.student_id.unwrap_or(1),
                patch.subject_id.unwrap_or(1),
                patch.score.unwrap_or_default(),
            ))
        })
        .await
    }

    async fn get_subject_average(&self, subject_id: i64) -> Outcome<AverageResponse> {
        self.record(Call::SubjectAverage(subject_id));
        answer(next(&self.averages), || {
            Ok(AverageResponse {
                subject_id,
                subject_name: format!("Subject {subject_id}"),
                average: None,
                count: 0,
            })
        })
        .await
    }
}
