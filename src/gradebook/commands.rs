//! # User Intents
//!
//! Maps typed command lines onto controller operations. Parsing is pure;
//! applying an intent is done by the app controller.

use thiserror::Error;

/// A single user intent.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    Refresh,
    StudentNameInput(String),
    SubmitStudent,
    SubjectNameInput(String),
    SubmitSubject,
    StudentFilter(Option<i64>),
    SubjectFilter(Option<i64>),
    ToggleAddGradeForm,
    AddGradeStudent(Option<i64>),
    AddGradeSubject(Option<i64>),
    AddGradeScore(String),
    SubmitGrade,
    UpdateGradeScore { grade_id: i64, score: String },
    SubjectAverage(i64),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

pub const HELP_TEXT: &str = "\
Commands:
  refresh                   reload students, subjects and grades
  student <name>            type a student name
  add-student               create the typed student
  subject <name>            type a subject name
  add-subject               create the typed subject
  filter-student <id|->     filter grades by student
  filter-subject <id|->     filter grades by subject
  form                      show or hide the new grade form
  grade-student <id|->      pick the new grade's student
  grade-subject <id|->      pick the new grade's subject
  score <value>             type the new grade's score
  submit-grade              create the new grade
  set-score <id> <value>    change the score of an existing grade
  average <subject id>      show a subject's average
  show                      print the current state
  quit                      leave";

/// Parse one input line. Blank lines are not intents and yield `Ok(None)`.
pub fn parse_intent(line: &str) -> Result<Option<UserIntent>, IntentError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let intent = match command.to_lowercase().as_str() {
        "refresh" => UserIntent::Refresh,
        "student" => UserIntent::StudentNameInput(rest.to_string()),
        "add-student" => UserIntent::SubmitStudent,
        "subject" => UserIntent::SubjectNameInput(rest.to_string()),
        "add-subject" => UserIntent::SubmitSubject,
        "filter-student" => UserIntent::StudentFilter(optional_id("filter-student", rest)?),
        "filter-subject" => UserIntent::SubjectFilter(optional_id("filter-subject", rest)?),
        "form" => UserIntent::ToggleAddGradeForm,
        "grade-student" => UserIntent::AddGradeStudent(optional_id("grade-student", rest)?),
        "grade-subject" => UserIntent::AddGradeSubject(optional_id("grade-subject", rest)?),
        "score" => UserIntent::AddGradeScore(rest.to_string()),
        "submit-grade" => UserIntent::SubmitGrade,
        "set-score" => {
            let (id, score) = rest
                .split_once(char::is_whitespace)
                .ok_or(IntentError::BadArgument {
                    command: "set-score",
                    expected: "a grade id and a score",
                })?;
            UserIntent::UpdateGradeScore {
                grade_id: required_id("set-score", id)?,
                score: score.trim().to_string(),
            }
        }
        "average" => UserIntent::SubjectAverage(required_id("average", rest)?),
        "show" => UserIntent::Show,
        "help" | "?" => UserIntent::Help,
        "quit" | "exit" => UserIntent::Quit,
        _ => return Err(IntentError::UnknownCommand(command.to_string())),
    };

    Ok(Some(intent))
}

fn required_id(command: &'static str, text: &str) -> Result<i64, IntentError> {
    text.trim().parse().map_err(|_| IntentError::BadArgument {
        command,
        expected: "a numeric id",
    })
}

/// `-` or nothing clears the selection.
fn optional_id(command: &'static str, text: &str) -> Result<Option<i64>, IntentError> {
    match text.trim() {
        "" | "-" => Ok(None),
        id => required_id(command, id).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_should_not_be_an_intent() {
        assert_eq!(parse_intent("   "), Ok(None));
    }

    #[test]
    fn name_input_should_keep_inner_spaces() {
        assert_eq!(
            parse_intent("student  Anna Maria "),
            Ok(Some(UserIntent::StudentNameInput("Anna Maria".to_string())))
        );
        assert_eq!(
            parse_intent("student"),
            Ok(Some(UserIntent::StudentNameInput(String::new())))
        );
    }

    #[test]
    fn filters_should_accept_id_or_dash() {
        assert_eq!(
            parse_intent("filter-student 5"),
            Ok(Some(UserIntent::StudentFilter(Some(5))))
        );
        assert_eq!(
            parse_intent("filter-subject -"),
            Ok(Some(UserIntent::SubjectFilter(None)))
        );
        assert_eq!(
            parse_intent("grade-student"),
            Ok(Some(UserIntent::AddGradeStudent(None)))
        );
    }

    #[test]
    fn non_numeric_id_should_be_rejected() {
        assert_eq!(
            parse_intent("average math"),
            Err(IntentError::BadArgument {
                command: "average",
                expected: "a numeric id"
            })
        );
    }

    #[test]
    fn set_score_should_need_two_arguments() {
        assert_eq!(
            parse_intent("set-score 3 4.5"),
            Ok(Some(UserIntent::UpdateGradeScore {
                grade_id: 3,
                score: "4.5".to_string()
            }))
        );
        assert!(parse_intent("set-score 3").is_err());
    }

    #[test]
    fn commands_should_be_case_insensitive() {
        assert_eq!(
            parse_intent("SUBMIT-GRADE"),
            Ok(Some(UserIntent::SubmitGrade))
        );
        assert_eq!(parse_intent("exit"), Ok(Some(UserIntent::Quit)));
    }

    #[test]
    fn unknown_command_should_be_reported() {
        assert_eq!(
            parse_intent("delete 4"),
            Err(IntentError::UnknownCommand("delete".to_string()))
        );
    }
}
