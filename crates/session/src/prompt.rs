use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
    sync::{Mutex, PoisonError},
};

/// Asks the operator a yes/no question. Implementations may block; callers
/// run them off the async executor.
pub trait Confirm: Send + Sync + 'static {
    fn confirm(&self, question: &str) -> bool;
}

/// Prompts on the controlling terminal. EOF or a read error counts as "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> bool {
        print!("{} (y/n) ", question);
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&line),
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Replays canned answers in order, then answers "no". Records every question.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::default(),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> bool {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(question.to_string());
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        for answer in ["y", "Y\n", " yes ", "YES\r\n"] {
            assert!(is_yes(answer), "{answer:?}");
        }
        for answer in ["", "n", "yep", "no", "\n"] {
            assert!(!is_yes(answer), "{answer:?}");
        }
    }

    #[test]
    fn scripted_runs_out_to_no() {
        let confirm = ScriptedConfirm::new([true]);
        assert!(confirm.confirm("first?"));
        assert!(!confirm.confirm("second?"));
        assert_eq!(confirm.questions(), vec!["first?", "second?"]);
    }
}
