use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use colored::Colorize;

/// Outcome of asking for a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer<T> {
    Value(T),
    /// A token arrived but did not parse; the rest of its line was dropped.
    Invalid,
    /// Input is exhausted.
    Eof,
}

/// Console reader that hands out whitespace-separated tokens, possibly
/// several per line, and writes prompts/messages to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Next token, reading more lines as needed. `None` at end of input.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    /// Forgets whatever is left of the current line.
    pub fn discard_line(&mut self) {
        self.pending.clear();
    }

    pub fn ask_token(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.print(prompt)?;
        self.next_token()
    }

    /// Prompts and parses one token as `T`.
    pub fn ask<T: FromStr>(&mut self, prompt: &str) -> io::Result<Answer<T>> {
        let token = match self.ask_token(prompt)? {
            Some(token) => token,
            None => return Ok(Answer::Eof),
        };
        match token.parse::<T>() {
            Ok(value) => Ok(Answer::Value(value)),
            Err(_) => {
                self.discard_line();
                Ok(Answer::Invalid)
            }
        }
    }

    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text.red())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
