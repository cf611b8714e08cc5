//! Line-oriented prompts over any reader/writer pair.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::{Context, Result};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line of text.
    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn warn(&mut self, text: impl Display) -> Result<()> {
        self.say(format_args!("Warning: {text}"))
    }

    /// Ask for one line. Fails if input is exhausted.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .context("failed to read input")?;
        if read == 0 {
            anyhow::bail!("input ended before the session finished");
        }
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Free text; an empty answer yields `default`.
    pub fn text(&mut self, prompt: &str, default: &str) -> Result<String> {
        let answer = if default.is_empty() {
            self.line(prompt)?
        } else {
            self.line(&format!("{prompt} [{default}]"))?
        };
        if answer.trim().is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.trim().to_string())
        }
    }

    pub fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.line(&format!("{prompt} {hint}"))?;
            match answer.trim().to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer y or n.")?,
            }
        }
    }

    /// Pick one of `options` by number. Returns its index.
    pub fn choose(&mut self, prompt: &str, options: &[&str], default: usize) -> Result<usize> {
        self.say(prompt)?;
        for (i, option) in options.iter().enumerate() {
            self.say(format_args!("  {}) {option}", i + 1))?;
        }
        loop {
            let answer = self.line(&format!("Choice [{}]", default + 1))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => self.say(format_args!(
                    "Please enter a number between 1 and {}.",
                    options.len()
                ))?,
            }
        }
    }

    /// A number within `range`; an empty answer yields `default`.
    pub fn number<T>(&mut self, prompt: &str, default: T, range: RangeInclusive<T>) -> Result<T>
    where
        T: FromStr + PartialOrd + Display + Copy,
    {
        loop {
            let answer = self.line(&format!("{prompt} [{default}]"))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<T>() {
                Ok(n) if range.contains(&n) => return Ok(n),
                _ => self.say(format_args!(
                    "Please enter a number between {} and {}.",
                    range.start(),
                    range.end()
                ))?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn text_uses_default_on_empty() {
        let mut p = prompter("\n  Bob \n");
        assert_eq!(p.text("Occupation", "Student").unwrap(), "Student");
        assert_eq!(p.text("Name", "").unwrap(), "Bob");
    }

    #[test]
    fn choose_retries_until_valid() {
        let mut p = prompter("9\nabc\n2\n");
        assert_eq!(p.choose("Pick", &["a", "b", "c"], 0).unwrap(), 1);
        let out = String::from_utf8(p.output).unwrap();
        assert!(out.contains("  3) c"));
        assert_eq!(out.matches("Please enter a number between 1 and 3.").count(), 2);
    }

    #[test]
    fn number_checks_range() {
        let mut p = prompter("7\n200\n42\n\n");
        assert_eq!(p.number("Age", 25u32, 13..=120).unwrap(), 42);
        assert_eq!(p.number("Age", 25u32, 13..=120).unwrap(), 25);
    }

    #[test]
    fn confirm_parses_answers() {
        let mut p = prompter("maybe\nY\n\n");
        assert!(p.confirm("Agree?", false).unwrap());
        assert!(!p.confirm("Agree?", false).unwrap());
    }

    #[test]
    fn eof_is_an_error() {
        let mut p = prompter("");
        assert!(p.line("Anything").is_err());
    }
}
