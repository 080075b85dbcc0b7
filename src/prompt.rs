//! Interactive terminal prompts.
//!
//! Workflows only see the [`Prompter`] trait so they can run against
//! scripted answers in tests. [`TerminalPrompter`] reads answers line by line
//! from any reader, which is stdin for the binary.
use color_eyre::eyre::eyre;
use nucleo_matcher::{
    Config, Matcher,
    pattern::{CaseMatching, Normalization, Pattern},
};
use secrecy::SecretString;
use std::{
    cmp::Reverse,
    io::{self, BufRead, Write},
    sync::Mutex,
};

use crate::result::Result;

#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    /// Free text input, trimmed.
    fn input(&self, message: &str) -> Result<String>;
    /// Choose one of `options`.
    fn select(&self, message: &str, options: &[String]) -> Result<String>;
    /// Choose one of `options` after narrowing them with a fuzzy search.
    fn search_select(&self, message: &str, options: &[String]) -> Result<String>;
    /// Yes or no. Anything other than `y` or `yes` is no.
    fn confirm(&self, message: &str) -> Result<bool>;
    fn secret(&self, message: &str) -> Result<SecretString>;
}

/// Options matching `query`, best match first. An empty query matches
/// everything in the original order.
pub fn fuzzy_filter(query: &str, options: &[String]) -> Vec<String> {
    let query = query.trim();

    if query.is_empty() {
        return options.to_vec();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);

    let mut matches =
        Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart)
            .match_list(options.iter(), &mut matcher);

    matches.sort_by_key(|&(_, score)| Reverse(score));

    matches.into_iter().map(|(option, _)| option.clone()).collect()
}

/// Resolve a select answer given either as a 1-based index or as the option
/// text itself.
fn pick(answer: &str, options: &[String]) -> Option<String> {
    let answer = answer.trim();

    if let Ok(index) = answer.parse::<usize>()
        && index >= 1
        && index <= options.len()
    {
        return Some(options[index - 1].clone());
    }

    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(answer))
        .cloned()
}

/// [`Prompter`] that writes questions to `output` and reads answers from
/// `input`.
pub struct TerminalPrompter<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl TerminalPrompter<io::BufReader<io::Stdin>, io::Stdout> {
    /// Prompter bound to the process terminal.
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| eyre!("prompt output is poisoned"))?;
        write!(output, "{text}")?;
        output.flush()?;
        Ok(())
    }

    /// Read one line. `None` at end of input.
    fn read_line(&self) -> Result<Option<String>> {
        let mut input = self
            .input
            .lock()
            .map_err(|_| eyre!("prompt input is poisoned"))?;
        let mut line = String::new();

        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    fn ask(&self, message: &str) -> Result<String> {
        self.write(&format!("{message} "))?;
        self.read_line()?
            .ok_or_else(|| eyre!("no answer given for prompt: {message}"))
    }

    fn list(&self, options: &[String]) -> Result<()> {
        let listing = options
            .iter()
            .enumerate()
            .map(|(i, o)| format!("  {}) {o}\n", i + 1))
            .collect::<String>();
        self.write(&listing)
    }
}

impl<R, W> Prompter for TerminalPrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn input(&self, message: &str) -> Result<String> {
        self.ask(message)
    }

    fn select(&self, message: &str, options: &[String]) -> Result<String> {
        if options.is_empty() {
            return Err(eyre!("there is nothing to choose from for: {message}"));
        }

        loop {
            self.write(&format!("{message}\n"))?;
            self.list(options)?;

            let answer = self.ask(">")?;

            if let Some(choice) = pick(&answer, options) {
                return Ok(choice);
            }

            self.write(&format!("'{answer}' is not one of the options.\n"))?;
        }
    }

    fn search_select(&self, message: &str, options: &[String]) -> Result<String> {
        if options.is_empty() {
            return Err(eyre!("there is nothing to choose from for: {message}"));
        }

        loop {
            let query = self.ask(&format!("{message} (type to search):"))?;
            let matches = fuzzy_filter(&query, options);

            if matches.is_empty() {
                self.write(&format!("No matches for '{query}'.\n"))?;
                continue;
            }

            if let Some(exact) =
                matches.iter().find(|m| m.eq_ignore_ascii_case(&query))
            {
                return Ok(exact.clone());
            }

            if matches.len() == 1 {
                return Ok(matches[0].clone());
            }

            self.list(&matches)?;
            let answer = self.ask(">")?;

            if let Some(choice) = pick(&answer, &matches) {
                return Ok(choice);
            }
        }
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        self.write(&format!("{message} [y/N]: "))?;

        match self.read_line()? {
            Some(answer) => {
                let answer = answer.to_lowercase();
                Ok(answer == "y" || answer == "yes")
            }
            None => Ok(false),
        }
    }

    fn secret(&self, message: &str) -> Result<SecretString> {
        let value = self.ask(message)?;
        Ok(SecretString::from(value))
    }
}
