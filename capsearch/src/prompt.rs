use crate::models::{is_valid_language_code, SearchMode, SearchRequest, DEFAULT_LANGUAGE};
use crate::services::enumerator::split_id_list;
use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChoice {
    Channel,
    Video,
    File,
}

/// Question/answer loop on any reader/writer pair. Invalid answers are asked again.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            return Err(anyhow!("input closed before the search was configured"));
        }
        Ok(line.trim().to_string())
    }

    fn complain(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Returns a new key when none is stored or the user wants to replace it.
    pub fn api_key(&mut self, stored: Option<&str>) -> Result<Option<String>> {
        if stored.is_some() {
            let answer = self.ask("Do you want to change the API key? (y/n): ")?;
            if !answer.eq_ignore_ascii_case("y") {
                return Ok(None);
            }
        }

        loop {
            let key = self.ask("YouTube Data API key: ")?;
            if !key.is_empty() {
                return Ok(Some(key));
            }
            self.complain("Invalid API key. Please enter a valid API key.")?;
        }
    }

    pub fn mode(&mut self) -> Result<ModeChoice> {
        loop {
            let answer = self.ask(
                "Search mode: Channel ID, video ID(s) or ID file? \
                 Enter 'channel', 'video' or 'file': ",
            )?;
            let answer = answer.to_lowercase();
            match answer.as_str() {
                "channel" => return Ok(ModeChoice::Channel),
                "video" => return Ok(ModeChoice::Video),
                "file" => return Ok(ModeChoice::File),
                _ => self.complain("Invalid input. Please enter 'channel', 'video' or 'file'.")?,
            }
        }
    }

    pub fn search_mode(&mut self, choice: ModeChoice) -> Result<SearchMode> {
        match choice {
            ModeChoice::Channel => {
                let channel = self.non_empty(
                    "Channel ID, URL or @handle to search: ",
                    "Invalid Channel ID. Please enter a valid Channel ID.",
                )?;
                let count = self.positive_number()?;
                Ok(SearchMode::Channel { channel, count })
            }
            ModeChoice::Video => loop {
                let ids = split_id_list(&self.ask("Enter video ID(s) separated by commas: ")?);
                if !ids.is_empty() {
                    return Ok(SearchMode::ExplicitList(ids));
                }
                self.complain("Error: No video IDs provided.")?;
            },
            ModeChoice::File => {
                let path = self.non_empty(
                    "Path to a file with one video ID per line: ",
                    "Please enter a file path.",
                )?;
                Ok(SearchMode::FileList(PathBuf::from(path)))
            }
        }
    }

    fn non_empty(&mut self, question: &str, complaint: &str) -> Result<String> {
        loop {
            let answer = self.ask(question)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.complain(complaint)?;
        }
    }

    fn positive_number(&mut self) -> Result<usize> {
        loop {
            let answer = self.ask("Number of videos to search (starts from newest video): ")?;
            match answer.parse::<usize>() {
                Ok(n) if n > 0 => return Ok(n),
                Ok(_) => self.complain("Invalid input. Please enter a positive integer.")?,
                Err(_) => self.complain("Invalid input. Please enter a valid number.")?,
            }
        }
    }

    pub fn language(&mut self) -> Result<String> {
        loop {
            let question = format!("Caption language code (default: {DEFAULT_LANGUAGE}): ");
            let answer = self.ask(&question)?;
            if answer.is_empty() {
                return Ok(DEFAULT_LANGUAGE.to_string());
            }
            if is_valid_language_code(&answer) {
                return Ok(answer);
            }
            self.complain(
                "Invalid input. Please enter a valid language code such as 'en' or 'pt-BR'.",
            )?;
        }
    }

    pub fn phrase(&mut self) -> Result<String> {
        self.non_empty(
            "Enter the word (or phrase) to search in the captions: ",
            "Please enter a word or phrase.",
        )
    }

    /// Mode parameters, language and phrase for an already chosen mode.
    pub fn request(&mut self, choice: ModeChoice) -> Result<SearchRequest> {
        let mode = self.search_mode(choice)?;
        let language = self.language()?;
        let phrase = self.phrase()?;
        Ok(SearchRequest::new(mode, &phrase, &language)?)
    }
}
