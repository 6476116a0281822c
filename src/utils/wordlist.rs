//! Wordlist input
//!
//! A [`WordSource`] yields candidates lazily, one per line, trimmed, with
//! blank lines dropped. Sources are restartable: every call to
//! [`WordSource::words`] starts again from the first line, which lets the
//! scanner count the list up front and then stream it.

use crate::error::{ScanError, ScanResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where candidates come from
#[derive(Debug, Clone)]
pub enum WordSource {
    /// Line-oriented text file, re-opened on every pass
    File(PathBuf),
    /// Words already in memory
    Memory(Arc<[String]>),
}

impl WordSource {
    /// Open a wordlist file, failing early if it cannot be read
    pub fn from_file<P: AsRef<Path>>(path: P) -> ScanResult<Self> {
        let path = path.as_ref().to_path_buf();
        File::open(&path).map_err(|e| ScanError::wordlist(&path, e))?;
        Ok(WordSource::File(path))
    }

    /// Build an in-memory source with the same trimming rules as files
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .filter_map(|w| normalize(w.as_ref()))
            .collect();
        WordSource::Memory(words.into())
    }

    /// Start a fresh pass over the candidates
    pub fn words(&self) -> ScanResult<Words> {
        match self {
            WordSource::File(path) => {
                let file = File::open(path).map_err(|e| ScanError::wordlist(path, e))?;
                Ok(Words::File {
                    path: path.clone(),
                    lines: BufReader::new(file).lines(),
                })
            }
            WordSource::Memory(words) => Ok(Words::Memory {
                words: Arc::clone(words),
                next: 0,
            }),
        }
    }

    /// Number of candidates, reading the whole source once
    ///
    /// Any read error surfaces here, before a single request is sent.
    pub fn count(&self) -> ScanResult<usize> {
        match self {
            WordSource::Memory(words) => Ok(words.len()),
            WordSource::File(_) => {
                let mut total = 0;
                for word in self.words()? {
                    word?;
                    total += 1;
                }
                Ok(total)
            }
        }
    }

    /// Short label for banners and logs
    pub fn describe(&self) -> String {
        match self {
            WordSource::File(path) => path.display().to_string(),
            WordSource::Memory(words) => format!("<{} words in memory>", words.len()),
        }
    }
}

/// Trim a raw line, dropping it if nothing is left
fn normalize(line: &str) -> Option<String> {
    let word = line.trim();
    if word.is_empty() {
        None
    } else {
        Some(word.to_string())
    }
}

/// One pass over a [`WordSource`]
pub enum Words {
    File {
        path: PathBuf,
        lines: Lines<BufReader<File>>,
    },
    Memory {
        words: Arc<[String]>,
        next: usize,
    },
}

impl Iterator for Words {
    type Item = ScanResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Words::File { path, lines } => loop {
                match lines.next()? {
                    Ok(line) => {
                        if let Some(word) = normalize(&line) {
                            return Some(Ok(word));
                        }
                    }
                    Err(e) => return Some(Err(ScanError::wordlist(path.as_path(), e))),
                }
            },
            Words::Memory { words, next } => {
                let word = words.get(*next)?.clone();
                *next += 1;
                Some(Ok(word))
            }
        }
    }
}
