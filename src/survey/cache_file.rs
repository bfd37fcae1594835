// A file-backed store of the answer options.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::survey::*;

pub const DEFAULT_CACHE_DIRECTORY: &str = ".question_cache";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct CachedOption {
    #[serde(rename = "questionId")]
    question_id: String,
    value: String,
    label: String,
    order: Option<u32>,
    #[serde(rename = "questionCode")]
    question_code: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    key: String,
    options: Vec<CachedOption>,
}

impl From<&AnswerOption> for CachedOption {
    fn from(o: &AnswerOption) -> CachedOption {
        CachedOption {
            question_id: o.question_id.clone(),
            value: o.value.clone(),
            label: o.label.clone(),
            order: o.order,
            question_code: o.question_code.clone(),
        }
    }
}

impl From<CachedOption> for AnswerOption {
    fn from(o: CachedOption) -> AnswerOption {
        AnswerOption {
            question_id: o.question_id,
            value: o.value,
            label: o.label,
            order: o.order,
            question_code: o.question_code,
        }
    }
}

/// Keeps one file per survey. An entry written for other questions or
/// options is ignored.
///
/// Failing to read or write the file is not an error: the options are
/// recomputed.
#[derive(Debug, Clone)]
pub struct FileOptionCache {
    path: PathBuf,
}

impl FileOptionCache {
    /// An empty directory stands for the default one, in the working directory.
    pub fn new(directory: &str, survey_id: Option<&str>) -> FileOptionCache {
        let directory = if directory.is_empty() {
            DEFAULT_CACHE_DIRECTORY
        } else {
            directory
        };
        let file_name = format!("survey_{}_options.json", survey_id.unwrap_or("default"));
        FileOptionCache {
            path: PathBuf::from(directory).join(file_name),
        }
    }

    fn read_entry(&self) -> SurveyResult<CacheEntry> {
        let path = self.path.display().to_string();
        let contents = fs::read_to_string(&self.path).context(OpeningFileSnafu { path: &path })?;
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })
    }

    fn write_entry(&self, entry: &CacheEntry) -> SurveyResult<()> {
        let path = self.path.display().to_string();
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context(WritingOutputSnafu { path: &path })?;
        }
        let js = serde_json::to_string_pretty(entry).context(SerializingJsonSnafu {})?;
        fs::write(&self.path, js).context(WritingOutputSnafu { path })
    }
}

impl OptionCache for FileOptionCache {
    fn get(&self, key: &str) -> Option<Vec<AnswerOption>> {
        if !self.path.exists() {
            return None;
        }
        match self.read_entry() {
            Ok(entry) if entry.key == key => {
                debug!("FileOptionCache: hit in {:?}", self.path);
                Some(entry.options.into_iter().map(AnswerOption::from).collect())
            }
            Ok(_) => {
                info!("FileOptionCache: {:?} is stale", self.path);
                None
            }
            Err(e) => {
                warn!("FileOptionCache: ignoring {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn put(&mut self, key: &str, options: &[AnswerOption]) {
        let entry = CacheEntry {
            key: key.to_string(),
            options: options.iter().map(CachedOption::from).collect(),
        };
        if let Err(e) = self.write_entry(&entry) {
            warn!("FileOptionCache: could not write {:?}: {}", self.path, e);
        }
    }
}
