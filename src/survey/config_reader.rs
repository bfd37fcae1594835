use crate::args::Args;
use crate::survey::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "surveyName")]
    pub survey_name: Option<String>,
    #[serde(rename = "surveyId")]
    pub survey_id: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileSources {
    #[serde(rename = "questionsPath")]
    pub questions_path: Option<String>,
    #[serde(rename = "optionsPath")]
    pub options_path: Option<String>,
    #[serde(rename = "responsesPath")]
    pub responses_path: Option<String>,
    #[serde(rename = "responsesProvider")]
    pub responses_provider: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurveyRules {
    #[serde(rename = "selectionRule")]
    pub selection_rule: Option<String>,
    #[serde(rename = "keepIncompleteResponses")]
    pub keep_incomplete_responses: Option<bool>,
    pub parallel: Option<bool>,
    #[serde(rename = "respectMaxAnswers")]
    pub respect_max_answers: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub sources: FileSources,
    #[serde(default)]
    pub rules: SurveyRules,
    #[serde(rename = "cacheDirectory")]
    pub cache_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ResponsesProvider {
    Json,
    Csv,
    Xlsx,
}

impl ResponsesProvider {
    pub fn parse(name: &str) -> SurveyResult<ResponsesProvider> {
        match name.to_lowercase().as_str() {
            "json" => Ok(ResponsesProvider::Json),
            "csv" => Ok(ResponsesProvider::Csv),
            "xlsx" | "excel" => Ok(ResponsesProvider::Xlsx),
            x => whatever!("unknown responses provider: {}", x),
        }
    }

    /// Guesses the format from the extension of the file, CSV by default.
    pub fn from_path(path: &str) -> ResponsesProvider {
        match Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("json") => ResponsesProvider::Json,
            Some("xlsx") => ResponsesProvider::Xlsx,
            _ => ResponsesProvider::Csv,
        }
    }
}

/// Everything needed for one run, after merging the configuration file and
/// the command line.
#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisInputs {
    pub survey_name: Option<String>,
    pub survey_id: Option<String>,
    pub questions_path: String,
    pub options_path: Option<String>,
    pub responses_path: String,
    pub provider: ResponsesProvider,
    pub excel_worksheet_name: Option<String>,
    pub output_path: Option<String>,
    pub keep_incomplete: bool,
    pub cache_directory: Option<String>,
    pub rules: AnalysisRules,
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let config_str = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(&config_str).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn validate_rules(survey_rules: &SurveyRules) -> SurveyResult<AnalysisRules> {
    let defaults = AnalysisRules::DEFAULT_RULES;
    let res = AnalysisRules {
        selection_rule: match survey_rules.selection_rule.as_deref() {
            None | Some("strict") => SelectionRule::Strict,
            Some("nonEmpty") => SelectionRule::NonEmpty,
            Some(x) => {
                whatever!("unknown selection rule {:?}: expected strict or nonEmpty", x)
            }
        },
        respect_max_answers: survey_rules
            .respect_max_answers
            .unwrap_or(defaults.respect_max_answers),
        parallel: survey_rules.parallel.unwrap_or(defaults.parallel),
    };
    Ok(res)
}

// Paths of the configuration file are relative to its directory.
fn config_path(root: &Path, p: &Option<String>) -> Option<String> {
    p.as_ref().map(|s| root.join(s).display().to_string())
}

/// Merges the configuration file, if any, and the command line. The command
/// line wins.
pub fn resolve_inputs(args: &Args) -> SurveyResult<AnalysisInputs> {
    let (config, root) = match &args.config {
        Some(path) => {
            let root = Path::new(path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (read_config(path)?, root)
        }
        None => (SurveyConfig::default(), Path::new(".").to_path_buf()),
    };
    let sources = &config.sources;

    let questions_path = match args
        .questions
        .clone()
        .or_else(|| config_path(&root, &sources.questions_path))
    {
        Some(p) => p,
        None => whatever!("no questions file: use --questions or sources.questionsPath"),
    };
    let responses_path = match args
        .responses
        .clone()
        .or_else(|| config_path(&root, &sources.responses_path))
    {
        Some(p) => p,
        None => whatever!("no responses file: use --responses or sources.responsesPath"),
    };
    let provider = match args
        .input_type
        .as_ref()
        .or(sources.responses_provider.as_ref())
    {
        Some(name) => ResponsesProvider::parse(name)?,
        None => ResponsesProvider::from_path(&responses_path),
    };

    Ok(AnalysisInputs {
        survey_name: config.output_settings.survey_name.clone(),
        survey_id: config.output_settings.survey_id.clone(),
        questions_path,
        options_path: args
            .options
            .clone()
            .or_else(|| config_path(&root, &sources.options_path)),
        responses_path,
        provider,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| sources.excel_worksheet_name.clone()),
        output_path: args
            .out
            .clone()
            .or_else(|| config_path(&root, &config.output_settings.output_path)),
        keep_incomplete: args.keep_incomplete
            || config.rules.keep_incomplete_responses.unwrap_or(false),
        cache_directory: args
            .cache_dir
            .clone()
            .or_else(|| config_path(&root, &config.cache_directory)),
        rules: validate_rules(&config.rules)?,
    })
}
