use clap::Parser;

/// This is a survey analysis program.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the analysis: the input files, the rules and the output.
    /// For more information about the file format, read the manual of the survey_analysis crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The questions of the survey, in JSON. Setting this option overrides the path that may
    /// be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub questions: Option<String>,

    /// (file path) The answer options of the survey, in JSON. Setting this option overrides the path that
    /// may be specified with the --config option.
    #[clap(long, value_parser)]
    pub options: Option<String>,

    /// (file path) The responses to the survey. Setting this option overrides the path that may be specified
    /// with the --config option.
    #[clap(short = 'i', long, value_parser)]
    pub responses: Option<String>,

    /// (json, csv or xlsx) The format of the responses. By default, it is guessed from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the only worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the analysis will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the summary of an analysis in JSON format. If provided, survey-analyzer will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Keeps the responses that were not submitted (without a submission date).
    #[clap(long, takes_value = false)]
    pub keep_incomplete: bool,

    /// (directory or empty) Stores the answer options in this directory, to reuse them in the next runs. When empty,
    /// the directory is .question_cache
    #[clap(long, value_parser)]
    pub cache_dir: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
